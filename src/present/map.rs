//! Scatter-map marker parameters.

use crate::aggregation::FacilitySummary;
use serde::Serialize;

pub const MAP_ID: &str = "map-estabelecimentos";

/// Map-wide rendering parameters.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MapLayout {
    pub style: &'static str,
    pub zoom: u8,
    pub height: u32,
    /// Margins in pixels: right, top, left, bottom.
    pub margin: [u32; 4],
    pub color_scale: &'static str,
    /// Smallest and largest death total; drives the continuous color bar.
    pub color_range: Option<(i64, i64)>,
}

impl Default for MapLayout {
    fn default() -> Self {
        Self {
            style: "carto-positron",
            zoom: 9,
            height: 600,
            margin: [0, 0, 0, 0],
            color_scale: "viridis",
            color_range: None,
        }
    }
}

/// One facility on the map.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MapMarker {
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    /// Color channel: summed deaths.
    pub color: i64,
    /// Size channel: mean occupancy. Missing means the marker has no size.
    pub size: Option<f64>,
    pub hover: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MapSpec {
    pub id: &'static str,
    pub markers: Vec<MapMarker>,
    pub layout: MapLayout,
}

impl MapSpec {
    pub fn is_empty(&self) -> bool {
        self.markers.is_empty()
    }
}

fn hover_text(summary: &FacilitySummary) -> String {
    let occupancy = summary
        .mean_occupancy
        .map(|v| v.to_string())
        .unwrap_or_else(|| "NaN".to_string());
    format!(
        "<b>{}</b><br>ocupacaoSuspeitoCli={}<br>saidaConfirmadaObitos={}",
        summary.facility.name, occupancy, summary.total_deaths
    )
}

/// Builds one marker per facility summary.
pub fn to_map_spec(summaries: &[FacilitySummary]) -> MapSpec {
    let markers: Vec<MapMarker> = summaries
        .iter()
        .map(|s| MapMarker {
            name: s.facility.name.clone(),
            latitude: s.facility.latitude,
            longitude: s.facility.longitude,
            color: s.total_deaths,
            size: s.mean_occupancy,
            hover: hover_text(s),
        })
        .collect();

    let color_range = markers
        .iter()
        .map(|m| m.color)
        .fold(None, |range: Option<(i64, i64)>, c| match range {
            None => Some((c, c)),
            Some((lo, hi)) => Some((lo.min(c), hi.max(c))),
        });

    MapSpec {
        id: MAP_ID,
        markers,
        layout: MapLayout {
            color_range,
            ..MapLayout::default()
        },
    }
}
