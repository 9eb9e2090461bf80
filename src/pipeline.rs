//! Range filtering and re-rendering.
//!
//! [`Dashboard`] owns the immutable monthly aggregate and period index built
//! at startup. Each slider interaction is a plain call to
//! [`Dashboard::refresh`], which recomputes the facility summary, the map and
//! the table from scratch.

use crate::aggregation::{
    FacilitySummary, MonthlyAggregate, Record, aggregate_by_facility, aggregate_monthly,
};
use crate::error::StartupError;
use crate::loader::load_records;
use crate::period::PeriodIndex;
use crate::present::table::DEFAULT_MAX_ROWS;
use crate::present::{
    MapSpec, PageMeta, SliderSpec, TableSpec, to_map_spec, to_slider_spec, to_table_spec,
};
use serde::Serialize;
use std::path::Path;
use tracing::{debug, info, warn};

/// Rows selected by a range, plus the summary recomputed over them.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Refresh {
    pub summary: Vec<FacilitySummary>,
    pub rows: Vec<MonthlyAggregate>,
}

impl Refresh {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Selects the monthly rows between two slider positions and re-aggregates.
///
/// The endpoints may come in either order. Both are resolved to months
/// through `index` and rows are kept when their month lies in the inclusive
/// interval between them. An interval that selects nothing, or a position
/// outside the index, gives an empty result.
pub fn refresh(monthly: &[MonthlyAggregate], index: &PeriodIndex, range: [usize; 2]) -> Refresh {
    let lo = range[0].min(range[1]);
    let hi = range[0].max(range[1]);

    let (Some(first), Some(last)) = (index.month(lo), index.month(hi)) else {
        warn!(lo, hi, periods = index.len(), "Range outside the period index");
        return Refresh {
            summary: Vec::new(),
            rows: Vec::new(),
        };
    };

    let rows: Vec<MonthlyAggregate> = monthly
        .iter()
        .filter(|row| row.month >= first && row.month <= last)
        .cloned()
        .collect();
    let summary = aggregate_by_facility(&rows);

    debug!(
        from = %first,
        to = %last,
        rows = rows.len(),
        facilities = summary.len(),
        "Range selected"
    );

    Refresh { summary, rows }
}

/// Everything the page needs on first load.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InitialRender {
    pub page: PageMeta,
    pub slider: SliderSpec,
    pub periods: PeriodIndex,
    pub map: MapSpec,
    pub table: TableSpec,
}

/// The two views replaced on every slider change.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RefreshRender {
    pub map: MapSpec,
    pub table: TableSpec,
}

/// The loaded dataset and its derived, read-only aggregates.
#[derive(Debug, Clone)]
pub struct Dashboard {
    monthly: Vec<MonthlyAggregate>,
    index: PeriodIndex,
    max_rows: usize,
}

impl Dashboard {
    /// Loads the CSV at `path` and builds the aggregates.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, StartupError> {
        let records = load_records(path)?;
        Ok(Self::from_records(&records))
    }

    pub fn from_records(records: &[Record]) -> Self {
        let monthly = aggregate_monthly(records);
        let index = PeriodIndex::build(&monthly);

        info!(
            records = records.len(),
            monthly_rows = monthly.len(),
            periods = index.len(),
            "Aggregates built"
        );

        Self {
            monthly,
            index,
            max_rows: DEFAULT_MAX_ROWS,
        }
    }

    /// Overrides how many rows the sample table shows.
    pub fn with_max_rows(mut self, max_rows: usize) -> Self {
        self.max_rows = max_rows;
        self
    }

    pub fn monthly(&self) -> &[MonthlyAggregate] {
        &self.monthly
    }

    pub fn periods(&self) -> &PeriodIndex {
        &self.index
    }

    /// Summary over the whole dataset.
    pub fn facility_summary(&self) -> Vec<FacilitySummary> {
        aggregate_by_facility(&self.monthly)
    }

    pub fn initial_render(&self) -> InitialRender {
        InitialRender {
            page: PageMeta::default(),
            slider: to_slider_spec(&self.index),
            periods: self.index.clone(),
            map: to_map_spec(&self.facility_summary()),
            table: to_table_spec(&self.monthly, self.max_rows),
        }
    }

    /// Raw pipeline result for a slider range.
    pub fn select(&self, range: [usize; 2]) -> Refresh {
        refresh(&self.monthly, &self.index, range)
    }

    pub fn refresh(&self, range: [usize; 2]) -> RefreshRender {
        let selection = self.select(range);
        RefreshRender {
            map: to_map_spec(&selection.summary),
            table: to_table_spec(&selection.rows, self.max_rows),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregation::{FacilityId, Month};
    use chrono::NaiveDate;

    fn record(year: i32, month: u32, name: &str, occupancy: f64, deaths: i64) -> Record {
        Record {
            notified_at: NaiveDate::from_ymd_opt(year, month, 10)
                .and_then(|d| d.and_hms_opt(8, 0, 0)),
            suspected_occupancy: Some(occupancy),
            confirmed_deaths: Some(deaths),
            facility_name: Some(name.to_string()),
            latitude: Some(-15.78),
            longitude: Some(-47.92),
        }
    }

    fn dashboard() -> Dashboard {
        Dashboard::from_records(&[
            record(2021, 1, "Hospital A", 0.40, 2),
            record(2021, 2, "Hospital A", 0.60, 3),
            record(2021, 3, "Hospital A", 0.90, 7),
            record(2021, 2, "Hospital B", 0.20, 1),
        ])
    }

    #[test]
    fn test_two_month_example() {
        let dash = dashboard();
        let selection = dash.select([0, 1]);

        let a = &selection.summary[0];
        assert_eq!(a.facility, FacilityId::new("Hospital A", -15.78, -47.92));
        assert!((a.mean_occupancy.unwrap() - 0.50).abs() < 1e-12);
        assert_eq!(a.total_deaths, 5);
        assert_eq!(selection.rows.len(), 3);
    }

    #[test]
    fn test_reversed_range_is_identical() {
        let dash = dashboard();
        assert_eq!(dash.select([2, 1]), dash.select([1, 2]));
        assert_eq!(dash.refresh([2, 0]), dash.refresh([0, 2]));
    }

    #[test]
    fn test_full_range_equals_unfiltered() {
        let dash = dashboard();
        let selection = dash.select([0, dash.periods().len() - 1]);

        assert_eq!(selection.rows, dash.monthly());
        assert_eq!(selection.summary, dash.facility_summary());

        let initial = dash.initial_render();
        let refreshed = dash.refresh([0, 2]);
        assert_eq!(refreshed.map, initial.map);
        assert_eq!(refreshed.table, initial.table);
    }

    #[test]
    fn test_single_month_selection() {
        let dash = dashboard();
        let selection = dash.select([2, 2]);

        assert_eq!(selection.rows.len(), 1);
        assert_eq!(selection.rows[0].month, Month::new(2021, 3).unwrap());
        assert_eq!(selection.summary[0].total_deaths, 7);
    }

    #[test]
    fn test_out_of_index_range_is_empty() {
        let dash = dashboard();
        let render = dash.refresh([1, 9]);
        assert!(render.map.is_empty());
        assert!(render.table.is_empty());
    }

    #[test]
    fn test_first_seen_order_can_select_nothing() {
        // Positions follow first-seen order, so position 0 may be a later
        // month than position 1.
        let later = MonthlyAggregate {
            month: Month::new(2021, 5).unwrap(),
            facility: FacilityId::new("Hospital A", -15.78, -47.92),
            mean_occupancy: Some(0.5),
            total_deaths: 1,
        };
        let earlier = MonthlyAggregate {
            month: Month::new(2021, 1).unwrap(),
            ..later.clone()
        };
        let monthly = vec![later, earlier];
        let index = PeriodIndex::build(&monthly);

        let selection = refresh(&monthly, &index, [0, 1]);
        assert!(selection.is_empty());
        assert!(selection.summary.is_empty());
    }

    #[test]
    fn test_empty_dataset() {
        let dash = Dashboard::from_records(&[]);
        let initial = dash.initial_render();

        assert!(initial.map.is_empty());
        assert!(initial.table.is_empty());
        assert_eq!(initial.slider.value, None);
        assert!(dash.refresh([0, 0]).table.is_empty());
    }

    #[test]
    fn test_with_max_rows() {
        let dash = dashboard().with_max_rows(2);
        let render = dash.refresh([0, 2]);
        assert_eq!(render.table.rows.len(), 2);
        assert_eq!(render.table.total_rows, 4);
    }
}
