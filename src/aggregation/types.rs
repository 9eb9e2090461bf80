//! Data types used by the aggregation pipeline.

use chrono::{Datelike, NaiveDate, NaiveDateTime};
use serde::{Serialize, Serializer};
use std::cmp::Ordering;
use std::fmt;

/// A single notification row loaded from the occupancy CSV.
///
/// Every field is optional because the source file leaves cells empty; missing
/// values are handled by the aggregation step, never patched at load time.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Record {
    pub notified_at: Option<NaiveDateTime>,
    pub suspected_occupancy: Option<f64>,
    pub confirmed_deaths: Option<i64>,
    pub facility_name: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

impl Record {
    /// Month the record falls in, if it has a date.
    pub fn month(&self) -> Option<Month> {
        self.notified_at.map(|dt| Month::from_date(dt.date()))
    }

    /// Facility identity, if name and both coordinates are present.
    pub fn facility(&self) -> Option<FacilityId> {
        Some(FacilityId::new(
            self.facility_name.as_deref()?,
            self.latitude?,
            self.longitude?,
        ))
    }
}

/// A calendar month, the bucketing granularity of the dashboard.
///
/// Displays as `MM-YYYY`, which is also the label shown on the range slider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Month {
    year: i32,
    month: u32,
}

impl Month {
    /// Returns `None` unless `month` is in `1..=12`.
    pub fn new(year: i32, month: u32) -> Option<Self> {
        (1..=12).contains(&month).then_some(Self { year, month })
    }

    pub fn from_date(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    /// The `MM-YYYY` label.
    pub fn label(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Month {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}-{:04}", self.month, self.year)
    }
}

impl Serialize for Month {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Identity of a healthcare facility: display name plus coordinates.
///
/// Coordinates are compared by their total order so the identity can key
/// ordered maps.
#[derive(Debug, Clone, Serialize)]
pub struct FacilityId {
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
}

impl FacilityId {
    pub fn new(name: &str, latitude: f64, longitude: f64) -> Self {
        Self {
            name: name.to_string(),
            latitude,
            longitude,
        }
    }
}

impl PartialEq for FacilityId {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for FacilityId {}

impl PartialOrd for FacilityId {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for FacilityId {
    fn cmp(&self, other: &Self) -> Ordering {
        self.name
            .cmp(&other.name)
            .then_with(|| self.latitude.total_cmp(&other.latitude))
            .then_with(|| self.longitude.total_cmp(&other.longitude))
    }
}

/// One row per (month, facility): the table view.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlyAggregate {
    pub month: Month,
    pub facility: FacilityId,
    /// Mean occupancy over the month; `None` when every value was missing.
    pub mean_occupancy: Option<f64>,
    pub total_deaths: i64,
}

/// One row per facility over whatever months are in scope: the map view.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FacilitySummary {
    pub facility: FacilityId,
    /// Mean of the monthly means.
    pub mean_occupancy: Option<f64>,
    pub total_deaths: i64,
}
