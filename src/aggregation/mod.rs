//! Monthly and per-facility aggregation of notification records.
//!
//! Records are first grouped by (month, facility) into the table view, and
//! those monthly rows are grouped again by facility into the map view.

pub mod aggregate;
pub mod types;
pub mod utility;

pub use aggregate::{aggregate_by_facility, aggregate_monthly};
pub use types::{FacilityId, FacilitySummary, Month, MonthlyAggregate, Record};
