use crate::aggregation::types::{FacilityId, FacilitySummary, Month, MonthlyAggregate, Record};
use crate::aggregation::utility::mean;
use std::collections::BTreeMap;
use tracing::debug;

#[derive(Default)]
struct Accumulator {
    occupancy: Vec<Option<f64>>,
    deaths: i64,
}

impl Accumulator {
    fn push(&mut self, occupancy: Option<f64>, deaths: Option<i64>) {
        self.occupancy.push(occupancy);
        self.deaths += deaths.unwrap_or(0);
    }
}

/// Groups raw records into one [`MonthlyAggregate`] per (month, facility).
///
/// Occupancy is averaged over the present values of each group and deaths
/// are summed. Records missing a date, a name or a coordinate cannot be
/// keyed and are left out. Rows come back ordered by month, then facility.
pub fn aggregate_monthly(records: &[Record]) -> Vec<MonthlyAggregate> {
    let mut groups: BTreeMap<(Month, FacilityId), Accumulator> = BTreeMap::new();
    let mut unkeyed = 0usize;

    for record in records {
        let (Some(month), Some(facility)) = (record.month(), record.facility()) else {
            unkeyed += 1;
            continue;
        };

        groups
            .entry((month, facility))
            .or_default()
            .push(record.suspected_occupancy, record.confirmed_deaths);
    }

    if unkeyed > 0 {
        debug!(unkeyed, "Records without a complete month/facility key skipped");
    }

    groups
        .into_iter()
        .map(|((month, facility), acc)| MonthlyAggregate {
            month,
            facility,
            mean_occupancy: mean(acc.occupancy),
            total_deaths: acc.deaths,
        })
        .collect()
}

/// Collapses monthly rows into one [`FacilitySummary`] per facility.
///
/// The occupancy is the unweighted mean of the monthly means, so a month
/// with few notifications weighs as much as a busy one. Deaths are the sum
/// of the monthly sums. Rows come back ordered by facility.
pub fn aggregate_by_facility<'a, I>(monthly_rows: I) -> Vec<FacilitySummary>
where
    I: IntoIterator<Item = &'a MonthlyAggregate>,
{
    let mut groups: BTreeMap<&FacilityId, Accumulator> = BTreeMap::new();

    for row in monthly_rows {
        groups
            .entry(&row.facility)
            .or_default()
            .push(row.mean_occupancy, Some(row.total_deaths));
    }

    groups
        .into_iter()
        .map(|(facility, acc)| FacilitySummary {
            facility: facility.clone(),
            mean_occupancy: mean(acc.occupancy),
            total_deaths: acc.deaths,
        })
        .collect()
}
