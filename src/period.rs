//! Position-to-month index behind the date-range slider.

use crate::aggregation::{Month, MonthlyAggregate};
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

/// Ordered mapping from slider positions `0..N-1` to distinct months.
///
/// Months are kept in the order they are first seen in the monthly rows, not
/// re-sorted. [`aggregate_monthly`](crate::aggregation::aggregate_monthly)
/// already emits rows by month, so for its output this is chronological.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PeriodIndex {
    months: Vec<Month>,
}

impl PeriodIndex {
    pub fn build<'a, I>(monthly_rows: I) -> Self
    where
        I: IntoIterator<Item = &'a MonthlyAggregate>,
    {
        let mut months: Vec<Month> = Vec::new();
        for row in monthly_rows {
            if !months.contains(&row.month) {
                months.push(row.month);
            }
        }
        Self { months }
    }

    pub fn len(&self) -> usize {
        self.months.len()
    }

    pub fn is_empty(&self) -> bool {
        self.months.is_empty()
    }

    pub fn month(&self, position: usize) -> Option<Month> {
        self.months.get(position).copied()
    }

    /// The `MM-YYYY` label at `position`.
    pub fn label(&self, position: usize) -> Option<String> {
        self.month(position).map(|m| m.label())
    }

    pub fn position_of(&self, month: Month) -> Option<usize> {
        self.months.iter().position(|m| *m == month)
    }

    /// `[0, N-1]`, or `None` for an empty index.
    pub fn full_range(&self) -> Option<[usize; 2]> {
        (!self.is_empty()).then(|| [0, self.months.len() - 1])
    }

    /// `(position, label)` pairs in position order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, String)> + '_ {
        self.months.iter().enumerate().map(|(i, m)| (i, m.label()))
    }
}

impl Serialize for PeriodIndex {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.months.len()))?;
        for (position, label) in self.iter() {
            map.serialize_entry(&position, &label)?;
        }
        map.end()
    }
}
