//! Sample table of monthly aggregates.

use crate::aggregation::MonthlyAggregate;
use crate::aggregation::utility::round_to;
use serde::Serialize;
use std::fmt;

pub const TABLE_ID: &str = "tb_amostra";

/// Rows shown by default; the table is a sample, not the full dataset.
pub const DEFAULT_MAX_ROWS: usize = 50;

pub const TABLE_HEADERS: [&str; 4] = ["Notificação", "Hospital", "Ocupação média", "Total Óbitos"];

/// A typed table cell.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Cell {
    Text(String),
    Number(f64),
    Integer(i64),
    Empty,
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Text(s) => f.write_str(s),
            Cell::Number(n) => write!(f, "{n}"),
            Cell::Integer(i) => write!(f, "{i}"),
            Cell::Empty => Ok(()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableSpec {
    pub id: &'static str,
    pub columns: [&'static str; 4],
    pub rows: Vec<Vec<Cell>>,
    /// Rows available before truncation.
    pub total_rows: usize,
}

impl TableSpec {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Formats every row, ordered by month then facility name.
///
/// The sort is stable, so facilities sharing a name keep their input order.
pub fn table_rows(rows: &[MonthlyAggregate]) -> Vec<Vec<Cell>> {
    let mut sorted: Vec<&MonthlyAggregate> = rows.iter().collect();
    sorted.sort_by(|a, b| {
        a.month
            .cmp(&b.month)
            .then_with(|| a.facility.name.cmp(&b.facility.name))
    });

    sorted
        .into_iter()
        .map(|row| {
            vec![
                Cell::Text(row.month.label()),
                Cell::Text(row.facility.name.clone()),
                row.mean_occupancy
                    .map(|v| Cell::Number(round_to(v, 2)))
                    .unwrap_or(Cell::Empty),
                Cell::Integer(row.total_deaths),
            ]
        })
        .collect()
}

/// Builds the sample table: sorted, rounded, and cut at `max_rows`.
pub fn to_table_spec(rows: &[MonthlyAggregate], max_rows: usize) -> TableSpec {
    let mut formatted = table_rows(rows);
    let total_rows = formatted.len();
    formatted.truncate(max_rows);

    TableSpec {
        id: TABLE_ID,
        columns: TABLE_HEADERS,
        rows: formatted,
        total_rows,
    }
}
