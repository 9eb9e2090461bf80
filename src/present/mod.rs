//! Adapters from aggregates to renderable structures.
//!
//! The hosting UI receives these as JSON: map markers, a table, and the
//! range slider parameters. Nothing here draws anything.

pub mod map;
pub mod slider;
pub mod table;

pub use map::{MapLayout, MapMarker, MapSpec, to_map_spec};
pub use slider::{SliderMark, SliderSpec, to_slider_spec};
pub use table::{Cell, TABLE_HEADERS, TableSpec, to_table_spec};

use serde::Serialize;

/// Static page text shown around the map and table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PageMeta {
    pub browser_title: &'static str,
    pub heading: &'static str,
    pub subtitle: &'static str,
    pub slider_label: &'static str,
    pub table_heading: &'static str,
}

impl Default for PageMeta {
    fn default() -> Self {
        Self {
            browser_title: "e-SUS - DF",
            heading: "Ocupação dos Leitos SUS na linha do tempo",
            subtitle: "Dados do Distrito Federal.",
            slider_label: "Linha do Tempo",
            table_heading: "Amostra dos Dados",
        }
    }
}
