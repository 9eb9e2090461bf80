//! Range slider parameters derived from the period index.

use crate::period::PeriodIndex;
use serde::Serialize;
use std::collections::BTreeMap;

pub const SLIDER_ID: &str = "dtnotificacao_range";

/// Rotation applied to every mark label so month labels do not overlap.
const MARK_ROTATION_DEG: i16 = -40;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SliderMark {
    pub label: String,
    pub rotation_deg: i16,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SliderSpec {
    pub id: &'static str,
    pub min: usize,
    pub max: usize,
    pub marks: BTreeMap<usize, SliderMark>,
    /// Initial selection, the whole index. Absent when there are no months.
    pub value: Option<[usize; 2]>,
    pub allow_cross: bool,
    /// Only emit a new value once the handle is released.
    pub update_on_release: bool,
    /// Handles snap to marks; there is no free step.
    pub step: Option<usize>,
}

pub fn to_slider_spec(index: &PeriodIndex) -> SliderSpec {
    let marks = index
        .iter()
        .map(|(position, label)| {
            (
                position,
                SliderMark {
                    label,
                    rotation_deg: MARK_ROTATION_DEG,
                },
            )
        })
        .collect();

    SliderSpec {
        id: SLIDER_ID,
        min: 0,
        max: index.len().saturating_sub(1),
        marks,
        value: index.full_range(),
        allow_cross: false,
        update_on_release: true,
        step: None,
    }
}
