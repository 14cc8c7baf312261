//! Label assignments on the orchestrator wire
//!
//! The service models labels as `name -> [values]`; the orchestrator state
//! stores them as `name -> "v1,v2"`.

use crate::model::LabelAssignments;
use std::collections::BTreeMap;

pub const LABEL_SEPARATOR: char = ',';

pub fn flatten_labels(labels: &LabelAssignments) -> BTreeMap<String, String> {
    labels
        .iter()
        .map(|(name, values)| (name.clone(), values.join(&LABEL_SEPARATOR.to_string())))
        .collect()
}

/// Inverse of [`flatten_labels`]; blank entries are dropped
pub fn split_labels(flat: &BTreeMap<String, String>) -> LabelAssignments {
    flat.iter()
        .map(|(name, joined)| {
            let values = joined
                .split(LABEL_SEPARATOR)
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .map(str::to_string)
                .collect();
            (name.clone(), values)
        })
        .collect()
}
