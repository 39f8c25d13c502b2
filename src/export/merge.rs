//! Merging per-mode trees into one body.

use serde_json::{Map, Value};

use crate::format::mode_key;
use crate::types::Mode;

/// Merge one tree per mode into a single body.
///
/// Each top-level group of any tree becomes a key of the result (in order
/// of first appearance) holding one `mode<Name>` entry per mode that defines
/// the group.
pub fn merge_modes(modes: &[Mode], trees: Vec<Map<String, Value>>) -> Map<String, Value> {
    let mut merged = Map::new();

    for (mode, tree) in modes.iter().zip(trees) {
        let key = mode_key(&mode.name);
        for (group, value) in tree {
            let slot = merged
                .entry(group)
                .or_insert_with(|| Value::Object(Map::new()));
            if let Value::Object(by_mode) = slot {
                by_mode.insert(key.clone(), value);
            }
        }
    }

    merged
}
