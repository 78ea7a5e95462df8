//! Index inversion: concept→messages becomes message→concepts.

use std::collections::BTreeMap;

/// Message id → concept names mentioned in that message.
///
/// Derived fresh on every pipeline run and discarded after aggregation.
/// Per-message insertion order follows the (ordered) concept iteration, so
/// repeated runs produce identical structures.
pub type MessageConcepts = BTreeMap<u64, Vec<String>>;

/// Invert a concept→messages index.
///
/// Only messages become keys: a concept with an empty message set leaves no
/// trace in the output. An empty index yields an empty map.
pub fn invert(index: &BTreeMap<String, Vec<u64>>) -> MessageConcepts {
    let mut by_message = MessageConcepts::new();
    for (concept, messages) in index {
        for &message in messages {
            by_message
                .entry(message)
                .or_default()
                .push(concept.clone());
        }
    }
    by_message
}
