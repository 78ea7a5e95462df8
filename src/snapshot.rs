//! Wire contract for the backend's memory snapshot.
//!
//! One snapshot describes the current state of the agent's extracted
//! concepts: per-concept metadata plus a sparse inverted index from concept
//! name to the conversation messages that mention it. The client trusts the
//! snapshot; it never validates message ids against the transcript.

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};

/// Metadata for a single extracted concept.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConceptMeta {
    /// Occurrence frequency across the conversation.
    pub count: u64,
    /// Opaque first-seen label. Displayed verbatim, never interpreted; the
    /// reference service sends a history index, other backends send
    /// timestamps, so both numbers and strings are accepted.
    #[serde(default, deserialize_with = "opaque_label")]
    pub first_seen: String,
}

/// One backend response describing extracted concepts and their message
/// associations.
///
/// Either top-level mapping may be absent on the wire; absence means empty,
/// not malformed. Ordered maps keep every derived artifact deterministic.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemorySnapshot {
    /// Concept name → metadata.
    #[serde(default)]
    pub concepts: BTreeMap<String, ConceptMeta>,
    /// Concept name → message indices in which the concept occurred.
    #[serde(default)]
    pub concept_index: BTreeMap<String, Vec<u64>>,
}

impl MemorySnapshot {
    /// Total messages referenced by the index (distinct ids).
    pub fn message_count(&self) -> usize {
        let mut ids: Vec<u64> = self.concept_index.values().flatten().copied().collect();
        ids.sort_unstable();
        ids.dedup();
        ids.len()
    }
}

/// Accept a JSON string or number and keep it as a display string.
fn opaque_label<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Label {
        Text(String),
        Number(i64),
    }

    Ok(match Label::deserialize(deserializer)? {
        Label::Text(s) => s,
        Label::Number(n) => n.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_top_level_keys_are_empty_mappings() {
        let snapshot: MemorySnapshot = serde_json::from_str("{}").unwrap();
        assert!(snapshot.concepts.is_empty());
        assert!(snapshot.concept_index.is_empty());

        let snapshot: MemorySnapshot =
            serde_json::from_str(r#"{"concepts":{"A":{"count":1}}}"#).unwrap();
        assert_eq!(snapshot.concepts.len(), 1);
        assert!(snapshot.concept_index.is_empty());
    }

    #[test]
    fn first_seen_accepts_string_or_number() {
        let meta: ConceptMeta =
            serde_json::from_str(r#"{"count":2,"first_seen":"2024-11-01"}"#).unwrap();
        assert_eq!(meta.first_seen, "2024-11-01");

        let meta: ConceptMeta = serde_json::from_str(r#"{"count":2,"first_seen":14}"#).unwrap();
        assert_eq!(meta.first_seen, "14");

        let meta: ConceptMeta = serde_json::from_str(r#"{"count":2}"#).unwrap();
        assert_eq!(meta.first_seen, "");
    }

    #[test]
    fn message_count_dedupes_across_concepts() {
        let snapshot: MemorySnapshot = serde_json::from_str(
            r#"{"concept_index":{"A":[1,2],"B":[2,3],"C":[]}}"#,
        )
        .unwrap();
        assert_eq!(snapshot.message_count(), 3);
    }
}
