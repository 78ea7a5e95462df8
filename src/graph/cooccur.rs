//! Co-occurrence aggregation: one weight per unordered concept pair.

use std::collections::BTreeMap;

use super::invert::MessageConcepts;

/// An unordered pair of distinct concept names.
///
/// Construction sorts the two names lexicographically, so `(A, B)` and
/// `(B, A)` are the same key. Using a structural type as the map key (rather
/// than a joined string) means concept names can contain any characters
/// without risking key collisions.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ConceptPair {
    first: String,
    second: String,
}

impl ConceptPair {
    /// Build a canonical pair. Returns `None` for self-pairs.
    pub fn new(a: impl Into<String>, b: impl Into<String>) -> Option<Self> {
        let (a, b) = (a.into(), b.into());
        match a.cmp(&b) {
            std::cmp::Ordering::Less => Some(Self { first: a, second: b }),
            std::cmp::Ordering::Greater => Some(Self { first: b, second: a }),
            std::cmp::Ordering::Equal => None,
        }
    }

    /// The lexicographically smaller endpoint.
    pub fn first(&self) -> &str {
        &self.first
    }

    /// The lexicographically larger endpoint.
    pub fn second(&self) -> &str {
        &self.second
    }
}

impl std::fmt::Display for ConceptPair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} <-> {}", self.first, self.second)
    }
}

/// Count, for every unordered pair of concepts, the number of messages in
/// which both appear.
///
/// Each message's concept list is deduplicated first, so upstream duplication
/// can neither inflate a weight nor produce a self-loop. Messages mentioning
/// fewer than two distinct concepts contribute nothing. Weights are pure
/// cumulative counts, so processing order cannot affect the result.
pub fn aggregate(messages: &MessageConcepts) -> BTreeMap<ConceptPair, u32> {
    let mut weights = BTreeMap::new();

    for concepts in messages.values() {
        let mut distinct: Vec<&str> = Vec::with_capacity(concepts.len());
        for concept in concepts {
            if !distinct.contains(&concept.as_str()) {
                distinct.push(concept);
            }
        }
        if distinct.len() < 2 {
            continue;
        }

        for i in 0..distinct.len() {
            for j in (i + 1)..distinct.len() {
                let pair = ConceptPair::new(distinct[i], distinct[j])
                    .expect("deduplicated list cannot yield self-pairs");
                *weights.entry(pair).or_insert(0) += 1;
            }
        }
    }

    weights
}

#[cfg(test)]
mod tests {
    use super::*;

    fn messages(entries: &[(u64, &[&str])]) -> MessageConcepts {
        entries
            .iter()
            .map(|(id, names)| (*id, names.iter().map(|n| n.to_string()).collect()))
            .collect()
    }

    fn pair(a: &str, b: &str) -> ConceptPair {
        ConceptPair::new(a, b).unwrap()
    }

    #[test]
    fn three_concepts_produce_three_pairs() {
        let weights = aggregate(&messages(&[(1, &["A", "B", "C"])]));
        assert_eq!(weights.len(), 3);
        assert_eq!(weights[&pair("A", "B")], 1);
        assert_eq!(weights[&pair("A", "C")], 1);
        assert_eq!(weights[&pair("B", "C")], 1);
    }

    #[test]
    fn pair_key_is_order_independent() {
        let weights = aggregate(&messages(&[(1, &["A", "B"]), (2, &["B", "A"])]));
        assert_eq!(weights.len(), 1);
        assert_eq!(weights[&pair("A", "B")], 2);
    }

    #[test]
    fn duplicated_concept_creates_no_self_loop() {
        let weights = aggregate(&messages(&[(1, &["A", "A", "B"])]));
        assert_eq!(weights.len(), 1);
        assert_eq!(weights[&pair("A", "B")], 1);
        assert!(ConceptPair::new("A", "A").is_none());
    }

    #[test]
    fn single_concept_messages_contribute_nothing() {
        let weights = aggregate(&messages(&[(1, &["A"]), (2, &[]), (3, &["A", "B"])]));
        assert_eq!(weights.len(), 1);
        assert_eq!(weights[&pair("A", "B")], 1);
    }

    #[test]
    fn weight_counts_messages_not_mentions() {
        // Both concepts in three messages, duplicated mentions in one of them.
        let weights = aggregate(&messages(&[
            (1, &["A", "B"]),
            (2, &["B", "A", "A"]),
            (3, &["A", "B", "C"]),
        ]));
        assert_eq!(weights[&pair("A", "B")], 3);
    }

    #[test]
    fn aggregation_is_deterministic() {
        let input = messages(&[
            (1, &["D", "A", "C"]),
            (2, &["B", "A"]),
            (3, &["C", "D", "B", "A"]),
        ]);
        assert_eq!(aggregate(&input), aggregate(&input));
    }

    #[test]
    fn names_containing_separators_cannot_collide() {
        // "A|B" + "C" vs "A" + "B|C" would collide under naive string joins.
        let weights = aggregate(&messages(&[(1, &["A|B", "C"]), (2, &["A", "B|C"])]));
        assert_eq!(weights.len(), 2);
        assert_eq!(weights[&pair("A|B", "C")], 1);
        assert_eq!(weights[&pair("A", "B|C")], 1);
    }
}
