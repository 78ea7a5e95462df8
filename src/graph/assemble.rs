//! Graph assembly: merge concept metadata with aggregated edge weights into
//! a renderer-agnostic node/edge structure.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::snapshot::ConceptMeta;

use super::cooccur::ConceptPair;

/// A rendered concept. `size` drives the node's visual weight, `tooltip`
/// carries the display-only metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConceptNode {
    pub id: String,
    pub label: String,
    pub size: u64,
    pub tooltip: String,
}

/// A rendered co-occurrence edge; `weight` drives its visual thickness.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConceptEdge {
    pub from: String,
    pub to: String,
    pub weight: u32,
}

/// The assembled graph. Immutable once built; each refresh produces a wholly
/// new value that supersedes the previous one in the renderer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ConceptGraph {
    pub nodes: Vec<ConceptNode>,
    pub edges: Vec<ConceptEdge>,
}

impl ConceptGraph {
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Render as Graphviz DOT for `weft graph --format dot`.
    pub fn to_dot(&self) -> String {
        let mut out = String::from("graph concepts {\n");
        for node in &self.nodes {
            out.push_str(&format!(
                "    {:?} [width={}, tooltip={:?}];\n",
                node.id, node.size, node.tooltip
            ));
        }
        for edge in &self.edges {
            out.push_str(&format!(
                "    {:?} -- {:?} [penwidth={}];\n",
                edge.from, edge.to, edge.weight
            ));
        }
        out.push_str("}\n");
        out
    }
}

/// A non-fatal inconsistency found during assembly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum AssemblyDiagnostic {
    /// An aggregated edge references a concept the metadata map doesn't know.
    /// Indicates a stale or inconsistent snapshot; the edge is dropped and
    /// assembly continues.
    OrphanEdge { from: String, to: String, missing: String },
}

impl std::fmt::Display for AssemblyDiagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::OrphanEdge { from, to, missing } => write!(
                f,
                "dropped edge {from} <-> {to}: concept \"{missing}\" missing from snapshot metadata"
            ),
        }
    }
}

/// Assemble a graph from concept metadata and aggregated pair weights.
///
/// One node per metadata entry, including concepts with zero edges. Edges
/// whose endpoints are both known become [`ConceptEdge`]s; an edge with an
/// unknown endpoint is dropped with an [`AssemblyDiagnostic`] rather than
/// aborting the whole graph. Inputs are borrowed and never mutated.
pub fn assemble(
    concepts: &BTreeMap<String, ConceptMeta>,
    weights: &BTreeMap<ConceptPair, u32>,
) -> (ConceptGraph, Vec<AssemblyDiagnostic>) {
    let nodes: Vec<ConceptNode> = concepts
        .iter()
        .map(|(name, meta)| ConceptNode {
            id: name.clone(),
            label: name.clone(),
            size: meta.count,
            tooltip: if meta.first_seen.is_empty() {
                format!("{} mentions", meta.count)
            } else {
                format!("{} mentions :: first seen {}", meta.count, meta.first_seen)
            },
        })
        .collect();

    let mut edges = Vec::with_capacity(weights.len());
    let mut diagnostics = Vec::new();

    for (pair, &weight) in weights {
        let missing = [pair.first(), pair.second()]
            .into_iter()
            .find(|name| !concepts.contains_key(*name));

        match missing {
            None => edges.push(ConceptEdge {
                from: pair.first().to_string(),
                to: pair.second().to_string(),
                weight,
            }),
            Some(name) => {
                tracing::warn!(
                    edge = %pair,
                    missing = name,
                    "snapshot inconsistency: dropping edge with unknown concept"
                );
                diagnostics.push(AssemblyDiagnostic::OrphanEdge {
                    from: pair.first().to_string(),
                    to: pair.second().to_string(),
                    missing: name.to_string(),
                });
            }
        }
    }

    (ConceptGraph { nodes, edges }, diagnostics)
}
