//! The concept co-occurrence graph engine.
//!
//! Three pure stages turn a [`MemorySnapshot`](crate::snapshot::MemorySnapshot)
//! into a renderer-agnostic graph:
//!
//! 1. [`invert`](invert::invert) — concept→messages becomes message→concepts
//! 2. [`aggregate`](cooccur::aggregate) — one weight per unordered concept
//!    pair, counting the messages in which both appear
//! 3. [`assemble`](assemble::assemble) — merge node metadata with the edge
//!    weights into a [`ConceptGraph`]
//!
//! Every stage recomputes from scratch; nothing is persisted or patched
//! incrementally. All intermediate maps are ordered, so two runs over the
//! same snapshot produce byte-identical output.

pub mod assemble;
pub mod cooccur;
pub mod invert;

pub use assemble::{AssemblyDiagnostic, ConceptEdge, ConceptGraph, ConceptNode};
pub use cooccur::ConceptPair;

use crate::snapshot::MemorySnapshot;

/// Run the full pipeline over one snapshot.
///
/// Never fails: malformed input degrades to an empty graph, and inconsistent
/// edges are dropped with a diagnostic (see [`assemble::assemble`]).
pub fn build(snapshot: &MemorySnapshot) -> (ConceptGraph, Vec<AssemblyDiagnostic>) {
    let by_message = invert::invert(&snapshot.concept_index);
    let weights = cooccur::aggregate(&by_message);
    assemble::assemble(&snapshot.concepts, &weights)
}
