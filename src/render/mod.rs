//! The rendering seam between the graph engine and whatever draws it.
//!
//! The engine hands a finished [`ConceptGraph`](crate::graph::ConceptGraph)
//! to a [`RenderAdapter`] and never looks at layout internals. Adapters keep
//! their own layout state across calls, so refreshing the data does not reset
//! what the user is looking at.

pub mod force;

pub use force::ForceLayout;

use crate::graph::ConceptGraph;

/// A destination for assembled concept graphs.
///
/// The first `apply` initializes a fresh layout; every later `apply` replaces
/// the data of the existing layout object in place. Implementations must not
/// rebuild themselves per call — viewport and simulation state that can carry
/// over (positions of surviving nodes, pan/zoom) must carry over.
pub trait RenderAdapter {
    /// Install a new graph, superseding the previous one entirely.
    fn apply(&mut self, graph: ConceptGraph);

    /// The currently installed graph, if any.
    fn graph(&self) -> Option<&ConceptGraph>;
}
