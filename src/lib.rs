//! # weft
//!
//! A terminal client for knowledge-agent services. weft talks to a backend
//! over HTTP (chat turns, health checks, memory snapshots), lets the user
//! toggle the agent's named processing modules, and renders the agent's
//! extracted concepts as a live co-occurrence map.
//!
//! ## Architecture
//!
//! - **Wire contracts** (`snapshot`, `client`): serde types for the backend's
//!   chat/health/memory endpoints, fetched synchronously via `ureq`
//! - **Graph engine** (`graph`): inverts the concept→messages index, counts
//!   pairwise co-occurrence, and assembles a renderer-agnostic node/edge graph
//! - **Rendering seam** (`render`): the [`render::RenderAdapter`] trait with
//!   replace-don't-recreate semantics, plus the built-in TUI canvas layout
//! - **TUI** (`tui`): ratatui chat + memory views backed by worker threads
//!
//! ## Library usage
//!
//! ```no_run
//! use weft::graph;
//! use weft::snapshot::MemorySnapshot;
//!
//! let snapshot: MemorySnapshot = serde_json::from_str(
//!     r#"{"concepts":{"Rust":{"count":3,"first_seen":"turn 1"}},
//!         "concept_index":{"Rust":[1,2]}}"#,
//! ).unwrap();
//! let (graph, diagnostics) = graph::build(&snapshot);
//! assert_eq!(graph.nodes.len(), 1);
//! assert!(diagnostics.is_empty());
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod graph;
pub mod message;
pub mod paths;
pub mod refresh;
pub mod render;
pub mod snapshot;
pub mod tui;
