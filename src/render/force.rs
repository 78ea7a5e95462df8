//! Built-in force-directed layout for the TUI memory view.
//!
//! Positions live in normalized [-1, 1] coordinates; the widget layer scales
//! them to the terminal canvas. The simulation is a small spring/charge
//! model stepped from the TUI's idle ticks, cooled per refresh so a settled
//! graph stops consuming CPU.

use std::collections::HashMap;

use petgraph::algo::tarjan_scc;
use petgraph::graph::UnGraph;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::graph::ConceptGraph;

use super::RenderAdapter;

const REPULSION: f64 = 0.012;
const SPRING: f64 = 0.08;
const CENTER_PULL: f64 = 0.02;
const DAMPING: f64 = 0.85;
const COOLING: f64 = 0.995;
const SETTLED_TEMP: f64 = 0.002;

#[derive(Debug, Clone, Copy)]
struct Point {
    x: f64,
    y: f64,
    vx: f64,
    vy: f64,
}

/// Force-directed layout state. Implements [`RenderAdapter`]: installing a
/// new graph keeps the positions of node ids that survive the refresh, so the
/// picture stays put while the data underneath changes.
pub struct ForceLayout {
    graph: Option<ConceptGraph>,
    points: HashMap<String, Point>,
    temperature: f64,
    rng: StdRng,
}

impl ForceLayout {
    pub fn new() -> Self {
        Self {
            graph: None,
            points: HashMap::new(),
            temperature: 0.0,
            rng: StdRng::from_entropy(),
        }
    }

    /// Deterministic seeding for tests.
    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            ..Self::new()
        }
    }

    /// Current node positions as (id, x, y) in [-1, 1] coordinates.
    pub fn positions(&self) -> impl Iterator<Item = (&str, f64, f64)> {
        self.points.iter().map(|(id, p)| (id.as_str(), p.x, p.y))
    }

    /// Position of a single node.
    pub fn position_of(&self, id: &str) -> Option<(f64, f64)> {
        self.points.get(id).map(|p| (p.x, p.y))
    }

    /// Whether the simulation has cooled to a standstill.
    pub fn is_settled(&self) -> bool {
        self.temperature < SETTLED_TEMP
    }

    /// Advance the simulation one tick. No-op without a graph or once
    /// settled.
    pub fn step(&mut self) {
        let Some(graph) = &self.graph else { return };
        if self.is_settled() {
            return;
        }

        let ids: Vec<&String> = graph.nodes.iter().map(|n| &n.id).collect();

        // Pairwise repulsion.
        let mut forces: HashMap<&str, (f64, f64)> =
            ids.iter().map(|id| (id.as_str(), (0.0, 0.0))).collect();
        for i in 0..ids.len() {
            for j in (i + 1)..ids.len() {
                let (Some(&a), Some(&b)) = (
                    self.points.get(ids[i].as_str()),
                    self.points.get(ids[j].as_str()),
                ) else {
                    continue;
                };
                let (dx, dy) = (a.x - b.x, a.y - b.y);
                let dist_sq = (dx * dx + dy * dy).max(1e-4);
                let push = REPULSION / dist_sq;
                let dist = dist_sq.sqrt();
                let (fx, fy) = (push * dx / dist, push * dy / dist);

                let fa = forces.get_mut(ids[i].as_str()).expect("node in force map");
                fa.0 += fx;
                fa.1 += fy;
                let fb = forces.get_mut(ids[j].as_str()).expect("node in force map");
                fb.0 -= fx;
                fb.1 -= fy;
            }
        }

        // Spring attraction along edges; heavier edges pull tighter.
        for edge in &graph.edges {
            let (Some(a), Some(b)) = (self.points.get(&edge.from), self.points.get(&edge.to))
            else {
                continue;
            };
            let (dx, dy) = (b.x - a.x, b.y - a.y);
            let dist = (dx * dx + dy * dy).sqrt().max(1e-4);
            let rest = 0.3 / (1.0 + (edge.weight as f64).ln_1p());
            let pull = SPRING * (dist - rest) / dist;
            let (fx, fy) = (pull * dx, pull * dy);

            if let Some(f) = forces.get_mut(edge.from.as_str()) {
                f.0 += fx;
                f.1 += fy;
            }
            if let Some(f) = forces.get_mut(edge.to.as_str()) {
                f.0 -= fx;
                f.1 -= fy;
            }
        }

        // Integrate with centering pull and damping; track peak velocity as
        // the temperature that decides settling.
        let mut peak = 0.0f64;
        for (id, (fx, fy)) in forces {
            let Some(p) = self.points.get_mut(id) else { continue };
            p.vx = (p.vx + fx - p.x * CENTER_PULL) * DAMPING;
            p.vy = (p.vy + fy - p.y * CENTER_PULL) * DAMPING;
            p.x = (p.x + p.vx).clamp(-1.0, 1.0);
            p.y = (p.y + p.vy).clamp(-1.0, 1.0);
            peak = peak.max(p.vx.abs()).max(p.vy.abs());
        }

        self.temperature = (self.temperature * COOLING).max(peak * COOLING);
    }
}

impl Default for ForceLayout {
    fn default() -> Self {
        Self::new()
    }
}

impl RenderAdapter for ForceLayout {
    fn apply(&mut self, graph: ConceptGraph) {
        // Group nodes by connected component so each cluster gets its own
        // region; isolated nodes ring the outside on their own anchors.
        let mut pg = UnGraph::<&str, ()>::new_undirected();
        let mut index = HashMap::new();
        for node in &graph.nodes {
            index.insert(node.id.as_str(), pg.add_node(node.id.as_str()));
        }
        for edge in &graph.edges {
            if let (Some(&a), Some(&b)) =
                (index.get(edge.from.as_str()), index.get(edge.to.as_str()))
            {
                pg.add_edge(a, b, ());
            }
        }
        let components = tarjan_scc(&pg);

        let mut points = HashMap::with_capacity(graph.nodes.len());
        let total = components.len().max(1);
        for (ci, members) in components.iter().enumerate() {
            let angle = std::f64::consts::TAU * ci as f64 / total as f64;
            let (ax, ay) = if total == 1 {
                (0.0, 0.0)
            } else {
                (0.55 * angle.cos(), 0.55 * angle.sin())
            };
            for &idx in members {
                let id = pg[idx];
                let point = self.points.remove(id).unwrap_or_else(|| Point {
                    x: ax + self.rng.gen_range(-0.15..0.15),
                    y: ay + self.rng.gen_range(-0.15..0.15),
                    vx: 0.0,
                    vy: 0.0,
                });
                points.insert(id.to_string(), point);
            }
        }

        self.points = points;
        self.graph = Some(graph);
        // Reheat so the new data can rearrange itself.
        self.temperature = 1.0;
    }

    fn graph(&self) -> Option<&ConceptGraph> {
        self.graph.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{ConceptEdge, ConceptNode};

    fn graph(nodes: &[&str], edges: &[(&str, &str, u32)]) -> ConceptGraph {
        ConceptGraph {
            nodes: nodes
                .iter()
                .map(|id| ConceptNode {
                    id: id.to_string(),
                    label: id.to_string(),
                    size: 1,
                    tooltip: String::new(),
                })
                .collect(),
            edges: edges
                .iter()
                .map(|(from, to, weight)| ConceptEdge {
                    from: from.to_string(),
                    to: to.to_string(),
                    weight: *weight,
                })
                .collect(),
        }
    }

    #[test]
    fn apply_positions_every_node() {
        let mut layout = ForceLayout::with_seed(7);
        layout.apply(graph(&["A", "B", "C"], &[("A", "B", 1)]));
        assert_eq!(layout.positions().count(), 3);
        assert!(layout.graph().is_some());
    }

    #[test]
    fn surviving_nodes_keep_their_positions() {
        let mut layout = ForceLayout::with_seed(7);
        layout.apply(graph(&["A", "B"], &[("A", "B", 1)]));
        let before = layout.position_of("A").unwrap();

        // Replace the data: A survives, B vanishes, C is new.
        layout.apply(graph(&["A", "C"], &[("A", "C", 2)]));
        assert_eq!(layout.position_of("A").unwrap(), before);
        assert!(layout.position_of("B").is_none());
        assert!(layout.position_of("C").is_some());
    }

    #[test]
    fn step_keeps_positions_in_bounds() {
        let mut layout = ForceLayout::with_seed(7);
        layout.apply(graph(
            &["A", "B", "C", "D"],
            &[("A", "B", 3), ("B", "C", 1), ("C", "D", 1)],
        ));
        for _ in 0..200 {
            layout.step();
        }
        for (_, x, y) in layout.positions() {
            assert!((-1.0..=1.0).contains(&x));
            assert!((-1.0..=1.0).contains(&y));
        }
    }

    #[test]
    fn simulation_settles_eventually() {
        let mut layout = ForceLayout::with_seed(7);
        layout.apply(graph(&["A", "B"], &[("A", "B", 1)]));
        for _ in 0..20_000 {
            layout.step();
        }
        assert!(layout.is_settled());
    }

    #[test]
    fn step_without_graph_is_a_noop() {
        let mut layout = ForceLayout::with_seed(7);
        layout.step();
        assert_eq!(layout.positions().count(), 0);
    }
}
