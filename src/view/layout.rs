//! Layout providers
//!
//! The diagram asks a [`LayoutProvider`] for node positions after every
//! replace. The default provider runs a force-directed simulation.

use std::collections::HashMap;
use std::f64::consts::PI;

use force_graph::{EdgeData, ForceGraph, NodeData, SimulationParameters};

use crate::types::Position;

/// Positions nodes given their count and the edges between them
///
/// `edges` are index pairs into the node list. The result must hold one
/// position per node, in node order.
pub trait LayoutProvider: Send + Sync {
    fn name(&self) -> &str;

    fn layout(&self, node_count: usize, edges: &[(usize, usize)]) -> Vec<Position>;
}

/// Force-directed layout backed by `force_graph`
#[derive(Debug, Clone)]
pub struct ForceDirectedLayout {
    /// Radius of the initial ring nodes start on
    pub seed_radius: f64,
    /// Simulation steps run per layout
    pub iterations: usize,
    /// Time step per iteration
    pub dt: f32,
}

impl Default for ForceDirectedLayout {
    fn default() -> Self {
        Self {
            seed_radius: 100.0,
            iterations: 300,
            dt: 0.016,
        }
    }
}

impl ForceDirectedLayout {
    fn parameters() -> SimulationParameters {
        SimulationParameters {
            force_charge: 150.0,
            force_spring: 0.05,
            force_max: 100.0,
            node_speed: 3000.0,
            damping_factor: 0.9,
        }
    }
}

impl LayoutProvider for ForceDirectedLayout {
    fn name(&self) -> &str {
        "cose"
    }

    fn layout(&self, node_count: usize, edges: &[(usize, usize)]) -> Vec<Position> {
        if node_count == 0 {
            return Vec::new();
        }

        let mut graph: ForceGraph<usize, ()> = ForceGraph::new(Self::parameters());
        let mut handles = Vec::with_capacity(node_count);

        for i in 0..node_count {
            let angle = (i as f64) * 2.0 * PI / node_count as f64;
            let idx = graph.add_node(NodeData {
                x: (self.seed_radius * angle.cos()) as f32,
                y: (self.seed_radius * angle.sin()) as f32,
                mass: 10.0,
                is_anchor: false,
                user_data: i,
            });
            handles.push(idx);
        }

        for &(src, tgt) in edges {
            if let (Some(&a), Some(&b)) = (handles.get(src), handles.get(tgt)) {
                graph.add_edge(a, b, EdgeData::default());
            }
        }

        for _ in 0..self.iterations {
            graph.update(self.dt);
        }

        let mut positions: HashMap<usize, Position> = HashMap::with_capacity(node_count);
        graph.visit_nodes(|node| {
            positions.insert(
                node.data.user_data,
                Position::new(node.x() as f64, node.y() as f64),
            );
        });

        (0..node_count)
            .map(|i| {
                positions
                    .get(&i)
                    .copied()
                    .filter(|p| p.x.is_finite() && p.y.is_finite())
                    .unwrap_or_else(|| ring_position(i, node_count, self.seed_radius))
            })
            .collect()
    }
}

/// Places nodes evenly on a circle
#[derive(Debug, Clone)]
pub struct CircleLayout {
    pub radius: f64,
}

impl Default for CircleLayout {
    fn default() -> Self {
        Self { radius: 100.0 }
    }
}

impl LayoutProvider for CircleLayout {
    fn name(&self) -> &str {
        "circle"
    }

    fn layout(&self, node_count: usize, _edges: &[(usize, usize)]) -> Vec<Position> {
        (0..node_count)
            .map(|i| ring_position(i, node_count, self.radius))
            .collect()
    }
}

fn ring_position(i: usize, count: usize, radius: f64) -> Position {
    let angle = (i as f64) * 2.0 * PI / count.max(1) as f64;
    Position::new(radius * angle.cos(), radius * angle.sin())
}
