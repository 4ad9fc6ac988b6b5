//! Shortest-path search over diagram elements

use std::collections::{HashMap, HashSet, VecDeque};

use serde::Serialize;

use crate::types::{DiagramElement, ElementData};

/// Ordered elements along a path: node, edge, node, ...
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ElementPath {
    pub nodes: Vec<String>,
    pub edges: Vec<String>,
}

impl ElementPath {
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Number of edges on the path
    pub fn len(&self) -> usize {
        self.edges.len()
    }

    /// Node and edge ids interleaved in path order
    pub fn element_ids(&self) -> Vec<String> {
        let mut ids = Vec::with_capacity(self.nodes.len() + self.edges.len());
        for (i, node) in self.nodes.iter().enumerate() {
            ids.push(node.clone());
            if let Some(edge) = self.edges.get(i) {
                ids.push(edge.clone());
            }
        }
        ids
    }
}

/// Finds a path between two node ids
///
/// Returns `None` when no path exists. Callers check that both endpoints
/// are present before asking.
pub trait PathFinder: Send + Sync {
    fn find_path(&self, elements: &[DiagramElement], start: &str, goal: &str)
        -> Option<ElementPath>;
}

/// Unit-weight shortest path treating edges as undirected
///
/// With every edge costing 1 and no distance heuristic, A* reduces to a
/// breadth-first search.
#[derive(Debug, Default, Clone)]
pub struct BreadthFirstPathFinder;

impl PathFinder for BreadthFirstPathFinder {
    fn find_path(
        &self,
        elements: &[DiagramElement],
        start: &str,
        goal: &str,
    ) -> Option<ElementPath> {
        let nodes: HashSet<&str> = elements
            .iter()
            .filter(|e| e.data.is_node())
            .map(|e| e.id())
            .collect();
        if !nodes.contains(start) || !nodes.contains(goal) {
            return None;
        }

        // Adjacency: node -> [(neighbor, edge id)] in insertion order
        let mut adjacency: HashMap<&str, Vec<(&str, &str)>> = HashMap::new();
        for element in elements {
            if let ElementData::Edge(edge) = &element.data {
                adjacency
                    .entry(edge.source.as_str())
                    .or_default()
                    .push((edge.target.as_str(), edge.id.as_str()));
                adjacency
                    .entry(edge.target.as_str())
                    .or_default()
                    .push((edge.source.as_str(), edge.id.as_str()));
            }
        }

        // Track how each node was reached: node -> (previous node, edge)
        let mut came_from: HashMap<&str, (&str, &str)> = HashMap::new();
        let mut visited: HashSet<&str> = HashSet::from([start]);
        let mut queue: VecDeque<&str> = VecDeque::from([start]);

        while let Some(current) = queue.pop_front() {
            if current == goal {
                break;
            }
            for &(next, edge) in adjacency.get(current).map(Vec::as_slice).unwrap_or(&[]) {
                if visited.insert(next) {
                    came_from.insert(next, (current, edge));
                    queue.push_back(next);
                }
            }
        }

        if !visited.contains(goal) {
            return None;
        }

        let mut path = ElementPath::default();
        let mut current = goal;
        path.nodes.push(current.to_string());
        while let Some(&(prev, edge)) = came_from.get(current) {
            path.edges.push(edge.to_string());
            path.nodes.push(prev.to_string());
            current = prev;
        }
        path.nodes.reverse();
        path.edges.reverse();

        Some(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{EdgeData, NodeData, NodeType};

    fn node(id: &str) -> DiagramElement {
        DiagramElement::new(ElementData::Node(NodeData {
            id: id.to_string(),
            label: id.to_string(),
            node_type: if id.starts_with('a') {
                NodeType::Agent
            } else {
                NodeType::Tool
            },
            input: None,
            output: None,
            tools: vec![],
        }))
    }

    fn edge(id: &str, source: &str, target: &str) -> DiagramElement {
        DiagramElement::new(ElementData::Edge(EdgeData {
            id: id.to_string(),
            source: source.to_string(),
            target: target.to_string(),
        }))
    }

    fn sample() -> Vec<DiagramElement> {
        vec![
            node("a1"),
            node("t1"),
            edge("e1", "a1", "t1"),
            node("t2"),
            edge("e2", "a1", "t2"),
            node("a2"),
            node("t3"),
            edge("e3", "a2", "t3"),
        ]
    }

    #[test]
    fn test_path_between_siblings_goes_through_agent() {
        let path = BreadthFirstPathFinder
            .find_path(&sample(), "t1", "t2")
            .unwrap();

        assert_eq!(path.nodes, vec!["t1", "a1", "t2"]);
        assert_eq!(path.edges, vec!["e1", "e2"]);
        assert_eq!(path.element_ids(), vec!["t1", "e1", "a1", "e2", "t2"]);
    }

    #[test]
    fn test_edges_are_traversed_backwards() {
        let path = BreadthFirstPathFinder
            .find_path(&sample(), "t3", "a2")
            .unwrap();
        assert_eq!(path.nodes, vec!["t3", "a2"]);
        assert_eq!(path.len(), 1);
    }

    #[test]
    fn test_disconnected_nodes_have_no_path() {
        assert!(BreadthFirstPathFinder
            .find_path(&sample(), "a1", "a2")
            .is_none());
    }

    #[test]
    fn test_unknown_node_has_no_path() {
        assert!(BreadthFirstPathFinder
            .find_path(&sample(), "a1", "missing")
            .is_none());
    }

    #[test]
    fn test_path_to_self_is_single_node() {
        let path = BreadthFirstPathFinder
            .find_path(&sample(), "a1", "a1")
            .unwrap();
        assert_eq!(path.nodes, vec!["a1"]);
        assert!(path.edges.is_empty());
    }
}
