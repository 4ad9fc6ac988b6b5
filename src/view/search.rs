//! Element id search
//!
//! Case-insensitive substring match on element ids. Large diagrams are
//! scanned in parallel.

use rayon::prelude::*;

use crate::types::DiagramElement;

/// Threshold for using parallel search (element count)
const PARALLEL_SEARCH_THRESHOLD: usize = 1000;

/// Whether `id` contains `query`, ignoring case
pub fn id_matches(id: &str, query_lower: &str) -> bool {
    id.to_lowercase().contains(query_lower)
}

/// Indices of elements whose id contains `query`, in diagram order
///
/// An empty query matches nothing.
pub fn matching_indices(elements: &[DiagramElement], query: &str) -> Vec<usize> {
    if query.is_empty() {
        return Vec::new();
    }
    let query_lower = query.to_lowercase();

    if elements.len() > PARALLEL_SEARCH_THRESHOLD {
        elements
            .par_iter()
            .enumerate()
            .filter(|(_, e)| id_matches(e.id(), &query_lower))
            .map(|(i, _)| i)
            .collect()
    } else {
        elements
            .iter()
            .enumerate()
            .filter(|(_, e)| id_matches(e.id(), &query_lower))
            .map(|(i, _)| i)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ElementData, NodeData, NodeType};

    fn node(id: &str) -> DiagramElement {
        DiagramElement::new(ElementData::Node(NodeData {
            id: id.to_string(),
            label: id.to_string(),
            node_type: NodeType::Tool,
            input: None,
            output: None,
            tools: vec![],
        }))
    }

    #[test]
    fn test_substring_case_insensitive() {
        let elements = vec![node("Search-Tool"), node("planner"), node("web_search")];
        assert_eq!(matching_indices(&elements, "SEARCH"), vec![0, 2]);
    }

    #[test]
    fn test_empty_query_matches_nothing() {
        let elements = vec![node("a1")];
        assert!(matching_indices(&elements, "").is_empty());
    }

    #[test]
    fn test_parallel_path_preserves_order() {
        let elements: Vec<_> = (0..1500).map(|i| node(&format!("n{}", i))).collect();
        let hits = matching_indices(&elements, "n14");
        assert_eq!(hits.first(), Some(&14));
        assert!(hits.windows(2).all(|w| w[0] < w[1]));
        assert_eq!(hits.len(), 1 + 10 + 100);
    }
}
