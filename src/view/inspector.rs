//! Detail panel contents for the selected element

use serde::Serialize;

use crate::types::{DiagramElement, ElementData};

/// What the detail inspector shows for one element
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Inspection {
    pub id: String,
    /// Label, falling back to the id
    pub title: String,
    /// `agent`, `tool`, or `N/A` for edges
    #[serde(rename = "type")]
    pub element_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub input: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub connected_tools: Vec<String>,
}

impl Inspection {
    pub fn of(element: &DiagramElement) -> Self {
        match &element.data {
            ElementData::Node(node) => Self {
                id: node.id.clone(),
                title: if node.label.is_empty() {
                    node.id.clone()
                } else {
                    node.label.clone()
                },
                element_type: node.node_type.to_string(),
                input: node.input.clone().filter(|s| !s.is_empty()),
                output: node.output.clone().filter(|s| !s.is_empty()),
                connected_tools: node.tools.clone(),
            },
            ElementData::Edge(edge) => Self {
                id: edge.id.clone(),
                title: edge.id.clone(),
                element_type: "N/A".to_string(),
                input: None,
                output: None,
                connected_tools: Vec::new(),
            },
        }
    }
}
