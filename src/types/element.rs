//! Diagram element types derived from snapshots

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::GraphError;

/// Node type used by style selectors and filters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeType {
    Agent,
    Tool,
}

impl NodeType {
    pub fn as_str(&self) -> &'static str {
        match self {
            NodeType::Agent => "agent",
            NodeType::Tool => "tool",
        }
    }
}

impl fmt::Display for NodeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NodeType {
    type Err = GraphError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "agent" => Ok(NodeType::Agent),
            "tool" => Ok(NodeType::Tool),
            other => Err(GraphError::UnknownElementType(other.to_string())),
        }
    }
}

/// Data carried by a node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeData {
    pub id: String,
    pub label: String,
    #[serde(rename = "type")]
    pub node_type: NodeType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub input: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<String>,
    /// Names of connected tools (agents only)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tools: Vec<String>,
}

/// Data carried by a directed edge
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EdgeData {
    pub id: String,
    pub source: String,
    pub target: String,
}

/// Element payload: node or edge
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "group", rename_all = "lowercase")]
pub enum ElementData {
    Node(NodeData),
    Edge(EdgeData),
}

impl ElementData {
    pub fn id(&self) -> &str {
        match self {
            ElementData::Node(n) => &n.id,
            ElementData::Edge(e) => &e.id,
        }
    }

    /// Node type, `None` for edges
    pub fn node_type(&self) -> Option<NodeType> {
        match self {
            ElementData::Node(n) => Some(n.node_type),
            ElementData::Edge(_) => None,
        }
    }

    pub fn is_node(&self) -> bool {
        matches!(self, ElementData::Node(_))
    }

    pub fn is_edge(&self) -> bool {
        matches!(self, ElementData::Edge(_))
    }
}

/// Position in model coordinates
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// A node or edge living in a diagram
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiagramElement {
    pub data: ElementData,
    /// Node position (edges follow their endpoints)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<Position>,
    #[serde(default)]
    pub hidden: bool,
    #[serde(default)]
    pub selected: bool,
    #[serde(default)]
    pub classes: BTreeSet<String>,
}

impl DiagramElement {
    pub fn new(data: ElementData) -> Self {
        Self {
            data,
            position: None,
            hidden: false,
            selected: false,
            classes: BTreeSet::new(),
        }
    }

    pub fn id(&self) -> &str {
        self.data.id()
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes.contains(class)
    }

    pub fn as_node(&self) -> Option<&NodeData> {
        match &self.data {
            ElementData::Node(n) => Some(n),
            ElementData::Edge(_) => None,
        }
    }

    pub fn as_edge(&self) -> Option<&EdgeData> {
        match &self.data {
            ElementData::Edge(e) => Some(e),
            ElementData::Node(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_type_parsing() {
        assert_eq!("agent".parse::<NodeType>().unwrap(), NodeType::Agent);
        assert_eq!("tool".parse::<NodeType>().unwrap(), NodeType::Tool);
        assert!("robot".parse::<NodeType>().is_err());
    }

    #[test]
    fn test_node_serializes_type_field() {
        let node = ElementData::Node(NodeData {
            id: "a1".to_string(),
            label: "Agent 1".to_string(),
            node_type: NodeType::Agent,
            input: None,
            output: None,
            tools: vec![],
        });

        let json = serde_json::to_string(&node).unwrap();
        assert!(json.contains(r#""group":"node""#));
        assert!(json.contains(r#""type":"agent""#));
        assert!(!json.contains("input"));
    }
}
