//! Diagram style sheet
//!
//! Rules are applied in order; later matching rules override earlier ones.

use serde::Serialize;

use crate::types::{DiagramElement, NodeType};

/// Class applied to elements on a highlighted path
pub const HIGHLIGHTED: &str = "highlighted";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum NodeShape {
    Ellipse,
    Rectangle,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ArrowShape {
    None,
    Triangle,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum CurveStyle {
    Straight,
    Bezier,
}

/// Element selector
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selector {
    /// `node`
    Node,
    /// `node[type="..."]`
    NodeOfType(NodeType),
    /// `edge`
    Edge,
    /// `.class`
    Class(String),
}

impl Selector {
    pub fn matches(&self, element: &DiagramElement) -> bool {
        match self {
            Selector::Node => element.data.is_node(),
            Selector::NodeOfType(t) => element.data.node_type() == Some(*t),
            Selector::Edge => element.data.is_edge(),
            Selector::Class(class) => element.has_class(class),
        }
    }
}

/// Style properties; `None` leaves the cascaded value untouched
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Style {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub background_color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shape: Option<NodeShape>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label_color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text_outline_color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text_outline_width: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_size: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line_color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_arrow_color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_arrow_shape: Option<ArrowShape>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub curve_style: Option<CurveStyle>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transition_ms: Option<u32>,
}

impl Style {
    /// Overlay `other` on top of `self`
    fn merge(&mut self, other: &Style) {
        macro_rules! overlay {
            ($($field:ident),*) => {
                $(if other.$field.is_some() {
                    self.$field = other.$field.clone();
                })*
            };
        }
        overlay!(
            background_color,
            shape,
            label_color,
            text_outline_color,
            text_outline_width,
            font_size,
            width,
            line_color,
            target_arrow_color,
            target_arrow_shape,
            curve_style,
            transition_ms
        );
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct StyleRule {
    pub selector: Selector,
    pub style: Style,
}

/// Ordered list of style rules
#[derive(Debug, Clone, PartialEq)]
pub struct StyleSheet {
    rules: Vec<StyleRule>,
}

impl StyleSheet {
    pub fn new(rules: Vec<StyleRule>) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &[StyleRule] {
        &self.rules
    }

    /// Cascade every matching rule for `element`
    pub fn resolve(&self, element: &DiagramElement) -> Style {
        let mut style = Style::default();
        for rule in self.rules.iter().filter(|r| r.selector.matches(element)) {
            style.merge(&rule.style);
        }
        style
    }

    /// Dashboard styles: agents are blue rectangles, tools orange ellipses,
    /// edges grey arrows, and highlighted elements amber
    pub fn dashboard() -> Self {
        let color = |c: &str| Some(c.to_string());

        Self::new(vec![
            StyleRule {
                selector: Selector::Node,
                style: Style {
                    background_color: color("#4CAF50"),
                    shape: Some(NodeShape::Ellipse),
                    label_color: color("#fff"),
                    text_outline_color: color("#333"),
                    text_outline_width: Some(2.0),
                    font_size: Some(12.0),
                    ..Style::default()
                },
            },
            StyleRule {
                selector: Selector::NodeOfType(NodeType::Agent),
                style: Style {
                    background_color: color("#2196F3"),
                    shape: Some(NodeShape::Rectangle),
                    ..Style::default()
                },
            },
            StyleRule {
                selector: Selector::NodeOfType(NodeType::Tool),
                style: Style {
                    background_color: color("#FF5722"),
                    shape: Some(NodeShape::Ellipse),
                    ..Style::default()
                },
            },
            StyleRule {
                selector: Selector::Edge,
                style: Style {
                    width: Some(2.0),
                    line_color: color("#999"),
                    target_arrow_color: color("#999"),
                    target_arrow_shape: Some(ArrowShape::Triangle),
                    curve_style: Some(CurveStyle::Bezier),
                    ..Style::default()
                },
            },
            StyleRule {
                selector: Selector::Class(HIGHLIGHTED.to_string()),
                style: Style {
                    background_color: color("#FFC107"),
                    line_color: color("#FFC107"),
                    target_arrow_color: color("#FFC107"),
                    transition_ms: Some(500),
                    ..Style::default()
                },
            },
        ])
    }
}

impl Default for StyleSheet {
    fn default() -> Self {
        Self::dashboard()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{EdgeData, ElementData, NodeData};

    fn node(id: &str, node_type: NodeType) -> DiagramElement {
        DiagramElement::new(ElementData::Node(NodeData {
            id: id.to_string(),
            label: id.to_uppercase(),
            node_type,
            input: None,
            output: None,
            tools: vec![],
        }))
    }

    fn edge() -> DiagramElement {
        DiagramElement::new(ElementData::Edge(EdgeData {
            id: "edge-0".to_string(),
            source: "a1".to_string(),
            target: "t1".to_string(),
        }))
    }

    #[test]
    fn test_agent_is_blue_rectangle() {
        let style = StyleSheet::dashboard().resolve(&node("a1", NodeType::Agent));
        assert_eq!(style.shape, Some(NodeShape::Rectangle));
        assert_eq!(style.background_color.as_deref(), Some("#2196F3"));
        assert_eq!(style.font_size, Some(12.0));
    }

    #[test]
    fn test_tool_is_ellipse() {
        let style = StyleSheet::dashboard().resolve(&node("t1", NodeType::Tool));
        assert_eq!(style.shape, Some(NodeShape::Ellipse));
        assert_eq!(style.background_color.as_deref(), Some("#FF5722"));
    }

    #[test]
    fn test_edge_is_arrow() {
        let style = StyleSheet::dashboard().resolve(&edge());
        assert_eq!(style.target_arrow_shape, Some(ArrowShape::Triangle));
        assert!(style.shape.is_none());
    }

    #[test]
    fn test_highlight_overrides_colors() {
        let mut element = edge();
        element.classes.insert(HIGHLIGHTED.to_string());

        let style = StyleSheet::dashboard().resolve(&element);
        assert_eq!(style.line_color.as_deref(), Some("#FFC107"));
        assert_eq!(style.target_arrow_shape, Some(ArrowShape::Triangle));
    }
}
