//! Diagram instance: elements, viewport and interaction events

use std::collections::{HashMap, HashSet};

use tracing::{debug, warn};

use super::layout::LayoutProvider;
use super::path::{ElementPath, PathFinder};
use super::search;
use super::style::{Style, StyleSheet};
use super::viewport::{BoundingBox, Viewport};
use crate::types::{DiagramElement, ElementData};

/// Interaction events queued by the diagram
#[derive(Debug, Clone, PartialEq)]
pub enum DiagramEvent {
    /// Zoom level changed
    Zoom(f64),
    /// An element was tapped
    TapElement(String),
    /// Empty background was tapped
    TapBackground,
}

/// Event kinds handlers can register for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    Zoom,
    TapElement,
    TapBackground,
}

impl DiagramEvent {
    pub fn kind(&self) -> EventKind {
        match self {
            DiagramEvent::Zoom(_) => EventKind::Zoom,
            DiagramEvent::TapElement(_) => EventKind::TapElement,
            DiagramEvent::TapBackground => EventKind::TapBackground,
        }
    }
}

/// Element counts after an add
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AddSummary {
    pub nodes: usize,
    pub edges: usize,
    /// Elements rejected for a duplicate id or a missing endpoint
    pub skipped: usize,
}

/// In-memory diagram: ordered elements plus a viewport
pub struct Diagram {
    elements: Vec<DiagramElement>,
    index: HashMap<String, usize>,
    viewport: Viewport,
    style: StyleSheet,
    layout: Box<dyn LayoutProvider>,
    path_finder: Box<dyn PathFinder>,
    listening: HashSet<EventKind>,
    events: Vec<DiagramEvent>,
}

impl Diagram {
    pub fn new(
        viewport: Viewport,
        style: StyleSheet,
        layout: Box<dyn LayoutProvider>,
        path_finder: Box<dyn PathFinder>,
    ) -> Self {
        Self {
            elements: Vec::new(),
            index: HashMap::new(),
            viewport,
            style,
            layout,
            path_finder,
            listening: HashSet::new(),
            events: Vec::new(),
        }
    }

    /// Start queueing events of `kind`
    pub fn on(&mut self, kind: EventKind) {
        self.listening.insert(kind);
    }

    fn emit(&mut self, event: DiagramEvent) {
        if self.listening.contains(&event.kind()) {
            self.events.push(event);
        }
    }

    /// Take every queued event, oldest first
    pub fn drain_events(&mut self) -> Vec<DiagramEvent> {
        std::mem::take(&mut self.events)
    }

    // ---- elements -------------------------------------------------------

    pub fn elements(&self) -> &[DiagramElement] {
        &self.elements
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&DiagramElement> {
        self.index.get(id).map(|&i| &self.elements[i])
    }

    pub fn nodes(&self) -> impl Iterator<Item = &DiagramElement> {
        self.elements.iter().filter(|e| e.data.is_node())
    }

    pub fn edges(&self) -> impl Iterator<Item = &DiagramElement> {
        self.elements.iter().filter(|e| e.data.is_edge())
    }

    /// Remove every element
    pub fn clear(&mut self) {
        self.elements.clear();
        self.index.clear();
    }

    /// Add elements in order
    ///
    /// A node whose id already exists is skipped. An edge is skipped if its
    /// id exists or either endpoint is not a node in the diagram.
    pub fn add(&mut self, elements: Vec<ElementData>) -> AddSummary {
        let mut summary = AddSummary::default();

        for data in elements {
            if self.index.contains_key(data.id()) {
                warn!(id = data.id(), "Skipping element with duplicate id");
                summary.skipped += 1;
                continue;
            }

            if let ElementData::Edge(edge) = &data {
                let endpoint_ok = |id: &str| self.get(id).map_or(false, |e| e.data.is_node());
                if !endpoint_ok(&edge.source) || !endpoint_ok(&edge.target) {
                    warn!(
                        source = %edge.source,
                        target = %edge.target,
                        "Skipping edge with missing endpoint"
                    );
                    summary.skipped += 1;
                    continue;
                }
                summary.edges += 1;
            } else {
                summary.nodes += 1;
            }

            self.index.insert(data.id().to_string(), self.elements.len());
            self.elements.push(DiagramElement::new(data));
        }

        summary
    }

    /// Run the layout provider over every node
    pub fn run_layout(&mut self) {
        let node_indices: Vec<usize> = self
            .elements
            .iter()
            .enumerate()
            .filter(|(_, e)| e.data.is_node())
            .map(|(i, _)| i)
            .collect();
        let slot: HashMap<&str, usize> = node_indices
            .iter()
            .enumerate()
            .map(|(slot, &i)| (self.elements[i].id(), slot))
            .collect();
        let edges: Vec<(usize, usize)> = self
            .edges()
            .filter_map(|e| e.as_edge())
            .filter_map(|e| Some((*slot.get(e.source.as_str())?, *slot.get(e.target.as_str())?)))
            .collect();

        let positions = self.layout.layout(node_indices.len(), &edges);
        debug!(
            layout = self.layout.name(),
            nodes = node_indices.len(),
            edges = edges.len(),
            "Layout complete"
        );

        for (i, position) in node_indices.into_iter().zip(positions) {
            self.elements[i].position = Some(position);
        }
    }

    // ---- visibility -----------------------------------------------------

    /// Set the hidden flag on every element for which `hide` returns true,
    /// clearing it on the rest
    pub fn set_hidden_where<F>(&mut self, hide: F)
    where
        F: Fn(&DiagramElement) -> bool,
    {
        for element in &mut self.elements {
            element.hidden = hide(element);
        }
    }

    /// Whether the element is displayed
    ///
    /// Edges are displayed only when they and both endpoints are.
    pub fn is_visible(&self, id: &str) -> bool {
        let Some(element) = self.get(id) else {
            return false;
        };
        if element.hidden {
            return false;
        }
        match &element.data {
            ElementData::Edge(edge) => {
                self.get(&edge.source).map_or(false, |n| !n.hidden)
                    && self.get(&edge.target).map_or(false, |n| !n.hidden)
            }
            ElementData::Node(_) => true,
        }
    }

    pub fn visible_ids(&self) -> Vec<&str> {
        self.elements
            .iter()
            .map(|e| e.id())
            .filter(|id| self.is_visible(id))
            .collect()
    }

    // ---- selection ------------------------------------------------------

    pub fn unselect_all(&mut self) {
        for element in &mut self.elements {
            element.selected = false;
        }
    }

    pub fn select(&mut self, ids: &[String]) {
        for id in ids {
            if let Some(&i) = self.index.get(id) {
                self.elements[i].selected = true;
            }
        }
    }

    pub fn selected_ids(&self) -> Vec<&str> {
        self.elements
            .iter()
            .filter(|e| e.selected)
            .map(|e| e.id())
            .collect()
    }

    /// Ids of elements matching `query` (see [`search::matching_indices`])
    pub fn find_ids(&self, query: &str) -> Vec<String> {
        search::matching_indices(&self.elements, query)
            .into_iter()
            .map(|i| self.elements[i].id().to_string())
            .collect()
    }

    // ---- classes --------------------------------------------------------

    pub fn add_class(&mut self, ids: &[String], class: &str) {
        for id in ids {
            if let Some(&i) = self.index.get(id) {
                self.elements[i].classes.insert(class.to_string());
            }
        }
    }

    pub fn remove_class_all(&mut self, class: &str) {
        for element in &mut self.elements {
            element.classes.remove(class);
        }
    }

    pub fn ids_with_class(&self, class: &str) -> Vec<&str> {
        self.elements
            .iter()
            .filter(|e| e.has_class(class))
            .map(|e| e.id())
            .collect()
    }

    /// Cascaded style for an element
    pub fn style_of(&self, id: &str) -> Option<Style> {
        self.get(id).map(|e| self.style.resolve(e))
    }

    // ---- paths ----------------------------------------------------------

    pub fn shortest_path(&self, start: &str, goal: &str) -> Option<ElementPath> {
        self.path_finder.find_path(&self.elements, start, goal)
    }

    // ---- viewport -------------------------------------------------------

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn zoom(&self) -> f64 {
        self.viewport.zoom()
    }

    pub fn set_zoom(&mut self, level: f64) {
        if self.viewport.set_zoom(level) {
            let zoom = self.viewport.zoom();
            self.emit(DiagramEvent::Zoom(zoom));
        }
    }

    /// Fit the viewport to the given elements (all elements if `None`)
    ///
    /// Edges contribute their endpoints. Does nothing if no positioned
    /// element is involved.
    pub fn fit(&mut self, ids: Option<&[String]>, padding: f64) {
        let positions: Vec<_> = match ids {
            None => self.elements.iter().filter_map(|e| e.position).collect(),
            Some(ids) => ids
                .iter()
                .filter_map(|id| self.get(id))
                .flat_map(|e| match &e.data {
                    ElementData::Node(_) => vec![e.position],
                    ElementData::Edge(edge) => vec![
                        self.get(&edge.source).and_then(|n| n.position),
                        self.get(&edge.target).and_then(|n| n.position),
                    ],
                })
                .flatten()
                .collect(),
        };

        if let Some(bbox) = BoundingBox::enclosing(positions) {
            if self.viewport.fit(bbox, padding) {
                let zoom = self.viewport.zoom();
                self.emit(DiagramEvent::Zoom(zoom));
            }
        }
    }

    // ---- taps -----------------------------------------------------------

    /// Tap an element: it becomes the only selected element
    ///
    /// Unknown ids are treated as a background tap.
    pub fn tap(&mut self, id: &str) {
        if self.index.contains_key(id) {
            self.unselect_all();
            self.select(&[id.to_string()]);
            self.emit(DiagramEvent::TapElement(id.to_string()));
        } else {
            self.tap_background();
        }
    }

    /// Tap the empty background: clears the selection
    pub fn tap_background(&mut self) {
        self.unselect_all();
        self.emit(DiagramEvent::TapBackground);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{EdgeData, NodeData, NodeType};
    use crate::view::layout::CircleLayout;
    use crate::view::path::BreadthFirstPathFinder;

    fn diagram() -> Diagram {
        Diagram::new(
            Viewport::new(800.0, 600.0),
            StyleSheet::dashboard(),
            Box::new(CircleLayout::default()),
            Box::new(BreadthFirstPathFinder),
        )
    }

    fn node(id: &str, node_type: NodeType) -> ElementData {
        ElementData::Node(NodeData {
            id: id.to_string(),
            label: id.to_string(),
            node_type,
            input: None,
            output: None,
            tools: vec![],
        })
    }

    fn edge(id: &str, source: &str, target: &str) -> ElementData {
        ElementData::Edge(EdgeData {
            id: id.to_string(),
            source: source.to_string(),
            target: target.to_string(),
        })
    }

    #[test]
    fn test_add_skips_duplicates_and_dangling_edges() {
        let mut d = diagram();
        let summary = d.add(vec![
            node("a1", NodeType::Agent),
            node("a1", NodeType::Agent),
            node("t1", NodeType::Tool),
            edge("e1", "a1", "t1"),
            edge("e2", "a1", "ghost"),
        ]);

        assert_eq!(summary, AddSummary { nodes: 2, edges: 1, skipped: 2 });
        assert_eq!(d.len(), 3);
    }

    #[test]
    fn test_edge_hidden_with_endpoint() {
        let mut d = diagram();
        d.add(vec![
            node("a1", NodeType::Agent),
            node("t1", NodeType::Tool),
            edge("e1", "a1", "t1"),
        ]);

        d.set_hidden_where(|e| e.id() == "t1");
        assert!(d.is_visible("a1"));
        assert!(!d.is_visible("t1"));
        assert!(!d.is_visible("e1"));
    }

    #[test]
    fn test_events_only_queued_when_listening() {
        let mut d = diagram();
        d.add(vec![node("a1", NodeType::Agent)]);

        d.tap("a1");
        assert!(d.drain_events().is_empty());

        d.on(EventKind::TapElement);
        d.tap("a1");
        assert_eq!(d.drain_events(), vec![DiagramEvent::TapElement("a1".to_string())]);
        assert!(d.drain_events().is_empty());
    }

    #[test]
    fn test_tap_unknown_is_background() {
        let mut d = diagram();
        d.on(EventKind::TapBackground);
        d.tap("nothing");
        assert_eq!(d.drain_events(), vec![DiagramEvent::TapBackground]);
    }

    #[test]
    fn test_layout_positions_nodes_only() {
        let mut d = diagram();
        d.add(vec![
            node("a1", NodeType::Agent),
            node("t1", NodeType::Tool),
            edge("e1", "a1", "t1"),
        ]);
        d.run_layout();

        assert!(d.get("a1").unwrap().position.is_some());
        assert!(d.get("t1").unwrap().position.is_some());
        assert!(d.get("e1").unwrap().position.is_none());
    }

    #[test]
    fn test_fit_emits_zoom_when_level_changes() {
        let mut d = diagram();
        d.on(EventKind::Zoom);
        d.add(vec![node("a1", NodeType::Agent)]);
        d.run_layout();

        d.fit(None, 50.0);
        assert!(matches!(d.drain_events().as_slice(), [DiagramEvent::Zoom(z)] if *z == 3.0));
    }
}
