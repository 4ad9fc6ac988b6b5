//! Graph view controller
//!
//! Owns the diagram instance, turns snapshots into diagram elements and
//! exposes the dashboard operations: search, type filter, zoom, path
//! highlight and the detail inspector.

use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use tracing::{debug, info};

use super::diagram::{AddSummary, Diagram, DiagramEvent, EventKind};
use super::inspector::Inspection;
use super::layout::{ForceDirectedLayout, LayoutProvider};
use super::path::{BreadthFirstPathFinder, ElementPath, PathFinder};
use super::style::{Style, StyleSheet, HIGHLIGHTED};
use super::viewport::Viewport;
use crate::types::{EdgeData, ElementData, GraphError, GraphSnapshot, NodeData, NodeType};

/// Multiplier applied by zoom in / zoom out
pub const ZOOM_STEP: f64 = 1.2;

/// Screen padding used when fitting the viewport
pub const FIT_PADDING: f64 = 50.0;

const DEFAULT_WIDTH: f64 = 800.0;
const DEFAULT_HEIGHT: f64 = 600.0;

/// Type filter choice
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FilterType {
    #[default]
    All,
    Only(NodeType),
}

impl FromStr for FilterType {
    type Err = GraphError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "all" => Ok(FilterType::All),
            other => other.parse::<NodeType>().map(FilterType::Only),
        }
    }
}

impl fmt::Display for FilterType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FilterType::All => f.write_str("all"),
            FilterType::Only(t) => write!(f, "{}", t),
        }
    }
}

/// Client-side view-model for the live graph
pub struct GraphViewController {
    diagram: Diagram,
    selected: Option<Inspection>,
    zoom_level: f64,
    filter: FilterType,
    search_term: String,
    edge_seq: u64,
    snapshot_idx: Option<String>,
}

impl Default for GraphViewController {
    fn default() -> Self {
        Self::new()
    }
}

impl GraphViewController {
    /// Mount with the dashboard style sheet and a force-directed layout
    pub fn new() -> Self {
        Self::with_parts(
            Viewport::new(DEFAULT_WIDTH, DEFAULT_HEIGHT),
            Box::new(ForceDirectedLayout::default()),
            Box::new(BreadthFirstPathFinder),
        )
    }

    /// Mount with custom viewport, layout provider and path-finder
    pub fn with_parts(
        viewport: Viewport,
        layout: Box<dyn LayoutProvider>,
        path_finder: Box<dyn PathFinder>,
    ) -> Self {
        let mut diagram = Diagram::new(viewport, StyleSheet::dashboard(), layout, path_finder);

        // Zoom tracking, element tap -> selection, background tap -> clear
        diagram.on(EventKind::Zoom);
        diagram.on(EventKind::TapElement);
        diagram.on(EventKind::TapBackground);

        let zoom_level = diagram.zoom();
        Self {
            diagram,
            selected: None,
            zoom_level,
            filter: FilterType::All,
            search_term: String::new(),
            edge_seq: 0,
            snapshot_idx: None,
        }
    }

    fn dispatch_events(&mut self) {
        for event in self.diagram.drain_events() {
            match event {
                DiagramEvent::Zoom(level) => self.zoom_level = level,
                DiagramEvent::TapElement(id) => {
                    self.selected = self.diagram.get(&id).map(Inspection::of);
                }
                DiagramEvent::TapBackground => self.selected = None,
            }
        }
    }

    // ---- snapshots ------------------------------------------------------

    /// Replace the whole diagram with the contents of `snapshot`
    pub fn apply_snapshot(&mut self, snapshot: &GraphSnapshot) -> AddSummary {
        self.diagram.clear();
        self.selected = None;

        let elements = self.elements_for(snapshot);
        let summary = self.diagram.add(elements);
        self.diagram.run_layout();
        self.diagram.fit(None, FIT_PADDING);
        self.apply_filter();
        self.snapshot_idx = Some(snapshot.idx.clone());
        self.dispatch_events();

        info!(
            snapshot = %snapshot.idx,
            nodes = summary.nodes,
            edges = summary.edges,
            skipped = summary.skipped,
            "Diagram replaced"
        );
        summary
    }

    /// One node per agent and tool, one edge per agent -> tool pair
    fn elements_for(&mut self, snapshot: &GraphSnapshot) -> Vec<ElementData> {
        let node_ids: HashSet<&str> = snapshot
            .agents
            .iter()
            .flat_map(|a| {
                std::iter::once(a.idx.as_str()).chain(a.tools.iter().map(|t| t.idx.as_str()))
            })
            .collect();
        let mut elements = Vec::with_capacity(snapshot.agent_count() + 2 * snapshot.tool_count());

        for agent in &snapshot.agents {
            elements.push(ElementData::Node(NodeData {
                id: agent.idx.clone(),
                label: agent.name.clone(),
                node_type: NodeType::Agent,
                input: None,
                output: Some(agent.output.clone()),
                tools: agent.tools.iter().map(|t| t.name.clone()).collect(),
            }));

            for tool in &agent.tools {
                elements.push(ElementData::Node(NodeData {
                    id: tool.idx.clone(),
                    label: tool.name.clone(),
                    node_type: NodeType::Tool,
                    input: Some(tool.input.clone()),
                    output: Some(tool.output.clone()),
                    tools: Vec::new(),
                }));
                elements.push(ElementData::Edge(EdgeData {
                    id: self.next_edge_id(&node_ids),
                    source: agent.idx.clone(),
                    target: tool.idx.clone(),
                }));
            }
        }

        elements
    }

    /// Next generated edge id not taken by a node of the snapshot
    fn next_edge_id(&mut self, node_ids: &HashSet<&str>) -> String {
        loop {
            let id = format!("edge-{}", self.edge_seq);
            self.edge_seq += 1;
            if !node_ids.contains(id.as_str()) {
                return id;
            }
        }
    }

    // ---- search ---------------------------------------------------------

    /// Select and frame every element whose id contains `query`
    ///
    /// Returns the matched ids. With no match the selection and viewport
    /// are left untouched.
    pub fn search(&mut self, query: &str) -> Vec<String> {
        self.search_term = query.to_string();
        let found = self.diagram.find_ids(query);
        if found.is_empty() {
            debug!(query, "Search matched nothing");
            return found;
        }

        self.diagram.unselect_all();
        self.diagram.select(&found);
        self.diagram.fit(Some(found.as_slice()), FIT_PADDING);
        self.dispatch_events();
        found
    }

    pub fn search_term(&self) -> &str {
        &self.search_term
    }

    // ---- filter ---------------------------------------------------------

    /// Show only elements of the chosen type, or everything for `All`
    pub fn filter(&mut self, filter: FilterType) {
        self.filter = filter;
        self.apply_filter();
    }

    fn apply_filter(&mut self) {
        match self.filter {
            FilterType::All => self.diagram.set_hidden_where(|_| false),
            FilterType::Only(wanted) => self
                .diagram
                .set_hidden_where(|e| e.data.node_type() != Some(wanted)),
        }
    }

    pub fn active_filter(&self) -> FilterType {
        self.filter
    }

    // ---- zoom -----------------------------------------------------------

    pub fn zoom_in(&mut self) {
        let level = self.diagram.zoom() * ZOOM_STEP;
        self.diagram.set_zoom(level);
        self.dispatch_events();
    }

    pub fn zoom_out(&mut self) {
        let level = self.diagram.zoom() / ZOOM_STEP;
        self.diagram.set_zoom(level);
        self.dispatch_events();
    }

    /// Fit the viewport to every element
    pub fn fit(&mut self) {
        self.diagram.fit(None, 0.0);
        self.dispatch_events();
    }

    /// Zoom level as last reported by the diagram
    pub fn zoom_level(&self) -> f64 {
        self.zoom_level
    }

    // ---- path highlight -------------------------------------------------

    /// Highlight the shortest path between two nodes
    ///
    /// Unknown endpoints leave the diagram untouched and yield an empty
    /// path. Otherwise previous highlighting is cleared first, so a
    /// disconnected pair ends with nothing highlighted.
    pub fn highlight_path(&mut self, start: &str, end: &str) -> ElementPath {
        let known = |id: &str| self.diagram.get(id).map_or(false, |e| e.data.is_node());
        if !known(start) || !known(end) {
            debug!(start, end, "Path endpoints not in diagram");
            return ElementPath::default();
        }

        let path = self.diagram.shortest_path(start, end).unwrap_or_default();
        self.diagram.remove_class_all(HIGHLIGHTED);
        self.diagram.add_class(&path.element_ids(), HIGHLIGHTED);
        path
    }

    // ---- taps & inspector -----------------------------------------------

    pub fn tap(&mut self, id: &str) {
        self.diagram.tap(id);
        self.dispatch_events();
    }

    pub fn tap_background(&mut self) {
        self.diagram.tap_background();
        self.dispatch_events();
    }

    /// Inspector contents for the tapped element
    pub fn selected(&self) -> Option<&Inspection> {
        self.selected.as_ref()
    }

    // ---- accessors ------------------------------------------------------

    pub fn diagram(&self) -> &Diagram {
        &self.diagram
    }

    pub fn resolved_style(&self, id: &str) -> Option<Style> {
        self.diagram.style_of(id)
    }

    /// Id of the snapshot currently displayed
    pub fn snapshot_idx(&self) -> Option<&str> {
        self.snapshot_idx.as_deref()
    }
}
