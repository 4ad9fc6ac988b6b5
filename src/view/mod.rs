//! Graph view: the diagram view-model driven by pushed snapshots
//!
//! [`GraphViewController`] owns a [`Diagram`] and replaces its contents on
//! every snapshot. Layout and path-finding are pluggable through
//! [`LayoutProvider`] and [`PathFinder`].

pub mod controller;
pub mod diagram;
pub mod inspector;
pub mod layout;
pub mod path;
pub mod search;
pub mod style;
pub mod viewport;

pub use controller::{FilterType, GraphViewController, FIT_PADDING, ZOOM_STEP};
pub use diagram::{AddSummary, Diagram, DiagramEvent, EventKind};
pub use inspector::Inspection;
pub use layout::{CircleLayout, ForceDirectedLayout, LayoutProvider};
pub use path::{BreadthFirstPathFinder, ElementPath, PathFinder};
pub use style::{Style, StyleSheet, HIGHLIGHTED};
pub use viewport::{BoundingBox, Viewport, MAX_ZOOM, MIN_ZOOM};
