//! Viewport transform: zoom level and pan

use crate::types::Position;

/// Zoom limits applied to every zoom change
pub const MIN_ZOOM: f64 = 0.1;
pub const MAX_ZOOM: f64 = 3.0;

/// Side length of the box a node occupies in model coordinates
pub const NODE_SIZE: f64 = 30.0;

/// Axis-aligned bounding box in model coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
}

impl BoundingBox {
    /// Box around a single node centred at `p`
    pub fn around(p: Position) -> Self {
        let half = NODE_SIZE / 2.0;
        Self {
            x1: p.x - half,
            y1: p.y - half,
            x2: p.x + half,
            y2: p.y + half,
        }
    }

    /// Smallest box containing every node position, `None` if empty
    pub fn enclosing<I>(positions: I) -> Option<Self>
    where
        I: IntoIterator<Item = Position>,
    {
        positions
            .into_iter()
            .map(Self::around)
            .reduce(|a, b| Self {
                x1: a.x1.min(b.x1),
                y1: a.y1.min(b.y1),
                x2: a.x2.max(b.x2),
                y2: a.y2.max(b.y2),
            })
    }

    pub fn width(&self) -> f64 {
        self.x2 - self.x1
    }

    pub fn height(&self) -> f64 {
        self.y2 - self.y1
    }

    pub fn center(&self) -> Position {
        Position::new((self.x1 + self.x2) / 2.0, (self.y1 + self.y2) / 2.0)
    }

    pub fn contains(&self, p: Position) -> bool {
        p.x >= self.x1 && p.x <= self.x2 && p.y >= self.y1 && p.y <= self.y2
    }
}

/// Maps model coordinates to screen coordinates: `screen = model * zoom + pan`
#[derive(Debug, Clone, PartialEq)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
    zoom: f64,
    pan: Position,
    min_zoom: f64,
    max_zoom: f64,
}

impl Viewport {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            zoom: 1.0,
            pan: Position::default(),
            min_zoom: MIN_ZOOM,
            max_zoom: MAX_ZOOM,
        }
    }

    pub fn zoom(&self) -> f64 {
        self.zoom
    }

    pub fn pan(&self) -> Position {
        self.pan
    }

    fn clamp(&self, level: f64) -> f64 {
        level.clamp(self.min_zoom, self.max_zoom)
    }

    /// Set zoom around the viewport centre. Returns `true` if it changed.
    pub fn set_zoom(&mut self, level: f64) -> bool {
        let level = self.clamp(level);
        if (level - self.zoom).abs() < f64::EPSILON {
            return false;
        }

        let center = Position::new(self.width / 2.0, self.height / 2.0);
        let model = self.to_model(center);
        self.zoom = level;
        self.pan = Position::new(center.x - model.x * level, center.y - model.y * level);
        true
    }

    /// Fit `bbox` inside the viewport leaving `padding` screen pixels on each side
    ///
    /// Returns `true` if the zoom level changed.
    pub fn fit(&mut self, bbox: BoundingBox, padding: f64) -> bool {
        let avail_w = (self.width - 2.0 * padding).max(1.0);
        let avail_h = (self.height - 2.0 * padding).max(1.0);
        let level = self.clamp((avail_w / bbox.width()).min(avail_h / bbox.height()));

        let changed = (level - self.zoom).abs() >= f64::EPSILON;
        let center = bbox.center();
        self.zoom = level;
        self.pan = Position::new(
            self.width / 2.0 - center.x * level,
            self.height / 2.0 - center.y * level,
        );
        changed
    }

    pub fn to_screen(&self, p: Position) -> Position {
        Position::new(p.x * self.zoom + self.pan.x, p.y * self.zoom + self.pan.y)
    }

    pub fn to_model(&self, p: Position) -> Position {
        Position::new((p.x - self.pan.x) / self.zoom, (p.y - self.pan.y) / self.zoom)
    }

    /// Visible region in model coordinates
    pub fn visible_extent(&self) -> BoundingBox {
        let top_left = self.to_model(Position::new(0.0, 0.0));
        let bottom_right = self.to_model(Position::new(self.width, self.height));
        BoundingBox {
            x1: top_left.x,
            y1: top_left.y,
            x2: bottom_right.x,
            y2: bottom_right.y,
        }
    }
}
