//! Minimal floating-point geometry primitives for row layout.

/// A point in a row's local coordinate space (origin at the top-left).
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    /// Horizontal offset from the row's left edge.
    pub x: f32,
    /// Vertical offset from the row's top edge.
    pub y: f32,
}

impl Point {
    /// Creates a point from its coordinates.
    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// A width/height pair.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Size {
    /// Horizontal extent.
    pub width: f32,
    /// Vertical extent.
    pub height: f32,
}

impl Size {
    /// A zero-extent size.
    pub const ZERO: Self = Self {
        width: 0.0,
        height: 0.0,
    };

    /// Creates a size from its extents.
    #[must_use]
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

/// An axis-aligned rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    /// Top-left corner.
    pub origin: Point,
    /// Extent of the rectangle.
    pub size: Size,
}

impl Rect {
    /// A zero rectangle, used for frames of absent elements.
    pub const ZERO: Self = Self {
        origin: Point { x: 0.0, y: 0.0 },
        size: Size::ZERO,
    };

    /// Creates a rectangle from its top-left corner and extents.
    #[must_use]
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            origin: Point::new(x, y),
            size: Size::new(width, height),
        }
    }

    /// Creates a rectangle from an origin point and a size.
    #[must_use]
    pub const fn with_origin(origin: Point, size: Size) -> Self {
        Self { origin, size }
    }

    /// Returns the x coordinate of the right edge.
    #[must_use]
    pub fn max_x(&self) -> f32 {
        self.origin.x + self.size.width
    }

    /// Returns the y coordinate of the bottom edge.
    #[must_use]
    pub fn max_y(&self) -> f32 {
        self.origin.y + self.size.height
    }

    /// Returns true when the rectangle has no area.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.size.width == 0.0 && self.size.height == 0.0
    }
}
