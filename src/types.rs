//! Core types for reticle.
//!
//! Geometry primitives, pointer input types, and the cursor's visual mode.
//! Everything downstream (oracle, corner math, binding lifecycle) is built
//! on these.

// =============================================================================
// Geometry
// =============================================================================

/// A point in viewport coordinates (device-independent pixels).
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// A 2D offset vector.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub const ZERO: Self = Self { x: 0.0, y: 0.0 };

    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

impl std::ops::Add for Vec2 {
    type Output = Vec2;

    fn add(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl std::ops::Sub for Vec2 {
    type Output = Vec2;

    fn sub(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x - rhs.x, self.y - rhs.y)
    }
}

/// An axis-aligned bounding box in viewport coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub left: f32,
    pub top: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub const fn new(left: f32, top: f32, width: f32, height: f32) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    pub fn right(&self) -> f32 {
        self.left + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.top + self.height
    }

    pub fn center(&self) -> Point {
        Point::new(self.left + self.width / 2.0, self.top + self.height / 2.0)
    }

    /// A rect the alignment engine cannot work with: non-finite coordinates
    /// or a collapsed/negative extent. Detached elements report these.
    pub fn is_degenerate(&self) -> bool {
        !(self.left.is_finite()
            && self.top.is_finite()
            && self.width.is_finite()
            && self.height.is_finite())
            || self.width <= 0.0
            || self.height <= 0.0
    }
}

// =============================================================================
// Pointer input
// =============================================================================

/// Which input device produced a pointer sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerSource {
    Mouse,
    Touch,
}

/// One pointer coordinate, produced per input event. Ephemeral.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerSample {
    pub x: f32,
    pub y: f32,
    pub source: PointerSource,
}

impl PointerSample {
    pub const fn mouse(x: f32, y: f32) -> Self {
        Self {
            x,
            y,
            source: PointerSource::Mouse,
        }
    }

    pub const fn touch(x: f32, y: f32) -> Self {
        Self {
            x,
            y,
            source: PointerSource::Touch,
        }
    }

    pub fn point(&self) -> Point {
        Point::new(self.x, self.y)
    }
}

/// A raw pointer event as delivered by the host.
///
/// A touch event may carry no touch point (all fingers lifted); such events
/// resolve to nothing and are dropped by every entry point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerEvent {
    pub source: PointerSource,
    pub sample: Option<PointerSample>,
}

impl PointerEvent {
    pub const fn mouse(x: f32, y: f32) -> Self {
        Self {
            source: PointerSource::Mouse,
            sample: Some(PointerSample::mouse(x, y)),
        }
    }

    pub const fn touch(x: f32, y: f32) -> Self {
        Self {
            source: PointerSource::Touch,
            sample: Some(PointerSample::touch(x, y)),
        }
    }

    /// A touch event with no active touch points.
    pub const fn touch_empty() -> Self {
        Self {
            source: PointerSource::Touch,
            sample: None,
        }
    }
}

// =============================================================================
// Cursor visual mode
// =============================================================================

/// The cursor's visual mode: spinning free, or locked onto a target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CursorMode {
    #[default]
    Idle,
    Bound,
}

/// Offsets of the four corner brackets relative to the cursor glyph's center.
///
/// Order: top-left, top-right, bottom-right, bottom-left.
pub type CornerOffsets = [Vec2; 4];

// =============================================================================
// TESTS
// =============================================================================
