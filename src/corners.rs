//! Corner Alignment Engine - where do the four brackets go?
//!
//! Pure geometry. Brackets sit just outside the four corners of the target's
//! bounding box, offset outward by the border width and inset by the bracket
//! size on their trailing edges, expressed relative to the cursor glyph's own
//! center (the glyph tracks the pointer independently).
//!
//! A live pointer coordinate adds a small bias toward the pointer's offset
//! from the target center, applied identically to all four corners: the
//! bracket frame shifts as a rigid body, never skewing.

use crate::config::Tunables;
use crate::types::{CornerOffsets, Point, Rect, Vec2};

/// Compute the four corner offsets for a bound target.
///
/// `pointer` is `None` for the initial alignment pass on bind (no fresh
/// pointer coordinate is associated with the transition yet).
pub fn compute_corner_offsets(
    target: Rect,
    cursor_center: Point,
    tunables: &Tunables,
    pointer: Option<Point>,
) -> CornerOffsets {
    let border = tunables.border_width;
    let corner = tunables.corner_size;

    let left = target.left - cursor_center.x - border;
    let top = target.top - cursor_center.y - border;
    let right = target.right() - cursor_center.x + border - corner;
    let bottom = target.bottom() - cursor_center.y + border - corner;

    let bias = match pointer {
        Some(p) => {
            let center = target.center();
            Vec2::new(
                (p.x - center.x) * tunables.parallax_strength,
                (p.y - center.y) * tunables.parallax_strength,
            )
        }
        None => Vec2::ZERO,
    };

    [
        Vec2::new(left, top) + bias,
        Vec2::new(right, top) + bias,
        Vec2::new(right, bottom) + bias,
        Vec2::new(left, bottom) + bias,
    ]
}

/// The idle formation: a small diamond collapsed toward the cursor center,
/// the resting shape the brackets return to on release.
pub fn idle_formation(corner_size: f32) -> CornerOffsets {
    let near = -corner_size * 1.5;
    let far = corner_size * 0.5;
    [
        Vec2::new(near, near),
        Vec2::new(far, near),
        Vec2::new(far, far),
        Vec2::new(near, far),
    ]
}

// =============================================================================
// TESTS
// =============================================================================
