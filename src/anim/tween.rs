//! Tween - animate a value toward a target over a fixed duration.
//!
//! One tween per animated property; the binding lifecycle drives them from
//! the per-frame callback. The four corner offsets tween as a single
//! `[Vec2; 4]` value so the brackets always move as one atomic frame.

use super::easing::Easing;
use crate::types::{CornerOffsets, Point, Vec2};

/// Values a tween can interpolate.
pub trait Lerp: Copy {
    fn lerp(from: Self, to: Self, t: f32) -> Self;
}

impl Lerp for f32 {
    fn lerp(from: Self, to: Self, t: f32) -> Self {
        from + (to - from) * t
    }
}

impl Lerp for Vec2 {
    fn lerp(from: Self, to: Self, t: f32) -> Self {
        Vec2::new(f32::lerp(from.x, to.x, t), f32::lerp(from.y, to.y, t))
    }
}

impl Lerp for Point {
    fn lerp(from: Self, to: Self, t: f32) -> Self {
        Point::new(f32::lerp(from.x, to.x, t), f32::lerp(from.y, to.y, t))
    }
}

impl Lerp for CornerOffsets {
    fn lerp(from: Self, to: Self, t: f32) -> Self {
        [
            Vec2::lerp(from[0], to[0], t),
            Vec2::lerp(from[1], to[1], t),
            Vec2::lerp(from[2], to[2], t),
            Vec2::lerp(from[3], to[3], t),
        ]
    }
}

/// An in-flight animation from one value to another.
#[derive(Debug, Clone, Copy)]
pub struct Tween<T: Lerp> {
    from: T,
    to: T,
    duration: f32,
    elapsed: f32,
    easing: Easing,
}

impl<T: Lerp> Tween<T> {
    /// Start a tween. A non-positive duration completes on the first advance.
    pub fn new(from: T, to: T, duration_secs: f32, easing: Easing) -> Self {
        Self {
            from,
            to,
            duration: duration_secs.max(0.0),
            elapsed: 0.0,
            easing,
        }
    }

    /// Advance by `dt` seconds and return the current value.
    pub fn advance(&mut self, dt: f32) -> T {
        self.elapsed = (self.elapsed + dt.max(0.0)).min(self.duration);
        self.value()
    }

    /// Current value without advancing.
    pub fn value(&self) -> T {
        if self.duration <= 0.0 {
            return self.to;
        }
        let progress = self.easing.apply(self.elapsed / self.duration);
        T::lerp(self.from, self.to, progress)
    }

    /// Final value this tween is heading toward.
    pub fn target(&self) -> T {
        self.to
    }

    pub fn is_done(&self) -> bool {
        self.duration <= 0.0 || self.elapsed >= self.duration
    }
}

// =============================================================================
// TESTS
// =============================================================================
