//! Easing functions for tweens.

/// Easing curve applied to a tween's normalized progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Easing {
    /// Constant rate. Used for rotation so angular velocity never jumps.
    #[default]
    Linear,
    /// Quadratic ease-out: fast start, gentle settle.
    QuadOut,
    /// Cubic ease-out: stronger settle; used for glyph tracking and release.
    CubicOut,
}

impl Easing {
    /// Map linear progress `t` in `[0, 1]` through the curve.
    pub fn apply(self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Easing::Linear => t,
            Easing::QuadOut => {
                let inv = 1.0 - t;
                1.0 - inv * inv
            }
            Easing::CubicOut => {
                let inv = 1.0 - t;
                1.0 - inv * inv * inv
            }
        }
    }
}
