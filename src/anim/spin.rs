//! Idle Rotation Controller - the cursor's resting spin.
//!
//! While unbound, the glyph rotates at a constant angular velocity
//! (`360 / spin_duration` degrees per second), looping indefinitely. Binding
//! pauses the spin and records the absolute angle normalized into
//! `[0, 360)`. Resuming plays a single catch-up segment from that angle back
//! to a multiple of 360°, timed so the angular velocity is identical through
//! the seam: the spin looks uninterrupted in velocity no matter how long the
//! pause lasted.

/// Where the controller is in its pause/resume cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpinPhase {
    /// Looping indefinitely.
    Running,
    /// Playing the one-shot segment from the paused angle back to 360°.
    CatchUp,
    /// Frozen at the captured angle (cursor is bound).
    Paused,
}

/// Constant-velocity rotation with phase-continuous pause/resume.
#[derive(Debug, Clone, Copy)]
pub struct SpinController {
    /// Current angle in degrees, kept in `[0, 360)`.
    angle: f32,
    spin_duration: f32,
    phase: SpinPhase,
}

impl SpinController {
    /// A controller spinning one revolution per `spin_duration_secs`.
    pub fn new(spin_duration_secs: f32) -> Self {
        Self {
            angle: 0.0,
            spin_duration: spin_duration_secs.max(f32::EPSILON),
            phase: SpinPhase::Running,
        }
    }

    /// Degrees per second.
    pub fn angular_velocity(&self) -> f32 {
        360.0 / self.spin_duration
    }

    /// Current angle in degrees, `[0, 360)`.
    pub fn angle(&self) -> f32 {
        self.angle
    }

    pub fn phase(&self) -> SpinPhase {
        self.phase
    }

    pub fn is_running(&self) -> bool {
        self.phase != SpinPhase::Paused
    }

    /// Advance by `dt` seconds and return the new angle. Paused controllers
    /// hold their angle.
    pub fn advance(&mut self, dt: f32) -> f32 {
        if self.phase == SpinPhase::Paused {
            return self.angle;
        }
        let next = self.angle + self.angular_velocity() * dt.max(0.0);
        if self.phase == SpinPhase::CatchUp && next >= 360.0 {
            // Seam crossed: the catch-up segment ends exactly where the
            // indefinite loop begins, at the same velocity.
            self.phase = SpinPhase::Running;
        }
        self.angle = next.rem_euclid(360.0);
        self.angle
    }

    /// Pause, capturing the current angle normalized into `[0, 360)`.
    /// The angle is held, not reset: the glyph keeps its orientation.
    pub fn pause(&mut self) {
        self.angle = self.angle.rem_euclid(360.0);
        self.phase = SpinPhase::Paused;
    }

    /// Resume from the captured angle via the catch-up segment.
    pub fn resume(&mut self) {
        if self.phase != SpinPhase::Paused {
            return;
        }
        self.phase = if self.angle == 0.0 {
            SpinPhase::Running
        } else {
            SpinPhase::CatchUp
        };
    }

    /// Duration of the pending catch-up segment: the time to reach 360° from
    /// the paused angle at the constant angular velocity.
    pub fn catchup_duration(&self) -> f32 {
        self.spin_duration * (1.0 - self.angle / 360.0)
    }
}

// =============================================================================
// TESTS
// =============================================================================
