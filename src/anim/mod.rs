//! Animation Module - tweens, easing, idle rotation, and scheduling
//!
//! Two primitives drive every visual in the subsystem:
//!
//! - **Tween** - animate a value toward a target over a fixed duration
//!   (glyph tracking, corner alignment, release-to-idle).
//! - **SpinController** - the indefinite idle rotation with phase-continuous
//!   pause/resume.
//!
//! Both are advanced from per-frame callbacks supplied by a [`Scheduler`].

pub mod easing;
pub mod scheduler;
pub mod spin;
pub mod tween;

pub use easing::Easing;
pub use scheduler::{
    FrameCallback, FrameId, ManualScheduler, Scheduler, TimerCallback, TimerId, Timestamp,
};
pub use spin::{SpinController, SpinPhase};
pub use tween::{Lerp, Tween};
