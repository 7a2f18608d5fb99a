//! # reticle
//!
//! Target-locking interactive cursor subsystem for reactive UIs.
//!
//! Built on [spark-signals](https://github.com/RLabs-Inc/spark-signals) for
//! fine-grained reactivity: every visual property the host renders (glyph
//! position, rotation, corner bracket offsets, native-pointer visibility) is
//! a signal the host's render effect subscribes to.
//!
//! ## Architecture
//!
//! The subsystem replaces the native pointer with a composite glyph: a center
//! dot plus four corner brackets. Unbound, the glyph spins at a constant
//! angular velocity; when the pointer enters an interactive element the
//! brackets lock onto that element's bounding box, with a slight
//! pointer-following parallax. One binding at a time, released on leave with
//! a debounced return to the idle spin.
//!
//! ```text
//! host events → gate → resolver (ancestor walk × validity oracle)
//!                          │
//!                 binding lifecycle ── listeners, tweens, spin
//!                          │
//!                 signals → host render effect
//! ```
//!
//! The host is abstracted behind two traits: [`ElementTree`] (geometry and
//! style queries) and [`Scheduler`] (frame callbacks and one-shot timers).
//! [`ManualScheduler`] drives everything deterministically for tests and
//! single-threaded embeddings.
//!
//! ## Modules
//!
//! - [`types`] - Geometry and pointer input primitives
//! - [`tree`] - Host element tree abstraction and [`tree::StaticTree`]
//! - [`gate`] - Device capability gate (touch/small-screen exclusion)
//! - [`oracle`] - Target validity rules
//! - [`resolver`] - Pointer-enter → lock target resolution
//! - [`corners`] - Corner bracket alignment geometry
//! - [`anim`] - Tweens, easing, idle spin, scheduling
//! - [`cursor`] - The binding lifecycle manager, [`Reticle`]

pub mod anim;
pub mod config;
pub mod corners;
pub mod cursor;
pub mod error;
pub mod gate;
pub mod listeners;
pub mod oracle;
pub mod resolver;
pub mod tree;
pub mod types;

// Re-export commonly used items
pub use types::*;

pub use anim::{
    Easing, FrameCallback, FrameId, ManualScheduler, Scheduler, SpinController, SpinPhase,
    TimerCallback, TimerId, Timestamp, Tween,
};

pub use config::{CursorOptions, Tunables};

pub use corners::{compute_corner_offsets, idle_formation};

pub use cursor::Reticle;

pub use error::GeometryError;

pub use gate::{evaluate as evaluate_gate, DeviceProfile, GateFlags, PointerClass};

pub use listeners::{ListenerKind, ListenerRegistry, Subscription};

pub use oracle::{is_valid_target, OPT_OUT_CLASS};

pub use resolver::resolve_target;

pub use tree::{ElementId, ElementSnapshot, ElementTree};
