//! Error types.
//!
//! The subsystem has no fatal errors: every failure degrades to "behave like
//! the native pointer". Geometry failures on a bound element trigger a
//! defensive release back to `Idle`.

use thiserror::Error;

/// A geometry query on an element failed mid-interaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum GeometryError {
    /// The element is no longer attached to the tree.
    #[error("element is detached from the tree")]
    Detached,

    /// The element reported a non-finite or collapsed bounding rect.
    #[error("element reported a degenerate bounding rect")]
    Degenerate,
}
