//! Configuration - constructor-time options and numeric tunables.
//!
//! All coefficients are fixed constants with working defaults; nothing beyond
//! them is required for correct behavior, but every one is exposed as a
//! tunable.

use std::time::Duration;

use crate::tree::ElementId;

// =============================================================================
// TUNABLES
// =============================================================================

/// Numeric coefficients of the corner alignment engine and the release
/// animation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tunables {
    /// Distance the brackets sit outside the target's bounding box.
    pub border_width: f32,
    /// Side length of one corner bracket.
    pub corner_size: f32,
    /// Scale applied to the pointer's offset from the target center before it
    /// biases the bracket frame.
    pub parallax_strength: f32,
    /// Elements smaller than this (either axis) fail validation outside
    /// permissive zones.
    pub min_target_size: f32,
    /// Duration of the glyph's pointer-tracking tween, seconds.
    pub glyph_tween_secs: f32,
    /// Duration of one corner alignment tween, seconds.
    pub align_tween_secs: f32,
    /// Duration of the release-to-idle-formation tween, seconds.
    pub release_tween_secs: f32,
    /// How long to stay quiet after a release before the idle spin resumes.
    /// Absorbs rapid target-hopping without visible flicker.
    pub resume_debounce: Duration,
}

impl Default for Tunables {
    fn default() -> Self {
        Self {
            border_width: 3.0,
            corner_size: 12.0,
            parallax_strength: 0.000_05,
            min_target_size: 5.0,
            glyph_tween_secs: 0.1,
            align_tween_secs: 0.2,
            release_tween_secs: 0.3,
            resume_debounce: Duration::from_millis(50),
        }
    }
}

// =============================================================================
// OPTIONS
// =============================================================================

/// Constructor-time configuration. Static for the subsystem's lifetime.
#[derive(Debug, Clone)]
pub struct CursorOptions {
    /// Restrict targeting to the subtree rooted at this element.
    /// `None` means everything is in scope.
    pub scope: Option<ElementId>,
    /// Seconds per full idle revolution.
    pub spin_duration_secs: f32,
    /// Hide the native system pointer while the subsystem is active.
    pub hide_native_cursor: bool,
    /// Section names where validation is permissive (only fully hidden
    /// elements are rejected). Configuration, not an architectural constant.
    pub permissive_zones: Vec<String>,
    /// Viewport widths at or below this are treated as non-precision-pointer
    /// devices by the capability gate.
    pub viewport_breakpoint: f32,
    pub tunables: Tunables,
}

impl Default for CursorOptions {
    fn default() -> Self {
        Self {
            scope: None,
            spin_duration_secs: 2.0,
            hide_native_cursor: true,
            permissive_zones: vec!["skills".to_string(), "experience".to_string()],
            viewport_breakpoint: 768.0,
            tunables: Tunables::default(),
        }
    }
}
