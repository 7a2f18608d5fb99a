//! Capability Gate - should the custom cursor run at all?
//!
//! Touch and small-screen devices keep the native pointer: the subsystem is
//! inert there (no listeners, glyph hidden). The gate is evaluated on mount
//! and re-evaluated on viewport resize/orientation change; a desktop window
//! resized into a mobile-sized viewport transitions the gate. The signals
//! are heuristics, not authoritative.

use bitflags::bitflags;

bitflags! {
    /// Device signals that block the custom cursor. Any set flag blocks.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct GateFlags: u8 {
        /// Primary pointer is coarse (finger, stylus on a tablet).
        const COARSE_POINTER = 1 << 0;
        /// Device reports touch support.
        const TOUCH          = 1 << 1;
        /// Viewport width at or below the mobile breakpoint.
        const SMALL_VIEWPORT = 1 << 2;
        /// User agent carries a mobile marker.
        const MOBILE_UA      = 1 << 3;
    }
}

/// Substrings that mark a user agent as mobile. Matched case-insensitively.
pub const MOBILE_UA_MARKERS: &[&str] = &[
    "android",
    "webos",
    "iphone",
    "ipad",
    "ipod",
    "blackberry",
    "iemobile",
    "opera mini",
];

/// Precision of the device's primary pointer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PointerClass {
    #[default]
    Fine,
    Coarse,
}

/// Device signals sampled by the host at mount and on viewport changes.
#[derive(Debug, Clone, Default)]
pub struct DeviceProfile {
    pub pointer_class: PointerClass,
    pub max_touch_points: u8,
    pub viewport_width: f32,
    pub viewport_height: f32,
    pub user_agent: String,
}

impl DeviceProfile {
    /// A typical desktop profile.
    pub fn desktop(viewport_width: f32, viewport_height: f32) -> Self {
        Self {
            pointer_class: PointerClass::Fine,
            max_touch_points: 0,
            viewport_width,
            viewport_height,
            user_agent: String::new(),
        }
    }
}

/// Evaluate the gate for a device profile. Empty flags means the cursor may
/// run.
pub fn evaluate(profile: &DeviceProfile, viewport_breakpoint: f32) -> GateFlags {
    let mut flags = GateFlags::empty();

    if profile.pointer_class == PointerClass::Coarse {
        flags |= GateFlags::COARSE_POINTER;
    }
    if profile.max_touch_points > 0 {
        flags |= GateFlags::TOUCH;
    }
    if profile.viewport_width <= viewport_breakpoint {
        flags |= GateFlags::SMALL_VIEWPORT;
    }

    let ua = profile.user_agent.to_lowercase();
    if MOBILE_UA_MARKERS.iter().any(|m| ua.contains(m)) {
        flags |= GateFlags::MOBILE_UA;
    }

    flags
}

/// Convenience: does this profile block the subsystem?
pub fn is_blocked(profile: &DeviceProfile, viewport_breakpoint: f32) -> bool {
    !evaluate(profile, viewport_breakpoint).is_empty()
}

// =============================================================================
// TESTS
// =============================================================================
