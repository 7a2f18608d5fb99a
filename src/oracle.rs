//! Target Validity Oracle - decides whether an element is lockable.
//!
//! Pure predicate over an [`ElementSnapshot`]; no tree access, no side
//! effects. The resolver walks ancestor chains with it, and tests exercise it
//! against synthetic descriptors.
//!
//! Rules, in order:
//! 1. Reject non-content tags (document root, head, metadata tags).
//! 2. Reject elements carrying the opt-out class, or containing an opted-out
//!    descendant.
//! 3. Inside a permissive zone: accept unless fully hidden.
//! 4. Everywhere else: additionally reject tiny, transparent, and
//!    pointer-events:none elements.
//!
//! The permissive-zone carve-out lets decorative micro-elements inside
//! designated sections stay lockable even though they would fail the generic
//! size/opacity checks.

use crate::config::Tunables;
use crate::tree::{Display, ElementSnapshot, PointerEventsStyle, Visibility};

/// Class that opts an element (and every container holding it) out of
/// cursor targeting.
pub const OPT_OUT_CLASS: &str = "reticle-ignore";

/// Tags that are never lockable.
pub const EXCLUDED_TAGS: &[&str] = &[
    "html", "body", "head", "script", "style", "link", "meta", "title", "noscript",
];

/// `isValidTarget`: can the cursor lock onto this element?
pub fn is_valid_target(
    snapshot: &ElementSnapshot,
    permissive_zones: &[String],
    tunables: &Tunables,
) -> bool {
    if EXCLUDED_TAGS.contains(&snapshot.tag.as_str()) {
        return false;
    }

    if snapshot.classes.iter().any(|c| c == OPT_OUT_CLASS) {
        return false;
    }
    if snapshot.has_opt_out_descendant {
        return false;
    }

    let hidden = snapshot.style.display == Display::None
        || snapshot.style.visibility == Visibility::Hidden;

    let in_permissive_zone = snapshot
        .section
        .as_ref()
        .is_some_and(|s| permissive_zones.iter().any(|z| z == s));
    if in_permissive_zone {
        return !hidden;
    }

    if hidden {
        return false;
    }
    if snapshot.rect.width < tunables.min_target_size
        || snapshot.rect.height < tunables.min_target_size
    {
        return false;
    }
    if snapshot.style.pointer_events == PointerEventsStyle::None {
        return false;
    }
    if snapshot.style.inline_pointer_events == Some(PointerEventsStyle::None) {
        return false;
    }
    if snapshot.style.opacity == 0.0 {
        return false;
    }

    true
}

// =============================================================================
// TESTS
// =============================================================================
