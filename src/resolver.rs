//! Target Resolver - which element should the cursor lock onto?
//!
//! On every "pointer entered an element" event, walk the ancestor chain from
//! the raw event target up to the document body, and pick the innermost
//! element that passes the validity oracle. Returns `None` when nothing on
//! the chain qualifies.

use crate::config::CursorOptions;
use crate::oracle::is_valid_target;
use crate::tree::{first_matching_ancestor, ElementId, ElementTree};

/// Resolve the lock target for a pointer-enter on `event_target`.
///
/// Snapshot failures on an individual ancestor (detached mid-walk) simply
/// disqualify that ancestor; the walk continues.
pub fn resolve_target<T>(
    tree: &T,
    event_target: ElementId,
    options: &CursorOptions,
) -> Option<ElementId>
where
    T: ElementTree + ?Sized,
{
    first_matching_ancestor(tree, event_target, |id| {
        if let Some(scope) = options.scope {
            if !tree.contains(scope, id) {
                return false;
            }
        }
        match tree.snapshot(id) {
            Ok(snapshot) => {
                is_valid_target(&snapshot, &options.permissive_zones, &options.tunables)
            }
            Err(_) => false,
        }
    })
}

// =============================================================================
// TESTS
// =============================================================================
