//! Listener Registry - explicit per-target event subscriptions.
//!
//! Binding a target installs one move and one leave subscription for it;
//! releasing disposes them. Modeling subscriptions as explicit objects (not
//! relying on drop timing) lets the release-before-bind invariant be enforced
//! and asserted by listener counts: for any sequence of pointer-enter events,
//! at most one target's listener set is ever installed.

use crate::tree::ElementId;

/// Which per-target event a subscription listens for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListenerKind {
    TargetMove,
    TargetLeave,
}

/// One installed listener. Disposed through
/// [`ListenerRegistry::unsubscribe`].
#[derive(Debug, PartialEq, Eq)]
pub struct Subscription {
    id: u64,
    pub element: ElementId,
    pub kind: ListenerKind,
}

/// Registry of installed per-target listeners.
#[derive(Debug, Default)]
pub struct ListenerRegistry {
    entries: Vec<(u64, ElementId, ListenerKind)>,
    next_id: u64,
}

impl ListenerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Install a listener and return its subscription handle.
    pub fn subscribe(&mut self, element: ElementId, kind: ListenerKind) -> Subscription {
        let id = self.next_id;
        self.next_id += 1;
        self.entries.push((id, element, kind));
        Subscription { id, element, kind }
    }

    /// Dispose a subscription. Consumes the handle; double-dispose cannot
    /// compile.
    pub fn unsubscribe(&mut self, sub: Subscription) {
        self.entries.retain(|(id, _, _)| *id != sub.id);
    }

    /// Is a listener of `kind` installed for `element`?
    pub fn is_subscribed(&self, element: ElementId, kind: ListenerKind) -> bool {
        self.entries
            .iter()
            .any(|(_, el, k)| *el == element && *k == kind)
    }

    /// Total installed listeners across all elements.
    pub fn count(&self) -> usize {
        self.entries.len()
    }

    /// Installed listeners for one element.
    pub fn count_for(&self, element: ElementId) -> usize {
        self.entries.iter().filter(|(_, el, _)| *el == element).count()
    }

    /// Remove everything (teardown path).
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

// =============================================================================
// TESTS
// =============================================================================
