//! Binding Lifecycle Manager - the cursor subsystem itself.
//!
//! [`Reticle`] owns the whole state machine: the capability gate decision,
//! the single `Option<BoundTarget>` slot, the per-target listener
//! subscriptions, the glyph/corner tweens, and the idle spin. Two states:
//! `Idle` (no target, glyph spinning) and `Bound` (exactly one target,
//! brackets locked on). The bound slot is only ever mutated through the
//! release/bind transitions here.
//!
//! # Event flow
//!
//! ```text
//! host events -> gate (inert when blocked) -> resolver -> bind/release
//!                                                |
//!                            per-frame: corner alignment | idle rotation
//! ```
//!
//! # Example
//!
//! ```ignore
//! use std::rc::Rc;
//! use reticle::{Reticle, CursorOptions, DeviceProfile, ManualScheduler};
//! use reticle::tree::StaticTree;
//!
//! let tree = Rc::new(StaticTree::new());
//! let scheduler = Rc::new(ManualScheduler::new());
//! let cursor = Reticle::mount(
//!     tree,
//!     scheduler.clone(),
//!     &DeviceProfile::desktop(1920.0, 1080.0),
//!     CursorOptions::default(),
//! );
//!
//! // Host event loop: feed events, pump frames.
//! // cursor.pointer_moved(...); scheduler.step(...);
//! ```

use std::cell::RefCell;
use std::rc::Rc;

use spark_signals::{signal, Signal};
use tracing::{debug, trace};

use crate::anim::{Easing, FrameId, Scheduler, SpinController, TimerId, Timestamp, Tween};
use crate::config::CursorOptions;
use crate::corners::{compute_corner_offsets, idle_formation};
use crate::error::GeometryError;
use crate::gate::{self, DeviceProfile};
use crate::listeners::{ListenerKind, ListenerRegistry, Subscription};
use crate::resolver::resolve_target;
use crate::tree::{ElementId, ElementTree};
use crate::types::{CornerOffsets, CursorMode, Point, PointerEvent, PointerSource};

// =============================================================================
// BOUND TARGET
// =============================================================================

/// The currently locked element and its installed listeners.
/// At most one exists; enforced by the release-before-bind transition.
struct BoundTarget {
    element: ElementId,
    move_sub: Subscription,
    leave_sub: Subscription,
}

// =============================================================================
// INNER STATE
// =============================================================================

struct Inner<T: ElementTree> {
    tree: Rc<T>,
    scheduler: Rc<dyn Scheduler>,
    options: CursorOptions,

    // Visual state signals
    position: Signal<Point>,
    rotation: Signal<f32>,
    mode: Signal<CursorMode>,
    corners: Signal<CornerOffsets>,
    native_hidden: Signal<bool>,
    glyph_visible: Signal<bool>,

    enabled: bool,
    disposed: bool,

    bound: Option<BoundTarget>,
    listeners: ListenerRegistry,
    resume_timer: Option<TimerId>,

    spin: SpinController,
    glyph_tween: Option<Tween<Point>>,
    corner_tween: Option<Tween<CornerOffsets>>,
    /// Latest move sample awaiting the next frame's alignment pass.
    /// Move storms coalesce here: at most one recompute per rendered frame.
    pending_align: Option<Point>,
    frame_id: Option<FrameId>,
    last_frame: Option<Timestamp>,
}

impl<T: ElementTree> Inner<T> {
    fn bound_element(&self) -> Option<ElementId> {
        self.bound.as_ref().map(|b| b.element)
    }

    /// One alignment pass: query the live rect and retarget the corner tween.
    fn align_bound(&mut self, pointer: Option<Point>) -> Result<(), GeometryError> {
        let Some(element) = self.bound_element() else {
            return Ok(());
        };
        let rect = self.tree.bounding_rect(element)?;
        if rect.is_degenerate() {
            return Err(GeometryError::Degenerate);
        }
        let offsets =
            compute_corner_offsets(rect, self.position.get(), &self.options.tunables, pointer);
        let from = self.corners.get();
        self.corner_tween = Some(Tween::new(
            from,
            offsets,
            self.options.tunables.align_tween_secs,
            Easing::QuadOut,
        ));
        Ok(())
    }
}

// =============================================================================
// FRAME PUMP
// =============================================================================

fn ensure_frame<T: ElementTree + 'static>(rc: &Rc<RefCell<Inner<T>>>) {
    let scheduler = {
        let inner = rc.borrow();
        if inner.frame_id.is_some() || !inner.enabled || inner.disposed {
            return;
        }
        inner.scheduler.clone()
    };
    let weak = Rc::downgrade(rc);
    let id = scheduler.request_frame(Box::new(move |ts| {
        if let Some(rc) = weak.upgrade() {
            on_frame(&rc, ts);
        }
    }));
    rc.borrow_mut().frame_id = Some(id);
}

fn on_frame<T: ElementTree + 'static>(rc: &Rc<RefCell<Inner<T>>>, ts: Timestamp) {
    // Throttled alignment recompute happens first; a geometry failure here
    // releases the binding before the rest of the frame advances.
    let mut failure: Option<GeometryError> = None;
    {
        let mut inner = rc.borrow_mut();
        inner.frame_id = None;
        if inner.disposed || !inner.enabled {
            return;
        }
        if let Some(pointer) = inner.pending_align.take() {
            if inner.bound.is_some() {
                if let Err(err) = inner.align_bound(Some(pointer)) {
                    failure = Some(err);
                }
            }
        }
    }
    if let Some(err) = failure {
        debug!(error = %err, "geometry query failed mid-frame, releasing binding");
        release_binding(rc, true);
    }

    let keep_going = {
        let mut inner = rc.borrow_mut();
        if inner.disposed || !inner.enabled {
            return;
        }
        let dt = match inner.last_frame {
            Some(prev) if ts > prev => (ts - prev).as_secs_f32(),
            _ => 0.0,
        };
        inner.last_frame = Some(ts);

        if let Some(tween) = inner.glyph_tween.as_mut() {
            let value = tween.advance(dt);
            let done = tween.is_done();
            inner.position.set(value);
            if done {
                inner.glyph_tween = None;
            }
        }

        if let Some(tween) = inner.corner_tween.as_mut() {
            let value = tween.advance(dt);
            let done = tween.is_done();
            inner.corners.set(value);
            if done {
                inner.corner_tween = None;
            }
        }

        if inner.bound.is_none() && inner.spin.is_running() {
            let angle = inner.spin.advance(dt);
            inner.rotation.set(angle);
        }

        let keep_going = inner.glyph_tween.is_some()
            || inner.corner_tween.is_some()
            || inner.pending_align.is_some()
            || (inner.bound.is_none() && inner.spin.is_running());
        if !keep_going {
            // Pump stops: the next frame after a gap starts a fresh dt
            // baseline instead of swallowing the whole gap at once.
            inner.last_frame = None;
        }
        keep_going
    };

    if keep_going {
        ensure_frame(rc);
    }
}

// =============================================================================
// TRANSITIONS
// =============================================================================

/// Tear down the current binding, if any.
///
/// `animate_release` selects the leave path (corner collapse to the idle
/// formation plus the debounced spin resume). A rebind passes `false`: the
/// old target's listeners are removed and nothing else moves, because the
/// new bind retargets the corners immediately.
fn release_binding<T: ElementTree + 'static>(rc: &Rc<RefCell<Inner<T>>>, animate_release: bool) {
    let mut inner = rc.borrow_mut();
    let Some(bound) = inner.bound.take() else {
        return;
    };
    inner.listeners.unsubscribe(bound.move_sub);
    inner.listeners.unsubscribe(bound.leave_sub);
    inner.pending_align = None;
    inner.mode.set(CursorMode::Idle);
    debug!(element = %bound.element, "released target");

    if !animate_release {
        return;
    }

    let from = inner.corners.get();
    let idle = idle_formation(inner.options.tunables.corner_size);
    inner.corner_tween = Some(Tween::new(
        from,
        idle,
        inner.options.tunables.release_tween_secs,
        Easing::CubicOut,
    ));

    if let Some(timer) = inner.resume_timer.take() {
        inner.scheduler.clear_timeout(timer);
    }
    let scheduler = inner.scheduler.clone();
    let delay = inner.options.tunables.resume_debounce;
    drop(inner);

    let weak = Rc::downgrade(rc);
    let id = scheduler.set_timeout(
        delay,
        Box::new(move || {
            if let Some(rc) = weak.upgrade() {
                resume_spin_if_unbound(&rc);
            }
        }),
    );
    rc.borrow_mut().resume_timer = Some(id);
    ensure_frame(rc);
}

/// Debounce expiry: resume the idle spin only if nothing re-bound meanwhile.
fn resume_spin_if_unbound<T: ElementTree + 'static>(rc: &Rc<RefCell<Inner<T>>>) {
    {
        let mut inner = rc.borrow_mut();
        inner.resume_timer = None;
        if inner.disposed || !inner.enabled || inner.bound.is_some() {
            return;
        }
        inner.spin.resume();
        trace!(
            angle = inner.spin.angle(),
            catchup_secs = inner.spin.catchup_duration(),
            "idle spin resumed"
        );
    }
    ensure_frame(rc);
}

/// `Idle -> Bound` (or `Bound -> Bound` with a different target): the old
/// binding is torn down first, synchronously, then the new one installed.
fn bind_target<T: ElementTree + 'static>(rc: &Rc<RefCell<Inner<T>>>, target: ElementId) {
    release_binding(rc, false);

    let align_result = {
        let mut inner = rc.borrow_mut();

        // A pending resume inside the debounce window is cancelled: the spin
        // never resumes only to immediately stop again.
        if let Some(timer) = inner.resume_timer.take() {
            inner.scheduler.clear_timeout(timer);
        }

        // Spin pauses at its captured angle; the glyph holds its orientation.
        inner.spin.pause();
        let angle = inner.spin.angle();
        inner.rotation.set(angle);

        let move_sub = inner.listeners.subscribe(target, ListenerKind::TargetMove);
        let leave_sub = inner.listeners.subscribe(target, ListenerKind::TargetLeave);
        inner.bound = Some(BoundTarget {
            element: target,
            move_sub,
            leave_sub,
        });
        inner.mode.set(CursorMode::Bound);
        debug!(element = %target, "locked onto target");

        // Immediate alignment pass with no pointer-relative parallax: no
        // fresh pointer coordinate is associated with the transition yet.
        inner.align_bound(None)
    };

    match align_result {
        Ok(()) => ensure_frame(rc),
        Err(err) => {
            debug!(error = %err, "geometry query failed on bind, releasing");
            release_binding(rc, true);
        }
    }
}

// =============================================================================
// RETICLE
// =============================================================================

/// The target-locking cursor subsystem. One instance per page.
pub struct Reticle<T: ElementTree + 'static> {
    inner: Rc<RefCell<Inner<T>>>,
}

impl<T: ElementTree + 'static> Reticle<T> {
    /// Mount the subsystem.
    ///
    /// The capability gate is evaluated against `profile` up front: on a
    /// touch/small-screen device the instance is inert — no listeners, no
    /// frames, native pointer untouched.
    pub fn mount(
        tree: Rc<T>,
        scheduler: Rc<dyn Scheduler>,
        profile: &DeviceProfile,
        options: CursorOptions,
    ) -> Self {
        let flags = gate::evaluate(profile, options.viewport_breakpoint);
        let enabled = flags.is_empty();
        let center = Point::new(profile.viewport_width / 2.0, profile.viewport_height / 2.0);
        let hide_native = enabled && options.hide_native_cursor;
        let spin = SpinController::new(options.spin_duration_secs);
        let corners = idle_formation(options.tunables.corner_size);

        if enabled {
            debug!("capability gate open, cursor active");
        } else {
            debug!(?flags, "capability gate blocked, cursor inert");
        }

        let inner = Rc::new(RefCell::new(Inner {
            tree,
            scheduler,
            options,
            position: signal(center),
            rotation: signal(0.0),
            mode: signal(CursorMode::Idle),
            corners: signal(corners),
            native_hidden: signal(hide_native),
            glyph_visible: signal(enabled),
            enabled,
            disposed: false,
            bound: None,
            listeners: ListenerRegistry::new(),
            resume_timer: None,
            spin,
            glyph_tween: None,
            corner_tween: None,
            pending_align: None,
            frame_id: None,
            last_frame: None,
        }));

        if enabled {
            ensure_frame(&inner);
        }
        Self { inner }
    }

    // -------------------------------------------------------------------------
    // Inbound events
    // -------------------------------------------------------------------------

    /// Global pointer move: the glyph eases toward the pointer.
    pub fn pointer_moved(&self, event: PointerEvent) {
        let mut inner = self.inner.borrow_mut();
        if !inner.enabled || inner.disposed {
            return;
        }
        let Some(sample) = event.sample else {
            return;
        };
        let from = inner.position.get();
        inner.glyph_tween = Some(Tween::new(
            from,
            sample.point(),
            inner.options.tunables.glyph_tween_secs,
            Easing::CubicOut,
        ));
        drop(inner);
        ensure_frame(&self.inner);
    }

    /// Pointer entered an element: resolve and (re)bind.
    ///
    /// Entering the already-bound target is idempotent. A touch event with no
    /// touch point resolves nothing.
    pub fn pointer_over(&self, event_target: ElementId, event: PointerEvent) {
        let resolved = {
            let inner = self.inner.borrow();
            if !inner.enabled || inner.disposed {
                return;
            }
            if event.source == PointerSource::Touch && event.sample.is_none() {
                return;
            }
            resolve_target(&*inner.tree, event_target, &inner.options)
        };
        let Some(resolved) = resolved else {
            return;
        };
        if self.inner.borrow().bound_element() == Some(resolved) {
            return;
        }
        bind_target(&self.inner, resolved);
    }

    /// Move over the bound target. Coalesced to one alignment recompute per
    /// rendered frame; recomputes include pointer-relative parallax.
    pub fn target_moved(&self, element: ElementId, event: PointerEvent) {
        let mut inner = self.inner.borrow_mut();
        if !inner.enabled || inner.disposed {
            return;
        }
        if !inner.listeners.is_subscribed(element, ListenerKind::TargetMove) {
            return;
        }
        if inner.bound_element() != Some(element) {
            return;
        }
        let Some(sample) = event.sample else {
            return;
        };
        inner.pending_align = Some(sample.point());
        drop(inner);
        ensure_frame(&self.inner);
    }

    /// Pointer left the bound target: release, collapse the brackets, and
    /// resume the spin after the debounce window.
    pub fn target_left(&self, element: ElementId) {
        {
            let inner = self.inner.borrow();
            if !inner.enabled || inner.disposed {
                return;
            }
            if !inner.listeners.is_subscribed(element, ListenerKind::TargetLeave) {
                return;
            }
        }
        release_binding(&self.inner, true);
    }

    /// Viewport resize/orientation change: re-evaluate the capability gate.
    /// A device can transition (heuristically) between blocked and open.
    pub fn viewport_changed(&self, profile: &DeviceProfile) {
        let (was_enabled, blocked) = {
            let inner = self.inner.borrow();
            if inner.disposed {
                return;
            }
            let blocked = gate::is_blocked(profile, inner.options.viewport_breakpoint);
            (inner.enabled, blocked)
        };

        if blocked && was_enabled {
            debug!("capability gate closed, deactivating cursor");
            release_binding(&self.inner, false);
            let mut inner = self.inner.borrow_mut();
            if let Some(timer) = inner.resume_timer.take() {
                inner.scheduler.clear_timeout(timer);
            }
            if let Some(frame) = inner.frame_id.take() {
                inner.scheduler.cancel_frame(frame);
            }
            inner.spin.pause();
            inner.glyph_tween = None;
            inner.corner_tween = None;
            inner.pending_align = None;
            inner.last_frame = None;
            inner.enabled = false;
            // Brackets must not reappear framing a stale rectangle if the
            // gate later reopens.
            inner
                .corners
                .set(idle_formation(inner.options.tunables.corner_size));
            inner.native_hidden.set(false);
            inner.glyph_visible.set(false);
        } else if !blocked && !was_enabled {
            debug!("capability gate reopened, activating cursor");
            let mut inner = self.inner.borrow_mut();
            inner.enabled = true;
            inner.native_hidden.set(inner.options.hide_native_cursor);
            inner.glyph_visible.set(true);
            inner.spin.resume();
            drop(inner);
            ensure_frame(&self.inner);
        }
    }

    /// Tear the subsystem down: all listeners removed, timers cleared, native
    /// pointer restored. Idempotent, and safe even if the gate never opened.
    pub fn dispose(&self) {
        let mut inner = self.inner.borrow_mut();
        if inner.disposed {
            return;
        }
        inner.disposed = true;
        if let Some(bound) = inner.bound.take() {
            inner.listeners.unsubscribe(bound.move_sub);
            inner.listeners.unsubscribe(bound.leave_sub);
        }
        inner.listeners.clear();
        if let Some(timer) = inner.resume_timer.take() {
            inner.scheduler.clear_timeout(timer);
        }
        if let Some(frame) = inner.frame_id.take() {
            inner.scheduler.cancel_frame(frame);
        }
        inner.glyph_tween = None;
        inner.corner_tween = None;
        inner.pending_align = None;
        inner.enabled = false;
        inner.mode.set(CursorMode::Idle);
        inner.native_hidden.set(false);
        inner.glyph_visible.set(false);
        debug!("cursor subsystem disposed");
    }

    // -------------------------------------------------------------------------
    // Outbound visual state
    // -------------------------------------------------------------------------

    /// Glyph center position signal.
    pub fn position(&self) -> Signal<Point> {
        self.inner.borrow().position.clone()
    }

    /// Glyph rotation signal, degrees in `[0, 360)`.
    pub fn rotation_degrees(&self) -> Signal<f32> {
        self.inner.borrow().rotation.clone()
    }

    /// Idle/Bound mode signal.
    pub fn mode(&self) -> Signal<CursorMode> {
        self.inner.borrow().mode.clone()
    }

    /// Corner bracket offsets signal (one atomic `[Vec2; 4]` per frame).
    pub fn corner_offsets(&self) -> Signal<CornerOffsets> {
        self.inner.borrow().corners.clone()
    }

    /// Whether the host should hide the native system pointer.
    pub fn native_cursor_hidden(&self) -> Signal<bool> {
        self.inner.borrow().native_hidden.clone()
    }

    /// Whether the glyph should be rendered at all (false when gated off).
    pub fn glyph_visible(&self) -> Signal<bool> {
        self.inner.borrow().glyph_visible.clone()
    }

    // -------------------------------------------------------------------------
    // Introspection
    // -------------------------------------------------------------------------

    pub fn is_enabled(&self) -> bool {
        self.inner.borrow().enabled
    }

    /// The currently bound element, if any.
    pub fn bound_target(&self) -> Option<ElementId> {
        self.inner.borrow().bound_element()
    }

    /// Total installed per-target listeners. At most 2 (one move, one leave).
    pub fn listener_count(&self) -> usize {
        self.inner.borrow().listeners.count()
    }

    /// Installed listeners for one element.
    pub fn listener_count_for(&self, element: ElementId) -> usize {
        self.inner.borrow().listeners.count_for(element)
    }
}

impl<T: ElementTree + 'static> Drop for Reticle<T> {
    fn drop(&mut self) {
        self.dispose();
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::anim::ManualScheduler;
    use crate::tree::{ElementDesc, StaticTree};
    use crate::types::{Rect, Vec2};
    use std::time::Duration;

    const EPS: f32 = 1e-3;

    struct Fixture {
        tree: Rc<RefCell<StaticTree>>,
        scheduler: Rc<ManualScheduler>,
        cursor: Reticle<RefCell<StaticTree>>,
    }

    fn mount_with(profile: &DeviceProfile, options: CursorOptions) -> Fixture {
        let tree = Rc::new(RefCell::new(StaticTree::new()));
        let scheduler = Rc::new(ManualScheduler::new());
        let cursor = Reticle::mount(
            tree.clone(),
            scheduler.clone() as Rc<dyn Scheduler>,
            profile,
            options,
        );
        Fixture {
            tree,
            scheduler,
            cursor,
        }
    }

    fn mount_desktop() -> Fixture {
        mount_with(
            &DeviceProfile::desktop(1920.0, 1080.0),
            CursorOptions::default(),
        )
    }

    fn insert_button(fx: &Fixture, rect: Rect) -> ElementId {
        let root = fx.tree.borrow().root();
        fx.tree
            .borrow_mut()
            .insert(root, ElementDesc::new("button").rect(rect))
    }

    /// One event-loop tick: advance the clock, render a frame.
    fn step(fx: &Fixture, millis: u64) {
        fx.scheduler.step(Duration::from_millis(millis));
    }

    fn approx(a: Vec2, b: Vec2) -> bool {
        (a.x - b.x).abs() < EPS && (a.y - b.y).abs() < EPS
    }

    // -------------------------------------------------------------------------
    // Capability gate
    // -------------------------------------------------------------------------

    #[test]
    fn test_touch_device_is_inert() {
        let mut profile = DeviceProfile::desktop(1920.0, 1080.0);
        profile.max_touch_points = 5;
        let fx = mount_with(&profile, CursorOptions::default());

        assert!(!fx.cursor.is_enabled());
        assert!(!fx.cursor.native_cursor_hidden().get());
        assert!(!fx.cursor.glyph_visible().get());
        // No frames were ever requested.
        assert_eq!(fx.scheduler.pending_frames(), 0);

        // Events are dropped without registering anything.
        let button = insert_button(&fx, Rect::new(100.0, 100.0, 50.0, 50.0));
        fx.cursor.pointer_over(button, PointerEvent::mouse(110.0, 110.0));
        assert_eq!(fx.cursor.listener_count(), 0);
        assert_eq!(fx.cursor.bound_target(), None);
    }

    #[test]
    fn test_desktop_hides_native_pointer() {
        let fx = mount_desktop();
        assert!(fx.cursor.is_enabled());
        assert!(fx.cursor.native_cursor_hidden().get());
        assert!(fx.cursor.glyph_visible().get());
    }

    #[test]
    fn test_hide_native_cursor_opt_out() {
        let options = CursorOptions {
            hide_native_cursor: false,
            ..Default::default()
        };
        let fx = mount_with(&DeviceProfile::desktop(1920.0, 1080.0), options);
        assert!(fx.cursor.is_enabled());
        assert!(!fx.cursor.native_cursor_hidden().get());
    }

    #[test]
    fn test_viewport_shrink_deactivates_and_rearms() {
        let fx = mount_desktop();
        let button = insert_button(&fx, Rect::new(100.0, 100.0, 50.0, 50.0));
        fx.cursor.pointer_over(button, PointerEvent::mouse(110.0, 110.0));
        assert_eq!(fx.cursor.listener_count(), 2);

        // Let the brackets settle on the target before the gate closes.
        let idle = idle_formation(CursorOptions::default().tunables.corner_size);
        step(&fx, 0);
        step(&fx, 300);
        assert!(!approx(fx.cursor.corner_offsets().get()[0], idle[0]));

        // Window resized down to a mobile-sized viewport.
        fx.cursor
            .viewport_changed(&DeviceProfile::desktop(600.0, 800.0));
        assert!(!fx.cursor.is_enabled());
        assert!(!fx.cursor.native_cursor_hidden().get());
        assert_eq!(fx.cursor.listener_count(), 0);
        assert_eq!(fx.cursor.bound_target(), None);
        assert_eq!(fx.scheduler.pending_timers(), 0);

        // No stale target frame survives deactivation.
        let corners = fx.cursor.corner_offsets().get();
        for i in 0..4 {
            assert!(approx(corners[i], idle[i]), "corner {i}");
        }

        // And back up.
        fx.cursor
            .viewport_changed(&DeviceProfile::desktop(1920.0, 1080.0));
        assert!(fx.cursor.is_enabled());
        assert!(fx.cursor.native_cursor_hidden().get());

        // Idle spin runs again.
        step(&fx, 0);
        step(&fx, 250);
        assert!(fx.cursor.rotation_degrees().get() > 0.0);
    }

    // -------------------------------------------------------------------------
    // Idle spin
    // -------------------------------------------------------------------------

    #[test]
    fn test_idle_spin_constant_velocity() {
        let fx = mount_desktop();
        step(&fx, 0); // dt baseline

        // spin_duration 2 s -> 180 deg/s.
        step(&fx, 250);
        assert!((fx.cursor.rotation_degrees().get() - 45.0).abs() < EPS);
        step(&fx, 250);
        assert!((fx.cursor.rotation_degrees().get() - 90.0).abs() < EPS);
    }

    #[test]
    fn test_glyph_tracks_pointer() {
        let fx = mount_desktop();
        step(&fx, 0);

        fx.cursor.pointer_moved(PointerEvent::mouse(300.0, 200.0));
        // Past the 0.1 s tracking tween.
        step(&fx, 16);
        step(&fx, 200);
        let p = fx.cursor.position().get();
        assert!((p.x - 300.0).abs() < EPS);
        assert!((p.y - 200.0).abs() < EPS);
    }

    #[test]
    fn test_empty_touch_events_are_noops() {
        let fx = mount_desktop();
        let button = insert_button(&fx, Rect::new(100.0, 100.0, 50.0, 50.0));

        fx.cursor.pointer_over(button, PointerEvent::touch_empty());
        assert_eq!(fx.cursor.bound_target(), None);

        fx.cursor.pointer_over(button, PointerEvent::touch(110.0, 110.0));
        assert_eq!(fx.cursor.bound_target(), Some(button));

        let before = fx.cursor.position().get();
        fx.cursor.pointer_moved(PointerEvent::touch_empty());
        step(&fx, 16);
        assert_eq!(fx.cursor.position().get(), before);
    }

    // -------------------------------------------------------------------------
    // Bind / release lifecycle
    // -------------------------------------------------------------------------

    #[test]
    fn test_bind_installs_listeners_and_pauses_spin() {
        let fx = mount_desktop();
        step(&fx, 0);
        step(&fx, 250); // 45 degrees

        let button = insert_button(&fx, Rect::new(100.0, 100.0, 50.0, 50.0));
        fx.cursor.pointer_over(button, PointerEvent::mouse(110.0, 110.0));

        assert_eq!(fx.cursor.mode().get(), CursorMode::Bound);
        assert_eq!(fx.cursor.bound_target(), Some(button));
        assert_eq!(fx.cursor.listener_count(), 2);
        assert_eq!(fx.cursor.listener_count_for(button), 2);

        // Rotation frozen at the captured angle, not reset to zero.
        let frozen = fx.cursor.rotation_degrees().get();
        assert!((frozen - 45.0).abs() < EPS);
        step(&fx, 250);
        assert_eq!(fx.cursor.rotation_degrees().get(), frozen);
    }

    #[test]
    fn test_bind_aligns_corners_without_parallax() {
        let options = CursorOptions::default();
        let tunables = options.tunables;
        let fx = mount_with(&DeviceProfile::desktop(1920.0, 1080.0), options);

        // Park the glyph at a known center first.
        fx.cursor.pointer_moved(PointerEvent::mouse(40.0, 60.0));
        step(&fx, 0);
        step(&fx, 200);
        let center = fx.cursor.position().get();
        assert!((center.x - 40.0).abs() < EPS);

        let target = Rect::new(100.0, 100.0, 50.0, 50.0);
        let button = insert_button(&fx, target);
        fx.cursor.pointer_over(button, PointerEvent::mouse(110.0, 110.0));

        // Play the 0.2 s alignment tween out.
        step(&fx, 0);
        step(&fx, 300);

        let corners = fx.cursor.corner_offsets().get();
        let expected = compute_corner_offsets(target, center, &tunables, None);
        for i in 0..4 {
            assert!(approx(corners[i], expected[i]), "corner {i}");
        }
        // Reference point: top-left bracket at (97 - cx, 97 - cy).
        assert!(approx(corners[0], Vec2::new(97.0 - 40.0, 97.0 - 60.0)));
    }

    #[test]
    fn test_reentry_is_idempotent() {
        let fx = mount_desktop();
        let button = insert_button(&fx, Rect::new(100.0, 100.0, 50.0, 50.0));

        fx.cursor.pointer_over(button, PointerEvent::mouse(110.0, 110.0));
        assert_eq!(fx.cursor.listener_count(), 2);

        for _ in 0..5 {
            fx.cursor.pointer_over(button, PointerEvent::mouse(120.0, 115.0));
        }
        assert_eq!(fx.cursor.listener_count(), 2);
        assert_eq!(fx.cursor.listener_count_for(button), 2);
    }

    #[test]
    fn test_release_before_bind_ordering() {
        let fx = mount_desktop();
        let a = insert_button(&fx, Rect::new(0.0, 0.0, 50.0, 50.0));
        let b = insert_button(&fx, Rect::new(200.0, 0.0, 50.0, 50.0));

        fx.cursor.pointer_over(a, PointerEvent::mouse(10.0, 10.0));
        assert_eq!(fx.cursor.listener_count_for(a), 2);

        // Direct hop A -> B, no leave event on A.
        fx.cursor.pointer_over(b, PointerEvent::mouse(210.0, 10.0));
        assert_eq!(fx.cursor.bound_target(), Some(b));
        assert_eq!(fx.cursor.listener_count_for(a), 0);
        assert_eq!(fx.cursor.listener_count_for(b), 2);
        // At-most-one binding: never more than one listener set installed.
        assert_eq!(fx.cursor.listener_count(), 2);
    }

    #[test]
    fn test_leave_releases_and_resumes_after_debounce() {
        let fx = mount_desktop();
        step(&fx, 0);
        step(&fx, 250); // 45 degrees

        let button = insert_button(&fx, Rect::new(100.0, 100.0, 50.0, 50.0));
        fx.cursor.pointer_over(button, PointerEvent::mouse(110.0, 110.0));
        let frozen = fx.cursor.rotation_degrees().get();

        fx.cursor.target_left(button);
        assert_eq!(fx.cursor.mode().get(), CursorMode::Idle);
        assert_eq!(fx.cursor.listener_count(), 0);

        // Inside the debounce window the spin stays paused.
        step(&fx, 0);
        step(&fx, 20);
        assert_eq!(fx.cursor.rotation_degrees().get(), frozen);
        step(&fx, 29);
        assert_eq!(fx.cursor.rotation_degrees().get(), frozen);

        // Window expires; spin resumes from the captured angle.
        step(&fx, 1);
        step(&fx, 100);
        let angle = fx.cursor.rotation_degrees().get();
        assert!((angle - (frozen + 18.0)).abs() < 0.5);
    }

    #[test]
    fn test_release_collapses_corners_to_idle_formation() {
        let fx = mount_desktop();
        let button = insert_button(&fx, Rect::new(100.0, 100.0, 50.0, 50.0));
        fx.cursor.pointer_over(button, PointerEvent::mouse(110.0, 110.0));
        step(&fx, 0);
        step(&fx, 300);

        fx.cursor.target_left(button);
        step(&fx, 0);
        step(&fx, 400); // past the 0.3 s release tween

        let corners = fx.cursor.corner_offsets().get();
        let idle = idle_formation(CursorOptions::default().tunables.corner_size);
        for i in 0..4 {
            assert!(approx(corners[i], idle[i]), "corner {i}");
        }
    }

    #[test]
    fn test_rebind_inside_debounce_cancels_resume() {
        let fx = mount_desktop();
        step(&fx, 0);
        step(&fx, 250);

        let a = insert_button(&fx, Rect::new(0.0, 0.0, 50.0, 50.0));
        let b = insert_button(&fx, Rect::new(200.0, 0.0, 50.0, 50.0));

        fx.cursor.pointer_over(a, PointerEvent::mouse(10.0, 10.0));
        let frozen = fx.cursor.rotation_degrees().get();
        fx.cursor.target_left(a);
        assert_eq!(fx.scheduler.pending_timers(), 1);

        // Re-bind before the 50 ms window expires.
        step(&fx, 20);
        fx.cursor.pointer_over(b, PointerEvent::mouse(210.0, 10.0));
        assert_eq!(fx.scheduler.pending_timers(), 0);
        assert_eq!(fx.cursor.bound_target(), Some(b));
        assert_eq!(fx.cursor.listener_count(), 2);

        // Long after the window: rotation never moved, spin never resumed.
        step(&fx, 200);
        step(&fx, 200);
        assert_eq!(fx.cursor.rotation_degrees().get(), frozen);
        assert_eq!(fx.cursor.mode().get(), CursorMode::Bound);
    }

    #[test]
    fn test_direct_hop_never_resumes_spin() {
        // Enter A, then enter B with no leave event on A observed.
        let fx = mount_desktop();
        let a = insert_button(&fx, Rect::new(0.0, 0.0, 50.0, 50.0));
        let b = insert_button(&fx, Rect::new(200.0, 0.0, 50.0, 50.0));

        fx.cursor.pointer_over(a, PointerEvent::mouse(10.0, 10.0));
        fx.cursor.pointer_over(b, PointerEvent::mouse(210.0, 10.0));

        // One release of A, one bind of B, no resume timer ever scheduled.
        assert_eq!(fx.scheduler.pending_timers(), 0);
        assert_eq!(fx.cursor.mode().get(), CursorMode::Bound);
        assert_eq!(fx.cursor.bound_target(), Some(b));
    }

    // -------------------------------------------------------------------------
    // Move throttling
    // -------------------------------------------------------------------------

    #[test]
    fn test_move_storm_coalesces_to_one_recompute() {
        let options = CursorOptions::default();
        let tunables = options.tunables;
        let fx = mount_with(&DeviceProfile::desktop(1920.0, 1080.0), options);
        let target = Rect::new(100.0, 100.0, 50.0, 50.0);
        let button = insert_button(&fx, target);

        fx.cursor.pointer_over(button, PointerEvent::mouse(110.0, 110.0));
        step(&fx, 0);
        step(&fx, 300); // initial alignment settled

        // Storm of moves before the next frame: only the last sample counts.
        fx.cursor.target_moved(button, PointerEvent::mouse(105.0, 105.0));
        fx.cursor.target_moved(button, PointerEvent::mouse(120.0, 130.0));
        fx.cursor.target_moved(button, PointerEvent::mouse(140.0, 145.0));

        step(&fx, 16);
        step(&fx, 300); // play the retargeted tween out

        let corners = fx.cursor.corner_offsets().get();
        let center = fx.cursor.position().get();
        let expected = compute_corner_offsets(
            target,
            center,
            &tunables,
            Some(Point::new(140.0, 145.0)),
        );
        for i in 0..4 {
            assert!(approx(corners[i], expected[i]), "corner {i}");
        }
    }

    #[test]
    fn test_move_on_unbound_element_is_ignored() {
        let fx = mount_desktop();
        let a = insert_button(&fx, Rect::new(0.0, 0.0, 50.0, 50.0));
        let b = insert_button(&fx, Rect::new(200.0, 0.0, 50.0, 50.0));

        fx.cursor.pointer_over(a, PointerEvent::mouse(10.0, 10.0));
        step(&fx, 0);
        step(&fx, 300);
        let before = fx.cursor.corner_offsets().get();

        // Stale move from an element that is not bound.
        fx.cursor.target_moved(b, PointerEvent::mouse(210.0, 10.0));
        step(&fx, 16);
        assert_eq!(fx.cursor.corner_offsets().get(), before);
    }

    // -------------------------------------------------------------------------
    // Failure semantics
    // -------------------------------------------------------------------------

    #[test]
    fn test_detached_target_releases_defensively() {
        let fx = mount_desktop();
        let button = insert_button(&fx, Rect::new(100.0, 100.0, 50.0, 50.0));
        fx.cursor.pointer_over(button, PointerEvent::mouse(110.0, 110.0));
        step(&fx, 0);
        step(&fx, 300);

        // Element vanishes mid-interaction.
        fx.tree.borrow_mut().detach(button);
        fx.cursor.target_moved(button, PointerEvent::mouse(120.0, 120.0));
        step(&fx, 16);

        assert_eq!(fx.cursor.mode().get(), CursorMode::Idle);
        assert_eq!(fx.cursor.bound_target(), None);
        assert_eq!(fx.cursor.listener_count(), 0);

        // Recoverable: the spin comes back after the debounce.
        step(&fx, 60);
        step(&fx, 250);
        assert!(fx.cursor.rotation_degrees().get() > 0.0);
    }

    #[test]
    fn test_degenerate_rect_releases_defensively() {
        let fx = mount_desktop();
        let button = insert_button(&fx, Rect::new(100.0, 100.0, 50.0, 50.0));
        fx.cursor.pointer_over(button, PointerEvent::mouse(110.0, 110.0));
        step(&fx, 0);

        fx.tree
            .borrow_mut()
            .set_rect(button, Rect::new(100.0, 100.0, 0.0, 0.0));
        fx.cursor.target_moved(button, PointerEvent::mouse(120.0, 120.0));
        step(&fx, 16);

        assert_eq!(fx.cursor.mode().get(), CursorMode::Idle);
        assert_eq!(fx.cursor.listener_count(), 0);
    }

    // -------------------------------------------------------------------------
    // Phase continuity
    // -------------------------------------------------------------------------

    #[test]
    fn test_phase_continuity_across_arbitrary_pause() {
        let fx = mount_desktop();
        step(&fx, 0);
        step(&fx, 750); // 135 degrees at 180 deg/s

        let button = insert_button(&fx, Rect::new(100.0, 100.0, 50.0, 50.0));
        fx.cursor.pointer_over(button, PointerEvent::mouse(110.0, 110.0));
        let captured = fx.cursor.rotation_degrees().get();
        assert!((captured - 135.0).abs() < EPS);

        // Arbitrary bound duration.
        for _ in 0..10 {
            step(&fx, 500);
        }

        fx.cursor.target_left(button);
        step(&fx, 49); // still inside the debounce window
        assert_eq!(fx.cursor.rotation_degrees().get(), captured);

        step(&fx, 1); // debounce expires, resume fires
        let start = fx.cursor.rotation_degrees().get();
        assert!((start - captured).abs() < 0.5);

        step(&fx, 100);
        let moved = fx.cursor.rotation_degrees().get() - start;
        // 180 deg/s * 0.1 s, same velocity as before the pause.
        assert!((moved - 18.0).abs() < 1.0);
    }

    // -------------------------------------------------------------------------
    // Teardown
    // -------------------------------------------------------------------------

    #[test]
    fn test_dispose_is_idempotent_and_restores_pointer() {
        let fx = mount_desktop();
        let button = insert_button(&fx, Rect::new(100.0, 100.0, 50.0, 50.0));
        fx.cursor.pointer_over(button, PointerEvent::mouse(110.0, 110.0));
        fx.cursor.target_left(button);
        assert_eq!(fx.scheduler.pending_timers(), 1);

        fx.cursor.dispose();
        assert!(!fx.cursor.is_enabled());
        assert_eq!(fx.cursor.listener_count(), 0);
        assert!(!fx.cursor.native_cursor_hidden().get());
        assert_eq!(fx.scheduler.pending_timers(), 0);

        // Second dispose and post-dispose events are harmless.
        fx.cursor.dispose();
        fx.cursor.pointer_over(button, PointerEvent::mouse(110.0, 110.0));
        fx.cursor.pointer_moved(PointerEvent::mouse(5.0, 5.0));
        assert_eq!(fx.cursor.listener_count(), 0);
    }

    #[test]
    fn test_dispose_on_gated_instance_is_safe() {
        let mut profile = DeviceProfile::desktop(1920.0, 1080.0);
        profile.max_touch_points = 1;
        let fx = mount_with(&profile, CursorOptions::default());
        fx.cursor.dispose();
        fx.cursor.dispose();
        assert_eq!(fx.cursor.listener_count(), 0);
    }
}
