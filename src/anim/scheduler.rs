//! Scheduler - per-frame callbacks and one-shot timers.
//!
//! The subsystem's only asynchronous primitives pass through here: the
//! per-frame throttle that coalesces move storms, and the cancellable
//! debounce timer that guards spin resumption. Any per-frame callback
//! mechanism the host offers can back the trait; frame callbacks receive the
//! host's monotonic timestamp, like an animation-frame timestamp.
//!
//! [`ManualScheduler`] is the bundled deterministic implementation: tests
//! (and single-threaded embeddings that pump their own loop) advance time and
//! run frames explicitly.

use std::cell::RefCell;
use std::time::Duration;

/// Monotonic timestamp since an arbitrary host epoch.
pub type Timestamp = Duration;

/// Callback invoked on the next rendered frame with the frame's timestamp.
pub type FrameCallback = Box<dyn FnOnce(Timestamp)>;

/// Callback invoked when a one-shot timer fires.
pub type TimerCallback = Box<dyn FnOnce()>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameId(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerId(pub u64);

/// Host-provided frame and timer source.
pub trait Scheduler {
    /// Queue `cb` for the next rendered frame.
    fn request_frame(&self, cb: FrameCallback) -> FrameId;

    /// Drop a queued frame callback. Unknown ids are ignored.
    fn cancel_frame(&self, id: FrameId);

    /// Fire `cb` once after `delay`.
    fn set_timeout(&self, delay: Duration, cb: TimerCallback) -> TimerId;

    /// Cancel a pending timer. Unknown or already-fired ids are ignored.
    fn clear_timeout(&self, id: TimerId);
}

// =============================================================================
// MANUAL SCHEDULER
// =============================================================================

struct PendingFrame {
    id: FrameId,
    cb: FrameCallback,
}

struct PendingTimer {
    id: TimerId,
    deadline: Timestamp,
    cb: TimerCallback,
}

struct ManualInner {
    now: Timestamp,
    next_id: u64,
    frames: Vec<PendingFrame>,
    timers: Vec<PendingTimer>,
}

/// Deterministic scheduler driven by explicit `advance` / `run_frame` calls.
pub struct ManualScheduler {
    inner: RefCell<ManualInner>,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self {
            inner: RefCell::new(ManualInner {
                now: Timestamp::ZERO,
                next_id: 0,
                frames: Vec::new(),
                timers: Vec::new(),
            }),
        }
    }

    pub fn now(&self) -> Timestamp {
        self.inner.borrow().now
    }

    /// Advance the clock, firing due timers in deadline order. Timer
    /// callbacks may schedule further work; anything newly due still fires
    /// within this call.
    pub fn advance(&self, dt: Duration) {
        let target = {
            let mut inner = self.inner.borrow_mut();
            let target = inner.now + dt;
            inner.now = target;
            target
        };

        loop {
            // Pull one due timer at a time so callbacks never run under the
            // borrow and may re-enter the scheduler freely.
            let due = {
                let mut inner = self.inner.borrow_mut();
                let idx = inner
                    .timers
                    .iter()
                    .enumerate()
                    .filter(|(_, t)| t.deadline <= target)
                    .min_by_key(|(_, t)| t.deadline)
                    .map(|(i, _)| i);
                idx.map(|i| inner.timers.remove(i))
            };
            match due {
                Some(timer) => (timer.cb)(),
                None => break,
            }
        }
    }

    /// Run one rendered frame: invoke every currently queued frame callback
    /// with the current timestamp. Callbacks requesting the next frame are
    /// queued for the following `run_frame`, not this one.
    pub fn run_frame(&self) {
        let (now, batch) = {
            let mut inner = self.inner.borrow_mut();
            let batch = std::mem::take(&mut inner.frames);
            (inner.now, batch)
        };
        for frame in batch {
            (frame.cb)(now);
        }
    }

    /// One tick of a host event loop: advance the clock, then render a frame.
    pub fn step(&self, dt: Duration) {
        self.advance(dt);
        self.run_frame();
    }

    pub fn pending_frames(&self) -> usize {
        self.inner.borrow().frames.len()
    }

    pub fn pending_timers(&self) -> usize {
        self.inner.borrow().timers.len()
    }
}

impl Default for ManualScheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl Scheduler for ManualScheduler {
    fn request_frame(&self, cb: FrameCallback) -> FrameId {
        let mut inner = self.inner.borrow_mut();
        let id = FrameId(inner.next_id);
        inner.next_id += 1;
        inner.frames.push(PendingFrame { id, cb });
        id
    }

    fn cancel_frame(&self, id: FrameId) {
        let mut inner = self.inner.borrow_mut();
        inner.frames.retain(|f| f.id != id);
    }

    fn set_timeout(&self, delay: Duration, cb: TimerCallback) -> TimerId {
        let mut inner = self.inner.borrow_mut();
        let id = TimerId(inner.next_id);
        inner.next_id += 1;
        let deadline = inner.now + delay;
        inner.timers.push(PendingTimer { id, deadline, cb });
        id
    }

    fn clear_timeout(&self, id: TimerId) {
        let mut inner = self.inner.borrow_mut();
        inner.timers.retain(|t| t.id != id);
    }
}

// =============================================================================
// TESTS
// =============================================================================
