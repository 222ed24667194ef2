use std::cell::Cell;
use std::rc::Rc;
use crate::engine::BackgroundEngine;
use crate::surface::Canvas;

/// Identifier of one queued frame callback.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct FrameHandle(pub i32);

/// Shared flag handed to a runner when it starts. Every frame the runner
/// requested carries a clone, so frames already in flight see the
/// cancellation too.
#[derive(Clone, Debug, Default)]
pub struct CancelToken(Rc<Cell<bool>>);

impl CancelToken {
    pub fn new() -> Self {
        CancelToken::default()
    }

    pub fn cancel(&self) {
        self.0.set(true);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.get()
    }

    pub fn same_as(&self, other: &CancelToken) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

pub trait FrameScheduler {
    /// Queues one frame for the runner holding `token`. `None` when the host
    /// refused the request.
    fn request_frame(&mut self, token: CancelToken) -> Option<FrameHandle>;
    fn cancel_frame(&mut self, handle: FrameHandle);
}

/// Scheduler driven by hand: frames queue up until the owner fires them.
#[derive(Default)]
pub struct ManualScheduler {
    next_id: i32,
    pending: Vec<(FrameHandle, CancelToken)>,
    cancelled: usize,
}

impl ManualScheduler {
    pub fn new() -> Self {
        ManualScheduler::default()
    }

    pub fn pending(&self) -> usize {
        self.pending.len()
    }

    pub fn cancelled(&self) -> usize {
        self.cancelled
    }

    pub fn take_pending(&mut self) -> Vec<(FrameHandle, CancelToken)> {
        std::mem::take(&mut self.pending)
    }
}

impl FrameScheduler for ManualScheduler {
    fn request_frame(&mut self, token: CancelToken) -> Option<FrameHandle> {
        self.next_id += 1;
        let handle = FrameHandle(self.next_id);
        self.pending.push((handle, token));
        Some(handle)
    }

    fn cancel_frame(&mut self, handle: FrameHandle) {
        let before = self.pending.len();
        self.pending.retain(|(h, _)| *h != handle);
        self.cancelled += before - self.pending.len();
    }
}

impl<C: Canvas> BackgroundEngine<C, ManualScheduler> {
    /// Fires every frame queued so far at `time_ms`; returns how many fired.
    pub fn pump(&mut self, time_ms: f64) -> usize {
        let due = self.scheduler_mut().take_pending();
        let fired = due.len();
        for (_, token) in due {
            self.run_frame(&token, time_ms);
        }
        fired
    }

    pub fn pump_frames(&mut self, frames: usize, start_ms: f64, step_ms: f64) {
        for i in 0..frames {
            self.pump(start_ms + i as f64 * step_ms);
        }
    }
}
