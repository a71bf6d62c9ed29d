use std::cell::RefCell;
use std::rc::Rc;

use crate::runtime::frame::{FrameRequest, FrameScheduler};

#[derive(Debug, Default)]
struct FrameLog {
    next: u64,
    pending: Vec<FrameRequest>,
    requested: usize,
    cancelled: usize,
}

/// Frame scheduler fired by hand.
#[derive(Clone, Debug, Default)]
pub struct ManualFrames {
    log: Rc<RefCell<FrameLog>>,
}

impl ManualFrames {
    /// Scheduler with nothing outstanding.
    pub fn new() -> Self {
        Self::default()
    }

    /// Outstanding requests, oldest first.
    pub fn pending(&self) -> Vec<FrameRequest> {
        self.log.borrow().pending.clone()
    }

    /// Whether any request is outstanding.
    pub fn has_pending(&self) -> bool {
        !self.log.borrow().pending.is_empty()
    }

    /// Consume every outstanding request, as a runtime does right before invoking the
    /// frame callback.
    pub fn take(&self) -> Vec<FrameRequest> {
        std::mem::take(&mut self.log.borrow_mut().pending)
    }

    /// Requests made so far.
    pub fn requested(&self) -> usize {
        self.log.borrow().requested
    }

    /// Outstanding requests cancelled so far.
    pub fn cancelled(&self) -> usize {
        self.log.borrow().cancelled
    }
}

impl FrameScheduler for ManualFrames {
    fn request_frame(&mut self) -> FrameRequest {
        let mut log = self.log.borrow_mut();
        log.next += 1;
        let request = FrameRequest(log.next);
        log.pending.push(request);
        log.requested += 1;
        request
    }

    fn cancel_frame(&mut self, request: FrameRequest) {
        let mut log = self.log.borrow_mut();
        if let Some(pos) = log.pending.iter().position(|r| *r == request) {
            log.pending.remove(pos);
            log.cancelled += 1;
        }
    }
}
