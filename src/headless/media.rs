use std::cell::RefCell;
use std::rc::Rc;

use crate::foundation::error::{ScrollPhaseError, ScrollPhaseResult};
use crate::media::coordinator::MediaHandle;

#[derive(Debug, Default)]
struct MediaLog {
    blocked: bool,
    playing: bool,
    play_attempts: usize,
    pauses: usize,
}

/// Media handle that records calls and can simulate an autoplay block.
#[derive(Clone, Debug, Default)]
pub struct RecordingMedia {
    log: Rc<RefCell<MediaLog>>,
}

impl RecordingMedia {
    /// Handle that plays whenever asked.
    pub fn new() -> Self {
        Self::default()
    }

    /// A handle whose `play()` is rejected until [`RecordingMedia::set_blocked`] clears it.
    pub fn blocked() -> Self {
        let media = Self::default();
        media.set_blocked(true);
        media
    }

    /// Reject (or accept) later `play()` calls.
    pub fn set_blocked(&self, blocked: bool) {
        self.log.borrow_mut().blocked = blocked;
    }

    /// Whether the last successful call was `play()`.
    pub fn is_playing(&self) -> bool {
        self.log.borrow().playing
    }

    /// `play()` calls so far, rejected ones included.
    pub fn play_attempts(&self) -> usize {
        self.log.borrow().play_attempts
    }

    /// `pause()` calls so far.
    pub fn pauses(&self) -> usize {
        self.log.borrow().pauses
    }
}

impl MediaHandle for RecordingMedia {
    fn play(&mut self) -> ScrollPhaseResult<()> {
        let mut log = self.log.borrow_mut();
        log.play_attempts += 1;
        if log.blocked {
            return Err(ScrollPhaseError::playback("autoplay blocked"));
        }
        log.playing = true;
        Ok(())
    }

    fn pause(&mut self) {
        let mut log = self.log.borrow_mut();
        log.playing = false;
        log.pauses += 1;
    }
}
