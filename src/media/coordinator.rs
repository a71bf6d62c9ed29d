use crate::foundation::core::Progress;
use crate::foundation::error::{ScrollPhaseError, ScrollPhaseResult};

/// A playable resource, typically a muted inline video.
pub trait MediaHandle {
    /// Start playback. `Err` means the runtime refused, e.g. autoplay is blocked.
    fn play(&mut self) -> ScrollPhaseResult<()>;
    /// Stop playback, keeping the position.
    fn pause(&mut self);
}

/// Phases during which accompanying media plays.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct MediaCue {
    /// Phase indices during which the media plays.
    pub phases: Vec<usize>,
    /// Pause whenever progress rests on 0 or 1, i.e. once the sequence has been left.
    #[serde(default)]
    pub pause_at_boundaries: bool,
}

impl MediaCue {
    /// Cue playing in `phases`.
    pub fn new(phases: impl IntoIterator<Item = usize>) -> Self {
        Self {
            phases: phases.into_iter().collect(),
            pause_at_boundaries: false,
        }
    }

    /// Set whether playback pauses while progress rests on 0 or 1.
    pub fn pause_at_boundaries(mut self, yes: bool) -> Self {
        self.pause_at_boundaries = yes;
        self
    }

    /// Reject an empty cue or phases past `segment_count`.
    pub fn validate(&self, segment_count: usize) -> ScrollPhaseResult<()> {
        if self.phases.is_empty() {
            return Err(ScrollPhaseError::config("media cue lists no phases"));
        }
        match self.phases.iter().find(|p| **p >= segment_count) {
            Some(p) => Err(ScrollPhaseError::config(format!(
                "media cue phase {p} out of range (sequence has {segment_count} segments)"
            ))),
            None => Ok(()),
        }
    }

    /// Whether `phase` is cued.
    pub fn plays_in(&self, phase: usize) -> bool {
        self.phases.contains(&phase)
    }

    /// Whether media should be running at `progress` inside `phase`.
    pub fn should_play(&self, progress: Progress, phase: usize) -> bool {
        self.plays_in(phase) && (!self.pause_at_boundaries || progress.is_interior())
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
/// Playback as last driven by the [`MediaCoordinator`].
pub enum PlaybackState {
    /// Never started.
    #[default]
    Idle,
    /// Playing.
    Playing,
    /// Paused after playing or after leaving the cue.
    Paused,
    /// Last `play()` was rejected; waiting for a user gesture to retry.
    Blocked,
}

/// Keeps media playback in step with phase transitions.
///
/// Rejected playback never escapes: the coordinator records it and retries once on the next
/// user gesture. Every operation is a no-op while no handle is attached.
#[derive(Default)]
pub struct MediaCoordinator {
    cue: Option<MediaCue>,
    handle: Option<Box<dyn MediaHandle>>,
    state: PlaybackState,
    wants_play: bool,
    unlock_pending: bool,
}

impl MediaCoordinator {
    /// Coordinator for `cue` with no handle attached.
    pub fn new(cue: Option<MediaCue>) -> Self {
        Self {
            cue,
            ..Self::default()
        }
    }

    /// Phases that play media, if any.
    pub fn cue(&self) -> Option<&MediaCue> {
        self.cue.as_ref()
    }

    /// Current playback state.
    pub fn state(&self) -> PlaybackState {
        self.state
    }

    /// Whether a handle is attached.
    pub fn is_attached(&self) -> bool {
        self.handle.is_some()
    }

    /// A rejected `play()` is waiting for a user gesture.
    pub fn unlock_pending(&self) -> bool {
        self.unlock_pending
    }

    /// Attach a handle; if playback was requested while detached it starts now.
    pub fn attach(&mut self, handle: Box<dyn MediaHandle>) {
        self.handle = Some(handle);
        if self.wants_play {
            self.try_play();
        }
    }

    /// Pause and hand back the handle.
    pub fn detach(&mut self) -> Option<Box<dyn MediaHandle>> {
        let mut handle = self.handle.take()?;
        if self.state == PlaybackState::Playing {
            handle.pause();
        }
        self.state = PlaybackState::Idle;
        Some(handle)
    }

    /// Start playback if `phase` is cued.
    pub fn on_phase_enter(&mut self, phase: usize) {
        if self.cue.as_ref().is_some_and(|c| c.plays_in(phase)) {
            self.start();
        }
    }

    /// Stop playback if `phase` is cued.
    pub fn on_phase_exit(&mut self, phase: usize) {
        if self.cue.as_ref().is_some_and(|c| c.plays_in(phase)) {
            self.stop();
        }
    }

    /// Derive enter/exit from a progress change.
    pub fn on_progress(
        &mut self,
        previous: Progress,
        previous_phase: usize,
        progress: Progress,
        phase: usize,
    ) {
        let Some(cue) = &self.cue else {
            return;
        };
        let before = cue.should_play(previous, previous_phase);
        let after = cue.should_play(progress, phase);
        match (before, after) {
            (false, true) => self.start(),
            (true, false) => self.stop(),
            _ => {}
        }
    }

    /// Start or stop to match `progress` directly, without a previous state to compare.
    pub fn sync(&mut self, progress: Progress, phase: usize) {
        let Some(cue) = &self.cue else {
            return;
        };
        if cue.should_play(progress, phase) {
            self.start();
        } else if self.wants_play {
            self.stop();
        }
    }

    /// Qualifying user input (tap, click, key): retry rejected playback.
    pub fn on_user_gesture(&mut self) {
        if !self.unlock_pending || !self.wants_play {
            return;
        }
        tracing::debug!("retrying blocked media playback after user gesture");
        self.try_play();
    }

    /// Stop playback and drop the handle.
    pub fn teardown(&mut self) {
        self.detach();
        self.wants_play = false;
        self.unlock_pending = false;
    }

    fn start(&mut self) {
        self.wants_play = true;
        self.try_play();
    }

    fn stop(&mut self) {
        self.wants_play = false;
        let Some(handle) = self.handle.as_mut() else {
            return;
        };
        if matches!(self.state, PlaybackState::Playing) {
            handle.pause();
        }
        self.state = PlaybackState::Paused;
    }

    fn try_play(&mut self) {
        let Some(handle) = self.handle.as_mut() else {
            return;
        };
        if self.state == PlaybackState::Playing {
            return;
        }
        match handle.play() {
            Ok(()) => {
                self.state = PlaybackState::Playing;
                self.unlock_pending = false;
            }
            Err(e) => {
                tracing::debug!(error = %e, "media playback rejected");
                self.state = PlaybackState::Blocked;
                self.unlock_pending = true;
            }
        }
    }
}

impl std::fmt::Debug for MediaCoordinator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MediaCoordinator")
            .field("cue", &self.cue)
            .field("attached", &self.handle.is_some())
            .field("state", &self.state)
            .field("unlock_pending", &self.unlock_pending)
            .finish()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/media/coordinator.rs"]
mod tests;
