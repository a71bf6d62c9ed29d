use crate::animation::ease::Ease;
use crate::animation::tween::Tween;
use crate::foundation::core::{Progress, Timestamp};
use crate::sequence::timeline::Timeline;

/// What the per-frame loop should animate next.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub enum AnimationCommand {
    /// Animate progress to `target`.
    RunTo {
        /// Progress to end on.
        target: Progress,
        /// Length of the animation.
        duration_ms: u64,
        /// Curve of the animation.
        ease: Ease,
    },
    /// Animate progress to the start of `phase` (`phase == segment count` is the end).
    RunToPhase {
        /// Phase whose start boundary is the target.
        phase: usize,
        /// Length of the animation.
        duration_ms: u64,
        /// Curve of the animation.
        ease: Ease,
    },
    /// Stop wherever progress currently is.
    Cancel,
}

/// Single-slot command queue consumed by the frame loop.
///
/// Only the newest command is ever in flight: pushing supersedes both a command that has not
/// started yet and the running tween, which continues smoothly from its current value.
#[derive(Clone, Debug, Default)]
pub struct CommandQueue {
    pending: Option<AnimationCommand>,
    active: Option<Tween>,
}

impl CommandQueue {
    /// Idle queue.
    pub fn new() -> Self {
        Self::default()
    }

    /// Enqueue `command`. Returns whether something in flight was superseded.
    pub fn push(&mut self, command: AnimationCommand) -> bool {
        let busy = !self.is_idle();
        if matches!(command, AnimationCommand::Cancel) {
            self.clear();
            return busy;
        }
        if busy {
            tracing::debug!(?command, "superseding in-flight animation");
        }
        self.pending = Some(command);
        busy
    }

    /// Nothing pending and nothing running.
    pub fn is_idle(&self) -> bool {
        self.pending.is_none() && self.active.is_none()
    }

    /// Progress the queue is heading for, if any.
    pub fn target(&self, timeline: &Timeline) -> Option<Progress> {
        match self.pending {
            Some(cmd) => resolve(cmd, timeline).map(|(target, _, _)| target),
            None => self.active.map(|t| Progress::new(t.target())),
        }
    }

    /// Drop the pending command and the running tween.
    pub fn clear(&mut self) {
        self.pending = None;
        self.active = None;
    }

    /// Advance to `now`. Returns the progress to apply, or `None` when idle.
    pub fn tick(
        &mut self,
        now: Timestamp,
        current: Progress,
        timeline: &Timeline,
    ) -> Option<Progress> {
        if let Some(cmd) = self.pending.take() {
            match resolve(cmd, timeline) {
                Some((target, duration_ms, ease)) => {
                    self.start(now, current, target, duration_ms, ease)
                }
                None => tracing::warn!(?cmd, "dropping animation command with no target"),
            }
        }
        let tween = self.active?;
        let value = Progress::new(tween.sample(now));
        if tween.is_done(now) {
            tracing::trace!(target = tween.target(), "animation finished");
            self.active = None;
        }
        Some(value)
    }

    fn start(
        &mut self,
        now: Timestamp,
        current: Progress,
        target: Progress,
        duration_ms: u64,
        ease: Ease,
    ) {
        match &mut self.active {
            Some(tween) if tween.ease() == ease => tween.retarget(now, target.get(), duration_ms),
            Some(tween) => {
                let from = tween.sample(now);
                *tween = Tween::new(from, target.get(), now, duration_ms, ease);
            }
            None => {
                self.active = Some(Tween::new(
                    current.get(),
                    target.get(),
                    now,
                    duration_ms,
                    ease,
                ));
            }
        }
    }
}

fn resolve(cmd: AnimationCommand, timeline: &Timeline) -> Option<(Progress, u64, Ease)> {
    match cmd {
        AnimationCommand::RunTo {
            target,
            duration_ms,
            ease,
        } => Some((target, duration_ms, ease)),
        AnimationCommand::RunToPhase {
            phase,
            duration_ms,
            ease,
        } => timeline.boundary(phase).map(|p| (p, duration_ms, ease)),
        AnimationCommand::Cancel => None,
    }
}

#[cfg(test)]
#[path = "../../tests/unit/runtime/commands.rs"]
mod tests;
