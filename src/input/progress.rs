use crate::animation::ease::Ease;
use crate::foundation::core::{Direction, ListenerId, Listeners, Progress};
use crate::foundation::error::{ScrollPhaseError, ScrollPhaseResult};
use crate::foundation::math::unlerp_clamped;
use crate::input::event::InputEvent;
use crate::sequence::keyframe::{Basis, Length};
use crate::sequence::timeline::Timeline;
use crate::viewport::metrics::ViewportSnapshot;

/// Scroll offsets at which a scroll-linked sequence starts and ends.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ScrollRange {
    /// Offset at which progress is 0.
    pub start: Length,
    /// Offset at which progress is 1.
    pub end: Length,
}

impl ScrollRange {
    /// Starts when the container's top reaches the viewport top and runs for `distance`.
    pub fn pinned(distance: Length) -> Self {
        let top = Length::relative(Basis::ContainerTop, 1.0);
        Self {
            start: top.clone(),
            end: top + distance,
        }
    }

    /// Starts when the container's top enters the viewport bottom and ends when its
    /// bottom leaves the viewport top.
    pub fn through_viewport() -> Self {
        Self {
            start: Length::relative(Basis::ContainerTop, 1.0)
                + Length::relative(Basis::ViewportHeight, -1.0),
            end: Length::relative(Basis::ContainerTop, 1.0)
                + Length::relative(Basis::ContainerHeight, 1.0),
        }
    }

    /// `(start, end)` in document pixels.
    pub fn resolve(&self, viewport: &ViewportSnapshot) -> (f64, f64) {
        (self.start.resolve(viewport), self.end.resolve(viewport))
    }
}

impl Default for ScrollRange {
    fn default() -> Self {
        Self::pinned(Length::relative(Basis::ViewportHeight, 1.0))
    }
}

/// Progress follows the scroll offset through a [`ScrollRange`].
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ScrollLinkedConfig {
    /// Offsets mapped onto `[0, 1]`.
    pub range: ScrollRange,
    /// Lag, in milliseconds, with which progress catches up to the scroll offset.
    #[serde(default)]
    pub scrub_ms: Option<u64>,
    /// Curve of the catch-up animation.
    #[serde(default = "default_scrub_ease")]
    pub scrub_ease: Ease,
}

fn default_scrub_ease() -> Ease {
    Ease::OutQuad
}

/// Wheel and touch deltas drive progress until the sequence completes.
///
/// The defaults were tuned by feel; treat them as starting points, not derived values.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct GestureConfig {
    /// Progress per wheel pixel.
    pub wheel_sensitivity: f64,
    /// Progress per touch pixel when dragging forward.
    pub touch_forward_sensitivity: f64,
    /// Progress per touch pixel when dragging back; higher so collapsing feels lighter.
    pub touch_reverse_sensitivity: f64,
    /// Progress restored by a reverse gesture once the sequence is complete.
    pub rest_progress: f64,
    /// Minimum reverse touch travel, in pixels, that re-enters a completed sequence.
    pub reverse_touch_threshold: f64,
    /// How far, in pixels, the page may be scrolled past the anchor and still count as "at top".
    pub anchor_tolerance: f64,
}

impl Default for GestureConfig {
    fn default() -> Self {
        Self {
            wheel_sensitivity: 0.0009,
            touch_forward_sensitivity: 0.005,
            touch_reverse_sensitivity: 0.008,
            rest_progress: 0.9,
            reverse_touch_threshold: 20.0,
            anchor_tolerance: 5.0,
        }
    }
}

/// Tap, hover or visibility activates one step at a time.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct DiscreteConfig {
    /// Duration of the animated jump between steps.
    pub transition_ms: u64,
    /// Curve of the jump between steps.
    pub ease: Ease,
    /// After a tap, visibility-driven activations are ignored for this long.
    pub tap_lock_ms: u64,
    /// Whether pointer hover activates steps (desktop layouts).
    pub hover_activates: bool,
    /// Step shown on mount.
    pub initial_phase: Option<usize>,
}

impl Default for DiscreteConfig {
    fn default() -> Self {
        Self {
            transition_ms: 450,
            ease: Ease::InOutCubic,
            tap_lock_ms: 700,
            hover_activates: true,
            initial_phase: None,
        }
    }
}

/// How raw input becomes progress.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub enum InputMode {
    /// Progress follows the page's scroll offset.
    ScrollLinked(ScrollLinkedConfig),
    /// Wheel and touch deltas accumulate into progress.
    Gesture(GestureConfig),
    /// Taps, hover or visibility select one step at a time.
    Discrete(DiscreteConfig),
}

impl Default for InputMode {
    fn default() -> Self {
        Self::ScrollLinked(ScrollLinkedConfig::default())
    }
}

impl InputMode {
    /// Reject non-finite or out-of-range tuning values.
    pub fn validate(&self) -> ScrollPhaseResult<()> {
        match self {
            Self::ScrollLinked(cfg) => {
                cfg.range.start.validate()?;
                cfg.range.end.validate()?;
                if !cfg.scrub_ease.is_valid() {
                    return Err(ScrollPhaseError::config("scrub ease is invalid"));
                }
                Ok(())
            }
            Self::Gesture(cfg) => {
                for (what, v) in [
                    ("wheel_sensitivity", cfg.wheel_sensitivity),
                    ("touch_forward_sensitivity", cfg.touch_forward_sensitivity),
                    ("touch_reverse_sensitivity", cfg.touch_reverse_sensitivity),
                ] {
                    if !(v.is_finite() && v > 0.0) {
                        return Err(ScrollPhaseError::config(format!("{what} must be > 0")));
                    }
                }
                if !(0.0..1.0).contains(&cfg.rest_progress) {
                    return Err(ScrollPhaseError::config("rest_progress must lie in [0, 1)"));
                }
                if !(cfg.reverse_touch_threshold >= 0.0 && cfg.anchor_tolerance >= 0.0) {
                    return Err(ScrollPhaseError::config(
                        "touch threshold and anchor tolerance must be >= 0",
                    ));
                }
                Ok(())
            }
            Self::Discrete(cfg) => {
                if cfg.ease.is_valid() {
                    Ok(())
                } else {
                    Err(ScrollPhaseError::config("discrete ease is invalid"))
                }
            }
        }
    }
}

/// Change notification emitted by [`ProgressSource`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ProgressChange {
    /// Progress before the change.
    pub previous: Progress,
    /// Progress after the change.
    pub progress: Progress,
    /// Phase before the change.
    pub previous_phase: usize,
    /// Phase after the change.
    pub phase: usize,
}

/// Normalizes raw input into progress and phase.
pub struct ProgressSource {
    mode: InputMode,
    boundaries: Vec<f64>,
    progress: Progress,
    phase: usize,
    listeners: Listeners<ProgressChange>,
    touch_y: Option<f64>,
    last_offset: Option<f64>,
    range: (f64, f64),
    anchor: f64,
}

impl ProgressSource {
    /// Source at progress 0 with phase boundaries taken from `timeline`.
    pub fn new(mode: InputMode, timeline: &Timeline) -> Self {
        Self {
            mode,
            boundaries: timeline.segments().iter().map(|s| s.start).collect(),
            progress: Progress::START,
            phase: 0,
            listeners: Listeners::default(),
            touch_y: None,
            last_offset: None,
            range: (0.0, 0.0),
            anchor: 0.0,
        }
    }

    /// Input mode the source was built with.
    pub fn mode(&self) -> &InputMode {
        &self.mode
    }

    /// Current progress.
    pub fn progress(&self) -> Progress {
        self.progress
    }

    /// Index of the segment containing the current progress.
    pub fn phase(&self) -> usize {
        self.phase
    }

    /// Register a listener for progress or phase changes.
    pub fn on_change(&mut self, f: impl FnMut(&ProgressChange) + 'static) -> ListenerId {
        self.listeners.add(f)
    }

    /// Drop a listener; returns whether it was registered.
    pub fn remove_listener(&mut self, id: ListenerId) -> bool {
        self.listeners.remove(id)
    }

    /// Drop every listener.
    pub fn clear_listeners(&mut self) {
        self.listeners.clear();
    }

    fn phase_of(&self, p: Progress) -> usize {
        self.boundaries
            .partition_point(|start| *start <= p.get())
            .saturating_sub(1)
    }

    /// Jump to `p`; notifies listeners when progress or phase changed.
    pub fn set_progress(&mut self, p: Progress) -> bool {
        let phase = self.phase_of(p);
        if p == self.progress && phase == self.phase {
            return false;
        }
        let change = ProgressChange {
            previous: self.progress,
            progress: p,
            previous_phase: self.phase,
            phase,
        };
        self.progress = p;
        self.phase = phase;
        self.listeners.emit(&change);
        true
    }

    /// Accumulate a raw delta scaled by the mode's sensitivity.
    ///
    /// In gesture mode a completed sequence ignores further forward input.
    pub fn advance(&mut self, raw_delta: f64) -> bool {
        if !raw_delta.is_finite() {
            return false;
        }
        let scaled = match &self.mode {
            InputMode::ScrollLinked(_) => {
                let span = self.range.1 - self.range.0;
                if span > 0.0 { raw_delta / span } else { 0.0 }
            }
            InputMode::Gesture(cfg) => {
                if self.progress.is_end() && raw_delta > 0.0 {
                    return false;
                }
                raw_delta * cfg.wheel_sensitivity
            }
            InputMode::Discrete(_) => raw_delta,
        };
        self.set_progress(self.progress.offset(scaled))
    }

    /// Jump to the start of phase `index`; `index == segment count` jumps to the end.
    pub fn set_phase(&mut self, index: usize) -> ScrollPhaseResult<bool> {
        let target = self.phase_boundary(index)?;
        Ok(self.set_progress(target))
    }

    /// Progress at the start of phase `index`, or the end for `index == segment count`.
    pub fn phase_boundary(&self, index: usize) -> ScrollPhaseResult<Progress> {
        if index < self.boundaries.len() {
            Ok(Progress::new(self.boundaries[index]))
        } else if index == self.boundaries.len() {
            Ok(Progress::END)
        } else {
            Err(ScrollPhaseError::config(format!(
                "phase {index} out of range (0..={})",
                self.boundaries.len()
            )))
        }
    }

    /// Recompute scroll range and anchor from fresh geometry.
    pub fn resolve_range(&mut self, viewport: &ViewportSnapshot) {
        self.anchor = viewport.container.y0;
        if let InputMode::ScrollLinked(cfg) = &self.mode {
            self.range = cfg.range.resolve(viewport);
        }
    }

    /// Resolved scroll range in document pixels.
    pub fn range(&self) -> (f64, f64) {
        self.range
    }

    /// Scroll offset the page is held at while a gesture sequence is pinned.
    pub fn anchor(&self) -> f64 {
        self.anchor
    }

    /// `(offset - start) / (end - start)`, clamped.
    pub fn target_for_offset(&self, offset: f64) -> Progress {
        Progress::new(unlerp_clamped(offset, self.range.0, self.range.1))
    }

    /// Jump to the progress of scroll `offset`.
    pub fn track_offset(&mut self, offset: f64) -> bool {
        self.set_progress(self.target_for_offset(offset))
    }

    /// Most recent scroll offset seen.
    pub fn last_offset(&self) -> Option<f64> {
        self.last_offset
    }

    /// Direction implied by `event`, using touch and scroll tracking state.
    pub fn direction_of(&self, event: &InputEvent) -> Option<Direction> {
        match *event {
            InputEvent::Wheel { delta_y, .. } => Direction::from_delta(delta_y),
            InputEvent::TouchMove { y, .. } => {
                self.touch_y.and_then(|start| Direction::from_delta(start - y))
            }
            InputEvent::Scroll { offset, .. } => {
                self.last_offset.and_then(|last| Direction::from_delta(offset - last))
            }
            _ => None,
        }
    }

    /// Whether the page sits at the sequence's anchor.
    pub fn is_anchored(&self, scroll_position: f64) -> bool {
        let tolerance = match &self.mode {
            InputMode::Gesture(cfg) => cfg.anchor_tolerance,
            _ => 0.0,
        };
        scroll_position - self.anchor <= tolerance
    }

    /// Whether the page has scrolled at least as far as the anchor, within tolerance.
    pub fn has_reached_anchor(&self, scroll_position: f64) -> bool {
        let tolerance = match &self.mode {
            InputMode::Gesture(cfg) => cfg.anchor_tolerance,
            _ => 0.0,
        };
        scroll_position >= self.anchor - tolerance
    }

    /// Whether `event` may pull a completed gesture sequence back in. Always true for
    /// other modes.
    pub fn qualifies_reentry(&self, event: &InputEvent, scroll_position: f64) -> bool {
        let InputMode::Gesture(cfg) = &self.mode else {
            return true;
        };
        if !self.is_anchored(scroll_position) {
            return false;
        }
        match *event {
            InputEvent::Wheel { delta_y, .. } => delta_y < 0.0,
            InputEvent::TouchMove { y, .. } => self
                .touch_y
                .is_some_and(|start| start - y < -cfg.reverse_touch_threshold),
            _ => false,
        }
    }

    /// Update tracking state for `event` and, when `drive` is set, apply it to progress.
    pub fn handle(&mut self, event: &InputEvent, drive: bool, scroll_position: f64) -> bool {
        match *event {
            InputEvent::Scroll { offset, .. } => {
                self.last_offset = Some(offset);
                return drive
                    && matches!(self.mode, InputMode::ScrollLinked(_))
                    && self.track_offset(offset);
            }
            InputEvent::TouchStart { y, .. } => {
                self.touch_y = Some(y);
                return false;
            }
            InputEvent::TouchEnd { .. } => {
                self.touch_y = None;
                return false;
            }
            _ => {}
        }

        let cfg = match &self.mode {
            InputMode::Gesture(cfg) => *cfg,
            _ => {
                if let InputEvent::TouchMove { y, .. } = *event {
                    self.touch_y = Some(y);
                }
                return false;
            }
        };

        match *event {
            InputEvent::Wheel { delta_y, .. } => {
                if !drive || !delta_y.is_finite() {
                    return false;
                }
                if self.progress.is_end() {
                    return self.rollback_if(delta_y < 0.0, &cfg, scroll_position);
                }
                self.set_progress(self.progress.offset(delta_y * cfg.wheel_sensitivity))
            }
            InputEvent::TouchMove { y, .. } => {
                let Some(start) = self.touch_y else {
                    return false;
                };
                // Track continuously so the next move measures from here.
                self.touch_y = Some(y);
                if !drive {
                    return false;
                }
                let delta = start - y;
                if self.progress.is_end() {
                    return self.rollback_if(
                        delta < -cfg.reverse_touch_threshold,
                        &cfg,
                        scroll_position,
                    );
                }
                let factor = if delta < 0.0 {
                    cfg.touch_reverse_sensitivity
                } else {
                    cfg.touch_forward_sensitivity
                };
                self.set_progress(self.progress.offset(delta * factor))
            }
            _ => false,
        }
    }

    fn rollback_if(&mut self, reverse: bool, cfg: &GestureConfig, scroll_position: f64) -> bool {
        if reverse && self.is_anchored(scroll_position) {
            tracing::debug!(rest = cfg.rest_progress, "reverse gesture at end, rolling back");
            self.set_progress(Progress::new(cfg.rest_progress))
        } else {
            false
        }
    }

    /// Back to the start with tracking state cleared.
    pub fn reset(&mut self) -> bool {
        self.touch_y = None;
        self.last_offset = None;
        self.set_progress(Progress::START)
    }
}

impl std::fmt::Debug for ProgressSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProgressSource")
            .field("progress", &self.progress)
            .field("phase", &self.phase)
            .field("range", &self.range)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/input/progress.rs"]
mod tests;
