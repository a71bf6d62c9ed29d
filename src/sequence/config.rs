use crate::animation::ease::Ease;
use crate::foundation::error::{ScrollPhaseError, ScrollPhaseResult};
use crate::input::progress::InputMode;
use crate::media::coordinator::MediaCue;
use crate::pin::controller::InterceptMode;
use crate::sequence::keyframe::{KeyframeSpec, SwitchPoint};
use crate::sequence::timeline::Timeline;

/// One interval of progress, animating from one keyframe to another.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct SegmentSpec {
    /// Label used in diagnostics.
    pub name: String,
    /// Progress at which the segment starts (inclusive).
    pub start: f64,
    /// Progress at which the segment ends (exclusive, except for the last segment).
    pub end: f64,
    /// Keyframe name at local `t = 0`.
    pub from: String,
    /// Keyframe name at local `t = 1`.
    pub to: String,
    /// Curve applied to the local `t`.
    #[serde(default)]
    pub ease: Ease,
    /// Where flags and layers switch inside the segment.
    #[serde(default)]
    pub switch: SwitchPoint,
}

impl SegmentSpec {
    /// Linear segment over `[start, end)` from keyframe `from` to `to`.
    pub fn new(
        name: impl Into<String>,
        start: f64,
        end: f64,
        from: impl Into<String>,
        to: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            start,
            end,
            from: from.into(),
            to: to.into(),
            ease: Ease::Linear,
            switch: SwitchPoint::Entry,
        }
    }

    /// Set the segment's ease.
    pub fn ease(mut self, ease: Ease) -> Self {
        self.ease = ease;
        self
    }

    /// Set the segment's switch point.
    pub fn switch(mut self, switch: SwitchPoint) -> Self {
        self.switch = switch;
        self
    }
}

/// Which end of the sequence is rendered when the controller cannot animate.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum SafeState {
    /// First segment's start keyframe.
    #[default]
    Start,
    /// Last segment's end keyframe.
    End,
}

/// Full, serializable description of one visual sequence.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct SequenceConfig {
    /// Sequence name, used in logs.
    pub name: String,
    /// Keyframes referenced by name from `segments`.
    pub keyframes: Vec<KeyframeSpec>,
    /// Ordered, gap-free cover of `[0, 1]`.
    pub segments: Vec<SegmentSpec>,
    /// How input becomes progress.
    #[serde(default)]
    pub input: InputMode,
    /// Explicit pinning policy; derived from `input` when absent.
    #[serde(default)]
    pub intercept: Option<InterceptMode>,
    /// End rendered when the sequence cannot animate.
    #[serde(default)]
    pub safe_state: SafeState,
    /// Media played alongside some phases.
    #[serde(default)]
    pub media: Option<MediaCue>,
    /// Render the safe state statically: no pinning, no animation.
    #[serde(default)]
    pub reduced_motion: bool,
}

impl SequenceConfig {
    /// Empty config; add keyframes and segments with the builder methods.
    pub fn new(name: impl Into<String>, input: InputMode) -> Self {
        Self {
            name: name.into(),
            keyframes: Vec::new(),
            segments: Vec::new(),
            input,
            intercept: None,
            safe_state: SafeState::Start,
            media: None,
            reduced_motion: false,
        }
    }

    /// Append a keyframe.
    pub fn keyframe(mut self, keyframe: KeyframeSpec) -> Self {
        self.keyframes.push(keyframe);
        self
    }

    /// Append a segment.
    pub fn segment(mut self, segment: SegmentSpec) -> Self {
        self.segments.push(segment);
        self
    }

    /// Attach a media cue.
    pub fn media(mut self, cue: MediaCue) -> Self {
        self.media = Some(cue);
        self
    }

    /// Set the safe state.
    pub fn safe_state(mut self, safe: SafeState) -> Self {
        self.safe_state = safe;
        self
    }

    /// Override the pinning policy.
    pub fn intercept(mut self, mode: InterceptMode) -> Self {
        self.intercept = Some(mode);
        self
    }

    /// Effective pinning policy.
    pub fn intercept_mode(&self) -> InterceptMode {
        self.intercept
            .unwrap_or_else(|| InterceptMode::default_for(&self.input))
    }

    /// Parse a JSON config.
    pub fn from_json_str(s: &str) -> ScrollPhaseResult<Self> {
        serde_json::from_str(s).map_err(|e| ScrollPhaseError::serde(e.to_string()))
    }

    /// Pretty-printed JSON.
    pub fn to_json_pretty(&self) -> ScrollPhaseResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| ScrollPhaseError::serde(e.to_string()))
    }

    /// Compile into a [`Timeline`], reporting the first configuration error.
    pub fn compile(&self) -> ScrollPhaseResult<Timeline> {
        self.input.validate()?;
        if let Some(cue) = &self.media {
            cue.validate(self.segments.len())?;
        }
        if let InputMode::Discrete(cfg) = &self.input
            && let Some(phase) = cfg.initial_phase
            && phase > self.segments.len()
        {
            return Err(ScrollPhaseError::config(format!(
                "initial phase {phase} out of range (0..={})",
                self.segments.len()
            )));
        }
        Timeline::compile(self)
    }

    /// Name of the keyframe rendered as the safe fallback, if one can be found.
    pub fn safe_keyframe(&self) -> Option<&KeyframeSpec> {
        let by_segment = match self.safe_state {
            SafeState::Start => self.segments.first().map(|s| s.from.as_str()),
            SafeState::End => self.segments.last().map(|s| s.to.as_str()),
        };
        by_segment
            .and_then(|name| self.keyframes.iter().find(|k| k.name == name))
            .or_else(|| match self.safe_state {
                SafeState::Start => self.keyframes.first(),
                SafeState::End => self.keyframes.last(),
            })
    }
}

#[cfg(test)]
#[path = "../../tests/unit/sequence/config.rs"]
mod tests;
