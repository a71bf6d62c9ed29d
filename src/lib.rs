//! Scrollphase is a scroll-phase animation controller.
//!
//! It maps an externally driven progress signal (page scroll, wheel and touch gestures, or
//! discrete taps) onto a multi-stage [`VisualState`]: interpolated geometry, layer order,
//! opacity and transform choreography, and one-shot media playback. While it does so it
//! decides when native scrolling is pinned, recomputes viewport-relative values on resize,
//! and keeps forward and backward motion from flickering at the sequence boundaries.
//!
//! # Pipeline overview
//!
//! 1. **Configure**: a serializable [`SequenceConfig`] names keyframes and the segments that
//!    animate between them. [`presets`] ships the common ones.
//! 2. **Compile**: [`SequenceConfig::compile`] validates coverage, keyframe references and
//!    parameter kinds into a [`Timeline`].
//! 3. **Drive**: [`ProgressSource`] turns [`InputEvent`]s into [`Progress`]; a
//!    [`PinController`] decides whether the page is pinned.
//! 4. **Map**: [`PhaseMapper`] resolves `Progress + Timeline + ViewportSnapshot` into a
//!    [`VisualState`].
//!
//! [`SequenceHost`] wires all of it to the outside world through small port traits
//! ([`ScrollPort`], [`ElementProbe`], [`MediaHandle`], [`FrameScheduler`]). The
//! [`headless`] module implements every port in memory.
//!
//! Everything is single-threaded: a host and its ports live on the thread that delivers
//! input and frame callbacks.
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod animation;
mod foundation;
mod input;
mod media;
mod phase;
mod pin;
mod runtime;
mod sequence;
mod viewport;

/// In-memory ports for tests and the replay harness.
pub mod headless;
/// Ready-made sequence configurations.
pub mod presets;

pub use crate::animation::ease::Ease;
pub use crate::animation::lerp::Lerp;
pub use crate::animation::tween::Tween;
pub use crate::foundation::core::{
    Direction, ListenerId, Point, Progress, Rect, Timestamp, Vec2,
};
pub use crate::foundation::error::{ScrollPhaseError, ScrollPhaseResult};
pub use crate::input::event::{InputDisposition, InputEvent};
pub use crate::input::progress::{
    DiscreteConfig, GestureConfig, InputMode, ProgressChange, ProgressSource, ScrollLinkedConfig,
    ScrollRange,
};
pub use crate::media::coordinator::{MediaCoordinator, MediaCue, MediaHandle, PlaybackState};
pub use crate::phase::mapper::PhaseMapper;
pub use crate::pin::controller::{InterceptMode, PinController, PinState};
pub use crate::pin::port::{LockToken, ScrollLockScope, ScrollPort};
pub use crate::runtime::commands::{AnimationCommand, CommandQueue};
pub use crate::runtime::frame::{FrameRequest, FrameScheduler};
pub use crate::runtime::host::{HostPorts, HostStatus, SequenceHost};
pub use crate::sequence::config::{SafeState, SegmentSpec, SequenceConfig};
pub use crate::sequence::keyframe::{
    Basis, KeyframeSpec, Length, ParamKind, ParamValue, ResolvedValue, SwitchPoint,
};
pub use crate::sequence::timeline::Timeline;
pub use crate::sequence::visual::VisualState;
pub use crate::viewport::metrics::{
    Breakpoint, ElementProbe, MOBILE_BREAKPOINT, ObservationMode, ViewportMetrics,
    ViewportSnapshot,
};

#[cfg(test)]
#[path = "../tests/unit/fixtures.rs"]
mod fixtures;
