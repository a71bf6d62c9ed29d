use std::cell::RefCell;
use std::rc::Rc;

use crate::animation::ease::Ease;
use crate::foundation::core::{ListenerId, Listeners, Progress, Timestamp};
use crate::foundation::error::{ScrollPhaseError, ScrollPhaseResult};
use crate::input::event::{InputDisposition, InputEvent};
use crate::input::progress::{DiscreteConfig, InputMode, ProgressChange, ProgressSource};
use crate::media::coordinator::{MediaCoordinator, MediaHandle, PlaybackState};
use crate::phase::mapper::PhaseMapper;
use crate::pin::controller::{InterceptMode, PinController, PinState};
use crate::pin::port::{LockToken, ScrollLockScope, ScrollPort};
use crate::runtime::commands::{AnimationCommand, CommandQueue};
use crate::runtime::frame::{FrameRequest, FrameScheduler};
use crate::sequence::config::{SafeState, SequenceConfig};
use crate::sequence::timeline::Timeline;
use crate::sequence::visual::VisualState;
use crate::viewport::metrics::{ElementProbe, ViewportMetrics, ViewportSnapshot};

/// Runtime collaborators handed to [`SequenceHost::mount`].
pub struct HostPorts {
    /// Page scroll position and lock.
    pub scroll: Box<dyn ScrollPort>,
    /// Element whose bounds anchor the sequence; may be missing until layout.
    pub probe: Option<Box<dyn ElementProbe>>,
    /// Media played by the sequence's cue, if any.
    pub media: Option<Box<dyn MediaHandle>>,
    /// Per-frame callbacks for animated transitions.
    pub frames: Box<dyn FrameScheduler>,
    /// Shared with enclosing hosts when sequences nest on one scroll port.
    pub lock_scope: Option<ScrollLockScope>,
}

/// Lifecycle of a [`SequenceHost`].
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
pub enum HostStatus {
    /// Responding to input.
    Animating,
    /// Reduced motion: the safe state is shown and input is ignored.
    Static,
    /// The configuration could not be used; the safe keyframe is shown.
    Degraded(String),
    /// Torn down; every call is a no-op.
    Unmounted,
}

/// How input reaches progress, flattened from [`InputMode`] once at mount.
#[derive(Clone, Copy, Debug)]
enum Drive {
    ScrollLinked { scrub: Option<(u64, Ease)> },
    Gesture,
    Discrete(DiscreteConfig),
}

impl Drive {
    fn of(mode: &InputMode) -> Self {
        match mode {
            InputMode::ScrollLinked(cfg) => Self::ScrollLinked {
                scrub: cfg.scrub_ms.map(|ms| (ms, cfg.scrub_ease)),
            },
            InputMode::Gesture(_) => Self::Gesture,
            InputMode::Discrete(cfg) => Self::Discrete(*cfg),
        }
    }

    fn step(self) -> DiscreteConfig {
        match self {
            Self::Discrete(cfg) => cfg,
            _ => DiscreteConfig::default(),
        }
    }
}

struct Engine {
    timeline: Timeline,
    source: ProgressSource,
    pin: PinController,
    commands: CommandQueue,
    drive: Drive,
}

#[derive(Debug, Default)]
struct Pending {
    progress: Vec<ProgressChange>,
    /// Geometry changed and the scroll range has not been re-resolved yet.
    viewport: bool,
    /// Geometry was applied but not rendered yet.
    redraw: bool,
}

/// Composition root for one visual sequence.
///
/// Owns the progress source, viewport metrics, pin controller, media coordinator and
/// animation queue of exactly one sequence. Input and resize notifications are applied in
/// arrival order and coalesced into a single [`VisualState`] recomputation per dispatch;
/// presentation subscribers see each distinct state once. Dropping the host tears it down.
pub struct SequenceHost {
    config: SequenceConfig,
    engine: Option<Engine>,
    metrics: ViewportMetrics,
    media: MediaCoordinator,
    scroll: Option<Box<dyn ScrollPort>>,
    frames: Option<Box<dyn FrameScheduler>>,
    frame: Option<FrameRequest>,
    scope: ScrollLockScope,
    token: LockToken,
    pending: Rc<RefCell<Pending>>,
    state: Option<VisualState>,
    presenters: Listeners<VisualState>,
    status: HostStatus,
    tap_lock_until: Option<Timestamp>,
}

impl SequenceHost {
    /// Measure, compile and render the first frame.
    ///
    /// Never fails: an unusable configuration degrades the host to its safe keyframe.
    #[tracing::instrument(skip_all, fields(sequence = %config.name))]
    pub fn mount(config: SequenceConfig, ports: HostPorts) -> Self {
        let HostPorts {
            scroll,
            probe,
            media,
            frames,
            lock_scope,
        } = ports;
        let scope = lock_scope.unwrap_or_default();
        let token = scope.register();
        let pending = Rc::new(RefCell::new(Pending::default()));

        let mut metrics = ViewportMetrics::new(probe);
        {
            let pending = Rc::clone(&pending);
            metrics.observe(move |_| pending.borrow_mut().viewport = true);
        }
        let mut coordinator = MediaCoordinator::new(config.media.clone());
        if let Some(handle) = media {
            coordinator.attach(handle);
        }

        let compiled = config.compile();
        let mut host = Self {
            config,
            engine: None,
            metrics,
            media: coordinator,
            scroll: Some(scroll),
            frames: Some(frames),
            frame: None,
            scope,
            token,
            pending,
            state: None,
            presenters: Listeners::default(),
            status: HostStatus::Animating,
            tap_lock_until: None,
        };
        match compiled {
            Ok(timeline) => host.start(timeline),
            Err(e) => host.degrade(e),
        }
        host
    }

    fn start(&mut self, timeline: Timeline) {
        let snapshot = self.metrics.snapshot();
        let mut source = ProgressSource::new(self.config.input.clone(), &timeline);
        source.resolve_range(&snapshot);
        let drive = Drive::of(source.mode());
        let position = self.scroll_position();

        let reduced = self.config.reduced_motion;
        let mode = if reduced {
            InterceptMode::Never
        } else {
            self.config.intercept_mode()
        };
        if reduced {
            source.set_progress(match self.config.safe_state {
                SafeState::Start => Progress::START,
                SafeState::End => Progress::END,
            });
            self.status = HostStatus::Static;
        } else {
            source.handle(
                &InputEvent::Scroll {
                    offset: position,
                    at: Timestamp(0),
                },
                true,
                position,
            );
            let initial = match source.mode() {
                InputMode::Discrete(cfg) => cfg.initial_phase,
                _ => None,
            };
            if let Some(phase) = initial
                && let Err(e) = source.set_phase(phase)
            {
                tracing::warn!(error = %e, "initial phase ignored");
            }
        }
        {
            let pending = Rc::clone(&self.pending);
            source.on_change(move |change| pending.borrow_mut().progress.push(*change));
        }

        let mut pin = PinController::new(mode);
        pin.decide(source.progress(), None, false);
        if !reduced {
            self.media.sync(source.progress(), source.phase());
        }
        tracing::debug!(
            progress = source.progress().get(),
            ?mode,
            status = ?self.status,
            "sequence mounted"
        );

        self.engine = Some(Engine {
            timeline,
            source,
            pin,
            commands: CommandQueue::new(),
            drive,
        });
        self.sync_port_lock();
        self.recompute();
    }

    fn degrade(&mut self, error: ScrollPhaseError) {
        tracing::warn!(error = %error, "sequence cannot animate; rendering its safe state");
        if let Some(mut engine) = self.engine.take() {
            engine.commands.clear();
            engine.source.clear_listeners();
        }
        self.cancel_frame();
        self.release_port_lock();
        self.media.teardown();
        self.pending.borrow_mut().progress.clear();
        self.status = HostStatus::Degraded(error.to_string());
        self.recompute();
    }

    /// Sequence name from the config.
    pub fn name(&self) -> &str {
        &self.config.name
    }

    /// Config the host was mounted with.
    pub fn config(&self) -> &SequenceConfig {
        &self.config
    }

    /// Lifecycle state.
    pub fn status(&self) -> &HostStatus {
        &self.status
    }

    /// False once [`SequenceHost::unmount`] ran.
    pub fn is_mounted(&self) -> bool {
        self.status != HostStatus::Unmounted
    }

    /// Latest state for the presentation layer; `None` before the first valid measurement.
    pub fn visual_state(&self) -> Option<&VisualState> {
        self.state.as_ref()
    }

    /// Current progress; `None` when the config failed to compile.
    pub fn progress(&self) -> Option<Progress> {
        self.engine.as_ref().map(|e| e.source.progress())
    }

    /// Current phase; `None` when the config failed to compile.
    pub fn phase(&self) -> Option<usize> {
        self.engine.as_ref().map(|e| e.source.phase())
    }

    /// Whether the sequence is pinned.
    pub fn pin_state(&self) -> PinState {
        self.engine
            .as_ref()
            .map_or(PinState::Released, |e| e.pin.state())
    }

    /// Compiled timeline, if the config compiled.
    pub fn timeline(&self) -> Option<&Timeline> {
        self.engine.as_ref().map(|e| &e.timeline)
    }

    /// Last viewport measurement.
    pub fn viewport(&self) -> ViewportSnapshot {
        self.metrics.snapshot()
    }

    /// Playback state of the attached media.
    pub fn media_state(&self) -> PlaybackState {
        self.media.state()
    }

    /// Whether a frame callback is outstanding.
    pub fn has_pending_frame(&self) -> bool {
        self.frame.is_some()
    }

    /// Register a presentation callback, invoked with every new [`VisualState`].
    pub fn subscribe(&mut self, f: impl FnMut(&VisualState) + 'static) -> ListenerId {
        self.presenters.add(f)
    }

    /// Remove a presentation callback; returns whether it was registered.
    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        self.presenters.remove(id)
    }

    /// Apply one input event and re-render.
    pub fn handle_input(&mut self, event: &InputEvent) -> InputDisposition {
        let disposition = self.apply_input(event);
        self.flush();
        disposition
    }

    /// Apply a batch of events received in the same tick, in order, then re-render once.
    pub fn dispatch(&mut self, events: &[InputEvent]) -> Vec<InputDisposition> {
        let dispositions = events.iter().map(|e| self.apply_input(e)).collect();
        self.flush();
        dispositions
    }

    /// Resize event or size-observer callback. Use [`InputEvent::Resize`] with
    /// [`SequenceHost::dispatch`] to coalesce it with input from the same tick.
    pub fn handle_resize(&mut self) {
        if !self.is_mounted() {
            return;
        }
        self.metrics.on_resize();
        self.flush();
    }

    /// Polling fallback for runtimes without size observation.
    pub fn poll(&mut self, now: Timestamp) {
        if !self.is_mounted() {
            return;
        }
        self.metrics.poll(now);
        self.flush();
    }

    /// Frame callback for a previously requested frame.
    pub fn on_frame(&mut self, now: Timestamp) {
        if !self.is_mounted() {
            tracing::trace!("frame after unmount ignored");
            return;
        }
        self.frame = None;
        let Some(engine) = self.engine.as_mut() else {
            return;
        };
        let current = engine.source.progress();
        if let Some(p) = engine.commands.tick(now, current, &engine.timeline) {
            tracing::trace!(progress = p.get(), at = now.0, "frame");
            engine.source.set_progress(p);
            engine.pin.decide(engine.source.progress(), None, false);
        }
        let busy = !engine.commands.is_idle();
        if busy {
            self.request_frame();
        }
        self.sync_port_lock();
        self.flush();
    }

    /// Tap or click on step `index`: animate there and hold off visibility-driven
    /// activations for the tap lock window. `index == segment count` targets the end.
    ///
    /// Returns whether an animation was started.
    pub fn activate_phase(&mut self, index: usize, now: Timestamp) -> ScrollPhaseResult<bool> {
        if self.status != HostStatus::Animating {
            return Ok(false);
        }
        self.media.on_user_gesture();
        let started = self.run_to_phase(index)?;
        let lock = self.engine.as_ref().map_or(0, |e| e.drive.step().tap_lock_ms);
        self.tap_lock_until = Some(now.after(lock));
        Ok(started)
    }

    /// Visibility-driven activation, ignored while a recent tap holds the tap lock.
    pub fn observe_phase(&mut self, index: usize, now: Timestamp) -> ScrollPhaseResult<bool> {
        if self.status != HostStatus::Animating {
            return Ok(false);
        }
        if let Some(until) = self.tap_lock_until
            && now < until
        {
            tracing::debug!(index, "visibility activation suppressed by tap lock");
            return Ok(false);
        }
        self.run_to_phase(index)
    }

    /// Pointer hover over step `index`; only honoured when the step config allows it.
    pub fn hover(&mut self, index: usize) -> ScrollPhaseResult<bool> {
        if self.status != HostStatus::Animating {
            return Ok(false);
        }
        let allowed = self
            .engine
            .as_ref()
            .is_some_and(|e| matches!(e.drive, Drive::Discrete(cfg) if cfg.hover_activates));
        if !allowed {
            return Ok(false);
        }
        self.run_to_phase(index)
    }

    fn run_to_phase(&mut self, index: usize) -> ScrollPhaseResult<bool> {
        let Some(engine) = self.engine.as_mut() else {
            return Ok(false);
        };
        let target = engine.timeline.boundary(index).ok_or_else(|| {
            ScrollPhaseError::config(format!(
                "phase {index} out of range (0..={})",
                engine.timeline.segment_count()
            ))
        })?;
        let heading = engine
            .commands
            .target(&engine.timeline)
            .unwrap_or(engine.source.progress());
        if heading == target {
            return Ok(false);
        }
        let step = engine.drive.step();
        engine.commands.push(AnimationCommand::RunToPhase {
            phase: index,
            duration_ms: step.transition_ms,
            ease: step.ease,
        });
        self.restart_frame();
        Ok(true)
    }

    /// Back to the start: animation cancelled, pin released, page returned to the anchor.
    pub fn reset(&mut self) {
        if self.status != HostStatus::Animating {
            return;
        }
        self.cancel_frame();
        self.tap_lock_until = None;
        let Some(engine) = self.engine.as_mut() else {
            return;
        };
        engine.commands.clear();
        engine.source.reset();
        engine.pin.release();
        let anchor = engine.source.anchor();
        let gesture = matches!(engine.drive, Drive::Gesture);
        self.sync_port_lock();
        if gesture && let Some(scroll) = self.scroll.as_mut() {
            scroll.set_position(anchor);
        }
        self.flush();
    }

    /// Release every listener, lock, frame request and media handle. Idempotent.
    pub fn unmount(&mut self) {
        if self.status == HostStatus::Unmounted {
            return;
        }
        self.cancel_frame();
        self.release_port_lock();
        if let Some(mut engine) = self.engine.take() {
            engine.commands.clear();
            engine.source.clear_listeners();
        }
        self.media.teardown();
        self.metrics.teardown();
        self.presenters.clear();
        *self.pending.borrow_mut() = Pending::default();
        self.scroll = None;
        self.frames = None;
        self.state = None;
        self.status = HostStatus::Unmounted;
        tracing::debug!(sequence = %self.config.name, "sequence unmounted");
    }

    fn scroll_position(&self) -> f64 {
        self.scroll.as_ref().map_or(0.0, |s| s.position())
    }

    fn apply_input(&mut self, event: &InputEvent) -> InputDisposition {
        if let InputEvent::Resize { .. } = event {
            if self.is_mounted() {
                self.metrics.on_resize();
                self.apply_viewport();
            }
            return InputDisposition::PassThrough;
        }
        if self.status != HostStatus::Animating {
            return InputDisposition::PassThrough;
        }
        if event.is_user_gesture() {
            self.media.on_user_gesture();
        }
        let position = self.scroll_position();
        if let Some(engine) = self.engine.as_mut()
            && let Some(direction) = engine.source.direction_of(event)
        {
            let entry_ok = if engine.source.progress().is_end() {
                engine.source.qualifies_reentry(event, position)
            } else {
                engine.source.has_reached_anchor(position)
            };
            engine
                .pin
                .decide(engine.source.progress(), Some(direction), entry_ok);
        }
        self.sync_port_lock();

        let Some(engine) = self.engine.as_mut() else {
            return InputDisposition::PassThrough;
        };
        // Only the innermost of nested locks drives its sequence.
        let intercepting = engine.pin.intercepts() && self.scope.is_innermost(self.token);

        let mut disposition = InputDisposition::PassThrough;
        let mut scrub_to = None;
        match (engine.drive, *event) {
            (Drive::Gesture, InputEvent::Scroll { .. }) if intercepting => {
                let anchor = engine.source.anchor();
                if let Some(scroll) = self.scroll.as_mut() {
                    scroll.set_position(anchor);
                }
                engine.source.handle(
                    &InputEvent::Scroll {
                        offset: anchor,
                        at: event.at(),
                    },
                    false,
                    anchor,
                );
                disposition = InputDisposition::Consumed;
            }
            (Drive::Gesture, InputEvent::Wheel { .. } | InputEvent::TouchMove { .. }) => {
                engine.source.handle(event, intercepting, position);
                if intercepting {
                    disposition = InputDisposition::Consumed;
                }
            }
            (Drive::ScrollLinked { scrub: Some((ms, ease)) }, InputEvent::Scroll { offset, .. }) => {
                engine.source.handle(event, false, position);
                scrub_to = Some(AnimationCommand::RunTo {
                    target: engine.source.target_for_offset(offset),
                    duration_ms: ms,
                    ease,
                });
            }
            (Drive::ScrollLinked { scrub: None }, _) => {
                engine.source.handle(event, true, position);
            }
            _ => {
                engine.source.handle(event, false, position);
            }
        }
        engine.pin.decide(engine.source.progress(), None, false);

        if let Some(cmd) = scrub_to {
            let heading = engine.commands.target(&engine.timeline);
            if let AnimationCommand::RunTo { target, .. } = cmd
                && heading != Some(target)
                && !(heading.is_none() && engine.source.progress() == target)
            {
                engine.commands.push(cmd);
                self.restart_frame();
            }
        }
        self.sync_port_lock();
        disposition
    }

    /// Drain pending notifications and recompute once.
    fn flush(&mut self) {
        if !self.is_mounted() {
            return;
        }
        self.apply_viewport();
        let viewport_changed = std::mem::take(&mut self.pending.borrow_mut().redraw);
        let changes = std::mem::take(&mut self.pending.borrow_mut().progress);
        if self.status == HostStatus::Animating {
            for change in &changes {
                self.media.on_progress(
                    change.previous,
                    change.previous_phase,
                    change.progress,
                    change.phase,
                );
            }
        }
        if viewport_changed || !changes.is_empty() || self.state.is_none() {
            self.recompute();
        }
    }

    /// Re-resolve the scroll range after a geometry change and move scroll-linked progress
    /// onto it: directly, or by re-targeting the scrub animation.
    fn apply_viewport(&mut self) {
        {
            let mut pending = self.pending.borrow_mut();
            if !std::mem::take(&mut pending.viewport) {
                return;
            }
            pending.redraw = true;
        }
        let animating = self.status == HostStatus::Animating;
        let Some(engine) = self.engine.as_mut() else {
            return;
        };
        let snapshot = self.metrics.snapshot();
        engine.source.resolve_range(&snapshot);
        let Drive::ScrollLinked { scrub } = engine.drive else {
            return;
        };
        let Some(offset) = engine.source.last_offset().filter(|_| animating) else {
            return;
        };
        let mut retarget = false;
        match scrub {
            Some((duration_ms, ease)) => {
                let target = engine.source.target_for_offset(offset);
                let heading = engine
                    .commands
                    .target(&engine.timeline)
                    .unwrap_or(engine.source.progress());
                if heading != target {
                    tracing::debug!(target = target.get(), "re-targeting scrub after resize");
                    engine.commands.push(AnimationCommand::RunTo {
                        target,
                        duration_ms,
                        ease,
                    });
                    retarget = true;
                }
            }
            None => {
                engine.source.track_offset(offset);
            }
        }
        engine.pin.decide(engine.source.progress(), None, false);
        if retarget {
            self.restart_frame();
        }
    }

    fn recompute(&mut self) {
        let snapshot = self.metrics.snapshot();
        let computed = self.engine.as_ref().map(|engine| {
            PhaseMapper::compute_visual_state(
                engine.source.progress(),
                &engine.timeline,
                &snapshot,
            )
        });
        let next = match computed {
            Some(Ok(state)) => state,
            Some(Err(e)) if e.is_transient() => {
                tracing::debug!("viewport not measured yet; keeping last visual state");
                return;
            }
            Some(Err(e)) => {
                self.degrade(e);
                return;
            }
            None => match self.safe_state(&snapshot) {
                Some(state) => state,
                None => return,
            },
        };
        if self.state.as_ref() == Some(&next) {
            return;
        }
        self.presenters.emit(&next);
        self.state = Some(next);
    }

    fn safe_state(&self, snapshot: &ViewportSnapshot) -> Option<VisualState> {
        let keyframe = self.config.safe_keyframe()?;
        let (progress, phase) = match self.config.safe_state {
            SafeState::Start => (Progress::START, 0),
            SafeState::End => (
                Progress::END,
                self.config.segments.len().saturating_sub(1),
            ),
        };
        Some(PhaseMapper::keyframe_state(
            &keyframe.params,
            progress,
            phase,
            snapshot,
        ))
    }

    fn request_frame(&mut self) {
        if self.frame.is_some() {
            return;
        }
        if let Some(frames) = self.frames.as_mut() {
            self.frame = Some(frames.request_frame());
        }
    }

    /// Cancel the outstanding frame, if any, and request a fresh one.
    fn restart_frame(&mut self) {
        self.cancel_frame();
        self.request_frame();
    }

    fn cancel_frame(&mut self) {
        if let Some(request) = self.frame.take()
            && let Some(frames) = self.frames.as_mut()
        {
            frames.cancel_frame(request);
        }
    }

    /// Hold the shared scroll lock exactly while the pin intercepts input.
    fn sync_port_lock(&mut self) {
        let wants = self.engine.as_ref().is_some_and(|e| e.pin.intercepts());
        let held = self.scope.is_held(self.token);
        if wants && !held {
            if self.scope.acquire(self.token)
                && let Some(scroll) = self.scroll.as_mut()
            {
                scroll.lock();
            }
        } else if !wants && held {
            self.release_port_lock();
        }
    }

    fn release_port_lock(&mut self) {
        if self.scope.release(self.token)
            && let Some(scroll) = self.scroll.as_mut()
        {
            scroll.unlock();
        }
    }
}

impl Drop for SequenceHost {
    fn drop(&mut self) {
        self.unmount();
    }
}

impl std::fmt::Debug for SequenceHost {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SequenceHost")
            .field("name", &self.config.name)
            .field("status", &self.status)
            .field("progress", &self.progress())
            .field("pin", &self.pin_state())
            .field("media", &self.media)
            .field("frame", &self.frame)
            .finish()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/runtime/host.rs"]
mod tests;
