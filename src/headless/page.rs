use std::cell::{Cell, RefCell};
use std::rc::Rc;

use crate::foundation::core::{Rect, Timestamp};
use crate::headless::frames::ManualFrames;
use crate::headless::media::RecordingMedia;
use crate::input::event::{InputDisposition, InputEvent};
use crate::pin::port::{ScrollLockScope, ScrollPort};
use crate::runtime::host::{HostPorts, SequenceHost};
use crate::sequence::visual::VisualState;
use crate::viewport::metrics::ElementProbe;

#[derive(Debug)]
struct Geometry {
    width: f64,
    height: f64,
    bounds: Option<Rect>,
    observes_size: bool,
}

/// Element probe over settable geometry.
#[derive(Clone, Debug)]
pub struct HeadlessProbe {
    geometry: Rc<RefCell<Geometry>>,
}

impl HeadlessProbe {
    /// Viewport `width` × `height` with the tracked element at document `bounds`.
    pub fn new(width: f64, height: f64, bounds: Rect) -> Self {
        Self {
            geometry: Rc::new(RefCell::new(Geometry {
                width,
                height,
                bounds: Some(bounds),
                observes_size: true,
            })),
        }
    }

    /// Simulate a runtime without element size observation.
    pub fn without_size_observation(self) -> Self {
        self.geometry.borrow_mut().observes_size = false;
        self
    }

    /// Change the viewport size the probe reports.
    pub fn set_viewport(&self, width: f64, height: f64) {
        let mut g = self.geometry.borrow_mut();
        g.width = width;
        g.height = height;
    }

    /// `None` simulates an element that is not laid out yet.
    pub fn set_bounds(&self, bounds: Option<Rect>) {
        self.geometry.borrow_mut().bounds = bounds;
    }
}

impl ElementProbe for HeadlessProbe {
    fn viewport_size(&self) -> (f64, f64) {
        let g = self.geometry.borrow();
        (g.width, g.height)
    }

    fn element_bounds(&self) -> Option<Rect> {
        self.geometry.borrow().bounds
    }

    fn supports_size_observation(&self) -> bool {
        self.geometry.borrow().observes_size
    }
}

#[derive(Debug, Default)]
struct ScrollState {
    position: f64,
    locked: bool,
    programmatic_moves: usize,
}

/// In-memory page scroll position. Clones share one page, which is how nested hosts share
/// a scroll port.
#[derive(Clone, Debug, Default)]
pub struct MemoryScrollPort {
    state: Rc<RefCell<ScrollState>>,
}

impl MemoryScrollPort {
    /// Unlocked page scrolled to `position`.
    pub fn new(position: f64) -> Self {
        let port = Self::default();
        port.state.borrow_mut().position = position;
        port
    }

    /// Whether native scrolling is suppressed.
    pub fn is_locked(&self) -> bool {
        self.state.borrow().locked
    }

    /// Number of `set_position` calls made through the port.
    pub fn programmatic_moves(&self) -> usize {
        self.state.borrow().programmatic_moves
    }

    /// Native scroll by the user. Returns the new position, or `None` while locked.
    pub fn scroll_by(&self, delta: f64) -> Option<f64> {
        let mut s = self.state.borrow_mut();
        if s.locked {
            return None;
        }
        s.position = (s.position + delta).max(0.0);
        Some(s.position)
    }
}

impl ScrollPort for MemoryScrollPort {
    fn position(&self) -> f64 {
        self.state.borrow().position
    }

    fn set_position(&mut self, offset: f64) {
        let mut s = self.state.borrow_mut();
        s.position = offset.max(0.0);
        s.programmatic_moves += 1;
    }

    fn lock(&mut self) {
        self.state.borrow_mut().locked = true;
    }

    fn unlock(&mut self) {
        self.state.borrow_mut().locked = false;
    }
}

/// One step of a replay script.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ScriptStep {
    /// Wheel input; scrolls the page natively when the host passes it through.
    Wheel {
        /// Positive scrolls down.
        delta_y: f64,
        /// Milliseconds on the page clock.
        at: u64,
    },
    /// Finger down.
    TouchStart {
        /// Client y of the contact.
        y: f64,
        /// Milliseconds on the page clock.
        at: u64,
    },
    /// Touch drag; scrolls the page natively when the host passes it through.
    TouchMove {
        /// Client y of the contact.
        y: f64,
        /// Milliseconds on the page clock.
        at: u64,
    },
    /// Finger up.
    TouchEnd {
        /// Milliseconds on the page clock.
        at: u64,
    },
    /// Native scroll to an absolute offset.
    ScrollTo {
        /// Document offset to scroll to.
        offset: f64,
        /// Milliseconds on the page clock.
        at: u64,
    },
    /// Click or tap anywhere on the page.
    Tap {
        /// Milliseconds on the page clock.
        at: u64,
    },
    /// Tap on step `phase`.
    Activate {
        /// Step to activate.
        phase: usize,
        /// Milliseconds on the page clock.
        at: u64,
    },
    /// Resize the viewport.
    Resize {
        /// New viewport width.
        width: f64,
        /// New viewport height.
        height: f64,
    },
    /// Fire outstanding frames every `step_ms` until `until`.
    Frames {
        /// Page clock time to stop at.
        until: u64,
        /// Spacing between frames.
        step_ms: u64,
    },
}

/// A whole simulated page: probe, scroll, media and frames, plus input delivery that mimics
/// a browser (passed-through wheel and touch input scrolls natively).
#[derive(Clone, Debug)]
pub struct HeadlessPage {
    /// Viewport and container geometry.
    pub probe: HeadlessProbe,
    /// Page scroll position and lock.
    pub scroll: MemoryScrollPort,
    /// The one media element on the page.
    pub media: RecordingMedia,
    /// Frame callbacks, fired by [`HeadlessPage::run_frames`].
    pub frames: ManualFrames,
    /// Lock scope shared by every host mounted from this page.
    pub scope: ScrollLockScope,
    touch_y: Rc<Cell<Option<f64>>>,
    clock: Rc<Cell<u64>>,
}

impl HeadlessPage {
    /// Page with a `width` × `height` viewport, scrolled to the top, tracking `container`.
    pub fn new(width: f64, height: f64, container: Rect) -> Self {
        Self {
            probe: HeadlessProbe::new(width, height, container),
            scroll: MemoryScrollPort::default(),
            media: RecordingMedia::new(),
            frames: ManualFrames::new(),
            scope: ScrollLockScope::new(),
            touch_y: Rc::new(Cell::new(None)),
            clock: Rc::new(Cell::new(0)),
        }
    }

    /// Ports for one host. Hosts mounted from the same page share scroll and lock scope.
    pub fn ports(&self) -> HostPorts {
        HostPorts {
            scroll: Box::new(self.scroll.clone()),
            probe: Some(Box::new(self.probe.clone())),
            media: Some(Box::new(self.media.clone())),
            frames: Box::new(self.frames.clone()),
            lock_scope: Some(self.scope.clone()),
        }
    }

    /// Current page clock.
    pub fn now(&self) -> Timestamp {
        Timestamp(self.clock.get())
    }

    fn tick_to(&self, at: u64) -> Timestamp {
        let now = at.max(self.clock.get());
        self.clock.set(now);
        Timestamp(now)
    }

    /// Deliver a wheel event.
    pub fn wheel(&self, host: &mut SequenceHost, delta_y: f64, at: u64) -> InputDisposition {
        let at = self.tick_to(at);
        let disposition = host.handle_input(&InputEvent::Wheel { delta_y, at });
        if disposition == InputDisposition::PassThrough {
            self.native_scroll(host, delta_y, at);
        }
        disposition
    }

    /// Deliver a touch start.
    pub fn touch_start(&self, host: &mut SequenceHost, y: f64, at: u64) -> InputDisposition {
        let at = self.tick_to(at);
        self.touch_y.set(Some(y));
        host.handle_input(&InputEvent::TouchStart { y, at })
    }

    /// Deliver a touch move.
    pub fn touch_move(&self, host: &mut SequenceHost, y: f64, at: u64) -> InputDisposition {
        let at = self.tick_to(at);
        let previous = self.touch_y.replace(Some(y));
        let disposition = host.handle_input(&InputEvent::TouchMove { y, at });
        if disposition == InputDisposition::PassThrough
            && let Some(prev) = previous
        {
            self.native_scroll(host, prev - y, at);
        }
        disposition
    }

    /// Deliver a touch end.
    pub fn touch_end(&self, host: &mut SequenceHost, at: u64) -> InputDisposition {
        let at = self.tick_to(at);
        self.touch_y.set(None);
        host.handle_input(&InputEvent::TouchEnd { at })
    }

    /// User scrolls natively to `offset`; ignored while the page is locked.
    pub fn scroll_to(&self, host: &mut SequenceHost, offset: f64, at: u64) -> InputDisposition {
        let at = self.tick_to(at);
        let delta = offset - self.scroll.position();
        match self.scroll.scroll_by(delta) {
            Some(offset) => host.handle_input(&InputEvent::Scroll { offset, at }),
            None => InputDisposition::Consumed,
        }
    }

    /// Deliver a click anywhere on the page.
    pub fn tap(&self, host: &mut SequenceHost, at: u64) -> InputDisposition {
        let at = self.tick_to(at);
        host.handle_input(&InputEvent::Pointer { at })
    }

    /// Resize the viewport and notify the host.
    pub fn resize(&self, host: &mut SequenceHost, width: f64, height: f64) {
        self.probe.set_viewport(width, height);
        host.handle_resize();
    }

    /// Fire outstanding frame requests every `step_ms` up to `until`. Returns frames fired.
    pub fn run_frames(&self, host: &mut SequenceHost, until: u64, step_ms: u64) -> usize {
        let step = step_ms.max(1);
        let mut fired = 0;
        while self.frames.has_pending() && self.clock.get() < until {
            let at = self.tick_to((self.clock.get() + step).min(until));
            self.frames.take();
            host.on_frame(at);
            fired += 1;
        }
        fired
    }

    fn native_scroll(&self, host: &mut SequenceHost, delta: f64, at: Timestamp) {
        if let Some(offset) = self.scroll.scroll_by(delta) {
            host.handle_input(&InputEvent::Scroll { offset, at });
        }
    }

    /// Apply one script step and return the host's state afterwards.
    pub fn apply(&self, host: &mut SequenceHost, step: &ScriptStep) -> Option<VisualState> {
        match *step {
            ScriptStep::Wheel { delta_y, at } => {
                self.wheel(host, delta_y, at);
            }
            ScriptStep::TouchStart { y, at } => {
                self.touch_start(host, y, at);
            }
            ScriptStep::TouchMove { y, at } => {
                self.touch_move(host, y, at);
            }
            ScriptStep::TouchEnd { at } => {
                self.touch_end(host, at);
            }
            ScriptStep::ScrollTo { offset, at } => {
                self.scroll_to(host, offset, at);
            }
            ScriptStep::Tap { at } => {
                self.tap(host, at);
            }
            ScriptStep::Activate { phase, at } => {
                let now = self.tick_to(at);
                if let Err(e) = host.activate_phase(phase, now) {
                    tracing::warn!(error = %e, phase, "activation rejected");
                }
            }
            ScriptStep::Resize { width, height } => self.resize(host, width, height),
            ScriptStep::Frames { until, step_ms } => {
                self.run_frames(host, until, step_ms);
            }
        }
        host.visual_state().cloned()
    }

    /// Replay `steps`, collecting the state after each one.
    pub fn replay(
        &self,
        host: &mut SequenceHost,
        steps: &[ScriptStep],
    ) -> Vec<Option<VisualState>> {
        steps.iter().map(|step| self.apply(host, step)).collect()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/headless/page.rs"]
mod tests;
