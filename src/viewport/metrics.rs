use crate::foundation::core::{ListenerId, Listeners, Rect, Timestamp};

/// Width below which layouts switch to their mobile tuning.
pub const MOBILE_BREAKPOINT: f64 = 768.0;

/// Interval used when the runtime cannot observe element size directly.
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 250;

/// Viewport and container geometry at one point in time.
///
/// A zeroed snapshot means "not ready": the element is not mounted yet or has no size.
#[derive(Clone, Copy, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ViewportSnapshot {
    /// Viewport width in CSS pixels.
    pub width: f64,
    /// Viewport height in CSS pixels.
    pub height: f64,
    /// Tracked container bounds in document coordinates.
    pub container: Rect,
}

impl ViewportSnapshot {
    /// Snapshot of a mounted container.
    pub fn new(width: f64, height: f64, container: Rect) -> Self {
        Self {
            width,
            height,
            container,
        }
    }

    /// The "not ready" snapshot.
    pub fn zero() -> Self {
        Self::default()
    }

    /// True once both the viewport and the container report a non-zero size.
    pub fn is_ready(&self) -> bool {
        self.width > 0.0
            && self.height > 0.0
            && self.container.width() > 0.0
            && self.container.height() > 0.0
    }

    /// Named width bucket.
    pub fn breakpoint(&self) -> Breakpoint {
        Breakpoint::from_width(self.width)
    }

    /// True below [`MOBILE_BREAKPOINT`].
    pub fn is_mobile(&self) -> bool {
        self.width < MOBILE_BREAKPOINT
    }
}

/// Width buckets (min-width thresholds 640, 768, 1024, 1280, 1536).
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize)]
pub enum Breakpoint {
    /// Below 640.
    Xs,
    /// 640 and up.
    Sm,
    /// 768 and up.
    Md,
    /// 1024 and up.
    Lg,
    /// 1280 and up.
    Xl,
    /// 1536 and up.
    Xxl,
}

impl Breakpoint {
    /// Bucket containing `width`.
    pub fn from_width(width: f64) -> Self {
        if width >= 1536.0 {
            Self::Xxl
        } else if width >= 1280.0 {
            Self::Xl
        } else if width >= 1024.0 {
            Self::Lg
        } else if width >= MOBILE_BREAKPOINT {
            Self::Md
        } else if width >= 640.0 {
            Self::Sm
        } else {
            Self::Xs
        }
    }
}

/// Measurement port supplied by the runtime (browser, test harness).
pub trait ElementProbe {
    /// Viewport size in CSS pixels.
    fn viewport_size(&self) -> (f64, f64);

    /// Bounds of the tracked element in document coordinates, `None` before mount.
    fn element_bounds(&self) -> Option<Rect>;

    /// Whether the runtime delivers size-observation callbacks for the element.
    /// When false, [`ViewportMetrics`] falls back to polling.
    fn supports_size_observation(&self) -> bool {
        true
    }
}

/// How size changes reach [`ViewportMetrics`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum ObservationMode {
    /// Resize events plus direct element size observation.
    SizeObserver,
    /// Resize events plus periodic polling.
    Polling {
        /// Minimum time between polls.
        interval_ms: u64,
    },
}

/// Cached viewport measurement with change notification.
pub struct ViewportMetrics {
    probe: Option<Box<dyn ElementProbe>>,
    cached: ViewportSnapshot,
    observers: Listeners<ViewportSnapshot>,
    mode: ObservationMode,
    last_poll: Option<Timestamp>,
}

impl ViewportMetrics {
    /// Metrics over `probe`; without one every snapshot is zero.
    pub fn new(probe: Option<Box<dyn ElementProbe>>) -> Self {
        let mode = match &probe {
            Some(p) if !p.supports_size_observation() => ObservationMode::Polling {
                interval_ms: DEFAULT_POLL_INTERVAL_MS,
            },
            _ => ObservationMode::SizeObserver,
        };
        let mut metrics = Self {
            probe,
            cached: ViewportSnapshot::zero(),
            observers: Listeners::default(),
            mode,
            last_poll: None,
        };
        metrics.cached = metrics.measure();
        metrics
    }

    /// Current observation mode.
    pub fn mode(&self) -> ObservationMode {
        self.mode
    }

    /// Read current dimensions. Never fails: a missing element yields a zero snapshot.
    pub fn measure(&self) -> ViewportSnapshot {
        let Some(probe) = &self.probe else {
            return ViewportSnapshot::zero();
        };
        let Some(bounds) = probe.element_bounds() else {
            return ViewportSnapshot::zero();
        };
        let (width, height) = probe.viewport_size();
        if !(width.is_finite() && height.is_finite()) {
            return ViewportSnapshot::zero();
        }
        ViewportSnapshot::new(width.max(0.0), height.max(0.0), bounds)
    }

    /// Last measurement.
    pub fn snapshot(&self) -> ViewportSnapshot {
        self.cached
    }

    /// Re-measure and notify observers when the geometry changed. Returns whether it did.
    pub fn refresh(&mut self) -> bool {
        let next = self.measure();
        if next == self.cached {
            return false;
        }
        tracing::debug!(
            width = next.width,
            height = next.height,
            ready = next.is_ready(),
            "viewport changed"
        );
        self.cached = next;
        self.observers.emit(&next);
        true
    }

    /// Resize event or size-observer callback.
    pub fn on_resize(&mut self) -> bool {
        self.refresh()
    }

    /// Polling fallback; a no-op in [`ObservationMode::SizeObserver`] mode.
    pub fn poll(&mut self, now: Timestamp) -> bool {
        let ObservationMode::Polling { interval_ms } = self.mode else {
            return false;
        };
        if let Some(last) = self.last_poll
            && now.since(last) < interval_ms
        {
            return false;
        }
        self.last_poll = Some(now);
        self.refresh()
    }

    /// Call `f` with each changed snapshot.
    pub fn observe(&mut self, f: impl FnMut(&ViewportSnapshot) + 'static) -> ListenerId {
        self.observers.add(f)
    }

    /// Remove an observer. Returns whether it was registered.
    pub fn unobserve(&mut self, id: ListenerId) -> bool {
        self.observers.remove(id)
    }

    /// Attach (or replace) the element probe and re-measure.
    pub fn attach(&mut self, probe: Box<dyn ElementProbe>) -> bool {
        if !probe.supports_size_observation() {
            self.mode = ObservationMode::Polling {
                interval_ms: DEFAULT_POLL_INTERVAL_MS,
            };
        }
        self.probe = Some(probe);
        self.refresh()
    }

    /// Drop the probe and every observer.
    pub fn teardown(&mut self) {
        self.observers.clear();
        self.probe = None;
        self.cached = ViewportSnapshot::zero();
    }
}

impl std::fmt::Debug for ViewportMetrics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ViewportMetrics")
            .field("attached", &self.probe.is_some())
            .field("cached", &self.cached)
            .field("mode", &self.mode)
            .field("observers", &self.observers.len())
            .finish()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/viewport/metrics.rs"]
mod tests;
