pub use kurbo::{Point, Rect, Vec2};

/// Normalized sequence progress, always inside `[0, 1]` and never NaN.
#[derive(Clone, Copy, Debug, Default, PartialEq, PartialOrd, serde::Serialize, serde::Deserialize)]
#[serde(from = "f64", into = "f64")]
pub struct Progress(f64);

impl Progress {
    /// Sequence start.
    pub const START: Self = Self(0.0);
    /// Sequence end.
    pub const END: Self = Self(1.0);

    /// Clamp `value` into `[0, 1]`. NaN maps to 0.
    pub fn new(value: f64) -> Self {
        if value.is_nan() {
            return Self::START;
        }
        Self(value.clamp(0.0, 1.0))
    }

    /// Raw value.
    pub fn get(self) -> f64 {
        self.0
    }

    /// Add `delta` and clamp.
    pub fn offset(self, delta: f64) -> Self {
        Self::new(self.0 + delta)
    }

    /// True at exactly 0.
    pub fn is_start(self) -> bool {
        self.0 <= 0.0
    }

    /// True at exactly 1.
    pub fn is_end(self) -> bool {
        self.0 >= 1.0
    }

    /// True strictly inside `(0, 1)`.
    pub fn is_interior(self) -> bool {
        !self.is_start() && !self.is_end()
    }
}

impl From<f64> for Progress {
    fn from(value: f64) -> Self {
        Self::new(value)
    }
}

impl From<Progress> for f64 {
    fn from(p: Progress) -> Self {
        p.0
    }
}

/// Direction of an input relative to the sequence.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum Direction {
    /// Towards progress 1 (scrolling down).
    Forward,
    /// Towards progress 0 (scrolling up).
    Backward,
}

impl Direction {
    /// Direction implied by a raw delta; `None` for zero or non-finite deltas.
    pub fn from_delta(delta: f64) -> Option<Self> {
        if !delta.is_finite() || delta == 0.0 {
            None
        } else if delta > 0.0 {
            Some(Self::Forward)
        } else {
            Some(Self::Backward)
        }
    }

    /// The opposite direction.
    pub fn reversed(self) -> Self {
        match self {
            Self::Forward => Self::Backward,
            Self::Backward => Self::Forward,
        }
    }
}

/// Monotonic input timestamp in milliseconds.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct Timestamp(pub u64);

impl Timestamp {
    /// Milliseconds elapsed since `earlier`, zero if `earlier` is in the future.
    pub fn since(self, earlier: Timestamp) -> u64 {
        self.0.saturating_sub(earlier.0)
    }

    /// Timestamp `ms` milliseconds later.
    pub fn after(self, ms: u64) -> Timestamp {
        Timestamp(self.0.saturating_add(ms))
    }
}

/// Handle returned by listener registration; used to unregister.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

/// Ordered set of callbacks receiving `&E`.
pub struct Listeners<E> {
    next: u64,
    entries: Vec<(ListenerId, Box<dyn FnMut(&E)>)>,
}

impl<E> Default for Listeners<E> {
    fn default() -> Self {
        Self {
            next: 0,
            entries: Vec::new(),
        }
    }
}

impl<E> Listeners<E> {
    /// Register a callback. Callbacks fire in registration order.
    pub fn add(&mut self, f: impl FnMut(&E) + 'static) -> ListenerId {
        let id = ListenerId(self.next);
        self.next += 1;
        self.entries.push((id, Box::new(f)));
        id
    }

    /// Remove a callback; returns false if it was not registered.
    pub fn remove(&mut self, id: ListenerId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|(i, _)| *i != id);
        self.entries.len() != before
    }

    /// Invoke every callback with `event`.
    pub fn emit(&mut self, event: &E) {
        for (_, f) in &mut self.entries {
            f(event);
        }
    }

    /// Drop every callback.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Number of registered callbacks.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<E> std::fmt::Debug for Listeners<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Listeners")
            .field("len", &self.entries.len())
            .finish()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
