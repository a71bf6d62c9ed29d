use crate::animation::ease::Ease;
use crate::animation::lerp::Lerp;
use crate::foundation::core::Timestamp;

/// Time-based interpolation of a scalar, used to smooth jumps in progress.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Tween {
    from: f64,
    to: f64,
    start: Timestamp,
    duration_ms: u64,
    ease: Ease,
}

impl Tween {
    /// Tween from `from` to `to`, starting at `start`.
    pub fn new(from: f64, to: f64, start: Timestamp, duration_ms: u64, ease: Ease) -> Self {
        Self {
            from,
            to,
            start,
            duration_ms,
            ease,
        }
    }

    /// End value.
    pub fn target(&self) -> f64 {
        self.to
    }

    /// Curve applied to elapsed time.
    pub fn ease(&self) -> Ease {
        self.ease
    }

    /// Whether `now` is at or past the end.
    pub fn is_done(&self, now: Timestamp) -> bool {
        now.since(self.start) >= self.duration_ms
    }

    /// Value at `now`, held at `to` once done.
    pub fn sample(&self, now: Timestamp) -> f64 {
        if self.duration_ms == 0 {
            return self.to;
        }
        let t = now.since(self.start) as f64 / self.duration_ms as f64;
        f64::lerp(&self.from, &self.to, self.ease.apply(t))
    }

    /// Restart towards `to` from wherever the tween currently is.
    pub fn retarget(&mut self, now: Timestamp, to: f64, duration_ms: u64) {
        let current = self.sample(now);
        *self = Self::new(current, to, now, duration_ms, self.ease);
    }
}

#[cfg(test)]
#[path = "../../tests/unit/animation/tween.rs"]
mod tests;
