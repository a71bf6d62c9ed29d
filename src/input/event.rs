use crate::foundation::core::{Direction, Timestamp};

/// Raw input delivered by the runtime.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub enum InputEvent {
    /// Wheel delta; positive scrolls down.
    Wheel {
        /// Vertical delta in pixels.
        delta_y: f64,
        /// Delivery time.
        at: Timestamp,
    },
    /// First contact of a touch gesture at client `y`.
    TouchStart {
        /// Client y of the contact.
        y: f64,
        /// Delivery time.
        at: Timestamp,
    },
    /// Touch moved to client `y`.
    TouchMove {
        /// Client y of the contact.
        y: f64,
        /// Delivery time.
        at: Timestamp,
    },
    /// Touch gesture ended.
    TouchEnd {
        /// Delivery time.
        at: Timestamp,
    },
    /// Native scroll position of the page or tracked container changed.
    Scroll {
        /// New document scroll offset.
        offset: f64,
        /// Delivery time.
        at: Timestamp,
    },
    /// Click or tap anywhere.
    Pointer {
        /// Delivery time.
        at: Timestamp,
    },
    /// Key press anywhere.
    Key {
        /// Delivery time.
        at: Timestamp,
    },
    /// Viewport resized or the tracked element changed size.
    Resize {
        /// Delivery time.
        at: Timestamp,
    },
}

impl InputEvent {
    /// Delivery time.
    pub fn at(&self) -> Timestamp {
        match *self {
            Self::Wheel { at, .. }
            | Self::TouchStart { at, .. }
            | Self::TouchMove { at, .. }
            | Self::TouchEnd { at }
            | Self::Scroll { at, .. }
            | Self::Pointer { at }
            | Self::Key { at }
            | Self::Resize { at } => at,
        }
    }

    /// Whether the event counts as a user gesture for media autoplay unlocking.
    pub fn is_user_gesture(&self) -> bool {
        matches!(
            self,
            Self::TouchStart { .. } | Self::Pointer { .. } | Self::Key { .. }
        )
    }

    /// Direction of a wheel event; other events need tracking state to know theirs.
    pub fn wheel_direction(&self) -> Option<Direction> {
        match *self {
            Self::Wheel { delta_y, .. } => Direction::from_delta(delta_y),
            _ => None,
        }
    }
}

/// What the runtime should do with the native effect of an event.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum InputDisposition {
    /// Suppress the default (`preventDefault`): the event drove the sequence.
    Consumed,
    /// Let the page scroll natively.
    PassThrough,
}
