use crate::foundation::core::{Direction, Progress};
use crate::input::progress::InputMode;

/// Whether native scrolling is currently intercepted.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum PinState {
    /// Input passes through to the page.
    #[default]
    Released,
    /// The sequence holds the page in place.
    Locked,
}

/// When a sequence pins itself in place.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum InterceptMode {
    /// Never pins; input passes through untouched.
    Never,
    /// Pinned visually while progress is interior; native scroll keeps driving progress.
    MidTransition,
    /// Pinned from first interaction until completion; input is consumed while locked.
    WholeLifetime,
}

impl InterceptMode {
    /// Pinning used when the config does not name one.
    pub fn default_for(input: &InputMode) -> Self {
        match input {
            InputMode::ScrollLinked(_) => Self::MidTransition,
            InputMode::Gesture(_) => Self::WholeLifetime,
            InputMode::Discrete(_) => Self::Never,
        }
    }
}

/// Decides when native scroll is intercepted.
///
/// Interior progress is always locked. A [`InterceptMode::MidTransition`] pin releases at
/// either boundary. A [`InterceptMode::WholeLifetime`] pin lets the input direction decide:
/// pointing out of the sequence releases, pointing back in locks again if `entry_ok` allows
/// it. Without a direction the previous state holds, so a boundary never flickers.
#[derive(Clone, Debug)]
pub struct PinController {
    mode: InterceptMode,
    state: PinState,
}

impl PinController {
    /// Released controller using `mode`.
    pub fn new(mode: InterceptMode) -> Self {
        Self {
            mode,
            state: PinState::Released,
        }
    }

    /// Pinning policy.
    pub fn mode(&self) -> InterceptMode {
        self.mode
    }

    /// Current pin state.
    pub fn state(&self) -> PinState {
        self.state
    }

    /// Shorthand for `state() == PinState::Locked`.
    pub fn is_locked(&self) -> bool {
        self.state == PinState::Locked
    }

    /// Locked and consuming input rather than letting it scroll the page.
    pub fn intercepts(&self) -> bool {
        self.is_locked() && self.mode == InterceptMode::WholeLifetime
    }

    /// Apply the pin rule and return the new state.
    pub fn decide(
        &mut self,
        progress: Progress,
        direction: Option<Direction>,
        entry_ok: bool,
    ) -> PinState {
        let next = match self.mode {
            InterceptMode::Never => PinState::Released,
            _ if progress.is_interior() => PinState::Locked,
            InterceptMode::MidTransition => PinState::Released,
            InterceptMode::WholeLifetime => match (direction, progress.is_end()) {
                (None, _) => self.state,
                (Some(Direction::Forward), true) | (Some(Direction::Backward), false) => {
                    PinState::Released
                }
                (Some(_), _) if entry_ok => PinState::Locked,
                (Some(_), _) => PinState::Released,
            },
        };
        if next != self.state {
            tracing::debug!(?next, progress = progress.get(), ?direction, "pin state changed");
            self.state = next;
        }
        next
    }

    /// Force the released state.
    pub fn release(&mut self) {
        self.state = PinState::Released;
    }
}

#[cfg(test)]
#[path = "../../tests/unit/pin/controller.rs"]
mod tests;
