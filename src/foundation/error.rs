/// Convenience result type used across scrollphase.
pub type ScrollPhaseResult<T> = Result<T, ScrollPhaseError>;

/// Top-level error taxonomy used by controller APIs.
#[derive(thiserror::Error, Debug)]
pub enum ScrollPhaseError {
    /// Invalid sequence configuration (gaps, overlaps, unknown keyframes, bad constants).
    #[error("configuration error: {0}")]
    Config(String),

    /// The viewport has not produced a non-zero measurement yet.
    #[error("measurement not ready")]
    MeasurementNotReady,

    /// Media playback was rejected by the handle (for example autoplay restrictions).
    #[error("playback error: {0}")]
    Playback(String),

    /// Errors when serializing or deserializing configuration.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ScrollPhaseError {
    /// Build a [`ScrollPhaseError::Config`] value.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Build a [`ScrollPhaseError::Playback`] value.
    pub fn playback(msg: impl Into<String>) -> Self {
        Self::Playback(msg.into())
    }

    /// Build a [`ScrollPhaseError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }

    /// True for errors the host treats as transient rather than degrading.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::MeasurementNotReady | Self::Playback(_))
    }
}

impl From<serde_json::Error> for ScrollPhaseError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serde(err.to_string())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
