/// Convenience result type used across the fractal engine.
pub type FractalResult<T> = Result<T, FractalError>;

/// Errors surfaced by the engine's public API.
///
/// Only activation can fail; the per-tick update path works on validated,
/// preallocated memory and has no error cases.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum FractalError {
    /// Rejected configuration (depth, sampling ranges, probability, threads).
    #[error("configuration error: {0}")]
    Configuration(String),

    /// The worker pool could not be created.
    #[error("scheduler error: {0}")]
    Scheduler(String),

    /// A configuration document could not be parsed.
    #[error("serialization error: {0}")]
    Serde(String),
}

impl FractalError {
    /// Build a [`FractalError::Configuration`] value.
    pub fn configuration(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }

    /// Build a [`FractalError::Scheduler`] value.
    pub fn scheduler(msg: impl Into<String>) -> Self {
        Self::Scheduler(msg.into())
    }

    /// Build a [`FractalError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_category_prefix() {
        let err = FractalError::configuration("depth 9 is outside 3..=8");
        assert_eq!(
            err.to_string(),
            "configuration error: depth 9 is outside 3..=8"
        );

        let err = FractalError::scheduler("no threads");
        assert_eq!(err.to_string(), "scheduler error: no threads");
    }
}
