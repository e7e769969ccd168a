/// Convenience result type used across heartline.
pub type HeartlineResult<T> = Result<T, HeartlineError>;

/// Top-level error taxonomy used by engine APIs.
///
/// Environmental failures (missing intersection support, an undrawable surface,
/// blocked autoplay) are absorbed where they happen and never show up here.
#[derive(thiserror::Error, Debug)]
pub enum HeartlineError {
    /// Invalid page configuration, out-of-range input or use after teardown.
    #[error("validation error: {0}")]
    Validation(String),

    /// Errors while rasterizing a frame.
    #[error("render error: {0}")]
    Render(String),

    /// Errors when serializing or deserializing data structures.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl HeartlineError {
    /// Build a [`HeartlineError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`HeartlineError::Render`] value.
    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }

    /// Build a [`HeartlineError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}

impl From<serde_json::Error> for HeartlineError {
    fn from(err: serde_json::Error) -> Self {
        Self::serde(err.to_string())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
