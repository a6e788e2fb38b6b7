/// Result alias used across the crate.
pub type SeqResult<T> = Result<T, SeqError>;

/// Error type for timeline construction and collaborator failures.
///
/// Configuration problems surface as [`SeqError::Validation`] when a timeline is built. Nothing in
/// this enum is raised by [`Timeline::evaluate`](crate::Timeline::evaluate): per-frame failures are
/// logged and counted instead.
#[derive(thiserror::Error, Debug)]
pub enum SeqError {
    /// Malformed configuration (intervals, target descriptors, references).
    #[error("validation error: {0}")]
    Validation(String),

    /// Failure reported by a render collaborator while an event was running.
    #[error("render error: {0}")]
    Render(String),

    /// Timeline description could not be parsed.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Any other error, source preserved.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl SeqError {
    /// Build a [`SeqError::Validation`].
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`SeqError::Render`].
    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }

    /// Build a [`SeqError::Serde`].
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}

impl From<serde_json::Error> for SeqError {
    fn from(err: serde_json::Error) -> Self {
        Self::serde(err.to_string())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
