/// Convenience result type used across digitscope.
pub type ScopeResult<T> = Result<T, ScopeError>;

/// Top-level error taxonomy used by library APIs.
///
/// None of these is fatal to a running session: every variant maps to a user-visible notice
/// (or, for stale responses, to nothing at all) and the session stays re-triggerable.
#[derive(thiserror::Error, Debug)]
pub enum ScopeError {
    /// Invalid user input or configuration, reported locally and never sent over the wire.
    #[error("validation error: {0}")]
    Validation(String),

    /// The prediction endpoint failed, timed out, or answered with something unusable.
    #[error("inference unavailable: {0}")]
    InferenceUnavailable(String),

    /// The feedback endpoint rejected or never received the submission.
    #[error("feedback submission failed: {0}")]
    FeedbackSubmissionFailed(String),

    /// Errors while scheduling or applying animation stages.
    #[error("animation error: {0}")]
    Animation(String),

    /// Errors while building or rasterizing diagram frames.
    #[error("render error: {0}")]
    Render(String),

    /// Errors from the best-effort key/value cache.
    #[error("store error: {0}")]
    Store(String),

    /// Errors when serializing or deserializing data structures.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ScopeError {
    /// Build a [`ScopeError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`ScopeError::InferenceUnavailable`] value.
    pub fn inference_unavailable(msg: impl Into<String>) -> Self {
        Self::InferenceUnavailable(msg.into())
    }

    /// Build a [`ScopeError::FeedbackSubmissionFailed`] value.
    pub fn feedback_failed(msg: impl Into<String>) -> Self {
        Self::FeedbackSubmissionFailed(msg.into())
    }

    /// Build a [`ScopeError::Animation`] value.
    pub fn animation(msg: impl Into<String>) -> Self {
        Self::Animation(msg.into())
    }

    /// Build a [`ScopeError::Render`] value.
    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }

    /// Build a [`ScopeError::Store`] value.
    pub fn store(msg: impl Into<String>) -> Self {
        Self::Store(msg.into())
    }

    /// Build a [`ScopeError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
