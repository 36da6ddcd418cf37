use crate::foundation::error::ScopeError;

/// Severity of a [`Notice`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeLevel {
    /// Confirmation of something that worked.
    Info,
    /// Something failed; the session is still usable.
    Error,
}

/// User-visible, non-fatal message.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
pub struct Notice {
    /// Severity.
    pub level: NoticeLevel,
    /// Text shown to the user.
    pub message: String,
}

impl Notice {
    /// Informational notice.
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Info,
            message: message.into(),
        }
    }

    /// Error notice.
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            message: message.into(),
        }
    }

    /// User-facing wording for `err`.
    pub fn from_error(err: &ScopeError) -> Self {
        match err {
            ScopeError::Validation(msg) => Self::error(msg.clone()),
            ScopeError::InferenceUnavailable(_) => Self::error(
                "Prediction failed. Make sure the classifier service is running and try again.",
            ),
            ScopeError::FeedbackSubmissionFailed(_) => {
                Self::error("Could not submit feedback. Please try again.")
            }
            other => Self::error(other.to_string()),
        }
    }
}

impl std::fmt::Display for Notice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let tag = match self.level {
            NoticeLevel::Info => "info",
            NoticeLevel::Error => "error",
        };
        write!(f, "[{tag}] {}", self.message)
    }
}
