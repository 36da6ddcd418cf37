use crate::foundation::error::{ScopeError, ScopeResult};

/// Predicted class index, validated against the number of output classes.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(transparent)]
pub struct Label(u32);

impl Label {
    /// Validate `value` against `class_count` classes (`0..class_count`).
    pub fn new(value: i64, class_count: u32) -> ScopeResult<Self> {
        match u32::try_from(value) {
            Ok(v) if v < class_count => Ok(Self(v)),
            _ => Err(ScopeError::validation(format!(
                "label {value} is outside 0..{class_count}"
            ))),
        }
    }

    /// Class index.
    pub fn get(self) -> u32 {
        self.0
    }
}

impl std::fmt::Display for Label {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Result of one inference call. Immutable once received.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct PredictionResult {
    /// Predicted class.
    pub label: Label,
}

impl PredictionResult {
    /// Wrap a label.
    pub fn new(label: Label) -> Self {
        Self { label }
    }
}
