//! Error types shared by the deriver, the quiz generator and the season loaders.
use crate::questions::Template;
use thiserror::Error;

/// Raised when raw match records cannot be turned into a derived table.
#[derive(Debug, Error)]
pub enum StatsError {
    #[error("malformed match record at index {index}: {reason}")]
    MalformedInput { index: usize, reason: String },
}

#[derive(Debug, Error)]
pub enum QuizError {
    #[error("insufficient data for {template}: {reason}")]
    InsufficientData { template: Template, reason: String },

    #[error("no question template applies to a table of {matches} matches")]
    NoApplicableTemplate { matches: usize },

    #[error("could not find 3 distinct distractors for {template} after {attempts} attempts")]
    DistractorSynthesisFailure { template: Template, attempts: usize },
}

impl QuizError {
    pub(crate) fn insufficient(template: Template, reason: impl Into<String>) -> Self {
        Self::InsufficientData {
            template,
            reason: reason.into(),
        }
    }

    /// True for the two "not enough data" conditions.
    pub fn is_insufficient_data(&self) -> bool {
        matches!(
            self,
            Self::InsufficientData { .. } | Self::NoApplicableTemplate { .. }
        )
    }
}

/// Failures while reading a season from disk or from the SQLite store.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("{0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Json(#[from] serde_json::Error),

    #[error("{0}")]
    Sql(#[from] rusqlite::Error),

    #[error("invalid stored date '{value}' in row {row}")]
    InvalidDate { row: i64, value: String },
}
