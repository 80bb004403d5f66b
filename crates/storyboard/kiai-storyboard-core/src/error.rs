//! Error types surfaced while writing a storyboard.

use serde::{Deserialize, Serialize};

#[derive(thiserror::Error, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[non_exhaustive]
pub enum StoryboardError {
    /// A sprite reached the writer with a loop or trigger group still open
    #[error("unclosed command group on sprite \"{texture_path}\"")]
    UnclosedGroup { texture_path: String },

    /// The output sink rejected a write
    #[error("write failed: {reason}")]
    WriteFailed { reason: String },
}

impl From<std::fmt::Error> for StoryboardError {
    fn from(err: std::fmt::Error) -> Self {
        StoryboardError::WriteFailed {
            reason: err.to_string(),
        }
    }
}
