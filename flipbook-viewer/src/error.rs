use std::path::PathBuf;

/// Failures the viewer can surface to the user.
///
/// Messages travel through iced's update loop, so the error is `Clone` and
/// carries rendered causes instead of boxed sources.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ViewerError {
    #[error("failed to read {path}: {reason}")]
    Read { path: PathBuf, reason: String },

    #[error("failed to decode document: {0}")]
    Decode(String),

    #[error("document has no pages")]
    Empty,

    #[error("{action} failed: {reason}")]
    Platform {
        action: &'static str,
        reason: String,
    },
}

impl ViewerError {
    pub fn read(path: impl Into<PathBuf>, err: impl std::fmt::Display) -> Self {
        Self::Read {
            path: path.into(),
            reason: err.to_string(),
        }
    }

    pub fn platform(action: &'static str, err: impl std::fmt::Display) -> Self {
        Self::Platform {
            action,
            reason: err.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, ViewerError>;
