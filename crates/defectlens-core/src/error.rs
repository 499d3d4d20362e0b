use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("failed to load threshold config from {path}: {reason}")]
    ConfigLoad { path: PathBuf, reason: String },

    #[error("invalid threshold config: {0}")]
    ConfigInvalid(String),

    #[error("unknown side '{0}' (expected one of: top, bottom, left, right, back, front)")]
    UnknownSide(String),

    #[error("question '{0}' not found in threshold config and no 'default' entry present")]
    QuestionNotFound(String),

    #[error("failed to load record batch from {path}: {reason}")]
    RecordLoad { path: PathBuf, reason: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
