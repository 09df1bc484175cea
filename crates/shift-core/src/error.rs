use thiserror::Error;

#[derive(Debug, Error)]
pub enum ShiftError {
    #[error("task not found: {0}")]
    TaskNotFound(String),

    #[error("task text must not be empty")]
    EmptyTaskText,

    #[error("timeline not found: {0}")]
    TimelineNotFound(String),

    #[error("timeline name must not be empty")]
    EmptyTimelineName,

    #[error("cannot delete the last remaining timeline")]
    LastTimeline,

    #[error("timeline has no assistant reply to export: {0}")]
    NothingToExport(String),

    #[error("unknown platform: {0}")]
    UnknownPlatform(String),

    #[error("invalid store key '{0}': must be lowercase alphanumeric with '-' or '_'")]
    InvalidKey(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, ShiftError>;
