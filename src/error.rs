use thiserror::Error;

#[derive(Error, Debug)]
pub enum GlanceError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Can't parse repository target: {0}")]
    InvalidTarget(String),

    #[error("Unsupported host: {0}")]
    UnsupportedHost(String),

    #[error("{0} not found")]
    NotFound(String),

    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Git error: {0}")]
    Git(#[from] git2::Error),

    #[error("Timed out after {secs}s while fetching {what}")]
    Timeout { what: String, secs: u64 },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Background task failed: {0}")]
    Task(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl From<tokio::task::JoinError> for GlanceError {
    fn from(err: tokio::task::JoinError) -> Self {
        GlanceError::Task(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, GlanceError>;
