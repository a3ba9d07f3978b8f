use thiserror::Error;

#[derive(Debug, Error)]
pub enum TicketError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("yaml error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("invalid serial '{input}': {reason}")]
    InvalidSerial { input: String, reason: String },
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}

pub type TicketResult<T> = Result<T, TicketError>;
