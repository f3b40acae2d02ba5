use thiserror::Error;

#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("delivery to {target} failed: {reason}")]
    Delivery { target: String, reason: String },

    #[error("HTTP client error: {0}")]
    Client(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

pub type NotifyResult<T> = Result<T, NotifyError>;
