use thiserror::Error;

#[derive(Debug, Error)]
pub enum MonitorError {
    #[error("store error: {0}")]
    Store(#[from] snapdiff_store::StoreError),

    #[error("diff error: {0}")]
    Diff(#[from] snapdiff_diff::DiffError),

    #[error("notification error: {0}")]
    Notify(#[from] snapdiff_notify::NotifyError),

    #[error("invalid snapshot: {0}")]
    Snapshot(#[from] snapdiff_types::TypeError),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type MonitorResult<T> = Result<T, MonitorError>;
