use thiserror::Error;

/// Errors raised by the storage layer. The store logs and swallows them.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StoreError {
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("storage is read-only")]
    ReadOnly,
    #[error("storage writer is gone")]
    WriterGone,
}

/// Errors raised by the narration and tone emitters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum FeedbackError {
    #[error("{0} is unavailable")]
    Unavailable(&'static str),
    #[error("failed to start {command}: {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
