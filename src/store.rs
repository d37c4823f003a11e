use crate::record::LogRecord;
use async_trait::async_trait;
use std::error::Error;

/// Error returned by a [`BatchStore`] write.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The backend accepted the request but signalled an application-level
    /// failure (bad status, rejected items, throttling response body).
    #[error("{kind}: {message}")]
    Service { kind: String, message: String },

    /// The request never got a backend answer (connection, TLS, timeout,
    /// local serialization).
    #[error("transport: {0}")]
    Transport(Box<dyn Error + Send + Sync>),
}

impl StoreError {
    pub fn service(kind: impl Into<String>, message: impl Into<String>) -> Self {
        StoreError::Service {
            kind: kind.into(),
            message: message.into(),
        }
    }

    pub fn transport(err: impl Error + Send + Sync + 'static) -> Self {
        StoreError::Transport(Box::new(err))
    }

    /// Short classifier used by the side-channel failure log.
    pub fn kind(&self) -> &str {
        match self {
            StoreError::Service { kind, .. } => kind,
            StoreError::Transport(_) => "transport",
        }
    }
}

/// Durable destination for batches of [`LogRecord`]s.
///
/// Implementations transport one sub-batch per call to a concrete backend.
/// `destination` names the backend-side target (table, index); `records` is
/// at most the configured per-request item ceiling.
///
/// **Returns**
/// - `Ok(())` if the whole batch was accepted.
/// - `Err(..)` if the write failed. The dispatch worker contains the error,
///   reports it to the side-channel failure log and moves on to the next
///   sub-batch; implementations should not retry internally.
///
/// Called only from the dispatch worker's background task, never on an
/// application thread.
#[async_trait]
pub trait BatchStore: Send + Sync {
    async fn write_batch(&self, destination: &str, records: &[LogRecord])
        -> Result<(), StoreError>;
}
