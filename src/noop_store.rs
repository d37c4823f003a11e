use crate::record::LogRecord;
use crate::store::{BatchStore, StoreError};
use async_trait::async_trait;

/// A store that simply drops every batch.
///
/// Useful for measuring the overhead of the pipeline itself without any
/// external I/O, and for tests that don't care about persistence.
#[derive(Clone, Default)]
pub struct NoopStore;

#[async_trait]
impl BatchStore for NoopStore {
    async fn write_batch(
        &self,
        _destination: &str,
        _records: &[LogRecord],
    ) -> Result<(), StoreError> {
        Ok(())
    }
}
