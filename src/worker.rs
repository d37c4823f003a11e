use crate::config::{ConfigError, TracerConfig};
use crate::failure_log::FailureLog;
use crate::record::LogRecord;
use crate::sanitize;
use crate::store::BatchStore;
use serde::{Deserialize, Serialize};
use std::num::NonZeroUsize;
use std::sync::Arc;

/// `action` value the worker reports itself under in the failure log.
const WORKER_ACTION: &str = "DispatchWorker";

/// One unit of asynchronously dispatched work: a single record or a flushed
/// batch of them.
///
/// Both shapes are accepted at the submission boundary; the worker
/// normalizes to a list before slicing. The facade always submits `Batch`,
/// but unbuffered producers can hand over one record without wrapping it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DispatchJob {
    Single(LogRecord),
    Batch(Vec<LogRecord>),
}

impl DispatchJob {
    pub fn into_records(self) -> Vec<LogRecord> {
        match self {
            DispatchJob::Single(record) => vec![record],
            DispatchJob::Batch(records) => records,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            DispatchJob::Single(_) => 1,
            DispatchJob::Batch(records) => records.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl From<LogRecord> for DispatchJob {
    fn from(record: LogRecord) -> Self {
        DispatchJob::Single(record)
    }
}

impl From<Vec<LogRecord>> for DispatchJob {
    fn from(records: Vec<LogRecord>) -> Self {
        DispatchJob::Batch(records)
    }
}

/// Persists one [`DispatchJob`] against the configured store.
///
/// Per run: normalize the job to a record list, slice it into consecutive
/// sub-batches of at most `max_items` records (original order, only the
/// last one short), then for each sub-batch independently sanitize every
/// record and issue one store write. A failed write is reported to the
/// [`FailureLog`] and does not stop the remaining sub-batches.
///
/// The per-request ceiling is a `NonZeroUsize`: a zero ceiling is a
/// configuration error rejected at construction, never discovered mid-job.
#[derive(Clone)]
pub struct DispatchWorker {
    store: Arc<dyn BatchStore>,
    failure_log: Arc<dyn FailureLog>,
    destination: String,
    app: String,
    max_items: NonZeroUsize,
}

impl DispatchWorker {
    pub fn new(
        store: Arc<dyn BatchStore>,
        failure_log: Arc<dyn FailureLog>,
        config: &TracerConfig,
    ) -> Result<Self, ConfigError> {
        let max_items = NonZeroUsize::new(config.max_items_per_request)
            .ok_or(ConfigError::InvalidItemCeiling)?;

        Ok(DispatchWorker {
            store,
            failure_log,
            destination: config.destination.clone(),
            app: config.app.clone(),
            max_items,
        })
    }

    pub fn destination(&self) -> &str {
        &self.destination
    }

    pub fn max_items(&self) -> usize {
        self.max_items.get()
    }

    pub async fn run(&self, job: DispatchJob) {
        let records = job.into_records();
        if records.is_empty() {
            return;
        }

        for chunk in records.chunks(self.max_items.get()) {
            let mut batch = chunk.to_vec();
            for record in &mut batch {
                sanitize::clean_record(record);
            }

            if let Err(err) = self.store.write_batch(&self.destination, &batch).await {
                self.failure_log.dispatch_failed(
                    WORKER_ACTION,
                    &self.app,
                    err.kind(),
                    &err.to_string(),
                );
            }
        }
    }
}
