use crate::buffer::LogBuffer;
use crate::executor::JobExecutor;
use crate::record::{LogType, RecordBuilder};
use crate::registry::{EventLogger, LogResult};
use serde_json::{Map, Value};
use std::sync::Mutex;

/// Buffered facade over the batch-write store.
///
/// Each log call builds a record and offers it to the in-memory buffer.
/// While the buffer has room the call returns immediately; the call that
/// fills the flush unit drains the buffer and submits the drained records
/// plus the new one as a single [`DispatchJob`](crate::worker::DispatchJob).
///
/// Fire-and-forget by design: the facade never blocks on dispatch
/// completion and never surfaces dispatch-layer errors. Telemetry must not
/// fail or slow down the caller's primary operation, so every call reports
/// success once the record is buffered or handed to the executor.
pub struct StoreLogger {
    builder: RecordBuilder,
    buffer: Mutex<LogBuffer>,
    executor: JobExecutor,
}

impl StoreLogger {
    pub fn new(builder: RecordBuilder, buffer: LogBuffer, executor: JobExecutor) -> Self {
        StoreLogger {
            builder,
            buffer: Mutex::new(buffer),
            executor,
        }
    }

    pub fn executor(&self) -> &JobExecutor {
        &self.executor
    }

    pub fn log(
        &self,
        log_type: LogType,
        action: &str,
        message: impl Into<Value>,
        fields: Map<String, Value>,
    ) -> LogResult {
        let record = self.builder.build(log_type, action, message, fields);

        // One critical section around add + flush + submit: two callers can
        // never both observe "full" for the same flush unit, and no record
        // can slip in between the drain and the submit. A poisoned lock just
        // means another caller panicked mid-section; the buffer itself is
        // still consistent, so take it over rather than panic telemetry.
        let mut buffer = self
            .buffer
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        if let Err(record) = buffer.add(record) {
            let mut batch = buffer.flush();
            batch.push(record);
            self.executor.submit(batch);
        }

        LogResult::success()
    }

    pub fn info(
        &self,
        action: &str,
        message: impl Into<Value>,
        fields: Map<String, Value>,
    ) -> LogResult {
        self.log(LogType::Info, action, message, fields)
    }

    pub fn warn(
        &self,
        action: &str,
        message: impl Into<Value>,
        fields: Map<String, Value>,
    ) -> LogResult {
        self.log(LogType::Warn, action, message, fields)
    }

    pub fn error(
        &self,
        action: &str,
        message: impl Into<Value>,
        fields: Map<String, Value>,
    ) -> LogResult {
        self.log(LogType::Error, action, message, fields)
    }

    pub fn debug(
        &self,
        action: &str,
        message: impl Into<Value>,
        fields: Map<String, Value>,
    ) -> LogResult {
        self.log(LogType::Debug, action, message, fields)
    }
}

impl EventLogger for StoreLogger {
    fn log(
        &self,
        log_type: LogType,
        action: &str,
        message: &Value,
        fields: &Map<String, Value>,
    ) -> LogResult {
        StoreLogger::log(self, log_type, action, message.clone(), fields.clone())
    }
}
