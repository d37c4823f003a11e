use crate::buffer::LogBuffer;
use crate::config::{ConfigError, TracerConfig};
use crate::executor::JobExecutor;
use crate::failure_log::{FailureLog, TracingFailureLog};
use crate::logger::StoreLogger;
use crate::record::RecordBuilder;
use crate::store::BatchStore;
use crate::worker::DispatchWorker;
use std::sync::Arc;
use tokio::task::JoinHandle;

/// Wire a full buffered pipeline: validate the config, build the dispatch
/// worker, spawn the job executor and hand back the facade.
///
/// **Parameters**
/// - `store`: [`BatchStore`] that will receive the batch writes.
/// - `failure_log`: side channel for contained write failures.
/// - `config`: pipeline configuration, validated here; invalid
///   configuration is fatal at this point and never at log-call time.
///
/// **Returns**
/// - the [`StoreLogger`] facade and the executor's [`JoinHandle`]. The
///   handle completes after the facade (and any executor clones) have been
///   dropped and the queued jobs were worked off; await it on shutdown to
///   drain in-flight batches. Records still sitting in the buffer at that
///   point are lost, which is the accepted data-loss window.
pub fn spawn_store_logger_with(
    store: Arc<dyn BatchStore>,
    failure_log: Arc<dyn FailureLog>,
    config: TracerConfig,
) -> Result<(StoreLogger, JoinHandle<()>), ConfigError> {
    config.validate()?;

    let worker = DispatchWorker::new(store, failure_log, &config)?;
    let (executor, handle) = JobExecutor::spawn(worker, &config);

    let logger = StoreLogger::new(
        RecordBuilder::new(config.app.clone()),
        LogBuffer::new(config.buffer_capacity),
        executor,
    );

    Ok((logger, handle))
}

/// [`spawn_store_logger_with`] using the default `tracing`-based failure
/// log. This is the recommended entrypoint for typical services.
pub fn spawn_store_logger(
    store: Arc<dyn BatchStore>,
    config: TracerConfig,
) -> Result<(StoreLogger, JoinHandle<()>), ConfigError> {
    spawn_store_logger_with(store, Arc::new(TracingFailureLog), config)
}
