/// Side-channel sink for dispatch failures.
///
/// Storage errors surface here and nowhere else: the facade has long since
/// returned success to its caller by the time a write fails. Implementations
/// must not route back through the buffered pipeline, or a failing store
/// would feed itself an endless stream of its own error records.
pub trait FailureLog: Send + Sync {
    fn dispatch_failed(&self, action: &str, app: &str, error_kind: &str, message: &str);
}

/// Default [`FailureLog`] that emits one structured `tracing` error event
/// per failed sub-batch write.
#[derive(Clone, Default)]
pub struct TracingFailureLog;

impl FailureLog for TracingFailureLog {
    fn dispatch_failed(&self, action: &str, app: &str, error_kind: &str, message: &str) {
        tracing::error!(action, app, error = error_kind, "batch write failed: {message}");
    }
}
