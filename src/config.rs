/// Static configuration for one buffered pipeline instance.
///
/// Everything is read once at construction; there is no runtime
/// reconfiguration. The struct is passed explicitly to constructors instead
/// of living in process-global state so the pipeline stays testable without
/// environment mutation.
///
/// **Fields**
/// - `app`: name of the emitting application, stamped into every record.
/// - `destination`: backend-side target of batch writes (table, index).
/// - `buffer_capacity`: records per flush unit; 0 disables buffering and
///   dispatches every record on its own.
/// - `max_items_per_request`: the storage backend's documented per-request
///   item ceiling; every sub-batch is at most this many records.
/// - `queue`: name of the dispatch queue, for diagnostics.
/// - `queue_depth`: pending jobs the dispatch queue holds before dropping.
/// - `retry_limit`: times a job is re-run after an uncaught worker failure.
#[derive(Clone, Debug)]
pub struct TracerConfig {
    pub app: String,
    pub destination: String,
    pub buffer_capacity: usize,
    pub max_items_per_request: usize,
    pub queue: String,
    pub queue_depth: usize,
    pub retry_limit: u32,
}

impl TracerConfig {
    pub const DEFAULT_MAX_ITEMS_PER_REQUEST: usize = 25;
    pub const DEFAULT_QUEUE: &'static str = "low";
    pub const DEFAULT_QUEUE_DEPTH: usize = 1024;
    pub const DEFAULT_RETRY_LIMIT: u32 = 1;

    pub fn new(app: impl Into<String>, destination: impl Into<String>) -> Self {
        TracerConfig {
            app: app.into(),
            destination: destination.into(),
            buffer_capacity: 0,
            max_items_per_request: Self::DEFAULT_MAX_ITEMS_PER_REQUEST,
            queue: Self::DEFAULT_QUEUE.to_string(),
            queue_depth: Self::DEFAULT_QUEUE_DEPTH,
            retry_limit: Self::DEFAULT_RETRY_LIMIT,
        }
    }

    /// Reject configurations the pipeline cannot run with. Fatal at
    /// startup, never checked again at call time.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.app.is_empty() {
            return Err(ConfigError::MissingApp);
        }
        if self.destination.is_empty() {
            return Err(ConfigError::MissingDestination);
        }
        if self.max_items_per_request == 0 {
            return Err(ConfigError::InvalidItemCeiling);
        }
        Ok(())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("application name must not be empty")]
    MissingApp,

    #[error("storage destination must not be empty")]
    MissingDestination,

    #[error("max_items_per_request must be at least 1")]
    InvalidItemCeiling,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        assert!(TracerConfig::new("app", "events").validate().is_ok());
    }

    #[test]
    fn empty_app_is_fatal() {
        let config = TracerConfig::new("", "events");
        assert!(matches!(config.validate(), Err(ConfigError::MissingApp)));
    }

    #[test]
    fn empty_destination_is_fatal() {
        let config = TracerConfig::new("app", "");
        assert!(matches!(
            config.validate(),
            Err(ConfigError::MissingDestination)
        ));
    }

    #[test]
    fn zero_item_ceiling_is_fatal() {
        let mut config = TracerConfig::new("app", "events");
        config.max_items_per_request = 0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidItemCeiling)
        ));
    }
}
