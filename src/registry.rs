use crate::record::LogType;
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::sync::Arc;

/// Outcome of one log call against one logger.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogResult {
    success: bool,
    error: Option<String>,
}

impl LogResult {
    pub fn success() -> Self {
        LogResult {
            success: true,
            error: None,
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        LogResult {
            success: false,
            error: Some(message.into()),
        }
    }

    pub fn is_success(&self) -> bool {
        self.success
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }
}

/// A destination for structured log calls.
///
/// One entry point with the level as a parameter instead of one method per
/// level; the concrete loggers add `info`/`warn`/`error`/`debug`
/// conveniences where callers want them.
///
/// Implementations divide into two temperaments: fire-and-forget ones
/// (the buffered store logger) that always return success, and synchronous
/// ones (the metrics adapter) that may fail validation and say so in the
/// returned [`LogResult`].
pub trait EventLogger: Send + Sync {
    fn log(
        &self,
        log_type: LogType,
        action: &str,
        message: &Value,
        fields: &Map<String, Value>,
    ) -> LogResult;
}

/// Per-logger results of one fanned-out call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FanoutResult {
    results: BTreeMap<String, LogResult>,
}

impl FanoutResult {
    pub fn all_success(&self) -> bool {
        self.results.values().all(LogResult::is_success)
    }

    pub fn result(&self, name: &str) -> Option<&LogResult> {
        self.results.get(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &LogResult)> {
        self.results.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }
}

/// Named collection of [`EventLogger`]s with broadcast dispatch.
///
/// **Usage**
/// ```
/// use std::sync::Arc;
/// use serde_json::{json, Map};
/// use event_fanout::record::LogType;
/// use event_fanout::registry::{EventLogger, LogResult, Registry};
///
/// struct Stdout;
/// impl EventLogger for Stdout {
///     fn log(
///         &self,
///         log_type: LogType,
///         action: &str,
///         message: &serde_json::Value,
///         _fields: &Map<String, serde_json::Value>,
///     ) -> LogResult {
///         println!("[{}] {action}: {message}", log_type.as_str());
///         LogResult::success()
///     }
/// }
///
/// let mut registry = Registry::new();
/// registry.register("stdout", Arc::new(Stdout));
/// let outcome = registry.info(None, "booted", &json!("ready"), &Map::new());
/// assert!(outcome.all_success());
/// ```
#[derive(Clone, Default)]
pub struct Registry {
    loggers: BTreeMap<String, Arc<dyn EventLogger>>,
}

impl Registry {
    pub fn new() -> Self {
        Registry::default()
    }

    /// Register a logger under a symbolic name. Re-registering a name
    /// replaces the previous logger.
    pub fn register(&mut self, name: impl Into<String>, logger: Arc<dyn EventLogger>) {
        self.loggers.insert(name.into(), logger);
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.loggers.keys().map(String::as_str)
    }

    /// Fan one call out and collect a result per logger.
    ///
    /// `selection = None` targets every registered logger; a selection
    /// restricts the call to the named ones. A selected name that is not
    /// registered yields a failure entry instead of being skipped, so the
    /// caller can see the typo in the result.
    pub fn log(
        &self,
        selection: Option<&[&str]>,
        log_type: LogType,
        action: &str,
        message: &Value,
        fields: &Map<String, Value>,
    ) -> FanoutResult {
        let mut results = BTreeMap::new();

        match selection {
            None => {
                for (name, logger) in &self.loggers {
                    results.insert(name.clone(), logger.log(log_type, action, message, fields));
                }
            }
            Some(names) => {
                for name in names {
                    let result = match self.loggers.get(*name) {
                        Some(logger) => logger.log(log_type, action, message, fields),
                        None => LogResult::failure(format!("logger {name} not registered")),
                    };
                    results.insert((*name).to_string(), result);
                }
            }
        }

        FanoutResult { results }
    }

    pub fn info(
        &self,
        selection: Option<&[&str]>,
        action: &str,
        message: &Value,
        fields: &Map<String, Value>,
    ) -> FanoutResult {
        self.log(selection, LogType::Info, action, message, fields)
    }

    pub fn warn(
        &self,
        selection: Option<&[&str]>,
        action: &str,
        message: &Value,
        fields: &Map<String, Value>,
    ) -> FanoutResult {
        self.log(selection, LogType::Warn, action, message, fields)
    }

    pub fn error(
        &self,
        selection: Option<&[&str]>,
        action: &str,
        message: &Value,
        fields: &Map<String, Value>,
    ) -> FanoutResult {
        self.log(selection, LogType::Error, action, message, fields)
    }

    pub fn debug(
        &self,
        selection: Option<&[&str]>,
        action: &str,
        message: &Value,
        fields: &Map<String, Value>,
    ) -> FanoutResult {
        self.log(selection, LogType::Debug, action, message, fields)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::Mutex;

    #[derive(Default)]
    struct Probe {
        calls: Mutex<Vec<(LogType, String)>>,
        fail_with: Option<String>,
    }

    impl EventLogger for Probe {
        fn log(
            &self,
            log_type: LogType,
            action: &str,
            _message: &Value,
            _fields: &Map<String, Value>,
        ) -> LogResult {
            self.calls.lock().unwrap().push((log_type, action.to_string()));
            match &self.fail_with {
                Some(message) => LogResult::failure(message.clone()),
                None => LogResult::success(),
            }
        }
    }

    #[test]
    fn broadcast_reaches_every_registered_logger() {
        let first = Arc::new(Probe::default());
        let second = Arc::new(Probe::default());

        let mut registry = Registry::new();
        registry.register("first", Arc::clone(&first) as Arc<dyn EventLogger>);
        registry.register("second", Arc::clone(&second) as Arc<dyn EventLogger>);

        let outcome = registry.info(None, "ping", &json!("m"), &Map::new());

        assert!(outcome.all_success());
        assert_eq!(outcome.len(), 2);
        assert_eq!(first.calls.lock().unwrap().len(), 1);
        assert_eq!(second.calls.lock().unwrap().len(), 1);
    }

    #[test]
    fn selection_restricts_the_fanout() {
        let first = Arc::new(Probe::default());
        let second = Arc::new(Probe::default());

        let mut registry = Registry::new();
        registry.register("first", Arc::clone(&first) as Arc<dyn EventLogger>);
        registry.register("second", Arc::clone(&second) as Arc<dyn EventLogger>);

        let outcome = registry.warn(Some(&["second"]), "ping", &json!("m"), &Map::new());

        assert_eq!(outcome.len(), 1);
        assert!(first.calls.lock().unwrap().is_empty());
        assert_eq!(
            second.calls.lock().unwrap()[0],
            (LogType::Warn, "ping".to_string())
        );
    }

    #[test]
    fn unknown_selected_name_becomes_a_failure_entry() {
        let mut registry = Registry::new();
        registry.register("real", Arc::new(Probe::default()) as Arc<dyn EventLogger>);

        let outcome = registry.error(Some(&["real", "ghost"]), "ping", &json!("m"), &Map::new());

        assert!(!outcome.all_success());
        assert!(outcome.result("real").unwrap().is_success());
        let ghost = outcome.result("ghost").unwrap();
        assert!(!ghost.is_success());
        assert_eq!(ghost.error(), Some("logger ghost not registered"));
    }

    #[test]
    fn one_failing_logger_does_not_mask_the_others() {
        let mut registry = Registry::new();
        registry.register(
            "sour",
            Arc::new(Probe {
                fail_with: Some("invalid payload".to_string()),
                ..Default::default()
            }) as Arc<dyn EventLogger>,
        );
        registry.register("sweet", Arc::new(Probe::default()) as Arc<dyn EventLogger>);

        let outcome = registry.debug(None, "ping", &json!("m"), &Map::new());

        assert!(!outcome.all_success());
        assert!(outcome.result("sweet").unwrap().is_success());
        assert_eq!(outcome.result("sour").unwrap().error(), Some("invalid payload"));
    }

    #[test]
    fn empty_registry_broadcast_is_empty_success() {
        let registry = Registry::new();
        let outcome = registry.info(None, "ping", &json!("m"), &Map::new());
        assert!(outcome.is_empty());
        assert!(outcome.all_success());
    }
}
