use crate::record::LogType;
use crate::registry::{EventLogger, LogResult};
use serde_json::{Map, Value};
use std::str::FromStr;
use std::sync::Arc;

/// Counter value used when the caller lists bare metric names.
const DEFAULT_COUNTER: f64 = 1.0;

/// The metric shapes a backend knows how to emit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetricKind {
    Counter,
    Distribution,
    Gauge,
}

#[derive(Debug, thiserror::Error)]
#[error("unsupported metric type {0}")]
pub struct UnknownMetricKind(String);

impl FromStr for MetricKind {
    type Err = UnknownMetricKind;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw {
            "counter" => Ok(MetricKind::Counter),
            "distribution" => Ok(MetricKind::Distribution),
            "gauge" => Ok(MetricKind::Gauge),
            other => Err(UnknownMetricKind(other.to_string())),
        }
    }
}

/// Emission surface of a concrete metrics service.
///
/// One method per [`MetricKind`]; the adapter owns the kind-to-method
/// mapping so backends stay a plain vocabulary of three calls.
pub trait MetricsBackend: Send + Sync {
    fn increment_counter(&self, name: &str, value: f64, tags: &Map<String, Value>);
    fn add_distribution_value(&self, name: &str, value: f64, tags: &Map<String, Value>);
    fn set_gauge(&self, name: &str, value: f64, tags: &Map<String, Value>);
}

/// Synchronous [`EventLogger`] adapter over a [`MetricsBackend`].
///
/// Reads the `metrics` field of the call:
/// - a list of names increments each as a counter by 1;
/// - a `name -> { "type": .., "value": .. }` mapping routes each entry
///   through the kind table;
/// - anything else, an unknown type or a non-numeric value is a validation
///   failure returned synchronously to the caller. Metrics emitted before
///   the invalid entry was reached stay emitted.
///
/// Caller fields whose keys appear in `allowed_tags` are forwarded to the
/// backend as tags; an empty whitelist forwards nothing.
pub struct MetricsLogger {
    backend: Arc<dyn MetricsBackend>,
    allowed_tags: Vec<String>,
}

impl MetricsLogger {
    pub fn new(backend: Arc<dyn MetricsBackend>) -> Self {
        MetricsLogger {
            backend,
            allowed_tags: Vec::new(),
        }
    }

    pub fn with_allowed_tags(
        backend: Arc<dyn MetricsBackend>,
        allowed_tags: Vec<String>,
    ) -> Self {
        MetricsLogger {
            backend,
            allowed_tags,
        }
    }

    fn filtered_tags(&self, fields: &Map<String, Value>) -> Map<String, Value> {
        if self.allowed_tags.is_empty() {
            return Map::new();
        }

        fields
            .iter()
            .filter(|(key, _)| self.allowed_tags.iter().any(|allowed| allowed == *key))
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect()
    }

    fn emit(&self, metrics: &Value, tags: &Map<String, Value>) -> LogResult {
        match metrics {
            Value::Array(names) => {
                for name in names {
                    let Some(name) = name.as_str() else {
                        return LogResult::failure(format!("metric name {name} must be a string"));
                    };
                    self.backend.increment_counter(name, DEFAULT_COUNTER, tags);
                }
                LogResult::success()
            }
            Value::Object(entries) => {
                for (name, payload) in entries {
                    let Some(raw_kind) = payload.get("type").and_then(Value::as_str) else {
                        return LogResult::failure(format!("metric type for {name} invalid"));
                    };
                    let Ok(kind) = raw_kind.parse::<MetricKind>() else {
                        return LogResult::failure(format!("metric type {raw_kind} invalid"));
                    };
                    let Some(value) = payload.get("value").and_then(Value::as_f64) else {
                        return LogResult::failure(format!(
                            "metric value for {name} must be numeric"
                        ));
                    };

                    match kind {
                        MetricKind::Counter => self.backend.increment_counter(name, value, tags),
                        MetricKind::Distribution => {
                            self.backend.add_distribution_value(name, value, tags)
                        }
                        MetricKind::Gauge => self.backend.set_gauge(name, value, tags),
                    }
                }
                LogResult::success()
            }
            _ => LogResult::failure("invalid metrics payload"),
        }
    }
}

impl EventLogger for MetricsLogger {
    fn log(
        &self,
        _log_type: LogType,
        _action: &str,
        _message: &Value,
        fields: &Map<String, Value>,
    ) -> LogResult {
        let Some(metrics) = fields.get("metrics") else {
            return LogResult::failure("missing metrics payload");
        };

        let tags = self.filtered_tags(fields);
        self.emit(metrics, &tags)
    }
}

/// [`MetricsBackend`] over the `metrics` crate facade, so anything wired as
/// the process-wide recorder (Prometheus exporter, statsd bridge) receives
/// the fan-out's metrics.
///
/// Counters map to `counter!`, distributions to `histogram!`, gauges to
/// `gauge!`. Tag values are stringified; nested values end up in their JSON
/// form.
#[derive(Clone, Default)]
pub struct RuntimeMetricsBackend;

fn labels(tags: &Map<String, Value>) -> Vec<metrics::Label> {
    tags.iter()
        .map(|(key, value)| {
            let rendered = match value {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            };
            metrics::Label::new(key.clone(), rendered)
        })
        .collect()
}

impl MetricsBackend for RuntimeMetricsBackend {
    fn increment_counter(&self, name: &str, value: f64, tags: &Map<String, Value>) {
        metrics::counter!(name.to_string(), labels(tags)).increment(value as u64);
    }

    fn add_distribution_value(&self, name: &str, value: f64, tags: &Map<String, Value>) {
        metrics::histogram!(name.to_string(), labels(tags)).record(value);
    }

    fn set_gauge(&self, name: &str, value: f64, tags: &Map<String, Value>) {
        metrics::gauge!(name.to_string(), labels(tags)).set(value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::Mutex;

    #[derive(Debug, Clone, PartialEq)]
    enum Emitted {
        Counter(String, f64),
        Distribution(String, f64),
        Gauge(String, f64),
    }

    #[derive(Default)]
    struct FakeBackend {
        emitted: Mutex<Vec<Emitted>>,
        tags_seen: Mutex<Vec<Map<String, Value>>>,
    }

    impl MetricsBackend for FakeBackend {
        fn increment_counter(&self, name: &str, value: f64, tags: &Map<String, Value>) {
            self.emitted
                .lock()
                .unwrap()
                .push(Emitted::Counter(name.to_string(), value));
            self.tags_seen.lock().unwrap().push(tags.clone());
        }

        fn add_distribution_value(&self, name: &str, value: f64, tags: &Map<String, Value>) {
            self.emitted
                .lock()
                .unwrap()
                .push(Emitted::Distribution(name.to_string(), value));
            self.tags_seen.lock().unwrap().push(tags.clone());
        }

        fn set_gauge(&self, name: &str, value: f64, tags: &Map<String, Value>) {
            self.emitted
                .lock()
                .unwrap()
                .push(Emitted::Gauge(name.to_string(), value));
            self.tags_seen.lock().unwrap().push(tags.clone());
        }
    }

    fn fields_with_metrics(metrics: Value) -> Map<String, Value> {
        let mut fields = Map::new();
        fields.insert("metrics".to_string(), metrics);
        fields
    }

    fn call(logger: &MetricsLogger, fields: &Map<String, Value>) -> LogResult {
        logger.log(LogType::Info, "checkout", &json!("m"), fields)
    }

    #[test]
    fn list_form_increments_each_name_by_one() {
        let backend = Arc::new(FakeBackend::default());
        let logger = MetricsLogger::new(Arc::clone(&backend) as Arc<dyn MetricsBackend>);

        let result = call(
            &logger,
            &fields_with_metrics(json!(["orders_total", "payments_total"])),
        );

        assert!(result.is_success());
        assert_eq!(
            *backend.emitted.lock().unwrap(),
            vec![
                Emitted::Counter("orders_total".to_string(), 1.0),
                Emitted::Counter("payments_total".to_string(), 1.0),
            ]
        );
    }

    #[test]
    fn map_form_routes_each_kind() {
        let backend = Arc::new(FakeBackend::default());
        let logger = MetricsLogger::new(Arc::clone(&backend) as Arc<dyn MetricsBackend>);

        let result = call(
            &logger,
            &fields_with_metrics(json!({
                "orders_total": { "type": "counter", "value": 3 },
                "latency_ms": { "type": "distribution", "value": 12.5 },
                "queue_depth": { "type": "gauge", "value": 7 },
            })),
        );

        assert!(result.is_success());
        let emitted = backend.emitted.lock().unwrap();
        assert!(emitted.contains(&Emitted::Counter("orders_total".to_string(), 3.0)));
        assert!(emitted.contains(&Emitted::Distribution("latency_ms".to_string(), 12.5)));
        assert!(emitted.contains(&Emitted::Gauge("queue_depth".to_string(), 7.0)));
    }

    #[test]
    fn unknown_type_fails_after_earlier_entries_were_emitted() {
        let backend = Arc::new(FakeBackend::default());
        let logger = MetricsLogger::new(Arc::clone(&backend) as Arc<dyn MetricsBackend>);

        // serde_json::Map iterates in key order: "a_ok" precedes "b_bad".
        let result = call(
            &logger,
            &fields_with_metrics(json!({
                "a_ok": { "type": "counter", "value": 1 },
                "b_bad": { "type": "meter", "value": 1 },
            })),
        );

        assert!(!result.is_success());
        assert_eq!(result.error(), Some("metric type meter invalid"));
        assert_eq!(
            *backend.emitted.lock().unwrap(),
            vec![Emitted::Counter("a_ok".to_string(), 1.0)]
        );
    }

    #[test]
    fn missing_type_and_non_numeric_value_fail() {
        let backend = Arc::new(FakeBackend::default());
        let logger = MetricsLogger::new(Arc::clone(&backend) as Arc<dyn MetricsBackend>);

        let no_type = call(
            &logger,
            &fields_with_metrics(json!({ "m": { "value": 1 } })),
        );
        assert_eq!(no_type.error(), Some("metric type for m invalid"));

        let bad_value = call(
            &logger,
            &fields_with_metrics(json!({ "m": { "type": "gauge", "value": "high" } })),
        );
        assert_eq!(bad_value.error(), Some("metric value for m must be numeric"));
    }

    #[test]
    fn missing_or_malformed_payload_fails() {
        let backend = Arc::new(FakeBackend::default());
        let logger = MetricsLogger::new(Arc::clone(&backend) as Arc<dyn MetricsBackend>);

        assert!(!call(&logger, &Map::new()).is_success());
        assert!(!call(&logger, &fields_with_metrics(json!("counters"))).is_success());
        assert!(backend.emitted.lock().unwrap().is_empty());
    }

    #[test]
    fn empty_payload_is_a_successful_noop() {
        let backend = Arc::new(FakeBackend::default());
        let logger = MetricsLogger::new(Arc::clone(&backend) as Arc<dyn MetricsBackend>);

        assert!(call(&logger, &fields_with_metrics(json!([]))).is_success());
        assert!(call(&logger, &fields_with_metrics(json!({}))).is_success());
        assert!(backend.emitted.lock().unwrap().is_empty());
    }

    #[test]
    fn tags_are_filtered_by_the_whitelist() {
        let backend = Arc::new(FakeBackend::default());
        let logger = MetricsLogger::with_allowed_tags(
            Arc::clone(&backend) as Arc<dyn MetricsBackend>,
            vec!["region".to_string()],
        );

        let mut fields = fields_with_metrics(json!(["orders_total"]));
        fields.insert("region".to_string(), json!("eu-1"));
        fields.insert("secret".to_string(), json!("do-not-forward"));

        assert!(call(&logger, &fields).is_success());

        let tags = backend.tags_seen.lock().unwrap();
        assert_eq!(tags[0].get("region"), Some(&json!("eu-1")));
        assert!(tags[0].get("secret").is_none());
        assert!(tags[0].get("metrics").is_none());
    }

    #[test]
    fn empty_whitelist_forwards_no_tags() {
        let backend = Arc::new(FakeBackend::default());
        let logger = MetricsLogger::new(Arc::clone(&backend) as Arc<dyn MetricsBackend>);

        let mut fields = fields_with_metrics(json!(["orders_total"]));
        fields.insert("region".to_string(), json!("eu-1"));

        assert!(call(&logger, &fields).is_success());
        assert!(backend.tags_seen.lock().unwrap()[0].is_empty());
    }

    #[test]
    fn metric_kind_parses_lowercase_names() {
        assert_eq!("counter".parse::<MetricKind>().unwrap(), MetricKind::Counter);
        assert_eq!(
            "distribution".parse::<MetricKind>().unwrap(),
            MetricKind::Distribution
        );
        assert_eq!("gauge".parse::<MetricKind>().unwrap(), MetricKind::Gauge);
        assert!("meter".parse::<MetricKind>().is_err());
    }
}
