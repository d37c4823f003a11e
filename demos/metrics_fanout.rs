use event_fanout::config::TracerConfig;
use event_fanout::init::spawn_store_logger;
use event_fanout::metrics::{MetricsBackend, MetricsLogger};
use event_fanout::noop_store::NoopStore;
use event_fanout::registry::Registry;
use serde_json::{json, Map, Value};
use std::sync::Arc;

/// Stand-in metrics service that prints what it would emit. Use
/// [`event_fanout::metrics::RuntimeMetricsBackend`] to route into whatever
/// recorder the `metrics` crate has installed instead.
struct PrintlnBackend;

impl MetricsBackend for PrintlnBackend {
    fn increment_counter(&self, name: &str, value: f64, _tags: &Map<String, Value>) {
        println!("[metrics] counter {name} += {value}");
    }

    fn add_distribution_value(&self, name: &str, value: f64, _tags: &Map<String, Value>) {
        println!("[metrics] distribution {name} << {value}");
    }

    fn set_gauge(&self, name: &str, value: f64, _tags: &Map<String, Value>) {
        println!("[metrics] gauge {name} = {value}");
    }
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    let (store_logger, handle) = spawn_store_logger(
        Arc::new(NoopStore),
        TracerConfig::new("demo-app", "app_events"),
    )
    .expect("valid demo config");

    let mut registry = Registry::new();
    registry.register("store", Arc::new(store_logger));
    registry.register("metrics", Arc::new(MetricsLogger::new(Arc::new(PrintlnBackend))));

    // One call fans out to both loggers: the store logger buffers the
    // record, the metrics logger emits the counters synchronously.
    let mut fields = Map::new();
    fields.insert("metrics".to_string(), json!(["orders_total"]));
    let outcome = registry.info(None, "order_paid", &json!("payment captured"), &fields);
    println!("fanout all_success={}", outcome.all_success());

    // An unsupported metric type fails the metrics logger synchronously
    // while the store logger still succeeds.
    let mut fields = Map::new();
    fields.insert(
        "metrics".to_string(),
        json!({ "orders_total": { "type": "meter", "value": 1 } }),
    );
    let outcome = registry.info(None, "order_paid", &json!("payment captured"), &fields);
    println!(
        "store={:?} metrics={:?}",
        outcome.result("store").map(|r| r.is_success()),
        outcome.result("metrics").and_then(|r| r.error()),
    );

    drop(registry);
    handle.await.expect("executor task");
}
