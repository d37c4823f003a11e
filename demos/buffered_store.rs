use event_fanout::config::TracerConfig;
use event_fanout::init::spawn_store_logger;
use event_fanout::noop_store::NoopStore;
use serde_json::{json, Map};
use std::sync::Arc;

/// Demonstrates the buffered pipeline: with a capacity of 3, every third
/// call flushes one three-record job to the store. Swap [`NoopStore`] for a
/// ClickHouse or OpenSearch store to persist the batches for real.
#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    let mut config = TracerConfig::new("demo-app", "app_events");
    config.buffer_capacity = 3;

    let (logger, handle) =
        spawn_store_logger(Arc::new(NoopStore), config).expect("valid demo config");

    for n in 0..7 {
        let mut fields = Map::new();
        fields.insert("order_id".to_string(), json!(n));
        let result = logger.info("order_paid", "payment captured", fields);
        println!("call {n}: success={}", result.is_success());
    }

    println!(
        "jobs submitted: {} (two full flush units, one record still buffered)",
        logger.executor().submitted_jobs()
    );

    // Dropping the facade closes the queue; awaiting the handle drains it.
    drop(logger);
    handle.await.expect("executor task");
}
