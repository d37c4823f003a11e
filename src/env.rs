/// Environment variable names used by this crate for convenient
/// configuration of the pipeline from containerized services.
///
/// These are purely helpers; the core types remain decoupled from
/// environment access.

/// Name of the emitting application.
pub const EVENT_FANOUT_APP_ENV: &str = "EVENT_FANOUT_APP";

/// Destination of batch writes (table or index name).
pub const EVENT_FANOUT_DESTINATION_ENV: &str = "EVENT_FANOUT_DESTINATION";

/// Buffer capacity in records per flush unit; 0 disables buffering.
pub const EVENT_FANOUT_BUFFER_CAPACITY_ENV: &str = "EVENT_FANOUT_BUFFER_CAPACITY";

/// Store DSN, e.g. `clickhouse://127.0.0.1:8123/default`.
pub const EVENT_FANOUT_STORE_DSN_ENV: &str = "EVENT_FANOUT_STORE_DSN";

/// ClickHouse base HTTP URL, e.g. `http://127.0.0.1:8123`.
pub const EVENT_FANOUT_CLICKHOUSE_URL_ENV: &str = "EVENT_FANOUT_CLICKHOUSE_URL";

/// ClickHouse database name.
pub const EVENT_FANOUT_CLICKHOUSE_DB_ENV: &str = "EVENT_FANOUT_CLICKHOUSE_DB";

/// Optional ClickHouse user name.
pub const EVENT_FANOUT_CLICKHOUSE_USER_ENV: &str = "EVENT_FANOUT_CLICKHOUSE_USER";

/// Optional ClickHouse password.
pub const EVENT_FANOUT_CLICKHOUSE_PASSWORD_ENV: &str = "EVENT_FANOUT_CLICKHOUSE_PASSWORD";

/// Read an environment variable or fall back to a provided default.
pub fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}
