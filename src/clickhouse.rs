use crate::record::LogRecord;
use crate::store::{BatchStore, StoreError};
use async_trait::async_trait;
use reqwest::Client;
use urlencoding;

/// Configuration for [`ClickHouseStore`].
///
/// The store talks to ClickHouse over HTTP using the `JSONEachRow` format.
/// The target table is not part of this config; it arrives per write as the
/// pipeline's destination name.
#[derive(Clone, Debug)]
pub struct ClickHouseConfig {
    /// Base URL without query, e.g. "http://127.0.0.1:8123"
    pub url: String,
    pub database: String,
    pub user: Option<String>,
    pub password: Option<String>,
}

/// ClickHouse implementation of [`BatchStore`] using the HTTP interface.
///
/// `JSONEachRow` is line-delimited, so one sub-batch becomes one POST with
/// one JSON line per record, sized by the per-request item ceiling the
/// dispatch worker slices to.
#[derive(Clone)]
pub struct ClickHouseStore {
    client: Client,
    config: ClickHouseConfig,
}

impl ClickHouseStore {
    pub fn new(config: ClickHouseConfig) -> Self {
        let client = Client::new();
        Self { client, config }
    }

    fn endpoint(&self, table: &str) -> String {
        let mut query = format!(
            "database={}&query=INSERT%20INTO%20{}%20FORMAT%20JSONEachRow",
            self.config.database, table
        );

        if let Some(user) = &self.config.user {
            query.push_str(&format!("&user={}", urlencoding::encode(user)));
        }
        if let Some(password) = &self.config.password {
            query.push_str(&format!("&password={}", urlencoding::encode(password)));
        }

        format!("{}/?{}", self.config.url, query)
    }

    /// Check that the destination table exists and is describable. This is
    /// optional and is not called automatically.
    pub async fn validate_schema(&self, table: &str) -> Result<(), StoreError> {
        let mut query = format!(
            "query={}",
            urlencoding::encode(&format!(
                "DESCRIBE TABLE {}.{} FORMAT JSON",
                self.config.database, table
            ))
        );

        if let Some(user) = &self.config.user {
            query.push_str(&format!("&user={}", urlencoding::encode(user)));
        }
        if let Some(password) = &self.config.password {
            query.push_str(&format!("&password={}", urlencoding::encode(password)));
        }

        let url = format!("{}/?{}", self.config.url, query);
        let resp = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(StoreError::transport)?;
        if !resp.status().is_success() {
            return Err(StoreError::service(
                "clickhouse",
                format!("schema validation failed with status {}", resp.status()),
            ));
        }
        Ok(())
    }
}

#[async_trait]
impl BatchStore for ClickHouseStore {
    async fn write_batch(
        &self,
        destination: &str,
        records: &[LogRecord],
    ) -> Result<(), StoreError> {
        let mut body = String::new();
        for record in records {
            let line = serde_json::to_string(record)
                .map_err(StoreError::transport)?;
            body.push_str(&line);
            body.push('\n');
        }

        let resp = self
            .client
            .post(self.endpoint(destination))
            .body(body)
            .send()
            .await
            .map_err(StoreError::transport)?;

        if resp.status().is_success() {
            Ok(())
        } else {
            let status = resp.status();
            let text = resp.text().await.unwrap_or_else(|_| "<no body>".to_string());
            Err(StoreError::service(
                "clickhouse",
                format!("insert failed with status {status}: {text}"),
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store(user: Option<&str>, password: Option<&str>) -> ClickHouseStore {
        ClickHouseStore::new(ClickHouseConfig {
            url: "http://127.0.0.1:8123".to_string(),
            database: "telemetry".to_string(),
            user: user.map(str::to_string),
            password: password.map(str::to_string),
        })
    }

    #[test]
    fn endpoint_targets_the_destination_table() {
        let endpoint = store(None, None).endpoint("app_events");
        assert!(endpoint.starts_with("http://127.0.0.1:8123/?database=telemetry"));
        assert!(endpoint.contains("INSERT%20INTO%20app_events%20FORMAT%20JSONEachRow"));
    }

    #[test]
    fn credentials_are_urlencoded() {
        let endpoint = store(Some("writer"), Some("p@ss w0rd")).endpoint("app_events");
        assert!(endpoint.contains("&user=writer"));
        assert!(endpoint.contains("&password=p%40ss%20w0rd"));
    }
}
