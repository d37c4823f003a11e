use crate::record::LogRecord;
use crate::store::{BatchStore, StoreError};
use async_trait::async_trait;
use reqwest::Client;

/// OpenSearch store that writes each sub-batch via the HTTP `_bulk` API.
/// The pipeline's destination name is used as the target index.
#[derive(Clone)]
pub struct OpenSearchStore {
    client: Client,
    /// Base URL of the OpenSearch cluster, e.g. "http://localhost:9200".
    base_url: String,
}

impl OpenSearchStore {
    pub fn new(base_url: String) -> Self {
        OpenSearchStore {
            client: Client::new(),
            base_url,
        }
    }

    fn bulk_body(&self, index: &str, records: &[LogRecord]) -> Result<String, StoreError> {
        let action = format!("{{\"index\":{{\"_index\":\"{index}\"}}}}\n");

        let mut body = String::new();
        for record in records {
            let doc = serde_json::to_string(record).map_err(StoreError::transport)?;
            body.push_str(&action);
            body.push_str(&doc);
            body.push('\n');
        }
        Ok(body)
    }
}

#[async_trait]
impl BatchStore for OpenSearchStore {
    async fn write_batch(
        &self,
        destination: &str,
        records: &[LogRecord],
    ) -> Result<(), StoreError> {
        let body = self.bulk_body(destination, records)?;

        let url = format!("{}/_bulk", self.base_url.trim_end_matches('/'));
        let resp = self
            .client
            .post(&url)
            .header("Content-Type", "application/x-ndjson")
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
                "opensearch",
                format!("bulk insert failed with status {status}: {text}"),
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Map};

    #[test]
    fn bulk_body_pairs_an_action_line_with_every_document() {
        let store = OpenSearchStore::new("http://localhost:9200".to_string());

        let records: Vec<LogRecord> = (0..3)
            .map(|n| {
                let mut fields = Map::new();
                fields.insert("seq".to_string(), json!(n));
                LogRecord::from(fields)
            })
            .collect();

        let body = store.bulk_body("app-events", &records).unwrap();
        let lines: Vec<_> = body.lines().collect();
        assert_eq!(lines.len(), 6);
        assert_eq!(lines[0], "{\"index\":{\"_index\":\"app-events\"}}");
        assert_eq!(lines[1], "{\"seq\":0}");
        assert_eq!(lines[4], "{\"index\":{\"_index\":\"app-events\"}}");
    }
}
