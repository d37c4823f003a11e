use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Log levels supported by every logger in the fan-out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogType {
    Info,
    Warn,
    Error,
    Debug,
}

impl LogType {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogType::Info => "info",
            LogType::Warn => "warn",
            LogType::Error => "error",
            LogType::Debug => "debug",
        }
    }
}

/// One structured, timestamped event awaiting persistence.
///
/// A record is a single flat JSON object. The reserved fields `timestamp`,
/// `action`, `message`, `log_type` and `app` are always present once a
/// record has been through [`RecordBuilder::build`]; everything else is
/// caller-supplied.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LogRecord {
    fields: Map<String, Value>,
}

impl LogRecord {
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    pub fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }

    pub(crate) fn fields_mut(&mut self) -> &mut Map<String, Value> {
        &mut self.fields
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl From<Map<String, Value>> for LogRecord {
    fn from(fields: Map<String, Value>) -> Self {
        LogRecord { fields }
    }
}

/// Builds storage-ready [`LogRecord`]s for one application.
///
/// **Parameters to [`build`](RecordBuilder::build)**
/// - `log_type`: level the record is emitted at.
/// - `action`: string identifier of the event.
/// - `message`: free-form string or structured description.
/// - `extra`: arbitrary caller-supplied fields, merged into the record.
///
/// The timestamp is stamped at build time, not at flush or dispatch time,
/// so batching never reorders event times. Caller-supplied keys that
/// collide with the reserved fields are overwritten; reserved keys win.
#[derive(Debug, Clone)]
pub struct RecordBuilder {
    app: String,
}

impl RecordBuilder {
    pub fn new(app: impl Into<String>) -> Self {
        RecordBuilder { app: app.into() }
    }

    pub fn app(&self) -> &str {
        &self.app
    }

    pub fn build(
        &self,
        log_type: LogType,
        action: &str,
        message: impl Into<Value>,
        extra: Map<String, Value>,
    ) -> LogRecord {
        let timestamp = Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true);

        let mut fields = extra;
        fields.insert("timestamp".to_string(), Value::String(timestamp));
        fields.insert("action".to_string(), Value::String(action.to_string()));
        fields.insert("message".to_string(), message.into());
        fields.insert(
            "log_type".to_string(),
            Value::String(log_type.as_str().to_string()),
        );
        fields.insert("app".to_string(), Value::String(self.app.clone()));

        LogRecord { fields }
    }
}
