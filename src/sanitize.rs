use crate::record::LogRecord;
use serde_json::{Map, Value};

/// Strip values the storage backend cannot encode from a record, in place.
///
/// The backend rejects empty strings but has no problem with empty
/// collections, so only string-typed fields are eligible for removal:
/// - an empty-string field is removed, at any nesting depth;
/// - a nested object is cleaned recursively but kept even if it empties;
/// - arrays, numbers, booleans and null pass through untouched (array
///   elements are not descended into).
///
/// Idempotent: cleaning an already-clean record is a no-op.
pub fn clean_record(record: &mut LogRecord) {
    clean_fields(record.fields_mut());
}

pub(crate) fn clean_fields(fields: &mut Map<String, Value>) {
    fields.retain(|_, value| match value {
        Value::String(s) => !s.is_empty(),
        _ => true,
    });

    for value in fields.values_mut() {
        if let Value::Object(nested) = value {
            clean_fields(nested);
        }
    }
}
