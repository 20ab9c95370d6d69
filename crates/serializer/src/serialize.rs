//! Snapshot to JSON text.

use serde_json::{Map, Value as JsonValue};
use tracing::{debug, trace};

use crate::classify::classify_live;
use crate::error::{Result, SerializerError};
use crate::map_deep::{map_deep, map_entries};
use crate::options::{SerializeOptions, WireEncoding};
use crate::snapshot::DocumentSnapshot;
use crate::value::Value;
use crate::wire::{to_legacy, to_tagged, ID_KEY, PATH_KEY};

/// Wire form of a leaf: tagged object for special values, plain JSON for
/// scalars. Containers are mapped recursively.
pub fn stringify_special(value: &Value) -> JsonValue {
    stringify_with(value, WireEncoding::Tagged)
}

fn stringify_with(value: &Value, encoding: WireEncoding) -> JsonValue {
    if let Some(kind) = classify_live(value) {
        trace!(%kind, ?encoding, "stringify special value");
        let encoded = match encoding {
            WireEncoding::Tagged => to_tagged(value),
            WireEncoding::Legacy => to_legacy(value).map(JsonValue::String),
        };
        return encoded.unwrap_or(JsonValue::Null);
    }
    match value {
        Value::Null => JsonValue::Null,
        Value::Bool(b) => JsonValue::Bool(*b),
        Value::Number(n) => JsonValue::Number(n.clone()),
        Value::String(s) => JsonValue::String(s.clone()),
        _ => map_deep(value, |leaf: &Value| stringify_with(leaf, encoding)),
    }
}

/// `{"__id__": ..., "__path__": ..., ...data}` with special values encoded.
pub(crate) fn stringify_document(
    snapshot: &DocumentSnapshot,
    encoding: WireEncoding,
) -> JsonValue {
    let mut out = Map::new();
    out.insert(ID_KEY.to_string(), JsonValue::from(snapshot.id()));
    out.insert(
        PATH_KEY.to_string(),
        JsonValue::from(snapshot.reference().path()),
    );
    let fields = map_entries(snapshot.data(), |leaf: &Value| stringify_with(leaf, encoding));
    debug!(
        id = snapshot.id(),
        path = snapshot.reference().path(),
        fields = fields.len(),
        "serialize document"
    );
    out.extend(fields);
    JsonValue::Object(out)
}

fn encode(value: &JsonValue, options: &SerializeOptions) -> Result<String> {
    let text = if options.pretty {
        serde_json::to_string_pretty(value)
    } else {
        serde_json::to_string(value)
    };
    text.map_err(SerializerError::Encode)
}

pub fn serialize_document_snapshot(snapshot: &DocumentSnapshot) -> Result<String> {
    serialize_document_snapshot_with(snapshot, &SerializeOptions::default())
}

pub fn serialize_document_snapshot_with(
    snapshot: &DocumentSnapshot,
    options: &SerializeOptions,
) -> Result<String> {
    encode(&stringify_document(snapshot, options.encoding), options)
}

/// Encodes the documents of a query as one JSON array, in order.
pub fn serialize_query_snapshot<'a>(
    docs: impl IntoIterator<Item = &'a DocumentSnapshot>,
) -> Result<String> {
    serialize_query_snapshot_with(docs, &SerializeOptions::default())
}

pub fn serialize_query_snapshot_with<'a>(
    docs: impl IntoIterator<Item = &'a DocumentSnapshot>,
    options: &SerializeOptions,
) -> Result<String> {
    let docs: Vec<JsonValue> = docs
        .into_iter()
        .map(|doc| stringify_document(doc, options.encoding))
        .collect();
    debug!(count = docs.len(), "serialize query");
    encode(&JsonValue::Array(docs), options)
}
