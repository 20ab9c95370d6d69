//! JSON text to snapshots.

use serde_json::{Map, Value as JsonValue};
use tracing::{debug, trace};

use crate::classify::{classify_serialized, WireKind};
use crate::error::{Result, SerializerError};
use crate::map_deep::try_map_entries;
use crate::options::DeserializeOptions;
use crate::reference::DocumentStore;
use crate::snapshot::DocumentSnapshot;
use crate::value::{Record, Value};
use crate::wire::{from_legacy, from_tagged, split_legacy, ID_KEY, PATH_KEY};

/// Rebuilds snapshots against a store handle.
///
/// ```
/// use firestore_serializer::{Database, DatabaseId, Deserializer};
///
/// let db = Database::new(DatabaseId::with_default_database("demo"));
/// let snap = Deserializer::new(&db)
///     .backwards_compatibility(true)
///     .document(r#"{"__id__":"a","__path__":"c/a","at":"__GeoPoint__1###2"}"#)
///     .unwrap();
/// assert_eq!(snap.get("at").and_then(|v| v.as_geo_point()).unwrap().longitude(), 2.0);
/// ```
#[derive(Debug)]
pub struct Deserializer<'s, S: ?Sized> {
    store: &'s S,
    options: DeserializeOptions,
}

impl<'s, S: DocumentStore + ?Sized> Deserializer<'s, S> {
    pub fn new(store: &'s S) -> Self {
        Self::with_options(store, DeserializeOptions::default())
    }

    pub fn with_options(store: &'s S, options: DeserializeOptions) -> Self {
        Self { store, options }
    }

    pub fn backwards_compatibility(mut self, enabled: bool) -> Self {
        self.options.backwards_compatibility = enabled;
        self
    }

    pub fn options(&self) -> &DeserializeOptions {
        &self.options
    }

    /// Parses one serialized document.
    pub fn document(&self, text: &str) -> Result<DocumentSnapshot> {
        match parse(text)? {
            JsonValue::Object(raw) => self.objectify(raw),
            other => Err(unexpected("object", &other)),
        }
    }

    /// Parses a serialized query result. Every element becomes one snapshot,
    /// in order.
    pub fn documents(&self, text: &str) -> Result<Vec<DocumentSnapshot>> {
        let items = match parse(text)? {
            JsonValue::Array(items) => items,
            other => return Err(unexpected("array", &other)),
        };
        let docs = items
            .into_iter()
            .map(|item| match item {
                JsonValue::Object(raw) => self.objectify(raw),
                other => Err(unexpected("object", &other)),
            })
            .collect::<Result<Vec<_>>>()?;
        debug!(count = docs.len(), "deserialize query");
        Ok(docs)
    }

    /// Live value for one wire leaf. Tagged objects are checked first; legacy
    /// strings only when backwards compatibility is on; anything else is kept.
    pub fn unstringify_special(&self, item: &JsonValue) -> Result<Value> {
        match classify_serialized(item, self.options.backwards_compatibility) {
            WireKind::Tagged => {
                let Some(map) = item.as_object() else {
                    return Err(unexpected("object", item));
                };
                let value = from_tagged(map, self.store)?;
                trace!(kind = value.kind_name(), "unstringify tagged value");
                Ok(value)
            }
            WireKind::Legacy(kind) => {
                let payload = item.as_str().and_then(split_legacy).map_or("", |(_, p)| p);
                trace!(%kind, "unstringify legacy value");
                from_legacy(kind, payload, self.store)
            }
            WireKind::Plain => {
                if let Some((kind, _)) = item.as_str().and_then(split_legacy) {
                    debug!(%kind, "legacy prefix kept as plain text");
                }
                Ok(Value::from_json(item.clone()))
            }
        }
    }

    fn objectify(&self, raw: Map<String, JsonValue>) -> Result<DocumentSnapshot> {
        let id = identity_text(raw.get(ID_KEY));
        let path = identity_text(raw.get(PATH_KEY));
        let entries = raw
            .iter()
            .filter(|(key, _)| key.as_str() != ID_KEY && key.as_str() != PATH_KEY);
        let data: Record = try_map_entries(entries, &mut |leaf: &JsonValue| {
            self.unstringify_special(leaf)
        })?
        .into_iter()
        .collect();
        let reference = self.store.resolve_reference(&path)?;
        debug!(id = %id, path = %path, fields = data.len(), "deserialize document");
        Ok(DocumentSnapshot::reconstructed(id, reference, data))
    }
}

fn parse(text: &str) -> Result<JsonValue> {
    serde_json::from_str(text).map_err(SerializerError::Malformed)
}

/// Missing or null identity becomes an empty string; other scalars are
/// rendered as JSON text.
fn identity_text(value: Option<&JsonValue>) -> String {
    match value {
        None | Some(JsonValue::Null) => String::new(),
        Some(JsonValue::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

fn json_kind(value: &JsonValue) -> &'static str {
    match value {
        JsonValue::Null => "null",
        JsonValue::Bool(_) => "boolean",
        JsonValue::Number(_) => "number",
        JsonValue::String(_) => "string",
        JsonValue::Array(_) => "array",
        JsonValue::Object(_) => "object",
    }
}

fn unexpected(expected: &'static str, found: &JsonValue) -> SerializerError {
    SerializerError::UnexpectedShape {
        expected,
        found: json_kind(found),
    }
}

pub fn deserialize_document_snapshot<S>(
    text: &str,
    store: &S,
    options: &DeserializeOptions,
) -> Result<DocumentSnapshot>
where
    S: DocumentStore + ?Sized,
{
    Deserializer::with_options(store, options.clone()).document(text)
}

pub fn deserialize_document_snapshot_array<S>(
    text: &str,
    store: &S,
    options: &DeserializeOptions,
) -> Result<Vec<DocumentSnapshot>>
where
    S: DocumentStore + ?Sized,
{
    Deserializer::with_options(store, options.clone()).documents(text)
}
