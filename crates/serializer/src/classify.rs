//! Special-value classification.
//!
//! Inside the codec special values are explicit [`Value`] variants, so live
//! classification is a single match. JSON-shaped objects exported by client
//! SDKs go through [`from_live_json`], which recognizes special values by the
//! fields they expose.

use serde_json::{Map, Value as JsonValue};

use crate::geo_point::GeoPoint;
use crate::reference::DocumentReference;
use crate::timestamp::Timestamp;
use crate::value::Value;
use crate::wire::{split_legacy, SpecialType, SERIALIZER_KEY, SPECIAL_MARKER};

/// Classification of a wire value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WireKind {
    /// `{"__fsSerializer__": "special", ...}`
    Tagged,
    /// A string with one of the legacy prefixes.
    Legacy(SpecialType),
    Plain,
}

/// Kind of a live special value, `None` for plain data.
pub fn classify_live(value: &Value) -> Option<SpecialType> {
    match value {
        Value::Reference(_) => Some(SpecialType::DocumentReference),
        Value::GeoPoint(_) => Some(SpecialType::GeoPoint),
        Value::Timestamp(_) => Some(SpecialType::Timestamp),
        _ => None,
    }
}

/// `true` for a tagged special-value object.
pub fn is_tagged(value: &JsonValue) -> bool {
    match value {
        JsonValue::Object(map) => is_tagged_map(map),
        _ => false,
    }
}

pub(crate) fn is_tagged_map(map: &Map<String, JsonValue>) -> bool {
    map.get(SERIALIZER_KEY).and_then(JsonValue::as_str) == Some(SPECIAL_MARKER)
}

/// Classifies a wire value. The tagged check always runs first; legacy
/// strings are only recognized when `backwards_compatibility` is set.
pub fn classify_serialized(value: &JsonValue, backwards_compatibility: bool) -> WireKind {
    match value {
        JsonValue::Object(map) if is_tagged_map(map) => WireKind::Tagged,
        JsonValue::String(s) if backwards_compatibility => match split_legacy(s) {
            Some((kind, _)) => WireKind::Legacy(kind),
            None => WireKind::Plain,
        },
        _ => WireKind::Plain,
    }
}

/// Converts an SDK object graph into a [`Value`] tree.
///
/// Objects are checked in a fixed order:
/// 1. reference: has `id`, `parent`, a string `path`, and `type == "document"`;
/// 2. geopoint: has numeric `latitude` and `longitude` in range;
/// 3. timestamp: has integral `seconds` and `nanoseconds` in range.
///
/// Anything else becomes a plain record.
pub fn from_live_json(json: JsonValue) -> Value {
    match json {
        JsonValue::Object(map) => match live_special(&map) {
            Some(special) => special,
            None => Value::Record(
                map.into_iter()
                    .map(|(k, v)| (k, from_live_json(v)))
                    .collect(),
            ),
        },
        JsonValue::Array(items) => Value::Array(items.into_iter().map(from_live_json).collect()),
        scalar => Value::from_json(scalar),
    }
}

fn live_special(map: &Map<String, JsonValue>) -> Option<Value> {
    if let Some(reference) = live_reference(map) {
        return Some(Value::Reference(reference));
    }
    if let Some(point) = live_geo_point(map) {
        return Some(Value::GeoPoint(point));
    }
    live_timestamp(map).map(Value::Timestamp)
}

fn live_reference(map: &Map<String, JsonValue>) -> Option<DocumentReference> {
    if !(map.contains_key("id") && map.contains_key("parent")) {
        return None;
    }
    if map.get("type").and_then(JsonValue::as_str) != Some("document") {
        return None;
    }
    let path = map.get("path")?.as_str()?;
    Some(DocumentReference::detached(path))
}

fn live_geo_point(map: &Map<String, JsonValue>) -> Option<GeoPoint> {
    let latitude = map.get("latitude")?.as_f64()?;
    let longitude = map.get("longitude")?.as_f64()?;
    GeoPoint::new(latitude, longitude).ok()
}

fn live_timestamp(map: &Map<String, JsonValue>) -> Option<Timestamp> {
    let seconds = map.get("seconds")?.as_i64()?;
    let nanoseconds = i32::try_from(map.get("nanoseconds")?.as_i64()?).ok()?;
    Timestamp::new(seconds, nanoseconds).ok()
}
