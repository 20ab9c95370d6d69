//! Document value model.

use firestore_field_path::FieldPathSegment;
use indexmap::IndexMap;
use serde_json::{Number, Value as JsonValue};

use crate::geo_point::GeoPoint;
use crate::reference::DocumentReference;
use crate::timestamp::Timestamp;
use crate::wire::normalize_f64;

/// Field name to value mapping. Keeps insertion order for readable output.
pub type Record = IndexMap<String, Value>;

/// A document field value.
///
/// `Array` and `Record` are containers; every other variant is a leaf,
/// including the three special kinds.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    Number(Number),
    String(String),
    Array(Vec<Value>),
    Record(Record),
    Reference(DocumentReference),
    GeoPoint(GeoPoint),
    Timestamp(Timestamp),
}

impl Value {
    /// Plain JSON to value. Objects become records as-is; nothing is
    /// interpreted as a special value.
    pub fn from_json(json: JsonValue) -> Self {
        match json {
            JsonValue::Null => Value::Null,
            JsonValue::Bool(b) => Value::Bool(b),
            JsonValue::Number(n) => Value::Number(n),
            JsonValue::String(s) => Value::String(s),
            JsonValue::Array(items) => {
                Value::Array(items.into_iter().map(Value::from_json).collect())
            }
            JsonValue::Object(map) => Value::Record(
                map.into_iter()
                    .map(|(k, v)| (k, Value::from_json(v)))
                    .collect(),
            ),
        }
    }

    pub fn kind_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "boolean",
            Value::Number(_) => "number",
            Value::String(_) => "string",
            Value::Array(_) => "array",
            Value::Record(_) => "record",
            Value::Reference(_) => "reference",
            Value::GeoPoint(_) => "geopoint",
            Value::Timestamp(_) => "timestamp",
        }
    }

    pub fn is_container(&self) -> bool {
        matches!(self, Value::Array(_) | Value::Record(_))
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Number(n) => n.as_f64(),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Number(n) => n.as_i64(),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Value::Array(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_record(&self) -> Option<&Record> {
        match self {
            Value::Record(record) => Some(record),
            _ => None,
        }
    }

    pub fn as_reference(&self) -> Option<&DocumentReference> {
        match self {
            Value::Reference(reference) => Some(reference),
            _ => None,
        }
    }

    pub fn as_geo_point(&self) -> Option<&GeoPoint> {
        match self {
            Value::GeoPoint(point) => Some(point),
            _ => None,
        }
    }

    pub fn as_timestamp(&self) -> Option<&Timestamp> {
        match self {
            Value::Timestamp(ts) => Some(ts),
            _ => None,
        }
    }

    /// Follows `path` through records and arrays. A key segment that is a
    /// decimal number also indexes into an array.
    pub fn get_path(&self, path: &[FieldPathSegment]) -> Option<&Value> {
        let mut current = self;
        for segment in path {
            current = match (current, segment) {
                (Value::Record(record), FieldPathSegment::Key(key)) => record.get(key)?,
                (Value::Array(items), FieldPathSegment::Index(index)) => items.get(*index)?,
                (Value::Array(items), FieldPathSegment::Key(key)) => {
                    items.get(key.parse::<usize>().ok()?)?
                }
                _ => return None,
            };
        }
        Some(current)
    }
}

/// Looks `path` up in a record.
pub(crate) fn record_get_path<'a>(
    record: &'a Record,
    path: &[FieldPathSegment],
) -> Option<&'a Value> {
    let (first, rest) = path.split_first()?;
    let FieldPathSegment::Key(key) = first else {
        return None;
    };
    record.get(key)?.get_path(rest)
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Value::Number(value.into())
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Number(value.into())
    }
}

impl From<u64> for Value {
    fn from(value: u64) -> Self {
        Value::Number(value.into())
    }
}

/// Integral floats are stored as integers; non-finite floats become `Null`.
impl From<f64> for Value {
    fn from(value: f64) -> Self {
        normalize_f64(value).map_or(Value::Null, Value::Number)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::String(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::String(value)
    }
}

impl From<Vec<Value>> for Value {
    fn from(value: Vec<Value>) -> Self {
        Value::Array(value)
    }
}

impl From<Record> for Value {
    fn from(value: Record) -> Self {
        Value::Record(value)
    }
}

impl From<DocumentReference> for Value {
    fn from(value: DocumentReference) -> Self {
        Value::Reference(value)
    }
}

impl From<GeoPoint> for Value {
    fn from(value: GeoPoint) -> Self {
        Value::GeoPoint(value)
    }
}

impl From<Timestamp> for Value {
    fn from(value: Timestamp) -> Self {
        Value::Timestamp(value)
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Value {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        Value::Record(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use firestore_field_path::parse_field_path;
    use serde_json::json;

    fn lookup<'a>(value: &'a Value, path: &str) -> Option<&'a Value> {
        value.get_path(&parse_field_path(path).unwrap())
    }

    #[test]
    fn from_json_keeps_integers() {
        let v = Value::from_json(json!({"n": 3, "f": 1.5}));
        let record = v.as_record().unwrap();
        assert_eq!(record["n"].as_i64(), Some(3));
        assert_eq!(record["f"].as_f64(), Some(1.5));
    }

    #[test]
    fn from_json_preserves_key_order() {
        let v = Value::from_json(json!({"z": 1, "a": 2, "m": 3}));
        let keys: Vec<_> = v.as_record().unwrap().keys().cloned().collect();
        assert_eq!(keys, vec!["z", "a", "m"]);
    }

    #[test]
    fn get_path_walks_records_and_arrays() {
        let v = Value::from_json(json!({"b": {"d": {"e": ["x", {"f": true}]}}}));
        assert_eq!(lookup(&v, "b.d.e[0]"), Some(&Value::from("x")));
        assert_eq!(lookup(&v, "b.d.e.1.f"), Some(&Value::Bool(true)));
        assert_eq!(lookup(&v, "b.d.e[2]"), None);
        assert_eq!(lookup(&v, "b.x"), None);
    }

    #[test]
    fn get_path_does_not_enter_special_values() {
        let v: Value = [("g", Value::from(GeoPoint::new(1.0, 2.0).unwrap()))]
            .into_iter()
            .collect();
        assert!(lookup(&v, "g").is_some());
        assert_eq!(lookup(&v, "g.latitude"), None);
    }

    #[test]
    fn non_finite_float_is_null() {
        assert_eq!(Value::from(f64::NAN), Value::Null);
        assert_eq!(Value::from(f64::INFINITY), Value::Null);
    }

    #[test]
    fn integral_float_is_stored_as_integer() {
        assert_eq!(Value::from(10.0), Value::from(10));
        assert_eq!(Value::from(-3.0).as_i64(), Some(-3));
        assert_eq!(Value::from(1.5).as_i64(), None);
        assert_eq!(Value::from(1.5).as_f64(), Some(1.5));
    }

    #[test]
    fn kind_names() {
        assert_eq!(Value::Null.kind_name(), "null");
        assert_eq!(Value::Array(vec![]).kind_name(), "array");
        assert!(Value::from(Record::new()).is_container());
        assert!(!Value::from(Timestamp::from_millis(0).unwrap()).is_container());
    }
}
