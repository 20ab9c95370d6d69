//! Wire representations of special values.
//!
//! Current scheme, a tagged object:
//!
//! ```json
//! {"__fsSerializer__": "special", "type": 1, "latitude": 4.3234, "longitude": -2.234}
//! ```
//!
//! Legacy scheme, a prefixed string: `__GeoPoint__4.3234###-2.234`.

use std::fmt;

use serde_json::{Map, Number, Value as JsonValue};

use crate::error::{Result, SerializerError};
use crate::geo_point::GeoPoint;
use crate::reference::DocumentStore;
use crate::timestamp::Timestamp;
use crate::value::Value;

pub const SERIALIZER_KEY: &str = "__fsSerializer__";
pub const SPECIAL_MARKER: &str = "special";
pub const TYPE_KEY: &str = "type";
pub const ID_KEY: &str = "__id__";
pub const PATH_KEY: &str = "__path__";

const GEO_POINT_SEPARATOR: &str = "###";

/// Kind discriminator written as `type`. Ordinals are part of the wire format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum SpecialType {
    DocumentReference = 0,
    GeoPoint = 1,
    Timestamp = 2,
}

impl SpecialType {
    pub const ALL: [SpecialType; 3] = [
        SpecialType::DocumentReference,
        SpecialType::GeoPoint,
        SpecialType::Timestamp,
    ];

    pub fn ordinal(self) -> u8 {
        self as u8
    }

    pub fn from_ordinal(ordinal: u64) -> Option<Self> {
        match ordinal {
            0 => Some(SpecialType::DocumentReference),
            1 => Some(SpecialType::GeoPoint),
            2 => Some(SpecialType::Timestamp),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            SpecialType::DocumentReference => "DocumentReference",
            SpecialType::GeoPoint => "GeoPoint",
            SpecialType::Timestamp => "Timestamp",
        }
    }

    pub fn legacy_prefix(self) -> &'static str {
        match self {
            SpecialType::DocumentReference => "__DocumentReference__",
            SpecialType::GeoPoint => "__GeoPoint__",
            SpecialType::Timestamp => "__Timestamp__",
        }
    }
}

impl fmt::Display for SpecialType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Splits a legacy string into its kind and payload.
pub fn split_legacy(s: &str) -> Option<(SpecialType, &str)> {
    SpecialType::ALL
        .iter()
        .find_map(|kind| s.strip_prefix(kind.legacy_prefix()).map(|rest| (*kind, rest)))
}

/// Integral values become integer numbers so they print without a fraction,
/// like `JSON.stringify`. `None` for NaN and infinities.
pub(crate) fn normalize_f64(n: f64) -> Option<Number> {
    const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_991.0;
    if n.fract() == 0.0 && n.abs() <= MAX_SAFE_INTEGER {
        return Some(Number::from(n as i64));
    }
    Number::from_f64(n)
}

fn number_from_f64(n: f64) -> JsonValue {
    normalize_f64(n).map_or(JsonValue::Null, JsonValue::Number)
}

fn tag(kind: SpecialType) -> Map<String, JsonValue> {
    let mut map = Map::new();
    map.insert(SERIALIZER_KEY.to_string(), JsonValue::from(SPECIAL_MARKER));
    map.insert(TYPE_KEY.to_string(), JsonValue::from(kind.ordinal()));
    map
}

/// Tagged-object form of a special value; `None` for anything else.
pub fn to_tagged(value: &Value) -> Option<JsonValue> {
    let map = match value {
        Value::Reference(reference) => {
            let mut map = tag(SpecialType::DocumentReference);
            map.insert("path".to_string(), JsonValue::from(reference.path()));
            map
        }
        Value::GeoPoint(point) => {
            let mut map = tag(SpecialType::GeoPoint);
            map.insert("latitude".to_string(), number_from_f64(point.latitude()));
            map.insert("longitude".to_string(), number_from_f64(point.longitude()));
            map
        }
        Value::Timestamp(ts) => {
            let mut map = tag(SpecialType::Timestamp);
            map.insert("iso8601".to_string(), JsonValue::from(ts.to_iso8601()));
            map
        }
        _ => return None,
    };
    Some(JsonValue::Object(map))
}

/// Legacy string form of a special value; `None` for anything else.
pub fn to_legacy(value: &Value) -> Option<String> {
    let encoded = match value {
        Value::Reference(reference) => format!(
            "{}{}",
            SpecialType::DocumentReference.legacy_prefix(),
            reference.path()
        ),
        Value::GeoPoint(point) => format!(
            "{}{}{}{}",
            SpecialType::GeoPoint.legacy_prefix(),
            point.latitude(),
            GEO_POINT_SEPARATOR,
            point.longitude()
        ),
        Value::Timestamp(ts) => format!(
            "{}{}",
            SpecialType::Timestamp.legacy_prefix(),
            ts.to_iso8601()
        ),
        _ => return None,
    };
    Some(encoded)
}

fn invalid(kind: SpecialType, reason: impl Into<String>) -> SerializerError {
    SerializerError::InvalidSpecial {
        kind,
        reason: reason.into(),
    }
}

fn string_field<'a>(
    map: &'a Map<String, JsonValue>,
    kind: SpecialType,
    key: &str,
) -> Result<&'a str> {
    map.get(key)
        .and_then(JsonValue::as_str)
        .ok_or_else(|| invalid(kind, format!("missing string `{key}`")))
}

fn number_field(map: &Map<String, JsonValue>, kind: SpecialType, key: &str) -> Result<f64> {
    map.get(key)
        .and_then(JsonValue::as_f64)
        .ok_or_else(|| invalid(kind, format!("missing number `{key}`")))
}

/// Rebuilds a live value from a tagged object.
pub fn from_tagged<S>(map: &Map<String, JsonValue>, store: &S) -> Result<Value>
where
    S: DocumentStore + ?Sized,
{
    let kind = map
        .get(TYPE_KEY)
        .and_then(JsonValue::as_u64)
        .and_then(SpecialType::from_ordinal)
        .ok_or_else(|| {
            SerializerError::UnknownSpecialType(map.get(TYPE_KEY).cloned().unwrap_or_default())
        })?;
    let value = match kind {
        SpecialType::DocumentReference => {
            let path = string_field(map, kind, "path")?;
            Value::Reference(store.resolve_reference(path)?)
        }
        SpecialType::GeoPoint => {
            let latitude = number_field(map, kind, "latitude")?;
            let longitude = number_field(map, kind, "longitude")?;
            Value::GeoPoint(GeoPoint::new(latitude, longitude)?)
        }
        SpecialType::Timestamp => {
            let iso = string_field(map, kind, "iso8601")?;
            Value::Timestamp(Timestamp::parse_iso8601(iso)?)
        }
    };
    Ok(value)
}

/// Rebuilds a live value from a legacy payload (the text after the prefix).
pub fn from_legacy<S>(kind: SpecialType, payload: &str, store: &S) -> Result<Value>
where
    S: DocumentStore + ?Sized,
{
    let value = match kind {
        SpecialType::DocumentReference => Value::Reference(store.resolve_reference(payload)?),
        SpecialType::GeoPoint => {
            let (lat, lon) = payload
                .split_once(GEO_POINT_SEPARATOR)
                .ok_or_else(|| invalid(kind, "missing `###` separator"))?;
            let parse = |raw: &str| {
                raw.trim()
                    .parse::<f64>()
                    .map_err(|_| invalid(kind, format!("`{raw}` is not a number")))
            };
            Value::GeoPoint(GeoPoint::new(parse(lat)?, parse(lon)?)?)
        }
        SpecialType::Timestamp => Value::Timestamp(Timestamp::parse_iso8601(payload)?),
    };
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reference::{Database, DatabaseId, DocumentReference};
    use serde_json::json;

    fn db() -> Database {
        Database::new(DatabaseId::with_default_database("wire"))
    }

    #[test]
    fn ordinals_are_stable() {
        assert_eq!(SpecialType::DocumentReference.ordinal(), 0);
        assert_eq!(SpecialType::GeoPoint.ordinal(), 1);
        assert_eq!(SpecialType::Timestamp.ordinal(), 2);
        assert_eq!(SpecialType::from_ordinal(3), None);
    }

    #[test]
    fn tagged_geo_point_shape() {
        let v = Value::GeoPoint(GeoPoint::new(4.3234, -2.234).unwrap());
        assert_eq!(
            serde_json::to_string(&to_tagged(&v).unwrap()).unwrap(),
            r#"{"__fsSerializer__":"special","type":1,"latitude":4.3234,"longitude":-2.234}"#
        );
    }

    #[test]
    fn integral_coordinates_have_no_fraction() {
        let v = Value::GeoPoint(GeoPoint::new(10.0, -0.0).unwrap());
        let tagged = to_tagged(&v).unwrap();
        assert_eq!(tagged["latitude"].to_string(), "10");
        assert_eq!(tagged["longitude"].to_string(), "0");
    }

    #[test]
    fn plain_values_have_no_wire_form() {
        assert_eq!(to_tagged(&Value::from("x")), None);
        assert_eq!(to_legacy(&Value::Null), None);
    }

    #[test]
    fn legacy_strings() {
        let geo = Value::GeoPoint(GeoPoint::new(2.314, -32.443).unwrap());
        assert_eq!(to_legacy(&geo).unwrap(), "__GeoPoint__2.314###-32.443");
        let reference = Value::Reference(DocumentReference::detached("documents/simple"));
        assert_eq!(
            to_legacy(&reference).unwrap(),
            "__DocumentReference__documents/simple"
        );
        let ts = Value::Timestamp(Timestamp::from_millis(0).unwrap());
        assert_eq!(
            to_legacy(&ts).unwrap(),
            "__Timestamp__1970-01-01T00:00:00.000Z"
        );
    }

    #[test]
    fn split_legacy_prefixes() {
        assert_eq!(
            split_legacy("__GeoPoint__1###2"),
            Some((SpecialType::GeoPoint, "1###2"))
        );
        assert_eq!(split_legacy("__Geo__1###2"), None);
        assert_eq!(split_legacy("plain"), None);
    }

    #[test]
    fn from_tagged_reference_resolves_against_store() {
        let map = json!({"__fsSerializer__": "special", "type": 0, "path": "documents/simple"});
        let value = from_tagged(map.as_object().unwrap(), &db()).unwrap();
        assert_eq!(value, Value::Reference(db().doc("documents/simple").unwrap()));
    }

    #[test]
    fn from_tagged_unknown_type() {
        let map = json!({"__fsSerializer__": "special", "type": 9});
        let err = from_tagged(map.as_object().unwrap(), &db()).unwrap_err();
        assert!(matches!(err, SerializerError::UnknownSpecialType(t) if t == json!(9)));
    }

    #[test]
    fn from_tagged_missing_field() {
        let map = json!({"__fsSerializer__": "special", "type": 1, "latitude": 1});
        let err = from_tagged(map.as_object().unwrap(), &db()).unwrap_err();
        assert_eq!(err.to_string(), "invalid GeoPoint value: missing number `longitude`");
    }

    #[test]
    fn from_legacy_geo_point() {
        let value = from_legacy(SpecialType::GeoPoint, "2.314###-32.443", &db()).unwrap();
        assert_eq!(value, Value::GeoPoint(GeoPoint::new(2.314, -32.443).unwrap()));
    }

    #[test]
    fn from_legacy_geo_point_errors() {
        assert!(from_legacy(SpecialType::GeoPoint, "2.314", &db()).is_err());
        assert!(from_legacy(SpecialType::GeoPoint, "a###1", &db()).is_err());
        assert!(matches!(
            from_legacy(SpecialType::GeoPoint, "91###1", &db()),
            Err(SerializerError::GeoPoint(_))
        ));
    }
}
