//! Shared fixture documents for the integration matrices.
#![allow(dead_code)]

use firestore_serializer::{
    Database, DatabaseId, DocumentSnapshot, GeoPoint, Record, Timestamp, Value,
};

pub const FIXTURE_IDS: [&str; 8] = [
    "simple",
    "timestamp",
    "geopoint",
    "geopoint-with-float",
    "geopoint-with-negative-float",
    "document-reference",
    "multiple",
    "nested",
];

pub fn db() -> Database {
    Database::new(DatabaseId::with_default_database("fixtures"))
}

pub fn instant() -> Timestamp {
    Timestamp::parse_iso8601("2020-04-19T15:17:33.856Z").expect("fixture timestamp")
}

pub fn geo(latitude: f64, longitude: f64) -> Value {
    Value::GeoPoint(GeoPoint::new(latitude, longitude).expect("fixture geopoint"))
}

pub fn reference(path: &str) -> Value {
    Value::Reference(db().doc(path).expect("fixture reference"))
}

pub fn record(fields: Vec<(&str, Value)>) -> Record {
    fields
        .into_iter()
        .map(|(k, v)| (k.to_string(), v))
        .collect()
}

/// Every fixture also stores its own id as the `id` field.
pub fn fixture(id: &str) -> DocumentSnapshot {
    let rest = match id {
        "simple" => vec![("a", Value::from("b"))],
        "timestamp" => vec![("a", Value::Timestamp(instant()))],
        "geopoint" => vec![("a", geo(10.0, 10.0))],
        "geopoint-with-float" => vec![("a", geo(2.3294, 34.224))],
        "geopoint-with-negative-float" => vec![("a", geo(2.314, -32.443))],
        "document-reference" => vec![("a", reference("documents/simple"))],
        "multiple" => vec![
            ("a", Value::from("b")),
            ("b", Value::Timestamp(instant())),
            ("c", geo(4.3234, -2.234)),
            ("d", reference("documents/simple")),
        ],
        "nested" => vec![
            ("a", Value::from("b")),
            (
                "b",
                Value::Record(record(vec![
                    ("c", Value::Timestamp(instant())),
                    (
                        "d",
                        Value::Record(record(vec![(
                            "e",
                            Value::Array(vec![geo(3.43, -3.445), reference("documents/simple")]),
                        )])),
                    ),
                ])),
            ),
        ],
        other => panic!("unknown fixture {other}"),
    };
    let mut fields = vec![("id", Value::from(id))];
    fields.extend(rest);
    let path = format!("documents/{id}");
    DocumentSnapshot::new(db().doc(&path).expect("fixture path"), record(fields))
}

pub fn all_fixtures() -> Vec<DocumentSnapshot> {
    FIXTURE_IDS.iter().map(|id| fixture(id)).collect()
}
