//! firestore-serializer - round-trip JSON codec for document snapshots.
//!
//! Document data may hold three kinds of values plain JSON cannot express:
//! [`DocumentReference`], [`GeoPoint`] and [`Timestamp`]. Serialization
//! rewrites them into tagged objects; deserialization turns them back into
//! live values, resolving references against a caller-supplied
//! [`DocumentStore`].
//!
//! ```
//! use firestore_serializer::{
//!     deserialize_document_snapshot, serialize_document_snapshot, Database, DatabaseId,
//!     DeserializeOptions, DocumentSnapshot, GeoPoint, Record, Value,
//! };
//!
//! let db = Database::new(DatabaseId::with_default_database("demo"));
//! let mut data = Record::new();
//! data.insert("home".into(), GeoPoint::new(4.3234, -2.234).unwrap().into());
//! let snap = DocumentSnapshot::new(db.doc("users/ada").unwrap(), data);
//!
//! let text = serialize_document_snapshot(&snap).unwrap();
//! let back = deserialize_document_snapshot(&text, &db, &DeserializeOptions::default()).unwrap();
//! assert_eq!(back.data(), snap.data());
//! assert_eq!(back.id(), "ada");
//! ```

mod classify;
mod deserialize;
mod error;
mod geo_point;
mod map_deep;
mod options;
mod reference;
mod serialize;
mod snapshot;
mod timestamp;
mod value;

pub mod wire;

pub use classify::{classify_live, classify_serialized, from_live_json, is_tagged, WireKind};
pub use deserialize::{
    deserialize_document_snapshot, deserialize_document_snapshot_array, Deserializer,
};
pub use error::{Result, SerializerError};
pub use geo_point::{GeoPoint, GeoPointError};
pub use map_deep::{map_deep, map_entries, try_map_deep, try_map_entries, Assemble, Descend, Node};
pub use options::{DeserializeOptions, SerializeOptions, WireEncoding};
pub use reference::{Database, DatabaseId, DocumentReference, DocumentStore, ReferenceError};
pub use serialize::{
    serialize_document_snapshot, serialize_document_snapshot_with, serialize_query_snapshot,
    serialize_query_snapshot_with, stringify_special,
};
pub use snapshot::{DocumentSnapshot, QuerySnapshot, SnapshotMetadata};
pub use timestamp::{Timestamp, TimestampError};
pub use value::{Record, Value};
pub use wire::SpecialType;

pub use firestore_field_path::{parse_field_path, FieldPathError, FieldPathSegment};
