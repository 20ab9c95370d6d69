//! Document and query snapshots.

use firestore_field_path::{parse_field_path, FieldPathSegment};
use serde::{Deserialize, Serialize};

use crate::reference::DocumentReference;
use crate::value::{record_get_path, Record, Value};

/// Provenance flags of a snapshot.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotMetadata {
    pub from_cache: bool,
    pub has_pending_writes: bool,
}

impl SnapshotMetadata {
    /// Metadata of every snapshot rebuilt from text.
    pub const RECONSTRUCTED: Self = Self {
        from_cache: true,
        has_pending_writes: false,
    };
}

/// Point-in-time view of one document.
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentSnapshot {
    id: String,
    reference: DocumentReference,
    data: Record,
    metadata: SnapshotMetadata,
    exists: bool,
}

impl DocumentSnapshot {
    /// Snapshot of an existing document, id taken from the reference.
    pub fn new(reference: DocumentReference, data: Record) -> Self {
        Self {
            id: reference.id().to_string(),
            reference,
            data,
            metadata: SnapshotMetadata::default(),
            exists: true,
        }
    }

    pub(crate) fn reconstructed(id: String, reference: DocumentReference, data: Record) -> Self {
        Self {
            id,
            reference,
            data,
            metadata: SnapshotMetadata::RECONSTRUCTED,
            exists: true,
        }
    }

    pub fn with_metadata(mut self, metadata: SnapshotMetadata) -> Self {
        self.metadata = metadata;
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn reference(&self) -> &DocumentReference {
        &self.reference
    }

    pub fn data(&self) -> &Record {
        &self.data
    }

    pub fn into_data(self) -> Record {
        self.data
    }

    /// Value at a dotted field path such as `b.d.e[0]`. `None` when nothing is
    /// there or the path does not parse.
    pub fn get(&self, field_path: &str) -> Option<&Value> {
        let path = parse_field_path(field_path).ok()?;
        self.get_path(&path)
    }

    pub fn get_path(&self, path: &[FieldPathSegment]) -> Option<&Value> {
        record_get_path(&self.data, path)
    }

    pub fn metadata(&self) -> SnapshotMetadata {
        self.metadata
    }

    pub fn exists(&self) -> bool {
        self.exists
    }
}

/// Ordered result of a query.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QuerySnapshot {
    docs: Vec<DocumentSnapshot>,
}

impl QuerySnapshot {
    pub fn new(docs: Vec<DocumentSnapshot>) -> Self {
        Self { docs }
    }

    pub fn docs(&self) -> &[DocumentSnapshot] {
        &self.docs
    }

    pub fn into_docs(self) -> Vec<DocumentSnapshot> {
        self.docs
    }

    pub fn len(&self) -> usize {
        self.docs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.docs.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, DocumentSnapshot> {
        self.docs.iter()
    }
}

impl From<Vec<DocumentSnapshot>> for QuerySnapshot {
    fn from(docs: Vec<DocumentSnapshot>) -> Self {
        Self::new(docs)
    }
}

impl<'a> IntoIterator for &'a QuerySnapshot {
    type Item = &'a DocumentSnapshot;
    type IntoIter = std::slice::Iter<'a, DocumentSnapshot>;

    fn into_iter(self) -> Self::IntoIter {
        self.docs.iter()
    }
}

impl IntoIterator for QuerySnapshot {
    type Item = DocumentSnapshot;
    type IntoIter = std::vec::IntoIter<DocumentSnapshot>;

    fn into_iter(self) -> Self::IntoIter {
        self.docs.into_iter()
    }
}
