//! Document references and the store handle that resolves them.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::rc::Rc;
use std::sync::Arc;

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ReferenceError {
    #[error("document path `{path}` contains an empty segment")]
    EmptySegment { path: String },
}

/// Identifies one database of one project.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DatabaseId {
    pub project_id: String,
    pub database: String,
}

impl DatabaseId {
    pub const DEFAULT_DATABASE: &'static str = "(default)";

    pub fn new(project_id: impl Into<String>, database: impl Into<String>) -> Self {
        Self {
            project_id: project_id.into(),
            database: database.into(),
        }
    }

    pub fn with_default_database(project_id: impl Into<String>) -> Self {
        Self::new(project_id, Self::DEFAULT_DATABASE)
    }
}

impl fmt::Display for DatabaseId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "projects/{}/databases/{}", self.project_id, self.database)
    }
}

/// A named pointer to another document, carried by path.
///
/// Two references are equal when they address the same path. The database
/// handle that produced a reference is informational only.
#[derive(Debug, Clone)]
pub struct DocumentReference {
    database: Option<DatabaseId>,
    path: String,
}

impl PartialEq for DocumentReference {
    fn eq(&self, other: &Self) -> bool {
        self.path == other.path
    }
}

impl Eq for DocumentReference {}

impl Hash for DocumentReference {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.path.hash(state);
    }
}

impl DocumentReference {
    /// A reference not bound to any store handle.
    pub fn detached(path: impl Into<String>) -> Self {
        Self {
            database: None,
            path: path.into(),
        }
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    /// Last path segment.
    pub fn id(&self) -> &str {
        self.path.rsplit('/').next().unwrap_or("")
    }

    /// Path of the collection that contains this document.
    pub fn parent(&self) -> &str {
        self.path.rsplit_once('/').map(|(parent, _)| parent).unwrap_or("")
    }

    pub fn database(&self) -> Option<&DatabaseId> {
        self.database.as_ref()
    }
}

impl fmt::Display for DocumentReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.database {
            Some(db) => write!(f, "{db}/documents/{}", self.path),
            None => f.write_str(&self.path),
        }
    }
}

/// Capability to turn a document path into a reference. Resolution must be
/// cheap and free of I/O.
pub trait DocumentStore {
    fn resolve_reference(&self, path: &str) -> Result<DocumentReference, ReferenceError>;
}

impl<S: DocumentStore + ?Sized> DocumentStore for &S {
    fn resolve_reference(&self, path: &str) -> Result<DocumentReference, ReferenceError> {
        (**self).resolve_reference(path)
    }
}

impl<S: DocumentStore + ?Sized> DocumentStore for Box<S> {
    fn resolve_reference(&self, path: &str) -> Result<DocumentReference, ReferenceError> {
        (**self).resolve_reference(path)
    }
}

impl<S: DocumentStore + ?Sized> DocumentStore for Rc<S> {
    fn resolve_reference(&self, path: &str) -> Result<DocumentReference, ReferenceError> {
        (**self).resolve_reference(path)
    }
}

impl<S: DocumentStore + ?Sized> DocumentStore for Arc<S> {
    fn resolve_reference(&self, path: &str) -> Result<DocumentReference, ReferenceError> {
        (**self).resolve_reference(path)
    }
}

/// Local handle for one database. Produces references bound to its id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Database {
    id: DatabaseId,
}

impl Database {
    pub fn new(id: DatabaseId) -> Self {
        Self { id }
    }

    pub fn id(&self) -> &DatabaseId {
        &self.id
    }

    /// Shorthand for [`DocumentStore::resolve_reference`].
    pub fn doc(&self, path: &str) -> Result<DocumentReference, ReferenceError> {
        self.resolve_reference(path)
    }
}

impl DocumentStore for Database {
    fn resolve_reference(&self, path: &str) -> Result<DocumentReference, ReferenceError> {
        let normalized = path.trim_matches('/');
        if !normalized.is_empty() && normalized.split('/').any(str::is_empty) {
            return Err(ReferenceError::EmptySegment {
                path: path.to_string(),
            });
        }
        Ok(DocumentReference {
            database: Some(self.id.clone()),
            path: normalized.to_string(),
        })
    }
}
