//! Document store abstraction – everything the copier, the deleter and the
//! CLI need from the underlying document database.

pub(crate) mod sqlite;
pub use sqlite::SqliteStore;

use chrono::{DateTime, Utc};

use crate::error::Result;
use crate::path::{CollectionPath, DocumentPath};
use crate::query::Query;

/// Field data of a document. Opaque to everything but the query engine.
pub type Fields = serde_json::Map<String, serde_json::Value>;

/// Lazily consumed listing of document references; one entry may fail
/// without ending the listing.
pub type DocumentRefs<'a> = Box<dyn Iterator<Item = Result<DocumentRef>> + 'a>;

/// Reference to a document that may or may not hold field data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentRef {
    pub path: DocumentPath,
}

impl DocumentRef {
    pub fn id(&self) -> &str {
        self.path.id()
    }
}

/// A stored document snapshot.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub path: DocumentPath,
    pub fields: Fields,
    pub create_time: DateTime<Utc>,
    pub update_time: DateTime<Utc>,
}

impl Document {
    pub fn id(&self) -> &str {
        self.path.id()
    }
}

pub trait DocumentStore {
    /// Every document id directly under `collection`, including ids that
    /// only exist as parents of sub-collections.
    fn list_document_refs(&self, collection: &CollectionPath) -> Result<DocumentRefs<'_>>;

    /// Names of the collections nested directly under `doc`, sorted.
    fn list_collections(&self, doc: &DocumentPath) -> Result<Vec<String>>;

    /// Documents holding data directly under `collection`, ordered by id.
    fn list_documents(
        &self,
        collection: &CollectionPath,
        limit: Option<usize>,
    ) -> Result<Vec<Document>>;

    /// Fetch a document; `Error::NotFound` when it holds no data.
    fn get_document(&self, doc: &DocumentPath) -> Result<Document>;

    /// Upsert – overwrite whatever is stored at `doc`.
    fn set_document(&self, doc: &DocumentPath, fields: &Fields) -> Result<()>;

    /// Insert a new document; `Error::AlreadyExists` when one is present.
    fn create_document(&self, doc: &DocumentPath, fields: &Fields) -> Result<()>;

    /// Remove a document's data. Its sub-collections are left alone.
    fn delete_document(&self, doc: &DocumentPath) -> Result<()>;

    /// Apply a set of deletions; one result per input path, in order.
    fn delete_batch(&self, docs: &[DocumentPath]) -> Vec<Result<()>> {
        docs.iter().map(|d| self.delete_document(d)).collect()
    }

    /// Run a filtered / sorted query over one collection.
    fn query(&self, query: &Query) -> Result<Vec<Document>> {
        let docs = self.list_documents(query.collection(), None)?;
        Ok(query.apply(docs))
    }
}
