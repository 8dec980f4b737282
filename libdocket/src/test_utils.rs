use std::cell::{Cell, RefCell};
use std::collections::HashSet;
use std::sync::Mutex;

use lazy_static::lazy_static;
use serde_json::Value;

use crate::error::{Error, Result};
use crate::path::{CollectionPath, DocumentPath};
use crate::query::Query;
use crate::store::{Document, DocumentRefs, DocumentStore, Fields, SqliteStore};

lazy_static! {
    /// Global mutex to serialize environment-variable modifications in tests.
    pub static ref ENV_MUTEX: Mutex<()> = Mutex::new(());
}

/// In-memory store with migrations applied.
pub fn open_mem() -> SqliteStore {
    SqliteStore::open(":memory:").expect("open in-memory store")
}

pub fn doc(raw: &str) -> DocumentPath {
    DocumentPath::parse(raw).unwrap()
}

pub fn coll(raw: &str) -> CollectionPath {
    CollectionPath::parse(raw).unwrap()
}

pub fn fields(v: Value) -> Fields {
    v.as_object().cloned().expect("test fields must be an object")
}

/// Store `v` at `path`.
pub fn put(store: &impl DocumentStore, path: &str, v: Value) {
    store.set_document(&doc(path), &fields(v)).unwrap();
}

/// Every stored document path, sorted.
pub fn all_paths(store: &SqliteStore) -> Vec<String> {
    let mut stmt = store
        .conn()
        .prepare("SELECT path FROM documents ORDER BY path")
        .unwrap();
    let rows = stmt
        .query_map([], |r| r.get::<_, String>(0))
        .unwrap()
        .collect::<std::result::Result<Vec<_>, _>>()
        .unwrap();
    rows
}

/// Wraps a [`SqliteStore`] and fails selected calls on demand.
pub struct FaultyStore {
    pub inner: SqliteStore,
    /// Document paths whose writes are denied.
    pub deny_writes: RefCell<HashSet<String>>,
    /// Document paths whose reads fail with something other than NotFound.
    pub deny_reads: RefCell<HashSet<String>>,
    /// Document paths whose deletes fail.
    pub deny_deletes: RefCell<HashSet<String>>,
    /// Collections whose reference listing yields one broken entry.
    pub broken_listing: RefCell<HashSet<String>>,
    /// Number of `list_documents` calls seen.
    pub list_calls: Cell<usize>,
    /// Number of `delete_batch` calls seen.
    pub batch_calls: Cell<usize>,
}

impl FaultyStore {
    pub fn new() -> Self {
        Self {
            inner: open_mem(),
            deny_writes: RefCell::default(),
            deny_reads: RefCell::default(),
            deny_deletes: RefCell::default(),
            broken_listing: RefCell::default(),
            list_calls: Cell::new(0),
            batch_calls: Cell::new(0),
        }
    }
}

fn denied(path: &DocumentPath) -> Error {
    Error::Other(format!("permission denied: {path}"))
}

impl DocumentStore for FaultyStore {
    fn list_document_refs(&self, collection: &CollectionPath) -> Result<DocumentRefs<'_>> {
        let refs = self.inner.list_document_refs(collection)?;
        if self.broken_listing.borrow().contains(&collection.to_string()) {
            let broken = Error::Database("corrupt reference".into());
            return Ok(Box::new(std::iter::once(Err(broken)).chain(refs)));
        }
        Ok(refs)
    }

    fn list_collections(&self, doc: &DocumentPath) -> Result<Vec<String>> {
        self.inner.list_collections(doc)
    }

    fn list_documents(
        &self,
        collection: &CollectionPath,
        limit: Option<usize>,
    ) -> Result<Vec<Document>> {
        self.list_calls.set(self.list_calls.get() + 1);
        self.inner.list_documents(collection, limit)
    }

    fn get_document(&self, doc: &DocumentPath) -> Result<Document> {
        if self.deny_reads.borrow().contains(&doc.to_string()) {
            return Err(denied(doc));
        }
        self.inner.get_document(doc)
    }

    fn set_document(&self, doc: &DocumentPath, fields: &Fields) -> Result<()> {
        if self.deny_writes.borrow().contains(&doc.to_string()) {
            return Err(denied(doc));
        }
        self.inner.set_document(doc, fields)
    }

    fn create_document(&self, doc: &DocumentPath, fields: &Fields) -> Result<()> {
        if self.deny_writes.borrow().contains(&doc.to_string()) {
            return Err(denied(doc));
        }
        self.inner.create_document(doc, fields)
    }

    fn delete_document(&self, doc: &DocumentPath) -> Result<()> {
        if self.deny_deletes.borrow().contains(&doc.to_string()) {
            return Err(denied(doc));
        }
        self.inner.delete_document(doc)
    }

    fn delete_batch(&self, docs: &[DocumentPath]) -> Vec<Result<()>> {
        self.batch_calls.set(self.batch_calls.get() + 1);
        docs.iter().map(|d| self.delete_document(d)).collect()
    }

    fn query(&self, query: &Query) -> Result<Vec<Document>> {
        self.inner.query(query)
    }
}
