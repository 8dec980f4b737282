//! libdocket – public API surface for the docket core.
//!
//! The `cli-bin` crate and the tests go through the [`Docket`] façade or
//! the helpers re-exported here. The copier, the deleter and the
//! document helpers are generic over [`store::DocumentStore`], so they run
//! against any backend; [`store::SqliteStore`] is the one shipped.

pub mod batch;
pub mod config;
pub mod copy;
pub mod delete;
pub mod document;
pub mod error;
pub mod logging;
pub mod path;
pub mod query;
pub mod store;

#[cfg(test)]
mod logging_tests;
#[cfg(test)]
mod test_utils;

use anyhow::{bail, Context, Result};
use std::path::Path;

pub use copy::{CopyAction, CopyError, CopyFailure, CopyReport};
pub use delete::{DeleteError, DeleteReport};
pub use path::{CollectionPath, DocumentPath};
pub use query::{Direction, Filter, Query};
pub use store::{Document, DocumentStore, Fields, SqliteStore};

/// Primary façade – resolve the database, then call helper methods with
/// raw (user supplied) paths.
pub struct Docket {
    cfg: config::Config,
    store: SqliteStore,
}

impl Docket {
    /// Resolve configuration from env / `--project` and open (or create)
    /// the store.
    pub fn open_default(project: Option<&str>) -> Result<Self> {
        let cfg = config::Config::load_for(project)?;
        let store = SqliteStore::open(&cfg.db_path)?;
        Ok(Self { cfg, store })
    }

    /// Open an explicit DB path – handy for tests or headless tools.
    pub fn open_at<P: AsRef<Path>>(path: P) -> Result<Self> {
        let cfg = config::Config {
            db_path: path.as_ref().to_path_buf(),
            project_id: None,
        };
        let store = SqliteStore::open(&cfg.db_path)?;
        Ok(Self { cfg, store })
    }

    pub fn config(&self) -> &config::Config {
        &self.cfg
    }

    /// Borrow the underlying store.
    pub fn store(&self) -> &SqliteStore {
        &self.store
    }

    /* ── documents ───────────────────────────────────────────────── */

    pub fn get(&self, path: &str) -> Result<Fields> {
        let path = DocumentPath::parse(path)?;
        match document::get_document(&self.store, &path) {
            Ok(fields) => Ok(fields),
            Err(e) if e.is_not_found() => bail!("document not found: {path}"),
            Err(e) => Err(e).with_context(|| format!("failed to read document {path}")),
        }
    }

    /// Create `path` from a JSON object.
    pub fn add(&self, path: &str, json: &str) -> Result<()> {
        let path = DocumentPath::parse(path)?;
        let fields = document::parse_fields(json).context("failed to parse JSON")?;
        document::add_document(&self.store, &path, &fields)
            .with_context(|| format!("failed to create document {path}"))?;
        Ok(())
    }

    pub fn copy_document(&self, src: &str, dst: &str) -> Result<()> {
        let src = DocumentPath::parse(src)?;
        let dst = DocumentPath::parse(dst)?;
        document::copy_document(&self.store, &src, &dst)
            .with_context(|| format!("failed to copy document {src} -> {dst}"))?;
        Ok(())
    }

    pub fn move_document(&self, src: &str, dst: &str) -> Result<()> {
        let src = DocumentPath::parse(src)?;
        let dst = DocumentPath::parse(dst)?;
        document::move_document(&self.store, &src, &dst)
            .with_context(|| format!("failed to move document {src} -> {dst}"))?;
        Ok(())
    }

    pub fn delete_document(&self, path: &str) -> Result<()> {
        let path = DocumentPath::parse(path)?;
        document::delete_document(&self.store, &path)
            .with_context(|| format!("failed to delete document {path}"))?;
        Ok(())
    }

    /* ── collections ─────────────────────────────────────────────── */

    /// Recursive copy; a partial failure comes back as a [`CopyError`]
    /// inside the `anyhow::Error`.
    pub fn copy_collection(&self, src: &str, dst: &str) -> Result<CopyReport> {
        let src = CollectionPath::parse(src)?;
        let dst = CollectionPath::parse(dst)?;
        if src.contains(&dst) {
            bail!("destination {dst} lies inside source {src}");
        }
        Ok(copy::copy_collection(&self.store, &src, &dst)?)
    }

    pub fn delete_collection(&self, path: &str) -> Result<DeleteReport> {
        let path = CollectionPath::parse(path)?;
        Ok(delete::delete_collection(&self.store, &path)?)
    }

    /// Ids of the documents holding data in `path`.
    pub fn list(&self, path: &str) -> Result<Vec<String>> {
        let path = CollectionPath::parse(path)?;
        let docs = self
            .store
            .list_documents(&path, None)
            .with_context(|| format!("failed to list {path}"))?;
        Ok(docs.iter().map(|d| d.id().to_owned()).collect())
    }

    pub fn query(&self, query: &Query) -> Result<Vec<Document>> {
        self.store
            .query(query)
            .with_context(|| format!("query on {} failed", query.collection()))
    }
}
