//! Buffered deletions with caller-controlled flush boundaries.

use tracing::{debug, warn};

use crate::error::Error;
use crate::path::DocumentPath;
use crate::store::DocumentStore;

/// A staged deletion that the store refused.
#[derive(Debug)]
pub struct DeleteFailure {
    pub path: DocumentPath,
    pub error: Error,
}

/// Stages document deletions and applies them in batches.
///
/// Nothing reaches the store until [`flush`](Self::flush); a writer must be
/// closed with [`end`](Self::end), which flushes whatever is still pending.
pub struct BulkWriter<'s, S: DocumentStore + ?Sized> {
    store: &'s S,
    pending: Vec<DocumentPath>,
    applied: usize,
}

impl<'s, S: DocumentStore + ?Sized> BulkWriter<'s, S> {
    pub fn new(store: &'s S) -> Self {
        Self {
            store,
            pending: Vec::new(),
            applied: 0,
        }
    }

    /// Stage `path` for deletion.
    pub fn delete(&mut self, path: DocumentPath) {
        self.pending.push(path);
    }

    pub fn pending(&self) -> usize {
        self.pending.len()
    }

    /// Number of deletions applied successfully so far.
    pub fn applied(&self) -> usize {
        self.applied
    }

    /// Apply every staged deletion; returns the ones that failed.
    pub fn flush(&mut self) -> Vec<DeleteFailure> {
        if self.pending.is_empty() {
            return Vec::new();
        }
        let batch = std::mem::take(&mut self.pending);
        debug!(count = batch.len(), "flushing staged deletions");

        let results = self.store.delete_batch(&batch);
        let mut failures = Vec::new();
        for (path, result) in batch.into_iter().zip(results) {
            match result {
                Ok(()) => self.applied += 1,
                Err(error) => {
                    warn!(path = %path, error = %error, "staged delete failed");
                    failures.push(DeleteFailure { path, error });
                }
            }
        }
        failures
    }

    /// Flush the remainder and close the writer.
    pub fn end(mut self) -> Vec<DeleteFailure> {
        self.flush()
    }
}
