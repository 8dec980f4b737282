//! Empty a collection page by page through a [`BulkWriter`].

use std::fmt;

use tracing::{debug, info};

use crate::batch::{BulkWriter, DeleteFailure};
use crate::error::Error;
use crate::path::CollectionPath;
use crate::store::DocumentStore;

/// Documents fetched (and staged) per round trip.
pub const PAGE_SIZE: usize = 10;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct DeleteReport {
    /// Non-empty fetch-and-flush cycles.
    pub pages: usize,
    pub deleted: usize,
}

#[derive(Debug)]
pub enum DeleteError {
    /// Fetching a page failed; nothing after it was attempted.
    Listing(Error),
    /// Some staged deletions failed; the loop stopped after that page.
    Partial {
        report: DeleteReport,
        failures: Vec<DeleteFailure>,
    },
}

impl fmt::Display for DeleteError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Listing(e) => write!(f, "failed to list documents: {e}"),
            Self::Partial { report, failures } => {
                writeln!(
                    f,
                    "{} document(s) could not be deleted ({} deleted):",
                    failures.len(),
                    report.deleted
                )?;
                for failure in failures {
                    writeln!(f, "  - {}: {}", failure.path, failure.error)?;
                }
                Ok(())
            }
        }
    }
}

impl std::error::Error for DeleteError {}

/// Delete every document directly under `collection`.
///
/// Sub-collections of the deleted documents are not touched.
pub fn delete_collection<S: DocumentStore + ?Sized>(
    store: &S,
    collection: &CollectionPath,
) -> Result<DeleteReport, DeleteError> {
    let mut writer = BulkWriter::new(store);
    let mut report = DeleteReport::default();

    loop {
        let page = store
            .list_documents(collection, Some(PAGE_SIZE))
            .map_err(DeleteError::Listing)?;

        if page.is_empty() {
            break;
        }

        for doc in page {
            writer.delete(doc.path);
        }
        let staged = writer.pending();
        let failures = writer.flush();
        report.pages += 1;
        report.deleted += staged - failures.len();
        debug!(collection = %collection, page = report.pages, staged, "page flushed");

        // the failed documents would come back in the next page forever
        if !failures.is_empty() {
            return Err(DeleteError::Partial { report, failures });
        }
    }

    let failures = writer.end();
    if !failures.is_empty() {
        return Err(DeleteError::Partial { report, failures });
    }

    info!(collection = %collection, deleted = report.deleted, "collection emptied");
    Ok(report)
}
