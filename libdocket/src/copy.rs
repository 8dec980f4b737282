//! Recursive collection copy.
//!
//! Every document under the source collection is copied to the same id
//! under the destination, and every sub-collection of every document is
//! copied the same way, depth-first. A failing document never stops the
//! walk: each failure is recorded and the whole list comes back as one
//! [`CopyError`] once the collection has been processed.
//!
//! Sub-collections are copied *before* the document body and regardless of
//! whether the body exists. A document may be nothing but a parent for its
//! sub-collections; reading such a document yields `NotFound`, which is not
//! a failure here.

use std::fmt;

use tracing::{debug, info, warn};

use crate::document;
use crate::error::Error;
use crate::path::CollectionPath;
use crate::store::DocumentStore;

/// Which step of the copy failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CopyAction {
    /// Listing a collection, or one entry of it, failed.
    Reading,
    /// Reading or writing a document body failed.
    Copy,
    /// The recursive copy of a sub-collection reported failures.
    SubcollectionCopy,
}

impl fmt::Display for CopyAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Reading => "reading",
            Self::Copy => "copy",
            Self::SubcollectionCopy => "subcollection-copy",
        })
    }
}

#[derive(Debug)]
pub enum FailureCause {
    Store(Error),
    /// Full manifest of a failed sub-collection copy.
    Nested(CopyError),
}

impl fmt::Display for FailureCause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Store(e) => write!(f, "{e}"),
            Self::Nested(e) => write!(f, "{} failure(s)", e.failures.len()),
        }
    }
}

/// One failed step of a collection copy.
#[derive(Debug)]
pub struct CopyFailure {
    pub source: String,
    pub destination: String,
    pub action: CopyAction,
    pub cause: FailureCause,
}

impl CopyFailure {
    fn store(
        source: impl fmt::Display,
        destination: impl fmt::Display,
        action: CopyAction,
        error: Error,
    ) -> Self {
        let failure = Self {
            source: source.to_string(),
            destination: destination.to_string(),
            action,
            cause: FailureCause::Store(error),
        };
        warn!(
            action = %failure.action,
            source = %failure.source,
            destination = %failure.destination,
            error = %failure.cause,
            "copy step failed"
        );
        failure
    }
}

/// Aggregate error of one collection copy: every failure recorded at that
/// level, in the order they happened.
#[derive(Debug)]
pub struct CopyError {
    pub failures: Vec<CopyFailure>,
}

impl CopyError {
    /// Failures at every nesting level, not counting the
    /// `subcollection-copy` wrappers themselves.
    pub fn leaf_count(&self) -> usize {
        self.failures
            .iter()
            .map(|f| match &f.cause {
                FailureCause::Store(_) => 1,
                FailureCause::Nested(inner) => inner.leaf_count(),
            })
            .sum()
    }

    fn render(&self, f: &mut fmt::Formatter<'_>, depth: usize) -> fmt::Result {
        let indent = "  ".repeat(depth + 1);
        for failure in &self.failures {
            match &failure.cause {
                FailureCause::Store(e) => writeln!(
                    f,
                    "{indent}- {} {} -> {}: {e}",
                    failure.action, failure.source, failure.destination
                )?,
                FailureCause::Nested(inner) => {
                    writeln!(
                        f,
                        "{indent}- {} {} -> {}:",
                        failure.action, failure.source, failure.destination
                    )?;
                    inner.render(f, depth + 1)?;
                }
            }
        }
        Ok(())
    }
}

impl fmt::Display for CopyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "the following errors occurred:")?;
        self.render(f, 0)
    }
}

impl std::error::Error for CopyError {}

/// What a successful copy touched.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct CopyReport {
    /// Document bodies written.
    pub documents: usize,
    /// Collections walked, the top-level one included.
    pub collections: usize,
}

/// Copy every document (and, recursively, every sub-collection) of `src`
/// into `dst`.
pub fn copy_collection<S: DocumentStore + ?Sized>(
    store: &S,
    src: &CollectionPath,
    dst: &CollectionPath,
) -> Result<CopyReport, CopyError> {
    let mut report = CopyReport::default();
    copy_level(store, src, dst, &mut report)?;
    info!(
        source = %src,
        destination = %dst,
        documents = report.documents,
        collections = report.collections,
        "collection copied"
    );
    Ok(report)
}

fn copy_level<S: DocumentStore + ?Sized>(
    store: &S,
    src: &CollectionPath,
    dst: &CollectionPath,
    report: &mut CopyReport,
) -> Result<(), CopyError> {
    report.collections += 1;
    let mut failures = Vec::new();

    let refs = match store.list_document_refs(src) {
        Ok(refs) => refs,
        Err(e) => {
            failures.push(CopyFailure::store(src, dst, CopyAction::Reading, e));
            return Err(CopyError { failures });
        }
    };

    for entry in refs {
        let doc_ref = match entry {
            Ok(r) => r,
            Err(e) => {
                failures.push(CopyFailure::store(src, dst, CopyAction::Reading, e));
                continue;
            }
        };
        let src_doc = doc_ref.path;
        let dst_doc = dst.doc(src_doc.id());
        debug!(source = %src_doc, destination = %dst_doc, "copying document");

        // sub-collections first, whether or not the document has a body
        match store.list_collections(&src_doc) {
            Ok(names) => {
                for name in names {
                    let src_sub = src_doc.collection(&name);
                    let dst_sub = dst_doc.collection(&name);
                    if let Err(nested) = copy_level(store, &src_sub, &dst_sub, report) {
                        warn!(
                            source = %src_sub,
                            destination = %dst_sub,
                            failures = nested.failures.len(),
                            "sub-collection copy incomplete"
                        );
                        failures.push(CopyFailure {
                            source: src_sub.to_string(),
                            destination: dst_sub.to_string(),
                            action: CopyAction::SubcollectionCopy,
                            cause: FailureCause::Nested(nested),
                        });
                    }
                }
            }
            Err(e) => {
                failures.push(CopyFailure::store(&src_doc, &dst_doc, CopyAction::Reading, e));
            }
        }

        match document::copy_document(store, &src_doc, &dst_doc) {
            Ok(()) => report.documents += 1,
            Err(e) if e.is_not_found() => {
                debug!(source = %src_doc, "no document body, sub-collections only");
            }
            Err(e) => {
                failures.push(CopyFailure::store(&src_doc, &dst_doc, CopyAction::Copy, e));
            }
        }
    }

    if failures.is_empty() {
        Ok(())
    } else {
        Err(CopyError { failures })
    }
}
