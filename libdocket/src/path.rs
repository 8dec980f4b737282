//! Hierarchical document / collection paths.
//!
//! A path alternates collection names and document ids:
//! `users` is a collection, `users/alice` a document,
//! `users/alice/posts` a sub-collection of that document and so on.
//! Leading slashes are ignored, every other segment must be non-empty.

use std::fmt;

use crate::error::{Error, Result};

fn split(raw: &str) -> Option<Vec<String>> {
    let trimmed = raw.trim_start_matches('/');
    if trimmed.is_empty() {
        return None;
    }
    let segments: Vec<String> = trimmed.split('/').map(str::to_owned).collect();
    if segments.iter().any(String::is_empty) {
        return None;
    }
    Some(segments)
}

/// Path naming a collection (odd number of segments).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CollectionPath {
    segments: Vec<String>,
}

/// Path naming a document (even number of segments).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DocumentPath {
    segments: Vec<String>,
}

impl CollectionPath {
    pub fn parse(raw: &str) -> Result<Self> {
        match split(raw) {
            Some(segments) if segments.len() % 2 == 1 => Ok(Self { segments }),
            _ => Err(Error::InvalidPath(format!(
                "invalid path for collection: {raw}"
            ))),
        }
    }

    /// Collection id – the last segment.
    pub fn id(&self) -> &str {
        self.segments.last().map(String::as_str).unwrap_or_default()
    }

    /// Document `id` inside this collection.
    pub fn doc(&self, id: &str) -> DocumentPath {
        let mut segments = self.segments.clone();
        segments.push(id.to_owned());
        DocumentPath { segments }
    }

    /// The document holding this collection, `None` for root collections.
    pub fn parent(&self) -> Option<DocumentPath> {
        if self.segments.len() < 3 {
            return None;
        }
        Some(DocumentPath {
            segments: self.segments[..self.segments.len() - 1].to_vec(),
        })
    }

    /// `true` if `other` is this collection or lives somewhere below it.
    pub fn contains(&self, other: &CollectionPath) -> bool {
        other.segments.len() >= self.segments.len()
            && other.segments[..self.segments.len()] == self.segments[..]
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }
}

impl DocumentPath {
    pub fn parse(raw: &str) -> Result<Self> {
        match split(raw) {
            Some(segments) if segments.len() % 2 == 0 => Ok(Self { segments }),
            _ => Err(Error::InvalidPath(format!("invalid path for document: {raw}"))),
        }
    }

    /// Document id – the last segment.
    pub fn id(&self) -> &str {
        self.segments.last().map(String::as_str).unwrap_or_default()
    }

    /// Sub-collection `name` of this document.
    pub fn collection(&self, name: &str) -> CollectionPath {
        let mut segments = self.segments.clone();
        segments.push(name.to_owned());
        CollectionPath { segments }
    }

    /// The collection this document belongs to.
    pub fn parent(&self) -> CollectionPath {
        CollectionPath {
            segments: self.segments[..self.segments.len() - 1].to_vec(),
        }
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }
}

impl fmt::Display for CollectionPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.segments.join("/"))
    }
}

impl fmt::Display for DocumentPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.segments.join("/"))
    }
}
