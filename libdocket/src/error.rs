//! Error types for docket
//!
//! Every `DocumentStore` call reports failures through [`Error`]. The
//! variants matter to callers: the collection copier swallows
//! [`Error::NotFound`] on a document read, `document add` surfaces
//! [`Error::AlreadyExists`], and so on.

use std::fmt;
use std::io;

/// Result type for docket – convenience wrapper around Result<T, Error>
pub type Result<T> = std::result::Result<T, Error>;

/// Store-level error kinds
#[derive(Debug)]
pub enum Error {
    /// An IO error
    Io(io::Error),

    /// A database error
    Database(String),

    /// Document data could not be encoded or decoded
    Serialization(String),

    /// A path that does not name a document / collection
    InvalidPath(String),

    /// Document not found
    NotFound(String),

    /// Document already exists (create only)
    AlreadyExists(String),

    /// Other errors
    Other(String),
}

impl Error {
    /// `true` when the error only says the document is absent.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(err) => write!(f, "IO error: {}", err),
            Self::Database(msg) => write!(f, "Database error: {}", msg),
            Self::Serialization(msg) => write!(f, "Serialization error: {}", msg),
            Self::InvalidPath(msg) => write!(f, "{}", msg),
            Self::NotFound(path) => write!(f, "document not found: {}", path),
            Self::AlreadyExists(path) => write!(f, "document already exists: {}", path),
            Self::Other(msg) => write!(f, "{}", msg),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<io::Error> for Error {
    fn from(err: io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<rusqlite::Error> for Error {
    fn from(err: rusqlite::Error) -> Self {
        Self::Database(err.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}
