//! Single-document operations: get, add, copy, move, delete.

use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::path::DocumentPath;
use crate::store::{DocumentStore, Fields};

/// Parse document data (as read from STDIN). Must be a JSON object.
pub fn parse_fields(input: &str) -> Result<Fields> {
    match serde_json::from_str::<serde_json::Value>(input)? {
        serde_json::Value::Object(map) => Ok(map),
        other => Err(Error::Serialization(format!(
            "document data must be a JSON object, got {}",
            match other {
                serde_json::Value::Null => "null",
                serde_json::Value::Bool(_) => "a boolean",
                serde_json::Value::Number(_) => "a number",
                serde_json::Value::String(_) => "a string",
                serde_json::Value::Array(_) => "an array",
                serde_json::Value::Object(_) => "an object",
            }
        ))),
    }
}

pub fn get_document<S: DocumentStore + ?Sized>(store: &S, path: &DocumentPath) -> Result<Fields> {
    Ok(store.get_document(path)?.fields)
}

/// Create a new document; refuses to overwrite an existing one.
pub fn add_document<S: DocumentStore + ?Sized>(
    store: &S,
    path: &DocumentPath,
    fields: &Fields,
) -> Result<()> {
    store.create_document(path, fields)?;
    info!(path = %path, "document created");
    Ok(())
}

/// Copy the field data of `src` to `dst`, overwriting `dst`.
///
/// A missing source comes back as `Error::NotFound` so callers can tell it
/// apart from a failed read or write.
pub fn copy_document<S: DocumentStore + ?Sized>(
    store: &S,
    src: &DocumentPath,
    dst: &DocumentPath,
) -> Result<()> {
    let snapshot = store.get_document(src)?;
    store.set_document(dst, &snapshot.fields)?;
    debug!(source = %src, destination = %dst, "document copied");
    Ok(())
}

/// Copy `src` to `dst`, then delete `src`.
pub fn move_document<S: DocumentStore + ?Sized>(
    store: &S,
    src: &DocumentPath,
    dst: &DocumentPath,
) -> Result<()> {
    copy_document(store, src, dst)?;
    store.delete_document(src)?;
    info!(source = %src, destination = %dst, "document moved");
    Ok(())
}

pub fn delete_document<S: DocumentStore + ?Sized>(store: &S, path: &DocumentPath) -> Result<()> {
    store.delete_document(path)?;
    info!(path = %path, "document deleted");
    Ok(())
}
