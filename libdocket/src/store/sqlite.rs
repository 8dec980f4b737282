//! SQLite-backed document store – connection bootstrap, migrations and
//! the `DocumentStore` implementation.
//!
//! Only documents that hold data get a row. Sub-collections and
//! "missing" parent documents are derived from path prefixes.

use std::collections::BTreeSet;
use std::path::Path;

use anyhow::Context;
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, ErrorCode, OptionalExtension, TransactionBehavior};
use tracing::{debug, info, warn};

use super::{Document, DocumentRef, DocumentRefs, DocumentStore, Fields};
use crate::error::{Error, Result};
use crate::path::{CollectionPath, DocumentPath};

/* ─── schema version ───────────────────────────────────────────────── */

/// Current store schema version.
pub const SCHEMA_VERSION: i32 = MIGRATIONS.len() as i32;

/* ─── embedded migrations ─────────────────────────────────────────── */

const MIGRATIONS: &[(&str, &str)] = &[(
    "0001_create_documents.sql",
    include_str!("migrations/0001_create_documents.sql"),
)];

pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Open (or create) the store at `db_path` and run pending migrations.
    /// `":memory:"` gives a throw-away store.
    pub fn open<P: AsRef<Path>>(db_path: P) -> anyhow::Result<Self> {
        let db_path_ref = db_path.as_ref();
        let mut conn = Connection::open(db_path_ref)
            .with_context(|| format!("failed to open DB at {}", db_path_ref.display()))?;

        conn.pragma_update(None, "journal_mode", "WAL")?;

        // Wait up to 30 s for a competing writer before giving up
        conn.busy_timeout(std::time::Duration::from_secs(30))?;

        apply_migrations(&mut conn)?;
        Ok(Self { conn })
    }

    /// Borrow the underlying SQLite connection.
    pub fn conn(&self) -> &Connection {
        &self.conn
    }

    /// Highest migration recorded in `schema_version`.
    pub fn schema_version(&self) -> anyhow::Result<i32> {
        current_schema_version(&self.conn)
    }

    /// Paths of every stored document whose path starts with `prefix`.
    fn paths_under(&self, prefix: &str) -> Result<Vec<rusqlite::Result<String>>> {
        let (lower, upper) = prefix_range(prefix);
        let mut stmt = self.conn.prepare(PATHS_UNDER_SQL)?;
        let rows = stmt
            .query_map(params![lower, upper], |r| r.get::<_, String>(0))?
            .collect();
        Ok(rows)
    }
}

/// Range scan over the `path` primary key.
pub(crate) const PATHS_UNDER_SQL: &str =
    "SELECT path FROM documents WHERE path >= ?1 AND path < ?2 ORDER BY path";

/// Half-open bounds `[prefix, upper)` covering every path that starts with
/// `prefix`, which must end in `/`. `0` is the byte right after `/`.
pub(crate) fn prefix_range(prefix: &str) -> (String, String) {
    let stem = prefix.strip_suffix('/').unwrap_or(prefix);
    (prefix.to_owned(), format!("{stem}0"))
}

/* ─── migration runner ────────────────────────────────────────────── */

fn current_schema_version(conn: &Connection) -> anyhow::Result<i32> {
    let version: i32 = conn.query_row(
        "SELECT IFNULL(MAX(version), 0) FROM schema_version",
        [],
        |r| r.get(0),
    )?;
    Ok(version)
}

fn apply_migrations(conn: &mut Connection) -> anyhow::Result<()> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS schema_version (
             version     INTEGER PRIMARY KEY,
             applied_on  TEXT NOT NULL
         );",
    )?;

    // Grab the write-lock up-front so migrations can run uninterrupted
    let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

    for (fname, sql) in MIGRATIONS {
        let version: i64 = fname
            .split('_')
            .next()
            .and_then(|s| s.parse().ok())
            .with_context(|| format!("migration file name has no version: {fname}"))?;

        let already: Option<i64> = tx
            .query_row(
                "SELECT version FROM schema_version WHERE version = ?1",
                [version],
                |r| r.get(0),
            )
            .optional()?;

        if already.is_some() {
            debug!("migration {} already applied", fname);
            continue;
        }

        info!("applying migration {}", fname);
        tx.execute_batch(sql)
            .with_context(|| format!("could not apply migration {}", fname))?;

        tx.execute(
            "INSERT INTO schema_version (version, applied_on) VALUES (?1, ?2)",
            params![version, Utc::now().to_rfc3339()],
        )?;
    }

    tx.commit()?;

    let current = current_schema_version(conn)?;
    if current != SCHEMA_VERSION {
        warn!(current, expected = SCHEMA_VERSION, "schema version mismatch");
        anyhow::bail!(
            "database schema version {} does not match library version {}",
            current,
            SCHEMA_VERSION
        );
    }

    Ok(())
}

/* ─── row helpers ─────────────────────────────────────────────────── */

fn parse_time(raw: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|t| t.with_timezone(&Utc))
        .map_err(|e| Error::Serialization(format!("bad timestamp {raw:?}: {e}")))
}

fn decode_document(path: &str, data: &str, created: &str, updated: &str) -> Result<Document> {
    Ok(Document {
        path: DocumentPath::parse(path)?,
        fields: serde_json::from_str::<Fields>(data)?,
        create_time: parse_time(created)?,
        update_time: parse_time(updated)?,
    })
}

type RawRow = (String, String, String, String);

fn raw_row(r: &rusqlite::Row<'_>) -> rusqlite::Result<RawRow> {
    Ok((r.get(0)?, r.get(1)?, r.get(2)?, r.get(3)?))
}

/* ─── DocumentStore impl ─────────────────────────────────────────── */

impl DocumentStore for SqliteStore {
    fn list_document_refs(&self, collection: &CollectionPath) -> Result<DocumentRefs<'_>> {
        let prefix = format!("{collection}/");
        let mut ids = BTreeSet::new();
        let mut errors = Vec::new();

        for row in self.paths_under(&prefix)? {
            match row {
                Ok(path) => match path[prefix.len()..].split('/').next() {
                    Some(id) if !id.is_empty() => {
                        ids.insert(id.to_owned());
                    }
                    _ => errors.push(Error::InvalidPath(format!(
                        "invalid document reference: {path}"
                    ))),
                },
                Err(e) => errors.push(Error::from(e)),
            }
        }

        debug!(collection = %collection, count = ids.len(), "listed document refs");
        let collection = collection.clone();
        let refs = ids
            .into_iter()
            .map(move |id| {
                Ok::<_, Error>(DocumentRef {
                    path: collection.doc(&id),
                })
            })
            .chain(errors.into_iter().map(Err));
        Ok(Box::new(refs))
    }

    fn list_collections(&self, doc: &DocumentPath) -> Result<Vec<String>> {
        let prefix = format!("{doc}/");
        let mut names = BTreeSet::new();
        for row in self.paths_under(&prefix)? {
            let path = row?;
            if let Some(name) = path[prefix.len()..].split('/').next() {
                if !name.is_empty() {
                    names.insert(name.to_owned());
                }
            }
        }
        Ok(names.into_iter().collect())
    }

    fn list_documents(
        &self,
        collection: &CollectionPath,
        limit: Option<usize>,
    ) -> Result<Vec<Document>> {
        // SQLite treats a negative LIMIT as "no limit"
        let limit = limit.map(|n| n as i64).unwrap_or(-1);
        let mut stmt = self.conn.prepare(
            "SELECT path, data, create_time, update_time
               FROM documents
              WHERE collection = ?1
              ORDER BY id
              LIMIT ?2",
        )?;
        let rows = stmt
            .query_map(params![collection.to_string(), limit], raw_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        rows.iter()
            .map(|(p, d, c, u)| decode_document(p, d, c, u))
            .collect()
    }

    fn get_document(&self, doc: &DocumentPath) -> Result<Document> {
        let row = self
            .conn
            .query_row(
                "SELECT path, data, create_time, update_time FROM documents WHERE path = ?1",
                [doc.to_string()],
                raw_row,
            )
            .optional()?;

        match row {
            Some((p, d, c, u)) => decode_document(&p, &d, &c, &u),
            None => Err(Error::NotFound(doc.to_string())),
        }
    }

    fn set_document(&self, doc: &DocumentPath, fields: &Fields) -> Result<()> {
        let data = serde_json::to_string(fields)?;
        let now = Utc::now().to_rfc3339();
        self.conn.execute(
            r#"
            INSERT INTO documents(path, collection, id, data, create_time, update_time)
            VALUES (?1, ?2, ?3, ?4, ?5, ?5)
            ON CONFLICT(path) DO UPDATE
               SET data = excluded.data,
                   update_time = excluded.update_time
            "#,
            params![doc.to_string(), doc.parent().to_string(), doc.id(), data, now],
        )?;
        Ok(())
    }

    fn create_document(&self, doc: &DocumentPath, fields: &Fields) -> Result<()> {
        let data = serde_json::to_string(fields)?;
        let now = Utc::now().to_rfc3339();
        let inserted = self.conn.execute(
            "INSERT INTO documents(path, collection, id, data, create_time, update_time)
             VALUES (?1, ?2, ?3, ?4, ?5, ?5)",
            params![doc.to_string(), doc.parent().to_string(), doc.id(), data, now],
        );
        match inserted {
            Ok(_) => Ok(()),
            Err(rusqlite::Error::SqliteFailure(e, _))
                if e.code == ErrorCode::ConstraintViolation =>
            {
                Err(Error::AlreadyExists(doc.to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }

    fn delete_document(&self, doc: &DocumentPath) -> Result<()> {
        self.conn
            .execute("DELETE FROM documents WHERE path = ?1", [doc.to_string()])?;
        Ok(())
    }

    fn delete_batch(&self, docs: &[DocumentPath]) -> Vec<Result<()>> {
        let all_failed = |e: rusqlite::Error| {
            let msg = e.to_string();
            docs.iter()
                .map(|_| Err(Error::Database(msg.clone())))
                .collect::<Vec<_>>()
        };

        let tx = match self.conn.unchecked_transaction() {
            Ok(tx) => tx,
            Err(e) => return all_failed(e),
        };

        let results: Vec<Result<()>> = docs
            .iter()
            .map(|d| {
                tx.execute("DELETE FROM documents WHERE path = ?1", [d.to_string()])
                    .map(|_| ())
                    .map_err(Error::from)
            })
            .collect();

        match tx.commit() {
            Ok(()) => results,
            Err(e) => all_failed(e),
        }
    }
}
