//! `docket collection …` – bulk actions on whole collections.

use anyhow::Result;
use clap::{Args, Subcommand};
use libdocket::{CollectionPath, Direction, Docket, Filter, Query};
use serde_json::json;

use crate::cli::Format;

#[derive(Subcommand, Debug)]
pub enum CollectionCmd {
    /// Copy every document of a collection, recursively
    ///
    /// Example:
    ///     docket collection cp /users /users_backup
    #[command(visible_alias = "cp")]
    Copy(CopyArgs),
    /// Delete every document in a collection
    #[command(visible_alias = "rm")]
    Delete(PathArgs),
    /// List the ids of the documents in a collection
    #[command(visible_alias = "ls")]
    List(PathArgs),
    /// Query a collection
    ///
    /// Example:
    ///     docket collection q /users -f "age>=21" -s age -d desc
    #[command(visible_alias = "q")]
    Query(QueryArgs),
}

#[derive(Args, Debug)]
pub struct PathArgs {
    /// Collection path, e.g. /users
    pub path: String,
}

#[derive(Args, Debug)]
pub struct CopyArgs {
    pub src: String,
    pub dst: String,
}

#[derive(Args, Debug)]
pub struct QueryArgs {
    /// Collection path, e.g. /users
    pub path: String,

    /// Field to sort by
    #[arg(short, long)]
    pub sort: Option<String>,

    /// Direction to sort by (asc|desc)
    #[arg(short, long, default_value = "asc")]
    pub direction: Direction,

    /// Filter to apply, e.g. `id==2` (repeatable)
    #[arg(short = 'f', long = "filter", visible_alias = "filters")]
    pub filters: Vec<Filter>,

    /// Return at most N documents
    #[arg(short, long)]
    pub limit: Option<usize>,
}

impl QueryArgs {
    fn to_query(&self) -> Result<Query> {
        let mut q = Query::new(CollectionPath::parse(&self.path)?);
        for f in &self.filters {
            q = q.filter(f.clone());
        }
        if let Some(field) = &self.sort {
            q = q.order_by(field.as_str(), self.direction);
        }
        if let Some(n) = self.limit {
            q = q.limit(n);
        }
        Ok(q)
    }
}

pub fn run(cmd: &CollectionCmd, docket: &Docket, fmt: Format) -> Result<()> {
    match cmd {
        /* ── collection cp ───────────────────────────────────────── */
        CollectionCmd::Copy(a) => {
            let report = docket.copy_collection(&a.src, &a.dst)?;
            match fmt {
                Format::Text => println!(
                    "Copied {} document(s) across {} collection(s): {} → {}",
                    report.documents, report.collections, a.src, a.dst
                ),
                Format::Json => println!(
                    "{}",
                    json!({
                        "source": a.src,
                        "destination": a.dst,
                        "documents": report.documents,
                        "collections": report.collections,
                    })
                ),
            }
        }

        /* ── collection rm ───────────────────────────────────────── */
        CollectionCmd::Delete(a) => {
            let report = docket.delete_collection(&a.path)?;
            match fmt {
                Format::Text => println!("Deleted {} document(s) from {}", report.deleted, a.path),
                Format::Json => println!(
                    "{}",
                    json!({"collection": a.path, "deleted": report.deleted, "pages": report.pages})
                ),
            }
        }

        /* ── collection ls ───────────────────────────────────────── */
        CollectionCmd::List(a) => {
            let ids = docket.list(&a.path)?;
            match fmt {
                Format::Text => {
                    for id in ids {
                        println!("{id}");
                    }
                }
                Format::Json => println!("{}", serde_json::to_string(&ids)?),
            }
        }

        /* ── collection q ────────────────────────────────────────── */
        CollectionCmd::Query(a) => {
            let docs = docket.query(&a.to_query()?)?;
            match fmt {
                Format::Text => {
                    let width = docs.iter().map(|d| d.id().len()).max().unwrap_or(0);
                    for d in &docs {
                        let data = serde_json::to_string(&d.fields)?;
                        println!("{:<width$} {}", d.id(), data);
                    }
                }
                Format::Json => {
                    let rows: Vec<_> = docs
                        .iter()
                        .map(|d| json!({"id": d.id(), "data": d.fields}))
                        .collect();
                    println!("{}", serde_json::to_string(&rows)?);
                }
            }
        }
    }
    Ok(())
}
