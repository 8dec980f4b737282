//! `docket document …` – single-document actions.

use std::io::{self, Read};

use anyhow::{Context, Result};
use clap::{Args, Subcommand};
use libdocket::Docket;
use serde_json::{json, Value};

use crate::cli::Format;

#[derive(Subcommand, Debug)]
pub enum DocumentCmd {
    /// Add a new document with contents (a JSON object) from STDIN
    ///
    /// Example:
    ///     docket document add /users/alice < alice.json
    Add(PathArgs),
    /// Print a document's contents as JSON
    Get(PathArgs),
    /// Copy a document from the source to the destination
    #[command(visible_alias = "cp")]
    Copy(PairArgs),
    /// Move a document, deleting the source
    #[command(visible_alias = "mv")]
    Move(PairArgs),
    /// Delete a document (its sub-collections are kept)
    #[command(visible_alias = "rm")]
    Delete(PathArgs),
}

#[derive(Args, Debug)]
pub struct PathArgs {
    /// Document path, e.g. /users/alice
    pub path: String,
}

#[derive(Args, Debug)]
pub struct PairArgs {
    pub src: String,
    pub dst: String,
}

pub fn run(cmd: &DocumentCmd, docket: &Docket, fmt: Format) -> Result<()> {
    match cmd {
        /* ── document add ────────────────────────────────────────── */
        DocumentCmd::Add(a) => {
            let mut input = String::new();
            io::stdin()
                .read_to_string(&mut input)
                .context("failed to read input")?;
            docket.add(&a.path, &input)?;
            report(fmt, format!("Created {}", a.path), json!({"created": a.path}));
        }

        /* ── document get ────────────────────────────────────────── */
        DocumentCmd::Get(a) => {
            let fields = docket.get(&a.path)?;
            println!(
                "{}",
                serde_json::to_string_pretty(&fields).context("failed to encode document")?
            );
        }

        /* ── document cp / mv ────────────────────────────────────── */
        DocumentCmd::Copy(a) => {
            docket.copy_document(&a.src, &a.dst)?;
            report(
                fmt,
                format!("Copied {} → {}", a.src, a.dst),
                json!({"copied": a.src, "to": a.dst}),
            );
        }
        DocumentCmd::Move(a) => {
            docket.move_document(&a.src, &a.dst)?;
            report(
                fmt,
                format!("Moved {} → {}", a.src, a.dst),
                json!({"moved": a.src, "to": a.dst}),
            );
        }

        /* ── document rm ─────────────────────────────────────────── */
        DocumentCmd::Delete(a) => {
            docket.delete_document(&a.path)?;
            report(fmt, format!("Deleted {}", a.path), json!({"deleted": a.path}));
        }
    }
    Ok(())
}

/// Print the outcome of a mutating command in the requested format.
fn report(fmt: Format, text: String, json: Value) {
    match fmt {
        Format::Text => println!("{text}"),
        Format::Json => println!("{json}"),
    }
}
