//! docket CLI entry-point
//!
//! All document-store work lives in the `libdocket` crate; this file
//! handles argument parsing, logging, store resolution and dispatch.

mod cli; // sub-command definitions and argument structs

use anyhow::Result;
use clap::{CommandFactory, Parser};
use clap_complete::generate;
use libdocket::{logging, Docket};
use std::{env, io};
use tracing::debug;

use cli::{Cli, Commands};

fn main() -> Result<()> {
    /* ── CLI parsing & logging ────────────────────────────────── */
    let args = Cli::parse();
    if args.verbose {
        env::set_var("RUST_LOG", "debug");
    }
    logging::init();

    /* ── shell-completion shortcut ────────────────────────────── */
    if let Commands::Completions { shell } = &args.command {
        let mut cmd = Cli::command();
        generate(*shell, &mut cmd, "docket", &mut io::stdout());
        return Ok(());
    }

    /* ── resolve & open the store ─────────────────────────────── */
    let docket = Docket::open_default(args.project.as_deref())?;
    debug!(db = %docket.config().db_path.display(), "store opened");

    /* ── command dispatch ─────────────────────────────────────── */
    match &args.command {
        Commands::Completions { .. } => {} // handled above
        Commands::Document(cmd) => cli::document::run(cmd, &docket, args.format)?,
        Commands::Collection(cmd) => cli::collection::run(cmd, &docket, args.format)?,
    }

    Ok(())
}
