// src/cli.rs
pub mod collection;
pub mod document;

use clap::{Parser, Subcommand, ValueEnum};
use clap_complete::Shell;

/// Output format for commands.
#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Format {
    #[default]
    Text,
    Json,
}

/// docket – manage documents and collections of a document database
#[derive(Parser, Debug)]
#[command(name = "docket", author, version, about)]
pub struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output format (default: text)
    #[arg(long, value_enum, default_value_t = Format::Text, global = true)]
    pub format: Format,

    /// Project whose database is used (overrides PROJECT_ID)
    #[arg(long, global = true)]
    pub project: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Perform actions on documents
    #[command(subcommand, visible_alias = "doc")]
    Document(document::DocumentCmd),

    /// Perform actions on collections
    #[command(subcommand, visible_alias = "col")]
    Collection(collection::CollectionCmd),

    /// Generate shell completions (hidden)
    #[command(hide = true)]
    Completions {
        /// Which shell to generate for
        #[arg(value_enum)]
        shell: Shell,
    },
}
