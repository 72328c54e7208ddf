//! Command-line arguments.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

#[derive(Debug, Parser)]
#[command(name = "tablekit", version, about = "Inspect filter registries and derive table queries")]
pub struct Cli {
    /// Raise log verbosity (-v debug, -vv trace). RUST_LOG overrides.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Print the filter definitions of a table.
    Filters(FiltersArgs),
    /// Replay UI changes on a table and print the resulting query.
    Query(QueryArgs),
}

#[derive(Debug, Args)]
pub struct FiltersArgs {
    /// Registry file (.yaml, .yml or .json).
    #[arg(long)]
    pub registry: PathBuf,

    /// Table id.
    #[arg(long)]
    pub table: String,
}

#[derive(Debug, Args)]
pub struct QueryArgs {
    /// Registry file (.yaml, .yml or .json).
    #[arg(long)]
    pub registry: PathBuf,

    /// Table id.
    #[arg(long)]
    pub table: String,

    /// Table options file (YAML or JSON). --table still wins.
    #[arg(long)]
    pub options: Option<PathBuf>,

    /// Quick filter as column=value, column=op:value or column=from|to.
    /// Repeat a column to select several values.
    #[arg(long = "filter", value_name = "COLUMN=VALUE")]
    pub filters: Vec<String>,

    /// Search text.
    #[arg(long)]
    pub search: Option<String>,

    /// Page to show.
    #[arg(long)]
    pub page: Option<u32>,

    /// Rows per page.
    #[arg(long)]
    pub page_size: Option<u32>,

    /// Sort as field or field:asc|desc.
    #[arg(long)]
    pub sort: Option<String>,

    /// Columns users may sort on.
    #[arg(long, value_delimiter = ',')]
    pub whitelist: Option<Vec<String>>,

    /// Saved view file (JSON) to apply first.
    #[arg(long)]
    pub view: Option<PathBuf>,

    /// Output format.
    #[arg(long, value_enum, default_value_t = OutputFormat::Json)]
    pub format: OutputFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Pretty-printed query JSON.
    Json,
    /// One name=value line per query-string pair.
    Pairs,
}
