//! `query` command arguments

pub mod handler;

use clap::{Args, ValueEnum};
use std::path::PathBuf;

#[derive(Args)]
pub struct QueryCommands {
    /// SOQL query text
    pub query: Option<String>,

    /// Read the query from a file instead
    #[arg(short, long)]
    pub file: Option<PathBuf>,

    /// Generate the SELECT clause from the table's fields
    #[arg(short, long)]
    pub expand: bool,

    /// Follow pagination until every record is fetched
    #[arg(short, long)]
    pub all: bool,

    /// Write the records (JSON) to this file instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Output format for stdout
    #[arg(long, value_enum, default_value_t = OutputFormat::Json)]
    pub format: OutputFormat,

    /// Display style
    #[arg(long, value_enum, default_value_t = DisplayStyle::Plain)]
    pub style: DisplayStyle,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Json,
    JsonCompact,
    Csv,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum DisplayStyle {
    Plain,
    Verbose,
}
