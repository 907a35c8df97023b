//! Command-line surface

pub mod commands;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use sfquery::api::{Credentials, ReqwestTransport};
use sfquery::config::{self, ConfigFile};
use std::path::PathBuf;
use std::time::Duration;

use commands::describe::DescribeCommands;
use commands::query::QueryCommands;

#[derive(Parser)]
#[command(name = "sfquery-cli", version, about = "Bulk SOQL queries against the Salesforce REST API")]
pub struct Cli {
    /// Config file (defaults to <config dir>/sfquery/config.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Instance URL, e.g. https://acme.my.salesforce.com
    #[arg(long, global = true)]
    pub base_uri: Option<String>,

    /// Connected app client id
    #[arg(long, global = true)]
    pub client_id: Option<String>,

    /// Connected app client secret
    #[arg(long, global = true)]
    pub client_secret: Option<String>,

    /// Per-request timeout in seconds
    #[arg(long, global = true, default_value_t = 120)]
    pub timeout: u64,

    /// Debug logging (RUST_LOG overrides)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List the API versions the instance supports
    Versions,
    /// List every object and the tenant batch size limit
    Objects,
    /// Describe one object's fields
    Describe(DescribeCommands),
    /// Run a SOQL query
    Query(QueryCommands),
}

impl Cli {
    pub fn credentials(&self) -> Result<Credentials> {
        let flags = ConfigFile {
            base_uri: self.base_uri.clone(),
            client_id: self.client_id.clone(),
            client_secret: self.client_secret.clone(),
        };
        config::load_credentials(self.config.as_deref(), flags)
            .context("Failed to load credentials")
    }

    pub fn transport(&self) -> Result<ReqwestTransport> {
        ReqwestTransport::with_timeout(Duration::from_secs(self.timeout))
            .context("Failed to build HTTP client")
    }
}
