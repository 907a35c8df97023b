//! `describe` command

use anyhow::{Context, Result};
use clap::Args;
use sfquery::api::{Credentials, Transport, bootstrap, describe};

#[derive(Args)]
pub struct DescribeCommands {
    /// Object API name, e.g. Account
    pub object: String,

    /// Print only the field names, one per line
    #[arg(long)]
    pub fields_only: bool,
}

pub async fn handle_describe_command(
    args: DescribeCommands,
    transport: &dyn Transport,
    credentials: Credentials,
) -> Result<()> {
    let session = bootstrap(transport, credentials)
        .await
        .context("Failed to start session")?;
    let description = describe(transport, &session, &args.object)
        .await
        .with_context(|| format!("Failed to describe {}", args.object))?;

    if args.fields_only {
        for name in description.field_names() {
            println!("{}", name);
        }
    } else {
        let json = serde_json::to_string_pretty(&description)
            .context("Failed to format JSON output")?;
        println!("{}", json);
    }
    Ok(())
}
