//! `versions` command: token plus version listing, no full bootstrap

use anyhow::{Context, Result};
use colored::*;
use sfquery::api::{
    Credentials, RequestContext, Transport, acquire_token, latest_index, list_versions,
};

pub async fn handle_versions_command(
    transport: &dyn Transport,
    credentials: &Credentials,
) -> Result<()> {
    let token = acquire_token(transport, credentials)
        .await
        .context("Failed to authenticate")?;
    let ctx = RequestContext::authenticated(&credentials.base_uri, token.token());
    let versions = list_versions(transport, &ctx)
        .await
        .context("Failed to list API versions")?;

    let latest = latest_index(&versions);
    for (index, entry) in versions.iter().enumerate() {
        let label = entry.label.as_deref().unwrap_or("");
        if Some(index) == latest {
            println!(
                "{} {} {} {}",
                "*".bright_green().bold(),
                entry.version.bright_green().bold(),
                entry.url,
                label.dimmed()
            );
        } else {
            println!("  {} {} {}", entry.version, entry.url, label.dimmed());
        }
    }
    Ok(())
}
