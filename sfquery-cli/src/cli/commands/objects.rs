//! `objects` command

use anyhow::{Context, Result};
use colored::*;
use sfquery::api::{Credentials, Transport, bootstrap, list_objects};

pub async fn handle_objects_command(
    transport: &dyn Transport,
    credentials: Credentials,
) -> Result<()> {
    let session = bootstrap(transport, credentials)
        .await
        .context("Failed to start session")?;
    let listing = list_objects(transport, &session)
        .await
        .context("Failed to list objects")?;

    for object in &listing.objects {
        match &object.label {
            Some(label) => println!("{} {}", object.name, label.dimmed()),
            None => println!("{}", object.name),
        }
    }
    println!();
    println!(
        "{} objects, max batch size {}",
        listing.objects.len().to_string().bold(),
        listing.max_batch_size.to_string().bold()
    );
    Ok(())
}
