use anyhow::Result;
use clap::Parser;

mod cli;

use cli::{Cli, Commands};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    sfquery::logging::init(cli.verbose);

    let credentials = cli.credentials()?;
    let transport = cli.transport()?;

    match cli.command {
        Commands::Versions => {
            cli::commands::versions::handle_versions_command(&transport, &credentials).await
        }
        Commands::Objects => {
            cli::commands::objects::handle_objects_command(&transport, credentials).await
        }
        Commands::Describe(args) => {
            cli::commands::describe::handle_describe_command(args, &transport, credentials).await
        }
        Commands::Query(args) => {
            cli::commands::query::handler::handle_query_command(args, &transport, credentials)
                .await
        }
    }
}
