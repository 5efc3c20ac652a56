mod found;
mod locations;
mod lost;
mod manage;
mod output;

use clap::{CommandFactory, Parser, Subcommand};
use lnf_client::{ApiClient, FileTokenStore, ManagementTokens};
use tracing_subscriber::EnvFilter;

use crate::{
    found::FoundCommands, locations::LocationsCommands, lost::LostCommands,
    manage::ManageCommands,
};

#[derive(Debug, Parser)]
#[command(name = "lnf")]
#[command(about = "Lost & Found command line client")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Lost-item reports
    Lost {
        #[command(subcommand)]
        command: LostCommands,
    },
    /// Found-item reports and ownership claims
    Found {
        #[command(subcommand)]
        command: FoundCommands,
    },
    /// Token-gated management of your own lost-item report
    Manage {
        #[command(subcommand)]
        command: ManageCommands,
    },
    /// Country, state and city lookups
    Locations {
        #[command(subcommand)]
        command: LocationsCommands,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = lnf_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let Some(command) = cli.command else {
        Cli::command().print_help()?;
        return Ok(());
    };

    let client = ApiClient::from_config(&config)?;
    tracing::debug!(base_url = client.base_url(), env = %config.env, "client ready");
    let tokens = ManagementTokens::new(FileTokenStore::new(&config.token_store_path));

    match command {
        Commands::Lost { command } => {
            lost::run_lost(&client, &tokens, config.api_host.as_deref(), command).await
        }
        Commands::Found { command } => {
            found::run_found(&client, config.api_host.as_deref(), command).await
        }
        Commands::Manage { command } => {
            manage::run_manage(&client, &tokens, config.api_host.as_deref(), command).await
        }
        Commands::Locations { command } => locations::run_locations(client, command).await,
    }
}

#[cfg(test)]
mod tests;
