//! `manage` command handlers.
//!
//! Every sub-command takes an optional `--token`. Without one, the token
//! saved when the item was reported is used.

use chrono::{DateTime, Utc};
use clap::Subcommand;
use lnf_client::{ApiClient, FileTokenStore, ManagementTokens};
use lnf_core::LostItemUpdate;

use crate::output::{self, parse_date, LocationArgs};

/// Sub-commands available under `manage`.
#[derive(Debug, Subcommand)]
pub enum ManageCommands {
    /// Show the full record, including found-reports
    Show {
        /// Item ID
        id: String,
        /// Management token from the confirmation email
        #[arg(long)]
        token: Option<String>,
    },
    /// Change fields of the report
    Update {
        /// Item ID
        id: String,
        /// Management token from the confirmation email
        #[arg(long)]
        token: Option<String>,
        #[arg(long)]
        description: Option<String>,
        #[arg(long, value_parser = parse_date)]
        date_lost: Option<DateTime<Utc>>,
        #[arg(long)]
        product_link: Option<String>,
        // Any of these replaces the whole stored location.
        #[command(flatten)]
        location: LocationArgs,
        /// Remove the stored location
        #[arg(long, conflicts_with_all = ["country", "state", "city"])]
        clear_location: bool,
    },
    /// Delete the report and its images
    Delete {
        /// Item ID
        id: String,
        /// Management token from the confirmation email
        #[arg(long)]
        token: Option<String>,
    },
}

/// Dispatches a `manage` sub-command.
///
/// # Errors
///
/// Returns an error if no token is available or the request fails.
pub(crate) async fn run_manage(
    client: &ApiClient,
    tokens: &ManagementTokens<FileTokenStore>,
    api_host: Option<&str>,
    command: ManageCommands,
) -> anyhow::Result<()> {
    match command {
        ManageCommands::Show { id, token } => {
            let managed = tokens.load(client, &id, token.as_deref()).await?;
            output::print_managed_item(&managed, api_host);
        }
        ManageCommands::Update {
            id,
            token,
            description,
            date_lost,
            product_link,
            location,
            clear_location,
        } => {
            let mut update = LostItemUpdate {
                description,
                date_lost,
                product_link,
                ..LostItemUpdate::default()
            };
            if clear_location || location.is_set() {
                update = update.with_location(&location.selection());
            }
            if update.is_empty() {
                anyhow::bail!("nothing to update; pass at least one field");
            }

            let token = required_token(tokens, &id, token.as_deref())?;
            let updated = client.update_item(&id, &token, &update).await?;
            tokens.remember(&id, &token);
            println!("updated lost item {}", updated.item.id);
        }
        ManageCommands::Delete { id, token } => {
            let token = required_token(tokens, &id, token.as_deref())?;
            tokens.delete(client, &id, &token).await?;
            println!("deleted lost item {id}");
        }
    }
    Ok(())
}

fn required_token(
    tokens: &ManagementTokens<FileTokenStore>,
    id: &str,
    explicit: Option<&str>,
) -> anyhow::Result<String> {
    tokens
        .resolve(id, explicit)
        .map(|source| source.token().to_string())
        .ok_or_else(|| {
            anyhow::anyhow!("Management token is missing. Pass --token from your email link.")
        })
}
