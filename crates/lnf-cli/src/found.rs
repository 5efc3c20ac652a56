//! `found` command handlers.

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use clap::Subcommand;
use lnf_client::{ApiClient, ApiPayload, FormPayload, LocationFields};
use lnf_core::{ClaimRequest, DEFAULT_PAGE_LIMIT};

use crate::output::{self, parse_date, LocationArgs};

/// Sub-commands available under `found`.
#[derive(Debug, Subcommand)]
pub enum FoundCommands {
    /// List recent found-item reports
    List {
        /// Number of reports to skip
        #[arg(long, default_value_t = 0)]
        skip: u32,
        /// Maximum number of reports to show
        #[arg(long, default_value_t = DEFAULT_PAGE_LIMIT)]
        limit: u32,
    },
    /// Show one found-item report
    Show {
        /// Found item ID
        id: String,
    },
    /// Report an item you found
    Report {
        /// What was found (10 to 1000 characters)
        #[arg(long)]
        description: String,
        /// When it was found (YYYY-MM-DD or RFC 3339)
        #[arg(long, value_parser = parse_date)]
        date_found: DateTime<Utc>,
        #[command(flatten)]
        location: LocationArgs,
        /// Image to attach (repeatable, up to 5)
        #[arg(long = "image")]
        images: Vec<PathBuf>,
    },
    /// Claim a found item as yours
    Claim {
        /// Found item ID
        id: String,
        /// Your email address
        #[arg(long)]
        email: String,
        /// Details only the owner would know
        #[arg(long)]
        description: String,
    },
}

/// Dispatches a `found` sub-command.
///
/// # Errors
///
/// Returns an error if the request fails or an image cannot be read.
pub(crate) async fn run_found(
    client: &ApiClient,
    api_host: Option<&str>,
    command: FoundCommands,
) -> anyhow::Result<()> {
    match command {
        FoundCommands::List { skip, limit } => {
            let items = client.list_public_found_items(skip, limit).await?;
            output::print_found_list(&items);
        }
        FoundCommands::Show { id } => {
            let item = client.get_public_found_item(&id).await?;
            output::print_found_item(&item, api_host);
        }
        FoundCommands::Report {
            description,
            date_found,
            location,
            images,
        } => {
            let form = FormPayload::new()
                .text("description", description)
                .timestamp("date_found", date_found)
                .location(&location.selection(), LocationFields::Item);
            let form = output::attach_images(form, "images", &images).await?;

            let item = client.create_found_item(form).await?;
            tracing::info!(item_id = %item.id, "found item reported");
            println!("reported found item {}", item.id);
        }
        FoundCommands::Claim {
            id,
            email,
            description,
        } => {
            let claim = ClaimRequest {
                owner_email: email,
                owner_description: description,
            };
            match client.claim_found_item(&id, &claim).await? {
                ApiPayload::NoContent => println!("claim submitted"),
                ApiPayload::Text(text) => println!("{text}"),
                ApiPayload::Json(value) => println!("{value}"),
            }
        }
    }
    Ok(())
}
