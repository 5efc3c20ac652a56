//! `lost` command handlers.

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use clap::Subcommand;
use lnf_client::{ApiClient, FileTokenStore, FormPayload, LocationFields, ManagementTokens};
use lnf_core::DEFAULT_PAGE_LIMIT;

use crate::output::{self, parse_date, LocationArgs};

/// Sub-commands available under `lost`.
#[derive(Debug, Subcommand)]
pub enum LostCommands {
    /// List recent lost-item reports
    List {
        /// Number of reports to skip
        #[arg(long, default_value_t = 0)]
        skip: u32,
        /// Maximum number of reports to show
        #[arg(long, default_value_t = DEFAULT_PAGE_LIMIT)]
        limit: u32,
    },
    /// Show one lost-item report
    Show {
        /// Item ID
        id: String,
    },
    /// Report a lost item; prints the management token
    Report {
        /// What was lost (10 to 1000 characters)
        #[arg(long)]
        description: String,
        /// Where the management link is emailed
        #[arg(long)]
        email: String,
        /// When it was lost (YYYY-MM-DD or RFC 3339)
        #[arg(long, value_parser = parse_date)]
        date_lost: DateTime<Utc>,
        /// Link to the product page
        #[arg(long)]
        product_link: Option<String>,
        #[command(flatten)]
        location: LocationArgs,
        /// Image to attach (repeatable, up to 5)
        #[arg(long = "image")]
        images: Vec<PathBuf>,
    },
    /// Tell the owner of a lost item that you found it
    Found {
        /// Item ID
        id: String,
        /// How the owner can reach you
        #[arg(long)]
        contact: String,
        /// Where and how you found it
        #[arg(long)]
        description: Option<String>,
        /// When you found it (YYYY-MM-DD or RFC 3339)
        #[arg(long, value_parser = parse_date)]
        date_found: Option<DateTime<Utc>>,
        #[command(flatten)]
        location: LocationArgs,
        /// Image to attach (repeatable, up to 5)
        #[arg(long = "image")]
        images: Vec<PathBuf>,
    },
}

/// Dispatches a `lost` sub-command.
///
/// # Errors
///
/// Returns an error if the request fails or an image cannot be read.
pub(crate) async fn run_lost(
    client: &ApiClient,
    tokens: &ManagementTokens<FileTokenStore>,
    api_host: Option<&str>,
    command: LostCommands,
) -> anyhow::Result<()> {
    match command {
        LostCommands::List { skip, limit } => {
            let items = client.list_public_items(skip, limit).await?;
            output::print_lost_list(&items);
        }
        LostCommands::Show { id } => {
            let item = client.get_public_item(&id).await?;
            output::print_lost_item(&item, api_host);
        }
        LostCommands::Report {
            description,
            email,
            date_lost,
            product_link,
            location,
            images,
        } => {
            let form = FormPayload::new()
                .text("description", description)
                .text("reporter_email", email)
                .timestamp("date_lost", date_lost)
                .text_opt("product_link", product_link.as_deref())
                .location(&location.selection(), LocationFields::Item);
            let form = output::attach_images(form, "images", &images).await?;

            let created = client.create_lost_item(form).await?;
            tokens.remember(&created.item.id, &created.management_token);
            tracing::info!(item_id = %created.item.id, "lost item reported");

            println!("reported lost item {}", created.item.id);
            println!("management token: {}", created.management_token);
            println!(
                "token saved to {}; manage with `lnf manage show {}`",
                tokens.store().path().display(),
                created.item.id
            );
        }
        LostCommands::Found {
            id,
            contact,
            description,
            date_found,
            location,
            images,
        } => {
            let mut form = FormPayload::new()
                .text("finder_contact", contact)
                .text_opt("finder_description", description.as_deref())
                .location(&location.selection(), LocationFields::FoundReport);
            if let Some(date) = date_found {
                form = form.timestamp("date_found", date);
            }
            let form = output::attach_images(form, "finder_images", &images).await?;

            client.notify_found(&id, form).await?;
            println!("thanks! the owner of {id} has been notified");
        }
    }
    Ok(())
}
