//! Shared argument types and plain-text rendering for the command handlers.

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use clap::Args;
use lnf_client::{media_url, FilePart, FormPayload};
use lnf_core::items::timestamp;
use lnf_core::{FoundItem, LocationSelection, LostItem, ManagedLostItem, MAX_IMAGES};

/// `--country` / `--state` / `--city`, in dependency order.
#[derive(Debug, Clone, Default, Args)]
pub struct LocationArgs {
    /// Country name
    #[arg(long)]
    pub country: Option<String>,
    /// State name (requires --country)
    #[arg(long, requires = "country")]
    pub state: Option<String>,
    /// City name (requires --state)
    #[arg(long, requires = "state")]
    pub city: Option<String>,
}

impl LocationArgs {
    pub fn is_set(&self) -> bool {
        self.country.is_some() || self.state.is_some() || self.city.is_some()
    }

    pub fn selection(&self) -> LocationSelection {
        LocationSelection::from_parts(
            self.country.as_deref(),
            self.state.as_deref(),
            self.city.as_deref(),
        )
    }
}

/// Parses `--date-*` values: RFC 3339, `YYYY-MM-DDTHH:MM:SS` (UTC) or a bare date.
pub fn parse_date(raw: &str) -> Result<DateTime<Utc>, String> {
    timestamp::parse(raw).ok_or_else(|| format!("invalid date \"{raw}\"; use YYYY-MM-DD"))
}

/// Appends image files to `form` under `field`, enforcing the per-report cap.
pub async fn attach_images(
    mut form: FormPayload,
    field: &str,
    paths: &[PathBuf],
) -> anyhow::Result<FormPayload> {
    if paths.len() > MAX_IMAGES {
        anyhow::bail!("You can upload a maximum of {MAX_IMAGES} images.");
    }
    for path in paths {
        form = form.file(FilePart::image_from_path(field, path).await?);
    }
    Ok(form)
}

fn fmt_date(date: DateTime<Utc>) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// First 50 characters, with an ellipsis when cut.
fn preview(text: &str) -> String {
    let mut chars = text.chars();
    let head: String = chars.by_ref().take(50).collect();
    if chars.next().is_some() {
        format!("{head}...")
    } else {
        head
    }
}

fn print_table_header(date_label: &str) {
    let header = format!("{:<38}{:<12}{:<30}DESCRIPTION", "ID", date_label, "LOCATION");
    println!("{header}");
    println!("{}", "-".repeat(header.len() + 20));
}

pub fn print_lost_list(items: &[LostItem]) {
    if items.is_empty() {
        println!("no lost items found");
        return;
    }
    print_table_header("LOST ON");
    for item in items {
        println!(
            "{:<38}{:<12}{:<30}{}",
            item.id,
            fmt_date(item.date_lost),
            item.location().to_string(),
            preview(&item.description)
        );
    }
}

pub fn print_found_list(items: &[FoundItem]) {
    if items.is_empty() {
        println!("no found items");
        return;
    }
    print_table_header("FOUND ON");
    for item in items {
        println!(
            "{:<38}{:<12}{:<30}{}",
            item.id,
            fmt_date(item.date_found),
            item.location().to_string(),
            preview(&item.description)
        );
    }
}

fn print_images(api_host: Option<&str>, filenames: &[String]) {
    if filenames.is_empty() {
        println!("images:      none");
        return;
    }
    for name in filenames {
        println!("image:       {}", media_url(api_host, name));
    }
}

pub fn print_lost_item(item: &LostItem, api_host: Option<&str>) {
    println!("id:          {}", item.id);
    println!("description: {}", item.description);
    println!("lost on:     {}", fmt_date(item.date_lost));
    println!("location:    {}", item.location());
    if let Some(link) = &item.product_link {
        println!("product:     {link}");
    }
    println!("reported:    {}", item.created_at.to_rfc3339());
    print_images(api_host, &item.image_filenames);
}

pub fn print_found_item(item: &FoundItem, api_host: Option<&str>) {
    println!("id:          {}", item.id);
    println!("description: {}", item.description);
    println!("found on:    {}", fmt_date(item.date_found));
    println!("location:    {}", item.location());
    println!("reported:    {}", item.created_at.to_rfc3339());
    print_images(api_host, &item.image_filenames);
}

pub fn print_managed_item(managed: &ManagedLostItem, api_host: Option<&str>) {
    print_lost_item(&managed.item, api_host);
    println!("reporter:    {}", managed.reporter_email);
    if let Some(found_at) = managed.found_at {
        println!(
            "found at:    {} by {}",
            found_at.to_rfc3339(),
            managed.found_by_contact.as_deref().unwrap_or("unknown")
        );
    }
    if managed.found_reports.is_empty() {
        println!("found reports: none");
        return;
    }
    println!("found reports:");
    for report in &managed.found_reports {
        let when = report.date_found.map_or_else(|| "N/A".to_string(), fmt_date);
        println!(
            "  - {} on {when} at {}",
            report.finder_contact,
            report.location()
        );
        if let Some(description) = &report.finder_description {
            println!("    {description}");
        }
        for name in &report.finder_image_filenames {
            println!("    image: {}", media_url(api_host, name));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preview_cuts_long_text() {
        let long = "a".repeat(60);
        assert_eq!(preview(&long), format!("{}...", "a".repeat(50)));
        assert_eq!(preview("short"), "short");
    }

    #[test]
    fn parse_date_accepts_bare_date() {
        assert!(parse_date("2025-03-02").is_ok());
        assert!(parse_date("last tuesday").is_err());
    }

    #[test]
    fn location_args_drop_orphans() {
        let args = LocationArgs {
            country: None,
            state: Some("Lookingglass".to_string()),
            city: None,
        };
        assert!(args.is_set());
        assert!(args.selection().is_empty());
    }

    #[tokio::test]
    async fn attach_images_enforces_cap() {
        let paths: Vec<PathBuf> = (0..=MAX_IMAGES)
            .map(|i| PathBuf::from(format!("{i}.png")))
            .collect();
        let err = attach_images(FormPayload::new(), "images", &paths)
            .await
            .unwrap_err();
        assert!(err.to_string().contains("maximum of 5 images"));
    }
}
