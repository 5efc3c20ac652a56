//! `locations` command handlers.
//!
//! `pick` walks the same country → state → city selector a report form
//! uses, printing each selection the selector emits.

use clap::Subcommand;
use lnf_client::ApiClient;
use lnf_core::{LocationOption, LocationSelection};
use lnf_selector::{Choice, Level, LocationSelector, Snapshot};

/// Sub-commands available under `locations`.
#[derive(Debug, Subcommand)]
pub enum LocationsCommands {
    /// List all countries
    Countries,
    /// List the states of a country
    States {
        /// Country name
        country: String,
    },
    /// List the cities of a state
    Cities {
        /// Country name
        country: String,
        /// State name
        state: String,
    },
    /// Resolve a location step by step, as a report form would
    Pick {
        /// Country to select (`none` clears)
        #[arg(long)]
        country: Option<String>,
        /// State to select (`none` clears)
        #[arg(long)]
        state: Option<String>,
        /// City to select (`none` clears)
        #[arg(long)]
        city: Option<String>,
    },
}

/// Dispatches a `locations` sub-command.
///
/// # Errors
///
/// Returns an error if a lookup fails or a choice is rejected.
pub(crate) async fn run_locations(
    client: ApiClient,
    command: LocationsCommands,
) -> anyhow::Result<()> {
    match command {
        LocationsCommands::Countries => print_options(&client.get_countries().await?),
        LocationsCommands::States { country } => {
            print_options(&client.get_states(&country).await?);
        }
        LocationsCommands::Cities { country, state } => {
            print_options(&client.get_cities(&country, &state).await?);
        }
        LocationsCommands::Pick {
            country,
            state,
            city,
        } => run_pick(client, [country, state, city]).await?,
    }
    Ok(())
}

fn print_options(options: &[LocationOption]) {
    if options.is_empty() {
        println!("no locations found");
        return;
    }
    for option in options {
        println!("{}", option.name);
    }
}

async fn run_pick(client: ApiClient, choices: [Option<String>; 3]) -> anyhow::Result<()> {
    let selector = LocationSelector::spawn(client, &LocationSelection::empty(), |sel| {
        println!("selection: {sel}");
    });

    let result: anyhow::Result<()> = async {
        let mut snapshot = selector.settled().await?;
        for (level, choice) in Level::ALL.into_iter().zip(choices) {
            let Some(raw) = choice else { break };
            report_level(&snapshot, level)?;
            selector.select(level, Choice::parse(&raw)).await?;
            snapshot = selector.settled().await?;
        }
        if let Some(error) = &snapshot.latest_error {
            anyhow::bail!("{error}");
        }
        println!("final: {}", snapshot.selection);
        Ok(())
    }
    .await;

    selector.shutdown().await;
    result
}

/// Fails with the level's load error, otherwise logs its option count.
fn report_level(snapshot: &Snapshot, level: Level) -> anyhow::Result<()> {
    let view = snapshot.level(level);
    if let Some(error) = &view.error {
        anyhow::bail!("{error}");
    }
    tracing::info!(%level, options = view.options.len(), "options loaded");
    Ok(())
}
