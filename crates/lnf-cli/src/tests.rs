use super::*;

#[test]
fn no_command_is_none() {
    let cli = Cli::try_parse_from(["lnf"]).expect("expected valid cli args");
    assert!(cli.command.is_none());
}

#[test]
fn lost_list_uses_default_page() {
    let cli = Cli::try_parse_from(["lnf", "lost", "list"]).unwrap();
    assert!(matches!(
        cli.command,
        Some(Commands::Lost {
            command: LostCommands::List { skip: 0, limit: 10 }
        })
    ));
}

#[test]
fn found_list_with_paging() {
    let cli =
        Cli::try_parse_from(["lnf", "found", "list", "--skip", "20", "--limit", "5"]).unwrap();
    assert!(matches!(
        cli.command,
        Some(Commands::Found {
            command: FoundCommands::List { skip: 20, limit: 5 }
        })
    ));
}

#[test]
fn lost_report_collects_location_and_images() {
    let cli = Cli::try_parse_from([
        "lnf",
        "lost",
        "report",
        "--description",
        "Black leather wallet with a red stripe",
        "--email",
        "alice@example.com",
        "--date-lost",
        "2025-03-02",
        "--country",
        "Wonderland",
        "--state",
        "Lookingglass",
        "--image",
        "a.jpg",
        "--image",
        "b.png",
    ])
    .unwrap();

    let Some(Commands::Lost {
        command: LostCommands::Report {
            location, images, ..
        },
    }) = cli.command
    else {
        panic!("expected lost report");
    };
    assert_eq!(location.selection().state(), "Lookingglass");
    assert_eq!(images.len(), 2);
}

#[test]
fn lost_report_rejects_bad_date() {
    let result = Cli::try_parse_from([
        "lnf",
        "lost",
        "report",
        "--description",
        "Black leather wallet with a red stripe",
        "--email",
        "alice@example.com",
        "--date-lost",
        "sometime",
    ]);
    assert!(result.is_err());
}

#[test]
fn state_requires_country() {
    let result = Cli::try_parse_from([
        "lnf",
        "found",
        "report",
        "--description",
        "Blue umbrella near the fountain",
        "--date-found",
        "2025-04-01",
        "--state",
        "Lookingglass",
    ]);
    assert!(result.is_err());
}

#[test]
fn found_claim_requires_email_and_description() {
    assert!(Cli::try_parse_from(["lnf", "found", "claim", "f-1"]).is_err());

    let cli = Cli::try_parse_from([
        "lnf",
        "found",
        "claim",
        "f-1",
        "--email",
        "alice@example.com",
        "--description",
        "Duck-shaped handle",
    ])
    .unwrap();
    assert!(matches!(
        cli.command,
        Some(Commands::Found {
            command: FoundCommands::Claim { ref id, .. }
        }) if id == "f-1"
    ));
}

#[test]
fn manage_show_token_is_optional() {
    let cli = Cli::try_parse_from(["lnf", "manage", "show", "item-1"]).unwrap();
    assert!(matches!(
        cli.command,
        Some(Commands::Manage {
            command: ManageCommands::Show { token: None, .. }
        })
    ));
}

#[test]
fn manage_update_clear_location_conflicts_with_country() {
    let result = Cli::try_parse_from([
        "lnf",
        "manage",
        "update",
        "item-1",
        "--clear-location",
        "--country",
        "Wonderland",
    ]);
    assert!(result.is_err());

    let cli =
        Cli::try_parse_from(["lnf", "manage", "update", "item-1", "--clear-location"]).unwrap();
    assert!(matches!(
        cli.command,
        Some(Commands::Manage {
            command: ManageCommands::Update {
                clear_location: true,
                ..
            }
        })
    ));
}

#[test]
fn locations_pick_accepts_placeholder() {
    let cli = Cli::try_parse_from([
        "lnf",
        "locations",
        "pick",
        "--country",
        "Wonderland",
        "--state",
        "none",
    ])
    .unwrap();
    assert!(matches!(
        cli.command,
        Some(Commands::Locations {
            command: LocationsCommands::Pick {
                country: Some(ref c),
                state: Some(ref s),
                city: None,
            }
        }) if c == "Wonderland" && s == "none"
    ));
}

#[test]
fn locations_cities_takes_positional_names() {
    let cli = Cli::try_parse_from(["lnf", "locations", "cities", "Wonderland", "Lookingglass"])
        .unwrap();
    assert!(matches!(
        cli.command,
        Some(Commands::Locations {
            command: LocationsCommands::Cities { .. }
        })
    ));
}
