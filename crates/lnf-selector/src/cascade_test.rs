use super::*;

fn options(names: &[&str]) -> Vec<LocationOption> {
    names.iter().map(|n| LocationOption::new(*n)).collect()
}

fn single(fetches: Vec<Fetch>) -> Fetch {
    assert_eq!(fetches.len(), 1, "expected exactly one fetch, got {fetches:?}");
    fetches.into_iter().next().unwrap()
}

fn value(raw: &str) -> Choice {
    Choice::parse(raw)
}

/// Mounted, countries loaded, "Wonderland" → "Lookingglass" → "Tulgey Wood".
fn fully_selected() -> Cascade {
    let mut c = Cascade::new(&LocationSelection::empty());
    let countries = single(c.mount());
    assert!(c.complete(&countries, Ok(options(&["Wonderland", "Oz"]))));
    let states = single(c.select(Level::Country, &value("Wonderland")).unwrap());
    assert!(c.complete(&states, Ok(options(&["Lookingglass", "Heart"]))));
    let cities = single(c.select(Level::State, &value("Lookingglass")).unwrap());
    assert!(c.complete(&cities, Ok(options(&["Tulgey Wood", "Mome Rath"]))));
    c.select(Level::City, &value("Tulgey Wood")).unwrap();
    c
}

#[test]
fn mount_loads_countries_once() {
    let mut c = Cascade::new(&LocationSelection::empty());
    let fetch = single(c.mount());
    assert_eq!(fetch.query, LocationQuery::Countries);
    assert_eq!(c.status(Level::Country), LevelStatus::Loading);
    assert_eq!(c.status(Level::State), LevelStatus::Idle);
    assert!(c.mount().is_empty());
}

#[test]
fn country_selection_starts_state_load() {
    let mut c = Cascade::new(&LocationSelection::empty());
    let countries = single(c.mount());
    c.complete(&countries, Ok(options(&["Wonderland"])));

    let fetch = single(c.select(Level::Country, &value("Wonderland")).unwrap());
    assert_eq!(
        fetch.query,
        LocationQuery::States {
            country: "Wonderland".to_string()
        }
    );
    assert_eq!(c.status(Level::State), LevelStatus::Loading);
    assert_eq!(
        c.disabled_reason(Level::State),
        Some(DisabledReason::Loading)
    );
}

#[test]
fn placeholder_equals_clear_at_every_level() {
    for level in Level::ALL {
        let mut via_placeholder = fully_selected();
        let mut via_clear = fully_selected();
        via_placeholder.select(level, &Choice::parse("none")).unwrap();
        via_clear.clear(level);
        assert_eq!(via_placeholder.snapshot(), via_clear.snapshot(), "level {level}");
    }
}

#[test]
fn clearing_country_empties_lower_levels() {
    let mut c = fully_selected();
    c.select(Level::Country, &Choice::Placeholder).unwrap();

    let snap = c.snapshot();
    assert_eq!(snap.selection, LocationSelection::empty());
    assert!(snap.state.options.is_empty());
    assert!(snap.city.options.is_empty());
    assert_eq!(snap.state.status, LevelStatus::Idle);
    assert_eq!(snap.city.status, LevelStatus::Idle);
    // Countries stay loaded.
    assert_eq!(snap.country.option_names(), vec!["Wonderland", "Oz"]);
}

#[test]
fn clearing_state_keeps_country() {
    let mut c = fully_selected();
    c.select(Level::State, &value("")).unwrap();

    let snap = c.snapshot();
    assert_eq!(snap.selection.country(), "Wonderland");
    assert_eq!(snap.selection.state(), "");
    assert_eq!(snap.selection.city(), "");
    assert!(snap.city.options.is_empty());
    assert_eq!(snap.country.option_names(), vec!["Wonderland", "Oz"]);
    assert_eq!(snap.state.option_names(), vec!["Lookingglass", "Heart"]);
}

#[test]
fn state_selection_fetches_cities_only() {
    let mut c = Cascade::new(&LocationSelection::empty());
    let countries = single(c.mount());
    c.complete(&countries, Ok(options(&["Wonderland"])));
    let states = single(c.select(Level::Country, &value("Wonderland")).unwrap());
    c.complete(&states, Ok(options(&["Lookingglass"])));

    let fetches = c.select(Level::State, &value("Lookingglass")).unwrap();
    assert_eq!(
        fetches,
        vec![Fetch {
            level: Level::City,
            seq: fetches[0].seq,
            query: LocationQuery::Cities {
                country: "Wonderland".to_string(),
                state: "Lookingglass".to_string(),
            },
        }]
    );
}

#[test]
fn changing_country_resets_state_and_city() {
    let mut c = fully_selected();
    let fetch = single(c.select(Level::Country, &value("Oz")).unwrap());
    assert_eq!(fetch.level, Level::State);

    let snap = c.snapshot();
    assert_eq!(snap.selection, LocationSelection::from_parts(Some("Oz"), None, None));
    assert!(snap.state.options.is_empty());
    assert_eq!(snap.city.status, LevelStatus::Idle);
}

#[test]
fn reselecting_same_value_is_a_no_op() {
    let mut c = fully_selected();
    c.take_change();
    assert!(c.select(Level::Country, &value("Wonderland")).unwrap().is_empty());
    assert_eq!(c.selection().city(), "Tulgey Wood");
    assert_eq!(c.take_change(), None);
}

#[test]
fn disabled_levels_reject_values() {
    let mut c = Cascade::new(&LocationSelection::empty());
    assert_eq!(
        c.select(Level::State, &value("Lookingglass")),
        Err(SelectorError::Disabled {
            level: Level::State,
            reason: DisabledReason::MissingPrerequisite
        })
    );

    let countries = single(c.mount());
    assert_eq!(
        c.select(Level::Country, &value("Wonderland")),
        Err(SelectorError::Disabled {
            level: Level::Country,
            reason: DisabledReason::Loading
        })
    );

    c.complete(&countries, Ok(Vec::new()));
    assert_eq!(
        c.disabled_reason(Level::Country),
        Some(DisabledReason::NoOptions)
    );
}

#[test]
fn unknown_option_is_rejected_without_change() {
    let mut c = fully_selected();
    let before = c.snapshot();
    let err = c.select(Level::City, &value("Atlantis")).unwrap_err();
    assert_eq!(
        err,
        SelectorError::UnknownOption {
            level: Level::City,
            value: "Atlantis".to_string()
        }
    );
    assert_eq!(c.snapshot(), before);
}

#[test]
fn stale_state_response_is_discarded() {
    let mut c = Cascade::new(&LocationSelection::empty());
    let countries = single(c.mount());
    c.complete(&countries, Ok(options(&["Wonderland", "Oz"])));

    let first = single(c.select(Level::Country, &value("Wonderland")).unwrap());
    let second = single(c.select(Level::Country, &value("Oz")).unwrap());

    assert!(c.complete(&second, Ok(options(&["Emerald City"]))));
    assert!(!c.complete(&first, Ok(options(&["Lookingglass"]))));
    assert_eq!(c.snapshot().state.option_names(), vec!["Emerald City"]);
}

#[test]
fn completion_after_reset_is_discarded() {
    let mut c = Cascade::new(&LocationSelection::empty());
    let countries = single(c.mount());
    c.complete(&countries, Ok(options(&["Wonderland"])));
    let states = single(c.select(Level::Country, &value("Wonderland")).unwrap());
    c.clear(Level::Country);

    assert!(!c.complete(&states, Ok(options(&["Lookingglass"]))));
    assert_eq!(c.status(Level::State), LevelStatus::Idle);
    assert!(c.options(Level::State).is_empty());
}

#[test]
fn failures_are_recorded_per_level() {
    let mut c = Cascade::new(&LocationSelection::empty());
    let countries = single(c.mount());
    c.complete(&countries, Ok(options(&["Wonderland"])));
    let states = single(c.select(Level::Country, &value("Wonderland")).unwrap());
    c.complete(&states, Err(RequestFailure::validation("boom")));

    assert_eq!(c.status(Level::State), LevelStatus::Failed);
    assert_eq!(
        c.error(Level::State),
        Some("Could not load states for Wonderland.")
    );
    assert_eq!(c.error(Level::Country), None);
    assert_eq!(c.latest_error(), Some("Could not load states for Wonderland."));
    assert_eq!(
        c.disabled_reason(Level::State),
        Some(DisabledReason::NoOptions)
    );
}

#[test]
fn latest_error_follows_recording_order() {
    let mut c = Cascade::new(&LocationSelection::from_parts(
        Some("Wonderland"),
        Some("Lookingglass"),
        None,
    ));
    let fetches = c.mount();
    assert_eq!(fetches.len(), 3);
    c.complete(&fetches[2], Err(RequestFailure::validation("down")));
    c.complete(&fetches[0], Err(RequestFailure::validation("down")));

    assert_eq!(c.latest_error(), Some("Could not load countries."));
    assert_eq!(
        c.error(Level::City),
        Some("Could not load cities for Lookingglass.")
    );
}

#[test]
fn retry_reloads_failed_level() {
    let mut c = Cascade::new(&LocationSelection::empty());
    let countries = single(c.mount());
    assert_eq!(
        c.retry(Level::Country),
        Err(SelectorError::NothingToRetry {
            level: Level::Country
        })
    );
    c.complete(&countries, Err(RequestFailure::validation("offline")));

    let again = c.retry(Level::Country).unwrap();
    assert_eq!(again.query, LocationQuery::Countries);
    assert!(again.seq > countries.seq);
    assert_eq!(c.error(Level::Country), None);
    c.complete(&again, Ok(options(&["Wonderland"])));
    assert_eq!(c.status(Level::Country), LevelStatus::Ready);
    assert_eq!(c.latest_error(), None);
}

#[test]
fn prefilled_selection_survives_mount_loads() {
    let initial = LocationSelection::from_parts(Some("Wonderland"), Some("Lookingglass"), Some("Tulgey Wood"));
    let mut c = Cascade::new(&initial);
    let fetches = c.mount();
    let queries: Vec<&LocationQuery> = fetches.iter().map(|f| &f.query).collect();
    assert_eq!(queries.len(), 3);
    assert_eq!(c.selection(), initial);

    c.complete(&fetches[0], Ok(options(&["Wonderland"])));
    c.complete(&fetches[1], Ok(options(&["Lookingglass"])));
    c.complete(&fetches[2], Ok(options(&["Tulgey Wood"])));
    assert_eq!(c.selection(), initial);
    assert!(c.is_settled());
}

#[test]
fn prefilled_value_missing_from_options_is_dropped() {
    let initial = LocationSelection::from_parts(Some("Wonderland"), Some("Atlantis"), Some("Tulgey Wood"));
    let mut c = Cascade::new(&initial);
    let fetches = c.mount();

    c.complete(&fetches[0], Ok(options(&["Wonderland"])));
    c.complete(&fetches[1], Ok(options(&["Lookingglass"])));
    // The city response belongs to the dropped state.
    assert!(!c.complete(&fetches[2], Ok(options(&["Tulgey Wood"]))));

    assert_eq!(
        c.selection(),
        LocationSelection::from_parts(Some("Wonderland"), None, None)
    );
    assert_eq!(c.status(Level::City), LevelStatus::Idle);
    assert_eq!(c.snapshot().state.option_names(), vec!["Lookingglass"]);
}

#[test]
fn failed_prefilled_country_disables_lower_levels() {
    let initial = LocationSelection::from_parts(Some("Wonderland"), Some("Lookingglass"), None);
    let mut c = Cascade::new(&initial);
    let fetches = c.mount();
    assert_eq!(fetches.len(), 3);

    c.complete(&fetches[0], Err(RequestFailure::validation("offline")));
    c.complete(&fetches[1], Ok(options(&["Lookingglass", "Heart"])));
    c.complete(&fetches[2], Ok(options(&["Tulgey Wood"])));

    assert_eq!(c.status(Level::Country), LevelStatus::Failed);
    assert_eq!(c.selection(), initial);
    for level in [Level::State, Level::City] {
        assert_eq!(
            c.disabled_reason(level),
            Some(DisabledReason::PrerequisiteFailed)
        );
        assert!(c.snapshot().level(level).disabled);
    }
    assert_eq!(
        c.select(Level::State, &value("Heart")),
        Err(SelectorError::Disabled {
            level: Level::State,
            reason: DisabledReason::PrerequisiteFailed
        })
    );
    assert_eq!(
        c.retry(Level::State),
        Err(SelectorError::NothingToRetry { level: Level::State })
    );
    assert_eq!(c.selection(), initial);

    // Retrying the country confirms the kept value and re-enables the levels below.
    let again = c.retry(Level::Country).unwrap();
    assert_eq!(c.selection(), initial);
    c.complete(&again, Ok(options(&["Wonderland"])));
    assert_eq!(c.disabled_reason(Level::State), None);
    assert_eq!(c.disabled_reason(Level::City), None);
}

#[test]
fn failed_prefilled_state_disables_city() {
    let initial = LocationSelection::from_parts(Some("Wonderland"), Some("Lookingglass"), Some("Tulgey Wood"));
    let mut c = Cascade::new(&initial);
    let fetches = c.mount();

    c.complete(&fetches[0], Ok(options(&["Wonderland"])));
    c.complete(&fetches[1], Err(RequestFailure::validation("offline")));
    c.complete(&fetches[2], Ok(options(&["Tulgey Wood", "Mome Rath"])));

    assert_eq!(c.disabled_reason(Level::State), Some(DisabledReason::NoOptions));
    assert_eq!(
        c.disabled_reason(Level::City),
        Some(DisabledReason::PrerequisiteFailed)
    );
    assert!(c.select(Level::City, &value("Mome Rath")).is_err());
    assert_eq!(c.selection(), initial);
}

#[test]
fn take_change_emits_once_per_distinct_triple() {
    let mut c = Cascade::new(&LocationSelection::empty());
    let countries = single(c.mount());
    assert_eq!(c.take_change(), Some(LocationSelection::empty()));
    assert_eq!(c.take_change(), None);

    c.complete(&countries, Ok(options(&["Wonderland"])));
    assert_eq!(c.take_change(), None);

    c.select(Level::Country, &value("Wonderland")).unwrap();
    assert_eq!(
        c.take_change(),
        Some(LocationSelection::from_parts(Some("Wonderland"), None, None))
    );
}

#[test]
fn switching_country_after_full_selection_emits_one_triple() {
    let mut c = fully_selected();
    c.take_change();

    c.select(Level::Country, &value("Oz")).unwrap();
    assert_eq!(
        c.take_change(),
        Some(LocationSelection::from_parts(Some("Oz"), None, None))
    );
    assert_eq!(c.take_change(), None);
}
