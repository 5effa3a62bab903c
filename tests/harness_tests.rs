//! Flow tests using EffectStoreTestHarness
//!
//! Effects are drained and their results fed back with `complete_action`,
//! the way the runtime would after a task finishes.

use chrono::{DateTime, NaiveDate, Utc};
use tui_dispatch::testing::*;
use worldwise::{
    action::Action,
    api::Place,
    effect::Effect,
    reducer::reducer,
    state::{AppState, City, Position, View, FETCH_ERROR},
    ui,
};

fn initial_state() -> AppState {
    AppState::new(NaiveDate::from_ymd_opt(2026, 10, 16).unwrap())
}

fn helsinki() -> City {
    City {
        id: 1,
        city_name: "Helsinki".into(),
        country: "Finland".into(),
        emoji: "🇫🇮".into(),
        date: DateTime::<Utc>::default(),
        notes: String::new(),
        position: Position::new(60.17, 24.94),
    }
}

#[test]
fn test_initial_load_flow() {
    let mut harness = EffectStoreTestHarness::new(initial_state(), reducer);
    harness.assert_state(|s| s.cities.is_empty() && !s.is_loading && s.current_city.is_none());

    harness.dispatch_collect(Action::CitiesFetch);
    harness.assert_state(|s| s.is_loading);

    let effects = harness.drain_effects();
    effects.effects_count(1);
    effects.effects_first_matches(|e| matches!(e, Effect::LoadCities));

    harness.complete_action(Action::CitiesDidLoad(vec![helsinki()]));
    let (changed, total) = harness.process_emitted();
    assert_eq!(total, 1);
    assert_eq!(changed, 1);

    harness.assert_state(|s| s.cities.len() == 1);
    harness.assert_state(|s| !s.is_loading);
}

#[test]
fn test_failed_load_flow() {
    let mut harness = EffectStoreTestHarness::new(initial_state(), reducer);

    harness.dispatch_collect(Action::CitiesFetch);
    harness.complete_action(Action::CitiesDidReject(FETCH_ERROR.into()));
    harness.process_emitted();

    harness.assert_state(|s| !s.is_loading);
    harness.assert_state(|s| s.error == FETCH_ERROR);
}

#[test]
fn test_click_geocode_submit_flow() {
    let mut harness = EffectStoreTestHarness::new(initial_state(), reducer);
    let position = Position::new(48.85, 2.35);

    harness.dispatch_collect(Action::MapClick(position));
    harness.assert_state(|s| s.view == View::Form && s.form.is_geo_loading);
    let effects = harness.drain_effects();
    effects.effects_first_matches(
        |e| matches!(e, Effect::ReverseGeocode { position: p } if *p == position),
    );

    harness.complete_action(Action::GeocodeDidLoad {
        position,
        place: Place {
            city_name: "Paris".into(),
            country: "France".into(),
            country_code: "FR".into(),
        },
    });
    harness.process_emitted();
    harness.assert_state(|s| s.form.city_name == "Paris" && !s.form.is_geo_loading);

    harness.dispatch_collect(Action::FormSubmit);
    let effects = harness.drain_effects();
    effects.effects_count(1);
    effects.effects_first_matches(|e| matches!(e, Effect::CreateCity { .. }));
    harness.assert_state(|s| s.view == View::Cities && s.is_loading);
}

#[test]
fn test_load_one_short_circuit_emits_nothing() {
    let state = AppState {
        current_city: Some(helsinki()),
        ..initial_state()
    };
    let mut harness = EffectStoreTestHarness::new(state, reducer);

    harness.dispatch_collect(Action::CityFetch(1));

    harness.drain_effects().effects_empty();
    harness.assert_state(|s| !s.is_loading && s.current_city == Some(helsinki()));
}

#[test]
fn test_every_store_intent_emits_exactly_one_effect() {
    let mut harness = EffectStoreTestHarness::new(initial_state(), reducer);

    let results = harness.dispatch_all([
        Action::CitiesFetch,
        Action::CityFetch(9),
        Action::CityDelete(9),
    ]);
    assert_eq!(results, vec![true, true, true]);

    let effects = harness.drain_effects();
    effects.effects_count(3);
    effects.effects_none_match(|e| matches!(e, Effect::ReverseGeocode { .. }));
}

#[test]
fn test_render_after_load_lists_city() {
    let mut harness = EffectStoreTestHarness::new(initial_state(), reducer);

    harness.dispatch_collect(Action::CitiesFetch);
    harness.complete_action(Action::CitiesDidLoad(vec![helsinki()]));
    harness.process_emitted();

    let output = harness.render_plain(120, 30, |frame, area, state| {
        ui::render(frame, area, state);
    });

    assert!(
        output.contains("Helsinki"),
        "Loaded city should be listed:\n{}",
        output
    );
}

#[test]
fn test_render_while_loading_shows_spinner_text() {
    let mut harness = EffectStoreTestHarness::new(initial_state(), reducer);

    harness.dispatch_collect(Action::CitiesFetch);

    let output = harness.render_plain(120, 30, |frame, area, state| {
        ui::render(frame, area, state);
    });

    assert!(output.contains("Loading"), "Spinner expected:\n{}", output);
}
