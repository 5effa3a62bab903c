//! CityStore operations against in-memory sources

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use pretty_assertions::assert_eq;
use worldwise::{
    api::{GeocodingError, Place, ReverseGeocoder},
    effect::Services,
    source::{CitySource, JsonFile, SourceError},
    state::{AppState, City, CityDraft, Position, FETCH_ERROR},
    store::CityStore,
};

struct Fixed(Vec<City>);

#[async_trait]
impl CitySource for Fixed {
    async fn fetch_all(&self) -> Result<Vec<City>, SourceError> {
        Ok(self.0.clone())
    }
}

struct Broken;

#[async_trait]
impl CitySource for Broken {
    async fn fetch_all(&self) -> Result<Vec<City>, SourceError> {
        Err(serde_json::from_str::<Vec<City>>("{").unwrap_err().into())
    }
}

struct Ocean;

#[async_trait]
impl ReverseGeocoder for Ocean {
    async fn reverse(&self, _lat: f64, _lng: f64) -> Result<Place, GeocodingError> {
        Err(GeocodingError::NoCountry)
    }
}

fn helsinki() -> City {
    City {
        id: 41220917,
        city_name: "Helsinki".into(),
        country: "Finland".into(),
        emoji: "🇫🇮".into(),
        date: DateTime::<Utc>::default(),
        notes: String::new(),
        position: Position::new(60.17, 24.94),
    }
}

fn paris() -> CityDraft {
    CityDraft {
        city_name: "Paris".into(),
        country: "France".into(),
        emoji: "🇫🇷".into(),
        date: DateTime::<Utc>::default(),
        notes: "Louvre".into(),
        position: Position::new(48.85, 2.35),
    }
}

fn store_with(source: impl CitySource + 'static) -> CityStore {
    let today = NaiveDate::from_ymd_opt(2026, 10, 16).unwrap();
    CityStore::new(
        AppState::new(today),
        Services::new(Arc::new(source), Arc::new(Ocean)),
    )
}

#[tokio::test]
async fn test_load_all_settles() {
    let mut store = store_with(Fixed(vec![helsinki()]));

    store.load_all().await;

    assert_eq!(store.state().cities, vec![helsinki()]);
    assert!(!store.state().is_loading);
    assert_eq!(store.state().error, "");
}

#[tokio::test]
async fn test_load_all_failure_sets_error() {
    let mut store = store_with(Broken);

    store.load_all().await;

    assert!(store.state().cities.is_empty());
    assert!(!store.state().is_loading);
    assert_eq!(store.state().error, FETCH_ERROR);
}

#[tokio::test]
async fn test_load_one_selects_city() {
    let mut store = store_with(Fixed(vec![helsinki()]));

    assert!(store.load_one(41220917).await);

    assert_eq!(store.state().current_city, Some(helsinki()));
    assert!(!store.state().is_loading);
}

#[tokio::test]
async fn test_load_one_failure_sets_error() {
    let mut store = store_with(Broken);

    assert!(store.load_one(41220917).await);

    assert_eq!(store.state().current_city, None);
    assert!(!store.state().is_loading);
    assert_eq!(store.state().error, FETCH_ERROR);
}

#[tokio::test]
async fn test_load_one_current_city_is_noop() {
    let mut store = store_with(Fixed(vec![helsinki()]));
    store.load_one(41220917).await;
    let before = store.state().clone();

    assert!(!store.load_one(41220917).await);

    assert_eq!(store.state().current_city, before.current_city);
    assert_eq!(store.state().is_loading, before.is_loading);
}

#[tokio::test]
async fn test_create_on_empty_store() {
    let mut store = store_with(Fixed(Vec::new()));

    store.create(paris()).await;

    let state = store.state();
    assert_eq!(state.cities.len(), 1);
    assert_eq!(state.cities[0].city_name, "Paris");
    assert!(state.cities[0].id > 0);
    assert_eq!(state.current_city.as_ref(), Some(&state.cities[0]));
    assert!(!state.is_loading);
}

#[tokio::test]
async fn test_created_ids_are_unique() {
    let mut store = store_with(Fixed(Vec::new()));

    store.create(paris()).await;
    store.create(paris()).await;

    let ids: Vec<_> = store.state().cities.iter().map(|c| c.id).collect();
    assert_eq!(ids.len(), 2);
    assert_ne!(ids[0], ids[1]);
}

#[tokio::test]
async fn test_delete_after_load() {
    let mut store = store_with(Fixed(vec![helsinki()]));
    store.load_all().await;
    store.load_one(41220917).await;

    store.delete(41220917).await;

    let state = store.into_state();
    assert!(state.cities.is_empty());
    assert_eq!(state.current_city, None);
    assert!(!state.is_loading);
}

#[tokio::test]
async fn test_bundled_sample_data_loads() {
    let path = concat!(env!("CARGO_MANIFEST_DIR"), "/data/cities.json");
    let mut store = store_with(JsonFile::new(path));

    store.load_all().await;

    assert_eq!(store.state().error, "");
    assert!(!store.state().cities.is_empty());
    assert!(store.state().cities.iter().any(|c| c.city_name == "Lisbon"));
}
