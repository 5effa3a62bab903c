//! Effects - side effects declared by the reducer, and how they resolve

use std::sync::Arc;

use chrono::Utc;
use tui_dispatch::TaskKey;

use crate::action::Action;
use crate::api::ReverseGeocoder;
use crate::source::CitySource;
use crate::state::{CityDraft, CityId, Position, FETCH_ERROR};

/// Side effects that can be triggered by actions
#[derive(Debug, Clone)]
pub enum Effect {
    /// Fetch the whole collection
    LoadCities,
    /// Fetch the collection and pick one city out of it
    LoadCity { id: CityId },
    /// Assign an id to a draft; `seq` tells concurrent creates apart
    CreateCity { draft: CityDraft, seq: u64 },
    /// Drop a city; there is no backend to tell
    DeleteCity { id: CityId },
    /// Resolve coordinates to a place
    ReverseGeocode { position: Position },
}

impl Effect {
    /// Task key. Loads and lookups replace the one still in flight;
    /// each create and delete gets its own key so none of them is dropped.
    pub fn task_key(&self) -> TaskKey {
        match self {
            Effect::LoadCities => TaskKey::new("cities"),
            Effect::LoadCity { .. } => TaskKey::new("city"),
            Effect::CreateCity { seq, .. } => TaskKey::new(format!("create_{seq}")),
            Effect::DeleteCity { id } => TaskKey::new(format!("delete_{id}")),
            Effect::ReverseGeocode { .. } => TaskKey::new("geocode"),
        }
    }
}

/// External collaborators the effects talk to
#[derive(Clone)]
pub struct Services {
    pub cities: Arc<dyn CitySource>,
    pub geocoder: Arc<dyn ReverseGeocoder>,
}

impl Services {
    pub fn new(cities: Arc<dyn CitySource>, geocoder: Arc<dyn ReverseGeocoder>) -> Self {
        Self { cities, geocoder }
    }
}

/// Run an effect to completion. Always yields the action that settles it.
pub async fn resolve(effect: Effect, services: &Services) -> Action {
    log::debug!("resolving {effect:?}");
    match effect {
        Effect::LoadCities => match services.cities.fetch_all().await {
            Ok(cities) => {
                log::info!("loaded {} cities", cities.len());
                Action::CitiesDidLoad(cities)
            }
            Err(e) => {
                log::warn!("loading cities failed: {e}");
                Action::CitiesDidReject(FETCH_ERROR.into())
            }
        },
        Effect::LoadCity { id } => match services.cities.fetch_one(id).await {
            Ok(city) => {
                if city.is_none() {
                    log::warn!("city {id} not found in data source");
                }
                Action::CityDidLoad { id, city }
            }
            Err(e) => {
                log::warn!("loading city {id} failed: {e}");
                Action::CitiesDidReject(FETCH_ERROR.into())
            }
        },
        Effect::CreateCity { draft, .. } => {
            let id = Utc::now().timestamp_millis().max(0) as CityId;
            Action::CityDidCreate(draft.into_city(id))
        }
        Effect::DeleteCity { id } => Action::CityDidDelete(id),
        Effect::ReverseGeocode { position } => {
            match services.geocoder.reverse(position.lat, position.lng).await {
                Ok(place) => Action::GeocodeDidLoad { position, place },
                Err(e) => {
                    log::debug!("geocoding {position:?} failed: {e}");
                    Action::GeocodeDidError {
                        position,
                        message: e.to_string(),
                    }
                }
            }
        }
    }
}
