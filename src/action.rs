//! Actions: store intents and results, form and map input, navigation

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::api::Place;
use crate::state::{City, CityDraft, CityId, Focus, FormField, Position, View};

#[derive(tui_dispatch::Action, Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
#[action(infer_categories)]
pub enum Action {
    // ===== Cities (whole collection) =====
    /// Intent: load every city from the data source
    CitiesFetch,

    /// Result: collection loaded
    CitiesDidLoad(Vec<City>),

    /// Result: any store operation failed
    CitiesDidReject(String),

    // ===== City (single record) =====
    /// Intent: select one city by id
    CityFetch(CityId),

    /// Result: lookup for `id` finished; `city` is `None` when the id is unknown
    CityDidLoad { id: CityId, city: Option<City> },

    /// Intent: record a new city
    CityCreate(CityDraft),

    /// Result: city appended with its assigned id
    CityDidCreate(City),

    /// Intent: remove a city
    CityDelete(CityId),

    /// Result: city removed
    CityDidDelete(CityId),

    // ===== Geocoding results =====
    /// Result: reverse geocoding resolved for `position`
    GeocodeDidLoad { position: Position, place: Place },

    /// Result: reverse geocoding failed for `position`
    GeocodeDidError { position: Position, message: String },

    // ===== Map =====
    /// The map was clicked at `position`; opens the trip form
    MapClick(Position),

    /// Move the keyboard cursor by whole steps
    MapCursorMove { d_lat: i8, d_lng: i8 },

    MapZoomIn,

    MapZoomOut,

    // ===== Trip form =====
    /// Replace the text of a form field
    FormInput(FormField, String),

    /// Move focus to the next form field
    FormFieldNext,

    FormSubmit,

    /// Leave the form without saving
    FormCancel,

    // ===== Navigation =====
    NavShow(View),

    /// Leave the city detail view
    NavBack,

    NavFocus(Focus),

    /// Highlight a row in the sidebar list
    NavSelect(usize),

    // ===== UI =====
    UiTerminalResize(u16, u16),

    // ===== Global =====
    /// Spinner animation tick
    Tick,

    Quit,
}
