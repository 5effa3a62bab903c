//! Application state - single source of truth

use chrono::{DateTime, Local, NaiveDate, Utc};
use ratatui::layout::Rect;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

pub type CityId = u64;

/// Store-level error shown for every failed data-source operation.
pub const FETCH_ERROR: &str = "Something went wrong fetching data";

/// Format accepted by the trip form's date field.
pub const FORM_DATE_FORMAT: &str = "%d/%m/%Y";

/// Spinner frame interval.
pub const SPINNER_TICK_MS: u64 = 80;

/// A point on the map
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Position {
    pub lat: f64,
    pub lng: f64,
}

impl Position {
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }
}

/// A recorded visit
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct City {
    pub id: CityId,
    #[serde(default)]
    pub city_name: String,
    #[serde(default)]
    pub country: String,
    #[serde(default)]
    pub emoji: String,
    pub date: DateTime<Utc>,
    #[serde(default)]
    pub notes: String,
    pub position: Position,
}

/// A city as submitted by the trip form, before it has an id
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct CityDraft {
    pub city_name: String,
    pub country: String,
    pub emoji: String,
    pub date: DateTime<Utc>,
    pub notes: String,
    pub position: Position,
}

impl CityDraft {
    pub fn into_city(self, id: CityId) -> City {
        City {
            id,
            city_name: self.city_name,
            country: self.country,
            emoji: self.emoji,
            date: self.date,
            notes: self.notes,
            position: self.position,
        }
    }
}

/// A visited country, derived from the city list
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Country {
    pub country: String,
    pub emoji: String,
}

/// Which panel the sidebar shows
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub enum View {
    #[default]
    Cities,
    Countries,
    City,
    Form,
}

/// Which half of the screen receives keyboard input
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub enum Focus {
    #[default]
    Sidebar,
    Map,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub enum FormField {
    #[default]
    CityName,
    Date,
    Notes,
}

impl FormField {
    pub fn next(self) -> Self {
        match self {
            FormField::CityName => FormField::Date,
            FormField::Date => FormField::Notes,
            FormField::Notes => FormField::CityName,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            FormField::CityName => "City name",
            FormField::Date => "Date",
            FormField::Notes => "Notes",
        }
    }
}

/// Trip form, opened by a map click
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct FormState {
    pub position: Option<Position>,
    pub city_name: String,
    pub country: String,
    pub emoji: String,
    /// Raw text of the date field, `dd/mm/yyyy`
    pub date: String,
    pub notes: String,
    pub field: FormField,
    /// Geocoding in flight; independent of the store's loading flag
    pub is_geo_loading: bool,
    pub geo_error: Option<String>,
    /// Validation message from the last submit attempt
    pub invalid: Option<String>,
}

impl FormState {
    /// A fresh form for `position`, dated `today`.
    pub fn at(position: Position, today: NaiveDate) -> Self {
        Self {
            position: Some(position),
            date: today.format(FORM_DATE_FORMAT).to_string(),
            is_geo_loading: true,
            ..Default::default()
        }
    }

    pub fn value(&self, field: FormField) -> &str {
        match field {
            FormField::CityName => &self.city_name,
            FormField::Date => &self.date,
            FormField::Notes => &self.notes,
        }
    }

    pub fn value_mut(&mut self, field: FormField) -> &mut String {
        match field {
            FormField::CityName => &mut self.city_name,
            FormField::Date => &mut self.date,
            FormField::Notes => &mut self.notes,
        }
    }

    /// Validate the form and build the draft to submit.
    pub fn draft(&self) -> Result<CityDraft, String> {
        let Some(position) = self.position else {
            return Err("Please click somewhere on the map".into());
        };
        let city_name = self.city_name.trim();
        if city_name.is_empty() {
            return Err("Enter a city name".into());
        }
        let date = NaiveDate::parse_from_str(self.date.trim(), FORM_DATE_FORMAT)
            .map_err(|_| "Enter the date as dd/mm/yyyy".to_string())?;
        let date = date
            .and_hms_opt(0, 0, 0)
            .map(|naive| naive.and_utc())
            .ok_or_else(|| "Enter the date as dd/mm/yyyy".to_string())?;

        Ok(CityDraft {
            city_name: city_name.to_string(),
            country: self.country.clone(),
            emoji: self.emoji.clone(),
            date,
            notes: self.notes.trim().to_string(),
            position,
        })
    }
}

pub const MIN_ZOOM: u8 = 1;
pub const MAX_ZOOM: u8 = 6;

/// Map viewport: what part of the world is visible and where the cursor is
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct MapView {
    pub center: Position,
    pub zoom: u8,
    pub cursor: Position,
}

impl Default for MapView {
    fn default() -> Self {
        let center = Position::new(20.0, 0.0);
        Self {
            center,
            zoom: MIN_ZOOM,
            cursor: center,
        }
    }
}

impl MapView {
    fn scale(&self) -> f64 {
        f64::from(1u32 << (self.zoom.clamp(MIN_ZOOM, MAX_ZOOM) - 1))
    }

    /// Half the visible span as (longitude, latitude) degrees.
    pub fn half_span(&self) -> (f64, f64) {
        let scale = self.scale();
        (180.0 / scale, 90.0 / scale)
    }

    pub fn x_bounds(&self) -> [f64; 2] {
        let (half_lng, _) = self.half_span();
        [self.center.lng - half_lng, self.center.lng + half_lng]
    }

    pub fn y_bounds(&self) -> [f64; 2] {
        let (_, half_lat) = self.half_span();
        [self.center.lat - half_lat, self.center.lat + half_lat]
    }

    /// Degrees the cursor moves per key press.
    pub fn cursor_step(&self) -> f64 {
        10.0 / self.scale()
    }

    /// Project a terminal cell inside `area` onto the map.
    pub fn position_at(&self, area: Rect, column: u16, row: u16) -> Option<Position> {
        if area.width == 0
            || area.height == 0
            || column < area.x
            || row < area.y
            || column >= area.x + area.width
            || row >= area.y + area.height
        {
            return None;
        }

        let [west, east] = self.x_bounds();
        let [south, north] = self.y_bounds();
        let fx = (f64::from(column - area.x) + 0.5) / f64::from(area.width);
        let fy = (f64::from(row - area.y) + 0.5) / f64::from(area.height);

        Some(Position {
            lat: (north - fy * (north - south)).clamp(-90.0, 90.0),
            lng: (west + fx * (east - west)).clamp(-180.0, 180.0),
        })
    }

    pub fn focus(&mut self, position: Position) {
        self.center = position;
        self.cursor = position;
    }

    pub fn move_cursor(&mut self, d_lat: i8, d_lng: i8) {
        let step = self.cursor_step();
        self.cursor.lat = (self.cursor.lat + f64::from(d_lat) * step).clamp(-90.0, 90.0);
        self.cursor.lng = (self.cursor.lng + f64::from(d_lng) * step).clamp(-180.0, 180.0);

        // Scroll the viewport once the cursor leaves it
        let [west, east] = self.x_bounds();
        let [south, north] = self.y_bounds();
        if self.cursor.lng < west || self.cursor.lng > east {
            self.center.lng = self.cursor.lng;
        }
        if self.cursor.lat < south || self.cursor.lat > north {
            self.center.lat = self.cursor.lat;
        }
    }
}

/// Application state - everything the UI needs to render
#[derive(Clone, Debug, tui_dispatch::DebugState, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct AppState {
    // --- City store ---
    #[debug(section = "Store", label = "Cities", debug_fmt)]
    pub cities: Vec<City>,

    #[debug(section = "Store", label = "Loading")]
    pub is_loading: bool,

    /// Most recently loaded or created city; `None` when cleared
    #[debug(section = "Store", label = "Current", debug_fmt)]
    pub current_city: Option<City>,

    /// Last store error, empty when none
    #[debug(section = "Store", label = "Error")]
    pub error: String,

    // --- Navigation ---
    #[debug(section = "UI", label = "View", debug_fmt)]
    pub view: View,

    #[debug(section = "UI", label = "Focus", debug_fmt)]
    pub focus: Focus,

    /// Highlighted row in the city/country list
    #[debug(section = "UI", label = "Selected")]
    pub selected: usize,

    #[debug(section = "Form", label = "Form", debug_fmt)]
    pub form: FormState,

    #[debug(section = "Map", label = "Viewport", debug_fmt)]
    pub map: MapView,

    // --- Internals (skipped) ---
    #[debug(skip)]
    pub today: NaiveDate,

    /// Last known terminal size, used to route mouse clicks
    #[debug(skip)]
    pub terminal_size: (u16, u16),

    #[debug(skip)]
    pub tick_count: u32,

    /// Id of the lookup still in flight; results for anything else are stale
    #[debug(skip)]
    pub pending_lookup: Option<CityId>,

    /// Sequence number handed to each create request
    #[debug(skip)]
    pub create_seq: u64,
}

impl AppState {
    pub fn new(today: NaiveDate) -> Self {
        Self {
            cities: Vec::new(),
            is_loading: false,
            current_city: None,
            error: String::new(),
            view: View::default(),
            focus: Focus::default(),
            selected: 0,
            form: FormState::default(),
            map: MapView::default(),
            today,
            terminal_size: (120, 40),
            tick_count: 0,
            pending_lookup: None,
            create_seq: 0,
        }
    }

    pub fn current_city_id(&self) -> Option<CityId> {
        self.current_city.as_ref().map(|city| city.id)
    }

    /// Visited countries, first occurrence wins.
    pub fn countries(&self) -> Vec<Country> {
        let mut countries: Vec<Country> = Vec::new();
        for city in &self.cities {
            if !countries.iter().any(|c| c.country == city.country) {
                countries.push(Country {
                    country: city.country.clone(),
                    emoji: city.emoji.clone(),
                });
            }
        }
        countries
    }

    /// Length of the list currently shown in the sidebar.
    pub fn list_len(&self) -> usize {
        match self.view {
            View::Cities => self.cities.len(),
            View::Countries => self.countries().len(),
            View::City | View::Form => 0,
        }
    }

    pub fn selected_city(&self) -> Option<&City> {
        match self.view {
            View::Cities => self.cities.get(self.selected),
            _ => None,
        }
    }

    pub fn next_free_id(&self) -> CityId {
        self.cities
            .iter()
            .map(|city| city.id)
            .max()
            .map_or(1, |max| max + 1)
    }

    pub fn spinner_active(&self) -> bool {
        self.is_loading || self.form.is_geo_loading
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(Local::now().date_naive())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn city(id: CityId, name: &str, country: &str) -> City {
        City {
            id,
            city_name: name.into(),
            country: country.into(),
            emoji: String::new(),
            date: DateTime::<Utc>::default(),
            notes: String::new(),
            position: Position::new(0.0, 0.0),
        }
    }

    #[test]
    fn test_countries_dedupe_keeps_first_seen_order() {
        let state = AppState {
            cities: vec![
                city(1, "Lisbon", "Portugal"),
                city(2, "Madrid", "Spain"),
                city(3, "Porto", "Portugal"),
                city(4, "Berlin", "Germany"),
            ],
            ..Default::default()
        };

        let names: Vec<_> = state.countries().into_iter().map(|c| c.country).collect();
        assert_eq!(names, vec!["Portugal", "Spain", "Germany"]);
    }

    #[test]
    fn test_city_json_uses_camel_case() {
        let json = r#"{
            "cityName": "Helsinki",
            "country": "Finland",
            "emoji": "🇫🇮",
            "date": "2027-02-12T09:24:11.863Z",
            "position": { "lat": 60.17, "lng": 24.94 },
            "id": 1
        }"#;

        let city: City = serde_json::from_str(json).unwrap();
        assert_eq!(city.id, 1);
        assert_eq!(city.city_name, "Helsinki");
        assert_eq!(city.notes, "");
        assert_eq!(city.position, Position::new(60.17, 24.94));
    }

    #[test]
    fn test_form_draft_requires_name_and_date() {
        let today = NaiveDate::from_ymd_opt(2026, 10, 16).unwrap();
        let mut form = FormState::at(Position::new(48.85, 2.35), today);
        assert_eq!(form.date, "16/10/2026");
        assert!(form.draft().is_err());

        form.city_name = "Paris".into();
        let draft = form.draft().unwrap();
        assert_eq!(draft.city_name, "Paris");
        assert_eq!(draft.date.date_naive(), today);

        form.date = "2026-10-16".into();
        assert!(form.draft().is_err());
    }

    #[test]
    fn test_position_at_centre_is_viewport_centre() {
        let map = MapView::default();
        let area = Rect::new(10, 0, 41, 21);

        let pos = map.position_at(area, 30, 10).unwrap();
        assert!((pos.lng - map.center.lng).abs() < 1e-9);
        assert!((pos.lat - map.center.lat).abs() < 1e-9);

        assert!(map.position_at(area, 9, 10).is_none());
        assert!(map.position_at(area, 51, 10).is_none());
    }

    #[test]
    fn test_position_at_corners() {
        let map = MapView {
            center: Position::new(0.0, 0.0),
            zoom: 1,
            cursor: Position::new(0.0, 0.0),
        };
        let area = Rect::new(0, 0, 360, 180);

        let top_left = map.position_at(area, 0, 0).unwrap();
        assert!((top_left.lng - -179.5).abs() < 1e-9);
        assert!((top_left.lat - 89.5).abs() < 1e-9);
    }

    #[test]
    fn test_zoom_halves_span() {
        let mut map = MapView::default();
        let (lng1, lat1) = map.half_span();
        map.zoom = 2;
        let (lng2, lat2) = map.half_span();
        assert_eq!(lng1, lng2 * 2.0);
        assert_eq!(lat1, lat2 * 2.0);
    }
}
