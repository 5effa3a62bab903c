//! Reducer - pure function: (state, action) -> DispatchResult

use tui_dispatch::DispatchResult;

use crate::action::Action;
use crate::effect::Effect;
use crate::state::{AppState, CityDraft, Focus, FormState, View, MAX_ZOOM, MIN_ZOOM};

/// The reducer handles all state transitions
pub fn reducer(state: &mut AppState, action: Action) -> DispatchResult<Effect> {
    match action {
        // ===== City store =====
        Action::CitiesFetch => {
            state.is_loading = true;
            DispatchResult::changed_with(Effect::LoadCities)
        }

        Action::CitiesDidLoad(cities) => {
            state.cities = cities;
            state.is_loading = false;
            clamp_selection(state);
            DispatchResult::changed()
        }

        Action::CitiesDidReject(message) => {
            state.is_loading = false;
            state.error = message;
            DispatchResult::changed()
        }

        Action::CityFetch(id) => {
            if state.current_city_id() == Some(id) {
                return DispatchResult::unchanged();
            }
            state.is_loading = true;
            state.pending_lookup = Some(id);
            DispatchResult::changed_with(Effect::LoadCity { id })
        }

        Action::CityDidLoad { id, city } => {
            if state.pending_lookup != Some(id) {
                return DispatchResult::unchanged();
            }
            state.pending_lookup = None;
            if let Some(city) = &city {
                state.map.focus(city.position);
            }
            state.current_city = city;
            state.is_loading = false;
            DispatchResult::changed()
        }

        Action::CityCreate(draft) => {
            state.is_loading = true;
            DispatchResult::changed_with(create(state, draft))
        }

        Action::CityDidCreate(mut city) => {
            if state.cities.iter().any(|c| c.id == city.id) {
                city.id = state.next_free_id();
            }
            state.map.focus(city.position);
            state.cities.push(city.clone());
            state.current_city = Some(city);
            state.is_loading = false;
            if state.view == View::Cities {
                state.selected = state.cities.len() - 1;
            }
            DispatchResult::changed()
        }

        Action::CityDelete(id) => {
            state.is_loading = true;
            DispatchResult::changed_with(Effect::DeleteCity { id })
        }

        Action::CityDidDelete(id) => {
            if state.pending_lookup == Some(id) {
                state.pending_lookup = None;
            }
            state.cities.retain(|city| city.id != id);
            state.current_city = None;
            state.is_loading = false;
            if state.view == View::City {
                state.view = View::Cities;
            }
            clamp_selection(state);
            DispatchResult::changed()
        }

        // ===== Geocoding =====
        Action::GeocodeDidLoad { position, place } => {
            if state.form.position != Some(position) {
                return DispatchResult::unchanged();
            }
            state.form.is_geo_loading = false;
            state.form.geo_error = None;
            state.form.emoji = place.emoji();
            state.form.city_name = place.city_name;
            state.form.country = place.country;
            DispatchResult::changed()
        }

        Action::GeocodeDidError { position, message } => {
            if state.form.position != Some(position) {
                return DispatchResult::unchanged();
            }
            state.form.is_geo_loading = false;
            state.form.geo_error = Some(message);
            DispatchResult::changed()
        }

        // ===== Map =====
        Action::MapClick(position) => {
            state.view = View::Form;
            state.form = FormState::at(position, state.today);
            state.map.focus(position);
            DispatchResult::changed_with(Effect::ReverseGeocode { position })
        }

        Action::MapCursorMove { d_lat, d_lng } => {
            if d_lat == 0 && d_lng == 0 {
                return DispatchResult::unchanged();
            }
            state.map.move_cursor(d_lat, d_lng);
            DispatchResult::changed()
        }

        Action::MapZoomIn => {
            if state.map.zoom >= MAX_ZOOM {
                return DispatchResult::unchanged();
            }
            state.map.zoom += 1;
            state.map.center = state.map.cursor;
            DispatchResult::changed()
        }

        Action::MapZoomOut => {
            if state.map.zoom <= MIN_ZOOM {
                return DispatchResult::unchanged();
            }
            state.map.zoom -= 1;
            DispatchResult::changed()
        }

        // ===== Trip form =====
        Action::FormInput(field, value) => {
            if state.view != View::Form {
                return DispatchResult::unchanged();
            }
            *state.form.value_mut(field) = value;
            state.form.invalid = None;
            DispatchResult::changed()
        }

        Action::FormFieldNext => {
            if state.view != View::Form {
                return DispatchResult::unchanged();
            }
            state.form.field = state.form.field.next();
            DispatchResult::changed()
        }

        Action::FormSubmit => {
            if state.view != View::Form
                || state.form.is_geo_loading
                || state.form.geo_error.is_some()
            {
                return DispatchResult::unchanged();
            }
            match state.form.draft() {
                Ok(draft) => {
                    state.is_loading = true;
                    state.form = FormState::default();
                    state.view = View::Cities;
                    state.focus = Focus::Sidebar;
                    DispatchResult::changed_with(create(state, draft))
                }
                Err(message) => {
                    state.form.invalid = Some(message);
                    DispatchResult::changed()
                }
            }
        }

        Action::FormCancel => {
            if state.view != View::Form {
                return DispatchResult::unchanged();
            }
            state.form = FormState::default();
            state.view = View::Cities;
            clamp_selection(state);
            DispatchResult::changed()
        }

        // ===== Navigation =====
        Action::NavShow(view) => {
            if state.view == view {
                return DispatchResult::unchanged();
            }
            if state.view == View::Form {
                state.form = FormState::default();
            }
            state.view = view;
            if matches!(view, View::Cities | View::Countries) {
                state.selected = 0;
            }
            DispatchResult::changed()
        }

        Action::NavBack => {
            if state.view != View::City {
                return DispatchResult::unchanged();
            }
            state.view = View::Cities;
            clamp_selection(state);
            DispatchResult::changed()
        }

        Action::NavFocus(focus) => {
            if state.focus == focus {
                return DispatchResult::unchanged();
            }
            state.focus = focus;
            DispatchResult::changed()
        }

        Action::NavSelect(index) => {
            if index >= state.list_len() || index == state.selected {
                return DispatchResult::unchanged();
            }
            state.selected = index;
            if let Some(position) = state.selected_city().map(|city| city.position) {
                state.map.focus(position);
            }
            DispatchResult::changed()
        }

        // ===== UI =====
        Action::UiTerminalResize(width, height) => {
            state.terminal_size = (width, height);
            DispatchResult::changed()
        }

        // ===== Global =====
        Action::Tick => {
            if state.spinner_active() {
                state.tick_count = state.tick_count.wrapping_add(1);
                DispatchResult::changed()
            } else {
                DispatchResult::unchanged()
            }
        }

        Action::Quit => DispatchResult::unchanged(),
    }
}

fn create(state: &mut AppState, draft: CityDraft) -> Effect {
    state.create_seq += 1;
    Effect::CreateCity {
        draft,
        seq: state.create_seq,
    }
}

fn clamp_selection(state: &mut AppState) {
    state.selected = state.selected.min(state.list_len().saturating_sub(1));
}
