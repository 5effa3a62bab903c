//! WorldWise - a travel log on a terminal world map
//!
//! Click the map, the place is reverse-geocoded, and the visit is recorded
//! in a single reducer-driven store.

pub mod action;
pub mod api;
pub mod effect;
pub mod flag;
pub mod reducer;
pub mod source;
pub mod state;
pub mod store;
pub mod ui;
