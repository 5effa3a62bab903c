//! Rendering and input routing
//!
//! Layout is a pure function of the terminal size so mouse clicks can be
//! mapped back onto the map without keeping widget state around.

mod form;
mod map;
mod sidebar;

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEventKind};
use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Color, Style},
    Frame,
};
use tui_dispatch::{Component, EventKind, EventOutcome};
use tui_dispatch_components::{
    StatusBar, StatusBarHint, StatusBarProps, StatusBarSection, StatusBarStyle,
};

use crate::action::Action;
use crate::state::{AppState, Focus, View};

pub(crate) const TEXT_MAIN: Color = Color::Rgb(236, 236, 228);
pub(crate) const TEXT_DIM: Color = Color::Rgb(150, 156, 160);
pub(crate) const ACCENT: Color = Color::Rgb(0, 196, 154);
pub(crate) const ACCENT_ALT: Color = Color::Rgb(255, 180, 0);
pub(crate) const ERROR: Color = Color::Rgb(232, 96, 96);
pub(crate) const BORDER: Color = Color::Rgb(66, 72, 78);

const SPINNER: [&str; 10] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

pub(crate) fn spinner_frame(tick_count: u32) -> &'static str {
    SPINNER[tick_count as usize % SPINNER.len()]
}

/// Screen regions
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AppLayout {
    pub sidebar: Rect,
    pub map: Rect,
    pub status: Rect,
}

pub fn layout(area: Rect) -> AppLayout {
    let rows = Layout::vertical([Constraint::Min(1), Constraint::Length(1)]).split(area);
    let cols = Layout::horizontal([Constraint::Percentage(38), Constraint::Min(10)]).split(rows[0]);
    AppLayout {
        sidebar: cols[0],
        map: cols[1],
        status: rows[1],
    }
}

pub fn render(frame: &mut Frame, area: Rect, state: &AppState) {
    let regions = layout(area);
    sidebar::render(frame, regions.sidebar, state);
    map::render(frame, regions.map, state);
    render_status(frame, regions.status, state);
}

fn render_status(frame: &mut Frame, area: Rect, state: &AppState) {
    let hints: Vec<StatusBarHint> = match (state.view, state.focus) {
        (View::Form, _) => vec![
            StatusBarHint::new("tab", "next field"),
            StatusBarHint::new("enter", "add"),
            StatusBarHint::new("esc", "back"),
        ],
        (_, Focus::Map) => vec![
            StatusBarHint::new("arrows", "move"),
            StatusBarHint::new("enter", "pick"),
            StatusBarHint::new("+/-", "zoom"),
            StatusBarHint::new("tab", "sidebar"),
        ],
        (View::City, _) => vec![
            StatusBarHint::new("esc", "back"),
            StatusBarHint::new("d", "delete"),
            StatusBarHint::new("tab", "map"),
            StatusBarHint::new("q", "quit"),
        ],
        _ => vec![
            StatusBarHint::new("c/n", "cities/countries"),
            StatusBarHint::new("enter", "open"),
            StatusBarHint::new("d", "delete"),
            StatusBarHint::new("tab", "map"),
            StatusBarHint::new("q", "quit"),
        ],
    };

    let mut status_bar = StatusBar::new();
    <StatusBar as Component<Action>>::render(
        &mut status_bar,
        frame,
        area,
        StatusBarProps {
            left: StatusBarSection::empty(),
            center: StatusBarSection::hints(&hints),
            right: StatusBarSection::empty(),
            style: StatusBarStyle::default(),
            is_focused: false,
        },
    );
}

pub fn handle_event(event: &EventKind, state: &AppState) -> EventOutcome<Action> {
    match event {
        EventKind::Resize(width, height) => {
            EventOutcome::action(Action::UiTerminalResize(*width, *height)).with_render()
        }
        EventKind::Key(key) => handle_key(*key, state),
        EventKind::Mouse(mouse) => {
            if mouse.kind != MouseEventKind::Down(MouseButton::Left) {
                return EventOutcome::ignored();
            }
            match map::click_position(screen_layout(state).map, state, mouse.column, mouse.row) {
                Some(position) => EventOutcome::action(Action::MapClick(position)),
                None => EventOutcome::ignored(),
            }
        }
        EventKind::Scroll {
            column, row, delta, ..
        } => {
            if *delta == 0 {
                return EventOutcome::ignored();
            }
            match scroll_zoom(state, *column, *row, *delta < 0) {
                Some(action) => EventOutcome::action(action),
                None => EventOutcome::ignored(),
            }
        }
        _ => EventOutcome::ignored(),
    }
}

/// Layout of the last known terminal size.
fn screen_layout(state: &AppState) -> AppLayout {
    let (width, height) = state.terminal_size;
    layout(Rect::new(0, 0, width, height))
}

/// Wheel over the map zooms it; anywhere else is ignored.
fn scroll_zoom(state: &AppState, column: u16, row: u16, zoom_in: bool) -> Option<Action> {
    let map_area = map::inner_area(screen_layout(state).map);
    if !map_area.contains(ratatui::layout::Position::new(column, row)) {
        return None;
    }
    Some(if zoom_in {
        Action::MapZoomIn
    } else {
        Action::MapZoomOut
    })
}

fn handle_key(key: KeyEvent, state: &AppState) -> EventOutcome<Action> {
    if key.kind != KeyEventKind::Press {
        return EventOutcome::ignored();
    }
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return EventOutcome::action(Action::Quit);
    }

    match (state.view, state.focus) {
        (View::Form, _) => form::handle_key(key, state),
        (_, Focus::Map) => map::handle_key(key, state),
        _ => sidebar::handle_key(key, state),
    }
}

pub(crate) fn dim() -> Style {
    Style::default().fg(TEXT_DIM)
}
