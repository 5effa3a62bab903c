use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    symbols::Marker,
    text::{Line, Span},
    widgets::{
        canvas::{Canvas, Map as WorldMap, MapResolution},
        Block, BorderType, Borders,
    },
    Frame,
};
use tui_dispatch::EventOutcome;

use super::{ACCENT, ACCENT_ALT, BORDER, TEXT_MAIN};
use crate::action::Action;
use crate::state::{AppState, Focus, Position, View};

const LAND: Color = Color::Rgb(96, 132, 110);

fn map_block(state: &AppState) -> Block<'static> {
    let border = if state.focus == Focus::Map {
        ACCENT
    } else {
        BORDER
    };
    let title = format!(
        " {:.2}°, {:.2}° · zoom {} ",
        state.map.cursor.lat, state.map.cursor.lng, state.map.zoom
    );
    Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(border))
        .title(title)
}

/// The drawable map area inside `area`.
pub(super) fn inner_area(area: Rect) -> Rect {
    Block::default().borders(Borders::ALL).inner(area)
}

/// Map a mouse click inside the map panel to coordinates.
pub(super) fn click_position(area: Rect, state: &AppState, column: u16, row: u16) -> Option<Position> {
    state.map.position_at(inner_area(area), column, row)
}

pub(super) fn render(frame: &mut Frame, area: Rect, state: &AppState) {
    let highlighted = match state.view {
        View::City => state.current_city_id(),
        View::Cities => state.selected_city().map(|city| city.id),
        _ => None,
    };
    let pending = match state.view {
        View::Form => state.form.position,
        _ => None,
    };

    let canvas = Canvas::default()
        .block(map_block(state))
        .marker(Marker::Braille)
        .x_bounds(state.map.x_bounds())
        .y_bounds(state.map.y_bounds())
        .paint(|ctx| {
            ctx.draw(&WorldMap {
                color: LAND,
                resolution: MapResolution::High,
            });
            ctx.layer();

            for city in &state.cities {
                let style = if Some(city.id) == highlighted {
                    Style::default().fg(ACCENT_ALT).add_modifier(Modifier::BOLD)
                } else {
                    Style::default().fg(TEXT_MAIN)
                };
                let label = if city.emoji.is_empty() {
                    format!("● {}", city.city_name)
                } else {
                    format!("{} {}", city.emoji, city.city_name)
                };
                ctx.print(
                    city.position.lng,
                    city.position.lat,
                    Line::from(Span::styled(label, style)),
                );
            }

            if let Some(position) = pending {
                ctx.print(
                    position.lng,
                    position.lat,
                    Line::from(Span::styled("◉", Style::default().fg(ACCENT))),
                );
            }

            if state.focus == Focus::Map {
                ctx.print(
                    state.map.cursor.lng,
                    state.map.cursor.lat,
                    Line::from(Span::styled(
                        "+",
                        Style::default().fg(ACCENT).add_modifier(Modifier::BOLD),
                    )),
                );
            }
        });

    frame.render_widget(canvas, area);
}

pub(super) fn handle_key(key: KeyEvent, state: &AppState) -> EventOutcome<Action> {
    let action = match key.code {
        KeyCode::Up | KeyCode::Char('k') => Action::MapCursorMove { d_lat: 1, d_lng: 0 },
        KeyCode::Down | KeyCode::Char('j') => Action::MapCursorMove { d_lat: -1, d_lng: 0 },
        KeyCode::Left | KeyCode::Char('h') => Action::MapCursorMove { d_lat: 0, d_lng: -1 },
        KeyCode::Right | KeyCode::Char('l') => Action::MapCursorMove { d_lat: 0, d_lng: 1 },
        KeyCode::Enter | KeyCode::Char(' ') => Action::MapClick(state.map.cursor),
        KeyCode::Char('+') | KeyCode::Char('=') => Action::MapZoomIn,
        KeyCode::Char('-') => Action::MapZoomOut,
        KeyCode::Tab | KeyCode::Esc => Action::NavFocus(Focus::Sidebar),
        KeyCode::Char('q') => Action::Quit,
        _ => return EventOutcome::ignored(),
    };
    EventOutcome::action(action)
}
