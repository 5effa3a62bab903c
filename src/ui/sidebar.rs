use chrono::Datelike;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph, Wrap},
    Frame,
};
use tui_dispatch::EventOutcome;

use super::{dim, form, spinner_frame, ACCENT, ACCENT_ALT, BORDER, ERROR, TEXT_MAIN};
use crate::action::Action;
use crate::state::{AppState, City, Focus, View};

const EMPTY_MESSAGE: &str = "Add your first city by clicking on a city on the map";
const DATE_SHORT: &str = "%b %-d, %Y";
const DATE_LONG: &str = "%A, %B %-d, %Y";

pub(super) fn render(frame: &mut Frame, area: Rect, state: &AppState) {
    let border = if state.focus == Focus::Sidebar {
        ACCENT
    } else {
        BORDER
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(border))
        .title(Span::styled(
            " WorldWise ",
            Style::default().fg(ACCENT).add_modifier(Modifier::BOLD),
        ));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let chunks = Layout::vertical([
        Constraint::Length(2), // Tabs
        Constraint::Min(1),    // Body
        Constraint::Length(1), // Footer
    ])
    .split(inner);

    render_tabs(frame, chunks[0], state);

    let body = chunks[1];
    match state.view {
        View::Form => form::render(frame, body, state),
        _ if state.is_loading => render_message(
            frame,
            body,
            &format!("{} Loading...", spinner_frame(state.tick_count)),
            Style::default().fg(ACCENT),
        ),
        View::Cities => render_cities(frame, body, state),
        View::Countries => render_countries(frame, body, state),
        View::City => render_city(frame, body, state),
    }

    let footer = Line::from(Span::styled(
        format!("© Copyright {} WorldWise Inc.", state.today.year()),
        dim(),
    ))
    .centered();
    frame.render_widget(Paragraph::new(footer), chunks[2]);
}

fn render_tabs(frame: &mut Frame, area: Rect, state: &AppState) {
    let tab = |label: &'static str, active: bool| {
        if active {
            Span::styled(
                format!(" {label} "),
                Style::default()
                    .fg(ratatui::style::Color::Black)
                    .bg(ACCENT)
                    .add_modifier(Modifier::BOLD),
            )
        } else {
            Span::styled(format!(" {label} "), dim())
        }
    };
    let line = Line::from(vec![
        tab("CITIES", matches!(state.view, View::Cities | View::City)),
        Span::raw("  "),
        tab("COUNTRIES", state.view == View::Countries),
    ])
    .centered();
    frame.render_widget(Paragraph::new(line), area);
}

fn render_message(frame: &mut Frame, area: Rect, message: &str, style: Style) {
    let text = Paragraph::new(Line::from(Span::styled(message.to_string(), style)).centered())
        .wrap(Wrap { trim: true });
    frame.render_widget(text, area);
}

/// Keep the selected row on screen.
fn scroll_offset(selected: usize, visible: usize) -> usize {
    if visible == 0 {
        return 0;
    }
    selected.saturating_sub(visible - 1)
}

fn error_line(state: &AppState) -> Option<Line<'static>> {
    if state.error.is_empty() {
        return None;
    }
    Some(Line::from(Span::styled(
        format!("⛔ {}", state.error),
        Style::default().fg(ERROR),
    )))
}

fn render_rows(frame: &mut Frame, area: Rect, state: &AppState, rows: Vec<Line<'static>>) {
    let mut lines: Vec<Line> = error_line(state).into_iter().collect();
    let visible = (area.height as usize).saturating_sub(lines.len());
    let offset = scroll_offset(state.selected, visible);
    lines.extend(
        rows.into_iter()
            .enumerate()
            .skip(offset)
            .take(visible)
            .map(|(idx, line)| {
                if idx == state.selected && state.focus == Focus::Sidebar {
                    line.style(Style::default().fg(ACCENT_ALT).add_modifier(Modifier::BOLD))
                } else {
                    line
                }
            }),
    );
    frame.render_widget(Paragraph::new(lines), area);
}

fn city_row(city: &City) -> Line<'static> {
    Line::from(vec![
        Span::raw(format!(" {} ", city.emoji)),
        Span::styled(city.city_name.clone(), Style::default().fg(TEXT_MAIN)),
        Span::styled(format!("  ({})", city.date.format(DATE_SHORT)), dim()),
    ])
}

fn render_cities(frame: &mut Frame, area: Rect, state: &AppState) {
    if state.cities.is_empty() {
        let message = if state.error.is_empty() {
            format!("👋 {EMPTY_MESSAGE}")
        } else {
            format!("⛔ {}", state.error)
        };
        render_message(frame, area, &message, Style::default().fg(TEXT_MAIN));
        return;
    }
    let rows = state.cities.iter().map(city_row).collect();
    render_rows(frame, area, state, rows);
}

fn render_countries(frame: &mut Frame, area: Rect, state: &AppState) {
    let countries = state.countries();
    if countries.is_empty() {
        render_message(
            frame,
            area,
            &format!("👋 {EMPTY_MESSAGE}"),
            Style::default().fg(TEXT_MAIN),
        );
        return;
    }
    let rows = countries
        .into_iter()
        .map(|c| {
            Line::from(vec![
                Span::raw(format!(" {} ", c.emoji)),
                Span::styled(c.country, Style::default().fg(TEXT_MAIN)),
            ])
        })
        .collect();
    render_rows(frame, area, state, rows);
}

fn render_city(frame: &mut Frame, area: Rect, state: &AppState) {
    let Some(city) = &state.current_city else {
        render_message(frame, area, "City not found", Style::default().fg(ERROR));
        return;
    };

    let label = |text: &'static str| Line::from(Span::styled(text, dim()));
    let mut lines = vec![
        label("CITY NAME"),
        Line::from(vec![
            Span::raw(format!("{} ", city.emoji)),
            Span::styled(
                city.city_name.clone(),
                Style::default().fg(TEXT_MAIN).add_modifier(Modifier::BOLD),
            ),
        ]),
        Line::default(),
        label("YOU WENT TO"),
        Line::from(city.date.format(DATE_LONG).to_string()),
        Line::default(),
    ];
    if !city.notes.is_empty() {
        lines.push(label("YOUR NOTES"));
        lines.push(Line::from(city.notes.clone()));
        lines.push(Line::default());
    }
    lines.push(label("POSITION"));
    lines.push(Line::from(format!(
        "{:.4}°, {:.4}°",
        city.position.lat, city.position.lng
    )));

    frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: false }), area);
}

pub(super) fn handle_key(key: KeyEvent, state: &AppState) -> EventOutcome<Action> {
    match key.code {
        KeyCode::Char('q') => return EventOutcome::action(Action::Quit),
        KeyCode::Tab => return EventOutcome::action(Action::NavFocus(Focus::Map)),
        KeyCode::Char('c') => return EventOutcome::action(Action::NavShow(View::Cities)),
        KeyCode::Char('n') => return EventOutcome::action(Action::NavShow(View::Countries)),
        _ => {}
    }

    if state.view == View::City {
        return match key.code {
            KeyCode::Esc | KeyCode::Backspace => EventOutcome::action(Action::NavBack),
            KeyCode::Char('d') | KeyCode::Delete => match state.current_city_id() {
                Some(id) => EventOutcome::action(Action::CityDelete(id)),
                None => EventOutcome::ignored(),
            },
            _ => EventOutcome::ignored(),
        };
    }

    let len = state.list_len();
    match key.code {
        KeyCode::Down | KeyCode::Char('j') if state.selected + 1 < len => {
            EventOutcome::action(Action::NavSelect(state.selected + 1))
        }
        KeyCode::Up | KeyCode::Char('k') if state.selected > 0 => {
            EventOutcome::action(Action::NavSelect(state.selected - 1))
        }
        KeyCode::Enter => match state.selected_city() {
            Some(city) => EventOutcome::actions(vec![
                Action::NavShow(View::City),
                Action::CityFetch(city.id),
            ]),
            None => EventOutcome::ignored(),
        },
        KeyCode::Char('d') | KeyCode::Delete => match state.selected_city() {
            Some(city) => EventOutcome::action(Action::CityDelete(city.id)),
            None => EventOutcome::ignored(),
        },
        _ => EventOutcome::ignored(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scroll_offset_keeps_selection_visible() {
        assert_eq!(scroll_offset(0, 5), 0);
        assert_eq!(scroll_offset(4, 5), 0);
        assert_eq!(scroll_offset(5, 5), 1);
        assert_eq!(scroll_offset(3, 0), 0);
    }
}
