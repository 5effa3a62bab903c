use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Wrap},
    Frame,
};
use tui_dispatch::EventOutcome;

use super::{dim, spinner_frame, ACCENT, ACCENT_ALT, ERROR, TEXT_MAIN};
use crate::action::Action;
use crate::state::{AppState, FormField};

const FIELDS: [FormField; 3] = [FormField::CityName, FormField::Date, FormField::Notes];

pub(super) fn render(frame: &mut Frame, area: Rect, state: &AppState) {
    let form = &state.form;

    let message = |text: String, style: Style| {
        Paragraph::new(Line::from(Span::styled(text, style)).centered()).wrap(Wrap { trim: true })
    };

    if form.position.is_none() {
        frame.render_widget(
            message(
                "👋 Please click somewhere on the map".into(),
                Style::default().fg(TEXT_MAIN),
            ),
            area,
        );
        return;
    }
    if form.is_geo_loading {
        frame.render_widget(
            message(
                format!("{} Looking up this place...", spinner_frame(state.tick_count)),
                Style::default().fg(ACCENT),
            ),
            area,
        );
        return;
    }
    if let Some(error) = &form.geo_error {
        frame.render_widget(
            message(format!("😉 {error}"), Style::default().fg(ERROR)),
            area,
        );
        return;
    }

    let mut lines = Vec::new();
    for field in FIELDS {
        let focused = field == form.field;
        let title = match field {
            FormField::CityName => field.label().to_string(),
            FormField::Date => format!("When did you go to {}?", form.city_name),
            FormField::Notes => format!("Notes about your trip to {}", form.city_name),
        };
        let title_style = if focused {
            Style::default().fg(ACCENT).add_modifier(Modifier::BOLD)
        } else {
            dim()
        };
        lines.push(Line::from(Span::styled(title, title_style)));

        let mut value = vec![Span::styled(
            format!("› {}", form.value(field)),
            Style::default().fg(TEXT_MAIN),
        )];
        if focused {
            value.push(Span::styled("▏", Style::default().fg(ACCENT)));
        }
        if field == FormField::CityName && !form.emoji.is_empty() {
            value.push(Span::raw(format!("  {}", form.emoji)));
        }
        lines.push(Line::from(value));
        lines.push(Line::default());
    }

    if !form.country.is_empty() {
        lines.push(Line::from(Span::styled(format!("Country: {}", form.country), dim())));
    }
    if let Some(invalid) = &form.invalid {
        lines.push(Line::from(Span::styled(invalid.clone(), Style::default().fg(ERROR))));
    }
    if state.is_loading {
        lines.push(Line::from(Span::styled(
            format!("{} Saving...", spinner_frame(state.tick_count)),
            Style::default().fg(ACCENT_ALT),
        )));
    }

    frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: false }), area);
}

pub(super) fn handle_key(key: KeyEvent, state: &AppState) -> EventOutcome<Action> {
    let form = &state.form;
    if key.code == KeyCode::Esc {
        return EventOutcome::action(Action::FormCancel);
    }
    if form.position.is_none() || form.is_geo_loading || form.geo_error.is_some() {
        return EventOutcome::ignored();
    }

    let field = form.field;
    match key.code {
        KeyCode::Tab => EventOutcome::action(Action::FormFieldNext),
        KeyCode::Enter => EventOutcome::action(Action::FormSubmit),
        KeyCode::Backspace => {
            let mut value = form.value(field).to_string();
            if value.pop().is_none() {
                return EventOutcome::ignored();
            }
            EventOutcome::action(Action::FormInput(field, value))
        }
        KeyCode::Char(c) => {
            let mut value = form.value(field).to_string();
            value.push(c);
            EventOutcome::action(Action::FormInput(field, value))
        }
        _ => EventOutcome::ignored(),
    }
}
