use ratatui::{
    Frame,
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};

use crate::{
    app::{AppState, NewField},
    ui::theme::Theme,
};

pub fn render(frame: &mut Frame<'_>, area: Rect, state: &AppState) {
    const FIELDS: [NewField; 4] = [
        NewField::Source,
        NewField::Destination,
        NewField::Amount,
        NewField::Note,
    ];

    let theme = Theme::default();
    let draft = &state.new_draft;

    let mut lines: Vec<Line<'static>> = FIELDS
        .iter()
        .map(|&field| {
            let focused = draft.focus == field;
            let marker = if focused { "▸ " } else { "  " };
            let style = if focused {
                Style::default().fg(theme.accent)
            } else {
                Style::default().fg(theme.text_muted)
            };
            let value = draft.field(field);
            Line::from(vec![
                Span::styled(format!("{marker}{}", field.label()), style),
                Span::raw(format!(": {value}{}", if focused { "_" } else { "" })),
            ])
        })
        .collect();

    if !state.safes_hint.is_empty() {
        lines.push(Line::from(""));
        let known = state
            .safes_hint
            .iter()
            .take(8)
            .map(|safe| format!("{} {}", safe.id, safe.name))
            .collect::<Vec<_>>()
            .join(", ");
        lines.push(Line::from(Span::styled(
            format!("Casse note: {known}"),
            Style::default().fg(theme.text_muted),
        )));
    }

    if draft.in_flight {
        lines.push(Line::from(Span::styled(
            "Invio in corso…",
            Style::default().fg(theme.warning),
        )));
    }
    if let Some(err) = &draft.error {
        lines.push(Line::from(Span::styled(
            err.clone(),
            Style::default().fg(theme.error),
        )));
    }

    let block = Block::default()
        .title("Nuovo trasferimento")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.accent));
    frame.render_widget(Paragraph::new(lines).block(block), area);
}
