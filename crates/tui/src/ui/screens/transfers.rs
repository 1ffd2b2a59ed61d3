use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
};

use api_types::safe::SafeKind;
use engine::{SearchQuery, Transfer, Verdict};

use crate::{
    app::{AppState, FilterField, Mode},
    ui::{components::badges, theme::Theme},
};

pub fn render(frame: &mut Frame<'_>, area: Rect, state: &AppState) {
    let theme = Theme::default();
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(0)])
        .split(area);

    render_header(frame, layout[0], state, &theme);
    match state.mode {
        Mode::Filter => render_filter(frame, layout[1], state, &theme),
        Mode::Detail | Mode::Decide => render_detail(frame, layout[1], state, &theme),
        _ => render_list(frame, layout[1], state, &theme),
    }
}

fn render_header(frame: &mut Frame<'_>, area: Rect, state: &AppState, theme: &Theme) {
    let mut line = vec![
        Span::styled("Filtri", Style::default().fg(theme.text_muted)),
        Span::raw(format!(": {}   ", filter_summary(state))),
        Span::styled("Ordine", Style::default().fg(theme.text_muted)),
        Span::raw(format!(": {}", state.transfers.sort.label())),
    ];

    if state.transfers.skipped_rows > 0 {
        line.push(Span::styled(
            format!("   {} righe scartate", state.transfers.skipped_rows),
            Style::default().fg(theme.warning),
        ));
    }

    if let Some(err) = &state.transfers.error {
        line.push(Span::styled(
            format!("   {err} — premi r per riprovare"),
            Style::default().fg(theme.error),
        ));
    }

    let block = Block::default().borders(Borders::ALL).title("Trasferimenti");
    frame.render_widget(Paragraph::new(Line::from(line)).block(block), area);
}

fn filter_summary(state: &AppState) -> String {
    let filter = &state.transfers.filter;
    let mut parts: Vec<String> = Vec::new();

    match &filter.search {
        SearchQuery::Empty => {}
        SearchQuery::Text(text) => parts.push(format!("cerca \"{text}\"")),
        SearchQuery::Id(id) => parts.push(format!("#{id}")),
    }
    if let Some(id) = filter.transfer_id {
        parts.push(format!("id {id}"));
    }
    if let Some(from) = filter.date_from {
        parts.push(format!("dal {from}"));
    }
    if let Some(to) = filter.date_to {
        parts.push(format!("al {to}"));
    }
    if let Some(id) = filter.source_safe_id {
        parts.push(format!("origine {id}"));
    }
    if let Some(id) = filter.dest_safe_id {
        parts.push(format!("destinazione {id}"));
    }
    if let Some(id) = filter.user_id {
        parts.push(format!("utente {id}"));
    }
    if let Some(status) = filter.status {
        parts.push(status.as_str().to_string());
    }

    if parts.is_empty() {
        "nessuno".to_string()
    } else {
        parts.join(", ")
    }
}

fn render_list(frame: &mut Frame<'_>, area: Rect, state: &AppState, theme: &Theme) {
    if state.transfers.visible.is_empty() {
        let message = if state.loading {
            "Caricamento…"
        } else {
            "Nessun trasferimento."
        };
        let block = Block::default().borders(Borders::ALL);
        frame.render_widget(
            Paragraph::new(Line::from(message))
                .block(block)
                .alignment(Alignment::Center),
            area,
        );
        return;
    }

    let items = state
        .transfers
        .visible
        .iter()
        .map(|transfer| list_row(transfer, theme))
        .collect::<Vec<_>>();

    let mut list_state = ListState::default();
    list_state.select(Some(state.transfers.selected));

    let list = List::new(items)
        .block(Block::default().borders(Borders::ALL))
        .highlight_style(
            Style::default()
                .fg(theme.accent)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("» ");

    frame.render_stateful_widget(list, area, &mut list_state);
}

fn list_row(transfer: &Transfer, theme: &Theme) -> ListItem<'static> {
    let date = transfer
        .date
        .map(|d| d.format("%d/%m/%Y").to_string())
        .unwrap_or_else(|| "—".to_string());
    let user = transfer.user_name.as_deref().unwrap_or("—").to_string();

    let mut spans = vec![
        Span::styled(date, Style::default().fg(theme.text_muted)),
        Span::raw("  "),
        Span::styled(
            format!("{:>12}", transfer.amount.to_string()),
            Style::default().fg(theme.accent),
        ),
        Span::raw("  "),
        Span::raw(format!(
            "{} → {}",
            transfer.source.label(),
            transfer.destination.label()
        )),
        Span::raw("  "),
        badges::status_span(transfer.status, theme),
        Span::raw("  "),
        Span::styled(user, Style::default().fg(theme.text_muted)),
    ];
    if transfer.is_degraded() {
        spans.push(badges::single_leg_marker(theme));
    }

    ListItem::new(Line::from(spans))
}

fn render_detail(frame: &mut Frame<'_>, area: Rect, state: &AppState, theme: &Theme) {
    let Some(detail) = &state.transfers.detail else {
        let block = Block::default()
            .title("Trasferimento")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme.accent));
        frame.render_widget(
            Paragraph::new(Line::from("Nessun dettaglio disponibile."))
                .block(block)
                .alignment(Alignment::Center),
            area,
        );
        return;
    };

    let field = |label: &'static str, value: String| {
        Line::from(vec![
            Span::styled(label, Style::default().fg(theme.text_muted)),
            Span::raw(format!(": {value}")),
        ])
    };
    let leg_id = |id: Option<i64>| {
        id.map(|id| format!("#{id}"))
            .unwrap_or_else(|| "—".to_string())
    };

    let mut lines = vec![
        Line::from(vec![
            Span::styled("Stato", Style::default().fg(theme.text_muted)),
            Span::raw(": "),
            badges::status_span(detail.status, theme),
        ]),
        field(
            "Gambe",
            format!(
                "uscita {}  entrata {}",
                leg_id(detail.out_id),
                leg_id(detail.in_id)
            ),
        ),
        field(
            "Riferimento",
            detail.reference.clone().unwrap_or_else(|| "—".to_string()),
        ),
        field("Importo", detail.amount.to_string()),
        field(
            "Data",
            detail
                .date
                .map(|d| d.format("%d/%m/%Y").to_string())
                .unwrap_or_else(|| "—".to_string()),
        ),
        field(
            "Origine",
            format!(
                "{} ({})",
                detail.source.label(),
                kind_label(detail.source.kind)
            ),
        ),
        field(
            "Destinazione",
            format!(
                "{} ({})",
                detail.destination.label(),
                kind_label(detail.destination.kind)
            ),
        ),
        field(
            "Richiesto da",
            detail.user_name.clone().unwrap_or_else(|| "—".to_string()),
        ),
    ];

    if detail.approved_by_name.is_some() || detail.approved_date.is_some() {
        lines.push(field(
            "Deciso da",
            format!(
                "{} {}",
                detail.approved_by_name.as_deref().unwrap_or("—"),
                detail
                    .approved_date
                    .map(|d| format!("il {}", d.format("%d/%m/%Y %H:%M")))
                    .unwrap_or_default()
            ),
        ));
    }
    if let Some(notes) = &detail.notes {
        lines.push(field("Note", notes.clone()));
    }
    if let Some(notes) = &detail.admin_notes {
        lines.push(field("Note revisione", notes.clone()));
    }
    if detail.is_degraded() {
        lines.push(Line::from(Span::styled(
            "La gamba controparte non è ancora registrata dal server.",
            Style::default().fg(theme.warning),
        )));
    }
    if state.transfers.detail_loading {
        lines.push(Line::from(Span::styled(
            "Aggiornamento in corso…",
            Style::default().fg(theme.text_muted),
        )));
    }

    if state.mode == Mode::Decide {
        lines.push(Line::from(""));
        lines.extend(decision_lines(state, theme));
    }

    let block = Block::default()
        .title("Trasferimento")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.accent));
    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn decision_lines(state: &AppState, theme: &Theme) -> Vec<Line<'static>> {
    let verdict = match state.transfers.verdict {
        Some(Verdict::Approve) => Span::styled(
            "APPROVA",
            Style::default()
                .fg(theme.positive)
                .add_modifier(Modifier::BOLD),
        ),
        Some(Verdict::Reject) => Span::styled(
            "RIFIUTA",
            Style::default()
                .fg(theme.negative)
                .add_modifier(Modifier::BOLD),
        ),
        None => Span::raw("—"),
    };

    let mut lines = vec![
        Line::from(vec![
            Span::styled("Decisione", Style::default().fg(theme.accent)),
            Span::raw(": "),
            verdict,
        ]),
        Line::from(vec![
            Span::styled("Nota", Style::default().fg(theme.text_muted)),
            Span::raw(format!(": {}_", state.transfers.decision.note)),
        ]),
    ];

    if state.transfers.decision.in_flight() {
        lines.push(Line::from(Span::styled(
            "Invio in corso…",
            Style::default().fg(theme.warning),
        )));
    } else {
        lines.push(Line::from(Span::styled(
            "Nota facoltativa; Invio per confermare.",
            Style::default().fg(theme.text_muted),
        )));
    }
    lines
}

fn render_filter(frame: &mut Frame<'_>, area: Rect, state: &AppState, theme: &Theme) {
    const FIELDS: [FilterField; 7] = [
        FilterField::Search,
        FilterField::DateFrom,
        FilterField::DateTo,
        FilterField::SourceSafe,
        FilterField::DestSafe,
        FilterField::User,
        FilterField::Status,
    ];

    let draft = &state.filter_draft;
    let mut lines: Vec<Line<'static>> = FIELDS
        .iter()
        .map(|&field| {
            let focused = draft.focus == Some(field);
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

    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "Cerca: testo libero, #id, id:n — Date: AAAA-MM-GG — Stato: pending/approved/rejected",
        Style::default().fg(theme.text_muted),
    )));
    if let Some(err) = &draft.error {
        lines.push(Line::from(Span::styled(
            err.clone(),
            Style::default().fg(theme.error),
        )));
    }

    let block = Block::default()
        .title("Filtri")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.accent));
    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn kind_label(kind: Option<SafeKind>) -> &'static str {
    match kind {
        Some(SafeKind::Company) => "azienda",
        Some(SafeKind::Rep) => "agente",
        None => "—",
    }
}
