pub mod components;
pub mod keymap;
pub mod screens;

mod theme;

use std::io::{Stdout, stdout};

use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::{
    Frame,
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::Paragraph,
};

use crate::app::{AppState, Mode};
use crate::error::Result;

pub use theme::Theme;

pub type Terminal = ratatui::Terminal<CrosstermBackend<Stdout>>;

pub fn setup_terminal() -> Result<Terminal> {
    enable_raw_mode()?;
    let mut stdout = stdout();
    crossterm::execute!(stdout, EnterAlternateScreen)?;
    let terminal = ratatui::Terminal::new(CrosstermBackend::new(stdout))?;
    Ok(terminal)
}

pub fn restore_terminal(terminal: &mut Terminal) -> Result<()> {
    disable_raw_mode()?;
    crossterm::execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    Ok(())
}

pub fn render(frame: &mut Frame<'_>, state: &AppState) {
    let theme = Theme::default();
    let area = frame.area();

    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Info bar
            Constraint::Min(0),    // Content
            Constraint::Length(1), // Bottom bar
        ])
        .split(area);

    render_info_bar(frame, layout[0], state, &theme);

    match state.mode {
        Mode::New => screens::new_transfer::render(frame, layout[1], state),
        _ => screens::transfers::render(frame, layout[1], state),
    }

    render_bottom_bar(frame, layout[2], state, &theme);
    components::toast::render(frame, area, state.toast.as_ref());
}

fn render_info_bar(frame: &mut Frame<'_>, area: Rect, state: &AppState, theme: &Theme) {
    let meta = &state.transfers.meta;
    let refresh = state
        .last_refresh
        .map(|dt| dt.format("%H:%M:%S").to_string())
        .unwrap_or_else(|| "-".to_string());
    let (status, status_style) = if state.loading {
        ("…", Style::default().fg(theme.warning))
    } else if state.connection_ok {
        ("OK", Style::default().fg(theme.positive))
    } else {
        ("ERR", Style::default().fg(theme.error))
    };

    let line = Line::from(vec![
        Span::styled("Azienda", Style::default().fg(theme.text_muted)),
        Span::raw(format!(": {}  ", state.company)),
        Span::styled("Utente", Style::default().fg(theme.text_muted)),
        Span::raw(format!(": {}  ", state.username)),
        Span::styled("Pagina", Style::default().fg(theme.text_muted)),
        Span::raw(format!(
            ": {}/{} ({} totali)  ",
            meta.page, meta.total_pages, meta.total
        )),
        Span::styled("Aggiornato", Style::default().fg(theme.text_muted)),
        Span::raw(format!(": {refresh}  ")),
        Span::styled(status, status_style),
    ]);

    frame.render_widget(Paragraph::new(line), area);
}

fn render_bottom_bar(frame: &mut Frame<'_>, area: Rect, state: &AppState, theme: &Theme) {
    let mut parts = context_hints(state, theme);

    parts.push(Span::styled("  │  ", Style::default().fg(theme.border)));
    parts.push(Span::styled("q", Style::default().fg(theme.accent)));
    parts.push(Span::raw(" esci"));

    frame.render_widget(Paragraph::new(Line::from(parts)), area);
}

fn context_hints(state: &AppState, theme: &Theme) -> Vec<Span<'static>> {
    let key = |k: &'static str| Span::styled(k, Style::default().fg(theme.accent));

    match state.mode {
        Mode::List => vec![
            key("j/k"),
            Span::raw(" seleziona  "),
            key("Invio"),
            Span::raw(" dettaglio  "),
            key("n/p"),
            Span::raw(" pagina  "),
            key("/"),
            Span::raw(" filtri  "),
            key("c"),
            Span::raw(" pulisci  "),
            key("s"),
            Span::raw(" ordine  "),
            key("a"),
            Span::raw(" nuovo  "),
            key("x"),
            Span::raw(" esporta  "),
            key("r"),
            Span::raw(" ricarica"),
        ],
        Mode::Detail => {
            let mut hints = vec![key("b"), Span::raw(" indietro  ")];
            if state
                .transfers
                .detail
                .as_ref()
                .is_some_and(|t| state.transfers.decision.can_decide(t))
            {
                hints.extend([
                    key("y"),
                    Span::raw(" approva  "),
                    key("n"),
                    Span::raw(" rifiuta  "),
                ]);
            }
            hints.extend([key("r"), Span::raw(" ricarica")]);
            hints
        }
        Mode::Decide => {
            if state.transfers.decision.in_flight() {
                vec![Span::styled(
                    "invio in corso…",
                    Style::default().fg(theme.warning),
                )]
            } else {
                vec![
                    key("Invio"),
                    Span::raw(" conferma  "),
                    key("Esc"),
                    Span::raw(" annulla"),
                ]
            }
        }
        Mode::New | Mode::Filter => vec![
            key("Tab"),
            Span::raw(" campo  "),
            key("Invio"),
            Span::raw(" conferma  "),
            key("Esc"),
            Span::raw(" annulla"),
        ],
    }
}
