use ratatui::{
    style::{Modifier, Style},
    text::Span,
};

use engine::TransferStatus;

use crate::ui::theme::Theme;

/// Status badge with semantic coloring.
#[must_use]
pub fn status_span(status: TransferStatus, theme: &Theme) -> Span<'static> {
    let (label, color) = match status {
        TransferStatus::Pending => ("IN ATTESA", theme.warning),
        TransferStatus::Approved => ("APPROVATO", theme.positive),
        TransferStatus::Rejected => ("RIFIUTATO", theme.negative),
    };
    Span::styled(
        label,
        Style::default().fg(color).add_modifier(Modifier::BOLD),
    )
}

/// Marker for a transfer whose counterpart leg the backend has not created
/// yet.
#[must_use]
pub fn single_leg_marker(theme: &Theme) -> Span<'static> {
    Span::styled(" ◦", Style::default().fg(theme.text_muted))
}
