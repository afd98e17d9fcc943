use super::Frame;
use crate::state::State;
use crate::ui::widgets::styling;
use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};

/// Render the search input with the active filters and date range.
///
pub fn query_bar(frame: &mut Frame, size: Rect, state: &State) {
    let theme = state.get_theme();
    let listing = state.listing();
    let query = listing.query();

    let mut spans = vec![Span::styled("/ ", styling::muted_text_style(theme))];
    spans.push(Span::styled(
        listing.search_input().to_string(),
        styling::normal_text_style(theme),
    ));
    if state.is_search_mode() {
        spans.push(Span::styled("▏", styling::active_block_title_style()));
    }
    if listing.is_search_pending() {
        spans.push(Span::styled(" …", styling::muted_text_style(theme)));
    }

    for spec in listing.filter_specs() {
        spans.push(Span::styled("  │ ", styling::muted_text_style(theme)));
        spans.push(Span::styled(
            format!("{}: ", spec.label),
            styling::muted_text_style(theme),
        ));
        spans.push(Span::styled(
            query.filter(spec.key).unwrap_or("any").to_string(),
            styling::normal_text_style(theme),
        ));
    }
    if listing.supports_date_range() {
        spans.push(Span::styled("  │ Dates: ", styling::muted_text_style(theme)));
        spans.push(Span::styled(
            state.get_date_preset().label(),
            styling::normal_text_style(theme),
        ));
    }

    let border_style = if state.is_search_mode() {
        styling::active_block_border_style(theme)
    } else {
        styling::normal_block_border_style(theme)
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border_style)
        .title(" Search ");
    frame.render_widget(Paragraph::new(Line::from(spans)).block(block), size);
}
