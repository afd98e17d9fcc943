use super::Frame;
use crate::state::State;
use crate::ui::widgets::styling;
use ratatui::{
    layout::Rect,
    text::Span,
    widgets::{Block, Borders, List, ListItem},
};

/// Render log widget according to state.
///
pub fn log(frame: &mut Frame, size: Rect, state: &State) {
    let theme = state.get_theme();
    let visible = size.height.saturating_sub(2) as usize;
    let items: Vec<ListItem> = state
        .log_entries(visible)
        .into_iter()
        .map(|entry| ListItem::new(Span::styled(entry, styling::normal_text_style(theme))))
        .collect();

    let block = Block::default()
        .title(" Log (l to hide) ")
        .borders(Borders::ALL)
        .border_style(styling::normal_block_border_style(theme));
    frame.render_widget(List::new(items).block(block), size);
}
