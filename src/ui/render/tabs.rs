use super::Frame;
use crate::state::{Screen, State};
use crate::ui::widgets::styling;
use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Tabs},
};

/// Render the screen tabs.
///
pub fn tabs(frame: &mut Frame, size: Rect, state: &State) {
    let theme = state.get_theme();
    let titles: Vec<Line> = Screen::ALL
        .iter()
        .enumerate()
        .map(|(i, screen)| Line::from(format!("{} {}", i + 1, screen.title())))
        .collect();
    let widget = Tabs::new(titles)
        .select(state.current_screen().index())
        .style(styling::muted_text_style(theme))
        .highlight_style(styling::header_style(theme))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(styling::normal_block_border_style(theme))
                .title(Span::styled(" CRM ", styling::active_block_title_style())),
        );
    frame.render_widget(widget, size);
}
