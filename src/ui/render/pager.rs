use super::Frame;
use crate::collection::pagination::page_window;
use crate::state::State;
use crate::ui::widgets::styling;
use ratatui::{
    layout::{Alignment, Rect},
    text::{Line, Span},
    widgets::Paragraph,
};

/// Render the page window and result count.
///
pub fn pager(frame: &mut Frame, size: Rect, state: &State) {
    let theme = state.get_theme();
    let info = state.listing().page_info();

    let arrow = |enabled: bool, text: &'static str| {
        if enabled {
            Span::styled(text, styling::normal_text_style(theme))
        } else {
            Span::styled(text, styling::muted_text_style(theme))
        }
    };

    let mut spans = vec![arrow(info.has_prev(), "‹ ")];
    for entry in page_window(info.total_pages, info.page, 1, 2) {
        match entry {
            Some(page) if page == info.page => {
                spans.push(Span::styled(
                    format!(" {} ", page),
                    styling::current_page_style(theme),
                ));
            }
            Some(page) => spans.push(Span::styled(
                format!(" {} ", page),
                styling::normal_text_style(theme),
            )),
            None => spans.push(Span::styled(" … ", styling::muted_text_style(theme))),
        }
    }
    spans.push(arrow(info.has_next(), " ›"));
    spans.push(Span::styled(
        format!(
            "   Page {} of {} · {} results",
            info.page, info.total_pages, info.total
        ),
        styling::muted_text_style(theme),
    ));

    frame.render_widget(
        Paragraph::new(Line::from(spans)).alignment(Alignment::Center),
        size,
    );
}
