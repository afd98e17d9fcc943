use super::Frame;
use crate::state::State;
use crate::ui::widgets::styling;
use ratatui::{
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::Paragraph,
};

const SEARCH_CONTROLS: &[(&str, &str)] = &[
    ("Enter", "apply"),
    ("Backspace", "delete"),
    ("Ctrl-U", "clear"),
    ("Esc", "done"),
];

const LIST_CONTROLS: &[(&str, &str)] = &[
    ("/", "search"),
    ("Tab", "screen"),
    ("n/p", "page"),
    ("g/G", "first/last"),
    ("j/k", "select"),
    ("f/s", "filter"),
    ("F", "clear filters"),
    ("d", "dates"),
    ("e", "export"),
    ("r", "retry"),
    ("l", "log"),
    ("q", "quit"),
];

/// Join `(key, action)` pairs into a footer line.
///
fn controls_text(controls: &[(&str, &str)]) -> String {
    let parts: Vec<String> = controls
        .iter()
        .map(|(key, action)| format!("{}: {}", key, action))
        .collect();
    format!(" {}", parts.join(", "))
}

/// Render footer widget.
///
pub fn footer(frame: &mut Frame, size: Rect, state: &State) {
    let theme = state.get_theme();
    let (text, style) = if let Some(message) = state.get_status_message() {
        (
            format!(" {} (Esc to dismiss)", message),
            styling::warning_text_style(theme),
        )
    } else if state.is_search_mode() {
        (
            format!(" Type to search,{}", controls_text(SEARCH_CONTROLS)),
            Style::default()
                .fg(theme.highlight_fg.to_color())
                .bg(theme.footer_search.to_color()),
        )
    } else {
        (
            controls_text(LIST_CONTROLS),
            Style::default()
                .fg(theme.text.to_color())
                .bg(theme.footer_normal.to_color()),
        )
    };
    frame.render_widget(
        Paragraph::new(Line::from(Span::styled(text, style))).style(style),
        size,
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_controls_text() {
        assert_eq!(
            controls_text(&[("q", "quit"), ("r", "retry")]),
            " q: quit, r: retry"
        );
    }
}
