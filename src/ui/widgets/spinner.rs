use crate::ui::theme::Theme;
use ratatui::text::Span;

pub const FRAMES: [&str; 10] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

/// Return the spinner frame for the given index.
///
pub fn widget<'a>(theme: &Theme, index: usize) -> Span<'a> {
    Span::styled(
        FRAMES[index % FRAMES.len()],
        ratatui::style::Style::default().fg(theme.primary.to_color()),
    )
}
