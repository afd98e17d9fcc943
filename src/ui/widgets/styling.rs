use crate::ui::theme::Theme;
use ratatui::style::{Modifier, Style};

/// Return the border style for active blocks.
///
pub fn active_block_border_style(theme: &Theme) -> Style {
    Style::default().fg(theme.border_active.to_color())
}

/// Return the border style for normal blocks.
///
pub fn normal_block_border_style(theme: &Theme) -> Style {
    Style::default().fg(theme.border_normal.to_color())
}

pub fn active_block_title_style() -> Style {
    Style::default().add_modifier(Modifier::BOLD)
}

/// Return the style for the selected table row.
///
pub fn selected_row_style(theme: &Theme) -> Style {
    Style::default()
        .fg(theme.highlight_fg.to_color())
        .bg(theme.highlight_bg.to_color())
        .add_modifier(Modifier::BOLD)
}

/// Return the style for column headers.
///
pub fn header_style(theme: &Theme) -> Style {
    Style::default()
        .fg(theme.primary.to_color())
        .add_modifier(Modifier::BOLD)
}

pub fn normal_text_style(theme: &Theme) -> Style {
    Style::default().fg(theme.text.to_color())
}

pub fn muted_text_style(theme: &Theme) -> Style {
    Style::default().fg(theme.text_muted.to_color())
}

pub fn error_text_style(theme: &Theme) -> Style {
    Style::default()
        .fg(theme.error.to_color())
        .add_modifier(Modifier::BOLD)
}

pub fn warning_text_style(theme: &Theme) -> Style {
    Style::default().fg(theme.warning.to_color())
}

/// Return the style for the part of a cell matching the search text.
///
pub fn search_match_style(theme: &Theme) -> Style {
    Style::default()
        .bg(theme.match_bg.to_color())
        .fg(theme.highlight_fg.to_color())
}

/// Return the style for the current page in the pager.
///
pub fn current_page_style(theme: &Theme) -> Style {
    Style::default()
        .fg(theme.accent.to_color())
        .add_modifier(Modifier::BOLD | Modifier::REVERSED)
}
