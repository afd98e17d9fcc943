use super::Frame;
use crate::collection::{FetchFailure, RenderState};
use crate::state::State;
use crate::ui::widgets::{spinner, styling};
use crate::ui::Theme;
use crate::utils::text_processing::{highlight_segments, search_pattern, truncate};
use ratatui::{
    layout::{Constraint, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState, Wrap},
};
use regex::Regex;

/// Render the result list of the current screen.
///
pub fn list(frame: &mut Frame, size: Rect, state: &State) {
    let theme = state.get_theme();
    let listing = state.listing();
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(styling::active_block_border_style(theme))
        .title(Span::styled(
            format!(" {} ", state.current_screen().title()),
            styling::active_block_title_style(),
        ));

    match listing.render_state() {
        RenderState::Loading => {
            let line = Line::from(vec![
                spinner::widget(theme, state.get_spinner_index()),
                Span::styled(" Loading…", styling::muted_text_style(theme)),
            ]);
            frame.render_widget(Paragraph::new(line).block(block), size);
        }
        RenderState::Failed(failure) => {
            frame.render_widget(
                Paragraph::new(failure_lines(&failure, theme))
                    .block(block)
                    .wrap(Wrap { trim: true }),
                size,
            );
        }
        RenderState::Empty => {
            let query = listing.query();
            let mut lines = vec![Line::from(Span::styled(
                "No results",
                styling::normal_text_style(theme),
            ))];
            if !query.search().is_empty() || !query.filters().is_empty() {
                lines.push(Line::from(Span::styled(
                    "Try a different search or clear the filters with F.",
                    styling::muted_text_style(theme),
                )));
            }
            frame.render_widget(Paragraph::new(lines).block(block), size);
        }
        RenderState::Populated(rows) => {
            let columns = listing.columns();
            let pattern = search_pattern(listing.query().search());
            let header = Row::new(
                columns
                    .iter()
                    .map(|column| Cell::from(column.title))
                    .collect::<Vec<_>>(),
            )
            .style(styling::header_style(theme));
            let body: Vec<Row> = rows
                .iter()
                .map(|cells| {
                    Row::new(
                        cells
                            .iter()
                            .zip(columns.iter())
                            .map(|(text, column)| {
                                highlighted_cell(text, column.width, pattern.as_ref(), theme)
                            })
                            .collect::<Vec<_>>(),
                    )
                })
                .collect();
            let widths: Vec<Constraint> = columns
                .iter()
                .map(|column| Constraint::Length(column.width))
                .collect();
            let table = Table::new(body, widths)
                .header(header)
                .block(block)
                .style(styling::normal_text_style(theme))
                .highlight_style(styling::selected_row_style(theme));
            let mut table_state = TableState::default().with_selected(listing.selected());
            frame.render_stateful_widget(table, size, &mut table_state);
        }
    }
}

fn failure_lines(failure: &FetchFailure, theme: &Theme) -> Vec<Line<'static>> {
    let hint = if failure.blocking {
        "Set a valid access token in the config file or pass --token, then restart."
    } else {
        "Press r to try again."
    };
    vec![
        Line::from(Span::styled(
            failure.message.clone(),
            styling::error_text_style(theme),
        )),
        Line::from(""),
        Line::from(Span::styled(hint, styling::muted_text_style(theme))),
    ]
}

fn highlighted_cell(text: &str, width: u16, pattern: Option<&Regex>, theme: &Theme) -> Cell<'static> {
    let text = truncate(text, width as usize);
    let spans: Vec<Span> = highlight_segments(&text, pattern)
        .into_iter()
        .map(|(segment, matched)| {
            if matched {
                Span::styled(segment.to_string(), styling::search_match_style(theme))
            } else {
                Span::raw(segment.to_string())
            }
        })
        .collect();
    Cell::from(Line::from(spans))
}
