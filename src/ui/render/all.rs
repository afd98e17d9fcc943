use super::{footer, list, log, pager, query_bar, tabs, Frame};
use crate::state::State;
use ratatui::layout::{Constraint, Direction, Layout};

/// Render every widget according to state.
///
pub fn all(frame: &mut Frame, state: &State) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Min(5),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .split(frame.size());

    tabs(frame, rows[0], state);
    query_bar(frame, rows[1], state);
    if state.is_log_visible() {
        let body = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Percentage(65), Constraint::Percentage(35)])
            .split(rows[2]);
        list(frame, body[0], state);
        log(frame, body[1], state);
    } else {
        list(frame, rows[2], state);
    }
    pager(frame, rows[3], state);
    footer(frame, rows[4], state);
}
