use crate::state::{Screen, State};
use anyhow::Result;
use crossterm::{
    event,
    event::{Event as CrosstermEvent, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
};
use log::*;
use std::{sync::mpsc, thread, time::Duration, time::Instant};

/// Specify terminal event poll rate in milliseconds.
///
const TICK_RATE_IN_MS: u64 = 60;

/// Specify different terminal event types.
///
#[derive(Debug)]
pub enum Event<I> {
    Input(I),
    Tick,
}

/// Specify struct for managing terminal events channel.
///
pub struct Handler {
    rx: mpsc::Receiver<Event<KeyEvent>>,
    _tx: mpsc::Sender<Event<KeyEvent>>,
}

impl Default for Handler {
    fn default() -> Self {
        Handler::new()
    }
}

impl Handler {
    /// Return new instance after spawning new input polling thread.
    ///
    pub fn new() -> Self {
        let (tx, rx) = mpsc::channel();
        let tx_clone = tx.clone();
        thread::spawn(move || {
            let tick_rate = Duration::from_millis(TICK_RATE_IN_MS);
            loop {
                match event::poll(tick_rate) {
                    Ok(true) => match event::read() {
                        Ok(CrosstermEvent::Key(key)) => {
                            if tx_clone.send(Event::Input(key)).is_err() {
                                break;
                            }
                        }
                        Ok(_) => (),
                        Err(e) => {
                            error!("Failed to read terminal event: {}", e);
                            break;
                        }
                    },
                    Ok(false) => (),
                    Err(e) => {
                        error!("Failed to poll terminal events: {}", e);
                        break;
                    }
                }
                if tx_clone.send(Event::Tick).is_err() {
                    break;
                }
            }
        });
        Handler { rx, _tx: tx }
    }

    /// Block until the next terminal event.
    ///
    pub fn next(&self) -> Result<Event<KeyEvent>> {
        Ok(self.rx.recv()?)
    }

    /// Apply a terminal event to state. Returns false if exit was
    /// requested.
    ///
    pub fn handle(event: Event<KeyEvent>, state: &mut State) -> bool {
        match event {
            Event::Tick => {
                state.tick(Instant::now());
                true
            }
            Event::Input(key) => handle_key(key, state, Instant::now()),
        }
    }
}

fn handle_key(key: KeyEvent, state: &mut State, now: Instant) -> bool {
    if key.kind != KeyEventKind::Press {
        return true;
    }
    if let KeyEvent {
        code: KeyCode::Char('c'),
        modifiers: KeyModifiers::CONTROL,
        ..
    } = key
    {
        debug!("Processing exit terminal event '{:?}'...", key);
        return false;
    }
    if state.is_search_mode() {
        handle_search_key(key, state, now);
        return true;
    }

    match key.code {
        KeyCode::Char('q') => {
            debug!("Processing exit terminal event '{:?}'...", key);
            return false;
        }
        KeyCode::Char('/') => state.enter_search_mode(),
        KeyCode::Tab => state.next_screen(),
        KeyCode::BackTab => state.prev_screen(),
        KeyCode::Char(c @ '1'..='6') => {
            let index = c as usize - '1' as usize;
            state.switch_screen(Screen::ALL[index]);
        }
        KeyCode::Char('n') | KeyCode::Right => {
            state.next_page();
        }
        KeyCode::Char('p') | KeyCode::Left => {
            state.prev_page();
        }
        KeyCode::Char('g') | KeyCode::Home => {
            state.first_page();
        }
        KeyCode::Char('G') | KeyCode::End => {
            state.last_page();
        }
        KeyCode::Char('j') | KeyCode::Down => state.select_next(),
        KeyCode::Char('k') | KeyCode::Up => state.select_prev(),
        KeyCode::Char('f') => report(state, |state| state.cycle_filter(0)),
        KeyCode::Char('s') => report(state, |state| state.cycle_filter(1)),
        KeyCode::Char('F') => state.clear_filters(),
        KeyCode::Char('d') => {
            let today = chrono::Local::now().date_naive();
            report(state, |state| state.cycle_date_range(today));
        }
        KeyCode::Char('r') => state.retry(),
        KeyCode::Char('e') => {
            let at = chrono::Local::now().naive_local();
            if let Err(e) = state.export_current(at) {
                warn!("Export failed: {:#}", e);
                state.set_status_message(format!("Export failed: {:#}", e));
            }
        }
        KeyCode::Char('l') => state.toggle_log(),
        KeyCode::Esc => state.clear_status_message(),
        _ => (),
    }
    true
}

fn handle_search_key(key: KeyEvent, state: &mut State, now: Instant) {
    match key.code {
        KeyCode::Enter => state.submit_search(),
        KeyCode::Esc => state.exit_search_mode(),
        KeyCode::Backspace => state.remove_search_char(now),
        KeyCode::Char('u') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            state.clear_search(now)
        }
        KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
            state.add_search_char(c, now)
        }
        _ => (),
    }
}

fn report<E: std::fmt::Display>(state: &mut State, action: impl FnOnce(&mut State) -> Result<(), E>) {
    if let Err(e) = action(state) {
        debug!("{}", e);
        state.set_status_message(e.to_string());
    }
}
