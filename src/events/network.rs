use crate::collection::{FetchFailure, FetchTicket};
use crate::crm::Crm;
use crate::state::{Screen, State};
use log::*;
use std::sync::Arc;
use tokio::{sync::Mutex, task::JoinHandle};

/// Specify different network event types.
///
#[derive(Debug, Clone)]
pub enum Event {
    FetchPage { screen: Screen, ticket: FetchTicket },
}

/// Specify struct for managing state with network events.
///
/// Every fetch runs as its own task, so several may be in flight at once
/// and finish in any order. Results are handed to the state, which keeps
/// only the one matching the latest request.
pub struct Handler {
    state: Arc<Mutex<State>>,
    crm: Crm,
}

impl Handler {
    /// Return new instance with reference to state.
    ///
    pub fn new(state: &Arc<Mutex<State>>, crm: Crm) -> Self {
        Handler {
            state: Arc::clone(state),
            crm,
        }
    }

    /// Handle network events by type. Returns the handle of the spawned
    /// task.
    ///
    pub fn handle(&self, event: Event) -> JoinHandle<()> {
        debug!("Processing network event '{:?}'...", event);
        match event {
            Event::FetchPage { screen, ticket } => self.fetch_page(screen, ticket),
        }
    }

    /// Fetch one page and apply it to the screen it was requested for.
    ///
    fn fetch_page(&self, screen: Screen, ticket: FetchTicket) -> JoinHandle<()> {
        let state = Arc::clone(&self.state);
        let crm = self.crm.clone();
        tokio::spawn(async move {
            info!(
                "Fetching page {} of {} (request #{})...",
                ticket.query.page(),
                screen.title(),
                ticket.seq
            );
            let outcome = crm
                .fetch(&ticket.resource, &ticket.query)
                .await
                .map_err(|e| {
                    error!(
                        "Failed to fetch {} (request #{}): {}",
                        screen.title(),
                        ticket.seq,
                        e
                    );
                    FetchFailure::from(e)
                });
            if let Ok(page) = &outcome {
                info!(
                    "Received {} of {} rows for {} (request #{}).",
                    page.items.len(),
                    page.total,
                    screen.title(),
                    ticket.seq
                );
            }
            let mut state = state.lock().await;
            state.apply_page(screen, ticket.seq, outcome);
        })
    }
}
