use crate::config::Config;
use crate::crm::Crm;
use crate::error::AppError;
use crate::events::network::{Event as NetworkEvent, Handler as NetworkEventHandler};
use crate::events::terminal::Handler as TerminalEventHandler;
use crate::logger;
use crate::session::AuthContext;
use crate::state::State;
use crate::ui::Theme;
use anyhow::Result;
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use log::*;
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};
use std::io::stdout;
use std::sync::Arc;
use tokio::sync::Mutex;

pub type NetworkEventSender = std::sync::mpsc::Sender<NetworkEvent>;
type NetworkEventReceiver = std::sync::mpsc::Receiver<NetworkEvent>;

/// Oversees event processing, state management, and terminal output.
///
pub struct App {
    state: Arc<Mutex<State>>,
    auth: AuthContext,
    config: Config,
}

impl App {
    /// Start a new application according to the given configuration. Returns
    /// the result of the application execution.
    ///
    pub async fn start(config: Config, level: LevelFilter) -> Result<()> {
        let log_buffer = logger::init(level)?;
        info!("Starting application...");

        let auth = match &config.access_token {
            Some(token) => AuthContext::with_token(token),
            None => AuthContext::new(),
        };
        if !auth.is_active() {
            warn!("No access token configured, requests will fail until one is set.");
        }

        let (tx, rx) = std::sync::mpsc::channel::<NetworkEvent>();
        let mut state = State::new(Some(tx), config.list_settings());
        state
            .set_export_dir(config.export_dir())
            .set_theme(Theme::from_name_or_default(&config.theme_name))
            .set_log_buffer(log_buffer);

        let app = App {
            state: Arc::new(Mutex::new(state)),
            auth,
            config,
        };
        let crm = Crm::new(
            app.auth.clone(),
            &app.config.base_url,
            app.config.request_timeout(),
        )?;
        app.start_network(rx, crm);
        let result = app.start_ui().await;

        app.auth.end();
        info!("Exiting application...");
        result
    }

    /// Start a separate thread for asynchronous fetches.
    ///
    fn start_network(&self, net_receiver: NetworkEventReceiver, crm: Crm) {
        debug!("Creating new thread for asynchronous networking...");
        let cloned_state = Arc::clone(&self.state);
        std::thread::spawn(move || {
            let runtime = match tokio::runtime::Builder::new_multi_thread()
                .enable_all()
                .build()
            {
                Ok(runtime) => runtime,
                Err(e) => {
                    error!("{}", AppError::RuntimeCreation(e.to_string()));
                    return;
                }
            };
            runtime.block_on(async {
                let network_event_handler = NetworkEventHandler::new(&cloned_state, crm);
                while let Ok(network_event) = net_receiver.recv() {
                    network_event_handler.handle(network_event);
                }
            })
        });
    }

    /// Set up the terminal, run the render loop on the main thread and
    /// restore the terminal afterwards, even if the loop failed.
    ///
    async fn start_ui(&self) -> Result<()> {
        debug!("Starting user interface on main thread...");
        let mut stdout = stdout();
        execute!(stdout, EnterAlternateScreen)?;
        enable_raw_mode()?;

        let mut terminal = Terminal::new(CrosstermBackend::new(stdout))?;
        terminal.hide_cursor()?;

        let result = self.run(&mut terminal).await;

        disable_raw_mode()?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
        terminal.show_cursor()?;
        result
    }

    async fn run<B: Backend>(&self, terminal: &mut Terminal<B>) -> Result<()> {
        if let Err(e) = self.state.lock().await.refresh() {
            warn!("Initial fetch not sent: {}", e);
        }

        let terminal_event_handler = TerminalEventHandler::new();
        loop {
            {
                let state = self.state.lock().await;
                terminal
                    .draw(|frame| crate::ui::render(frame, &state))
                    .map_err(|e| AppError::Terminal(e.to_string()))?;
            }
            let event = terminal_event_handler.next()?;
            let mut state = self.state.lock().await;
            if !TerminalEventHandler::handle(event, &mut state) {
                debug!("Received application exit request.");
                break;
            }
        }
        Ok(())
    }
}
