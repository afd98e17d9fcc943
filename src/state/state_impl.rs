use super::error::StateError;
use super::navigation::Screen;
use crate::app::NetworkEventSender;
use crate::collection::{DatePreset, FetchFailure, ListSettings, Listing, PageResult};
use crate::crm::FilterSpec;
use crate::events::network::Event as NetworkEvent;
use crate::export;
use crate::logger::LogBuffer;
use crate::ui::{Theme, SPINNER_FRAME_COUNT};
use chrono::{NaiveDate, NaiveDateTime};
use log::*;
use serde_json::Value;
use std::path::PathBuf;
use std::time::Instant;

/// Houses data representative of application state.
///
/// Holds one collection per screen. Only the current screen is mounted;
/// the others sit in their reset state until switched to.
pub struct State {
    net_sender: Option<NetworkEventSender>,
    screens: Vec<Box<dyn Listing>>,
    current: Screen,
    search_mode: bool,
    show_log: bool,
    status_message: Option<String>,
    spinner_index: usize,
    date_preset: DatePreset,
    export_dir: PathBuf,
    theme: Theme,
    log_buffer: LogBuffer,
}

impl State {
    /// Return a new instance with one unmounted collection per screen.
    ///
    pub fn new(net_sender: Option<NetworkEventSender>, settings: ListSettings) -> Self {
        State {
            net_sender,
            screens: Screen::ALL
                .iter()
                .map(|screen| screen.listing(settings))
                .collect(),
            current: Screen::Leads,
            search_mode: false,
            show_log: false,
            status_message: None,
            spinner_index: 0,
            date_preset: DatePreset::default(),
            export_dir: PathBuf::from("."),
            theme: Theme::default(),
            log_buffer: LogBuffer::default(),
        }
    }

    pub fn set_export_dir(&mut self, dir: PathBuf) -> &mut Self {
        self.export_dir = dir;
        self
    }

    pub fn set_theme(&mut self, theme: Theme) -> &mut Self {
        self.theme = theme;
        self
    }

    pub fn set_log_buffer(&mut self, buffer: LogBuffer) -> &mut Self {
        self.log_buffer = buffer;
        self
    }

    pub fn get_theme(&self) -> &Theme {
        &self.theme
    }

    pub fn current_screen(&self) -> Screen {
        self.current
    }

    /// Return the collection of the current screen.
    ///
    pub fn listing(&self) -> &dyn Listing {
        self.listing_for(self.current)
    }

    pub fn listing_for(&self, screen: Screen) -> &dyn Listing {
        self.screens[screen.index()].as_ref()
    }

    fn listing_mut(&mut self) -> &mut dyn Listing {
        self.screens[self.current.index()].as_mut()
    }

    /// Issue a fetch for the current query of the current screen.
    ///
    pub fn refresh(&mut self) -> Result<(), StateError> {
        let screen = self.current;
        let ticket = self.listing_mut().begin_fetch();
        let seq = ticket.seq;
        let sent = match &self.net_sender {
            Some(sender) => sender.send(NetworkEvent::FetchPage { screen, ticket }).is_ok(),
            None => false,
        };
        if !sent {
            error!("Failed to queue fetch #{} for {}.", seq, screen.title());
            let failure = FetchFailure::retryable(StateError::NetworkUnavailable.to_string());
            self.listing_mut().complete_raw(seq, Err(failure));
            return Err(StateError::NetworkUnavailable);
        }
        Ok(())
    }

    fn refetch(&mut self) {
        if let Err(e) = self.refresh() {
            self.status_message = Some(e.to_string());
        }
    }

    /// Re-issue the current query.
    ///
    pub fn retry(&mut self) {
        info!("Retrying {}...", self.current.title());
        self.status_message = None;
        self.refetch();
    }

    /// Make `screen` current. The previous screen is reset, dropping its
    /// query and any responses still in flight for it.
    ///
    pub fn switch_screen(&mut self, screen: Screen) {
        if screen == self.current {
            return;
        }
        debug!("Switching from {} to {}.", self.current.title(), screen.title());
        self.screens[self.current.index()].reset();
        self.current = screen;
        self.search_mode = false;
        self.status_message = None;
        self.date_preset = DatePreset::default();
        self.refetch();
    }

    pub fn next_screen(&mut self) {
        self.switch_screen(self.current.next());
    }

    pub fn prev_screen(&mut self) {
        self.switch_screen(self.current.prev());
    }

    /// Advance timers. Settled search input is committed and fetched.
    ///
    pub fn tick(&mut self, now: Instant) {
        self.advance_spinner_index();
        if self.listing_mut().tick(now) {
            debug!("Search settled on {:?}.", self.listing().query().search());
            self.refetch();
        }
    }

    pub fn is_search_mode(&self) -> bool {
        self.search_mode
    }

    pub fn enter_search_mode(&mut self) {
        self.search_mode = true;
    }

    /// Leave search mode. Typed text still commits once it settles.
    ///
    pub fn exit_search_mode(&mut self) {
        self.search_mode = false;
    }

    pub fn add_search_char(&mut self, c: char, now: Instant) {
        let mut text = self.listing().search_input().to_owned();
        text.push(c);
        self.listing_mut().input_search(text, now);
    }

    pub fn remove_search_char(&mut self, now: Instant) {
        let mut text = self.listing().search_input().to_owned();
        if text.pop().is_some() {
            self.listing_mut().input_search(text, now);
        }
    }

    pub fn clear_search(&mut self, now: Instant) {
        if !self.listing().search_input().is_empty() {
            self.listing_mut().input_search(String::new(), now);
        }
    }

    /// Commit the typed search immediately and leave search mode.
    ///
    pub fn submit_search(&mut self) {
        self.search_mode = false;
        if self.listing_mut().commit_search() {
            self.refetch();
        }
    }

    pub fn next_page(&mut self) -> bool {
        let moved = self.listing_mut().next_page();
        self.after_page_move(moved)
    }

    pub fn prev_page(&mut self) -> bool {
        let moved = self.listing_mut().prev_page();
        self.after_page_move(moved)
    }

    pub fn first_page(&mut self) -> bool {
        let moved = self.listing_mut().first_page();
        self.after_page_move(moved)
    }

    pub fn last_page(&mut self) -> bool {
        let moved = self.listing_mut().last_page();
        self.after_page_move(moved)
    }

    pub fn go_to_page(&mut self, page: usize) -> bool {
        let moved = self.listing_mut().go_to(page);
        self.after_page_move(moved)
    }

    fn after_page_move(&mut self, moved: bool) -> bool {
        if moved {
            self.refetch();
        }
        moved
    }

    /// Step the filter in `slot` to its next value, or back to "any"
    /// after the last one.
    ///
    pub fn cycle_filter(&mut self, slot: usize) -> Result<(), StateError> {
        let spec = self
            .listing()
            .filter_specs()
            .get(slot)
            .ok_or(StateError::NoSuchFilter {
                screen: self.current.title(),
                slot: slot + 1,
            })?;
        let next = next_filter_value(spec, self.listing().query().filter(spec.key));
        let changed = match next {
            Some(value) => self.listing_mut().set_filter(spec.key, value),
            None => self.listing_mut().clear_filter(spec.key),
        };
        if changed {
            self.refetch();
        }
        Ok(())
    }

    pub fn clear_filters(&mut self) {
        if self.listing_mut().clear_filters() {
            self.refetch();
        }
    }

    pub fn get_date_preset(&self) -> DatePreset {
        self.date_preset
    }

    /// Step to the next date preset, relative to `today`.
    ///
    pub fn cycle_date_range(&mut self, today: NaiveDate) -> Result<(), StateError> {
        if !self.listing().supports_date_range() {
            return Err(StateError::DateRangeUnsupported(self.current.title()));
        }
        self.date_preset = self.date_preset.next();
        let range = self.date_preset.range(today);
        if self.listing_mut().set_date_range(range) {
            self.refetch();
        }
        Ok(())
    }

    /// Apply a fetch outcome to the screen it was issued for. Returns
    /// false if it was stale and dropped.
    ///
    /// If the collection shrank below the current page, the cursor moves
    /// to the new last page and that page is fetched.
    pub fn apply_page(
        &mut self,
        screen: Screen,
        seq: u64,
        outcome: Result<PageResult<Value>, FetchFailure>,
    ) -> bool {
        let listing = &mut self.screens[screen.index()];
        if !listing.complete_raw(seq, outcome) {
            return false;
        }
        if screen == self.current && listing.clamp_page() {
            self.refetch();
        }
        true
    }

    pub fn select_next(&mut self) {
        self.listing_mut().select_next();
    }

    pub fn select_prev(&mut self) {
        self.listing_mut().select_prev();
    }

    /// Write the rows on screen to a CSV file in the export directory.
    ///
    pub fn export_current(&mut self, at: NaiveDateTime) -> anyhow::Result<PathBuf> {
        let rows = self.listing().row_cells();
        if rows.is_empty() {
            return Err(StateError::NothingToExport.into());
        }
        let path = export::export_page(
            &self.export_dir,
            self.current.slug(),
            self.listing().query().page(),
            self.listing().columns(),
            &rows,
            at,
        )?;
        self.status_message = Some(format!("Exported {} rows to {}", rows.len(), path.display()));
        Ok(path)
    }

    pub fn get_status_message(&self) -> Option<&str> {
        self.status_message.as_deref()
    }

    pub fn set_status_message(&mut self, message: impl Into<String>) {
        self.status_message = Some(message.into());
    }

    pub fn clear_status_message(&mut self) {
        self.status_message = None;
    }

    pub fn toggle_log(&mut self) {
        self.show_log = !self.show_log;
    }

    pub fn is_log_visible(&self) -> bool {
        self.show_log
    }

    pub fn log_entries(&self, count: usize) -> Vec<String> {
        self.log_buffer.tail(count)
    }

    /// Advance the spinner index.
    ///
    pub fn advance_spinner_index(&mut self) -> &mut Self {
        self.spinner_index = (self.spinner_index + 1) % SPINNER_FRAME_COUNT;
        self
    }

    pub fn get_spinner_index(&self) -> usize {
        self.spinner_index
    }
}

fn next_filter_value(spec: &FilterSpec, current: Option<&str>) -> Option<&'static str> {
    match current.and_then(|value| spec.options.iter().position(|option| *option == value)) {
        Some(i) => spec.options.get(i + 1).copied(),
        None => spec.options.first().copied(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crm::Lead;
    use fake::{Fake, Faker};
    use std::sync::mpsc;
    use std::time::Duration;

    fn state_with_channel() -> (State, mpsc::Receiver<NetworkEvent>) {
        let (tx, rx) = mpsc::channel();
        (State::new(Some(tx), ListSettings::default()), rx)
    }

    fn raw_leads(count: usize, total: usize) -> PageResult<Value> {
        let items = (0..count)
            .map(|_| serde_json::to_value(Faker.fake::<Lead>()).unwrap())
            .collect();
        PageResult::new(items, total, 10)
    }

    fn sent(rx: &mpsc::Receiver<NetworkEvent>) -> Vec<(Screen, u64, Vec<(String, String)>)> {
        rx.try_iter()
            .map(|event| match event {
                NetworkEvent::FetchPage { screen, ticket } => {
                    (screen, ticket.seq, ticket.query.to_params())
                }
            })
            .collect()
    }

    fn param<'a>(params: &'a [(String, String)], key: &str) -> Option<&'a str> {
        params
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Complete the latest fetch of the current screen.
    fn settle(state: &mut State, count: usize, total: usize) {
        let screen = state.current_screen();
        let seq = state.listing().latest_seq();
        assert!(state.apply_page(screen, seq, Ok(raw_leads(count, total))));
    }

    #[test]
    fn test_refresh_sends_ticket() {
        let (mut state, rx) = state_with_channel();
        state.refresh().unwrap();
        let events = sent(&rx);
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].0, Screen::Leads);
        assert_eq!(events[0].1, state.listing().latest_seq());
        assert_eq!(param(&events[0].2, "pageNumber"), Some("1"));
        assert!(state.listing().is_loading());
    }

    #[test]
    fn test_refresh_without_worker_fails_fetch() {
        let (mut state, rx) = state_with_channel();
        drop(rx);
        assert!(matches!(state.refresh(), Err(StateError::NetworkUnavailable)));
        assert!(!state.listing().failure().unwrap().blocking);
    }

    #[test]
    fn test_page_moves_fetch() {
        let (mut state, rx) = state_with_channel();
        state.refresh().unwrap();
        settle(&mut state, 10, 47);
        sent(&rx);

        assert!(state.next_page());
        assert!(state.last_page());
        assert!(!state.go_to_page(6));
        let events = sent(&rx);
        assert_eq!(events.len(), 2);
        assert_eq!(param(&events[1].2, "pageNumber"), Some("5"));
    }

    #[test]
    fn test_refresh_without_network_sender_fails_fetch() {
        let mut state = State::new(None, ListSettings::default());
        assert!(matches!(state.refresh(), Err(StateError::NetworkUnavailable)));
        assert!(!state.listing().is_loading());
        assert!(state.listing().failure().is_some());
    }

    #[test]
    fn test_failed_page_keeps_navigation() {
        let (mut state, rx) = state_with_channel();
        state.refresh().unwrap();
        settle(&mut state, 10, 47);
        assert!(state.go_to_page(3));
        let seq = state.listing().latest_seq();
        state.apply_page(Screen::Leads, seq, Err(FetchFailure::retryable("timeout")));

        let info = state.listing().page_info();
        assert_eq!((info.page, info.total_pages), (3, 5));
        assert!(state.prev_page());
        let events = sent(&rx);
        assert_eq!(param(&events.last().unwrap().2, "pageNumber"), Some("2"));
    }

    #[test]
    fn test_last_page_waits_for_filtered_count() {
        let (mut state, rx) = state_with_channel();
        state.refresh().unwrap();
        settle(&mut state, 10, 47);
        state.cycle_filter(0).unwrap();

        assert!(!state.last_page());
        settle(&mut state, 3, 3);
        assert_eq!(state.listing().query().page(), 1);
        assert_eq!(state.listing().page_info().total_pages, 1);
        assert!(!state.last_page());
        assert_eq!(sent(&rx).len(), 2);
    }

    #[test]
    fn test_shrunk_collection_moves_to_last_page() {
        let (mut state, rx) = state_with_channel();
        state.refresh().unwrap();
        settle(&mut state, 10, 47);
        assert!(state.last_page());
        sent(&rx);

        settle(&mut state, 0, 12);
        assert_eq!(state.listing().query().page(), 2);
        assert!(state.listing().is_loading());
        let events = sent(&rx);
        assert_eq!(events.len(), 1);
        assert_eq!(param(&events[0].2, "pageNumber"), Some("2"));
    }

    #[test]
    fn test_late_response_for_older_page_is_dropped() {
        let (mut state, rx) = state_with_channel();
        state.refresh().unwrap();
        settle(&mut state, 10, 47);
        state.go_to_page(2);
        state.go_to_page(3);
        let events = sent(&rx);
        let (page_two, page_three) = (events[1].1, events[2].1);

        assert!(state.apply_page(Screen::Leads, page_three, Ok(raw_leads(10, 47))));
        let shown = state.listing().row_cells();
        assert!(!state.apply_page(Screen::Leads, page_two, Ok(raw_leads(10, 47))));
        assert_eq!(state.listing().row_cells(), shown);
        assert_eq!(state.listing().query().page(), 3);
    }

    #[test]
    fn test_switch_screen_unmounts_previous() {
        let (mut state, rx) = state_with_channel();
        state.refresh().unwrap();
        settle(&mut state, 10, 47);
        state.cycle_filter(0).unwrap();
        let in_flight = state.listing().latest_seq();

        state.next_screen();
        assert_eq!(state.current_screen(), Screen::Tasks);
        let leads = state.listing_for(Screen::Leads);
        assert!(leads.query().filters().is_empty());
        assert!(leads.row_cells().is_empty());
        assert!(!state.apply_page(Screen::Leads, in_flight, Ok(raw_leads(3, 3))));

        let events = sent(&rx);
        assert_eq!(events.last().unwrap().0, Screen::Tasks);

        state.switch_screen(Screen::Tasks);
        assert!(sent(&rx).is_empty());
        state.prev_screen();
        assert_eq!(state.current_screen(), Screen::Leads);
    }

    #[test]
    fn test_cycle_filter_steps_through_options() {
        let (mut state, rx) = state_with_channel();
        state.refresh().unwrap();
        settle(&mut state, 10, 47);
        state.go_to_page(3);

        state.cycle_filter(0).unwrap();
        assert_eq!(state.listing().query().filter("status"), Some("new"));
        assert_eq!(state.listing().query().page(), 1);
        for _ in 0..4 {
            state.cycle_filter(0).unwrap();
        }
        assert_eq!(state.listing().query().filter("status"), Some("lost"));
        state.cycle_filter(0).unwrap();
        assert_eq!(state.listing().query().filter("status"), None);

        let events = sent(&rx);
        assert_eq!(events.len(), 1 + 1 + 6);
        assert_eq!(param(&events[2].2, "status"), Some("new"));
    }

    #[test]
    fn test_cycle_missing_filter() {
        let (mut state, _rx) = state_with_channel();
        assert!(matches!(
            state.cycle_filter(1),
            Err(StateError::NoSuchFilter { slot: 2, .. })
        ));
        state.switch_screen(Screen::Tasks);
        assert!(state.cycle_filter(1).is_ok());
        assert_eq!(state.listing().query().filter("priority"), Some("low"));
    }

    #[test]
    fn test_clear_filters() {
        let (mut state, rx) = state_with_channel();
        state.cycle_filter(0).unwrap();
        sent(&rx);
        state.clear_filters();
        assert!(state.listing().query().filters().is_empty());
        assert_eq!(sent(&rx).len(), 1);
        state.clear_filters();
        assert!(sent(&rx).is_empty());
    }

    #[test]
    fn test_cycle_date_range() {
        let (mut state, rx) = state_with_channel();
        let today = NaiveDate::from_ymd_opt(2024, 3, 15).unwrap();
        state.cycle_date_range(today).unwrap();
        assert_eq!(state.get_date_preset(), DatePreset::Today);
        let events = sent(&rx);
        assert_eq!(param(&events[0].2, "startDate"), Some("2024-03-15"));
        assert_eq!(param(&events[0].2, "endDate"), Some("2024-03-15"));

        state.switch_screen(Screen::Team);
        assert_eq!(state.get_date_preset(), DatePreset::AllTime);
        assert!(matches!(
            state.cycle_date_range(today),
            Err(StateError::DateRangeUnsupported("Team"))
        ));
    }

    #[test]
    fn test_typed_search_fetches_once_when_settled() {
        let (mut state, rx) = state_with_channel();
        let start = Instant::now();
        state.enter_search_mode();
        state.add_search_char('j', start);
        state.add_search_char('o', start + Duration::from_millis(50));
        state.tick(start + Duration::from_millis(250));
        state.add_search_char('h', start + Duration::from_millis(250));
        state.add_search_char('n', start + Duration::from_millis(300));
        for step in 0..20 {
            state.tick(start + Duration::from_millis(300 + step * 60));
        }
        let events = sent(&rx);
        assert_eq!(events.len(), 1);
        assert_eq!(param(&events[0].2, "search"), Some("john"));
        assert!(state.is_search_mode());
    }

    #[test]
    fn test_submit_search_skips_wait() {
        let (mut state, rx) = state_with_channel();
        let now = Instant::now();
        state.enter_search_mode();
        for c in "acme".chars() {
            state.add_search_char(c, now);
        }
        state.remove_search_char(now);
        state.submit_search();
        assert!(!state.is_search_mode());
        let events = sent(&rx);
        assert_eq!(events.len(), 1);
        assert_eq!(param(&events[0].2, "search"), Some("acm"));

        state.clear_search(now);
        state.submit_search();
        assert_eq!(param(&sent(&rx)[0].2, "search"), None);
    }

    #[test]
    fn test_retry_issues_new_sequence() {
        let (mut state, rx) = state_with_channel();
        state.refresh().unwrap();
        let seq = state.listing().latest_seq();
        state.apply_page(Screen::Leads, seq, Err(FetchFailure::retryable("timeout")));
        state.retry();
        let events = sent(&rx);
        assert_eq!(events.len(), 2);
        assert!(events[1].1 > seq);
        assert!(state.listing().is_loading());
    }

    #[test]
    fn test_export_current() {
        let dir = std::env::temp_dir().join(format!("crm-tui-state-{}", uuid::Uuid::new_v4()));
        let (mut state, _rx) = state_with_channel();
        state.set_export_dir(dir.clone());
        let at = NaiveDate::from_ymd_opt(2024, 3, 15)
            .unwrap()
            .and_hms_opt(9, 0, 0)
            .unwrap();

        let err = state.export_current(at).unwrap_err();
        assert!(err.to_string().contains("Nothing to export"));

        state.refresh().unwrap();
        settle(&mut state, 4, 4);
        let path = state.export_current(at).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        assert_eq!(text.lines().count(), 5);
        assert!(state.get_status_message().unwrap().contains("Exported 4 rows"));
        std::fs::remove_dir_all(dir).unwrap();
    }

    #[test]
    fn test_spinner_wraps() {
        let mut state = State::new(None, ListSettings::default());
        for _ in 0..SPINNER_FRAME_COUNT {
            state.advance_spinner_index();
        }
        assert_eq!(state.get_spinner_index(), 0);
    }

    #[test]
    fn test_toggle_log() {
        let mut state = State::new(None, ListSettings::default());
        let buffer = LogBuffer::new(5);
        buffer.push("hello".to_string());
        state.set_log_buffer(buffer);
        assert!(!state.is_log_visible());
        state.toggle_log();
        assert!(state.is_log_visible());
        assert_eq!(state.log_entries(10), vec!["hello"]);
    }
}
