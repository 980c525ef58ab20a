//! Application state management for the uptime dashboard
//!
//! This module holds the state rendered by the UI, handles keyboard input and
//! applies snapshots produced by the background refresh task.

use chrono::{DateTime, Local};
use crossterm::event::{KeyCode, KeyEvent};

use uptime_checker::data::Monitor;
use uptime_checker::refresh::{RefreshMessage, Snapshot};

/// Application state enum representing the current view
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppState {
    /// Waiting for the first refresh cycle to finish
    Loading,
    /// Showing the latest snapshot
    Dashboard,
}

/// Main application struct managing state and data
pub struct App {
    /// Current application state/view
    pub state: AppState,
    /// Latest snapshot from the refresh pipeline
    pub snapshot: Snapshot,
    /// Index of the highlighted monitor
    pub selected_index: usize,
    /// Flag indicating the application should quit
    pub should_quit: bool,
    /// Flag indicating a refresh has been requested
    pub refresh_requested: bool,
    /// Whether a refresh cycle is running
    pub refreshing: bool,
    /// Timestamp of last completed refresh
    pub last_refresh: Option<DateTime<Local>>,
    /// Flag to show help overlay
    pub show_help: bool,
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}

impl App {
    /// Creates a new App instance in the loading state
    pub fn new() -> Self {
        Self {
            state: AppState::Loading,
            snapshot: Snapshot::default(),
            selected_index: 0,
            should_quit: false,
            refresh_requested: false,
            refreshing: false,
            last_refresh: None,
            show_help: false,
        }
    }

    /// Monitors in the current snapshot
    pub fn monitors(&self) -> &[Monitor] {
        self.snapshot.monitors.as_deref().unwrap_or(&[])
    }

    /// Returns the total number of monitors
    pub fn monitor_count(&self) -> usize {
        self.monitors().len()
    }

    /// Applies a message from the background refresh task
    pub fn apply_refresh(&mut self, message: RefreshMessage) {
        match message {
            RefreshMessage::Started => {
                self.refreshing = true;
            }
            RefreshMessage::Completed(snapshot) => {
                self.refreshing = false;
                self.snapshot = snapshot;
                self.last_refresh = Some(Local::now());
                self.state = AppState::Dashboard;
                self.clamp_selection();
            }
        }
    }

    /// Handles keyboard input and updates state accordingly
    ///
    /// # Key Bindings
    /// - `q` or `Esc`: Quit the application
    /// - `Up`/`k`: Move selection up
    /// - `Down`/`j`: Move selection down
    /// - `g`/`G`: Jump to first/last monitor
    /// - `r`: Request a refresh
    /// - `?`: Toggle help overlay
    pub fn handle_key(&mut self, key_event: KeyEvent) {
        // Help overlay intercepts all keys when shown
        if self.show_help {
            if matches!(
                key_event.code,
                KeyCode::Esc | KeyCode::Char('?') | KeyCode::Char('q')
            ) {
                self.show_help = false;
            }
            return;
        }

        match self.state {
            AppState::Loading => {
                // Only quit is allowed during loading
                if matches!(key_event.code, KeyCode::Char('q') | KeyCode::Esc) {
                    self.should_quit = true;
                }
            }
            AppState::Dashboard => match key_event.code {
                KeyCode::Char('q') | KeyCode::Esc => {
                    self.should_quit = true;
                }
                KeyCode::Up | KeyCode::Char('k') => {
                    self.selected_index = self.selected_index.saturating_sub(1);
                }
                KeyCode::Down | KeyCode::Char('j') => {
                    if self.selected_index + 1 < self.monitor_count() {
                        self.selected_index += 1;
                    }
                }
                KeyCode::Char('g') => {
                    self.selected_index = 0;
                }
                KeyCode::Char('G') => {
                    self.selected_index = self.monitor_count().saturating_sub(1);
                }
                KeyCode::Char('r') => {
                    self.refresh_requested = true;
                }
                KeyCode::Char('?') => {
                    self.show_help = true;
                }
                _ => {}
            },
        }
    }

    /// Takes the pending refresh request, if any
    pub fn take_refresh_request(&mut self) -> bool {
        std::mem::take(&mut self.refresh_requested)
    }

    /// Keeps the selection inside the monitor list after it changes size
    fn clamp_selection(&mut self) {
        let count = self.monitor_count();
        if self.selected_index >= count {
            self.selected_index = count.saturating_sub(1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::test_support::sample_monitor;
    use crossterm::event::KeyModifiers;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn dashboard_app(count: u64) -> App {
        let mut app = App::new();
        app.apply_refresh(RefreshMessage::Completed(Snapshot {
            monitors: Some((1..=count).map(|id| sample_monitor(id, "site")).collect()),
            error: None,
            using_cache: false,
        }));
        app
    }

    #[test]
    fn test_new_app_is_loading() {
        let app = App::new();
        assert_eq!(app.state, AppState::Loading);
        assert_eq!(app.monitor_count(), 0);
        assert!(app.last_refresh.is_none());
    }

    #[test]
    fn test_quit_while_loading() {
        let mut app = App::new();
        app.handle_key(key(KeyCode::Char('r')));
        assert!(!app.refresh_requested, "Refresh is ignored while loading");

        app.handle_key(key(KeyCode::Char('q')));
        assert!(app.should_quit);
    }

    #[test]
    fn test_refresh_messages_update_state() {
        let mut app = App::new();

        app.apply_refresh(RefreshMessage::Started);
        assert!(app.refreshing);

        app.apply_refresh(RefreshMessage::Completed(Snapshot {
            monitors: Some(vec![sample_monitor(1, "a")]),
            error: None,
            using_cache: true,
        }));
        assert!(!app.refreshing);
        assert_eq!(app.state, AppState::Dashboard);
        assert!(app.snapshot.using_cache);
        assert!(app.last_refresh.is_some());
    }

    #[test]
    fn test_selection_moves_within_bounds() {
        let mut app = dashboard_app(3);

        app.handle_key(key(KeyCode::Up));
        assert_eq!(app.selected_index, 0);

        app.handle_key(key(KeyCode::Down));
        app.handle_key(key(KeyCode::Char('j')));
        app.handle_key(key(KeyCode::Down));
        assert_eq!(app.selected_index, 2);

        app.handle_key(key(KeyCode::Char('k')));
        assert_eq!(app.selected_index, 1);

        app.handle_key(key(KeyCode::Char('G')));
        assert_eq!(app.selected_index, 2);
        app.handle_key(key(KeyCode::Char('g')));
        assert_eq!(app.selected_index, 0);
    }

    #[test]
    fn test_selection_clamped_when_list_shrinks() {
        let mut app = dashboard_app(5);
        app.selected_index = 4;

        app.apply_refresh(RefreshMessage::Completed(Snapshot {
            monitors: Some(vec![sample_monitor(1, "a")]),
            error: None,
            using_cache: false,
        }));
        assert_eq!(app.selected_index, 0);
    }

    #[test]
    fn test_refresh_request_is_taken_once() {
        let mut app = dashboard_app(1);

        app.handle_key(key(KeyCode::Char('r')));
        assert!(app.take_refresh_request());
        assert!(!app.take_refresh_request());
    }

    #[test]
    fn test_help_overlay_intercepts_keys() {
        let mut app = dashboard_app(2);

        app.handle_key(key(KeyCode::Char('?')));
        assert!(app.show_help);

        app.handle_key(key(KeyCode::Down));
        assert_eq!(app.selected_index, 0, "Keys are swallowed by the overlay");

        app.handle_key(key(KeyCode::Char('q')));
        assert!(!app.show_help);
        assert!(!app.should_quit, "q closes help instead of quitting");
    }
}
