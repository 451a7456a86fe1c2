//! Main application model with state management

use std::sync::Arc;
use tokio::sync::Mutex;

use super::types::{parse_tags, ActiveSection, Engine, Filters, Tab, UiState};
use super::content::{CategoryResult, ContentState, DetailState};

/// Main application model containing all state
pub struct AppModel {
    pub ui_state: Arc<Mutex<UiState>>,
    pub content_state: Arc<Mutex<ContentState>>,
    pub detail_state: Arc<Mutex<DetailState>>,
    pub should_quit: Arc<Mutex<bool>>,
}

impl AppModel {
    pub fn new(engine: Engine) -> Self {
        Self {
            ui_state: Arc::new(Mutex::new(UiState::new(engine))),
            content_state: Arc::new(Mutex::new(ContentState::default())),
            detail_state: Arc::new(Mutex::new(DetailState::default())),
            should_quit: Arc::new(Mutex::new(false)),
        }
    }

    pub async fn should_quit(&self) -> bool {
        *self.should_quit.lock().await
    }

    pub async fn set_should_quit(&self, quit: bool) {
        *self.should_quit.lock().await = quit;
    }

    // ========================================================================
    // Input & focus
    // ========================================================================

    pub async fn get_ui_state(&self) -> UiState {
        self.ui_state.lock().await.clone()
    }

    pub async fn cycle_section_forward(&self) {
        let mut state = self.ui_state.lock().await;
        state.active_section = state.active_section.next();
    }

    pub async fn cycle_section_backward(&self) {
        let mut state = self.ui_state.lock().await;
        state.active_section = state.active_section.prev();
    }

    pub async fn set_active_section(&self, section: ActiveSection) {
        let mut state = self.ui_state.lock().await;
        state.active_section = section;
    }

    pub async fn update_search_query(&self, query: String) {
        let mut state = self.ui_state.lock().await;
        state.search_query = query;
    }

    pub async fn set_debounced_query(&self, query: String) {
        let mut state = self.ui_state.lock().await;
        state.debounced_query = query;
    }

    pub async fn set_engine(&self, engine: Engine) {
        let mut state = self.ui_state.lock().await;
        state.filters.engine = engine;
    }

    /// Store the raw network input; blank input clears the filter
    pub async fn set_network(&self, input: String) {
        let mut state = self.ui_state.lock().await;
        let code = input.trim();
        state.filters.network = if code.is_empty() { None } else { Some(code.to_string()) };
        state.network_input = input;
    }

    /// Store the raw tags input and re-derive the tag set from it
    pub async fn set_tags(&self, input: String) {
        let mut state = self.ui_state.lock().await;
        state.filters.tags = parse_tags(&input);
        state.tags_input = input;
    }

    /// Debounced query and filters a new cycle should search with
    pub async fn search_snapshot(&self) -> (String, Filters) {
        let state = self.ui_state.lock().await;
        (state.debounced_query.clone(), state.filters.clone())
    }

    pub async fn toggle_help_popup(&self) {
        let mut state = self.ui_state.lock().await;
        state.show_help_popup = !state.show_help_popup;
    }

    pub async fn hide_help_popup(&self) {
        let mut state = self.ui_state.lock().await;
        state.show_help_popup = false;
    }

    // ========================================================================
    // Results
    // ========================================================================

    pub async fn get_content_state(&self) -> ContentState {
        self.content_state.lock().await.clone()
    }

    pub async fn begin_cycle(&self) -> u64 {
        self.content_state.lock().await.begin_cycle()
    }

    pub async fn commit_cycle(&self, cycle: u64, series: CategoryResult, episodes: CategoryResult) -> bool {
        self.content_state.lock().await.commit(cycle, series, episodes)
    }

    pub async fn fail_cycle(&self, cycle: u64) -> bool {
        self.content_state.lock().await.fail(cycle)
    }

    pub async fn set_tab(&self, tab: Tab) {
        let mut state = self.content_state.lock().await;
        state.tab = tab;
    }

    pub async fn get_tab(&self) -> Tab {
        self.content_state.lock().await.tab
    }

    pub async fn move_selection(&self, delta: isize) {
        let mut state = self.content_state.lock().await;
        state.move_selection(delta);
    }

    // ========================================================================
    // Detail dialog
    // ========================================================================

    pub async fn get_detail_state(&self) -> DetailState {
        self.detail_state.lock().await.clone()
    }

    /// Open the dialog on the card under the cursor
    pub async fn open_selected_detail(&self) -> bool {
        let selected = self.content_state.lock().await.selected_item().cloned();
        match selected {
            Some(item) => {
                tracing::debug!(id = %item.id, category = ?item.category, "Opening detail");
                self.detail_state.lock().await.show(item);
                true
            }
            None => false,
        }
    }

    pub async fn reopen_detail(&self) -> bool {
        self.detail_state.lock().await.reopen()
    }

    pub async fn close_detail(&self) {
        self.detail_state.lock().await.close();
    }

    pub async fn is_detail_open(&self) -> bool {
        self.detail_state.lock().await.open
    }

    pub async fn scroll_detail(&self, down: bool) {
        let mut state = self.detail_state.lock().await;
        if down {
            state.scroll_down();
        } else {
            state.scroll_up();
        }
    }
}

impl Default for AppModel {
    fn default() -> Self {
        Self::new(Engine::default())
    }
}
