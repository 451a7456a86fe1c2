//! Key event handling

use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::model::{ActiveSection, Tab, UiState};
use super::AppController;

/// Cards moved by PageUp / PageDown
const PAGE_STEP: isize = 10;

impl AppController {
    pub async fn handle_key_event(&self, key: KeyEvent) -> Result<()> {
        if key.kind != KeyEventKind::Press {
            return Ok(());
        }

        let model = &self.model;
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

        // Ctrl shortcuts work everywhere
        if ctrl {
            match key.code {
                KeyCode::Char('q') | KeyCode::Char('c') => {
                    model.set_should_quit(true).await;
                }
                KeyCode::Char('e') => {
                    let engine = model.get_ui_state().await.filters.engine.next();
                    tracing::debug!(engine = engine.as_str(), "Switching engine");
                    self.search.set_engine(engine).await;
                }
                KeyCode::Char('r') => {
                    self.search.start_cycle().await;
                }
                _ => {}
            }
            return Ok(());
        }

        // Detail dialog is modal
        if model.is_detail_open().await {
            match key.code {
                KeyCode::Esc | KeyCode::Enter | KeyCode::Char('q') => model.close_detail().await,
                KeyCode::Up | KeyCode::Char('k') => model.scroll_detail(false).await,
                KeyCode::Down | KeyCode::Char('j') => model.scroll_detail(true).await,
                _ => {}
            }
            return Ok(());
        }

        let ui_state = model.get_ui_state().await;

        // Help popup
        if ui_state.show_help_popup {
            if matches!(key.code, KeyCode::Esc | KeyCode::F(1) | KeyCode::Char('?')) {
                model.hide_help_popup().await;
            }
            return Ok(());
        }

        match key.code {
            KeyCode::Tab => {
                model.cycle_section_forward().await;
                return Ok(());
            }
            KeyCode::BackTab => {
                model.cycle_section_backward().await;
                return Ok(());
            }
            KeyCode::F(1) => {
                model.toggle_help_popup().await;
                return Ok(());
            }
            _ => {}
        }

        if ui_state.active_section.is_text_input() {
            self.handle_text_input(&ui_state, key).await;
            return Ok(());
        }

        // Results grid
        match key.code {
            KeyCode::Left | KeyCode::Right => {
                let tab = model.get_tab().await.toggle();
                self.search.set_tab(tab).await;
            }
            KeyCode::Char('1') => self.search.set_tab(Tab::Series).await,
            KeyCode::Char('2') => self.search.set_tab(Tab::Episodes).await,
            KeyCode::Up => model.move_selection(-1).await,
            KeyCode::Down => model.move_selection(1).await,
            KeyCode::PageUp => model.move_selection(-PAGE_STEP).await,
            KeyCode::PageDown => model.move_selection(PAGE_STEP).await,
            KeyCode::Home => model.move_selection(isize::MIN / 2).await,
            KeyCode::End => model.move_selection(isize::MAX / 2).await,
            KeyCode::Enter => {
                model.open_selected_detail().await;
            }
            KeyCode::Char('o') => {
                model.reopen_detail().await;
            }
            KeyCode::Char('/') | KeyCode::Esc => {
                model.set_active_section(ActiveSection::Search).await;
            }
            KeyCode::Char('?') => model.toggle_help_popup().await,
            KeyCode::Char('q') => model.set_should_quit(true).await,
            _ => {}
        }
        Ok(())
    }

    /// Edit the focused text field and push the new value through the orchestrator
    async fn handle_text_input(&self, ui_state: &UiState, key: KeyEvent) {
        let section = ui_state.active_section;
        let current = match section {
            ActiveSection::Search => &ui_state.search_query,
            ActiveSection::Network => &ui_state.network_input,
            ActiveSection::Tags => &ui_state.tags_input,
            ActiveSection::Results => return,
        };

        let mut text = current.clone();
        match key.code {
            KeyCode::Char(c) => text.push(c),
            KeyCode::Backspace => {
                text.pop();
            }
            KeyCode::Esc => text.clear(),
            KeyCode::Enter | KeyCode::Down => {
                self.model.set_active_section(ActiveSection::Results).await;
                return;
            }
            _ => return,
        }

        if text == *current {
            return;
        }

        match section {
            ActiveSection::Search => self.search.set_query(text).await,
            ActiveSection::Network => self.search.set_network(text).await,
            ActiveSection::Tags => self.search.set_tags(text).await,
            ActiveSection::Results => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::time::Duration;

    use async_trait::async_trait;

    use crate::config::Settings;
    use crate::controller::SearchOrchestrator;
    use crate::model::{AppModel, Category, CategoryResult, ResultItem, SearchError, SearchRequest, SearchService};

    struct EmptyService;

    #[async_trait]
    impl SearchService for EmptyService {
        async fn search(&self, _request: &SearchRequest) -> Result<CategoryResult, SearchError> {
            Ok(CategoryResult::default())
        }
    }

    fn controller() -> AppController {
        let model = Arc::new(AppModel::default());
        let search = SearchOrchestrator::new(model.clone(), Arc::new(EmptyService), &Settings::default());
        AppController::new(model, search)
    }

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn ctrl(c: char) -> KeyEvent {
        KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL)
    }

    async fn type_text(controller: &AppController, text: &str) {
        for c in text.chars() {
            controller.handle_key_event(press(KeyCode::Char(c))).await.unwrap();
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_typing_edits_the_focused_field() {
        let controller = controller();
        type_text(&controller, "faitx").await;
        controller.handle_key_event(press(KeyCode::Backspace)).await.unwrap();
        type_text(&controller, "h").await;

        controller.handle_key_event(press(KeyCode::Tab)).await.unwrap();
        type_text(&controller, "en").await;
        controller.handle_key_event(press(KeyCode::Tab)).await.unwrap();
        type_text(&controller, "a,b").await;

        let ui = controller.model.get_ui_state().await;
        assert_eq!(ui.search_query, "faith");
        assert_eq!(ui.filters.network.as_deref(), Some("en"));
        assert_eq!(ui.filters.tags, vec!["a", "b"]);
        assert_eq!(ui.active_section, ActiveSection::Tags);

        tokio::time::sleep(Duration::from_millis(600)).await;
        assert_eq!(controller.model.get_ui_state().await.debounced_query, "faith");
    }

    #[tokio::test(start_paused = true)]
    async fn test_q_in_search_is_text_not_quit() {
        let controller = controller();
        type_text(&controller, "q").await;
        assert!(!controller.model.should_quit().await);
        assert_eq!(controller.model.get_ui_state().await.search_query, "q");

        controller.handle_key_event(ctrl('q')).await.unwrap();
        assert!(controller.model.should_quit().await);
    }

    #[tokio::test(start_paused = true)]
    async fn test_arrows_switch_tabs_in_results() {
        let controller = controller();
        controller.handle_key_event(press(KeyCode::Enter)).await.unwrap();
        assert_eq!(controller.model.get_ui_state().await.active_section, ActiveSection::Results);

        controller.handle_key_event(press(KeyCode::Right)).await.unwrap();
        assert_eq!(controller.model.get_tab().await, Tab::Episodes);
        controller.handle_key_event(press(KeyCode::Char('1'))).await.unwrap();
        assert_eq!(controller.model.get_tab().await, Tab::Series);
    }

    #[tokio::test(start_paused = true)]
    async fn test_ctrl_e_cycles_engine() {
        let controller = controller();
        controller.handle_key_event(ctrl('e')).await.unwrap();
        assert_eq!(
            controller.model.get_ui_state().await.filters.engine,
            crate::model::Engine::Es
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_help_popup_blocks_input_until_closed() {
        let controller = controller();
        controller.handle_key_event(press(KeyCode::F(1))).await.unwrap();
        type_text(&controller, "abc").await;
        assert!(controller.model.get_ui_state().await.search_query.is_empty());

        controller.handle_key_event(press(KeyCode::Esc)).await.unwrap();
        assert!(!controller.model.get_ui_state().await.show_help_popup);
    }

    #[tokio::test(start_paused = true)]
    async fn test_o_reopens_closed_detail() {
        let controller = controller();
        let cycle = controller.model.begin_cycle().await;
        let item = ResultItem::from_raw(serde_json::json!({ "id": "s1", "type": "playlist" }), Category::Series)
            .unwrap();
        controller
            .model
            .commit_cycle(cycle, CategoryResult::new(vec![item], 1), CategoryResult::default())
            .await;

        controller.handle_key_event(press(KeyCode::Enter)).await.unwrap();
        controller.handle_key_event(press(KeyCode::Enter)).await.unwrap();
        assert!(controller.model.is_detail_open().await);
        controller.handle_key_event(press(KeyCode::Esc)).await.unwrap();
        assert!(!controller.model.is_detail_open().await);

        controller.handle_key_event(press(KeyCode::Char('o'))).await.unwrap();
        assert!(controller.model.is_detail_open().await);
        let detail = controller.model.get_detail_state().await;
        assert_eq!(detail.item.map(|i| i.id), Some("s1".to_string()));
    }
}
