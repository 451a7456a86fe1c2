//! Search orchestration: debounce, paired category fetches, supersession

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;
use tokio::task::JoinHandle;

use crate::config::Settings;
use crate::model::{AppModel, Category, Engine, Filters, SearchRequest, SearchService, Tab};

/// Turns query/filter edits into search cycles and commits only the newest one.
///
/// A cycle is one pair of concurrent requests (series + episodes). Cycles are
/// numbered by the model; starting a cycle aborts the previous cycle's task and
/// every commit is checked against the current number under the state lock, so
/// a late settlement from a superseded cycle can never overwrite newer state.
#[derive(Clone)]
pub struct SearchOrchestrator {
    model: Arc<AppModel>,
    service: Arc<dyn SearchService>,
    limit: u32,
    debounce: Duration,
    debounce_task: Arc<Mutex<Option<JoinHandle<()>>>>,
    cycle_task: Arc<Mutex<Option<JoinHandle<()>>>>,
    /// Series request of the last cycle started, to skip identical re-fetches
    last_request: Arc<Mutex<Option<SearchRequest>>>,
}

impl SearchOrchestrator {
    pub fn new(model: Arc<AppModel>, service: Arc<dyn SearchService>, settings: &Settings) -> Self {
        Self {
            model,
            service,
            limit: settings.api.limit,
            debounce: Duration::from_millis(settings.search.debounce_ms),
            debounce_task: Arc::new(Mutex::new(None)),
            cycle_task: Arc::new(Mutex::new(None)),
            last_request: Arc::new(Mutex::new(None)),
        }
    }

    pub async fn set_query(&self, text: String) {
        self.model.update_search_query(text).await;
        self.schedule().await;
    }

    /// Only changes which list is shown. Never fetches, never touches the timer.
    pub async fn set_tab(&self, tab: Tab) {
        self.model.set_tab(tab).await;
    }

    pub async fn set_engine(&self, engine: Engine) {
        self.model.set_engine(engine).await;
        self.schedule().await;
    }

    pub async fn set_network(&self, input: String) {
        self.model.set_network(input).await;
        self.schedule().await;
    }

    pub async fn set_tags(&self, input: String) {
        self.model.set_tags(input).await;
        self.schedule().await;
    }

    /// (Re)arm the trailing-edge debounce timer
    async fn schedule(&self) {
        let mut pending = self.debounce_task.lock().await;
        if let Some(handle) = pending.take() {
            handle.abort();
        }

        let this = self.clone();
        *pending = Some(tokio::spawn(async move {
            tokio::time::sleep(this.debounce).await;
            this.on_debounce_elapsed().await;
        }));
    }

    async fn on_debounce_elapsed(&self) {
        let query = self.model.get_ui_state().await.search_query;
        tracing::debug!(query = %query, "Debounce elapsed");
        self.model.set_debounced_query(query).await;
        self.launch(false).await;
    }

    /// Start a cycle now from the current debounced query and filters,
    /// cancelling whichever cycle is still outstanding.
    pub async fn start_cycle(&self) {
        self.launch(true).await;
    }

    /// Unless `force` is set, a cycle whose requests equal the last one
    /// started is skipped.
    async fn launch(&self, force: bool) {
        let (debounced, filters) = self.model.search_snapshot().await;
        let term = debounced.trim().to_string();
        let series = self.request(Category::Series, &term, &filters);
        let episodes = self.request(Category::Episode, &term, &filters);

        let mut inflight = self.cycle_task.lock().await;
        {
            let mut last = self.last_request.lock().await;
            if !force && last.as_ref() == Some(&series) {
                tracing::debug!(term = %term, "Search unchanged, skipping cycle");
                return;
            }
            *last = Some(series.clone());
        }

        if let Some(handle) = inflight.take() {
            if !handle.is_finished() {
                tracing::debug!("Cancelling superseded search cycle");
            }
            handle.abort();
        }

        let cycle = self.model.begin_cycle().await;
        tracing::info!(
            cycle,
            term = %term,
            engine = filters.engine.as_str(),
            browse_all = term.is_empty(),
            "Starting search cycle"
        );

        let this = self.clone();
        *inflight = Some(tokio::spawn(async move {
            this.run_cycle(cycle, series, episodes).await;
        }));
    }

    /// Build one category request. An empty term lists the whole catalog, so
    /// only the engine is sent with it; refinements ride along with a term.
    fn request(&self, category: Category, term: &str, filters: &Filters) -> SearchRequest {
        let searching = !term.is_empty();
        SearchRequest {
            category,
            term: term.to_string(),
            network: filters.network.clone().filter(|_| searching),
            tags: filters.joined_tags().filter(|_| searching),
            limit: self.limit,
            engine: filters.engine,
        }
    }

    async fn run_cycle(&self, cycle: u64, series: SearchRequest, episodes: SearchRequest) {
        let outcome = futures::try_join!(
            self.service.search(&series),
            self.service.search(&episodes)
        );

        match outcome {
            Ok((series, episodes)) => {
                let (series_total, series_items) = (series.total, series.items.len());
                let (episode_total, episode_items) = (episodes.total, episodes.items.len());
                if self.model.commit_cycle(cycle, series, episodes).await {
                    tracing::info!(
                        cycle,
                        series_total,
                        series_items,
                        episode_total,
                        episode_items,
                        "Search cycle committed"
                    );
                } else {
                    tracing::debug!(cycle, "Discarding results of superseded cycle");
                }
            }
            Err(e) => {
                if self.model.fail_cycle(cycle).await {
                    tracing::error!(cycle, error = %e, "Search cycle failed, clearing results");
                } else {
                    tracing::debug!(cycle, error = %e, "Ignoring failure of superseded cycle");
                }
            }
        }
    }

    /// Stop the pending timer and any outstanding cycle
    pub async fn shutdown(&self) {
        if let Some(handle) = self.debounce_task.lock().await.take() {
            handle.abort();
        }
        if let Some(handle) = self.cycle_task.lock().await.take() {
            handle.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex as StdMutex;

    use async_trait::async_trait;
    use serde_json::json;

    use crate::model::{CategoryResult, ResultItem, SearchError};

    type Responder = dyn Fn(&SearchRequest) -> (u64, Result<CategoryResult, SearchError>) + Send + Sync;

    /// Records every request and answers after a per-request delay (ms)
    struct ScriptedService {
        calls: StdMutex<Vec<SearchRequest>>,
        responder: Box<Responder>,
    }

    impl ScriptedService {
        fn new(
            responder: impl Fn(&SearchRequest) -> (u64, Result<CategoryResult, SearchError>) + Send + Sync + 'static,
        ) -> Arc<Self> {
            Arc::new(Self {
                calls: StdMutex::new(Vec::new()),
                responder: Box::new(responder),
            })
        }

        fn calls(&self) -> Vec<SearchRequest> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl SearchService for ScriptedService {
        async fn search(&self, request: &SearchRequest) -> Result<CategoryResult, SearchError> {
            self.calls.lock().unwrap().push(request.clone());
            let (delay_ms, outcome) = (self.responder)(request);
            tokio::time::sleep(Duration::from_millis(delay_ms)).await;
            outcome
        }
    }

    fn records(category: Category, prefix: &str, count: usize, total: u64) -> CategoryResult {
        let items = (0..count)
            .filter_map(|i| {
                ResultItem::from_raw(
                    json!({
                        "id": format!("{prefix}-{i}"),
                        "title": format!("{prefix} {i}"),
                        "type": category.doc_type(),
                    }),
                    category,
                )
            })
            .collect();
        CategoryResult::new(items, total)
    }

    /// Answers every request with one record titled after the term
    fn echo(delay_ms: u64) -> impl Fn(&SearchRequest) -> (u64, Result<CategoryResult, SearchError>) {
        move |req| {
            let total = if req.term.is_empty() { 1000 } else { req.term.len() as u64 };
            (delay_ms, Ok(records(req.category, &req.term, 1, total)))
        }
    }

    fn setup(service: Arc<ScriptedService>) -> (Arc<AppModel>, SearchOrchestrator) {
        let model = Arc::new(AppModel::default());
        let orchestrator = SearchOrchestrator::new(model.clone(), service, &Settings::default());
        (model, orchestrator)
    }

    async fn sleep_ms(ms: u64) {
        tokio::time::sleep(Duration::from_millis(ms)).await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_rapid_edits_fire_one_cycle_after_quiet_period() {
        let service = ScriptedService::new(echo(100));
        let (model, orchestrator) = setup(service.clone());

        for text in ["f", "fa", "fai", "fait", "faith"] {
            orchestrator.set_query(text.to_string()).await;
            assert_eq!(model.get_ui_state().await.search_query, text);
            sleep_ms(100).await;
        }
        assert!(service.calls().is_empty());

        // 100ms already passed since the last edit
        sleep_ms(399).await;
        assert!(service.calls().is_empty());

        sleep_ms(2).await;
        let calls = service.calls();
        assert_eq!(calls.len(), 2);
        assert!(calls.iter().all(|c| c.term == "faith"));
        assert!(model.get_content_state().await.is_loading);

        sleep_ms(1000).await;
        assert_eq!(service.calls().len(), 2);
        assert_eq!(model.get_ui_state().await.debounced_query, "faith");
        assert!(!model.get_content_state().await.is_loading);
    }

    #[tokio::test(start_paused = true)]
    async fn test_edits_returning_to_last_search_do_not_refetch() {
        let service = ScriptedService::new(echo(10));
        let (model, orchestrator) = setup(service.clone());

        orchestrator.set_query("abc".to_string()).await;
        sleep_ms(600).await;
        assert_eq!(service.calls().len(), 2);

        orchestrator.set_query("abcd".to_string()).await;
        orchestrator.set_query("abc".to_string()).await;
        sleep_ms(600).await;
        assert_eq!(service.calls().len(), 2);

        // Padding trims to the same term
        orchestrator.set_query("abc ".to_string()).await;
        sleep_ms(600).await;
        assert_eq!(service.calls().len(), 2);
        assert_eq!(model.get_ui_state().await.debounced_query, "abc ");

        // Filters are part of what makes a search distinct
        orchestrator.set_network("en".to_string()).await;
        sleep_ms(600).await;
        assert_eq!(service.calls().len(), 4);
    }

    #[tokio::test(start_paused = true)]
    async fn test_explicit_start_always_fetches() {
        let service = ScriptedService::new(echo(10));
        let (_model, orchestrator) = setup(service.clone());

        orchestrator.set_query("abc".to_string()).await;
        sleep_ms(600).await;
        orchestrator.start_cycle().await;
        sleep_ms(50).await;

        let calls = service.calls();
        assert_eq!(calls.len(), 4);
        assert!(calls.iter().all(|c| c.term == "abc"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_cycle_requests_both_categories_with_filters() {
        let service = ScriptedService::new(echo(10));
        let (_model, orchestrator) = setup(service.clone());

        orchestrator.set_engine(Engine::Es).await;
        orchestrator.set_network("en".to_string()).await;
        orchestrator.set_tags("drama, kids".to_string()).await;
        orchestrator.set_query("  faith ".to_string()).await;
        sleep_ms(600).await;

        let calls = service.calls();
        assert_eq!(calls.len(), 2);
        let categories: Vec<Category> = calls.iter().map(|c| c.category).collect();
        assert!(categories.contains(&Category::Series));
        assert!(categories.contains(&Category::Episode));
        for call in &calls {
            assert_eq!(call.term, "faith");
            assert_eq!(call.engine, Engine::Es);
            assert_eq!(call.network.as_deref(), Some("en"));
            assert_eq!(call.tags.as_deref(), Some("drama,kids"));
            assert_eq!(call.limit, 500);
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_filter_edit_alone_triggers_cycle() {
        let service = ScriptedService::new(echo(10));
        let (_model, orchestrator) = setup(service.clone());

        orchestrator.set_query("faith".to_string()).await;
        sleep_ms(600).await;
        assert_eq!(service.calls().len(), 2);

        orchestrator.set_tags("kids".to_string()).await;
        sleep_ms(600).await;
        let calls = service.calls();
        assert_eq!(calls.len(), 4);
        assert_eq!(calls[3].tags.as_deref(), Some("kids"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_faith_scenario_counts_come_from_totals() {
        let service = ScriptedService::new(|req: &SearchRequest| match req.category {
            Category::Series => (30, Ok(records(Category::Series, "s", 3, 3))),
            Category::Episode => (80, Ok(records(Category::Episode, "e", 42, 42))),
        });
        let (model, orchestrator) = setup(service.clone());

        orchestrator.set_query("faith".to_string()).await;
        sleep_ms(700).await;

        let content = model.get_content_state().await;
        assert_eq!(content.series.total, 3);
        assert_eq!(content.series.items.len(), 3);
        assert_eq!(content.episodes.total, 42);

        orchestrator.set_tab(Tab::Episodes).await;
        let content = model.get_content_state().await;
        assert_eq!(content.visible().items.len(), 42);
    }

    #[tokio::test(start_paused = true)]
    async fn test_total_is_not_derived_from_item_count() {
        let service = ScriptedService::new(|req: &SearchRequest| (10, Ok(records(req.category, "x", 5, 9000))));
        let (model, orchestrator) = setup(service);

        orchestrator.start_cycle().await;
        sleep_ms(50).await;

        let content = model.get_content_state().await;
        assert_eq!(content.series.items.len(), 5);
        assert_eq!(content.series.total, 9000);
        assert_eq!(content.episodes.total, 9000);
    }

    #[tokio::test(start_paused = true)]
    async fn test_tab_switch_never_fetches_or_changes_counts() {
        let service = ScriptedService::new(echo(10));
        let (model, orchestrator) = setup(service.clone());

        orchestrator.set_query("abc".to_string()).await;
        sleep_ms(600).await;
        let before = model.get_content_state().await;

        orchestrator.set_tab(Tab::Episodes).await;
        orchestrator.set_tab(Tab::Series).await;
        orchestrator.set_tab(Tab::Episodes).await;
        sleep_ms(2000).await;

        assert_eq!(service.calls().len(), 2);
        let after = model.get_content_state().await;
        assert_eq!(after.tab, Tab::Episodes);
        assert_eq!(after.series, before.series);
        assert_eq!(after.episodes, before.episodes);
    }

    #[tokio::test(start_paused = true)]
    async fn test_tab_switch_does_not_reset_debounce() {
        let service = ScriptedService::new(echo(10));
        let (_model, orchestrator) = setup(service.clone());

        orchestrator.set_query("abc".to_string()).await;
        sleep_ms(300).await;
        orchestrator.set_tab(Tab::Episodes).await;
        sleep_ms(250).await;

        // Fired at 500ms from the query edit, not 500ms from the tab switch
        assert_eq!(service.calls().len(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_clearing_query_browses_all_without_refinements() {
        let service = ScriptedService::new(echo(10));
        let (model, orchestrator) = setup(service.clone());

        orchestrator.set_network("en".to_string()).await;
        orchestrator.set_query("abc".to_string()).await;
        sleep_ms(600).await;
        assert_eq!(model.get_content_state().await.series.total, 3);

        orchestrator.set_query(String::new()).await;
        sleep_ms(600).await;

        let calls = service.calls();
        assert_eq!(calls.len(), 4);
        for call in &calls[2..] {
            assert_eq!(call.term, "");
            assert_eq!(call.network, None);
            assert_eq!(call.tags, None);
        }
        let content = model.get_content_state().await;
        assert_eq!(content.series.total, 1000);
        assert_eq!(content.episodes.total, 1000);
    }

    #[tokio::test(start_paused = true)]
    async fn test_whitespace_query_is_browse_all() {
        let service = ScriptedService::new(echo(10));
        let (_model, orchestrator) = setup(service.clone());

        orchestrator.set_query("   ".to_string()).await;
        sleep_ms(600).await;
        assert!(service.calls().iter().all(|c| c.term.is_empty()));
    }

    #[tokio::test(start_paused = true)]
    async fn test_superseded_cycle_is_ignored_when_it_resolves_last() {
        // "slow" answers long after "fast" does
        let service = ScriptedService::new(|req: &SearchRequest| {
            let delay = if req.term == "slow" { 3000 } else { 20 };
            (delay, Ok(records(req.category, &req.term, 2, req.term.len() as u64)))
        });
        let (model, orchestrator) = setup(service.clone());

        orchestrator.set_query("slow".to_string()).await;
        sleep_ms(600).await;
        assert_eq!(service.calls().len(), 2);

        orchestrator.set_query("fast".to_string()).await;
        sleep_ms(5000).await;

        assert_eq!(service.calls().len(), 4);
        let content = model.get_content_state().await;
        assert_eq!(content.series.items[0].id, "fast-0");
        assert_eq!(content.episodes.items[0].id, "fast-0");
        assert!(!content.is_loading);
    }

    #[tokio::test(start_paused = true)]
    async fn test_back_to_back_cycles_commit_only_the_last() {
        let service = ScriptedService::new(|req: &SearchRequest| {
            let delay = match req.term.as_str() {
                "one" => 900,
                "two" => 500,
                _ => 100,
            };
            (delay, Ok(records(req.category, &req.term, 1, 1)))
        });
        let (model, orchestrator) = setup(service.clone());

        for term in ["one", "two", "three"] {
            model.set_debounced_query(term.to_string()).await;
            orchestrator.start_cycle().await;
            sleep_ms(10).await;
        }
        sleep_ms(2000).await;

        assert_eq!(service.calls().len(), 6);
        let content = model.get_content_state().await;
        assert_eq!(content.current_cycle, 3);
        assert_eq!(content.series.items[0].id, "three-0");
    }

    #[tokio::test(start_paused = true)]
    async fn test_failure_in_current_cycle_clears_both_categories() {
        let service = ScriptedService::new(|req: &SearchRequest| {
            if req.term == "bad" && req.category == Category::Episode {
                (10, Err(SearchError::Status { status: 502, body: "bad gateway".to_string() }))
            } else {
                (10, Ok(records(req.category, &req.term, 2, 7)))
            }
        });
        let (model, orchestrator) = setup(service.clone());

        orchestrator.set_query("good".to_string()).await;
        sleep_ms(600).await;
        assert_eq!(model.get_content_state().await.series.total, 7);

        orchestrator.set_query("bad".to_string()).await;
        sleep_ms(600).await;

        let content = model.get_content_state().await;
        assert_eq!(content.series, CategoryResult::default());
        assert_eq!(content.episodes, CategoryResult::default());
        assert!(!content.is_loading);
    }

    #[tokio::test(start_paused = true)]
    async fn test_failure_of_superseded_cycle_leaves_newer_results() {
        let service = ScriptedService::new(|req: &SearchRequest| {
            if req.term == "bad" {
                (1000, Err(SearchError::Status { status: 500, body: String::new() }))
            } else {
                (10, Ok(records(req.category, &req.term, 1, 4)))
            }
        });
        let (model, orchestrator) = setup(service.clone());

        model.set_debounced_query("bad".to_string()).await;
        orchestrator.start_cycle().await;
        sleep_ms(10).await;
        model.set_debounced_query("good".to_string()).await;
        orchestrator.start_cycle().await;
        sleep_ms(3000).await;

        let content = model.get_content_state().await;
        assert_eq!(content.series.total, 4);
        assert_eq!(content.episodes.items[0].id, "good-0");
    }

    #[tokio::test(start_paused = true)]
    async fn test_initial_cycle_lists_catalog() {
        let service = ScriptedService::new(echo(10));
        let (model, orchestrator) = setup(service.clone());

        orchestrator.start_cycle().await;
        assert!(model.get_content_state().await.is_loading);
        sleep_ms(50).await;

        assert_eq!(service.calls().len(), 2);
        let content = model.get_content_state().await;
        assert_eq!(content.series.total, 1000);
        assert!(!content.is_loading);
    }

    #[tokio::test(start_paused = true)]
    async fn test_shutdown_cancels_pending_debounce() {
        let service = ScriptedService::new(echo(10));
        let (_model, orchestrator) = setup(service.clone());

        orchestrator.set_query("abc".to_string()).await;
        orchestrator.shutdown().await;
        sleep_ms(1000).await;
        assert!(service.calls().is_empty());
    }
}
