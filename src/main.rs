mod config;
mod controller;
mod logging;
mod model;
mod view;

use std::io;
use std::sync::Arc;
use anyhow::Result;
use std::time::Duration;
use crossterm::{
    event::{self, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};

use crate::config::Settings;
use controller::{AppController, SearchOrchestrator};
use model::{AppModel, HttpSearchService};
use view::AppView;

#[tokio::main]
async fn main() -> Result<()> {
    let _log_guard = match logging::init_logging() {
        Ok(guard) => Some(guard),
        Err(e) => {
            eprintln!("Warning: Failed to initialize logging: {}", e);
            None
        }
    };

    tracing::info!("=== catalog-rs starting ===");

    let settings = Settings::new()?;
    tracing::info!(
        base_url = %settings.api.base_url,
        engine = settings.api.engine.as_str(),
        limit = settings.api.limit,
        debounce_ms = settings.search.debounce_ms,
        "Configuration loaded"
    );

    let service = HttpSearchService::new(&settings.api)?;
    tracing::debug!(endpoint = service.endpoint(), "Search client initialized");

    let model = Arc::new(AppModel::new(settings.api.engine));
    let search = SearchOrchestrator::new(model.clone(), Arc::new(service), &settings);
    let controller = AppController::new(model.clone(), search.clone());

    // The debounced query starts out empty, so open on the full catalog
    search.start_cycle().await;

    tracing::info!("Starting TUI...");

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = run_app(&mut terminal, model, controller.clone()).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    controller.shutdown().await;

    if let Err(err) = res {
        tracing::error!(error = ?err, "Application error");
    }

    tracing::info!("catalog-rs shutting down");
    Ok(())
}

async fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    model: Arc<AppModel>,
    controller: AppController,
) -> Result<()> {
    loop {
        let (ui_state, content_state, detail_state) = (
            model.get_ui_state().await,
            model.get_content_state().await,
            model.get_detail_state().await,
        );

        terminal.draw(|f| {
            AppView::render(f, &ui_state, &content_state, &detail_state);
        })?;

        // Short poll keeps the loading indicator and late results responsive
        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                if let Err(e) = controller.handle_key_event(key).await {
                    tracing::warn!(error = %e, "Key handling failed");
                }
            }
        }

        if model.should_quit().await {
            break;
        }
    }

    Ok(())
}
