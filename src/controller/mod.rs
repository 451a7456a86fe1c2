//! Controller module - Application logic and event handling
//!
//! This module contains the application controller that handles user input
//! and coordinates between the model and the search service.
//! It is organized into submodules by responsibility:
//!
//! - `input`: Key event handling
//! - `search`: Debounced, cancellable search cycles

mod input;
mod search;

use std::sync::Arc;

use crate::model::AppModel;

pub use search::SearchOrchestrator;

#[derive(Clone)]
pub struct AppController {
    pub(crate) model: Arc<AppModel>,
    pub(crate) search: SearchOrchestrator,
}

impl AppController {
    pub fn new(model: Arc<AppModel>, search: SearchOrchestrator) -> Self {
        Self { model, search }
    }

    pub async fn shutdown(&self) {
        self.search.shutdown().await;
    }
}
