//! Model module - Application state and data types
//!
//! This module contains all the data structures and state management for the application.
//! It is organized into submodules by responsibility:
//!
//! - `types`: Core type definitions (focus, tabs, engine, filters, UI state)
//! - `content`: Result items, per-category results, cycle ownership, detail dialog
//! - `search_client`: Search API wire types, `SearchService` trait and HTTP client
//! - `app_model`: Main application model with state management methods

mod types;
mod content;
mod search_client;
mod app_model;

// Re-export all public types for convenient access
pub use types::{ActiveSection, Engine, Filters, Tab, UiState};

pub use content::{Category, CategoryResult, ContentState, DetailState, ResultItem};

pub use search_client::{HttpSearchService, SearchError, SearchRequest, SearchService};

pub use app_model::AppModel;
