//! Core type definitions for the application

use std::fmt;

use serde::Deserialize;

/// Which input or area of the UI currently has keyboard focus
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ActiveSection {
    Search,
    Network,
    Tags,
    Results,
}

impl ActiveSection {
    pub fn next(self) -> Self {
        match self {
            ActiveSection::Search => ActiveSection::Network,
            ActiveSection::Network => ActiveSection::Tags,
            ActiveSection::Tags => ActiveSection::Results,
            ActiveSection::Results => ActiveSection::Search,
        }
    }

    pub fn prev(self) -> Self {
        match self {
            ActiveSection::Search => ActiveSection::Results,
            ActiveSection::Network => ActiveSection::Search,
            ActiveSection::Tags => ActiveSection::Network,
            ActiveSection::Results => ActiveSection::Tags,
        }
    }

    /// True for the sections that accept free text
    pub fn is_text_input(self) -> bool {
        !matches!(self, ActiveSection::Results)
    }
}

/// Which result tab is visible
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Tab {
    #[default]
    Series,
    Episodes,
}

impl Tab {
    pub fn toggle(self) -> Self {
        match self {
            Self::Series => Self::Episodes,
            Self::Episodes => Self::Series,
        }
    }
}

/// Backing engine the search service should query
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Engine {
    #[default]
    Al,
    Es,
}

impl Engine {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Al => "al",
            Self::Es => "es",
        }
    }

    pub fn next(self) -> Self {
        match self {
            Self::Al => Self::Es,
            Self::Es => Self::Al,
        }
    }
}

impl fmt::Display for Engine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Structured refinements sent along with the query term
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Filters {
    pub engine: Engine,
    pub network: Option<String>,
    pub tags: Vec<String>,
}

impl Filters {
    pub fn new(engine: Engine) -> Self {
        Self {
            engine,
            ..Default::default()
        }
    }

    /// Comma-joined tag list, or `None` when no tags are set
    pub fn joined_tags(&self) -> Option<String> {
        if self.tags.is_empty() {
            None
        } else {
            Some(self.tags.join(","))
        }
    }
}

/// Split the raw tags input into a de-duplicated, order-preserving tag list
pub fn parse_tags(input: &str) -> Vec<String> {
    let mut tags: Vec<String> = Vec::new();
    for tag in input.split(',').map(str::trim).filter(|t| !t.is_empty()) {
        if !tags.iter().any(|t| t == tag) {
            tags.push(tag.to_string());
        }
    }
    tags
}

/// UI state for the application
#[derive(Clone, Debug)]
pub struct UiState {
    pub active_section: ActiveSection,
    /// Raw search text, updated on every keystroke
    pub search_query: String,
    /// Last query value that survived the debounce window
    pub debounced_query: String,
    /// Raw text of the network input
    pub network_input: String,
    /// Raw text of the tags input
    pub tags_input: String,
    pub filters: Filters,
    pub show_help_popup: bool,
}

impl UiState {
    pub fn new(engine: Engine) -> Self {
        Self {
            active_section: ActiveSection::Search,
            search_query: String::new(),
            debounced_query: String::new(),
            network_input: String::new(),
            tags_input: String::new(),
            filters: Filters::new(engine),
            show_help_popup: false,
        }
    }
}

impl Default for UiState {
    fn default() -> Self {
        Self::new(Engine::default())
    }
}
