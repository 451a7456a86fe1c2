//! Content view state: per-category results, cycle ownership, detail dialog

use serde_json::Value;

use super::types::{parse_tags, Tab};

/// One of the two document classes the catalog is searched for
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Category {
    /// Shows the service calls `playlist`
    Series,
    /// Single items the service calls `media`
    Episode,
}

impl Category {
    /// Name of the category on the wire
    pub fn doc_type(self) -> &'static str {
        match self {
            Self::Series => "playlist",
            Self::Episode => "media",
        }
    }

    pub fn from_doc_type(doc_type: &str) -> Option<Self> {
        match doc_type {
            "playlist" => Some(Self::Series),
            "media" => Some(Self::Episode),
            _ => None,
        }
    }

    pub fn badge(self) -> &'static str {
        match self {
            Self::Series => "SERIES",
            Self::Episode => "EPISODE",
        }
    }
}

/// Render a JSON id (string or number) as text
fn id_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Non-blank string field; any other shape reads as absent
fn text_field(raw: &Value, key: &str) -> Option<String> {
    raw.get(key)
        .and_then(Value::as_str)
        .filter(|s| !s.trim().is_empty())
        .map(str::to_string)
}

/// Tags as a list of strings, or as one comma-separated string
fn tags_field(raw: &Value) -> Vec<String> {
    match raw.get("tags") {
        Some(Value::Array(tags)) => tags.iter().filter_map(Value::as_str).map(str::to_string).collect(),
        Some(Value::String(joined)) => parse_tags(joined),
        _ => Vec::new(),
    }
}

/// A normalized search hit
#[derive(Clone, Debug, PartialEq)]
pub struct ResultItem {
    pub id: String,
    pub external_id: Option<String>,
    pub category: Category,
    pub title: String,
    pub description: Option<String>,
    pub thumbnail: Option<String>,
    pub tags: Vec<String>,
    /// Source record as returned by the service, kept for the detail dialog
    pub raw: Value,
}

impl ResultItem {
    /// Normalize a raw record. Records without a `type` discriminator are
    /// classified as `fallback`; records without any identity are dropped.
    /// Optional fields of an unexpected shape read as absent.
    pub fn from_raw(raw: Value, fallback: Category) -> Option<Self> {
        let external_id = raw.get("external_id").and_then(id_text);
        let Some(id) = raw.get("id").and_then(id_text).or_else(|| external_id.clone()) else {
            tracing::warn!("Skipping result record without an id");
            return None;
        };
        let category = raw
            .get("type")
            .and_then(Value::as_str)
            .and_then(Category::from_doc_type)
            .unwrap_or(fallback);

        Some(Self {
            id,
            external_id,
            category,
            title: text_field(&raw, "title").unwrap_or_default(),
            description: text_field(&raw, "description"),
            thumbnail: text_field(&raw, "thumbnail"),
            tags: tags_field(&raw),
            raw,
        })
    }

    /// Raw record as indented JSON
    pub fn pretty_raw(&self) -> String {
        serde_json::to_string_pretty(&self.raw).unwrap_or_else(|_| self.raw.to_string())
    }
}

/// Items and the service-reported total for one category
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CategoryResult {
    pub items: Vec<ResultItem>,
    /// Total reported by the service; may exceed `items.len()`
    pub total: u64,
}

impl CategoryResult {
    pub fn new(items: Vec<ResultItem>, total: u64) -> Self {
        Self { items, total }
    }
}

/// Detail dialog state. Closing only hides it; the item stays until replaced.
#[derive(Clone, Debug, Default)]
pub struct DetailState {
    pub open: bool,
    pub item: Option<ResultItem>,
    pub scroll: u16,
}

impl DetailState {
    pub fn show(&mut self, item: ResultItem) {
        let same_item = self
            .item
            .as_ref()
            .is_some_and(|current| current.id == item.id && current.category == item.category);
        if !same_item {
            self.scroll = 0;
        }
        self.item = Some(item);
        self.open = true;
    }

    pub fn close(&mut self) {
        self.open = false;
    }

    /// Reopen the last shown item, if any
    pub fn reopen(&mut self) -> bool {
        if self.item.is_some() {
            self.open = true;
        }
        self.open
    }

    pub fn scroll_up(&mut self) {
        self.scroll = self.scroll.saturating_sub(1);
    }

    pub fn scroll_down(&mut self) {
        let max = self
            .item
            .as_ref()
            .map(|item| item.pretty_raw().lines().count().saturating_sub(1))
            .unwrap_or(0);
        if (self.scroll as usize) < max {
            self.scroll += 1;
        }
    }
}

/// State for the results area
#[derive(Clone, Debug, Default)]
pub struct ContentState {
    pub series: CategoryResult,
    pub episodes: CategoryResult,
    pub tab: Tab,
    pub series_index: usize,
    pub episodes_index: usize,
    pub is_loading: bool,
    /// Sequence number of the cycle allowed to commit
    pub current_cycle: u64,
}

impl ContentState {
    /// Claim the "current" slot for a new cycle and return its number.
    pub fn begin_cycle(&mut self) -> u64 {
        self.current_cycle += 1;
        self.is_loading = true;
        self.current_cycle
    }

    pub fn owns(&self, cycle: u64) -> bool {
        self.current_cycle == cycle
    }

    /// Replace both categories wholesale. Returns false, leaving state
    /// untouched, when `cycle` has been superseded.
    pub fn commit(&mut self, cycle: u64, series: CategoryResult, episodes: CategoryResult) -> bool {
        if !self.owns(cycle) {
            return false;
        }
        self.series = series;
        self.episodes = episodes;
        self.series_index = 0;
        self.episodes_index = 0;
        self.is_loading = false;
        true
    }

    /// Clear both categories after a failed cycle. Returns false when
    /// `cycle` has been superseded.
    pub fn fail(&mut self, cycle: u64) -> bool {
        self.commit(cycle, CategoryResult::default(), CategoryResult::default())
    }

    pub fn results_for(&self, tab: Tab) -> &CategoryResult {
        match tab {
            Tab::Series => &self.series,
            Tab::Episodes => &self.episodes,
        }
    }

    pub fn visible(&self) -> &CategoryResult {
        self.results_for(self.tab)
    }

    pub fn selected_index(&self) -> usize {
        match self.tab {
            Tab::Series => self.series_index,
            Tab::Episodes => self.episodes_index,
        }
    }

    fn selected_index_mut(&mut self) -> &mut usize {
        match self.tab {
            Tab::Series => &mut self.series_index,
            Tab::Episodes => &mut self.episodes_index,
        }
    }

    pub fn selected_item(&self) -> Option<&ResultItem> {
        self.visible().items.get(self.selected_index())
    }

    /// Move the card cursor by `delta`, clamped to the visible list
    pub fn move_selection(&mut self, delta: isize) {
        let len = self.visible().items.len();
        let idx = self.selected_index_mut();
        if len == 0 {
            *idx = 0;
            return;
        }
        let target = (*idx as isize + delta).clamp(0, len as isize - 1);
        *idx = target as usize;
    }
}
