//! Startup configuration, resolved once and passed down explicitly.
//!
//! Sources, later ones winning:
//! - built-in defaults
//! - `catalog.toml` in the working directory (optional)
//! - `CATALOG__SECTION__KEY` environment variables

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

use crate::model::Engine;

const CONFIG_FILE: &str = "catalog";
const ENV_PREFIX: &str = "CATALOG";

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct Settings {
    pub api: ApiSettings,
    pub search: SearchSettings,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ApiSettings {
    pub base_url: String,
    pub engine: Engine,
    /// Records requested per category
    pub limit: u32,
    pub timeout_secs: u64,
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:3000/api".to_string(),
            engine: Engine::default(),
            limit: 500,
            timeout_secs: 30,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct SearchSettings {
    /// Quiet period after the last edit before a search fires
    pub debounce_ms: u64,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self { debounce_ms: 500 }
    }
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        let builder = Config::builder()
            .add_source(File::with_name(CONFIG_FILE).required(false))
            .add_source(Environment::with_prefix(ENV_PREFIX).separator("__"));

        builder.build()?.try_deserialize()
    }
}
