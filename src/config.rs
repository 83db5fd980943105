//! Configuration management for the library admin client

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::env;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ApiConfig {
    pub base_url: String,
    pub timeout_secs: u64,
    pub user_agent: String,
}

/// Interaction timings and page sizes shared by pages and widgets
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct UiConfig {
    /// Quiet period before a list page commits its search box
    pub search_debounce_ms: u64,
    /// Quiet period before an async select reloads for a new keyword
    pub select_debounce_ms: u64,
    pub default_per_page: u32,
    pub select_page_size: u32,
    pub default_borrow_days: u32,
    /// Distance from the bottom of an option list that triggers the next page
    pub scroll_threshold_px: u32,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct SessionConfig {
    pub path: PathBuf,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String,
    /// Directory for a daily rolling log file; stderr only when unset
    pub directory: Option<PathBuf>,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub ui: UiConfig,
    #[serde(default)]
    pub session: SessionConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from files and environment variables
    pub fn load() -> Result<Self, ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let config = Config::builder()
            // Start with default configuration
            .add_source(File::with_name("config/default").required(false))
            // Layer on the environment-specific file
            .add_source(File::with_name(&format!("config/{}", run_mode)).required(false))
            // Add environment variables (LIBRARY_ADMIN_UI__SEARCH_DEBOUNCE_MS=300)
            .add_source(
                Environment::with_prefix("LIBRARY_ADMIN")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            // Override API base URL from API_BASE_URL env var if present
            .set_override_option("api.base_url", env::var("API_BASE_URL").ok())?
            .build()?;

        config.try_deserialize()
    }
}

impl ApiConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl UiConfig {
    pub fn search_debounce(&self) -> Duration {
        Duration::from_millis(self.search_debounce_ms)
    }

    pub fn select_debounce(&self) -> Duration {
        Duration::from_millis(self.select_debounce_ms)
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000/api".to_string(),
            timeout_secs: 30,
            user_agent: format!("library-admin/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            search_debounce_ms: 500,
            select_debounce_ms: 500,
            default_per_page: 10,
            select_page_size: 10,
            default_borrow_days: 7,
            scroll_threshold_px: 20,
        }
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from(".library-admin/session.json"),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
            directory: None,
        }
    }
}
