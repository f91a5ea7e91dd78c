use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use shared::ChartKind;

pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8000/api/v1";
pub const DEFAULT_LOG_LEVEL: &str = "info";
/// How long a mutation success notice stays on screen
pub const MUTATION_NOTICE_MS: u32 = 3000;

/// Application settings, fixed at build time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub api_base_url: String,
    pub log_level: String,
    pub default_chart: ChartKind,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            log_level: DEFAULT_LOG_LEVEL.to_string(),
            default_chart: ChartKind::default(),
        }
    }
}

impl AppConfig {
    /// Build the configuration baked in at compile time.
    ///
    /// `BUDGETBEE_CONFIG` may hold a full JSON document; `BUDGETBEE_API_URL`
    /// and `BUDGETBEE_LOG` override single fields on top of it.
    pub fn from_env() -> Result<Self> {
        let base = match option_env!("BUDGETBEE_CONFIG") {
            Some(document) => Self::from_json(document)?,
            None => Self::default(),
        };
        base.with_overrides(option_env!("BUDGETBEE_API_URL"), option_env!("BUDGETBEE_LOG"))
    }

    pub fn from_json(text: &str) -> Result<Self> {
        let config: AppConfig =
            serde_json::from_str(text).context("invalid configuration document")?;
        config.validated()
    }

    fn with_overrides(mut self, api_base_url: Option<&str>, log_level: Option<&str>) -> Result<Self> {
        if let Some(url) = api_base_url {
            self.api_base_url = url.to_string();
        }
        if let Some(level) = log_level {
            self.log_level = level.to_string();
        }
        self.validated()
    }

    fn validated(mut self) -> Result<Self> {
        self.api_base_url = self.api_base_url.trim().trim_end_matches('/').to_string();
        if !(self.api_base_url.starts_with("http://") || self.api_base_url.starts_with("https://"))
        {
            bail!("API base URL must be http(s), got {:?}", self.api_base_url);
        }
        if self.log_level.trim().is_empty() {
            self.log_level = DEFAULT_LOG_LEVEL.to_string();
        }
        Ok(self)
    }
}
