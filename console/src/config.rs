use crate::error::{ConsoleError, ConsoleResult};
use serde::{Deserialize, Serialize};
use service::{Language, ServiceConfig};
use std::path::Path;
use std::time::Duration;
use tracing::debug;

pub const ENV_BASE_URL: &str = "ENV_CONSOLE_BASE_URL";
pub const ENV_TOKEN: &str = "ENV_CONSOLE_TOKEN";
pub const ENV_SESSION_ID: &str = "ENV_CONSOLE_SESSION_ID";
pub const ENV_LOCALE: &str = "ENV_CONSOLE_LOCALE";

pub const MAX_PAGE_SIZE: u32 = 100;

pub fn check_page_size(page_size: u32) -> Result<(), String> {
    if page_size == 0 || page_size > MAX_PAGE_SIZE {
        return Err(format!(
            "Page size must be between 1 and {}",
            MAX_PAGE_SIZE
        ));
    }
    Ok(())
}

/// Settings for the console, read from an optional TOML file and then
/// overridden by `ENV_CONSOLE_*` variables.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ConsoleConfig {
    pub base_url: String,
    pub timeout_secs: u64,
    pub token: Option<String>,
    pub session_id: Option<String>,
    pub locale: Language,
    pub page_size: u32,
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        let service = ServiceConfig::default();
        Self {
            base_url: service.base_url,
            timeout_secs: service.timeout.as_secs(),
            token: None,
            session_id: None,
            locale: service.language,
            page_size: 10,
        }
    }
}

impl ConsoleConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_toml_str(source: &str) -> ConsoleResult<Self> {
        Ok(toml::from_str(source)?)
    }

    /// Reads `path` when given, then applies environment overrides.
    pub fn load(path: Option<&Path>) -> ConsoleResult<Self> {
        let mut config = match path {
            Some(path) => {
                debug!("Loading console config from {}", path.display());
                Self::from_toml_str(&std::fs::read_to_string(path)?)?
            }
            None => Self::default(),
        };
        config.apply_env()?;
        Ok(config)
    }

    pub fn apply_env(&mut self) -> ConsoleResult<()> {
        if let Ok(base_url) = std::env::var(ENV_BASE_URL) {
            self.base_url = base_url;
        }
        if let Ok(token) = std::env::var(ENV_TOKEN) {
            self.token = Some(token);
        }
        if let Ok(session_id) = std::env::var(ENV_SESSION_ID) {
            self.session_id = Some(session_id);
        }
        if let Ok(locale) = std::env::var(ENV_LOCALE) {
            self.locale = locale
                .parse()
                .map_err(|message| ConsoleError::Config { message })?;
        }
        Ok(())
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    pub fn with_locale(mut self, locale: Language) -> Self {
        self.locale = locale;
        self
    }

    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size;
        self
    }

    pub fn service_config(&self) -> ServiceConfig {
        ServiceConfig {
            base_url: self.base_url.clone(),
            timeout: Duration::from_secs(self.timeout_secs),
            session_id: self.session_id.clone(),
            token: self.token.clone(),
            language: self.locale,
        }
    }

    pub fn validate(&self) -> Result<(), String> {
        self.service_config().validate()?;
        check_page_size(self.page_size)
    }
}
