use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;
use tracing::info;

pub mod defaults;

use crate::errors::{AppError, AppResult};
use defaults::*;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub catalog: CatalogConfig,
    #[serde(default)]
    pub source: SourceConfig,
    #[serde(default)]
    pub schedule: ScheduleConfig,
    #[serde(default)]
    pub telegram: TelegramConfig,
    #[serde(default)]
    pub digest: DigestConfig,
    #[serde(default)]
    pub storage: StorageConfig,
}

/// Curated channel list locations
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogConfig {
    /// Current channel names, one per line; may carry a `(Country)` tag
    #[serde(default = "default_current_names_path")]
    pub current_names_path: PathBuf,
    /// Display names aligned by line with `current_names_path`
    #[serde(default = "default_original_names_path")]
    pub original_names_path: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    #[serde(default = "default_request_timeout")]
    pub request_timeout: String,
    /// Attempts per page, including the first one
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
    #[serde(default = "default_retry_delay")]
    pub retry_delay: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleConfig {
    /// Six-field cron expression, evaluated in `timezone`
    #[serde(default = "default_cron")]
    pub cron: String,
    #[serde(default = "default_timezone")]
    pub timezone: String,
    /// Publish once immediately when the daemon starts
    #[serde(default = "default_run_on_start")]
    pub run_on_start: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TelegramConfig {
    /// Bot token; `MATCHDAY_DIGEST_TELEGRAM_TOKEN` takes precedence
    #[serde(default)]
    pub bot_token: String,
    /// Channel username (`@name`) or numeric chat id
    #[serde(default)]
    pub chat_id: String,
    #[serde(default = "default_telegram_api_base")]
    pub api_base: String,
    #[serde(default = "default_max_message_length")]
    pub max_message_length: usize,
    #[serde(default = "default_disable_web_page_preview")]
    pub disable_web_page_preview: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DigestConfig {
    #[serde(default = "default_digest_title")]
    pub title: String,
    /// Free-form lines shown under the date, e.g. channel promotions
    #[serde(default)]
    pub promo_lines: Vec<String>,
    #[serde(default = "default_listing_link_label")]
    pub listing_link_label: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Where the per-day match JSON files are written
    #[serde(default = "default_work_dir")]
    pub work_dir: PathBuf,
    /// Keep the per-day JSON files after a successful publish
    #[serde(default = "default_keep_artifacts")]
    pub keep_artifacts: bool,
}

// Catalog defaults
fn default_current_names_path() -> PathBuf {
    PathBuf::from(DEFAULT_CURRENT_NAMES_PATH)
}

fn default_original_names_path() -> Option<PathBuf> {
    Some(PathBuf::from(DEFAULT_ORIGINAL_NAMES_PATH))
}

// Source defaults
fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_user_agent() -> String {
    DEFAULT_USER_AGENT.to_string()
}

fn default_request_timeout() -> String {
    DEFAULT_REQUEST_TIMEOUT.to_string()
}

fn default_max_attempts() -> u32 {
    DEFAULT_MAX_ATTEMPTS
}

fn default_retry_delay() -> String {
    DEFAULT_RETRY_DELAY.to_string()
}

// Schedule defaults
fn default_cron() -> String {
    DEFAULT_CRON.to_string()
}

fn default_timezone() -> String {
    DEFAULT_TIMEZONE.to_string()
}

fn default_run_on_start() -> bool {
    DEFAULT_RUN_ON_START
}

// Telegram defaults
fn default_telegram_api_base() -> String {
    DEFAULT_TELEGRAM_API_BASE.to_string()
}

fn default_max_message_length() -> usize {
    DEFAULT_MAX_MESSAGE_LENGTH
}

fn default_disable_web_page_preview() -> bool {
    DEFAULT_DISABLE_WEB_PAGE_PREVIEW
}

// Digest defaults
fn default_digest_title() -> String {
    DEFAULT_DIGEST_TITLE.to_string()
}

fn default_listing_link_label() -> String {
    DEFAULT_LISTING_LINK_LABEL.to_string()
}

// Storage defaults
fn default_work_dir() -> PathBuf {
    PathBuf::from(DEFAULT_WORK_DIR)
}

fn default_keep_artifacts() -> bool {
    DEFAULT_KEEP_ARTIFACTS
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            current_names_path: default_current_names_path(),
            original_names_path: default_original_names_path(),
        }
    }
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            user_agent: default_user_agent(),
            request_timeout: default_request_timeout(),
            max_attempts: default_max_attempts(),
            retry_delay: default_retry_delay(),
        }
    }
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            cron: default_cron(),
            timezone: default_timezone(),
            run_on_start: default_run_on_start(),
        }
    }
}

impl Default for TelegramConfig {
    fn default() -> Self {
        Self {
            bot_token: String::new(),
            chat_id: String::new(),
            api_base: default_telegram_api_base(),
            max_message_length: default_max_message_length(),
            disable_web_page_preview: default_disable_web_page_preview(),
        }
    }
}

impl Default for DigestConfig {
    fn default() -> Self {
        Self {
            title: default_digest_title(),
            promo_lines: Vec::new(),
            listing_link_label: default_listing_link_label(),
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            work_dir: default_work_dir(),
            keep_artifacts: default_keep_artifacts(),
        }
    }
}

impl SourceConfig {
    pub fn request_timeout(&self) -> AppResult<Duration> {
        parse_duration("source.request_timeout", &self.request_timeout)
    }

    pub fn retry_delay(&self) -> AppResult<Duration> {
        parse_duration("source.retry_delay", &self.retry_delay)
    }
}

impl TelegramConfig {
    /// Fails when the bot cannot be addressed at all
    pub fn validate(&self) -> AppResult<()> {
        if self.bot_token.trim().is_empty() {
            return Err(AppError::configuration(format!(
                "telegram.bot_token is empty (set it in the config file or {TELEGRAM_TOKEN_ENV})"
            )));
        }
        if self.chat_id.trim().is_empty() {
            return Err(AppError::configuration("telegram.chat_id is empty"));
        }
        if self.max_message_length == 0 {
            return Err(AppError::configuration(
                "telegram.max_message_length must be greater than zero",
            ));
        }
        Ok(())
    }
}

fn parse_duration(field: &str, value: &str) -> AppResult<Duration> {
    humantime::parse_duration(value)
        .map_err(|e| AppError::configuration(format!("{field} = '{value}' is not a duration: {e}")))
}

impl Config {
    pub fn load_from_file(config_file: &str) -> Result<Self> {
        let mut config = if std::path::Path::new(&config_file).exists() {
            let contents = std::fs::read_to_string(config_file)?;
            toml::from_str(&contents)?
        } else {
            let default_config = Self::default();
            let contents = toml::to_string_pretty(&default_config)?;
            std::fs::write(config_file, contents)?;
            info!("Created default config file: {}", config_file);
            default_config
        };
        config.apply_env_overrides();
        Ok(config)
    }

    /// Secrets are read from the environment so they stay out of the config file
    pub fn apply_env_overrides(&mut self) {
        if let Ok(token) = std::env::var(TELEGRAM_TOKEN_ENV) {
            if !token.trim().is_empty() {
                self.telegram.bot_token = token;
            }
        }
    }
}
