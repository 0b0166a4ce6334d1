/// Configuration default values
///
/// This module contains all the default values for configuration options,
/// making them easily changeable in one central location.
// Catalog defaults
pub const DEFAULT_CURRENT_NAMES_PATH: &str = "channel.txt";
pub const DEFAULT_ORIGINAL_NAMES_PATH: &str = "OG_channel.txt";

// Listing site defaults
pub const DEFAULT_BASE_URL: &str = "https://www.livesoccertv.com";
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0 Safari/537.36";
pub const DEFAULT_REQUEST_TIMEOUT: &str = "30s";
pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;
pub const DEFAULT_RETRY_DELAY: &str = "2s";

// Schedule defaults (07:00 every day, seconds-first cron syntax)
pub const DEFAULT_CRON: &str = "0 0 7 * * *";
pub const DEFAULT_TIMEZONE: &str = "Asia/Jakarta";
pub const DEFAULT_RUN_ON_START: bool = true;

// Telegram defaults
pub const DEFAULT_TELEGRAM_API_BASE: &str = "https://api.telegram.org";
pub const DEFAULT_MAX_MESSAGE_LENGTH: usize = 4096;
pub const DEFAULT_DISABLE_WEB_PAGE_PREVIEW: bool = true;
pub const TELEGRAM_TOKEN_ENV: &str = "MATCHDAY_DIGEST_TELEGRAM_TOKEN";

// Digest defaults
pub const DEFAULT_DIGEST_TITLE: &str = "⚽ Football Match Schedule ⚽";
pub const DEFAULT_LISTING_LINK_LABEL: &str = "Full TV listings";

// Storage defaults
pub const DEFAULT_WORK_DIR: &str = "./data";
pub const DEFAULT_KEEP_ARTIFACTS: bool = false;
