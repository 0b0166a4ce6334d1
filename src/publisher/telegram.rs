//! Telegram Bot API publisher

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, info};

use super::Publisher;
use crate::config::TelegramConfig;
use crate::errors::{AppError, AppResult, PublishError};

#[derive(Debug, Serialize)]
struct SendMessageRequest<'a> {
    chat_id: &'a str,
    text: &'a str,
    parse_mode: &'a str,
    disable_web_page_preview: bool,
}

#[derive(Debug, Deserialize)]
struct TelegramResponse {
    ok: bool,
    #[serde(default)]
    description: Option<String>,
}

impl TelegramResponse {
    fn into_result(self) -> Result<(), PublishError> {
        if self.ok {
            Ok(())
        } else {
            Err(PublishError::rejected(
                self.description
                    .unwrap_or_else(|| "no description".to_string()),
            ))
        }
    }
}

/// Sends the digest to a chat or channel through `sendMessage`
#[derive(Debug, Clone)]
pub struct TelegramPublisher {
    client: Client,
    endpoint: String,
    chat_id: String,
    max_message_length: usize,
    disable_web_page_preview: bool,
}

impl TelegramPublisher {
    pub fn new(config: &TelegramConfig) -> AppResult<Self> {
        config.validate()?;

        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| AppError::configuration(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            endpoint: format!(
                "{}/bot{}/sendMessage",
                config.api_base.trim_end_matches('/'),
                config.bot_token
            ),
            chat_id: config.chat_id.clone(),
            max_message_length: config.max_message_length,
            disable_web_page_preview: config.disable_web_page_preview,
        })
    }

    /// Send one message that already fits the length limit
    pub async fn send_message(&self, text: &str) -> AppResult<()> {
        let request = SendMessageRequest {
            chat_id: &self.chat_id,
            text,
            parse_mode: "HTML",
            disable_web_page_preview: self.disable_web_page_preview,
        };

        // The endpoint embeds the bot token; keep it out of error messages
        let response = self
            .client
            .post(&self.endpoint)
            .json(&request)
            .send()
            .await
            .map_err(|e| PublishError::transport(e.without_url().to_string()))?;

        let status = response.status();
        let body: TelegramResponse = response.json().await.map_err(|e| {
            PublishError::transport(format!("Unreadable response ({status}): {}", e.without_url()))
        })?;
        body.into_result()?;

        debug!("Sent {} characters to {}", text.chars().count(), self.chat_id);
        Ok(())
    }
}

#[async_trait]
impl Publisher for TelegramPublisher {
    async fn publish(&self, text: &str) -> AppResult<()> {
        let parts = split_message(text, self.max_message_length);
        let total = parts.len();
        for part in &parts {
            self.send_message(part).await?;
        }
        info!("Published digest to {} in {} message(s)", self.chat_id, total);
        Ok(())
    }
}

/// Split `text` into parts of at most `max_length` characters.
///
/// Splits happen on line boundaries; the newline at a split point is
/// dropped. A single line longer than the limit is cut mid-line. Empty
/// parts are never produced.
pub fn split_message(text: &str, max_length: usize) -> Vec<String> {
    let max_length = max_length.max(1);
    let mut parts = Vec::new();
    let mut current = String::new();
    let mut current_len = 0;
    let mut has_lines = false;

    for line in text.split('\n') {
        let line_len = line.chars().count();

        if has_lines && current_len + 1 + line_len > max_length {
            parts.push(std::mem::take(&mut current));
            current_len = 0;
            has_lines = false;
        }

        if line_len > max_length {
            let chars: Vec<char> = line.chars().collect();
            let mut chunks = chars.chunks(max_length).peekable();
            while let Some(chunk) = chunks.next() {
                let chunk: String = chunk.iter().collect();
                if chunks.peek().is_some() {
                    parts.push(chunk);
                } else {
                    current_len = chunk.chars().count();
                    current = chunk;
                }
            }
            has_lines = true;
            continue;
        }

        if has_lines {
            current.push('\n');
            current_len += 1;
        }
        current.push_str(line);
        current_len += line_len;
        has_lines = true;
    }

    if has_lines {
        parts.push(current);
    }
    parts.retain(|part| !part.trim().is_empty());
    parts
}
