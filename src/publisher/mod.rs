//! Digest publishers
//!
//! A publisher takes a fully rendered message body and delivers it.
//! Telegram is the production target; stdout backs dry runs and previews.

use async_trait::async_trait;

use crate::errors::AppResult;

pub mod telegram;

pub use telegram::{split_message, TelegramPublisher};

/// Delivers a rendered digest
#[async_trait]
pub trait Publisher: Send + Sync {
    /// Deliver `text`; implementations split it if their transport needs to
    async fn publish(&self, text: &str) -> AppResult<()>;
}

/// Prints messages instead of sending them, split exactly as Telegram
/// would receive them
#[derive(Debug, Clone)]
pub struct StdoutPublisher {
    max_message_length: usize,
}

impl StdoutPublisher {
    pub fn new(max_message_length: usize) -> Self {
        Self { max_message_length }
    }
}

#[async_trait]
impl Publisher for StdoutPublisher {
    async fn publish(&self, text: &str) -> AppResult<()> {
        let parts = split_message(text, self.max_message_length);
        let total = parts.len();
        for (index, part) in parts.iter().enumerate() {
            println!("----- message {}/{} -----", index + 1, total);
            println!("{part}");
        }
        Ok(())
    }
}
