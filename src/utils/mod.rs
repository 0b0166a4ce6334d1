//! Utility functions for the matchday digest
//!
//! - `datetime` for the digest day, kick-off times and date formatting
//! - `retry` for transient fetch failures

pub mod datetime;
pub mod retry;

/// Escape text for Telegram's HTML parse mode
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

/// Join a base URL and a site-relative path without doubling slashes
pub fn join_url(base_url: &str, path: &str) -> String {
    match url::Url::parse(base_url).and_then(|base| base.join(path)) {
        Ok(joined) => joined.to_string(),
        Err(_) => format!(
            "{}/{}",
            base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_html() {
        assert_eq!(escape_html("Brighton & Hove <U21>"), "Brighton &amp; Hove &lt;U21&gt;");
        assert_eq!(escape_html("plain"), "plain");
    }

    #[test]
    fn test_join_url() {
        assert_eq!(
            join_url("https://www.livesoccertv.com", "/match/123/a-vs-b/"),
            "https://www.livesoccertv.com/match/123/a-vs-b/"
        );
        assert_eq!(
            join_url("https://www.livesoccertv.com/", "schedules/2025-04-04/"),
            "https://www.livesoccertv.com/schedules/2025-04-04/"
        );
    }
}
