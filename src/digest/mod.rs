//! Telegram digest rendering
//!
//! Turns the reconciled match list into one HTML-formatted message body.
//! Matches are grouped by league in the order leagues first appear, so the
//! kick-off ordering from the schedule carries through.

use chrono::NaiveDate;
use indexmap::IndexMap;

use crate::config::DigestConfig;
use crate::models::MatchRecord;
use crate::utils::datetime::{display_date, iso_date};
use crate::utils::{escape_html, join_url};

pub const HEADER_SEPARATOR: &str = "────────────────────────────────";
pub const LEAGUE_SEPARATOR: &str = "────────────────";
pub const DEFAULT_FLAG: &str = "⚽";
pub const CHANNELS_NOT_AVAILABLE: &str = "Not available";

const DEFAULT_LEAGUE_FLAGS: &[(&str, &str)] = &[
    ("England", "🏴󠁧󠁢󠁥󠁮󠁧󠁿"),
    ("Spain", "🇪🇸"),
    ("Italy", "🇮🇹"),
    ("Germany", "🇩🇪"),
    ("France", "🇫🇷"),
    ("Netherlands", "🇳🇱"),
    ("Portugal", "🇵🇹"),
    ("Brazil", "🇧🇷"),
    ("Argentina", "🇦🇷"),
    ("UEFA", "🏆"),
    ("FIFA", "🌍"),
    ("Asia", "🌏"),
    ("Africa", "🌍"),
    ("South America", "🌎"),
    ("Australia", "🇦🇺"),
    ("Turkey", "🇹🇷"),
];

/// Ordered country → emoji table; the first case-insensitive substring hit wins
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeagueFlags {
    entries: Vec<(String, String)>,
}

impl LeagueFlags {
    pub fn new<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        Self {
            entries: entries
                .into_iter()
                .map(|(country, flag)| (country.as_ref().to_lowercase(), flag.into()))
                .collect(),
        }
    }

    pub fn flag_for(&self, league: &str) -> &str {
        let league = league.to_lowercase();
        self.entries
            .iter()
            .find(|(country, _)| league.contains(country.as_str()))
            .map(|(_, flag)| flag.as_str())
            .unwrap_or(DEFAULT_FLAG)
    }
}

impl Default for LeagueFlags {
    fn default() -> Self {
        Self::new(DEFAULT_LEAGUE_FLAGS.iter().copied())
    }
}

/// Renders the daily digest body
#[derive(Debug, Clone)]
pub struct DigestFormatter {
    title: String,
    promo_lines: Vec<String>,
    listing_link_label: String,
    base_url: String,
    flags: LeagueFlags,
}

impl DigestFormatter {
    pub fn new(config: &DigestConfig, base_url: impl Into<String>) -> Self {
        Self {
            title: config.title.clone(),
            promo_lines: config.promo_lines.clone(),
            listing_link_label: config.listing_link_label.clone(),
            base_url: base_url.into(),
            flags: LeagueFlags::default(),
        }
    }

    pub fn with_flags(mut self, flags: LeagueFlags) -> Self {
        self.flags = flags;
        self
    }

    /// Title, date, promo lines, listings link and separator
    pub fn header(&self, date: NaiveDate) -> String {
        let mut header = format!("{}\n📅 {}\n\n", self.title, display_date(date));
        for line in &self.promo_lines {
            header.push_str(line);
            header.push('\n');
        }

        let listing_url = join_url(&self.base_url, &format!("/schedules/{}/", iso_date(date)));
        header.push_str(&format!(
            "🌐 <a href=\"{}\">{}</a>\n",
            escape_html(&listing_url),
            escape_html(&self.listing_link_label)
        ));
        header.push_str(HEADER_SEPARATOR);
        header.push('\n');
        header
    }

    pub fn format_match(record: &MatchRecord) -> String {
        let channels = record
            .channels
            .as_deref()
            .unwrap_or(CHANNELS_NOT_AVAILABLE);
        format!(
            "✦   {} | <b>{}</b>\n📺  {}\n",
            escape_html(&record.time),
            escape_html(&record.match_title),
            escape_html(channels)
        )
    }

    fn format_league(&self, league: &str, records: &[&MatchRecord]) -> String {
        let mut block = format!(
            "\n{} <b>{}</b>\n{}\n",
            self.flags.flag_for(league),
            escape_html(league),
            LEAGUE_SEPARATOR
        );
        let body: Vec<String> = records.iter().map(|r| Self::format_match(r)).collect();
        block.push_str(&body.join("\n"));
        block
    }

    /// Full digest body for `date`
    pub fn format(&self, matches: &[MatchRecord], date: NaiveDate) -> String {
        let mut leagues: IndexMap<&str, Vec<&MatchRecord>> = IndexMap::new();
        for record in matches {
            leagues.entry(record.league.as_str()).or_default().push(record);
        }

        let blocks: Vec<String> = leagues
            .iter()
            .map(|(league, records)| self.format_league(league, records))
            .collect();

        let mut message = self.header(date);
        message.push_str(&blocks.join("\n"));
        message
    }
}
