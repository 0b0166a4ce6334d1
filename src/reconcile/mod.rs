//! Channel reconciliation
//!
//! Maps raw channel mentions scraped from a match page onto the curated
//! catalog and rewrites the match's channel list with the grouped result.
//! Only matches from target competitions are touched.

use indexmap::IndexSet;
use std::sync::Arc;
use tracing::{debug, trace};

use crate::catalog::ChannelCatalog;
use crate::models::{MatchRecord, RawChannelMention};

pub mod grouping;

pub use grouping::{group_channels, join_grouped, split_numbered_suffix, NumberedName};

/// Competitions whose matches get reconciled channel listings
pub const DEFAULT_TARGET_LEAGUES: &[&str] = &[
    "Champions League",
    "Europa League",
    "Conference League",
    "Premier League",
    "La Liga",
    "Serie A",
    "Bundesliga",
    "Ligue 1",
    "Primeira Liga",
    "Copa del Rey",
    "DFB Pokal",
    "FA Cup",
    "Coppa Italia",
];

/// Case-sensitive substring allow-list over league names
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeagueFilter {
    patterns: Vec<String>,
}

impl LeagueFilter {
    pub fn new<I, S>(patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            patterns: patterns.into_iter().map(Into::into).collect(),
        }
    }

    /// `"England - Premier League"` matches the `Premier League` pattern
    pub fn matches(&self, league: &str) -> bool {
        self.patterns.iter().any(|pattern| league.contains(pattern.as_str()))
    }
}

impl Default for LeagueFilter {
    fn default() -> Self {
        Self::new(DEFAULT_TARGET_LEAGUES.iter().copied())
    }
}

/// Resolve mentions to catalog display names.
///
/// A country-qualified key wins over the country-agnostic key; mentions
/// matching neither are dropped. The result holds each display name once,
/// in the order it was first resolved.
pub fn resolve(mentions: &[RawChannelMention], catalog: &ChannelCatalog) -> IndexSet<String> {
    let mut matched = IndexSet::new();

    for mention in mentions {
        if let Some(country) = mention.country.as_deref() {
            if let Some(display) = catalog.lookup(&mention.name, Some(country)) {
                matched.insert(display.to_string());
                continue;
            }
        }

        match catalog.lookup(&mention.name, None) {
            Some(display) => {
                matched.insert(display.to_string());
            }
            None => trace!(
                "Dropping unmatched channel '{}' ({})",
                mention.name,
                mention.country.as_deref().unwrap_or("-")
            ),
        }
    }

    matched
}

/// What happened to a match record during reconciliation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReconcileOutcome {
    /// League is not a target; record untouched
    Skipped,
    /// No mention matched the catalog; record untouched
    Unmatched,
    /// `channels` rewritten from this many resolved catalog names
    Updated(usize),
}

/// Applies the catalog and league filter to match records
#[derive(Debug, Clone)]
pub struct Reconciler {
    catalog: Arc<ChannelCatalog>,
    leagues: LeagueFilter,
}

impl Reconciler {
    pub fn new(catalog: Arc<ChannelCatalog>, leagues: LeagueFilter) -> Self {
        Self { catalog, leagues }
    }

    /// Reconciler over the built-in target league table
    pub fn with_default_leagues(catalog: Arc<ChannelCatalog>) -> Self {
        Self::new(catalog, LeagueFilter::default())
    }

    pub fn is_target_league(&self, league: &str) -> bool {
        self.leagues.matches(league)
    }

    pub fn resolve(&self, mentions: &[RawChannelMention]) -> IndexSet<String> {
        resolve(mentions, &self.catalog)
    }

    /// Overwrite `record.channels` with the grouped catalog names.
    ///
    /// Records outside the target leagues, and records where nothing
    /// resolved, keep whatever `channels` value they arrived with.
    pub fn reconcile_match(
        &self,
        record: &mut MatchRecord,
        mentions: &[RawChannelMention],
    ) -> ReconcileOutcome {
        if !self.is_target_league(&record.league) {
            return ReconcileOutcome::Skipped;
        }

        let matched = self.resolve(mentions);
        if matched.is_empty() {
            debug!("No matching channels found for '{}'", record.match_title);
            return ReconcileOutcome::Unmatched;
        }

        let channels = join_grouped(&matched);
        debug!(
            "Updated channels for '{}': {}",
            record.match_title, channels
        );
        record.channels = Some(channels);
        ReconcileOutcome::Updated(matched.len())
    }
}
