//! Daily digest pipeline
//!
//! One run scrapes tomorrow's schedule, reconciles the channel listings of
//! target-league matches against the catalog, renders the digest and
//! publishes it. Intermediate match files are written to the work directory
//! so each stage can also be run on its own from the CLI.

use chrono::{DateTime, NaiveDate, Utc};
use chrono_tz::Tz;
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, error, info, warn};

use crate::catalog::ChannelCatalog;
use crate::config::Config;
use crate::digest::DigestFormatter;
use crate::errors::AppResult;
use crate::models::MatchRecord;
use crate::publisher::Publisher;
use crate::reconcile::{ReconcileOutcome, Reconciler};
use crate::sources::livesoccertv::{
    extract_channel_mentions, extract_matches, schedule_url, sort_by_kickoff,
};
use crate::sources::PageFetcher;
use crate::utils::datetime::{iso_date, parse_timezone, target_date};
use crate::utils::escape_html;

/// Counters for one reconciliation pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReconcileSummary {
    pub updated: usize,
    pub unmatched: usize,
    pub skipped: usize,
    pub failed: usize,
}

/// Outcome of a full run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunReport {
    pub date: NaiveDate,
    pub matches: usize,
    pub reconcile: ReconcileSummary,
    pub published: bool,
}

/// Paths of the match files for one day
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifacts {
    pub scraped: PathBuf,
    pub processed: PathBuf,
}

impl Artifacts {
    pub fn for_date(work_dir: &Path, date: NaiveDate) -> Self {
        let date = iso_date(date);
        Self {
            scraped: work_dir.join(format!("matches_{date}.json")),
            processed: work_dir.join(format!("matches_processed_{date}.json")),
        }
    }

    async fn remove(&self) {
        for path in [&self.scraped, &self.processed] {
            match tokio::fs::remove_file(path).await {
                Ok(()) => debug!("Removed {}", path.display()),
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                Err(e) => warn!("Failed to remove {}: {}", path.display(), e),
            }
        }
    }
}

/// Write match records as 4-space indented JSON, keeping non-ASCII text as is
pub async fn write_matches(path: &Path, matches: &[MatchRecord]) -> AppResult<()> {
    let mut buffer = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut buffer, formatter);
    matches.serialize(&mut serializer)?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent).await?;
    }
    tokio::fs::write(path, buffer).await?;
    debug!("Saved {} matches to {}", matches.len(), path.display());
    Ok(())
}

pub async fn read_matches(path: &Path) -> AppResult<Vec<MatchRecord>> {
    let contents = tokio::fs::read_to_string(path).await?;
    Ok(serde_json::from_str(&contents)?)
}

/// Scrape → reconcile → publish, generic over where pages come from and
/// where the digest goes
pub struct DigestPipeline<F, P> {
    config: Arc<Config>,
    fetcher: F,
    publisher: P,
    timezone: Tz,
    formatter: DigestFormatter,
}

impl<F, P> DigestPipeline<F, P>
where
    F: PageFetcher,
    P: Publisher,
{
    pub fn new(config: Arc<Config>, fetcher: F, publisher: P) -> AppResult<Self> {
        let timezone = parse_timezone(&config.schedule.timezone)?;
        let formatter = DigestFormatter::new(&config.digest, config.source.base_url.clone());
        Ok(Self {
            config,
            fetcher,
            publisher,
            timezone,
            formatter,
        })
    }

    pub fn formatter(&self) -> &DigestFormatter {
        &self.formatter
    }

    pub fn publisher(&self) -> &P {
        &self.publisher
    }

    /// The day a run at `now` covers
    pub fn target_date(&self, now: DateTime<Utc>) -> NaiveDate {
        target_date(&self.timezone, now)
    }

    /// Fetch and parse the schedule for `date`, sorted by kick-off
    pub async fn scrape(&self, date: NaiveDate) -> AppResult<Vec<MatchRecord>> {
        let url = schedule_url(&self.config.source.base_url, date);
        info!("Fetching matches for {} from {}", iso_date(date), url);

        let html = self.fetcher.fetch_page(&url).await?;
        let mut matches = extract_matches(&html, &self.config.source.base_url, &self.timezone)?;
        sort_by_kickoff(&mut matches);

        info!("Found {} matches on {}", matches.len(), iso_date(date));
        Ok(matches)
    }

    /// Build a reconciler from the configured catalog files
    pub fn load_reconciler(&self) -> AppResult<Reconciler> {
        let catalog = ChannelCatalog::load(
            &self.config.catalog.current_names_path,
            self.config.catalog.original_names_path.as_deref(),
        )?;
        info!("Loaded {} catalog entries", catalog.len());
        Ok(Reconciler::with_default_leagues(Arc::new(catalog)))
    }

    /// Reconcile target-league matches in place, one at a time in list order.
    ///
    /// A match page that cannot be fetched or parsed leaves that match as
    /// scraped.
    pub async fn reconcile_matches(
        &self,
        reconciler: &Reconciler,
        matches: &mut [MatchRecord],
    ) -> ReconcileSummary {
        let mut summary = ReconcileSummary::default();

        for record in matches.iter_mut() {
            if !reconciler.is_target_league(&record.league) {
                summary.skipped += 1;
                continue;
            }
            let Some(url) = record.url.clone() else {
                debug!("No match page for '{}'", record.match_title);
                summary.unmatched += 1;
                continue;
            };

            debug!("Processing match '{}' ({})", record.match_title, record.league);
            let mentions = self
                .fetcher
                .fetch_page(&url)
                .await
                .and_then(|html| extract_channel_mentions(&html));
            let mentions = match mentions {
                Ok(mentions) => mentions,
                Err(e) => {
                    warn!("Failed to read match page for '{}': {}", record.match_title, e);
                    summary.failed += 1;
                    continue;
                }
            };

            match reconciler.reconcile_match(record, &mentions) {
                ReconcileOutcome::Updated(_) => summary.updated += 1,
                ReconcileOutcome::Unmatched => summary.unmatched += 1,
                ReconcileOutcome::Skipped => summary.skipped += 1,
            }
        }

        info!(
            "Reconciled {} matches: {} updated, {} unmatched, {} skipped, {} failed",
            matches.len(),
            summary.updated,
            summary.unmatched,
            summary.skipped,
            summary.failed
        );
        summary
    }

    /// Render and publish the digest for `date`
    pub async fn publish_matches(&self, matches: &[MatchRecord], date: NaiveDate) -> AppResult<()> {
        let text = self.formatter.format(matches, date);
        self.publisher.publish(&text).await
    }

    /// Full run for `date`
    pub async fn run_for_date(&self, date: NaiveDate) -> AppResult<RunReport> {
        let mut report = RunReport {
            date,
            matches: 0,
            reconcile: ReconcileSummary::default(),
            published: false,
        };

        let mut matches = self.scrape(date).await?;
        if matches.is_empty() {
            info!("No matches found for {}, nothing to publish", iso_date(date));
            return Ok(report);
        }
        report.matches = matches.len();

        let artifacts = Artifacts::for_date(&self.config.storage.work_dir, date);
        write_matches(&artifacts.scraped, &matches).await?;

        let reconciler = self.load_reconciler()?;
        report.reconcile = self.reconcile_matches(&reconciler, &mut matches).await;
        write_matches(&artifacts.processed, &matches).await?;

        self.publish_matches(&matches, date).await?;
        report.published = true;

        if !self.config.storage.keep_artifacts {
            artifacts.remove().await;
        }
        Ok(report)
    }

    /// Full run for tomorrow
    pub async fn run(&self) -> AppResult<RunReport> {
        self.run_for_date(self.target_date(Utc::now())).await
    }

    /// Full run that reports its own failure to the channel.
    ///
    /// The failure notice is best-effort; the original error is returned
    /// either way.
    pub async fn run_and_notify(&self) -> AppResult<RunReport> {
        match self.run().await {
            Ok(report) => Ok(report),
            Err(e) => {
                error!("Daily digest run failed: {}", e);
                let notice = format!("⚠️ Error: {}", escape_html(&e.to_string()));
                if let Err(notify_err) = self.publisher.publish(&notice).await {
                    error!("Failed to publish error notice: {}", notify_err);
                }
                Err(e)
            }
        }
    }
}
