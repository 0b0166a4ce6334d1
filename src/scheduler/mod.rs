//! Daily job scheduler
//!
//! Evaluates a cron expression in the configured timezone and sleeps until
//! each fire time. A job in flight always runs to completion; cancellation
//! is only observed while waiting.

use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use cron::Schedule;
use std::future::Future;
use std::str::FromStr;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::config::ScheduleConfig;
use crate::errors::{AppError, AppResult};
use crate::utils::datetime::parse_timezone;

#[derive(Debug, Clone)]
pub struct DailyScheduler {
    schedule: Schedule,
    timezone: Tz,
    run_on_start: bool,
}

impl DailyScheduler {
    pub fn new(cron_expression: &str, timezone: Tz, run_on_start: bool) -> AppResult<Self> {
        let schedule = Schedule::from_str(cron_expression).map_err(|e| {
            AppError::configuration(format!("Invalid cron expression '{cron_expression}': {e}"))
        })?;
        Ok(Self {
            schedule,
            timezone,
            run_on_start,
        })
    }

    pub fn from_config(config: &ScheduleConfig) -> AppResult<Self> {
        Self::new(
            &config.cron,
            parse_timezone(&config.timezone)?,
            config.run_on_start,
        )
    }

    /// First fire time strictly after `now`, with the cron fields read as
    /// wall-clock time in the scheduler's timezone
    pub fn next_fire_after(&self, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
        self.schedule
            .after(&now.with_timezone(&self.timezone))
            .next()
            .map(|next| next.with_timezone(&Utc))
    }

    /// Run `job` on schedule until `cancellation_token` fires
    pub async fn run<F, Fut>(&self, cancellation_token: CancellationToken, mut job: F) -> AppResult<()>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = ()>,
    {
        info!("Starting daily scheduler ({})", self.timezone);

        if self.run_on_start && !cancellation_token.is_cancelled() {
            info!("Running job on start");
            job().await;
        }

        loop {
            let now = Utc::now();
            let Some(next) = self.next_fire_after(now) else {
                warn!("Cron schedule has no upcoming fire times, stopping");
                break;
            };
            let wait = (next - now).to_std().unwrap_or_default();
            info!(
                "Next run at {} ({})",
                next.with_timezone(&self.timezone).format("%Y-%m-%d %H:%M:%S %Z"),
                humantime::format_duration(std::time::Duration::from_secs(wait.as_secs()))
            );

            tokio::select! {
                _ = tokio::time::sleep(wait) => {
                    debug!("Scheduled time reached");
                    job().await;
                }
                _ = cancellation_token.cancelled() => {
                    info!("Scheduler received cancellation signal, shutting down");
                    break;
                }
            }
        }

        info!("Scheduler stopped");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;

    fn jakarta() -> Tz {
        "Asia/Jakarta".parse().unwrap()
    }

    #[test]
    fn test_next_fire_uses_scheduler_timezone() {
        let scheduler = DailyScheduler::new("0 0 7 * * *", jakarta(), false).unwrap();

        // 06:00 in Jakarta: fires the same morning at 07:00 (00:00 UTC)
        let before = Utc.with_ymd_and_hms(2025, 4, 3, 23, 0, 0).unwrap();
        assert_eq!(
            scheduler.next_fire_after(before),
            Some(Utc.with_ymd_and_hms(2025, 4, 4, 0, 0, 0).unwrap())
        );

        // 07:30 in Jakarta: next morning
        let after = Utc.with_ymd_and_hms(2025, 4, 4, 0, 30, 0).unwrap();
        assert_eq!(
            scheduler.next_fire_after(after),
            Some(Utc.with_ymd_and_hms(2025, 4, 5, 0, 0, 0).unwrap())
        );
    }

    #[test]
    fn test_invalid_cron_is_configuration_error() {
        assert!(matches!(
            DailyScheduler::new("every morning", jakarta(), false),
            Err(AppError::Configuration { .. })
        ));
    }

    #[test]
    fn test_from_config_defaults() {
        let scheduler = DailyScheduler::from_config(&ScheduleConfig::default()).unwrap();
        assert!(scheduler.run_on_start);
        assert_eq!(scheduler.timezone, jakarta());
    }

    #[tokio::test]
    async fn test_run_on_start_then_cancel() {
        let scheduler = DailyScheduler::new("0 0 7 * * *", jakarta(), true).unwrap();
        let token = CancellationToken::new();
        let runs = Arc::new(AtomicU32::new(0));

        let job_token = token.clone();
        let job_runs = runs.clone();
        scheduler
            .run(token, move || {
                let token = job_token.clone();
                let runs = job_runs.clone();
                async move {
                    runs.fetch_add(1, Ordering::SeqCst);
                    token.cancel();
                }
            })
            .await
            .unwrap();

        assert_eq!(runs.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_cancelled_before_start_runs_nothing() {
        let scheduler = DailyScheduler::new("0 0 7 * * *", jakarta(), true).unwrap();
        let token = CancellationToken::new();
        token.cancel();
        let runs = AtomicU32::new(0);

        scheduler
            .run(token, || async {
                runs.fetch_add(1, Ordering::SeqCst);
            })
            .await
            .unwrap();

        assert_eq!(runs.load(Ordering::SeqCst), 0);
    }
}
