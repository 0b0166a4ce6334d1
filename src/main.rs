use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use matchday_digest::{
    config::Config,
    pipeline::{read_matches, write_matches, Artifacts, DigestPipeline},
    publisher::{Publisher, StdoutPublisher, TelegramPublisher},
    scheduler::DailyScheduler,
    sources::HttpPageFetcher,
    utils::datetime::parse_iso_date,
};

#[derive(Parser)]
#[command(name = "matchday-digest")]
#[command(version)]
#[command(about = "Daily football TV schedule digest for Telegram")]
#[command(long_about = None)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, default_value = "config.toml")]
    config: String,

    /// Log level
    #[arg(short = 'v', long, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run on the configured cron schedule until interrupted
    Daemon,

    /// Run the full pipeline once for tomorrow
    Run {
        /// Print the digest instead of sending it
        #[arg(long)]
        dry_run: bool,
    },

    /// Scrape a day's schedule into a match file
    Scrape {
        /// Day to scrape (YYYY-MM-DD), defaults to tomorrow
        #[arg(long, value_name = "DATE")]
        date: Option<String>,

        /// Output file, defaults to the work directory
        #[arg(short, long, value_name = "PATH")]
        output: Option<PathBuf>,
    },

    /// Reconcile channel listings in an existing match file
    Reconcile {
        #[arg(short, long, value_name = "PATH")]
        input: PathBuf,

        /// Output file; prints to stdout when omitted
        #[arg(short, long, value_name = "PATH")]
        output: Option<PathBuf>,
    },

    /// Print the digest messages for a match file
    Preview {
        #[arg(short, long, value_name = "PATH")]
        input: PathBuf,

        /// Day shown in the header (YYYY-MM-DD), defaults to tomorrow
        #[arg(long, value_name = "DATE")]
        date: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_filter = format!("matchday_digest={}", cli.log_level);
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| log_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting matchday-digest v{}", env!("CARGO_PKG_VERSION"));

    let config = Arc::new(Config::load_from_file(&cli.config)?);
    info!("Configuration loaded from: {}", cli.config);

    let fetcher = HttpPageFetcher::new(&config.source)?;
    let preview_publisher =
        StdoutPublisher::new(config.telegram.max_message_length);

    match cli.command {
        Command::Daemon => {
            let publisher = TelegramPublisher::new(&config.telegram)?;
            let pipeline = DigestPipeline::new(config.clone(), fetcher, publisher)?;
            let scheduler = DailyScheduler::from_config(&config.schedule)?;

            let cancellation_token = CancellationToken::new();
            let shutdown_token = cancellation_token.clone();
            tokio::spawn(async move {
                match tokio::signal::ctrl_c().await {
                    Ok(()) => info!("Received Ctrl+C, shutting down"),
                    Err(e) => error!("Failed to listen for Ctrl+C: {}", e),
                }
                shutdown_token.cancel();
            });

            scheduler
                .run(cancellation_token, || async {
                    if let Ok(report) = pipeline.run_and_notify().await {
                        info!(
                            "Run for {} finished: {} matches, {} reconciled, published={}",
                            report.date, report.matches, report.reconcile.updated, report.published
                        );
                    }
                })
                .await?;
        }
        Command::Run { dry_run } => {
            if dry_run {
                run_once(config, fetcher, preview_publisher).await?;
            } else {
                let publisher = TelegramPublisher::new(&config.telegram)?;
                run_once(config, fetcher, publisher).await?;
            }
        }
        Command::Scrape { date, output } => {
            let pipeline = DigestPipeline::new(config.clone(), fetcher, preview_publisher)?;
            let date = match date {
                Some(date) => parse_iso_date(&date)?,
                None => pipeline.target_date(chrono::Utc::now()),
            };

            let matches = pipeline.scrape(date).await?;
            let output =
                output.unwrap_or_else(|| Artifacts::for_date(&config.storage.work_dir, date).scraped);
            write_matches(&output, &matches).await?;
            info!("Saved {} matches to {}", matches.len(), output.display());
        }
        Command::Reconcile { input, output } => {
            let pipeline = DigestPipeline::new(config, fetcher, preview_publisher)?;
            let reconciler = pipeline.load_reconciler()?;

            let mut matches = read_matches(&input).await?;
            pipeline.reconcile_matches(&reconciler, &mut matches).await;

            match output {
                Some(output) => {
                    write_matches(&output, &matches).await?;
                    info!("Saved {} matches to {}", matches.len(), output.display());
                }
                None => println!("{}", serde_json::to_string_pretty(&matches)?),
            }
        }
        Command::Preview { input, date } => {
            let pipeline = DigestPipeline::new(config, fetcher, preview_publisher)?;
            let date = match date {
                Some(date) => parse_iso_date(&date)?,
                None => pipeline.target_date(chrono::Utc::now()),
            };

            let matches = read_matches(&input).await?;
            pipeline.publish_matches(&matches, date).await?;
        }
    }

    Ok(())
}

async fn run_once<P: Publisher>(
    config: Arc<Config>,
    fetcher: HttpPageFetcher,
    publisher: P,
) -> Result<()> {
    let pipeline = DigestPipeline::new(config, fetcher, publisher)?;
    let report = pipeline.run_and_notify().await?;
    info!(
        "Run for {} finished: {} matches, {} reconciled, published={}",
        report.date, report.matches, report.reconcile.updated, report.published
    );
    Ok(())
}
