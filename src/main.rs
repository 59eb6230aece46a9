//! CLI for cancerboard
//!
//! Subcommands:
//! - `live`: follow the feed and print the leaderboards on every change
//! - `history`: render a channel's history chart to SVG
//! - `profile`: show a channel's Twitch profile
//! - `leaderboards`: print one leaderboard fetched over HTTP

use std::time::Duration;

use cancerboard::api::{ApiClient, ProfileCache, ProfileService};
use cancerboard::config::{Settings, load_config};
use cancerboard::dashboard::{BoardSelection, Dashboard};
use cancerboard::persistence::ProfileStore;
use cancerboard::render::svg::history_to_svg;
use cancerboard::render::text::bars_to_text;
use cancerboard::render::{BarChart, Field, HistoryChartRenderer};
use clap::Parser;
use tracing::{error, info, warn};

#[derive(Parser)]
#[command(name = "cancerboard")]
enum Command {
    /// Follow the live feed and print the leaderboards on every change
    Live {
        #[arg(long, default_value = "cancer")]
        metric: String,
        #[arg(long, default_value = "minute")]
        interval: String,
        /// Poll the HTTP API instead of subscribing to the feed
        #[arg(long)]
        poll: bool,
    },
    /// Render the history chart of a channel
    History {
        channel: String,
        /// SVG output file (default: stdout)
        #[arg(long)]
        out: Option<String>,
    },
    /// Show the Twitch profile of a channel
    Profile { channel: String },
    /// Print one leaderboard
    Leaderboards {
        #[arg(long, default_value = "cancer")]
        metric: String,
        #[arg(long, default_value = "minute")]
        interval: String,
    },
}

#[tokio::main]
async fn main() {
    let _ = dotenvy::dotenv();
    cancerboard::utils::logging::init("info");

    let cmd = Command::parse();

    let config = match load_config() {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            return;
        }
    };

    let result = match cmd {
        Command::Live {
            metric,
            interval,
            poll,
        } => run_live(&config, BoardSelection { metric, interval }, poll).await,
        Command::History { channel, out } => run_history(&config, &channel, out.as_deref()).await,
        Command::Profile { channel } => run_profile(&config, &channel).await,
        Command::Leaderboards { metric, interval } => {
            run_leaderboards(&config, &metric, &interval).await
        }
    };

    if let Err(e) = result {
        error!("{}", e);
    }
}

async fn run_live(
    config: &Settings,
    board: BoardSelection,
    poll: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut dashboard = Dashboard::new(&config.feed, &config.render, board);

    if poll {
        let every = Duration::from_secs(config.api.poll_interval_secs.max(1));
        dashboard.start_polling(ApiClient::new(&config.api)?, every);
    } else {
        dashboard.start_feed();
    }

    dashboard
        .run_until(
            async {
                shutdown_signal(tokio::signal::ctrl_c()).await;
            },
            |frame| {
                // clear the screen before every frame
                print!("\x1b[2J\x1b[H{frame}");
            },
        )
        .await;

    Ok(())
}

/// Waits for `signal`. Returns whether it actually fired; a failure to listen
/// is reported and ends the wait.
async fn shutdown_signal<F>(signal: F) -> bool
where
    F: std::future::Future<Output = std::io::Result<()>>,
{
    match signal.await {
        Ok(()) => {
            info!("Shutdown signal received. Exiting gracefully.");
            true
        }
        Err(e) => {
            error!("Failed to listen for the shutdown signal: {}", e);
            false
        }
    }
}

async fn run_history(
    config: &Settings,
    channel: &str,
    out: Option<&str>,
) -> Result<(), Box<dyn std::error::Error>> {
    let api = ApiClient::new(&config.api)?;
    let history = api.history(channel).await?;
    info!("loaded {} history points for {}", history.len(), channel);

    let renderer = HistoryChartRenderer::new(config.render.chart_width, config.render.chart_height);
    let svg = history_to_svg(&renderer.render(&history), channel);

    match out {
        Some(path) => {
            std::fs::write(path, svg)?;
            info!("wrote {}", path);
        }
        None => println!("{svg}"),
    }
    Ok(())
}

async fn run_profile(config: &Settings, channel: &str) -> Result<(), Box<dyn std::error::Error>> {
    let ttl = config.profiles.ttl();
    let mut service = ProfileService::new(ApiClient::new(&config.api)?, ProfileCache::new(ttl));
    if let Some(path) = &config.profiles.db_path {
        let store = ProfileStore::open(path, ttl)?;
        let expired = store.cleanup_expired();
        if expired > 0 {
            info!("dropped {} expired profiles", expired);
        }
        service = service.with_store(store);
    }

    let profile = service.load(channel).await?;
    println!("{}", serde_json::to_string_pretty(&profile)?);

    if let Some(store) = service.store() {
        store.flush()?;
    }
    Ok(())
}

async fn run_leaderboards(
    config: &Settings,
    metric: &str,
    interval: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let api = ApiClient::new(&config.api)?;
    let boards = api.leaderboards().await?;

    let entries = boards.get(metric, interval);
    if entries.is_none() {
        let metrics: Vec<&str> = boards.metrics().collect();
        warn!(
            "no {} leaderboard per {}; metrics available: {}",
            metric,
            interval,
            metrics.join(", ")
        );
    }

    let mut chart = BarChart::with_top_n(Field::Value, config.render.top_n);
    let render = chart.render(Some(entries.unwrap_or(&[])));
    print!("{}", bars_to_text(&format!("{metric} per {interval}"), render));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::shutdown_signal;

    #[tokio::test]
    async fn test_shutdown_signal_reports_listen_failure() {
        let failed = async { Err(std::io::Error::other("no signal handler")) };
        assert!(!shutdown_signal(failed).await);
        assert!(shutdown_signal(async { Ok(()) }).await);
    }
}
