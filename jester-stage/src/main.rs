//! jester-stage - Jester performance runner
//!
//! Runs the five-act performance loop headless: jokes come from JokeAPI (or a
//! canned deck), a mock predictor guesses each punchline, and narration and
//! sound cues go to the log. Ctrl+C stops the show and prints the session
//! statistics and leaderboard.

use anyhow::{Context, Result};
use clap::Parser;
use jester_common::config::StageConfig;
use jester_common::events::{EventBus, OverlayKind, StageEvent};
use jester_stage::services::{
    CannedJokeSource, InMemoryPerformanceStore, JokeApiClient, LeaderboardSort, LoggingEffectPlayer,
    LoggingNarrator, MockPredictor,
};
use jester_stage::types::JokeSource;
use jester_stage::{Collaborators, PerformanceOrchestrator};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::signal;
use tokio::sync::broadcast::error::RecvError;
use tracing::{debug, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Leaderboard rows printed on exit
const LEADERBOARD_TOP: usize = 5;

/// Command-line arguments for jester-stage
#[derive(Parser, Debug)]
#[command(name = "jester-stage")]
#[command(about = "Five-act joke performance with punchline guessing")]
#[command(version)]
struct Args {
    /// Path to TOML config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override safe mode from the config file
    #[arg(long)]
    safe_mode: Option<bool>,

    /// Disable narration and sound cues
    #[arg(long)]
    mute: bool,

    /// Stop after this many revealed jokes
    #[arg(long)]
    cycles: Option<u32>,

    /// Use the built-in joke deck instead of JokeAPI
    #[arg(long)]
    mock_source: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let mut config = StageConfig::load_or_default(args.config.as_deref())
        .context("Failed to load configuration")?;
    if let Some(safe_mode) = args.safe_mode {
        config.safe_mode = safe_mode;
    }
    if args.mute {
        config.audio_enabled = false;
    }

    // Initialize tracing
    let default_filter = format!(
        "jester_stage={level},jester_common={level}",
        level = config.logging.level
    );
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting jester-stage {}", jester_stage::build_info());
    info!(
        safe_mode = config.safe_mode,
        audio_enabled = config.audio_enabled,
        mock_source = args.mock_source,
        "Configuration resolved"
    );

    let source: Arc<dyn JokeSource> = if args.mock_source {
        Arc::new(CannedJokeSource::classic())
    } else {
        Arc::new(JokeApiClient::new(&config.joke_api).context("Failed to build JokeAPI client")?)
    };
    let store = InMemoryPerformanceStore::new();

    let cast = Collaborators {
        source,
        predictor: Arc::new(MockPredictor::new()),
        narrator: Arc::new(LoggingNarrator),
        effects: Arc::new(LoggingEffectPlayer),
        store: Arc::new(store.clone()),
    };

    let events = EventBus::new(config.event_capacity);
    debug!(capacity = events.capacity(), "Event bus created");
    let orchestrator = PerformanceOrchestrator::new(config, cast, events);
    let mut rx = orchestrator.subscribe();

    orchestrator.start().await;

    tokio::select! {
        _ = shutdown_signal() => {}
        _ = follow_performance(&orchestrator, &mut rx, args.cycles) => {
            info!("Requested number of jokes performed");
        }
    }

    orchestrator.stop().await;

    let stats = orchestrator.session_stats();
    info!(
        session_id = %stats.session_id,
        jokes = stats.jokes_performed,
        triumphs = stats.triumphs,
        defeats = stats.defeats,
        triumph_rate = stats.triumph_rate,
        average_similarity = stats.average_similarity,
        average_latency_ms = stats.average_latency_ms,
        "Session complete"
    );

    for entry in store.leaderboard(LEADERBOARD_TOP, LeaderboardSort::Score).await {
        info!(
            rank = entry.rank,
            session_id = %entry.session_id,
            triumphs = entry.triumphs,
            jokes = entry.total_jokes,
            score = entry.score,
            "Leaderboard"
        );
    }

    Ok(())
}

/// Follow stage events, dismissing overlays since nobody is watching
///
/// Returns after `cycles` reveals, or never when `cycles` is `None`.
async fn follow_performance(
    orchestrator: &PerformanceOrchestrator,
    rx: &mut tokio::sync::broadcast::Receiver<StageEvent>,
    cycles: Option<u32>,
) {
    let mut revealed = 0u32;
    loop {
        match rx.recv().await {
            Ok(StageEvent::Revealed { is_triumph, .. }) => {
                revealed += 1;
                info!(revealed, is_triumph, "Joke revealed");
                if cycles.is_some_and(|limit| revealed >= limit) {
                    return;
                }
            }
            Ok(StageEvent::OverlayChanged { overlay, active: true, message, .. }) => {
                warn!(%overlay, message = %message, "Overlay raised");
                match overlay {
                    OverlayKind::Speechless => orchestrator.resume_speechless(),
                    OverlayKind::NetworkAwaiting => orchestrator.retry_network().await,
                }
            }
            Ok(_) => {}
            Err(RecvError::Lagged(skipped)) => {
                warn!(skipped, "Event follower lagged");
            }
            Err(RecvError::Closed) => {
                std::future::pending::<()>().await;
            }
        }
    }
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, stopping performance");
        },
        _ = terminate => {
            info!("Received terminate signal, stopping performance");
        },
    }
}
