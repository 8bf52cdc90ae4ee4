//! livematch_sync - Main Entry Point
//!
//! Subscribes to a match document and mirrors it to the console until
//! interrupted. Mostly useful for watching a live sync session without
//! the scoreboard UI attached.

use anyhow::Result;
use chrono::Utc;
use clap::Parser;
use std::sync::Arc;
use tracing::{info, warn, Level};
use tracing_subscriber::FmtSubscriber;

use livematch_sync::config::{load_config, load_from_env};
use livematch_sync::store::DocumentStoreClient;
use livematch_sync::sync::{LiveMatchSession, RevocationOutcome};
use livematch_sync::DecodedEntity;

/// CLI arguments for the application
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to configuration file
    #[arg(short, long, default_value = "config.toml")]
    config: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    log_level: String,

    /// Tournament to attach to
    #[arg(long)]
    tournament: String,

    /// Match to attach to
    #[arg(long)]
    match_id: String,

    /// Operator account (enables assignment expiry checks)
    #[arg(long)]
    username: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command line arguments
    let args = Args::parse();

    // Initialize logging
    let level = match args.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    info!("Starting livematch_sync");
    info!("Configuration file: {}", args.config);

    let config = load_config(Some(&args.config)).or_else(|_| load_from_env())?;
    let store = Arc::new(DocumentStoreClient::new(&config.store, &config.settings)?);

    let mut session = LiveMatchSession::new(
        store,
        &config.store.root,
        &args.tournament,
        &args.match_id,
    );
    if let Some(username) = &args.username {
        session = session.with_username(username);
    }

    let mut subscription = session.subscribe_to_live_match().await?;
    info!("Observing {}", subscription.path());

    if args.username.is_some() {
        let today = Utc::now().date_naive();
        if session.check_and_revoke_if_expired(today).await == RevocationOutcome::Revoked {
            warn!("match assignment has expired; returning to the default view");
            session.shutdown();
            return Ok(());
        }
    }

    loop {
        tokio::select! {
            entity = subscription.recv() => {
                match entity {
                    Some(DecodedEntity::MatchInfo(doc)) => {
                        session.apply_snapshot(&DecodedEntity::MatchInfo(doc.clone()));
                        info!(
                            "{} {} - {} {} [{} {}]",
                            doc.info.team1_name,
                            doc.score.side1.goals,
                            doc.score.side2.goals,
                            doc.info.team2_name,
                            doc.clock.period,
                            doc.clock.elapsed,
                        );
                    }
                    Some(other) => info!("snapshot: {:?}", other),
                    None => {
                        warn!("live stream ended");
                        break;
                    }
                }
            }
            _ = tokio::signal::ctrl_c() => {
                info!("Received shutdown signal, cleaning up...");
                break;
            }
        }
    }

    session.shutdown();
    Ok(())
}
