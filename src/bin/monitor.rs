use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use anyhow::Result;
use clap::Parser;
use tokio::signal::unix::{SignalKind, signal};
use tracing::info;

use discogs_monitor::config::Credentials;
use discogs_monitor::monitor::Monitor;
use discogs_monitor::{DEFAULT_POLL_INTERVAL_SECS, RELEASE_ID};

#[derive(Parser)]
#[command(name = "monitor", about = "Discogs marketplace vinyl listing monitor")]
struct Args {
    /// Discogs release ID to watch
    #[arg(long, default_value = RELEASE_ID)]
    release_id: String,

    /// Seconds between marketplace polls
    #[arg(long, default_value_t = DEFAULT_POLL_INTERVAL_SECS)]
    interval: u64,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    dotenvy::dotenv().ok();

    let args = Args::parse();
    if args.interval == 0 {
        anyhow::bail!("--interval must be positive");
    }

    // Fatal on any missing variable; the loop never starts.
    let credentials = Credentials::from_env()?;

    let running = Arc::new(AtomicBool::new(true));
    spawn_signal_listener(running.clone())?;

    let mut monitor = Monitor::new(&credentials, running, args.release_id, args.interval)?;
    monitor.run().await;

    Ok(())
}

/// Clear the running flag on SIGINT or SIGTERM.
///
/// The listener does nothing else; the monitor observes the flag at its
/// sleep checkpoints and shuts down from the main loop.
fn spawn_signal_listener(running: Arc<AtomicBool>) -> Result<()> {
    let mut sigterm = signal(SignalKind::terminate())?;
    tokio::spawn(async move {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {}
            _ = sigterm.recv() => {}
        }
        info!("Received shutdown signal, cleaning up...");
        running.store(false, Ordering::Relaxed);
    });
    Ok(())
}
