//! Cellular Clash match runner.

mod driver;
mod telemetry;

use anyhow::Result;
use clash_core::{AppConfig, MatchHistory, Owner};
use clash_engine::{MatchRunner, RandomAdjacentProvider, RoundController, TracingRenderer};
use driver::RealtimeDriver;
use tokio::signal;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration
    let config = AppConfig::from_env()?;

    // Initialize telemetry
    telemetry::init_telemetry(&config.log_filter, config.json_logs)?;

    info!(
        rounds = config.game.rounds.max_rounds,
        turns = config.game.rounds.max_turns,
        seed = config.game.seed,
        fast = config.fast,
        language = %config.preferences.language,
        theme = %config.preferences.theme,
        "Starting Cellular Clash"
    );

    let seed = config.game.seed;
    let controller = RoundController::new(config.game.clone())
        .with_provider(Box::new(RandomAdjacentProvider::new(Owner::Ai, seed)))
        .with_renderer(Box::new(TracingRenderer));
    let player = Box::new(RandomAdjacentProvider::new(
        Owner::Player,
        seed.wrapping_add(1),
    ));

    let outcome = if config.fast {
        Some(MatchRunner::new(controller, player).run()?)
    } else {
        let cancel = CancellationToken::new();
        let driver = RealtimeDriver::new(controller, player, cancel.clone());
        let mut handle = tokio::spawn(driver.run());

        tokio::select! {
            result = &mut handle => result??,
            _ = shutdown_signal() => {
                cancel.cancel();
                handle.await??
            }
        }
    };

    let Some(summary) = outcome else {
        info!("Match abandoned, history left unchanged");
        return Ok(());
    };

    println!("{}", serde_json::to_string_pretty(&summary)?);

    // Persist history
    let mut history = MatchHistory::load(&config.history_path)?;
    history.push(summary);
    history.save(&config.history_path)?;

    let (wins, losses, draws) = history.tally();
    crate::record_gauge!("history_wins", wins, losses = losses, draws = draws);
    info!(path = %config.history_path, matches = history.len(), "History saved");

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                warn!("Failed to install signal handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received");
}
