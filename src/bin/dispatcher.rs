//! signalq Dispatcher
//!
//! Validates the configured operating mode, launches the external execution
//! target exactly once, and exits with the child's code. Exit code 1 is the
//! reserved sentinel for resolution/spawn/supervision failure; 2 marks a
//! rejected configuration (nothing was spawned). Retry policy belongs to
//! the scheduler invoking this binary, not to the binary itself.

use dotenvy::dotenv;
use signalq::config;
use signalq::dispatch::{ExecutionDispatcher, ExecutionTarget, ModeConfig, SPAWN_FAILURE_CODE};
use signalq::logging;
use tracing::{error, info};

const CONFIG_FAILURE_CODE: i32 = 2;

#[tokio::main]
async fn main() {
    dotenv().ok();
    logging::init_logging();

    let env = config::get_environment();
    info!("Starting signalq dispatcher");
    info!(environment = %env, "Environment");

    let mode = match config::dispatch_settings().and_then(|s| ModeConfig::from_settings(&s)) {
        Ok(mode) => mode,
        Err(e) => {
            error!(error = %e, "Rejected dispatch configuration");
            std::process::exit(CONFIG_FAILURE_CODE);
        }
    };
    info!(
        mode = mode.mode_label(),
        strategy_id = mode.strategy_id(),
        "Dispatch mode validated"
    );

    let target = match ExecutionTarget::resolve(config::get_executor_bin()) {
        Ok(target) => target,
        Err(e) => {
            error!(error = %e, "No eligible execution target");
            std::process::exit(SPAWN_FAILURE_CODE);
        }
    };

    let dispatcher = ExecutionDispatcher::new(target, config::get_transcript_dir());
    match dispatcher.dispatch(&mode).await {
        Ok(result) => {
            info!(
                exit_code = result.exit_code,
                transcript = %result.transcript.display(),
                "Dispatch finished"
            );
            std::process::exit(result.exit_code);
        }
        Err(e) => {
            error!(error = %e, "Dispatch failed");
            std::process::exit(SPAWN_FAILURE_CODE);
        }
    }
}
