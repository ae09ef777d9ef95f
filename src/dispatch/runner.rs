//! Subprocess supervision: one child per dispatch, exit code propagated
//! verbatim

use crate::dispatch::mode::ModeConfig;
use crate::dispatch::target::ExecutionTarget;
use crate::dispatch::transcript::Transcript;
use crate::error::DispatchError;
use chrono::{DateTime, Utc};
use std::path::PathBuf;
use std::process::Stdio;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::process::Command;
use tracing::{error, info, warn};

/// Reserved exit code reported when the target cannot be spawned, is killed
/// by a signal, or supervision itself faults. Never produced by a target
/// that ran to completion with its own exit code.
pub const SPAWN_FAILURE_CODE: i32 = 1;

/// Outcome of one dispatch call
#[derive(Debug, Clone)]
pub struct ExecutionResult {
    /// Child exit code, or [`SPAWN_FAILURE_CODE`] when no code exists
    pub exit_code: i32,
    pub started_at: DateTime<Utc>,
    pub ended_at: DateTime<Utc>,
    /// Transcript file written for this invocation
    pub transcript: PathBuf,
}

impl ExecutionResult {
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }
}

/// Launches the execution target once and supervises it to completion
pub struct ExecutionDispatcher {
    target: ExecutionTarget,
    transcript_dir: PathBuf,
}

impl ExecutionDispatcher {
    pub fn new(target: ExecutionTarget, transcript_dir: impl Into<PathBuf>) -> Self {
        Self {
            target,
            transcript_dir: transcript_dir.into(),
        }
    }

    /// Run the target in the configured mode and block until it exits
    ///
    /// Watch modes run until the child is stopped externally; no timeout is
    /// enforced here. The child's stdout and stderr are mirrored line by
    /// line into the transcript (and through tracing) as they arrive. A
    /// non-zero child exit is not an error: it is reported verbatim in the
    /// result and never retried. Faults after a successful spawn are caught,
    /// recorded in the transcript and folded into the sentinel exit code.
    pub async fn dispatch(&self, config: &ModeConfig) -> Result<ExecutionResult, DispatchError> {
        let args = config.to_args();
        let command_line = format!("{} {}", self.target.path().display(), args.join(" "));

        let transcript =
            Arc::new(Transcript::create(&self.transcript_dir, config.mode_label()).await?);
        let started_at = Utc::now();
        transcript.start_marker(&command_line).await?;

        info!(
            mode = config.mode_label(),
            strategy_id = config.strategy_id(),
            transcript = %transcript.path().display(),
            "dispatching: {}", command_line
        );

        let spawned = Command::new(self.target.path())
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn();

        let mut child = match spawned {
            Ok(child) => child,
            Err(e) => {
                error!(error = %e, "failed to spawn execution target");
                let _ = transcript.failure(&format!("spawn failed: {}", e)).await;
                return Ok(self
                    .finish(&transcript, SPAWN_FAILURE_CODE, started_at)
                    .await);
            }
        };

        let stdout_task = tokio::spawn(mirror_stream(child.stdout.take(), transcript.clone()));
        let stderr_task = tokio::spawn(mirror_stream(child.stderr.take(), transcript.clone()));

        let exit_code = match child.wait().await {
            Ok(status) => match status.code() {
                Some(code) => code,
                None => {
                    // Killed by a signal; the watch modes end this way.
                    warn!("execution target terminated by signal");
                    let _ = transcript.failure("terminated by signal").await;
                    SPAWN_FAILURE_CODE
                }
            },
            Err(e) => {
                error!(error = %e, "fault while waiting on execution target");
                let _ = transcript
                    .failure(&format!("supervision fault: {}", e))
                    .await;
                SPAWN_FAILURE_CODE
            }
        };

        // Drain the mirror tasks before stamping the exit code so every
        // child line lands above it.
        let _ = stdout_task.await;
        let _ = stderr_task.await;

        let result = self.finish(&transcript, exit_code, started_at).await;
        info!(
            mode = config.mode_label(),
            exit_code = result.exit_code,
            "execution target exited with code {}",
            result.exit_code
        );
        Ok(result)
    }

    async fn finish(
        &self,
        transcript: &Transcript,
        exit_code: i32,
        started_at: DateTime<Utc>,
    ) -> ExecutionResult {
        let _ = transcript.exit_code(exit_code).await;
        let _ = transcript.end_marker().await;
        ExecutionResult {
            exit_code,
            started_at,
            ended_at: Utc::now(),
            transcript: transcript.path().to_path_buf(),
        }
    }
}

/// Copy one child stream into the transcript line by line
///
/// Write errors are swallowed: losing a transcript line must not tear down
/// supervision of a running child.
async fn mirror_stream<R>(handle: Option<R>, transcript: Arc<Transcript>)
where
    R: AsyncRead + Unpin,
{
    let Some(handle) = handle else {
        return;
    };
    let mut lines = BufReader::new(handle).lines();
    loop {
        match lines.next_line().await {
            Ok(Some(line)) => {
                info!(target: "signalq::child", "{}", line);
                let _ = transcript.line(&line).await;
            }
            Ok(None) => break,
            Err(e) => {
                warn!(error = %e, "fault while reading execution target output");
                let _ = transcript
                    .failure(&format!("output stream fault: {}", e))
                    .await;
                break;
            }
        }
    }
}
