//! Mapping a runner's exit status to a pass/fail outcome.
//!
//! Every failure collapses into [`RunError::Failed`]. The numeric status is
//! logged but never surfaced, so callers only learn that the run failed.

use std::process::ExitStatus;

use tracing::warn;

/// Status substituted when the runner could not be started or waited on.
pub const SPAWN_FAILURE_STATUS: i32 = 1;

/// Errors reported for a completed runner invocation.
#[derive(Debug, thiserror::Error)]
pub enum RunError {
    #[error("Lazytest failed.")]
    Failed,
}

/// Final state of one runner invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    Passed,
    Failed,
}

impl RunOutcome {
    /// Zero passes; anything else fails.
    pub fn from_exit_code(code: i32) -> Self {
        if code == 0 {
            RunOutcome::Passed
        } else {
            RunOutcome::Failed
        }
    }

    pub fn into_result(self) -> Result<(), RunError> {
        match self {
            RunOutcome::Passed => Ok(()),
            RunOutcome::Failed => Err(RunError::Failed),
        }
    }
}

/// Reduces the result of waiting on the runner to an integer status.
///
/// A spawn or wait error becomes [`SPAWN_FAILURE_STATUS`]. A process killed
/// by a signal reports `128 + signal`, as shells do.
pub fn exit_code(result: std::io::Result<ExitStatus>) -> i32 {
    match result {
        Ok(status) => status_code(status),
        Err(e) => {
            warn!("Failed to run lazytest: {}", e);
            SPAWN_FAILURE_STATUS
        }
    }
}

fn status_code(status: ExitStatus) -> i32 {
    if let Some(code) = status.code() {
        return code;
    }

    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(signal) = status.signal() {
            tracing::debug!("Runner terminated by signal {}", signal);
            return 128 + signal;
        }
    }

    SPAWN_FAILURE_STATUS
}
