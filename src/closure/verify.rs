//! External verification command execution.
//!
//! Commands come from the handoff's `verification` entries (or the
//! configured defaults) and run through the shell with a timeout. The
//! runner is a trait so the closure engine is testable without
//! spawning processes.

use crate::error::VerifyError;
use async_trait::async_trait;
use std::path::PathBuf;
use std::time::Duration;
use tokio::process::Command;
use tokio::time::timeout as tokio_timeout;
use tracing::debug;

#[derive(Debug, Clone)]
pub struct VerificationResult {
    pub command: String,
    pub passed: bool,
    pub stdout: String,
    pub stderr: String,
}

#[async_trait]
pub trait VerificationRunner: Send + Sync {
    async fn run(
        &self,
        command: &str,
        timeout: Duration,
    ) -> Result<VerificationResult, VerifyError>;
}

/// Runs each command via `sh -c` in the configured working directory.
pub struct ShellVerifier {
    pub working_dir: PathBuf,
}

#[async_trait]
impl VerificationRunner for ShellVerifier {
    async fn run(
        &self,
        command: &str,
        timeout: Duration,
    ) -> Result<VerificationResult, VerifyError> {
        debug!("Running verification command: {}", command);

        let mut cmd = Command::new("sh");
        cmd.arg("-c").arg(command).current_dir(&self.working_dir);

        let output = tokio_timeout(timeout, cmd.output())
            .await
            .map_err(|_| VerifyError::Timeout(timeout))?
            .map_err(VerifyError::Io)?;

        Ok(VerificationResult {
            command: command.to_string(),
            passed: output.status.success(),
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        })
    }
}

/// Run the whole command set sequentially, collecting every result.
pub async fn run_all(
    runner: &dyn VerificationRunner,
    commands: &[String],
    timeout: Duration,
) -> Result<Vec<VerificationResult>, VerifyError> {
    let mut results = Vec::with_capacity(commands.len());
    for command in commands {
        results.push(runner.run(command, timeout).await?);
    }
    Ok(results)
}
