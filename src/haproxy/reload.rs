//! HAProxy reload triggering.
//!
//! # Responsibilities
//! - Ask the load balancer to re-read its configuration file
//! - Distinguish "could not start" from "ran and failed"
//!
//! The mechanism is a capability trait so the pipeline can be driven with a
//! fake in tests. The production implementation runs the service manager's
//! reload command as a child process.

use std::process::Stdio;
use std::time::Duration;
use thiserror::Error;
use tokio::process::Command;
use crate::config::ReloadConfig;

/// Reload was not confirmed. No variant is retried; the next cycle tries again.
#[derive(Debug, Error)]
pub enum ReloadError {
    #[error("failed to start `{command}`: {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed waiting for `{command}`: {source}")]
    Wait {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("`{command}` failed with {status}: {stderr}")]
    Exit {
        command: String,
        status: String,
        stderr: String,
    },

    #[error("`{command}` did not finish within {}s and was killed", .timeout.as_secs_f64())]
    Timeout {
        command: String,
        timeout: Duration,
    },
}

/// Something that can make HAProxy pick up the installed configuration.
#[allow(async_fn_in_trait)]
pub trait ReloadMechanism {
    /// Trigger one reload and report whether it was confirmed.
    async fn attempt(&self) -> Result<(), ReloadError>;
}

/// Reload through an external command such as `service haproxy reload`.
#[derive(Debug, Clone)]
pub struct ServiceReload {
    program: String,
    args: Vec<String>,
    timeout: Duration,
}

impl ServiceReload {
    pub fn new(program: impl Into<String>, args: Vec<String>, timeout: Duration) -> Self {
        Self {
            program: program.into(),
            args,
            timeout,
        }
    }

    pub fn from_config(config: &ReloadConfig) -> Self {
        Self::new(
            config.program.clone(),
            config.args.clone(),
            Duration::from_secs(config.timeout_secs),
        )
    }

    /// Human readable command line for logs and errors.
    pub fn command_line(&self) -> String {
        std::iter::once(self.program.as_str())
            .chain(self.args.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl ReloadMechanism for ServiceReload {
    async fn attempt(&self) -> Result<(), ReloadError> {
        let command = self.command_line();

        let child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|source| ReloadError::Spawn {
                command: command.clone(),
                source,
            })?;

        // Dropping the wait future on timeout drops the child, which kills it.
        let output = match tokio::time::timeout(self.timeout, child.wait_with_output()).await {
            Ok(result) => result.map_err(|source| ReloadError::Wait {
                command: command.clone(),
                source,
            })?,
            Err(_) => {
                return Err(ReloadError::Timeout {
                    command,
                    timeout: self.timeout,
                })
            }
        };

        if !output.status.success() {
            return Err(ReloadError::Exit {
                command,
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        if !stdout.trim().is_empty() {
            tracing::debug!(command = %command, output = %stdout.trim(), "Reload command output");
        }
        Ok(())
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    fn reload(program: &str, args: &[&str]) -> ServiceReload {
        ServiceReload::new(
            program,
            args.iter().map(|a| a.to_string()).collect(),
            Duration::from_secs(5),
        )
    }

    #[test]
    fn test_command_line() {
        let r = ServiceReload::from_config(&ReloadConfig::default());
        assert_eq!(r.command_line(), "service haproxy reload");
        assert_eq!(reload("true", &[]).command_line(), "true");
    }

    #[tokio::test]
    async fn test_successful_command() {
        assert!(reload("true", &[]).attempt().await.is_ok());
    }

    #[tokio::test]
    async fn test_missing_binary_is_spawn_error() {
        let err = reload("/nonexistent/haproxy-reload", &[]).attempt().await.unwrap_err();
        assert!(matches!(err, ReloadError::Spawn { .. }));
        assert!(err.to_string().contains("/nonexistent/haproxy-reload"));
    }

    #[tokio::test]
    async fn test_nonzero_exit_is_exit_error() {
        let err = reload("sh", &["-c", "echo 'config invalid' >&2; exit 3"])
            .attempt()
            .await
            .unwrap_err();

        match err {
            ReloadError::Exit { status, stderr, .. } => {
                assert!(status.contains('3'));
                assert_eq!(stderr, "config invalid");
            }
            other => panic!("expected exit error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_slow_command_times_out() {
        let slow = ServiceReload::new("sleep", vec!["5".into()], Duration::from_millis(100));

        let started = std::time::Instant::now();
        let err = slow.attempt().await.unwrap_err();
        assert!(matches!(err, ReloadError::Timeout { .. }));
        assert!(started.elapsed() < Duration::from_secs(4));
    }
}
