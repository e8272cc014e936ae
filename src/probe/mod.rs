//! Invocation of the external ping utility
//!
//! The probe executable is resolved once when the [`Pinger`] is built and
//! reused for every host. Each invocation runs as a child process that is
//! killed when its future is dropped, so cancelling a dispatch never leaves
//! stray ping processes behind.

pub mod parser;

pub use parser::{parse_output, ParseFailure, ParsedStats};

use crate::{
    error::{AppError, Result},
    types::PlatformFormat,
};
use async_trait::async_trait;
use std::{
    path::{Path, PathBuf},
    process::Stdio,
    time::Duration,
};
use tokio::{process::Command, time::timeout};

/// Something that can measure one host and return the raw probe output
#[async_trait]
pub trait ProbeRunner: Send + Sync {
    /// Dialect of the text returned by [`ProbeRunner::run`]
    fn format(&self) -> PlatformFormat;

    /// Probe `host` with `count` echo requests and return captured stdout
    async fn run(&self, host: &str, count: u32) -> Result<String>;
}

/// Runs the system ping binary
#[derive(Debug, Clone)]
pub struct Pinger {
    path: PathBuf,
    format: PlatformFormat,
    timeout: Duration,
}

impl Pinger {
    /// Resolve `program` on PATH (or as a path) once, failing fast when it
    /// does not exist.
    pub fn locate(program: &str, format: PlatformFormat, timeout: Duration) -> Result<Self> {
        let path = which::which(program).map_err(|e| {
            AppError::probe_unavailable(format!("cannot locate '{}': {}", program, e))
        })?;

        Ok(Self::with_path(path, format, timeout))
    }

    /// Use an already resolved executable
    pub fn with_path(path: PathBuf, format: PlatformFormat, timeout: Duration) -> Self {
        Self { path, format, timeout }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Arguments for one invocation; the host is always last
    pub fn args(&self, count: u32, host: &str) -> Vec<String> {
        vec![
            self.format.count_flag().to_string(),
            count.to_string(),
            host.to_string(),
        ]
    }

    fn command(&self, count: u32, host: &str) -> Command {
        let mut cmd = Command::new(&self.path);
        cmd.args(self.args(count, host))
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        cmd
    }
}

#[async_trait]
impl ProbeRunner for Pinger {
    fn format(&self) -> PlatformFormat {
        self.format
    }

    async fn run(&self, host: &str, count: u32) -> Result<String> {
        let child = self
            .command(count, host)
            .spawn()
            .map_err(|e| AppError::probe(format!("{}: failed to spawn {}: {}", host, self.path.display(), e)))?;

        // Dropping the wait future on timeout drops the child, which kills it
        let output = match timeout(self.timeout, child.wait_with_output()).await {
            Ok(result) => result.map_err(|e| AppError::probe(format!("{}: {}", host, e)))?,
            Err(_) => {
                return Err(AppError::timeout(format!(
                    "{}: no result within {}s",
                    host,
                    self.timeout.as_secs()
                )))
            }
        };

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let detail = stderr.lines().find(|l| !l.trim().is_empty()).unwrap_or("").trim();
            return Err(AppError::probe(if detail.is_empty() {
                format!("{}: {}", host, output.status)
            } else {
                format!("{}: {} ({})", host, output.status, detail)
            }));
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_args_unix() {
        let pinger = Pinger::with_path(PathBuf::from("/bin/ping"), PlatformFormat::IpUtils, Duration::from_secs(5));
        assert_eq!(pinger.args(4, "example.com"), vec!["-c", "4", "example.com"]);

        let pinger = Pinger::with_path(PathBuf::from("/sbin/ping"), PlatformFormat::Bsd, Duration::from_secs(5));
        assert_eq!(pinger.args(2, "10.0.0.1"), vec!["-c", "2", "10.0.0.1"]);
    }

    #[test]
    fn test_args_windows() {
        let pinger = Pinger::with_path(PathBuf::from("ping.exe"), PlatformFormat::Windows, Duration::from_secs(5));
        let args = pinger.args(4, "example.com");
        assert_eq!(args, vec!["-n", "4", "example.com"]);
        assert_eq!(args.last().map(String::as_str), Some("example.com"));
    }

    #[test]
    fn test_locate_missing_program() {
        let error = Pinger::locate(
            "hstats-no-such-probe-binary",
            PlatformFormat::IpUtils,
            Duration::from_secs(5),
        )
        .unwrap_err();
        assert_eq!(error.category(), "PROBE_SETUP");
        assert_eq!(error.exit_code(), 2);
    }

    #[cfg(unix)]
    mod unix {
        use super::*;
        use std::os::unix::fs::PermissionsExt;
        use tempfile::TempDir;

        fn script(dir: &TempDir, body: &str) -> PathBuf {
            let path = dir.path().join("fake-ping");
            std::fs::write(&path, format!("#!/bin/sh\n{}\n", body)).unwrap();
            std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
            path
        }

        #[tokio::test]
        async fn test_run_captures_stdout() {
            let dir = TempDir::new().unwrap();
            let path = script(&dir, "echo \"$1 $2 $3\"");
            let pinger = Pinger::with_path(path, PlatformFormat::IpUtils, Duration::from_secs(5));

            let output = pinger.run("example.com", 3).await.unwrap();
            assert_eq!(output.trim(), "-c 3 example.com");
        }

        #[tokio::test]
        async fn test_run_nonzero_exit_is_probe_error() {
            let dir = TempDir::new().unwrap();
            let path = script(&dir, "echo 'unknown host' >&2\nexit 2");
            let pinger = Pinger::with_path(path, PlatformFormat::IpUtils, Duration::from_secs(5));

            let error = pinger.run("nope.invalid", 1).await.unwrap_err();
            assert_eq!(error.category(), "PROBE");
            assert!(error.to_string().contains("nope.invalid"));
            assert!(error.to_string().contains("unknown host"));
        }

        #[tokio::test]
        async fn test_run_times_out() {
            let dir = TempDir::new().unwrap();
            let path = script(&dir, "exec sleep 30");
            let pinger = Pinger::with_path(path, PlatformFormat::IpUtils, Duration::from_secs(1));

            let started = std::time::Instant::now();
            let error = pinger.run("slow.example", 1).await.unwrap_err();
            assert_eq!(error.category(), "TIMEOUT");
            assert!(started.elapsed() < Duration::from_secs(10));
        }

        #[test]
        fn test_locate_by_path() {
            let dir = TempDir::new().unwrap();
            let path = script(&dir, "exit 0");
            let pinger = Pinger::locate(path.to_str().unwrap(), PlatformFormat::Bsd, Duration::from_secs(5)).unwrap();
            assert!(pinger.path().ends_with("fake-ping"));
            assert_eq!(pinger.format(), PlatformFormat::Bsd);
        }
    }
}
