//! Script invocation.

use std::path::{Path, PathBuf};
use std::process::{ExitStatus, Stdio};
use std::time::{Duration, Instant};

use tokio::process::Command;

use super::TickError;
use crate::config::ReceiverConfig;

/// Captured stderr is cut to this many bytes before it is attached to errors.
const MAX_STDERR_BYTES: usize = 4096;

/// Output of one completed script run.
#[derive(Debug)]
pub struct Invocation {
    /// Captured standard output (the payload).
    pub stdout: Vec<u8>,
    /// Captured standard error.
    pub stderr: Vec<u8>,
    /// Exit status.
    pub status: ExitStatus,
    /// Wall time from spawn to exit.
    pub duration: Duration,
}

impl Invocation {
    /// Standard error as lossy UTF-8, truncated to a bounded size.
    pub fn stderr_lossy(&self) -> String {
        let end = self.stderr.len().min(MAX_STDERR_BYTES);
        String::from_utf8_lossy(&self.stderr[..end]).trim_end().to_string()
    }
}

/// Runs `<interpreter> <script>` and captures its output.
#[derive(Debug, Clone)]
pub struct ScriptInvoker {
    interpreter: PathBuf,
    script: PathBuf,
    timeout: Option<Duration>,
}

impl ScriptInvoker {
    /// Create an invoker without a timeout.
    pub fn new(interpreter: impl Into<PathBuf>, script: impl Into<PathBuf>) -> Self {
        Self {
            interpreter: interpreter.into(),
            script: script.into(),
            timeout: None,
        }
    }

    /// Create an invoker from receiver settings.
    pub fn from_config(config: &ReceiverConfig) -> Self {
        Self::new(&config.interpreter, &config.script).with_timeout(config.timeout)
    }

    /// Bound a single run; the child is killed when the bound elapses.
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn interpreter(&self) -> &Path {
        &self.interpreter
    }

    pub fn script(&self) -> &Path {
        &self.script
    }

    /// Run the script to completion.
    ///
    /// # Errors
    /// Returns `TickError::ExecutionFailed` when the interpreter cannot be
    /// spawned, exits non-zero, or exceeds the timeout. The captured stderr
    /// is carried in the error.
    pub async fn invoke(&self) -> Result<Invocation, TickError> {
        let mut command = Command::new(&self.interpreter);
        command
            .arg(&self.script)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        let start = Instant::now();
        let child = command.spawn().map_err(|e| TickError::ExecutionFailed {
            reason: format!("failed to spawn '{}': {e}", self.interpreter.display()),
            stderr: String::new(),
        })?;

        // Dropping the wait future on timeout drops the child, which kills it.
        let output = match self.timeout {
            Some(limit) => tokio::time::timeout(limit, child.wait_with_output())
                .await
                .map_err(|_| TickError::ExecutionFailed {
                    reason: format!("timed out after {}", humantime::format_duration(limit)),
                    stderr: String::new(),
                })?,
            None => child.wait_with_output().await,
        }
        .map_err(|e| TickError::ExecutionFailed {
            reason: format!("failed to wait for script: {e}"),
            stderr: String::new(),
        })?;

        let invocation = Invocation {
            stdout: output.stdout,
            stderr: output.stderr,
            status: output.status,
            duration: start.elapsed(),
        };

        if !invocation.status.success() {
            return Err(TickError::ExecutionFailed {
                reason: invocation.status.to_string(),
                stderr: invocation.stderr_lossy(),
            });
        }

        Ok(invocation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_script(dir: &tempfile::TempDir, body: &str) -> PathBuf {
        let path = dir.path().join("probe.sh");
        std::fs::write(&path, body).unwrap();
        path
    }

    #[tokio::test]
    async fn test_invoke_captures_stdout() {
        let dir = tempfile::tempdir().unwrap();
        let script = write_script(&dir, "echo '{\"resourceMetrics\":[]}'\necho diag >&2\n");

        let invocation = ScriptInvoker::new("/bin/sh", &script).invoke().await.unwrap();
        assert!(invocation.status.success());
        assert_eq!(invocation.stdout, b"{\"resourceMetrics\":[]}\n");
        assert_eq!(invocation.stderr_lossy(), "diag");
    }

    #[tokio::test]
    async fn test_invoke_passes_script_as_argument() {
        let dir = tempfile::tempdir().unwrap();
        let script = write_script(&dir, "echo \"$0\"\n");

        let invocation = ScriptInvoker::new("/bin/sh", &script).invoke().await.unwrap();
        let printed = String::from_utf8(invocation.stdout).unwrap();
        assert_eq!(printed.trim_end(), script.display().to_string());
    }

    #[tokio::test]
    async fn test_invoke_non_zero_exit() {
        let dir = tempfile::tempdir().unwrap();
        let script = write_script(&dir, "echo partial\necho 'ImportError: psutil' >&2\nexit 3\n");

        let err = ScriptInvoker::new("/bin/sh", &script).invoke().await.unwrap_err();
        match err {
            TickError::ExecutionFailed { reason, stderr } => {
                assert!(reason.contains('3'), "reason: {reason}");
                assert_eq!(stderr, "ImportError: psutil");
            }
            other => panic!("expected ExecutionFailed, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_invoke_missing_interpreter() {
        let err = ScriptInvoker::new("/nonexistent/bin/python", "/scripts/m.py")
            .invoke()
            .await
            .unwrap_err();
        match err {
            TickError::ExecutionFailed { reason, .. } => {
                assert!(reason.contains("failed to spawn"), "reason: {reason}");
            }
            other => panic!("expected ExecutionFailed, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_invoke_timeout() {
        let dir = tempfile::tempdir().unwrap();
        let script = write_script(&dir, "sleep 5\necho late\n");

        let start = Instant::now();
        let err = ScriptInvoker::new("/bin/sh", &script)
            .with_timeout(Some(Duration::from_millis(200)))
            .invoke()
            .await
            .unwrap_err();

        assert!(start.elapsed() < Duration::from_secs(4));
        assert!(err.to_string().contains("timed out"));
    }

    #[test]
    fn test_stderr_truncated() {
        use std::os::unix::process::ExitStatusExt;

        let invocation = Invocation {
            stdout: Vec::new(),
            stderr: vec![b'x'; MAX_STDERR_BYTES * 2],
            status: ExitStatus::from_raw(0),
            duration: Duration::ZERO,
        };
        assert_eq!(invocation.stderr_lossy().len(), MAX_STDERR_BYTES);
    }

    #[test]
    fn test_from_config() {
        let config = ReceiverConfig::new("/scripts/m.py")
            .with_interpreter("/opt/venv/bin/python")
            .with_timeout(Duration::from_secs(10));
        let invoker = ScriptInvoker::from_config(&config);
        assert_eq!(invoker.interpreter(), Path::new("/opt/venv/bin/python"));
        assert_eq!(invoker.script(), Path::new("/scripts/m.py"));
        assert_eq!(invoker.timeout, Some(Duration::from_secs(10)));
    }
}
