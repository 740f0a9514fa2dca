//! Heartbeat log writer.
//!
//! Appends a fixed line to a file on a fixed interval for as long as the
//! process runs. The file is opened once, in append mode, and owned by the
//! writer task; it is closed when [`HeartbeatWriter::run`] returns.
//!
//! Any I/O error is returned to the caller rather than retried. The file is
//! the signal an external observer watches, so a writer that silently stopped
//! would be worse than a process that exits.

use std::path::{Path, PathBuf};
use std::time::Duration;

use tokio::fs::{File, OpenOptions};
use tokio::io::AsyncWriteExt;
use tokio_util::sync::CancellationToken;

use crate::config::{HeartbeatConfig, HEARTBEAT_FILE_MODE};
use crate::error::FatalError;

/// Appends `line` to `path` every `interval`.
#[derive(Debug, Clone)]
pub struct HeartbeatWriter {
    path: PathBuf,
    interval: Duration,
    line: String,
}

impl HeartbeatWriter {
    pub fn new(path: impl Into<PathBuf>, interval: Duration, line: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            interval,
            line: line.into(),
        }
    }

    pub fn from_config(config: &HeartbeatConfig) -> Self {
        Self::new(&config.path, config.interval(), &config.line)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Open the heartbeat file for appending, creating it if missing.
    ///
    /// Existing content is never truncated. The parent directory is not
    /// created: a missing or unwritable directory is an error.
    pub async fn open(&self) -> Result<File, FatalError> {
        let mut options = OpenOptions::new();
        options.create(true).append(true);
        #[cfg(unix)]
        options.mode(HEARTBEAT_FILE_MODE);

        options.open(&self.path).await.map_err(|source| FatalError::Open {
            path: self.path.clone(),
            source,
        })
    }

    /// Write the heartbeat line until `shutdown` is cancelled.
    ///
    /// The first line is written immediately. Returns `Ok(())` only on
    /// shutdown; an open or write failure is returned as soon as it happens.
    pub async fn run(self, shutdown: CancellationToken) -> Result<(), FatalError> {
        let mut file = self.open().await?;
        tracing::info!(
            path = %self.path.display(),
            interval_ms = self.interval.as_millis() as u64,
            "Heartbeat writer started"
        );

        let mut written: u64 = 0;
        loop {
            self.write_line(&mut file).await?;
            written += 1;
            tracing::debug!(written, "Heartbeat line written");

            tokio::select! {
                _ = shutdown.cancelled() => {
                    tracing::info!(written, "Heartbeat writer stopped");
                    return Ok(());
                }
                _ = tokio::time::sleep(self.interval) => {}
            }
        }
    }

    async fn write_line(&self, file: &mut File) -> Result<(), FatalError> {
        append_line(file, &self.line)
            .await
            .map_err(|source| FatalError::Write {
                path: self.path.clone(),
                source,
            })
    }
}

/// Append `line` and flush it.
///
/// tokio::fs::File completes writes in the background, so a write error may
/// only surface on flush.
async fn append_line(file: &mut File, line: &str) -> std::io::Result<()> {
    file.write_all(line.as_bytes()).await?;
    file.flush().await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DEFAULT_HEARTBEAT_LINE;

    fn writer_in(dir: &Path, interval: Duration) -> HeartbeatWriter {
        HeartbeatWriter::new(dir.join("test.log"), interval, DEFAULT_HEARTBEAT_LINE)
    }

    #[test]
    fn test_from_config_uses_configured_values() {
        let config = HeartbeatConfig::default();
        let writer = HeartbeatWriter::from_config(&config);
        assert_eq!(writer.path(), config.path.as_path());
        assert_eq!(writer.interval, Duration::from_secs(2));
        assert_eq!(writer.line, "Testing...\n");
    }

    #[tokio::test]
    async fn test_writes_first_line_immediately() {
        let dir = tempfile::tempdir().unwrap();
        let writer = writer_in(dir.path(), Duration::from_secs(3600));
        let path = writer.path().to_path_buf();

        let shutdown = CancellationToken::new();
        shutdown.cancel();
        writer.run(shutdown).await.unwrap();

        let contents = std::fs::read_to_string(path).unwrap();
        assert_eq!(contents, "Testing...\n");
    }

    #[tokio::test]
    async fn test_creates_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let writer = writer_in(dir.path(), Duration::from_secs(1));
        assert!(!writer.path().exists());

        writer.open().await.unwrap();
        assert!(writer.path().exists());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_new_file_mode() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let writer = writer_in(dir.path(), Duration::from_secs(1));
        writer.open().await.unwrap();

        let mode = std::fs::metadata(writer.path()).unwrap().permissions().mode();
        // umask may clear bits but never adds them
        assert_eq!(mode & !HEARTBEAT_FILE_MODE & 0o777, 0);
        assert_ne!(mode & 0o200, 0);
    }

    #[tokio::test]
    async fn test_appends_after_existing_content() {
        let dir = tempfile::tempdir().unwrap();
        let writer = writer_in(dir.path(), Duration::from_secs(3600));
        let path = writer.path().to_path_buf();
        std::fs::write(&path, "previous run\nTesting...\n").unwrap();

        let shutdown = CancellationToken::new();
        shutdown.cancel();
        writer.run(shutdown).await.unwrap();

        let contents = std::fs::read_to_string(path).unwrap();
        assert_eq!(contents, "previous run\nTesting...\nTesting...\n");
    }

    #[tokio::test]
    async fn test_repeats_on_interval() {
        let dir = tempfile::tempdir().unwrap();
        let writer = writer_in(dir.path(), Duration::from_millis(20));
        let path = writer.path().to_path_buf();

        let shutdown = CancellationToken::new();
        let task = tokio::spawn(writer.run(shutdown.clone()));
        tokio::time::sleep(Duration::from_millis(300)).await;
        shutdown.cancel();
        task.await.unwrap().unwrap();

        let contents = std::fs::read_to_string(path).unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        assert!(lines.len() >= 3, "expected several lines, got {}", lines.len());
        assert!(lines.iter().all(|l| *l == "Testing..."));
        assert!(contents.ends_with('\n'));
    }

    #[tokio::test]
    async fn test_missing_parent_directory_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let writer = HeartbeatWriter::new(
            dir.path().join("missing").join("test.log"),
            Duration::from_millis(10),
            DEFAULT_HEARTBEAT_LINE,
        );

        let err = writer.run(CancellationToken::new()).await.unwrap_err();
        match err {
            FatalError::Open { path, source } => {
                assert!(path.ends_with("missing/test.log"));
                assert_eq!(source.kind(), std::io::ErrorKind::NotFound);
            }
            other => panic!("expected open error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_directory_path_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let writer = HeartbeatWriter::new(dir.path(), Duration::from_millis(10), "x\n");

        let err = writer.run(CancellationToken::new()).await.unwrap_err();
        assert!(matches!(err, FatalError::Open { .. }));
        assert!(err.to_string().starts_with("Failed to open heartbeat file"));
    }

    #[cfg(target_os = "linux")]
    #[tokio::test]
    async fn test_write_failure_is_fatal() {
        // /dev/full opens fine but every write fails with ENOSPC
        let writer = HeartbeatWriter::new(
            "/dev/full",
            Duration::from_millis(10),
            DEFAULT_HEARTBEAT_LINE,
        );

        let err = writer.run(CancellationToken::new()).await.unwrap_err();
        assert!(err.to_string().starts_with("Failed to write heartbeat file /dev/full"));
        match err {
            FatalError::Write { path, source } => {
                assert_eq!(path, PathBuf::from("/dev/full"));
                assert_eq!(source.kind(), std::io::ErrorKind::StorageFull);
            }
            other => panic!("expected write error, got {other:?}"),
        }
    }
}
