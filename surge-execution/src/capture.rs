//! Output capture for supervised subprocesses
//!
//! Copies subprocess stdout and stderr into a single append-mode log
//! artifact as bytes arrive, so a caller can read partial output for a
//! still-running test. Raw byte concatenation of both streams; no ordering
//! guarantee between the two.

use std::path::Path;
use std::time::Duration;

use tokio::fs::{File, OpenOptions};
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWriteExt};
use tokio::task::JoinHandle;
use tracing::warn;

/// In-flight copy of a subprocess's output streams into a log artifact
pub struct OutputCapture {
    tasks: Vec<JoinHandle<std::io::Result<u64>>>,
}

impl OutputCapture {
    /// Start copying the given streams into `log_path`
    ///
    /// The artifact is opened in append mode and created if missing. Either
    /// stream may be absent.
    pub async fn start<O, E>(
        log_path: &Path,
        stdout: Option<O>,
        stderr: Option<E>,
    ) -> std::io::Result<Self>
    where
        O: AsyncRead + Unpin + Send + 'static,
        E: AsyncRead + Unpin + Send + 'static,
    {
        let stdout_file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(log_path)
            .await?;
        let stderr_file = stdout_file.try_clone().await?;

        let mut tasks = Vec::with_capacity(2);
        if let Some(stream) = stdout {
            tasks.push(tokio::spawn(copy_stream(stream, stdout_file)));
        }
        if let Some(stream) = stderr {
            tasks.push(tokio::spawn(copy_stream(stream, stderr_file)));
        }

        Ok(Self { tasks })
    }

    /// Wait until both streams hit EOF and all bytes are on disk
    pub async fn finish(self) {
        for task in self.tasks {
            match task.await {
                Ok(Ok(_)) => {}
                Ok(Err(e)) => warn!("Output capture stream failed: {}", e),
                Err(e) => warn!("Output capture task panicked: {}", e),
            }
        }
    }

    /// Wait for EOF like [`OutputCapture::finish`], but give up after `limit`
    ///
    /// A workload that forks leaves the pipe write-ends open in its
    /// children, so EOF can arrive long after the direct child exited.
    /// Copy tasks still open when the limit expires are aborted; everything
    /// copied so far is already on disk.
    pub async fn finish_within(self, limit: Duration) {
        let mut tasks = self.tasks;
        let drain = async {
            for task in &mut tasks {
                match task.await {
                    Ok(Ok(_)) => {}
                    Ok(Err(e)) => warn!("Output capture stream failed: {}", e),
                    Err(e) => warn!("Output capture task panicked: {}", e),
                }
            }
        };

        if tokio::time::timeout(limit, drain).await.is_err() {
            warn!("Output streams still open after {:?}, abandoning drain", limit);
            for task in &tasks {
                task.abort();
            }
        }
    }
}

async fn copy_stream<R>(mut stream: R, mut file: File) -> std::io::Result<u64>
where
    R: AsyncRead + Unpin,
{
    let copied = tokio::io::copy(&mut stream, &mut file).await?;
    file.flush().await?;
    Ok(copied)
}

/// Read at most `max_bytes` from the artifact at `path`
///
/// Used at finalization to snapshot output back into the run record without
/// ever loading an oversized artifact. Invalid UTF-8 is replaced, not
/// rejected; the workload's output is opaque bytes.
pub async fn read_bounded(path: &Path, max_bytes: usize) -> std::io::Result<String> {
    let file = File::open(path).await?;
    let mut buf = Vec::new();
    file.take(max_bytes as u64).read_to_end(&mut buf).await?;
    Ok(String::from_utf8_lossy(&buf).into_owned())
}
