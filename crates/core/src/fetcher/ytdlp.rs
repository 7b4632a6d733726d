//! yt-dlp based fetcher implementation.

use async_trait::async_trait;
use std::collections::VecDeque;
use std::path::Path;
use std::process::Stdio;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::process::Command;
use tokio::sync::mpsc;
use tokio::time::{timeout, Duration};
use tracing::{debug, warn};

use super::config::FetcherConfig;
use super::error::FetcherError;
use super::traits::{FetchRequest, Fetcher};

/// Number of stderr lines kept for error reporting.
const STDERR_TAIL_LINES: usize = 20;

/// Fetcher that shells out to yt-dlp.
pub struct YtDlpFetcher {
    config: FetcherConfig,
}

impl YtDlpFetcher {
    /// Creates a new yt-dlp fetcher with the given configuration.
    pub fn new(config: FetcherConfig) -> Self {
        Self { config }
    }

    /// Creates a fetcher with default configuration.
    pub fn with_defaults() -> Self {
        Self::new(FetcherConfig::default())
    }

    /// Builds yt-dlp arguments for a fetch into `output_dir`.
    fn build_args(&self, url: &str, output_dir: &Path) -> Vec<String> {
        let template = output_dir.join(&self.config.output_template);

        let mut args = vec![
            "-o".to_string(),
            template.to_string_lossy().to_string(),
            "--yes-playlist".to_string(),
            "--extract-audio".to_string(),
            "--audio-format".to_string(),
            self.config.audio_format.clone(),
            // One progress update per line instead of carriage-return redraws
            "--newline".to_string(),
        ];

        if let Some(ref location) = self.config.ffmpeg_location {
            args.extend([
                "--ffmpeg-location".to_string(),
                location.to_string_lossy().to_string(),
            ]);
        }

        args.extend(self.config.extra_args.iter().cloned());

        // URL goes after `--` so it is never parsed as an option
        args.push("--".to_string());
        args.push(url.to_string());

        args
    }

    fn map_spawn_error(&self, e: std::io::Error) -> FetcherError {
        if e.kind() == std::io::ErrorKind::NotFound {
            FetcherError::BinaryNotFound {
                path: self.config.ytdlp_path.clone(),
            }
        } else {
            FetcherError::Io(e)
        }
    }
}

#[async_trait]
impl Fetcher for YtDlpFetcher {
    fn name(&self) -> &str {
        "yt-dlp"
    }

    fn audio_extension(&self) -> &str {
        &self.config.audio_format
    }

    async fn fetch(
        &self,
        request: FetchRequest,
        line_tx: mpsc::Sender<String>,
    ) -> Result<(), FetcherError> {
        let args = self.build_args(&request.url, &request.output_dir);
        debug!(job_id = %request.job_id, ?args, "Spawning yt-dlp");

        let mut child = Command::new(&self.config.ytdlp_path)
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| self.map_spawn_error(e))?;

        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| std::io::Error::other("stdout was not captured"))?;
        let stderr = child
            .stderr
            .take()
            .ok_or_else(|| std::io::Error::other("stderr was not captured"))?;

        let mut stdout_lines = BufReader::new(stdout).lines();
        let mut stderr_lines = BufReader::new(stderr).lines();

        let timeout_duration = Duration::from_secs(self.config.timeout_secs);
        let result = timeout(timeout_duration, async {
            let mut stderr_tail: VecDeque<String> = VecDeque::with_capacity(STDERR_TAIL_LINES);
            let mut stdout_open = true;
            let mut stderr_open = true;

            while stdout_open || stderr_open {
                tokio::select! {
                    line = stdout_lines.next_line(), if stdout_open => match line? {
                        Some(line) => {
                            // Receiver gone means nobody is watching; keep draining the pipe
                            let _ = line_tx.send(line).await;
                        }
                        None => stdout_open = false,
                    },
                    line = stderr_lines.next_line(), if stderr_open => match line? {
                        Some(line) => {
                            if stderr_tail.len() == STDERR_TAIL_LINES {
                                stderr_tail.pop_front();
                            }
                            stderr_tail.push_back(line.clone());
                            let _ = line_tx.send(line).await;
                        }
                        None => stderr_open = false,
                    },
                }
            }

            let status = child.wait().await?;
            Ok::<_, std::io::Error>((status, stderr_tail))
        })
        .await;

        match result {
            Ok(Ok((status, stderr_tail))) => {
                if status.success() {
                    return Ok(());
                }
                let reason = match status.code() {
                    Some(code) => format!("yt-dlp exited with code {}", code),
                    None => "yt-dlp was terminated by a signal".to_string(),
                };
                let stderr = if stderr_tail.is_empty() {
                    None
                } else {
                    Some(Vec::from(stderr_tail).join("\n"))
                };
                Err(FetcherError::process_failed(reason, stderr))
            }
            Ok(Err(e)) => Err(FetcherError::Io(e)),
            Err(_) => {
                warn!(job_id = %request.job_id, "yt-dlp timed out, killing process");
                let _ = child.kill().await;
                Err(FetcherError::Timeout {
                    timeout_secs: self.config.timeout_secs,
                })
            }
        }
    }

    async fn validate(&self) -> Result<(), FetcherError> {
        let output = Command::new(&self.config.ytdlp_path)
            .arg("--version")
            .output()
            .await
            .map_err(|e| self.map_spawn_error(e))?;

        if !output.status.success() {
            return Err(FetcherError::process_failed(
                "yt-dlp --version failed",
                Some(String::from_utf8_lossy(&output.stderr).to_string()),
            ));
        }

        debug!(
            "yt-dlp version {}",
            String::from_utf8_lossy(&output.stdout).trim()
        );
        Ok(())
    }
}
