//! Headless Chromium/Chrome capture backend
//!
//! Each capture spawns one browser process with `--headless=new
//! --screenshot=<file>`, waits for it to exit (bounded by a timeout), then
//! decodes the PNG it wrote. Every capture gets a fresh scratch directory
//! holding both the output file and a throwaway browser profile, so
//! concurrent captures never share state.

use std::{
    path::{Path, PathBuf},
    process::Stdio,
    time::Duration,
};

use async_trait::async_trait;
use tokio::process::Command;
use tracing::{debug, warn};

use super::{ImageBuffer, PageCapture};
use crate::{
    error::{CaptureError, CaptureResult},
    model::{BrowserStatus, PageRequest},
    util::detect::{BrowserSearch, find_browser, find_browser_at},
};

/// Longest stderr excerpt carried in [`CaptureError::BrowserFailed`]
const STDERR_TAIL_CHARS: usize = 2000;

/// File name the browser is told to write
const SCREENSHOT_FILE: &str = "page.png";

/// Configuration for [`ChromeBackend`]
#[derive(Debug, Clone)]
pub struct ChromeConfig {
    /// Browser executable; auto-detected when `None`
    pub executable: Option<PathBuf>,
    /// Upper bound for one capture, process start to exit
    pub timeout: Duration,
    /// Pass `--no-sandbox` (needed as root and in most containers)
    pub no_sandbox: bool,
    /// Extra arguments, placed before the standard flags
    pub extra_args: Vec<String>,
}

impl Default for ChromeConfig {
    fn default() -> Self {
        Self {
            executable: None,
            timeout: Duration::from_secs(30),
            no_sandbox: false,
            extra_args: Vec::new(),
        }
    }
}

/// Capture backend driving a headless Chromium-family browser
#[derive(Debug)]
pub struct ChromeBackend {
    config: ChromeConfig,
    search: BrowserSearch,
}

impl ChromeBackend {
    /// Creates a backend, resolving the browser executable
    ///
    /// A missing browser is not an error here: the backend reports itself as
    /// unavailable through [`PageCapture::status`] and each capture fails
    /// with [`CaptureError::BrowserNotFound`].
    pub fn new(config: ChromeConfig) -> Self {
        let search = match &config.executable {
            Some(path) => find_browser_at(path),
            None => find_browser(),
        };
        match &search.found {
            Some(path) => debug!("Using browser at {}", path.display()),
            None => warn!("No headless browser found; searched {:?}", search.searched),
        }
        Self { config, search }
    }

    /// Returns the resolved executable, if any
    pub fn executable(&self) -> Option<&Path> {
        self.search.found.as_deref()
    }

    /// Builds the browser command line for one capture
    ///
    /// The URL is always the final argument.
    pub fn build_args(&self, request: &PageRequest, output: &Path, profile: &Path) -> Vec<String> {
        let mut args = self.config.extra_args.clone();
        args.extend(
            [
                "--headless=new",
                "--disable-gpu",
                "--hide-scrollbars",
                "--mute-audio",
                "--no-first-run",
                "--no-default-browser-check",
            ]
            .map(String::from),
        );
        args.push(format!("--user-data-dir={}", profile.display()));
        args.push(format!(
            "--window-size={},{}",
            request.viewport.width, request.viewport.height
        ));
        args.push(format!("--screenshot={}", output.display()));
        if request.wait_ms > 0 {
            args.push(format!("--virtual-time-budget={}", request.wait_ms));
        }
        if self.config.no_sandbox {
            args.push("--no-sandbox".to_string());
        }
        args.push(request.url.clone());
        args
    }
}

#[async_trait]
impl PageCapture for ChromeBackend {
    async fn capture_page(&self, request: &PageRequest) -> CaptureResult<ImageBuffer> {
        let executable = self.search.clone().into_result()?;

        let workdir = tempfile::Builder::new().prefix("webshot-").tempdir()?;
        let output = workdir.path().join(SCREENSHOT_FILE);
        let profile = workdir.path().join("profile");
        let args = self.build_args(request, &output, &profile);

        debug!(url = %request.url, browser = %executable.display(), "Launching headless browser");

        let child = Command::new(&executable)
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| match e.kind() {
                std::io::ErrorKind::NotFound => CaptureError::BrowserNotFound {
                    searched: vec![executable.display().to_string()],
                },
                _ => CaptureError::IoError(e),
            })?;

        // Dropping the wait future on timeout drops the child, which kills it.
        let finished = tokio::time::timeout(self.config.timeout, child.wait_with_output())
            .await
            .map_err(|_| CaptureError::CaptureTimeout {
                duration_ms: self.config.timeout.as_millis() as u64,
            })??;

        let stderr = stderr_tail(&finished.stderr);
        if !finished.status.success() {
            return Err(CaptureError::BrowserFailed {
                status: finished.status.code(),
                stderr,
            });
        }

        let bytes = match tokio::fs::read(&output).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(CaptureError::BrowserFailed {
                    status: finished.status.code(),
                    stderr: if stderr.is_empty() {
                        "browser exited without writing a screenshot".to_string()
                    } else {
                        stderr
                    },
                });
            }
            Err(e) => return Err(e.into()),
        };

        let image = ImageBuffer::from_png_bytes(&bytes)?;
        debug!(url = %request.url, width = image.width(), height = image.height(), "Page captured");
        Ok(image)
    }

    fn status(&self) -> BrowserStatus {
        BrowserStatus {
            available: self.search.found.is_some(),
            executable: self.search.found.as_ref().map(|p| p.display().to_string()),
            backend: self.name().to_string(),
        }
    }

    fn name(&self) -> &'static str {
        "chrome"
    }
}

/// Keeps the last [`STDERR_TAIL_CHARS`] characters of the browser's stderr
fn stderr_tail(raw: &[u8]) -> String {
    let text = String::from_utf8_lossy(raw);
    let text = text.trim();
    let count = text.chars().count();
    if count <= STDERR_TAIL_CHARS {
        return text.to_string();
    }
    text.chars().skip(count - STDERR_TAIL_CHARS).collect()
}
