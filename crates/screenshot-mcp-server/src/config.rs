//! Command-line and environment configuration for `webshot-mcp`

use std::{path::PathBuf, sync::Arc, time::Duration};

use clap::Parser;
use tools_core::{
    browser::{ChromeBackend, ChromeConfig, MockBackend, PageCapture},
    util::temp_files::TempFileManager,
};

use crate::mcp::ScreenshotDefaults;

/// MCP server that renders webpages to images with headless Chromium
#[derive(Debug, Clone, Parser)]
#[command(name = "webshot-mcp", version, about)]
pub struct ServerConfig {
    /// Browser executable; searched on PATH when omitted
    #[arg(long, env = "CHROME_PATH")]
    pub browser: Option<PathBuf>,

    /// Seconds before a capture is abandoned and the browser killed
    #[arg(long, env = "WEBSHOT_TIMEOUT_SECS", default_value_t = 30)]
    pub timeout_secs: u64,

    /// Pass --no-sandbox to the browser (needed in most containers)
    #[arg(long, env = "WEBSHOT_NO_SANDBOX")]
    pub no_sandbox: bool,

    /// Where screenshots are written (default: $TMP/webshot-mcp)
    #[arg(long, env = "WEBSHOT_OUTPUT_DIR")]
    pub output_dir: Option<PathBuf>,

    /// Leave screenshots on disk when the server exits
    #[arg(long, env = "WEBSHOT_KEEP_FILES")]
    pub keep_files: bool,

    /// Longest edge of a returned image, in pixels
    #[arg(long, env = "WEBSHOT_MAX_DIMENSION", default_value_t = 4096)]
    pub max_dimension: u32,

    /// Serve synthetic images instead of launching a browser
    #[arg(long)]
    pub mock: bool,

    /// Emit logs as JSON lines on stderr
    #[arg(long, env = "WEBSHOT_LOG_JSON")]
    pub log_json: bool,
}

impl ServerConfig {
    /// Browser settings derived from the flags
    pub fn chrome_config(&self) -> ChromeConfig {
        ChromeConfig {
            executable: self.browser.clone(),
            timeout: Duration::from_secs(self.timeout_secs.max(1)),
            no_sandbox: self.no_sandbox,
            extra_args: Vec::new(),
        }
    }

    /// The capture backend selected by `--mock`
    pub fn backend(&self) -> Arc<dyn PageCapture> {
        if self.mock {
            Arc::new(MockBackend::new())
        } else {
            Arc::new(ChromeBackend::new(self.chrome_config()))
        }
    }

    /// File manager for the configured output directory
    pub fn temp_files(&self) -> TempFileManager {
        let manager = match &self.output_dir {
            Some(dir) => TempFileManager::with_dir(dir),
            None => TempFileManager::new(),
        };
        manager.keep_files(self.keep_files)
    }

    /// Per-request defaults the server applies
    pub fn defaults(&self) -> ScreenshotDefaults {
        ScreenshotDefaults {
            max_dimension: (self.max_dimension > 0).then_some(self.max_dimension),
        }
    }
}
