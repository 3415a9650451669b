//! Browser detection
//!
//! Locates a Chromium-family executable able to run `--headless=new
//! --screenshot`. Resolution order:
//!
//! 1. `CHROME_PATH`, when it names an existing file
//! 2. well-known executable names on `PATH`
//! 3. well-known absolute install locations (macOS bundles, Windows
//!    Program Files)

use std::{
    env,
    ffi::OsString,
    path::{Path, PathBuf},
};

use crate::error::{CaptureError, CaptureResult};

/// Environment variable naming an explicit browser executable
pub const CHROME_PATH_ENV: &str = "CHROME_PATH";

/// Executable names tried on `PATH`, in order
pub const BROWSER_NAMES: &[&str] = &[
    "chromium",
    "chromium-browser",
    "google-chrome",
    "google-chrome-stable",
    "chrome",
    "microsoft-edge",
];

/// Absolute install locations tried after `PATH`
pub const BROWSER_INSTALL_PATHS: &[&str] = &[
    "/Applications/Google Chrome.app/Contents/MacOS/Google Chrome",
    "/Applications/Chromium.app/Contents/MacOS/Chromium",
    "/Applications/Microsoft Edge.app/Contents/MacOS/Microsoft Edge",
    r"C:\Program Files\Google\Chrome\Application\chrome.exe",
    r"C:\Program Files (x86)\Google\Chrome\Application\chrome.exe",
    r"C:\Program Files (x86)\Microsoft\Edge\Application\msedge.exe",
];

/// Outcome of a browser lookup
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BrowserSearch {
    /// The executable that will be used, if any
    pub found: Option<PathBuf>,
    /// Every candidate considered, for error reporting
    pub searched: Vec<String>,
}

impl BrowserSearch {
    /// Converts the search into the executable or a `BrowserNotFound` error
    pub fn into_result(self) -> CaptureResult<PathBuf> {
        self.found.ok_or(CaptureError::BrowserNotFound {
            searched: self.searched,
        })
    }
}

/// Finds a browser using the process environment
///
/// # Examples
///
/// ```
/// use tools_core::util::detect::find_browser;
///
/// let search = find_browser();
/// match search.found {
///     Some(path) => println!("browser: {}", path.display()),
///     None => println!("no browser, tried {:?}", search.searched),
/// }
/// ```
pub fn find_browser() -> BrowserSearch {
    find_browser_with_env(|key| env::var_os(key))
}

/// Checks a single explicitly configured executable
pub fn find_browser_at(path: &Path) -> BrowserSearch {
    BrowserSearch {
        found: path.is_file().then(|| path.to_path_buf()),
        searched: vec![path.display().to_string()],
    }
}

/// Detection with an injectable environment, for tests
fn find_browser_with_env<F>(env_provider: F) -> BrowserSearch
where
    F: Fn(&str) -> Option<OsString>,
{
    let mut searched = Vec::new();

    if let Some(explicit) = env_provider(CHROME_PATH_ENV) {
        let path = PathBuf::from(explicit);
        searched.push(format!("${CHROME_PATH_ENV}={}", path.display()));
        if path.is_file() {
            return BrowserSearch {
                found: Some(path),
                searched,
            };
        }
    }

    let path_dirs: Vec<PathBuf> = env_provider("PATH")
        .map(|paths| env::split_paths(&paths).collect())
        .unwrap_or_default();

    for name in BROWSER_NAMES {
        searched.push((*name).to_string());
        for dir in &path_dirs {
            for candidate in executable_candidates(dir, name) {
                if candidate.is_file() {
                    return BrowserSearch {
                        found: Some(candidate),
                        searched,
                    };
                }
            }
        }
    }

    for path in BROWSER_INSTALL_PATHS {
        searched.push((*path).to_string());
        let candidate = Path::new(path);
        if candidate.is_file() {
            return BrowserSearch {
                found: Some(candidate.to_path_buf()),
                searched,
            };
        }
    }

    BrowserSearch {
        found: None,
        searched,
    }
}

fn executable_candidates(dir: &Path, name: &str) -> Vec<PathBuf> {
    let plain = dir.join(name);
    if cfg!(windows) {
        vec![dir.join(format!("{name}.exe")), plain]
    } else {
        vec![plain]
    }
}
