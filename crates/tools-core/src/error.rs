//! Error types for screenshot capture and employee directory operations
//!
//! Each error provides a user-facing message and an actionable remediation
//! hint through `remediation_hint()`, so protocol layers can surface both.

/// Result type alias for capture operations
pub type CaptureResult<T> = Result<T, CaptureError>;

/// Result type alias for employee directory operations
pub type EmployeeResult<T> = Result<T, EmployeeError>;

/// Error type for webpage screenshot capture
#[derive(Debug, thiserror::Error)]
pub enum CaptureError {
    /// Invalid parameter provided
    #[error("Invalid parameter '{parameter}': {reason}")]
    InvalidParameter {
        /// Name of the invalid parameter
        parameter: String,
        /// Reason why it's invalid
        reason: String,
    },

    /// The requested URL cannot be rendered
    #[error("Invalid URL '{url}': {reason}")]
    InvalidUrl {
        /// The URL as supplied by the caller
        url: String,
        /// Reason why it was rejected
        reason: String,
    },

    /// No Chromium-family browser could be located
    #[error("No headless browser found (searched: {})", .searched.join(", "))]
    BrowserNotFound {
        /// Executable names and paths that were tried
        searched: Vec<String>,
    },

    /// The browser process ran but did not produce a screenshot
    #[error("Browser exited with {}: {stderr}", .status.map_or_else(|| "a signal".to_string(), |c| format!("status {c}")))]
    BrowserFailed {
        /// Exit code, if the process exited normally
        status: Option<i32>,
        /// Tail of the browser's stderr output
        stderr: String,
    },

    /// Capture operation timed out
    #[error("Capture operation timed out after {duration_ms}ms")]
    CaptureTimeout {
        /// Timeout duration in milliseconds
        duration_ms: u64,
    },

    /// Image encoding failed
    #[error("Failed to encode image as {format}: {reason}")]
    EncodingFailed {
        /// Image format that failed
        format: String,
        /// Reason for encoding failure
        reason: String,
    },

    /// Image processing error
    #[error("Image processing error: {0}")]
    ImageError(String),

    /// I/O error occurred
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

impl CaptureError {
    /// Shorthand for [`CaptureError::InvalidParameter`]
    pub fn invalid(parameter: &str, reason: impl Into<String>) -> Self {
        CaptureError::InvalidParameter {
            parameter: parameter.to_string(),
            reason: reason.into(),
        }
    }

    /// Whether the caller (rather than the environment) is at fault
    pub fn is_client_error(&self) -> bool {
        matches!(self, CaptureError::InvalidParameter { .. } | CaptureError::InvalidUrl { .. })
    }

    /// Returns an actionable remediation hint for this error
    ///
    /// # Examples
    ///
    /// ```
    /// use tools_core::error::CaptureError;
    ///
    /// let error = CaptureError::BrowserNotFound {
    ///     searched: vec!["chromium".to_string()],
    /// };
    /// assert!(error.remediation_hint().contains("CHROME_PATH"));
    /// ```
    pub fn remediation_hint(&self) -> &str {
        match self {
            CaptureError::InvalidParameter { parameter, .. } => match parameter.as_str() {
                "quality" => "Quality must be between 0 and 100.",
                "scale" => "Scale must be between 0.1 and 2.0.",
                "width" => "Viewport width must be between 320 and 3840 pixels.",
                "height" => "Viewport height must be between 240 and 2160 pixels.",
                "waitMs" => "waitMs must be between 0 and 30000 milliseconds.",
                "clip" => {
                    "The clip region must have a non-zero size and lie inside the rendered \
                     viewport."
                }
                _ => "Check the parameter value against the tool's input schema.",
            },
            CaptureError::InvalidUrl { .. } => {
                "Pass an absolute URL with an http, https, or file scheme, for example \
                 https://example.com."
            }
            CaptureError::BrowserNotFound { .. } => {
                "Install Chromium or Google Chrome, or set CHROME_PATH (or --browser) to the \
                 browser executable."
            }
            CaptureError::BrowserFailed { .. } => {
                "The browser could not render the page. Check that the URL is reachable from \
                 this machine. When running as root or inside a container, enable --no-sandbox."
            }
            CaptureError::CaptureTimeout { .. } => {
                "The page took too long to render. Lower waitMs, check network access, or raise \
                 the server timeout with --timeout-secs."
            }
            CaptureError::EncodingFailed { format, .. } => match format.as_str() {
                "webp" => "WebP encoding failed. Try PNG format as a fallback.",
                "jpeg" | "jpg" => {
                    "JPEG encoding failed. Try reducing quality parameter or using PNG format."
                }
                _ => "Image encoding failed. Try a different format (PNG, WebP, or JPEG).",
            },
            CaptureError::ImageError(_) => {
                "Image processing failed. The browser output may be truncated; retry the \
                 capture."
            }
            CaptureError::IoError(_) => {
                "An I/O error occurred. Check file permissions, disk space, and the output \
                 directory."
            }
        }
    }
}

/// Error type for employee directory operations
#[derive(Debug, thiserror::Error)]
pub enum EmployeeError {
    /// Invalid parameter provided
    #[error("Invalid parameter '{parameter}': {reason}")]
    InvalidParameter {
        /// Name of the invalid parameter
        parameter: String,
        /// Reason why it's invalid
        reason: String,
    },

    /// No employee has the requested id
    #[error("Employee {id} not found")]
    NotFound {
        /// The id that was looked up
        id: i64,
    },

    /// Another employee already uses this e-mail address
    #[error("An employee with email '{email}' already exists")]
    DuplicateEmail {
        /// The conflicting address
        email: String,
    },

    /// Underlying SQLite failure
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),
}

impl EmployeeError {
    /// Shorthand for [`EmployeeError::InvalidParameter`]
    pub fn invalid(parameter: &str, reason: impl Into<String>) -> Self {
        EmployeeError::InvalidParameter {
            parameter: parameter.to_string(),
            reason: reason.into(),
        }
    }

    /// Whether the caller (rather than the database) is at fault
    pub fn is_client_error(&self) -> bool {
        !matches!(self, EmployeeError::Database(_))
    }

    /// Returns an actionable remediation hint for this error
    pub fn remediation_hint(&self) -> &str {
        match self {
            EmployeeError::InvalidParameter { parameter, .. } => match parameter.as_str() {
                "email" => "Use an address of the form name@example.com.",
                "salary" => "Salary must be a non-negative number.",
                "hireDate" => "Dates use the YYYY-MM-DD format, for example 2024-03-01.",
                "limit" => "limit must be between 1 and the documented maximum.",
                _ => "Check the parameter value against the tool's input schema.",
            },
            EmployeeError::NotFound { .. } => {
                "Use list_employees or search_employees to find a valid employee id."
            }
            EmployeeError::DuplicateEmail { .. } => {
                "E-mail addresses are unique. Update the existing employee instead, or use a \
                 different address."
            }
            EmployeeError::Database(_) => {
                "The database rejected the operation. Check the server logs; an in-memory \
                 database is reset whenever the server restarts."
            }
        }
    }
}
