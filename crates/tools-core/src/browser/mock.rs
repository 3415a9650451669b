//! Mock capture backend for testing
//!
//! `MockBackend` implements [`PageCapture`] without launching a browser. It
//! renders a synthetic gradient at the requested viewport size and records
//! every request it receives.
//!
//! - **Configurable Delay:** simulate slow pages
//! - **Error Injection:** exercise error handling paths
//!
//! # Examples
//!
//! ```
//! use tools_core::{
//!     browser::{MockBackend, PageCapture},
//!     model::PageRequest,
//! };
//!
//! #[tokio::main]
//! async fn main() {
//!     let backend = MockBackend::new();
//!
//!     let image = backend
//!         .capture_page(&PageRequest::new("https://example.com"))
//!         .await
//!         .unwrap();
//!     assert_eq!(image.dimensions(), (1280, 800));
//!     assert_eq!(backend.requests().len(), 1);
//! }
//! ```

use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use tokio::time::sleep;

use super::{ImageBuffer, PageCapture};
use crate::{
    error::{CaptureError, CaptureResult},
    model::{BrowserStatus, PageRequest},
};

/// Mock capture backend for testing and development
#[derive(Debug, Default)]
pub struct MockBackend {
    /// Optional delay to simulate page load time
    delay: Option<Duration>,
    /// Optional error to inject for testing error handling
    error_injection: Option<CaptureError>,
    /// Every request seen, in order
    requests: Mutex<Vec<PageRequest>>,
}

impl MockBackend {
    /// Creates a new MockBackend
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a delay applied before every capture returns
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Injects an error that every capture will return
    ///
    /// # Examples
    ///
    /// ```
    /// use tools_core::{browser::MockBackend, error::CaptureError};
    ///
    /// let backend = MockBackend::new().with_error(CaptureError::CaptureTimeout {
    ///     duration_ms: 30_000,
    /// });
    /// ```
    pub fn with_error(mut self, error: CaptureError) -> Self {
        self.error_injection = Some(error);
        self
    }

    /// Returns a copy of every request received so far
    pub fn requests(&self) -> Vec<PageRequest> {
        self.requests.lock().clone()
    }

    /// Applies configured delay if set
    async fn apply_delay(&self) {
        if let Some(duration) = self.delay {
            sleep(duration).await;
        }
    }

    /// Returns a fresh copy of the injected error, if any
    fn check_error_injection(&self) -> CaptureResult<()> {
        let Some(ref error) = self.error_injection else {
            return Ok(());
        };
        Err(match error {
            CaptureError::InvalidParameter { parameter, reason } => {
                CaptureError::InvalidParameter {
                    parameter: parameter.clone(),
                    reason: reason.clone(),
                }
            }
            CaptureError::InvalidUrl { url, reason } => CaptureError::InvalidUrl {
                url: url.clone(),
                reason: reason.clone(),
            },
            CaptureError::BrowserNotFound { searched } => CaptureError::BrowserNotFound {
                searched: searched.clone(),
            },
            CaptureError::BrowserFailed { status, stderr } => CaptureError::BrowserFailed {
                status: *status,
                stderr: stderr.clone(),
            },
            CaptureError::CaptureTimeout { duration_ms } => CaptureError::CaptureTimeout {
                duration_ms: *duration_ms,
            },
            CaptureError::EncodingFailed { format, reason } => CaptureError::EncodingFailed {
                format: format.clone(),
                reason: reason.clone(),
            },
            CaptureError::ImageError(msg) => CaptureError::ImageError(msg.clone()),
            CaptureError::IoError(e) => {
                CaptureError::IoError(std::io::Error::new(e.kind(), e.to_string()))
            }
        })
    }
}

#[async_trait]
impl PageCapture for MockBackend {
    async fn capture_page(&self, request: &PageRequest) -> CaptureResult<ImageBuffer> {
        self.requests.lock().push(request.clone());
        self.apply_delay().await;
        self.check_error_injection()?;

        Ok(ImageBuffer::from_test_pattern(request.viewport.width, request.viewport.height))
    }

    fn status(&self) -> BrowserStatus {
        BrowserStatus {
            available: self.error_injection.is_none(),
            executable: None,
            backend: self.name().to_string(),
        }
    }

    fn name(&self) -> &'static str {
        "mock"
    }
}

#[cfg(test)]
mod tests {
    use std::time::Instant;

    use super::*;
    use crate::model::Viewport;

    #[tokio::test]
    async fn test_capture_uses_viewport_size() {
        let backend = MockBackend::new();
        let request =
            PageRequest::new("https://example.com").with_viewport(Viewport::new(800, 600).unwrap());

        let image = backend.capture_page(&request).await.unwrap();
        assert_eq!(image.dimensions(), (800, 600));
    }

    #[tokio::test]
    async fn test_requests_are_recorded_in_order() {
        let backend = MockBackend::new();

        backend.capture_page(&PageRequest::new("https://a.example")).await.unwrap();
        backend.capture_page(&PageRequest::new("https://b.example")).await.unwrap();

        let urls: Vec<_> = backend.requests().into_iter().map(|r| r.url).collect();
        assert_eq!(urls, vec!["https://a.example", "https://b.example"]);
    }

    #[tokio::test]
    async fn test_error_injection_repeats() {
        let backend = MockBackend::new().with_error(CaptureError::BrowserFailed {
            status: Some(1),
            stderr: "boom".to_string(),
        });

        for _ in 0..2 {
            let err = backend
                .capture_page(&PageRequest::new("https://example.com"))
                .await
                .unwrap_err();
            assert!(matches!(err, CaptureError::BrowserFailed { status: Some(1), .. }));
        }
        assert!(!backend.status().available);
    }

    #[tokio::test]
    async fn test_delay_is_applied() {
        let backend = MockBackend::new().with_delay(Duration::from_millis(50));

        let start = Instant::now();
        backend.capture_page(&PageRequest::new("https://example.com")).await.unwrap();
        assert!(start.elapsed() >= Duration::from_millis(50));
    }

    #[test]
    fn test_status_reports_mock() {
        let status = MockBackend::new().status();
        assert!(status.available);
        assert_eq!(status.backend, "mock");
        assert!(status.executable.is_none());
    }
}
