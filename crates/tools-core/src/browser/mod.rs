//! Webpage capture backends
//!
//! A capture is one external browser call: render a URL at a viewport size
//! and hand back the pixels. Backends implement [`PageCapture`]:
//!
//! | Backend | Renders with | Used by |
//! |---------|--------------|---------|
//! | [`ChromeBackend`] | headless Chromium/Chrome process | production |
//! | [`MockBackend`] | synthetic gradient | tests, `--mock` |
//!
//! Post-processing (crop, scale, encode) is backend-independent and lives in
//! [`ImageBuffer`] and [`crate::util::encode`].

use async_trait::async_trait;

use crate::{
    error::CaptureResult,
    model::{BrowserStatus, PageRequest},
};

pub mod chrome;
pub mod image_buffer;
pub mod mock;

pub use chrome::{ChromeBackend, ChromeConfig};
pub use image_buffer::ImageBuffer;
pub use mock::MockBackend;

/// Core trait for webpage capture backends
///
/// Implementations must be thread-safe (`Send + Sync`); the MCP layer holds
/// them behind an `Arc` and may run captures concurrently.
#[async_trait]
pub trait PageCapture: Send + Sync {
    /// Renders `request.url` and returns the viewport as an image
    async fn capture_page(&self, request: &PageRequest) -> CaptureResult<ImageBuffer>;

    /// Reports whether the backend can currently capture
    fn status(&self) -> BrowserStatus;

    /// Short backend name for logs and health reports
    fn name(&self) -> &'static str;
}
