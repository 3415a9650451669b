//! Data models for webpage capture and server health
//!
//! This module defines the types shared by the capture pipeline and the MCP
//! layers:
//! - Image format, crop region and viewport types
//! - Capture options with a builder and validation
//! - Browser status and health check response structures
//!
//! Employee directory types live in [`crate::employees::model`].

use std::fmt;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::{CaptureError, CaptureResult};

/// Smallest accepted viewport width in pixels
pub const MIN_VIEWPORT_WIDTH: u32 = 320;
/// Largest accepted viewport width in pixels
pub const MAX_VIEWPORT_WIDTH: u32 = 3840;
/// Smallest accepted viewport height in pixels
pub const MIN_VIEWPORT_HEIGHT: u32 = 240;
/// Largest accepted viewport height in pixels
pub const MAX_VIEWPORT_HEIGHT: u32 = 2160;
/// Upper bound for the post-load render budget
pub const MAX_WAIT_MS: u64 = 30_000;

/// Output image format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum ImageFormat {
    /// PNG format (lossless)
    #[default]
    Png,
    /// JPEG format (lossy, quality-controlled)
    Jpeg,
    /// WebP format (lossless)
    Webp,
}

impl ImageFormat {
    /// Returns the MIME type for this format
    pub fn mime_type(&self) -> &'static str {
        match self {
            ImageFormat::Png => "image/png",
            ImageFormat::Jpeg => "image/jpeg",
            ImageFormat::Webp => "image/webp",
        }
    }

    /// Returns the file extension (without the dot)
    pub fn extension(&self) -> &'static str {
        match self {
            ImageFormat::Png => "png",
            ImageFormat::Jpeg => "jpg",
            ImageFormat::Webp => "webp",
        }
    }

    /// Returns the lowercase format name
    pub fn as_str(&self) -> &'static str {
        match self {
            ImageFormat::Png => "png",
            ImageFormat::Jpeg => "jpeg",
            ImageFormat::Webp => "webp",
        }
    }
}

impl fmt::Display for ImageFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ImageFormat {
    type Err = CaptureError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "png" => Ok(ImageFormat::Png),
            "jpeg" | "jpg" => Ok(ImageFormat::Jpeg),
            "webp" => Ok(ImageFormat::Webp),
            other => Err(CaptureError::invalid(
                "format",
                format!("unknown format '{other}', expected png, jpeg or webp"),
            )),
        }
    }
}

/// Rectangle in page pixels, relative to the top-left corner of the viewport
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Region {
    /// X offset from left edge (pixels)
    pub x: u32,
    /// Y offset from top edge (pixels)
    pub y: u32,
    /// Width of region (pixels)
    pub width: u32,
    /// Height of region (pixels)
    pub height: u32,
}

impl Region {
    /// Creates a new region
    pub fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Whether the region lies entirely inside a `width` x `height` image
    pub fn fits_within(&self, width: u32, height: u32) -> bool {
        self.width > 0
            && self.height > 0
            && self.x.checked_add(self.width).is_some_and(|right| right <= width)
            && self.y.checked_add(self.height).is_some_and(|bottom| bottom <= height)
    }
}

/// Browser window size used to lay out the page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Viewport {
    /// Width in CSS pixels
    pub width: u32,
    /// Height in CSS pixels
    pub height: u32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: 1280,
            height: 800,
        }
    }
}

impl Viewport {
    /// Creates a viewport, checking it against the accepted bounds
    pub fn new(width: u32, height: u32) -> CaptureResult<Self> {
        if !(MIN_VIEWPORT_WIDTH..=MAX_VIEWPORT_WIDTH).contains(&width) {
            return Err(CaptureError::invalid(
                "width",
                format!(
                    "{width} is outside {MIN_VIEWPORT_WIDTH}..={MAX_VIEWPORT_WIDTH}"
                ),
            ));
        }
        if !(MIN_VIEWPORT_HEIGHT..=MAX_VIEWPORT_HEIGHT).contains(&height) {
            return Err(CaptureError::invalid(
                "height",
                format!(
                    "{height} is outside {MIN_VIEWPORT_HEIGHT}..={MAX_VIEWPORT_HEIGHT}"
                ),
            ));
        }
        Ok(Self { width, height })
    }
}

/// What the browser is asked to render
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    /// Absolute, already validated URL
    pub url: String,
    /// Window size
    pub viewport: Viewport,
    /// Extra virtual time granted after load for scripts and animations
    pub wait_ms: u64,
}

impl PageRequest {
    /// Creates a request with the default viewport and no extra wait
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            viewport: Viewport::default(),
            wait_ms: 0,
        }
    }

    /// Sets the viewport
    pub fn with_viewport(mut self, viewport: Viewport) -> Self {
        self.viewport = viewport;
        self
    }

    /// Sets the post-load wait, rejecting values above [`MAX_WAIT_MS`]
    pub fn with_wait_ms(mut self, wait_ms: u64) -> CaptureResult<Self> {
        if wait_ms > MAX_WAIT_MS {
            return Err(CaptureError::invalid(
                "waitMs",
                format!("{wait_ms} exceeds maximum {MAX_WAIT_MS}"),
            ));
        }
        self.wait_ms = wait_ms;
        Ok(self)
    }
}

/// Post-processing and encoding options for a captured page
#[derive(Debug, Clone, PartialEq)]
pub struct CaptureOptions {
    /// Output format
    pub format: ImageFormat,
    /// Quality 0-100 (JPEG quality, PNG compression level)
    pub quality: u8,
    /// Scale factor 0.1-2.0
    pub scale: f32,
    /// Crop region applied before scaling
    pub region: Option<Region>,
    /// Longest edge allowed after scaling; larger images are shrunk to fit
    pub max_dimension: Option<u32>,
}

impl Default for CaptureOptions {
    fn default() -> Self {
        Self {
            format: ImageFormat::Png,
            quality: 80,
            scale: 1.0,
            region: None,
            max_dimension: None,
        }
    }
}

impl CaptureOptions {
    /// Starts a builder with default values
    ///
    /// # Examples
    ///
    /// ```
    /// use tools_core::model::{CaptureOptions, ImageFormat};
    ///
    /// let opts = CaptureOptions::builder()
    ///     .format(ImageFormat::Jpeg)
    ///     .quality(90)
    ///     .scale(0.5)
    ///     .build();
    /// assert_eq!(opts.quality, 90);
    /// ```
    pub fn builder() -> CaptureOptionsBuilder {
        CaptureOptionsBuilder::default()
    }

    /// Clamps quality and scale into their valid ranges
    pub fn validate(&mut self) {
        self.quality = self.quality.min(100);
        if !self.scale.is_finite() {
            self.scale = 1.0;
        }
        self.scale = self.scale.clamp(0.1, 2.0);
    }
}

/// Builder for [`CaptureOptions`]
#[derive(Debug, Default)]
pub struct CaptureOptionsBuilder {
    opts: CaptureOptions,
}

impl CaptureOptionsBuilder {
    /// Sets the output format
    pub fn format(mut self, format: ImageFormat) -> Self {
        self.opts.format = format;
        self
    }

    /// Sets the quality
    pub fn quality(mut self, quality: u8) -> Self {
        self.opts.quality = quality;
        self
    }

    /// Sets the scale factor
    pub fn scale(mut self, scale: f32) -> Self {
        self.opts.scale = scale;
        self
    }

    /// Sets the crop region
    pub fn region(mut self, region: Region) -> Self {
        self.opts.region = Some(region);
        self
    }

    /// Sets the maximum output dimension
    pub fn max_dimension(mut self, max_dimension: u32) -> Self {
        self.opts.max_dimension = Some(max_dimension);
        self
    }

    /// Builds validated options
    pub fn build(mut self) -> CaptureOptions {
        self.opts.validate();
        self.opts
    }
}

/// Availability of the capture backend
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct BrowserStatus {
    /// Whether captures can currently be attempted
    pub available: bool,
    /// Resolved browser executable, if any
    pub executable: Option<String>,
    /// Backend name ("chrome" or "mock")
    pub backend: String,
}

/// Response structure for the `health_check` tools
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct HealthCheckResponse {
    /// Server name
    pub server: String,
    /// Server version
    pub version: String,
    /// Whether the server is functioning correctly
    pub ok: bool,
    /// Server-specific details
    pub details: serde_json::Value,
}

impl HealthCheckResponse {
    /// Creates a health check response
    pub fn new(server: &str, version: &str, ok: bool, details: serde_json::Value) -> Self {
        Self {
            server: server.to_string(),
            version: version.to_string(),
            ok,
            details,
        }
    }
}
