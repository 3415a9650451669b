//! MCP service implementation with tool routing
//!
//! This module provides the webshot-mcp server: one browser call per
//! `take_screenshot`, plus bookkeeping tools for the files it writes.

use std::sync::Arc;

use rmcp::{
    ErrorData as McpError, ServerHandler,
    handler::server::{tool::ToolRouter, wrapper::Parameters},
    model::{CallToolResult, Implementation, ServerCapabilities, ServerInfo},
    tool, tool_handler, tool_router,
};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tools_core::{
    browser::{MockBackend, PageCapture},
    error::CaptureError,
    mcp::json_result,
    model::{CaptureOptions, HealthCheckResponse, ImageFormat, PageRequest, Region, Viewport},
    util::{encode::render, temp_files::TempFileManager, validate::validate_url},
};

use crate::mcp_content::build_capture_result;

/// Crop rectangle in page pixels
#[derive(Debug, Clone, Copy, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ClipRegion {
    /// X offset from the left edge of the viewport
    pub x:      u32,
    /// Y offset from the top edge of the viewport
    pub y:      u32,
    /// Width of the region
    pub width:  u32,
    /// Height of the region
    pub height: u32,
}

impl From<ClipRegion> for Region {
    fn from(clip: ClipRegion) -> Self {
        Region::new(clip.x, clip.y, clip.width, clip.height)
    }
}

/// Parameters for the take_screenshot tool
#[derive(Debug, Clone, Default, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct TakeScreenshotParams {
    /// Page to render (http, https or file URL)
    pub url: String,

    /// Viewport width in pixels (320-3840, default: 1280)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,

    /// Viewport height in pixels (240-2160, default: 800)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,

    /// Output image format (default: png)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<ImageFormat>,

    /// Image quality 0-100 (default: 80). JPEG quality; PNG compression level.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quality: Option<u8>,

    /// Scale factor 0.1-2.0 applied to the rendered image (default: 1.0)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scale: Option<f32>,

    /// Extra render time after load, in milliseconds (0-30000)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wait_ms: Option<u64>,

    /// Region of the viewport to keep. If omitted, the whole viewport.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub clip: Option<ClipRegion>,
}

/// Server-wide settings applied to every capture
#[derive(Debug, Clone, Copy, Default)]
pub struct ScreenshotDefaults {
    /// Longest edge of returned images; `None` disables the limit
    pub max_dimension: Option<u32>,
}

/// Converts a CaptureError to an MCP ErrorData
///
/// Caller mistakes become `invalid_params`; everything else is an internal
/// error. The remediation hint travels in `data.hint`.
pub fn convert_capture_error_to_mcp(error: CaptureError) -> McpError {
    let data = Some(serde_json::json!({ "hint": error.remediation_hint() }));
    if error.is_client_error() {
        McpError::invalid_params(error.to_string(), data)
    } else {
        tracing::warn!(error = %error, "capture failed");
        McpError::internal_error(error.to_string(), data)
    }
}

/// Webpage screenshot MCP server
///
/// # Tools
///
/// - `health_check`: server and browser status
/// - `take_screenshot`: render a URL and return the image
/// - `list_screenshots`: files written during this session
/// - `cleanup_screenshots`: delete those files
#[derive(Clone)]
pub struct ScreenshotMcpServer {
    tool_router: ToolRouter<Self>,
    backend:     Arc<dyn PageCapture>,
    temp_files:  Arc<TempFileManager>,
    defaults:    ScreenshotDefaults,
}

#[tool_router]
impl ScreenshotMcpServer {
    /// Creates a server around a capture backend and file manager
    ///
    /// # Examples
    ///
    /// ```
    /// use std::sync::Arc;
    ///
    /// use screenshot_mcp_server::mcp::{ScreenshotDefaults, ScreenshotMcpServer};
    /// use tools_core::{browser::MockBackend, util::temp_files::TempFileManager};
    ///
    /// let server = ScreenshotMcpServer::new(
    ///     Arc::new(MockBackend::new()),
    ///     Arc::new(TempFileManager::new()),
    ///     ScreenshotDefaults::default(),
    /// );
    /// ```
    pub fn new(
        backend: Arc<dyn PageCapture>,
        temp_files: Arc<TempFileManager>,
        defaults: ScreenshotDefaults,
    ) -> Self {
        Self {
            tool_router: Self::tool_router(),
            backend,
            temp_files,
            defaults,
        }
    }

    /// Server with a MockBackend and the default temp directory
    pub fn new_with_mock() -> Self {
        Self::new(
            Arc::new(MockBackend::new()),
            Arc::new(TempFileManager::new()),
            ScreenshotDefaults::default(),
        )
    }

    /// Names of the registered tools, sorted
    pub fn tool_names(&self) -> Vec<String> {
        let mut names: Vec<String> =
            self.tool_router.list_all().into_iter().map(|t| t.name.to_string()).collect();
        names.sort();
        names
    }

    /// Reports server version and whether a browser is available
    ///
    /// Response:
    /// ```json
    /// {
    ///   "server": "webshot-mcp",
    ///   "version": "0.1.0",
    ///   "ok": true,
    ///   "details": {
    ///     "browser": {"available": true, "executable": "/usr/bin/chromium", "backend": "chrome"},
    ///     "screenshots": 0
    ///   }
    /// }
    /// ```
    #[tool(description = "Check server health and whether a headless browser is available")]
    pub async fn health_check(&self) -> Result<CallToolResult, McpError> {
        let browser = self.backend.status();
        let response = HealthCheckResponse::new(
            "webshot-mcp",
            env!("CARGO_PKG_VERSION"),
            browser.available,
            serde_json::json!({
                "browser": browser,
                "screenshots": self.temp_files.count(),
            }),
        );
        json_result(&response)
    }

    /// Renders a webpage and returns the screenshot
    ///
    /// Minimal request:
    /// ```json
    /// {"name": "take_screenshot", "arguments": {"url": "https://example.com"}}
    /// ```
    ///
    /// Full options:
    /// ```json
    /// {
    ///   "name": "take_screenshot",
    ///   "arguments": {
    ///     "url": "https://example.com",
    ///     "width": 1920, "height": 1080,
    ///     "format": "jpeg", "quality": 85, "scale": 0.5,
    ///     "waitMs": 1000,
    ///     "clip": {"x": 0, "y": 0, "width": 800, "height": 600}
    ///   }
    /// }
    /// ```
    ///
    /// Returns the inline image, a file reference and a metadata block.
    #[tool(
        description = "Render a webpage in a headless browser and return a screenshot. \
                       Returns the image inline, a file:// reference to the saved copy, \
                       and JSON metadata."
    )]
    pub async fn take_screenshot(
        &self,
        Parameters(params): Parameters<TakeScreenshotParams>,
    ) -> Result<CallToolResult, McpError> {
        let (request, opts) =
            self.prepare_capture(&params).map_err(convert_capture_error_to_mcp)?;

        tracing::debug!(
            url = %request.url,
            width = request.viewport.width,
            height = request.viewport.height,
            backend = self.backend.name(),
            "take_screenshot"
        );

        let page = self
            .backend
            .capture_page(&request)
            .await
            .map_err(convert_capture_error_to_mcp)?;

        let encoded = render(&page, &opts).map_err(convert_capture_error_to_mcp)?;

        let (file_path, _size) = self
            .temp_files
            .write_image(&encoded.bytes, encoded.format)
            .map_err(convert_capture_error_to_mcp)?;

        Ok(build_capture_result(&request.url, &encoded, &file_path, opts.quality, opts.scale))
    }

    /// Lists screenshot files written during this session
    #[tool(description = "List screenshot files saved by this server during the current session")]
    pub async fn list_screenshots(&self) -> Result<CallToolResult, McpError> {
        let files = self.temp_files.list();
        json_result(&serde_json::json!({
            "count": files.len(),
            "directory": self.temp_files.dir(),
            "screenshots": files,
        }))
    }

    /// Deletes every screenshot file this session wrote
    #[tool(description = "Delete all screenshot files saved by this server during the current session")]
    pub async fn cleanup_screenshots(&self) -> Result<CallToolResult, McpError> {
        let removed = self.temp_files.cleanup_all();
        tracing::info!(removed, "cleaned up screenshots");
        json_result(&serde_json::json!({ "removed": removed }))
    }
}

impl ScreenshotMcpServer {
    /// Validates tool input into a page request and post-processing options
    ///
    /// Out-of-range values are rejected rather than clamped.
    fn prepare_capture(
        &self,
        params: &TakeScreenshotParams,
    ) -> Result<(PageRequest, CaptureOptions), CaptureError> {
        let url = validate_url(&params.url)?;

        let defaults = Viewport::default();
        let viewport = Viewport::new(
            params.width.unwrap_or(defaults.width),
            params.height.unwrap_or(defaults.height),
        )?;

        let quality = params.quality.unwrap_or(80);
        if quality > 100 {
            return Err(CaptureError::invalid("quality", format!("{quality} exceeds maximum 100")));
        }

        let scale = params.scale.unwrap_or(1.0);
        if !(0.1..=2.0).contains(&scale) {
            return Err(CaptureError::invalid(
                "scale",
                format!("{scale} is outside 0.1..=2.0"),
            ));
        }

        let mut request = PageRequest::new(url).with_viewport(viewport);
        if let Some(wait_ms) = params.wait_ms {
            request = request.with_wait_ms(wait_ms)?;
        }

        let mut builder = CaptureOptions::builder()
            .format(params.format.unwrap_or_default())
            .quality(quality)
            .scale(scale);

        if let Some(clip) = params.clip {
            if clip.width == 0 || clip.height == 0 {
                return Err(CaptureError::invalid("clip", "width and height must be greater than 0"));
            }
            if !Region::from(clip).fits_within(viewport.width, viewport.height) {
                return Err(CaptureError::invalid(
                    "clip",
                    format!(
                        "region {}x{} at ({}, {}) exceeds the {}x{} viewport",
                        clip.width, clip.height, clip.x, clip.y, viewport.width, viewport.height
                    ),
                ));
            }
            builder = builder.region(clip.into());
        }

        if let Some(max_dimension) = self.defaults.max_dimension {
            builder = builder.max_dimension(max_dimension);
        }

        Ok((request, builder.build()))
    }
}

impl Default for ScreenshotMcpServer {
    fn default() -> Self {
        Self::new_with_mock()
    }
}

#[tool_handler]
impl ServerHandler for ScreenshotMcpServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation::from_build_env(),
            instructions: Some(
                "Webpage screenshots. Call take_screenshot with a URL; optional width/height \
                 set the viewport, format/quality/scale shape the output, clip crops it. \
                 Use health_check to confirm a browser is installed."
                    .to_string(),
            ),
            ..Default::default()
        }
    }
}
