//! MCP Server Test Harness
//!
//! Reusable fixtures for exercising the screenshot MCP server against a
//! mock backend, with every written file confined to a scratch directory.
//!
//! # Usage
//!
//! ```rust,ignore
//! use common::mcp_harness::{ContentValidator, McpTestContext};
//!
//! #[tokio::test]
//! async fn test_capture() {
//!     let ctx = McpTestContext::new_with_mock();
//!     let result = ctx.screenshot("https://example.com").await.unwrap();
//!     let parts = ContentValidator::validate_capture_result(&result, "image/png").unwrap();
//!     assert!(ContentValidator::is_valid_png(&parts.image_bytes));
//! }
//! ```

use std::{path::PathBuf, sync::Arc};

use base64::{Engine, engine::general_purpose::STANDARD};
use rmcp::{
    ErrorData,
    handler::server::wrapper::Parameters,
    model::CallToolResult,
};
use screenshot_mcp_server::mcp::{ScreenshotDefaults, ScreenshotMcpServer, TakeScreenshotParams};
use tempfile::TempDir;
use tools_core::{browser::MockBackend, util::temp_files::TempFileManager};

/// Test fixture wrapping a `ScreenshotMcpServer` with a mock backend
pub struct McpTestContext {
    pub server:     ScreenshotMcpServer,
    pub temp_files: Arc<TempFileManager>,
    pub backend:    Arc<MockBackend>,
    _dir:           TempDir,
}

impl McpTestContext {
    /// Context with a default MockBackend and no size limit
    pub fn new_with_mock() -> Self {
        Self::new_with_configured_mock(MockBackend::new(), ScreenshotDefaults::default())
    }

    /// Context with a configured MockBackend (delays, injected errors)
    pub fn new_with_configured_mock(mock: MockBackend, defaults: ScreenshotDefaults) -> Self {
        let dir = tempfile::tempdir().expect("create scratch dir");
        let backend = Arc::new(mock);
        let temp_files = Arc::new(TempFileManager::with_dir(dir.path()));
        let server = ScreenshotMcpServer::new(backend.clone(), Arc::clone(&temp_files), defaults);
        Self {
            server,
            temp_files,
            backend,
            _dir: dir,
        }
    }

    // --- Tool invocation helpers ---

    pub async fn health_check(&self) -> Result<CallToolResult, ErrorData> {
        self.server.health_check().await
    }

    pub async fn take_screenshot(
        &self,
        params: TakeScreenshotParams,
    ) -> Result<CallToolResult, ErrorData> {
        self.server.take_screenshot(Parameters(params)).await
    }

    /// Convenience: screenshot a URL with default options
    pub async fn screenshot(&self, url: &str) -> Result<CallToolResult, ErrorData> {
        self.take_screenshot(TakeScreenshotParams {
            url: url.to_string(),
            ..Default::default()
        })
        .await
    }

    pub async fn list_screenshots(&self) -> Result<CallToolResult, ErrorData> {
        self.server.list_screenshots().await
    }

    pub async fn cleanup_screenshots(&self) -> Result<CallToolResult, ErrorData> {
        self.server.cleanup_screenshots().await
    }

    // --- Utility methods ---

    pub fn temp_file_count(&self) -> usize {
        self.temp_files.count()
    }

    pub fn temp_file_paths(&self) -> Vec<PathBuf> {
        self.temp_files.list().into_iter().map(|f| f.path).collect()
    }
}

// ============================================================================
// Content Validators
// ============================================================================

/// Parsed components of a capture result
#[derive(Debug)]
pub struct CaptureResultParts {
    /// Decoded image bytes
    pub image_bytes: Vec<u8>,
    /// file:// URI extracted from the file reference
    pub file_uri:    String,
    /// Parsed metadata JSON
    pub metadata:    serde_json::Value,
}

/// Validation utilities for MCP tool responses
pub struct ContentValidator;

impl ContentValidator {
    /// Decodes the base64 image in the first content item
    pub fn validate_base64_image(
        result: &CallToolResult,
        expected_mime: &str,
    ) -> Result<Vec<u8>, String> {
        let image = result
            .content
            .first()
            .ok_or("Missing image content")?
            .as_image()
            .ok_or("First content is not an image")?;

        if image.mime_type != expected_mime {
            return Err(format!("Expected MIME type '{}', got '{}'", expected_mime, image.mime_type));
        }

        STANDARD.decode(&image.data).map_err(|e| format!("Invalid base64: {e}"))
    }

    /// Extracts the file:// URI from the second content item
    pub fn validate_file_uri(result: &CallToolResult) -> Result<String, String> {
        let text = result
            .content
            .get(1)
            .ok_or("Missing file reference content")?
            .as_text()
            .ok_or("Second content is not text")?;

        let start = text.text.find("file://").ok_or("File reference missing file:// URI")?;
        let rest = &text.text[start..];
        let end = rest.find(')').or_else(|| rest.find('\n')).unwrap_or(rest.len());

        Ok(rest[..end].to_string())
    }

    /// Parses the JSON block in the third content item
    pub fn validate_metadata(result: &CallToolResult) -> Result<serde_json::Value, String> {
        let text = result
            .content
            .get(2)
            .ok_or("Missing metadata content")?
            .as_text()
            .ok_or("Third content is not text")?;

        let start = text.text.find("```json").ok_or("Metadata missing JSON code block")? + 7;
        let end = text.text[start..]
            .find("```")
            .map(|i| start + i)
            .ok_or("Unclosed JSON code block")?;

        serde_json::from_str(text.text[start..end].trim()).map_err(|e| format!("Invalid JSON: {e}"))
    }

    /// Checks the full three-part structure of a capture result
    pub fn validate_capture_result(
        result: &CallToolResult,
        expected_mime: &str,
    ) -> Result<CaptureResultParts, String> {
        if result.content.len() != 3 {
            return Err(format!("Expected 3 content items, got {}", result.content.len()));
        }
        if result.is_error.unwrap_or(false) {
            return Err("Result is marked as error".to_string());
        }

        Ok(CaptureResultParts {
            image_bytes: Self::validate_base64_image(result, expected_mime)?,
            file_uri:    Self::validate_file_uri(result)?,
            metadata:    Self::validate_metadata(result)?,
        })
    }

    /// Parses a single JSON text content item
    pub fn json_text(result: &CallToolResult) -> Result<serde_json::Value, String> {
        let text = result
            .content
            .first()
            .ok_or("Missing content")?
            .as_text()
            .ok_or("First content is not text")?;
        serde_json::from_str(&text.text).map_err(|e| format!("Invalid JSON: {e}"))
    }

    /// PNG files start with 0x89 'P' 'N' 'G' 0x0D 0x0A 0x1A 0x0A
    pub fn is_valid_png(bytes: &[u8]) -> bool {
        bytes.starts_with(&[0x89, 0x50, 0x4e, 0x47, 0x0d, 0x0a, 0x1a, 0x0a])
    }

    pub fn is_valid_jpeg(bytes: &[u8]) -> bool {
        bytes.starts_with(&[0xff, 0xd8, 0xff])
    }

    /// RIFF container with a WEBP form type
    pub fn is_valid_webp(bytes: &[u8]) -> bool {
        bytes.len() >= 12 && &bytes[..4] == b"RIFF" && &bytes[8..12] == b"WEBP"
    }
}

/// Converts a file:// URI from a capture result back into a path
pub fn uri_to_path(uri: &str) -> PathBuf {
    let raw = if cfg!(windows) {
        uri.strip_prefix("file:///").unwrap_or(uri)
    } else {
        uri.strip_prefix("file://").unwrap_or(uri)
    };
    PathBuf::from(raw)
}
