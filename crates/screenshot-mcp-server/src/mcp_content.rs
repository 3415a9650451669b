//! MCP content builders for screenshot results
//!
//! A capture answers with three content items so every kind of client gets
//! something useful:
//!
//! 1. the inline base64 image
//! 2. a markdown reference to the saved file (`file://` URI)
//! 3. a markdown block with the capture metadata as JSON
//!
//! # Examples
//!
//! ```
//! use std::path::PathBuf;
//!
//! use screenshot_mcp_server::mcp_content::build_capture_result;
//! use tools_core::{model::ImageFormat, util::encode::EncodedImage};
//!
//! let encoded = EncodedImage {
//!     bytes:  vec![0u8; 100],
//!     format: ImageFormat::Png,
//!     width:  1280,
//!     height: 800,
//! };
//! let file_path = PathBuf::from("/tmp/webshot-mcp/screenshot-1.png");
//!
//! let result = build_capture_result("https://example.com/", &encoded, &file_path, 80, 1.0);
//! assert_eq!(result.content.len(), 3);
//! ```

use std::path::Path;

use base64::{Engine, engine::general_purpose::STANDARD};
use rmcp::model::{CallToolResult, Content};
use tools_core::util::encode::EncodedImage;

/// Base64-encodes image bytes into MCP image content
pub fn build_image_content(data: &[u8], mime_type: &str) -> Content {
    Content::image(STANDARD.encode(data), mime_type)
}

/// Converts a path to a `file://` URI
pub fn file_uri(path: &Path) -> String {
    let path_str = path.to_string_lossy();

    #[cfg(target_os = "windows")]
    let uri = format!("file:///{}", path_str.replace('\\', "/"));

    #[cfg(not(target_os = "windows"))]
    let uri = format!("file://{}", path_str);

    uri
}

/// Builds a markdown reference to a saved screenshot file
pub fn build_resource_link(path: &Path, mime_type: &str, size: u64) -> Content {
    let uri = file_uri(path);
    let filename = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("screenshot");
    let timestamp = chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Secs, true);

    Content::text(format!(
        "## Screenshot File Reference\n\n**File:** [{filename}]({uri})\n**Timestamp:** \
         {timestamp}\n**Size:** {size} bytes\n**MIME Type:** {mime_type}\n\n_The screenshot \
         has been saved to the path above._"
    ))
}

/// Builds the three-part `take_screenshot` result
pub fn build_capture_result(
    url: &str,
    encoded: &EncodedImage,
    file_path: &Path,
    quality: u8,
    scale: f32,
) -> CallToolResult {
    let mime_type = encoded.format.mime_type();
    let size_bytes = encoded.bytes.len() as u64;

    let metadata = serde_json::json!({
        "url": url,
        "dimensions": [encoded.width, encoded.height],
        "format": encoded.format.as_str(),
        "size_bytes": size_bytes,
        "quality": quality,
        "scale": scale,
        "file_path": file_path.to_string_lossy(),
    });
    let metadata_str = serde_json::to_string_pretty(&metadata)
        .unwrap_or_else(|_| r#"{"error": "failed to serialize metadata"}"#.to_string());

    CallToolResult::success(vec![
        build_image_content(&encoded.bytes, mime_type),
        build_resource_link(file_path, mime_type, size_bytes),
        Content::text(format!("## Capture Metadata\n\n```json\n{metadata_str}\n```")),
    ])
}
