//! Response helpers shared by the MCP server crates

use rmcp::{
    ErrorData as McpError,
    model::{CallToolResult, Content},
};
use serde::Serialize;

/// Serializes a value as a pretty JSON text result
pub fn json_result<T: Serialize>(value: &T) -> Result<CallToolResult, McpError> {
    let json = serde_json::to_string_pretty(value).map_err(|e| {
        McpError::internal_error(format!("Failed to serialize response: {e}"), None)
    })?;
    Ok(CallToolResult::success(vec![Content::text(json)]))
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use rmcp::model::ErrorCode;

    use super::*;

    #[test]
    fn test_json_result_is_pretty_text() {
        let result = json_result(&serde_json::json!({"removed": 2})).unwrap();

        assert_eq!(result.content.len(), 1);
        let text = &result.content[0].as_text().unwrap().text;
        assert!(text.contains("\"removed\": 2"));
    }

    #[test]
    fn test_unserializable_value_is_internal_error() {
        // JSON object keys must be strings
        let mut map = BTreeMap::new();
        map.insert(vec![1u8], 1);

        let err = json_result(&map).unwrap_err();
        assert_eq!(err.code, ErrorCode::INTERNAL_ERROR);
        assert!(err.message.contains("serialize"));
    }
}
