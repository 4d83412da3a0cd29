//! Streaming chat chunks: delta text and in-band errors.

use serde_json::Value;

/// Text delta carried by a streaming chunk, if any.
pub(crate) fn delta_text(chunk: &Value) -> Option<&str> {
    chunk
        .get("choices")?
        .as_array()?
        .first()?
        .get("delta")?
        .get("content")?
        .as_str()
        .filter(|s| !s.is_empty())
}

/// Error reported inside a chunk body instead of as an HTTP failure.
pub(crate) fn chunk_error(chunk: &Value) -> Option<String> {
    let err = chunk.get("error")?;
    Some(
        err.get("message")
            .and_then(|v| v.as_str())
            .unwrap_or("Unknown error")
            .to_string(),
    )
}

/// Text of a non-streamed completion.
pub(crate) fn message_text(response: &Value) -> Option<String> {
    let content = response
        .get("choices")?
        .as_array()?
        .first()?
        .get("message")?
        .get("content")?;
    if let Some(s) = content.as_str() {
        return Some(s.to_string());
    }
    // Some compatible servers return content blocks instead of a string.
    let parts: Vec<&str> = content
        .as_array()?
        .iter()
        .filter_map(|b| b.get("text").and_then(|t| t.as_str()))
        .collect();
    if parts.is_empty() { None } else { Some(parts.concat()) }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn delta_text_from_chunk() {
        let chunk = json!({"choices": [{"index": 0, "delta": {"role": "assistant", "content": "Hel"}}]});
        assert_eq!(delta_text(&chunk), Some("Hel"));
    }

    #[test]
    fn delta_text_skips_empty_and_missing() {
        assert_eq!(delta_text(&json!({"choices": [{"delta": {"content": ""}}]})), None);
        assert_eq!(delta_text(&json!({"choices": [{"delta": {}}]})), None);
        assert_eq!(delta_text(&json!({"choices": []})), None);
        assert_eq!(delta_text(&json!({"usage": {"total_tokens": 3}})), None);
    }

    #[test]
    fn chunk_error_message() {
        let chunk = json!({"error": {"message": "Quota exceeded"}});
        assert_eq!(chunk_error(&chunk).as_deref(), Some("Quota exceeded"));
        assert_eq!(chunk_error(&json!({"error": {}})).as_deref(), Some("Unknown error"));
        assert_eq!(chunk_error(&json!({"choices": []})), None);
    }

    #[test]
    fn message_text_string_and_blocks() {
        let plain = json!({"choices": [{"message": {"role": "assistant", "content": "pong"}}]});
        assert_eq!(message_text(&plain).as_deref(), Some("pong"));
        let blocks = json!({"choices": [{"message": {"content": [{"type": "text", "text": "a"}, {"type": "text", "text": "b"}]}}]});
        assert_eq!(message_text(&blocks).as_deref(), Some("ab"));
        assert_eq!(message_text(&json!({"choices": []})), None);
    }
}
