//! Generic utilities used across core modules.

use serde_json::Value;

/// Filter items by case-insensitive query matching on two string fields.
/// Returns all items when query is empty.
pub fn filter_by_query<'a, T, F>(items: &'a [T], query: &str, get_fields: F) -> Vec<&'a T>
where
    F: Fn(&'a T) -> (&str, &str),
{
    if query.is_empty() {
        return items.iter().collect();
    }
    let q = query.to_lowercase();
    items
        .iter()
        .filter(|item| {
            let (a, b) = get_fields(item);
            a.to_lowercase().contains(&q) || b.to_lowercase().contains(&q)
        })
        .collect()
}

/// Structured fields of a Google API error body (`{"error":{"code","status","message","details"}}`).
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ApiErrorFields {
    pub code: Option<u16>,
    pub status: Option<String>,
    pub message: Option<String>,
    /// `details[].reason` entries, e.g. `API_KEY_INVALID`.
    pub reasons: Vec<String>,
}

impl ApiErrorFields {
    /// True when `token` is the status or one of the detail reasons.
    pub fn has(&self, token: &str) -> bool {
        self.status.as_deref() == Some(token) || self.reasons.iter().any(|r| r == token)
    }
}

fn fields_from_value(v: &Value) -> Option<ApiErrorFields> {
    let error = match v {
        Value::Array(items) => items.first()?.get("error")?,
        other => other.get("error")?,
    };
    let code = match error.get("code") {
        Some(Value::Number(n)) => n.as_u64().and_then(|c| u16::try_from(c).ok()),
        Some(Value::String(s)) => s.trim().parse().ok(),
        _ => None,
    };
    let text = |key: &str| error.get(key).and_then(Value::as_str).map(str::to_string);
    let reasons = error
        .get("details")
        .and_then(Value::as_array)
        .map(|details| {
            details
                .iter()
                .filter_map(|d| d.get("reason").and_then(Value::as_str))
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default();
    Some(ApiErrorFields {
        code,
        status: text("status"),
        message: text("message"),
        reasons,
    })
}

/// Find the error object in `text`: the whole text as JSON, or the first JSON
/// value embedded in it (transport errors often wrap the body in prose).
pub fn extract_error_fields(text: &str) -> Option<ApiErrorFields> {
    if let Ok(v) = serde_json::from_str::<Value>(text.trim()) {
        return fields_from_value(&v);
    }
    text.match_indices(['{', '[']).find_map(|(i, _)| {
        let mut values = serde_json::Deserializer::from_str(&text[i..]).into_iter::<Value>();
        match values.next() {
            Some(Ok(v)) => fields_from_value(&v),
            _ => None,
        }
    })
}

/// Pull the human-readable message out of a provider error body.
///
/// Accepts `{"error":{"message":..}}`, the same wrapped in a one-element array
/// or embedded in other text, or a bare `"message":"..."` fragment.
pub fn extract_error_message(body: &str) -> Option<String> {
    if let Some(message) = extract_error_fields(body).and_then(|f| f.message) {
        return Some(message);
    }
    if body.contains("\"error\"")
        && let Some((_, rest)) = body.split_once("\"message\":\"")
        && let Some((msg, _)) = rest.split_once('"')
    {
        return Some(msg.to_string());
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_message_from_object() {
        let body = r#"{"error":{"code":429,"message":"Quota exceeded","status":"RESOURCE_EXHAUSTED"}}"#;
        assert_eq!(extract_error_message(body).as_deref(), Some("Quota exceeded"));
    }

    #[test]
    fn error_message_from_array() {
        let body = r#"[{"error":{"code":400,"message":"API key not valid"}}]"#;
        assert_eq!(extract_error_message(body).as_deref(), Some("API key not valid"));
    }

    #[test]
    fn error_message_embedded_in_text() {
        let body = r#"stream failed: {"error":{"message":"Rate limit exceeded"}} (status 429)"#;
        assert_eq!(extract_error_message(body).as_deref(), Some("Rate limit exceeded"));
    }

    #[test]
    fn error_fields_from_embedded_body() {
        let body = r#"request failed: [{"error":{"code":400,"message":"API key not valid.","status":"INVALID_ARGUMENT","details":[{"@type":"type.googleapis.com/google.rpc.ErrorInfo","reason":"API_KEY_INVALID"}]}}] at 12:01"#;
        let fields = extract_error_fields(body).unwrap();
        assert_eq!(fields.code, Some(400));
        assert_eq!(fields.status.as_deref(), Some("INVALID_ARGUMENT"));
        assert!(fields.has("API_KEY_INVALID"));
        assert!(!fields.has("UNAUTHENTICATED"));
    }

    #[test]
    fn error_fields_accept_string_codes() {
        let fields = extract_error_fields(r#"{"error":{"code":"429","message":"slow down"}}"#).unwrap();
        assert_eq!(fields.code, Some(429));
    }

    #[test]
    fn error_fields_absent_without_error_object() {
        assert_eq!(extract_error_fields(r#"{"candidates":[]}"#), None);
        assert_eq!(extract_error_fields("plain failure 401"), None);
    }

    #[test]
    fn error_message_absent() {
        assert_eq!(extract_error_message("connection refused"), None);
    }

    #[test]
    fn filter_empty_query_returns_all() {
        let items = vec!["a", "b", "c"];
        let out = filter_by_query(&items, "", |s| (s, ""));
        assert_eq!(out.len(), 3);
    }

    #[test]
    fn filter_match_first_field() {
        let items = vec!["hello", "world"];
        let out = filter_by_query(&items, "hel", |s| (s, ""));
        assert_eq!(out, vec![&"hello"]);
    }

    #[test]
    fn filter_match_second_field() {
        let items = vec![("a", "hello"), ("b", "world")];
        let out = filter_by_query(&items, "orld", |t| (t.0, t.1));
        assert_eq!(out, vec![&("b", "world")]);
    }

    #[test]
    fn filter_case_insensitive() {
        let items = vec!["Hello", "World"];
        let out = filter_by_query(&items, "world", |s| (s, ""));
        assert_eq!(out, vec![&"World"]);
    }

    #[test]
    fn filter_no_match_returns_empty() {
        let items = vec!["hello", "world"];
        let out = filter_by_query(&items, "xyz", |s| (s, ""));
        assert!(out.is_empty());
    }
}
