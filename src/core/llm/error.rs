//! Chat and API error types.

use crate::core::util;

/// Errors from a generation request. Each one is caught per turn; none ends the session.
#[derive(Debug, thiserror::Error)]
pub enum ChatError {
    #[error("{0}")]
    ApiAuth(String),
    #[error("Rate limit or quota exceeded: {0}")]
    RateLimited(String),
    #[error("Permission denied: {0}")]
    PermissionDenied(String),
    #[error("API error: {0}")]
    ApiMessage(String),
    #[error("No response from the model within {0} seconds")]
    Timeout(u64),
    #[error("{0}")]
    Other(Box<dyn std::error::Error + Send + Sync + 'static>),
}

const AUTH_HINT: &str =
    "API key rejected by the provider. Check GEMINI_API_KEY (or run `config set-api-key`).";

/// Map async-openai or transport errors into ChatError.
///
/// Classification uses the structured `error.code` / `error.status` /
/// `details[].reason` fields when a body is present, and Google status names
/// otherwise. Bare numbers in the message text are never matched.
pub fn map_api_error<E>(e: E) -> ChatError
where
    E: std::fmt::Display + Into<Box<dyn std::error::Error + Send + Sync + 'static>>,
{
    let s = e.to_string();
    let fields = util::extract_error_fields(&s).unwrap_or_default();
    let message = fields
        .message
        .clone()
        .or_else(|| util::extract_error_message(&s));
    let named = |token: &str| fields.has(token) || s.contains(token);

    let auth = fields.code == Some(401)
        || named("UNAUTHENTICATED")
        || named("API_KEY_INVALID")
        || message
            .as_deref()
            .is_some_and(|m| m.contains("API key not valid"));
    if auth {
        return ChatError::ApiAuth(match message {
            Some(m) => format!("{} ({})", AUTH_HINT, m),
            None => AUTH_HINT.to_string(),
        });
    }
    if fields.code == Some(429) || named("RESOURCE_EXHAUSTED") {
        return ChatError::RateLimited(message.unwrap_or(s));
    }
    if fields.code == Some(403) || named("PERMISSION_DENIED") {
        return ChatError::PermissionDenied(message.unwrap_or(s));
    }
    if let Some(m) = message {
        return ChatError::ApiMessage(m);
    }
    ChatError::Other(e.into())
}
