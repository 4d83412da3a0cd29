//! Fetch available models from the native Gemini REST API.

use std::future::Future;

use reqwest::StatusCode;
use serde::Deserialize;

use crate::core::config::Config;
use crate::core::util;

use super::error::ResolveError;
use super::info::{ModelInfo, normalize_model_id};

/// Guard against a provider that keeps returning page tokens.
const MAX_PAGES: usize = 20;
const PAGE_SIZE: u32 = 1000;

/// Source of model descriptors.
pub trait ModelLister {
    fn list_models(&self) -> impl Future<Output = Result<Vec<ModelInfo>, ResolveError>> + Send;
}

/// Lists models over HTTP with the `x-goog-api-key` header.
#[derive(Clone)]
pub struct GeminiModelLister {
    client: reqwest::Client,
    api_base: String,
    api_key: String,
}

impl GeminiModelLister {
    pub fn new(config: &Config) -> Result<Self, ResolveError> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| ResolveError::Transport(format!("failed to build HTTP client: {e}")))?;
        Ok(Self {
            client,
            api_base: config.api_base.trim_end_matches('/').to_string(),
            api_key: config.api_key().to_string(),
        })
    }

    async fn fetch_page(&self, page_token: Option<&str>) -> Result<ListModelsResponse, ResolveError> {
        let url = format!("{}/models", self.api_base);
        let mut query: Vec<(&str, String)> = vec![("pageSize", PAGE_SIZE.to_string())];
        if let Some(token) = page_token {
            query.push(("pageToken", token.to_string()));
        }
        log::debug!("GET {} (page token: {:?})", url, page_token);

        let response = self
            .client
            .get(&url)
            .header("x-goog-api-key", &self.api_key)
            .query(&query)
            .send()
            .await
            .map_err(|e| ResolveError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(classify_status(status, &body));
        }

        response
            .json::<ListModelsResponse>()
            .await
            .map_err(|e| ResolveError::Transport(format!("failed to parse model list: {e}")))
    }
}

impl ModelLister for GeminiModelLister {
    async fn list_models(&self) -> Result<Vec<ModelInfo>, ResolveError> {
        let mut models = Vec::new();
        let mut token: Option<String> = None;

        for _ in 0..MAX_PAGES {
            let page = self.fetch_page(token.as_deref()).await?;
            models.extend(page.models.into_iter().map(ModelInfo::from));
            match page.next_page_token.filter(|t| !t.is_empty()) {
                Some(next) => token = Some(next),
                None => return Ok(models),
            }
        }
        log::warn!("model listing stopped after {} pages", MAX_PAGES);
        Ok(models)
    }
}

/// Map an HTTP failure to a resolution error. Credential problems are reported separately.
fn classify_status(status: StatusCode, body: &str) -> ResolveError {
    let message = util::extract_error_message(body).unwrap_or_else(|| status.to_string());
    let key_problem = status == StatusCode::UNAUTHORIZED
        || status == StatusCode::FORBIDDEN
        || body.contains("API_KEY_INVALID")
        || body.contains("API key not valid");
    if key_problem {
        ResolveError::InvalidCredential(message)
    } else {
        ResolveError::Transport(format!("{} ({})", message, status.as_u16()))
    }
}

/// Filter models by query (case-insensitive match on id or display name).
pub fn filter_models<'a>(models: &'a [ModelInfo], query: &str) -> Vec<&'a ModelInfo> {
    util::filter_by_query(models, query, |m| (m.id.as_str(), m.display_name.as_str()))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ListModelsResponse {
    #[serde(default)]
    models: Vec<WireModel>,
    #[serde(default)]
    next_page_token: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireModel {
    name: String,
    #[serde(default)]
    display_name: String,
    #[serde(default)]
    supported_generation_methods: Vec<String>,
}

impl From<WireModel> for ModelInfo {
    fn from(m: WireModel) -> Self {
        let id = normalize_model_id(&m.name).to_string();
        let display_name = if m.display_name.is_empty() {
            id.clone()
        } else {
            m.display_name
        };
        ModelInfo {
            id,
            display_name,
            supported_methods: m.supported_generation_methods,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_native_listing_payload() {
        let body = r#"{
            "models": [
                {"name": "models/gemini-1.5-flash", "displayName": "Gemini 1.5 Flash",
                 "supportedGenerationMethods": ["generateContent", "countTokens"]},
                {"name": "models/embedding-001", "supportedGenerationMethods": ["embedContent"]}
            ],
            "nextPageToken": "abc"
        }"#;
        let page: ListModelsResponse = serde_json::from_str(body).unwrap();
        assert_eq!(page.next_page_token.as_deref(), Some("abc"));
        let models: Vec<ModelInfo> = page.models.into_iter().map(ModelInfo::from).collect();
        assert_eq!(models[0].id, "gemini-1.5-flash");
        assert_eq!(models[0].display_name, "Gemini 1.5 Flash");
        assert!(models[0].supports_generation());
        assert_eq!(models[1].display_name, "embedding-001");
        assert!(!models[1].supports_generation());
    }

    #[test]
    fn invalid_key_is_a_credential_error() {
        let body = r#"{"error":{"code":400,"message":"API key not valid. Please pass a valid API key.","status":"INVALID_ARGUMENT"}}"#;
        let err = classify_status(StatusCode::BAD_REQUEST, body);
        assert_eq!(
            err,
            ResolveError::InvalidCredential(
                "API key not valid. Please pass a valid API key.".to_string()
            )
        );
        assert!(err.is_fatal());
    }

    #[test]
    fn server_error_is_transport() {
        let err = classify_status(StatusCode::SERVICE_UNAVAILABLE, "overloaded");
        assert!(matches!(err, ResolveError::Transport(_)));
        assert!(!err.is_fatal());
    }

    #[test]
    fn filter_matches_display_name() {
        let models = vec![ModelInfo {
            id: "gemini-1.5-flash".to_string(),
            display_name: "Gemini Flash".to_string(),
            supported_methods: vec![],
        }];
        assert_eq!(filter_models(&models, "FLASH").len(), 1);
        assert!(filter_models(&models, "pro").is_empty());
    }
}
