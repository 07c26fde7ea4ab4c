use async_trait::async_trait;
use log::{debug, error};
use reqwest::{Client, StatusCode};
use serde_json::Value;
use std::time::Duration;
use url::Url;

use crate::app_config::ProviderConfig;
use crate::errors::ProviderError;
use crate::providers::{Provider, TranslationRequest, TranslationResponse};

/// Client for the public Google web translation endpoint
#[derive(Debug)]
pub struct GoogleTranslate {
    /// HTTP client for making requests
    client: Client,
    /// Endpoint URL
    endpoint: Url,
    /// Client identifier query parameter
    client_id: String,
}

impl GoogleTranslate {
    /// Create a new client from the provider configuration
    pub fn new(config: &ProviderConfig) -> Result<Self, ProviderError> {
        let endpoint = Url::parse(&config.endpoint).map_err(|e| {
            ProviderError::RequestFailed(format!("Invalid endpoint '{}': {}", config.endpoint, e))
        })?;

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| ProviderError::ConnectionError(e.to_string()))?;

        Ok(Self {
            client,
            endpoint,
            client_id: config.client_id.clone(),
        })
    }

    /// Extract the translated text and detected language from the nested array payload.
    ///
    /// The payload looks like `[[["Hello","नमस्ते",...],...],null,"hi",...]`: the
    /// first element lists translated segments, the third the detected source.
    pub fn parse_response(body: &Value) -> Result<TranslationResponse, ProviderError> {
        let segments = body
            .get(0)
            .and_then(Value::as_array)
            .ok_or_else(|| ProviderError::ParseError("missing translation segments".to_string()))?;

        let text: String = segments
            .iter()
            .filter_map(|segment| segment.get(0).and_then(Value::as_str))
            .collect();

        if text.trim().is_empty() {
            return Err(ProviderError::EmptyResponse);
        }

        let detected_language = body.get(2).and_then(Value::as_str).map(String::from);

        Ok(TranslationResponse {
            text,
            detected_language,
        })
    }
}

#[async_trait]
impl Provider for GoogleTranslate {
    async fn translate(&self, request: TranslationRequest) -> Result<TranslationResponse, ProviderError> {
        let response = self
            .client
            .get(self.endpoint.clone())
            .query(&[
                ("client", self.client_id.as_str()),
                ("sl", request.source_language.as_str()),
                ("tl", request.target_language.as_str()),
                ("dt", "t"),
                ("q", request.text.as_str()),
            ])
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() || e.is_connect() {
                    ProviderError::ConnectionError(e.to_string())
                } else {
                    ProviderError::RequestFailed(e.to_string())
                }
            })?;

        let status = response.status();
        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(ProviderError::RateLimitExceeded(format!(
                "{} -> {}",
                request.source_language, request.target_language
            )));
        }
        if !status.is_success() {
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "Failed to get error response text".to_string());
            error!("Google translate error ({}): {}", status, message);
            return Err(ProviderError::ApiError {
                status_code: status.as_u16(),
                message,
            });
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| ProviderError::ParseError(e.to_string()))?;

        let parsed = Self::parse_response(&body)?;
        debug!(
            "Translated {} chars ({} -> {}, detected {:?})",
            request.text.chars().count(),
            request.source_language,
            request.target_language,
            parsed.detected_language
        );
        Ok(parsed)
    }
}
