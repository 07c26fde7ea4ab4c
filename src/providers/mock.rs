/*!
 * Mock provider implementation for testing.
 *
 * This module provides a scripted provider that simulates different behaviors:
 * - `MockProvider::working()` - Always succeeds with a tagged translation
 * - `MockProvider::failing()` - Always fails with an error
 * - `MockProvider::fail_first(n)` - Fails the first `n` requests, then succeeds
 * - `MockProvider::fail_on(marker)` - Fails every request whose text contains `marker`
 */

use async_trait::async_trait;
use parking_lot::Mutex;
use std::sync::Arc;

use crate::errors::ProviderError;
use crate::providers::{Provider, TranslationRequest, TranslationResponse};

/// Behavior mode for the mock provider
#[derive(Debug, Clone, PartialEq)]
pub enum MockBehavior {
    /// Always succeeds with a proper translation
    Working,
    /// Always fails with an error
    Failing,
    /// Fails the first N requests (transient errors), then succeeds
    FailFirst { failures: usize },
    /// Fails any request whose text contains the marker
    FailOn { marker: String },
    /// Fails any request declaring the given source language
    FailForSource { language: String },
    /// Panics on any request whose text contains the marker
    PanicOn { marker: String },
    /// Returns an empty response
    Empty,
}

/// Mock provider for testing translation behavior
#[derive(Debug, Clone)]
pub struct MockProvider {
    /// Behavior mode
    behavior: MockBehavior,
    /// Every request received, shared between clones
    requests: Arc<Mutex<Vec<TranslationRequest>>>,
    /// Custom response generator (optional)
    custom_response: Option<fn(&TranslationRequest) -> String>,
}

impl MockProvider {
    /// Create a new mock provider with the specified behavior
    pub fn new(behavior: MockBehavior) -> Self {
        Self {
            behavior,
            requests: Arc::new(Mutex::new(Vec::new())),
            custom_response: None,
        }
    }

    /// Create a working mock provider that always succeeds
    pub fn working() -> Self {
        Self::new(MockBehavior::Working)
    }

    /// Create a failing mock provider that always errors
    pub fn failing() -> Self {
        Self::new(MockBehavior::Failing)
    }

    /// Create a provider failing its first `failures` requests
    pub fn fail_first(failures: usize) -> Self {
        Self::new(MockBehavior::FailFirst { failures })
    }

    /// Create a provider failing texts that contain `marker`
    pub fn fail_on(marker: impl Into<String>) -> Self {
        Self::new(MockBehavior::FailOn {
            marker: marker.into(),
        })
    }

    /// Create a provider failing requests with the given source language
    pub fn fail_for_source(language: impl Into<String>) -> Self {
        Self::new(MockBehavior::FailForSource {
            language: language.into(),
        })
    }

    /// Create a provider panicking on texts that contain `marker`
    pub fn panic_on(marker: impl Into<String>) -> Self {
        Self::new(MockBehavior::PanicOn {
            marker: marker.into(),
        })
    }

    /// Create a mock that returns empty responses
    pub fn empty() -> Self {
        Self::new(MockBehavior::Empty)
    }

    /// Set a custom response generator
    pub fn with_custom_response(mut self, generator: fn(&TranslationRequest) -> String) -> Self {
        self.custom_response = Some(generator);
        self
    }

    /// The translation a working mock produces for `text`
    pub fn tagged(text: &str, target_language: &str) -> String {
        format!("[{}] {}", target_language, text)
    }

    /// Number of requests received so far
    pub fn request_count(&self) -> usize {
        self.requests.lock().len()
    }

    /// Snapshot of all requests received so far
    pub fn requests(&self) -> Vec<TranslationRequest> {
        self.requests.lock().clone()
    }

    fn respond(&self, request: &TranslationRequest) -> TranslationResponse {
        let text = match self.custom_response {
            Some(generator) => generator(request),
            None => Self::tagged(&request.text, &request.target_language),
        };
        TranslationResponse {
            text,
            detected_language: Some(request.source_language.clone()),
        }
    }
}

#[async_trait]
impl Provider for MockProvider {
    async fn translate(&self, request: TranslationRequest) -> Result<TranslationResponse, ProviderError> {
        let count = {
            let mut requests = self.requests.lock();
            requests.push(request.clone());
            requests.len()
        };

        match &self.behavior {
            MockBehavior::Working => Ok(self.respond(&request)),

            MockBehavior::Failing => Err(ProviderError::ApiError {
                status_code: 500,
                message: "Simulated provider failure".to_string(),
            }),

            MockBehavior::FailFirst { failures } => {
                if count <= *failures {
                    Err(ProviderError::ConnectionError(format!(
                        "Simulated transient failure (request #{})",
                        count
                    )))
                } else {
                    Ok(self.respond(&request))
                }
            }

            MockBehavior::FailOn { marker } => {
                if request.text.contains(marker.as_str()) {
                    Err(ProviderError::RateLimitExceeded(format!(
                        "Simulated rejection of '{}'",
                        marker
                    )))
                } else {
                    Ok(self.respond(&request))
                }
            }

            MockBehavior::FailForSource { language } => {
                if request.source_language == *language {
                    Err(ProviderError::ApiError {
                        status_code: 400,
                        message: format!("Simulated bad source language {}", language),
                    })
                } else {
                    Ok(self.respond(&request))
                }
            }

            MockBehavior::PanicOn { marker } => {
                if request.text.contains(marker.as_str()) {
                    panic!("Simulated provider crash on '{}'", marker);
                }
                Ok(self.respond(&request))
            }

            MockBehavior::Empty => Ok(TranslationResponse {
                text: String::new(),
                detected_language: None,
            }),
        }
    }
}
