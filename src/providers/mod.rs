/*!
 * Provider implementations for the remote translation capability.
 *
 * This module contains client implementations for translation services:
 * - Google: the public Google web translation endpoint
 * - Mock: scripted provider used by tests
 */

use async_trait::async_trait;
use std::fmt::Debug;

use crate::errors::ProviderError;

/// A single text translation request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslationRequest {
    /// The text to translate
    pub text: String,
    /// Source language code
    pub source_language: String,
    /// Target language code
    pub target_language: String,
}

impl TranslationRequest {
    pub fn new(
        text: impl Into<String>,
        source_language: impl Into<String>,
        target_language: impl Into<String>,
    ) -> Self {
        Self {
            text: text.into(),
            source_language: source_language.into(),
            target_language: target_language.into(),
        }
    }
}

/// The translated text returned by a provider
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslationResponse {
    /// Translated text
    pub text: String,
    /// Language the service detected, when it reports one
    pub detected_language: Option<String>,
}

/// Common trait for all translation providers
///
/// A provider instance is owned by exactly one job; implementations are not
/// required to tolerate concurrent use from several jobs.
#[async_trait]
pub trait Provider: Send + Sync + Debug {
    /// Translate one piece of text
    ///
    /// # Arguments
    /// * `request` - The text and language pair
    ///
    /// # Returns
    /// * `Result<TranslationResponse, ProviderError>` - The response from the provider or an error
    async fn translate(&self, request: TranslationRequest) -> Result<TranslationResponse, ProviderError>;
}

pub mod google;
pub mod mock;
