/*!
 * Translation attempt engine.
 *
 * Turns one unreliable provider call into a best-effort result by running an
 * ordered cascade of stages:
 *
 * 1. `Direct` - the declared source language, retried with linear backoff
 * 2. `SourceFallback` - the same retry loop with the fallback source language
 * 3. `Split` - translate the two sentence halves independently and rejoin them
 *
 * Provider errors never escape the engine; the caller receives an
 * [`AttemptResult`] and decides what to store on failure.
 */

use futures::future::{BoxFuture, FutureExt};
use log::{debug, warn};
use std::time::Duration;

use crate::app_config::Config;
use crate::language_utils::language_codes_match;
use crate::providers::{Provider, TranslationRequest};

use super::sentences::split_in_halves;

/// Outcome of translating one text unit
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttemptResult {
    /// Non-empty translated text
    Translated(String),
    /// Every stage failed
    Failed,
}

impl AttemptResult {
    pub fn is_translated(&self) -> bool {
        matches!(self, AttemptResult::Translated(_))
    }
}

/// One strategy of the fallback cascade
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Direct,
    SourceFallback,
    Split,
}

/// Tunables for the attempt engine
#[derive(Debug, Clone)]
pub struct EngineOptions {
    /// Target language code
    pub target_language: String,
    /// Source language used by the fallback stage
    pub fallback_source_language: String,
    /// Attempts per stage
    pub max_retries: u32,
    /// Delay unit; attempt `n` is followed by `n * retry_backoff`
    pub retry_backoff: Duration,
    /// Maximum nesting of the split stage
    pub max_split_depth: u32,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

impl EngineOptions {
    pub fn from_config(config: &Config) -> Self {
        Self {
            target_language: config.target_language.clone(),
            fallback_source_language: config.translation.fallback_source_language.clone(),
            max_retries: config.translation.max_retries,
            retry_backoff: Duration::from_millis(config.translation.retry_backoff_ms),
            max_split_depth: config.translation.max_split_depth,
        }
    }
}

/// Resilient translation of single texts against one provider
pub struct AttemptEngine<'a, P: Provider + ?Sized> {
    provider: &'a P,
    options: &'a EngineOptions,
}

impl<'a, P: Provider + ?Sized> AttemptEngine<'a, P> {
    pub fn new(provider: &'a P, options: &'a EngineOptions) -> Self {
        Self { provider, options }
    }

    /// Translate `text` from `source_language` into the target language
    pub async fn translate(&self, text: &str, source_language: &str) -> AttemptResult {
        self.translate_at_depth(text, source_language, 0).await
    }

    /// Stages tried for a text at the given split depth, in order
    pub fn stages(&self, source_language: &str, depth: u32) -> Vec<Stage> {
        let mut stages = vec![Stage::Direct];
        if !language_codes_match(source_language, &self.options.fallback_source_language) {
            stages.push(Stage::SourceFallback);
        }
        if depth < self.options.max_split_depth {
            stages.push(Stage::Split);
        }
        stages
    }

    fn translate_at_depth<'b>(
        &'b self,
        text: &'b str,
        source_language: &'b str,
        depth: u32,
    ) -> BoxFuture<'b, AttemptResult> {
        async move {
            for stage in self.stages(source_language, depth) {
                let result = match stage {
                    Stage::Direct => self.attempt_with_retries(text, source_language).await,
                    Stage::SourceFallback => {
                        self.attempt_with_retries(text, &self.options.fallback_source_language)
                            .await
                    }
                    Stage::Split => self.split_and_translate(text, source_language, depth).await,
                };

                if result.is_translated() {
                    return result;
                }
                debug!("Stage {:?} failed at depth {}", stage, depth);
            }
            AttemptResult::Failed
        }
        .boxed()
    }

    async fn attempt_with_retries(&self, text: &str, source_language: &str) -> AttemptResult {
        let max_retries = self.options.max_retries;

        for attempt in 1..=max_retries {
            let request = TranslationRequest::new(
                text,
                source_language,
                self.options.target_language.as_str(),
            );

            match self.provider.translate(request).await {
                Ok(response) if !response.text.trim().is_empty() => {
                    return AttemptResult::Translated(response.text);
                }
                Ok(_) => {
                    warn!("Empty translation with src={} (attempt {})", source_language, attempt);
                }
                Err(e) => {
                    warn!("Error translating with src={} (attempt {}): {}", source_language, attempt, e);
                }
            }

            if attempt < max_retries && !self.options.retry_backoff.is_zero() {
                tokio::time::sleep(self.options.retry_backoff * attempt).await;
            }
        }

        AttemptResult::Failed
    }

    async fn split_and_translate(&self, text: &str, source_language: &str, depth: u32) -> AttemptResult {
        let Some((first, second)) = split_in_halves(text) else {
            warn!("Could not split into two sentences, keeping original text");
            return AttemptResult::Failed;
        };
        debug!("Attempting sentence split and translation at depth {}", depth);

        let first_result = self.translate_at_depth(&first, source_language, depth + 1).await;
        let second_result = self.translate_at_depth(&second, source_language, depth + 1).await;

        match (first_result, second_result) {
            (AttemptResult::Translated(a), AttemptResult::Translated(b)) => {
                AttemptResult::Translated(format!("{} {}", a, b))
            }
            (AttemptResult::Translated(a), AttemptResult::Failed) => {
                AttemptResult::Translated(format!("{} {}", a, second))
            }
            (AttemptResult::Failed, AttemptResult::Translated(b)) => {
                AttemptResult::Translated(format!("{} {}", first, b))
            }
            (AttemptResult::Failed, AttemptResult::Failed) => {
                let preview: String = text.chars().take(150).collect();
                warn!("Split translation failed: {}...", preview);
                AttemptResult::Failed
            }
        }
    }
}
