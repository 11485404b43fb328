//! Model backend: send one prompt, get one answer back.
//!
//! [`AnswerBackend`] is the seam between the session and whatever produces
//! answers. The production implementation, [`LlmBackend`], wraps an
//! `edgequake_llm` provider; tests substitute an in-process script.
//!
//! The call is a single awaited round-trip: no retry, no timeout, no
//! streaming. Any transport, model or response error comes back as
//! [`PdfChatError::LlmApiError`].

use crate::config::{ChatConfig, DEFAULT_PROVIDER};
use crate::error::PdfChatError;
use edgequake_llm::{ChatMessage, CompletionOptions, LLMProvider, ProviderFactory};
use std::future::Future;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info};

/// Anything that can turn a prompt into answer text.
pub trait AnswerBackend: Send + Sync {
    /// Generate an answer for `prompt`.
    ///
    /// # Errors
    ///
    /// Returns [`PdfChatError::LlmApiError`] when the backend cannot produce
    /// an answer.
    fn generate(&self, prompt: &str) -> impl Future<Output = Result<String, PdfChatError>> + Send;

    /// Identifier of the model answering, for display.
    fn model(&self) -> &str;
}

/// [`AnswerBackend`] backed by an `edgequake_llm` provider.
pub struct LlmBackend {
    provider: Arc<dyn LLMProvider>,
    model: String,
    options: CompletionOptions,
    system_prompt: Option<String>,
}

impl std::fmt::Debug for LlmBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LlmBackend")
            .field("provider", &"<dyn LLMProvider>")
            .field("model", &self.model)
            .finish_non_exhaustive()
    }
}

impl LlmBackend {
    /// Resolve the provider described by `config` and wrap it.
    pub fn from_config(config: &ChatConfig) -> Result<Self, PdfChatError> {
        let (provider, model) = resolve_provider(config)?;
        Ok(Self::new(provider, model, config))
    }

    /// Wrap an already-built provider.
    pub fn new(provider: Arc<dyn LLMProvider>, model: impl Into<String>, config: &ChatConfig) -> Self {
        Self {
            provider,
            model: model.into(),
            options: build_options(config),
            system_prompt: config.system_prompt.clone(),
        }
    }
}

impl AnswerBackend for LlmBackend {
    async fn generate(&self, prompt: &str) -> Result<String, PdfChatError> {
        let start = Instant::now();

        let mut messages = Vec::with_capacity(2);
        if let Some(system) = self.system_prompt.as_deref() {
            messages.push(ChatMessage::system(system));
        }
        messages.push(ChatMessage::user(prompt));

        let response = self
            .provider
            .chat(&messages, Some(&self.options))
            .await
            .map_err(|e| PdfChatError::LlmApiError {
                message: e.to_string(),
            })?;

        debug!(
            "{}: {} input tokens, {} output tokens, {:?}",
            self.model,
            response.prompt_tokens,
            response.completion_tokens,
            start.elapsed()
        );

        Ok(response.content)
    }

    fn model(&self) -> &str {
        &self.model
    }
}

/// Build `CompletionOptions` from the chat config.
fn build_options(config: &ChatConfig) -> CompletionOptions {
    CompletionOptions {
        temperature: config.temperature,
        max_tokens: config.max_tokens,
        ..Default::default()
    }
}

/// Resolve the LLM provider, from most-specific to least-specific.
///
/// 1. **Pre-built provider** (`config.provider`), used as-is.
/// 2. **Named provider** (`config.provider_name`) with the configured model.
/// 3. **Environment pair** `EDGEQUAKE_LLM_PROVIDER` + `EDGEQUAKE_MODEL`, when
///    no model was configured explicitly.
/// 4. **Default** [`DEFAULT_PROVIDER`] with the configured or default model.
fn resolve_provider(config: &ChatConfig) -> Result<(Arc<dyn LLMProvider>, String), PdfChatError> {
    let model = config.effective_model().to_string();

    if let Some(ref provider) = config.provider {
        return Ok((Arc::clone(provider), model));
    }

    if let Some(ref name) = config.provider_name {
        return create_provider(name, &model).map(|p| (p, model));
    }

    if config.model.is_none() {
        if let (Ok(prov), Ok(env_model)) = (
            std::env::var("EDGEQUAKE_LLM_PROVIDER"),
            std::env::var("EDGEQUAKE_MODEL"),
        ) {
            if !prov.is_empty() && !env_model.is_empty() {
                return create_provider(&prov, &env_model).map(|p| (p, env_model));
            }
        }
    }

    create_provider(DEFAULT_PROVIDER, &model).map(|p| (p, model))
}

fn create_provider(provider_name: &str, model: &str) -> Result<Arc<dyn LLMProvider>, PdfChatError> {
    info!("Using provider '{}' with model '{}'", provider_name, model);
    ProviderFactory::create_llm_provider(provider_name, model).map_err(|e| {
        PdfChatError::ProviderNotConfigured {
            provider: provider_name.to_string(),
            hint: format!("{e}"),
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn build_options_defaults() {
        let config = ChatConfig::default();
        let opts = build_options(&config);
        assert_eq!(opts.temperature, None);
        assert_eq!(opts.max_tokens, None);
    }

    #[test]
    fn build_options_carries_overrides() {
        let config = ChatConfig::builder()
            .temperature(0.2)
            .max_tokens(512)
            .build()
            .unwrap();
        let opts = build_options(&config);
        assert_eq!(opts.temperature, Some(0.2));
        assert_eq!(opts.max_tokens, Some(512));
    }
}
