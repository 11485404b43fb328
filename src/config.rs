//! Configuration types for a chat session.
//!
//! Every knob lives in [`ChatConfig`], built via [`ChatConfigBuilder`]. The
//! binary maps its command-line flags onto the builder; library callers set
//! only what they care about and rely on the defaults for the rest.

use crate::error::PdfChatError;
use edgequake_llm::LLMProvider;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

/// Provider used when nothing else is configured.
pub const DEFAULT_PROVIDER: &str = "ollama";

/// Model used when nothing else is configured.
pub const DEFAULT_MODEL: &str = "llama3.2:latest";

/// Configuration for a question-answering session.
///
/// # Example
/// ```rust
/// use edgequake_pdfchat::{ChatConfig, CitationStrategy};
///
/// let config = ChatConfig::builder()
///     .model("llama3.2:latest")
///     .citation_strategy(CitationStrategy::Legacy)
///     .build()
///     .unwrap();
/// ```
#[derive(Clone)]
pub struct ChatConfig {
    /// LLM model identifier. If None, uses [`DEFAULT_MODEL`].
    pub model: Option<String>,

    /// LLM provider name (e.g. "ollama", "openai", "anthropic").
    /// If None, falls back to `EDGEQUAKE_LLM_PROVIDER` then [`DEFAULT_PROVIDER`].
    pub provider_name: Option<String>,

    /// Pre-constructed LLM provider. Takes precedence over `provider_name`.
    pub provider: Option<Arc<dyn LLMProvider>>,

    /// Sampling temperature. None leaves the provider default in place.
    pub temperature: Option<f32>,

    /// Maximum tokens generated per answer. None leaves the provider default.
    pub max_tokens: Option<usize>,

    /// Optional system message sent ahead of the prompt.
    pub system_prompt: Option<String>,

    /// How answers are mapped back to a page. Default: [`CitationStrategy::PageHeader`].
    pub citation_strategy: CitationStrategy,

    /// PDF user password for encrypted documents.
    pub password: Option<String>,

    /// Directory or file holding libpdfium. None uses the system library path.
    pub pdfium_lib_path: Option<PathBuf>,

    /// Download timeout for URL inputs in seconds. Default: 120.
    pub download_timeout_secs: u64,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            model: None,
            provider_name: None,
            provider: None,
            temperature: None,
            max_tokens: None,
            system_prompt: None,
            citation_strategy: CitationStrategy::default(),
            password: None,
            pdfium_lib_path: None,
            download_timeout_secs: 120,
        }
    }
}

impl fmt::Debug for ChatConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChatConfig")
            .field("model", &self.model)
            .field("provider_name", &self.provider_name)
            .field("provider", &self.provider.as_ref().map(|_| "<dyn LLMProvider>"))
            .field("temperature", &self.temperature)
            .field("max_tokens", &self.max_tokens)
            .field("citation_strategy", &self.citation_strategy)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .field("pdfium_lib_path", &self.pdfium_lib_path)
            .field("download_timeout_secs", &self.download_timeout_secs)
            .finish()
    }
}

impl ChatConfig {
    /// Create a new builder for `ChatConfig`.
    pub fn builder() -> ChatConfigBuilder {
        ChatConfigBuilder {
            config: Self::default(),
        }
    }

    /// The model that will be requested from the backend.
    pub fn effective_model(&self) -> &str {
        self.model.as_deref().unwrap_or(DEFAULT_MODEL)
    }
}

/// Builder for [`ChatConfig`].
#[derive(Debug)]
pub struct ChatConfigBuilder {
    config: ChatConfig,
}

impl ChatConfigBuilder {
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.config.model = Some(model.into());
        self
    }

    pub fn provider_name(mut self, name: impl Into<String>) -> Self {
        self.config.provider_name = Some(name.into());
        self
    }

    pub fn provider(mut self, provider: Arc<dyn LLMProvider>) -> Self {
        self.config.provider = Some(provider);
        self
    }

    pub fn temperature(mut self, t: f32) -> Self {
        self.config.temperature = Some(t.clamp(0.0, 2.0));
        self
    }

    pub fn max_tokens(mut self, n: usize) -> Self {
        self.config.max_tokens = Some(n);
        self
    }

    pub fn system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.config.system_prompt = Some(prompt.into());
        self
    }

    pub fn citation_strategy(mut self, strategy: CitationStrategy) -> Self {
        self.config.citation_strategy = strategy;
        self
    }

    pub fn password(mut self, pwd: impl Into<String>) -> Self {
        self.config.password = Some(pwd.into());
        self
    }

    pub fn pdfium_lib_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.pdfium_lib_path = Some(path.into());
        self
    }

    pub fn download_timeout_secs(mut self, secs: u64) -> Self {
        self.config.download_timeout_secs = secs;
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<ChatConfig, PdfChatError> {
        let c = &self.config;
        if c.download_timeout_secs == 0 {
            return Err(PdfChatError::InvalidConfig(
                "Download timeout must be ≥ 1 second".into(),
            ));
        }
        if c.max_tokens == Some(0) {
            return Err(PdfChatError::InvalidConfig(
                "Max tokens must be ≥ 1".into(),
            ));
        }
        if c.model.as_deref().is_some_and(|m| m.trim().is_empty()) {
            return Err(PdfChatError::InvalidConfig("Model must not be empty".into()));
        }
        Ok(self.config)
    }
}

// ── Enums ────────────────────────────────────────────────────────────────

/// How the citation locator maps an answer back to a page.
///
/// Both strategies are the same first-substring-match heuristic: the whole
/// answer, lower-cased, must appear verbatim in one page's lower-cased text.
/// They differ only in how the page label is derived.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CitationStrategy {
    /// Read page numbers from the `Page N:` header lines. (default)
    #[default]
    PageHeader,
    /// Split on the literal `Page ` token and label chunks by position.
    ///
    /// The split yields an empty leading chunk, so every label is one higher
    /// than the true page number, and an empty answer reports `Page 1`.
    Legacy,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let c = ChatConfig::default();
        assert_eq!(c.effective_model(), DEFAULT_MODEL);
        assert_eq!(c.citation_strategy, CitationStrategy::PageHeader);
        assert_eq!(c.download_timeout_secs, 120);
        assert!(c.provider.is_none());
    }

    #[test]
    fn builder_clamps_temperature() {
        let c = ChatConfig::builder().temperature(9.0).build().unwrap();
        assert_eq!(c.temperature, Some(2.0));
    }

    #[test]
    fn builder_rejects_zero_timeout() {
        let err = ChatConfig::builder().download_timeout_secs(0).build();
        assert!(matches!(err, Err(PdfChatError::InvalidConfig(_))));
    }

    #[test]
    fn builder_rejects_blank_model() {
        let err = ChatConfig::builder().model("  ").build();
        assert!(matches!(err, Err(PdfChatError::InvalidConfig(_))));
    }

    #[test]
    fn debug_redacts_password() {
        let c = ChatConfig::builder().password("hunter2").build().unwrap();
        let dbg = format!("{c:?}");
        assert!(!dbg.contains("hunter2"));
        assert!(dbg.contains("<redacted>"));
    }
}
