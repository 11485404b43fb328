//! # edgequake-pdfchat
//!
//! Ask questions about a PDF and get answers from a language model, each with
//! a page citation guess.
//!
//! ## Pipeline Overview
//!
//! ```text
//! PDF
//!  │
//!  ├─ 1. Input     resolve local file or download from URL
//!  ├─ 2. Extract   per-page text via pdfium → "Page N:" blob
//!  ├─ 3. Prompt    "PDF Content:\n{blob}\n\nQuestion: {question}"
//!  ├─ 4. LLM       one blocking round-trip (ollama / llama3.2 by default)
//!  └─ 5. Cite      first page containing the whole answer verbatim
//! ```
//!
//! State lives in a caller-owned [`Session`]: loaded documents, the active
//! document and the ordered chat history. [`Session::ask`] borrows the
//! session mutably, so only one question can be in flight at a time.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use edgequake_pdfchat::{upload, ChatConfig, Extractor, LlmBackend, Session};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ChatConfig::default();
//!     let extractor = Extractor::from_config(&config)?;
//!     let backend = LlmBackend::from_config(&config)?;
//!
//!     let mut session = Session::new(config.citation_strategy);
//!     upload(&mut session, "report.pdf", &extractor, &config).await?;
//!
//!     let turn = session.ask(&backend, "How much did revenue grow?").await?;
//!     println!("{}\nCitation: {}", turn.answer(), turn.citation_label());
//!     Ok(())
//! }
//! ```
//!
//! ## Citations are a heuristic
//!
//! The locator only finds answers quoted verbatim from a single page. See
//! [`pipeline::citation`] for the failure modes and [`CitationStrategy`] for
//! the two labelling schemes.
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `pdfchat` binary (clap + anyhow + tracing-subscriber + indicatif) |

// ── Modules ──────────────────────────────────────────────────────────────

pub mod config;
pub mod document;
pub mod error;
pub mod export;
pub mod ingest;
pub mod pipeline;
pub mod prompts;
pub mod session;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{ChatConfig, ChatConfigBuilder, CitationStrategy, DEFAULT_MODEL, DEFAULT_PROVIDER};
pub use document::{Document, Page};
pub use error::PdfChatError;
pub use export::{export_to_file, transcript, transcript_json, DEFAULT_EXPORT_FILE};
pub use ingest::{load_document, load_document_from_bytes, upload};
pub use pipeline::citation::{locate as locate_citation, Citation, NOT_FOUND_LABEL};
pub use pipeline::extract::Extractor;
pub use pipeline::llm::{AnswerBackend, LlmBackend};
pub use prompts::build_prompt;
pub use session::{ChatTurn, Feedback, Reply, Session};
