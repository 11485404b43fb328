//! Error types for the edgequake-pdfchat library.
//!
//! A single enum, [`PdfChatError`], covers every failure the library can
//! report. Variants are grouped by the stage that raises them:
//!
//! * **Input / PDF**: ingestion failed; the document is not added to the
//!   session.
//! * **LLM**: the backend call failed; the pending chat turn stays in the
//!   history with an empty answer and citation.
//! * **Session**: the caller asked for something the session cannot do in
//!   its current state (no document loaded, unknown name, empty question).
//!
//! The binary turns all of these into one short user-visible message, so the
//! messages here carry the actionable hint rather than the caller.

use std::path::PathBuf;
use thiserror::Error;

/// All errors returned by the edgequake-pdfchat library.
#[derive(Debug, Error)]
pub enum PdfChatError {
    // ── Input errors ──────────────────────────────────────────────────────
    /// Input file was not found at the given path.
    #[error("PDF file not found: '{path}'\nCheck the path exists and is readable.")]
    FileNotFound { path: PathBuf },

    /// Process does not have read permission on the file.
    #[error("Permission denied reading '{path}'\nTry: chmod +r {path:?}")]
    PermissionDenied { path: PathBuf },

    /// HTTP URL was syntactically valid but download failed.
    #[error("Failed to download '{url}': {reason}\nCheck your internet connection.")]
    DownloadFailed { url: String, reason: String },

    /// Download exceeded the configured timeout.
    #[error("Download timed out after {secs}s for '{url}'\nIncrease --download-timeout.")]
    DownloadTimeout { url: String, secs: u64 },

    /// The payload was read, but it is not a PDF.
    #[error("'{name}' is not a valid PDF\nFirst bytes: {magic:?}")]
    NotAPdf { name: String, magic: Vec<u8> },

    // ── PDF errors ────────────────────────────────────────────────────────
    /// PDF header/trailer/xref is corrupt and cannot be parsed.
    #[error("PDF '{name}' is corrupt: {detail}")]
    CorruptPdf { name: String, detail: String },

    /// PDF requires a password but none was provided.
    #[error("PDF '{name}' is encrypted and requires a password.\nProvide it with --password <PASSWORD>.")]
    PasswordRequired { name: String },

    /// A password was provided but it is wrong.
    #[error("Wrong password for PDF '{name}'")]
    WrongPassword { name: String },

    /// pdfium failed on a single page while extracting its text.
    #[error("Text extraction failed for page {page}: {detail}")]
    ExtractionFailed { page: usize, detail: String },

    // ── LLM errors ────────────────────────────────────────────────────────
    /// The configured provider could not be created (missing API key etc.).
    #[error("LLM provider '{provider}' is not configured.\n{hint}")]
    ProviderNotConfigured { provider: String, hint: String },

    /// The backend call failed (transport, model or malformed response).
    #[error("LLM API error: {message}")]
    LlmApiError { message: String },

    // ── Session errors ────────────────────────────────────────────────────
    /// A question was asked before any document was loaded.
    #[error("No document loaded.\nLoad a PDF first with /load <path-or-url>.")]
    NoDocument,

    /// `select` named a document that is not in the session.
    #[error("Unknown document '{name}'")]
    UnknownDocument { name: String },

    /// The question was empty or whitespace only.
    #[error("Question must not be empty")]
    EmptyQuestion,

    /// A chat turn received a second answer.
    #[error("Chat turn for '{question}' was already answered")]
    TurnAlreadyAnswered { question: String },

    /// Feedback was given while the chat history is empty.
    #[error("There is no response to rate yet")]
    NothingToRate,

    // ── I/O errors ────────────────────────────────────────────────────────
    /// Could not create or write the exported transcript.
    #[error("Failed to write output file '{path}': {source}")]
    OutputWriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Pdfium binding errors ─────────────────────────────────────────────
    /// Could not bind to a pdfium library.
    #[error(
        "Failed to bind to pdfium library: {0}\n\n\
Install libpdfium for your platform, or set PDFIUM_LIB_PATH to the\n\
directory (or file) containing it.\n"
    )]
    PdfiumBindingFailed(String),

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl PdfChatError {
    /// `true` for failures raised while loading a document.
    pub fn is_ingestion(&self) -> bool {
        matches!(
            self,
            PdfChatError::FileNotFound { .. }
                | PdfChatError::PermissionDenied { .. }
                | PdfChatError::DownloadFailed { .. }
                | PdfChatError::DownloadTimeout { .. }
                | PdfChatError::NotAPdf { .. }
                | PdfChatError::CorruptPdf { .. }
                | PdfChatError::PasswordRequired { .. }
                | PdfChatError::WrongPassword { .. }
                | PdfChatError::ExtractionFailed { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_document_display_has_hint() {
        let msg = PdfChatError::NoDocument.to_string();
        assert!(msg.contains("/load"), "got: {msg}");
    }

    #[test]
    fn not_a_pdf_display() {
        let e = PdfChatError::NotAPdf {
            name: "notes.txt".into(),
            magic: b"hell".to_vec(),
        };
        assert!(e.to_string().contains("notes.txt"));
    }

    #[test]
    fn llm_error_display() {
        let e = PdfChatError::LlmApiError {
            message: "connection refused".into(),
        };
        assert!(e.to_string().contains("connection refused"));
    }

    #[test]
    fn ingestion_classification() {
        assert!(PdfChatError::CorruptPdf {
            name: "a.pdf".into(),
            detail: "xref".into()
        }
        .is_ingestion());
        assert!(!PdfChatError::NoDocument.is_ingestion());
        assert!(!PdfChatError::LlmApiError {
            message: "x".into()
        }
        .is_ingestion());
    }
}
