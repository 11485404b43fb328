//! Document ingestion entry points.
//!
//! Ingestion is resolve → validate → extract. It either produces a complete
//! [`Document`] or fails; there is no retry and no partial result.

use crate::config::ChatConfig;
use crate::document::Document;
use crate::error::PdfChatError;
use crate::pipeline::extract::Extractor;
use crate::pipeline::input::{self, ResolvedInput};
use crate::session::Session;
use std::time::Instant;
use tracing::info;

/// Load a PDF from a local path or HTTP/HTTPS URL.
///
/// pdfium calls block until the whole document has been read, so extraction
/// runs inside `spawn_blocking`.
pub async fn load_document(
    input_str: impl AsRef<str>,
    extractor: &Extractor,
    config: &ChatConfig,
) -> Result<Document, PdfChatError> {
    let input_str = input_str.as_ref();
    let start = Instant::now();
    info!("Loading document: {}", input_str);

    let resolved = input::resolve_input(input_str, config.download_timeout_secs).await?;
    let extractor = extractor.clone();
    let password = config.password.clone();
    let document = tokio::task::spawn_blocking(move || {
        extractor.extract(&resolved, password.as_deref())
    })
    .await
    .map_err(|e| PdfChatError::Internal(format!("Extraction task panicked: {e}")))??;

    info!(
        "Loaded '{}': {} pages, {} chars in {}ms",
        document.name(),
        document.page_count(),
        document.char_count(),
        start.elapsed().as_millis()
    );
    Ok(document)
}

/// Extract a PDF held in memory under the given name.
///
/// Blocking; call it from a blocking context.
pub fn load_document_from_bytes(
    name: impl Into<String>,
    bytes: Vec<u8>,
    extractor: &Extractor,
    config: &ChatConfig,
) -> Result<Document, PdfChatError> {
    let resolved = ResolvedInput {
        name: name.into(),
        bytes,
    };
    input::check_magic(&resolved.name, &resolved.bytes)?;
    extractor.extract(&resolved, config.password.as_deref())
}

/// Load a document and upload it into `session`, making it active.
///
/// On failure the session is left untouched.
pub async fn upload(
    session: &mut Session,
    input_str: impl AsRef<str>,
    extractor: &Extractor,
    config: &ChatConfig,
) -> Result<String, PdfChatError> {
    let document = load_document(input_str, extractor, config).await?;
    let name = document.name().to_string();
    session.upload(document);
    Ok(name)
}
