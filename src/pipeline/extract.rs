//! Text extraction: PDF payload → ordered pages of plain text via pdfium.
//!
//! pdfium is bound once, when the [`Extractor`] is created, and shared by
//! every clone of it for the rest of the session. All calls are blocking;
//! [`crate::load_document`] moves extraction onto tokio's blocking pool with
//! `spawn_blocking` so the runtime's worker threads stay free.
//!
//! Fidelity depends entirely on the document: scanned or image-only pages
//! come back empty, and unusual font encodings may come back garbled. No
//! attempt is made to repair either.

use crate::config::ChatConfig;
use crate::document::Document;
use crate::error::PdfChatError;
use crate::pipeline::input::ResolvedInput;
use pdfium_render::prelude::*;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info};

/// A bound pdfium instance that extracts page text. Cheap to clone.
#[derive(Clone)]
pub struct Extractor {
    pdfium: Arc<Pdfium>,
}

impl std::fmt::Debug for Extractor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Extractor").finish_non_exhaustive()
    }
}

impl Extractor {
    /// Bind to the library named by [`ChatConfig::pdfium_lib_path`], or the
    /// system library when it is unset.
    pub fn from_config(config: &ChatConfig) -> Result<Self, PdfChatError> {
        Self::bind(config.pdfium_lib_path.as_deref())
    }

    /// Bind to libpdfium.
    ///
    /// `lib_path` may name the library file itself or the directory holding
    /// it. With `None`, the system library search path is used.
    pub fn bind(lib_path: Option<&Path>) -> Result<Self, PdfChatError> {
        let bindings = match lib_path {
            Some(path) if path.is_dir() => {
                Pdfium::bind_to_library(Pdfium::pdfium_platform_library_name_at_path(path))
            }
            Some(path) => Pdfium::bind_to_library(path),
            None => Pdfium::bind_to_system_library(),
        }
        .map_err(|e| PdfChatError::PdfiumBindingFailed(format!("{e:?}")))?;

        debug!("pdfium bound (lib_path={:?})", lib_path);
        Ok(Self {
            pdfium: Arc::new(Pdfium::new(bindings)),
        })
    }

    /// Extract every page of `input` into a [`Document`] named after it.
    ///
    /// Any load or per-page failure aborts the whole extraction.
    pub fn extract(
        &self,
        input: &ResolvedInput,
        password: Option<&str>,
    ) -> Result<Document, PdfChatError> {
        let name = input.name.as_str();
        let document = self
            .pdfium
            .load_pdf_from_byte_slice(&input.bytes, password)
            .map_err(|e| classify_load_error(name, password, &e))?;

        let pages = document.pages();
        info!("PDF '{}' loaded: {} pages", name, pages.len());

        let mut texts = Vec::with_capacity(pages.len() as usize);
        for (idx, page) in pages.iter().enumerate() {
            let text = page
                .text()
                .map_err(|e| PdfChatError::ExtractionFailed {
                    page: idx + 1,
                    detail: format!("{e:?}"),
                })?
                .all();
            debug!("Extracted page {} → {} chars", idx + 1, text.chars().count());
            texts.push(text);
        }

        Ok(Document::from_page_texts(name, texts))
    }
}

/// Map a pdfium load failure onto the password / corrupt variants.
fn classify_load_error(name: &str, password: Option<&str>, err: &PdfiumError) -> PdfChatError {
    let detail = format!("{err:?}");
    if detail.contains("Password") || detail.contains("password") {
        if password.is_some() {
            PdfChatError::WrongPassword {
                name: name.to_string(),
            }
        } else {
            PdfChatError::PasswordRequired {
                name: name.to_string(),
            }
        }
    } else {
        PdfChatError::CorruptPdf {
            name: name.to_string(),
            detail,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bind_to_missing_library_fails_cleanly() {
        let err = Extractor::bind(Some(Path::new("/definitely/not/libpdfium.so"))).unwrap_err();
        assert!(matches!(err, PdfChatError::PdfiumBindingFailed(_)));
    }

    #[test]
    fn from_config_binds_the_configured_library() {
        let config = ChatConfig::builder()
            .pdfium_lib_path("/definitely/not/libpdfium.so")
            .build()
            .unwrap();
        let err = Extractor::from_config(&config).unwrap_err();
        assert!(matches!(err, PdfChatError::PdfiumBindingFailed(_)));
    }
}
