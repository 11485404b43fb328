//! Input resolution: turn a user-supplied path or URL into a named payload.
//!
//! pdfium can open a PDF straight from a byte slice, so both local files and
//! downloads are read fully into memory. The `%PDF` magic is checked here so
//! a wrong file type gets a meaningful error instead of a pdfium failure.

use crate::error::PdfChatError;
use std::io::ErrorKind;
use std::path::Path;
use tracing::{debug, info};

/// Leading bytes of every PDF file.
const PDF_MAGIC: &[u8] = b"%PDF";

/// A document payload ready for extraction.
#[derive(Debug, Clone)]
pub struct ResolvedInput {
    /// Name the document is stored under in the session.
    pub name: String,
    /// Raw PDF bytes.
    pub bytes: Vec<u8>,
}

/// Check if the input string looks like a URL.
pub fn is_url(input: &str) -> bool {
    input.starts_with("http://") || input.starts_with("https://")
}

/// Resolve the input string to a named PDF payload.
///
/// URLs are downloaded; anything else is read as a local path.
pub async fn resolve_input(input: &str, timeout_secs: u64) -> Result<ResolvedInput, PdfChatError> {
    let resolved = if is_url(input) {
        download_url(input, timeout_secs).await?
    } else {
        read_local(Path::new(input)).await?
    };
    check_magic(&resolved.name, &resolved.bytes)?;
    Ok(resolved)
}

/// Reject payloads that do not start with `%PDF`.
pub fn check_magic(name: &str, bytes: &[u8]) -> Result<(), PdfChatError> {
    if bytes.starts_with(PDF_MAGIC) {
        Ok(())
    } else {
        Err(PdfChatError::NotAPdf {
            name: name.to_string(),
            magic: bytes.iter().take(PDF_MAGIC.len()).copied().collect(),
        })
    }
}

async fn read_local(path: &Path) -> Result<ResolvedInput, PdfChatError> {
    let bytes = tokio::fs::read(path).await.map_err(|e| match e.kind() {
        ErrorKind::PermissionDenied => PdfChatError::PermissionDenied {
            path: path.to_path_buf(),
        },
        _ => PdfChatError::FileNotFound {
            path: path.to_path_buf(),
        },
    })?;

    debug!("Read local PDF: {} ({} bytes)", path.display(), bytes.len());
    Ok(ResolvedInput {
        name: local_name(path),
        bytes,
    })
}

/// Download a URL into memory.
async fn download_url(url: &str, timeout_secs: u64) -> Result<ResolvedInput, PdfChatError> {
    info!("Downloading PDF from: {}", url);

    let client = reqwest::Client::builder()
        .timeout(std::time::Duration::from_secs(timeout_secs))
        .build()
        .map_err(|e| PdfChatError::DownloadFailed {
            url: url.to_string(),
            reason: e.to_string(),
        })?;

    let response = client.get(url).send().await.map_err(|e| {
        if e.is_timeout() {
            PdfChatError::DownloadTimeout {
                url: url.to_string(),
                secs: timeout_secs,
            }
        } else {
            PdfChatError::DownloadFailed {
                url: url.to_string(),
                reason: e.to_string(),
            }
        }
    })?;

    if !response.status().is_success() {
        return Err(PdfChatError::DownloadFailed {
            url: url.to_string(),
            reason: format!("HTTP {}", response.status()),
        });
    }

    let bytes = response
        .bytes()
        .await
        .map_err(|e| PdfChatError::DownloadFailed {
            url: url.to_string(),
            reason: e.to_string(),
        })?;

    info!("Downloaded {} bytes", bytes.len());

    Ok(ResolvedInput {
        name: url_name(url),
        bytes: bytes.to_vec(),
    })
}

/// File name of a local path, falling back to the path as given.
fn local_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Last non-empty path segment of a URL, or `downloaded.pdf`.
fn url_name(url: &str) -> String {
    if let Ok(parsed) = reqwest::Url::parse(url) {
        if let Some(mut segments) = parsed.path_segments() {
            if let Some(last) = segments.next_back() {
                if !last.is_empty() {
                    return last.to_string();
                }
            }
        }
    }

    "downloaded.pdf".to_string()
}
