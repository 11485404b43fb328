//! Chat history export.
//!
//! The plain-text transcript has one block per turn,
//! `You: {question}\nBot: {answer}\nCitation: {citation}`, with blocks joined
//! by a blank line and no trailing newline. Unanswered turns export with an
//! empty answer and citation.

use crate::error::PdfChatError;
use crate::session::ChatTurn;
use std::io::Write;
use std::path::Path;
use tracing::info;

/// File name offered for a transcript download.
pub const DEFAULT_EXPORT_FILE: &str = "chat_history.txt";

/// Render the plain-text transcript.
pub fn transcript(history: &[ChatTurn]) -> String {
    history
        .iter()
        .map(|turn| {
            format!(
                "You: {}\nBot: {}\nCitation: {}",
                turn.question(),
                turn.answer(),
                turn.citation_label()
            )
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Render the history as pretty-printed JSON.
pub fn transcript_json(history: &[ChatTurn]) -> Result<String, PdfChatError> {
    serde_json::to_string_pretty(history)
        .map_err(|e| PdfChatError::Internal(format!("Failed to serialise chat history: {e}")))
}

/// Write `contents` to `path` atomically.
///
/// Writes to a temp file in the destination directory, then persists it over
/// `path`, so a crash never leaves a half-written transcript behind.
pub fn write_atomic(path: &Path, contents: &str) -> Result<(), PdfChatError> {
    let write_err = |source: std::io::Error| PdfChatError::OutputWriteFailed {
        path: path.to_path_buf(),
        source,
    };

    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(parent).map_err(write_err)?;

    let mut tmp = tempfile::NamedTempFile::new_in(parent).map_err(write_err)?;
    tmp.write_all(contents.as_bytes()).map_err(write_err)?;
    tmp.persist(path).map_err(|e| write_err(e.error))?;

    info!("Wrote {} bytes to {}", contents.len(), path.display());
    Ok(())
}

/// Export the plain-text transcript of `history` to `path`.
pub fn export_to_file(history: &[ChatTurn], path: &Path) -> Result<(), PdfChatError> {
    write_atomic(path, &transcript(history))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::citation::Citation;

    fn sample() -> Vec<ChatTurn> {
        vec![
            ChatTurn::answered("Q1", "A1", Citation::Page(1)),
            ChatTurn::answered("Q2", "A2", Citation::NotFound),
        ]
    }

    #[test]
    fn transcript_format() {
        assert_eq!(
            transcript(&sample()),
            "You: Q1\nBot: A1\nCitation: Page 1\n\nYou: Q2\nBot: A2\nCitation: Page not found"
        );
    }

    #[test]
    fn pending_turn_exports_empty_fields() {
        let history = vec![ChatTurn::pending("Q")];
        assert_eq!(transcript(&history), "You: Q\nBot: \nCitation: ");
    }

    #[test]
    fn empty_history_is_empty_text() {
        assert_eq!(transcript(&[]), "");
    }

    #[test]
    fn json_contains_questions() {
        let json = transcript_json(&sample()).unwrap();
        assert!(json.contains("\"Q1\""));
        assert!(json.contains("NotFound"));
    }

    #[test]
    fn export_writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join(DEFAULT_EXPORT_FILE);
        export_to_file(&sample(), &path).unwrap();
        let written = std::fs::read_to_string(&path).unwrap();
        assert_eq!(written, transcript(&sample()));
    }

    #[test]
    fn export_overwrites_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(DEFAULT_EXPORT_FILE);
        std::fs::write(&path, "old contents that are longer than the new ones").unwrap();
        export_to_file(&[ChatTurn::pending("Q")], &path).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "You: Q\nBot: \nCitation: ");
    }
}
