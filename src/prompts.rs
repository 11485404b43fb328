//! Prompt construction for document question answering.
//!
//! The whole document text and the user's question travel to the model as a
//! single prompt string. There is no truncation and no length budget: if the
//! prompt exceeds the model's context window, the backend decides what to do
//! (usually silent truncation or an error), and this module does not detect it.

use crate::error::PdfChatError;

/// Label that introduces the document text in the prompt.
pub const CONTENT_LABEL: &str = "PDF Content:";

/// Label that introduces the question in the prompt.
pub const QUESTION_LABEL: &str = "Question: ";

/// Build the model input for `question` over `document_text`.
///
/// Layout: `PDF Content:\n{document_text}\n\nQuestion: {question}`.
///
/// The question is passed through verbatim; it is only checked for being
/// non-blank.
pub fn build_prompt(document_text: &str, question: &str) -> Result<String, PdfChatError> {
    if question.trim().is_empty() {
        return Err(PdfChatError::EmptyQuestion);
    }
    Ok(format!(
        "{CONTENT_LABEL}\n{document_text}\n\n{QUESTION_LABEL}{question}"
    ))
}
