//! Pipeline stages for document question answering.
//!
//! ## Data Flow
//!
//! ```text
//! input ──▶ extract ──▶ (prompt) ──▶ llm ──▶ citation
//! (path/URL) (pdfium)    (template)   (model)  (page guess)
//! ```
//!
//! 1. [`input`]   : read a local file or download a URL; check the `%PDF` magic
//! 2. [`extract`] : pull each page's text out with pdfium
//! 3. [`llm`]     : send the prompt to the answer backend; the only stage with
//!    network I/O besides URL download
//! 4. [`citation`]: map the answer back to the page that contains it verbatim
//!
//! Prompt construction lives in [`crate::prompts`].

pub mod citation;
pub mod extract;
pub mod input;
pub mod llm;
