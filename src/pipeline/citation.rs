//! Citation locator: guess which page an answer came from.
//!
//! This is a heuristic, not retrieval. The whole answer, lower-cased, must
//! appear as one contiguous substring of a single page's lower-cased text;
//! the first such page wins. There is no confidence score, no ranking and no
//! tolerance for partial matches.
//!
//! Known failure modes:
//!
//! - **False negative**: the model paraphrases, quotes only part of a
//!   sentence, or draws on more than one page. No page contains the answer
//!   verbatim and the locator reports [`Citation::NotFound`].
//! - **False positive**: a short answer (a single common word, a number)
//!   occurs incidentally on an earlier page, which is reported instead of the
//!   page the model actually used.
//!
//! Two strategies share that matching rule and differ only in labelling; see
//! [`CitationStrategy`]. `PageHeader` walks the document's pages directly, so
//! a line such as `Page 7:` inside the page text cannot pass for a header.

use crate::config::CitationStrategy;
use crate::document::{Document, Page};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Sentinel label reported when no page matches.
pub const NOT_FOUND_LABEL: &str = "Page not found";

/// Token the legacy strategy splits the blob on.
const LEGACY_SPLIT_TOKEN: &str = "Page ";

/// Result of a citation lookup. Never absent: either a page or the sentinel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Citation {
    /// Page label number (see [`CitationStrategy`] for what it counts).
    Page(usize),
    /// No page contained the answer.
    NotFound,
}

impl Citation {
    /// Human-readable label, e.g. `Page 2` or `Page not found`.
    pub fn label(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Citation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Citation::Page(n) => write!(f, "Page {n}"),
            Citation::NotFound => f.write_str(NOT_FOUND_LABEL),
        }
    }
}

/// Locate `answer` in `document`.
pub fn locate(answer: &str, document: &Document, strategy: CitationStrategy) -> Citation {
    match strategy {
        CitationStrategy::PageHeader => locate_by_page(answer, document.pages()),
        CitationStrategy::Legacy => locate_by_split(answer, &document.text()),
    }
}

/// Report the number of the first page whose text contains the answer.
fn locate_by_page(answer: &str, pages: &[Page]) -> Citation {
    if answer.trim().is_empty() {
        return Citation::NotFound;
    }
    let needle = answer.to_lowercase();

    pages
        .iter()
        .find(|page| page.text.to_lowercase().contains(&needle))
        .map_or(Citation::NotFound, |page| Citation::Page(page.number))
}

/// Split on `Page ` and label chunks by position (1-based, leading chunk included).
fn locate_by_split(answer: &str, document_text: &str) -> Citation {
    let needle = answer.to_lowercase();
    document_text
        .split(LEGACY_SPLIT_TOKEN)
        .position(|chunk| chunk.to_lowercase().contains(&needle))
        .map_or(Citation::NotFound, |i| Citation::Page(i + 1))
}
