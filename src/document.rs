//! Extracted document types.
//!
//! A [`Document`] is the immutable result of extraction: a name and its pages
//! in order. The per-page text blob that the prompt builder and the citation
//! locator consume is derived from the pages on demand by [`Document::text`],
//! so formatting is a pure function of the extracted pages.

use serde::{Deserialize, Serialize};

/// One extracted page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page {
    /// 1-indexed page number.
    pub number: usize,
    /// Plain text as extracted. May be empty for scanned or image-only pages.
    pub text: String,
}

/// A loaded document, keyed by name inside a session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    name: String,
    pages: Vec<Page>,
}

impl Document {
    /// Build a document from page texts given in reading order.
    ///
    /// Pages are numbered from 1 in the order supplied.
    pub fn from_page_texts<I, S>(name: impl Into<String>, texts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let pages = texts
            .into_iter()
            .enumerate()
            .map(|(i, text)| Page {
                number: i + 1,
                text: text.into(),
            })
            .collect();
        Self {
            name: name.into(),
            pages,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn pages(&self) -> &[Page] {
        &self.pages
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Total extracted characters across all pages.
    pub fn char_count(&self) -> usize {
        self.pages.iter().map(|p| p.text.chars().count()).sum()
    }

    /// Render the per-page text blob: `Page N:\n{text}\n\n` for every page.
    pub fn text(&self) -> String {
        let mut out = String::with_capacity(
            self.pages.iter().map(|p| p.text.len() + 16).sum::<usize>(),
        );
        for page in &self.pages {
            out.push_str(&page_header(page.number));
            out.push('\n');
            out.push_str(&page.text);
            out.push_str("\n\n");
        }
        out
    }
}

/// Header line written before each page's text, without the newline.
pub fn page_header(number: usize) -> String {
    format!("Page {number}:")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_layout() {
        let doc = Document::from_page_texts("a.pdf", ["first", "second"]);
        assert_eq!(doc.text(), "Page 1:\nfirst\n\nPage 2:\nsecond\n\n");
    }

    #[test]
    fn header_count_matches_page_count() {
        let doc = Document::from_page_texts("a.pdf", ["a", "", "c", "d"]);
        let text = doc.text();
        let headers: Vec<usize> = text
            .lines()
            .filter_map(|l| l.strip_prefix("Page ")?.strip_suffix(':')?.parse().ok())
            .collect();
        assert_eq!(headers, vec![1, 2, 3, 4]);
    }

    #[test]
    fn text_is_idempotent() {
        let doc = Document::from_page_texts("a.pdf", ["x", "y"]);
        assert_eq!(doc.text(), doc.text());
    }

    #[test]
    fn empty_document_has_empty_text() {
        let doc = Document::from_page_texts("empty.pdf", Vec::<String>::new());
        assert_eq!(doc.page_count(), 0);
        assert_eq!(doc.text(), "");
    }

    #[test]
    fn char_count_sums_pages() {
        let doc = Document::from_page_texts("a.pdf", ["abc", "dé"]);
        assert_eq!(doc.char_count(), 5);
    }
}
