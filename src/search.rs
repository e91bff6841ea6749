//! Text search across the pages of an uploaded document
//!
//! PDF rendering and text extraction stay outside this crate. Page text
//! arrives through [`PageTextSource`]; [`PlainTextPages`] reads the
//! form-feed separated layout that `pdftotext` produces. Pages are scanned
//! one at a time, in order.

use regex::RegexBuilder;
use std::path::Path;
use thiserror::Error;

/// Queries shorter than this match nothing.
pub const MIN_QUERY_LEN: usize = 3;

const PAGE_BREAK: char = '\x0c';

#[derive(Error, Debug)]
pub enum SearchError {
    #[error("page {page} is out of range (document has {count} pages)")]
    PageOutOfRange { page: usize, count: usize },

    #[error("failed to extract text from page {page}: {message}")]
    Extraction { page: usize, message: String },

    #[error("invalid query: {0}")]
    InvalidQuery(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Per-page text of a document. Pages are numbered from 1.
pub trait PageTextSource {
    fn page_count(&self) -> usize;
    fn page_text(&self, page: usize) -> Result<String, SearchError>;
}

/// Page text held in memory.
#[derive(Debug, Clone, Default)]
pub struct PlainTextPages {
    pages: Vec<String>,
}

impl PlainTextPages {
    pub fn new(pages: Vec<String>) -> Self {
        Self { pages }
    }

    /// Split on form feeds. A trailing form feed does not start a new page.
    pub fn parse(text: &str) -> Self {
        let text = text.strip_suffix(PAGE_BREAK).unwrap_or(text);
        if text.is_empty() {
            return Self::default();
        }
        Self::new(text.split(PAGE_BREAK).map(str::to_string).collect())
    }

    pub fn load(path: &Path) -> Result<Self, SearchError> {
        let text = std::fs::read_to_string(path)?;
        Ok(Self::parse(&text))
    }
}

impl PageTextSource for PlainTextPages {
    fn page_count(&self) -> usize {
        self.pages.len()
    }

    fn page_text(&self, page: usize) -> Result<String, SearchError> {
        page.checked_sub(1)
            .and_then(|i| self.pages.get(i))
            .cloned()
            .ok_or(SearchError::PageOutOfRange {
                page,
                count: self.pages.len(),
            })
    }
}

/// One occurrence: the page it is on and its ordinal within that page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchMatch {
    pub page_index: usize,
    pub match_index: usize,
}

/// Every case-insensitive occurrence of `query`, in document order.
pub fn index_matches(
    source: &dyn PageTextSource,
    query: &str,
) -> Result<Vec<SearchMatch>, SearchError> {
    if query.chars().count() < MIN_QUERY_LEN {
        return Ok(Vec::new());
    }

    let pattern = RegexBuilder::new(&regex::escape(query))
        .case_insensitive(true)
        .build()
        .map_err(|e| SearchError::InvalidQuery(e.to_string()))?;

    let mut matches = Vec::new();
    for page in 1..=source.page_count() {
        let text = source.page_text(page)?;
        let found = pattern.find_iter(&text).count();
        matches.extend((0..found).map(|match_index| SearchMatch {
            page_index: page,
            match_index,
        }));
    }
    tracing::debug!("'{}' matched {} times", query, matches.len());
    Ok(matches)
}

/// Position within a match list; stepping wraps at both ends.
#[derive(Debug, Clone)]
pub struct MatchCursor {
    matches: Vec<SearchMatch>,
    position: usize,
}

impl MatchCursor {
    pub fn new(matches: Vec<SearchMatch>) -> Self {
        Self {
            matches,
            position: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.matches.len()
    }

    pub fn is_empty(&self) -> bool {
        self.matches.is_empty()
    }

    pub fn current(&self) -> Option<&SearchMatch> {
        self.matches.get(self.position)
    }

    /// 1-based position for "3 of 7" style display.
    pub fn ordinal(&self) -> Option<usize> {
        (!self.is_empty()).then_some(self.position + 1)
    }

    pub fn next(&mut self) -> Option<&SearchMatch> {
        if self.is_empty() {
            return None;
        }
        self.position = (self.position + 1) % self.matches.len();
        self.current()
    }

    pub fn prev(&mut self) -> Option<&SearchMatch> {
        if self.is_empty() {
            return None;
        }
        self.position = (self.position + self.matches.len() - 1) % self.matches.len();
        self.current()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pages() -> PlainTextPages {
        PlainTextPages::parse(
            "Revenue grew. EBITDA margin 12%.\x0cDebt rose; ebitda fell.\x0cNo figures here.\x0c",
        )
    }

    #[test]
    fn test_form_feed_split() {
        let p = pages();
        assert_eq!(p.page_count(), 3);
        assert_eq!(p.page_text(3).unwrap(), "No figures here.");
        assert!(matches!(
            p.page_text(0),
            Err(SearchError::PageOutOfRange { page: 0, count: 3 })
        ));
        assert!(p.page_text(4).is_err());
        assert_eq!(PlainTextPages::parse("").page_count(), 0);
    }

    #[test]
    fn test_matches_are_case_insensitive_in_page_order() {
        let matches = index_matches(&pages(), "EBITDA").unwrap();
        assert_eq!(
            matches,
            vec![
                SearchMatch { page_index: 1, match_index: 0 },
                SearchMatch { page_index: 2, match_index: 0 },
            ]
        );
    }

    #[test]
    fn test_short_query_matches_nothing() {
        assert!(index_matches(&pages(), "eb").unwrap().is_empty());
    }

    #[test]
    fn test_query_length_counts_whitespace() {
        // " eb" is long enough and matches the space before each EBITDA
        let matches = index_matches(&pages(), " eb").unwrap();
        assert_eq!(matches.len(), 2);
        assert!(index_matches(&pages(), "   ").unwrap().is_empty());
    }

    #[test]
    fn test_query_is_literal() {
        let p = PlainTextPages::new(vec!["margin 12%. (adj.)".into(), "margin 12x".into()]);
        let matches = index_matches(&p, "12%.").unwrap();
        assert_eq!(matches.len(), 1);
        assert_eq!(index_matches(&p, "(adj.)").unwrap().len(), 1);
    }

    #[test]
    fn test_multiple_matches_on_one_page() {
        let p = PlainTextPages::new(vec!["cash cash CASH".into()]);
        let matches = index_matches(&p, "cash").unwrap();
        assert_eq!(matches.len(), 3);
        assert_eq!(matches[2].match_index, 2);
    }

    #[test]
    fn test_cursor_wraps_both_ways() {
        let mut cursor = MatchCursor::new(index_matches(&pages(), "ebitda").unwrap());
        assert_eq!(cursor.ordinal(), Some(1));
        assert_eq!(cursor.next().unwrap().page_index, 2);
        assert_eq!(cursor.next().unwrap().page_index, 1);
        assert_eq!(cursor.prev().unwrap().page_index, 2);
        assert_eq!(cursor.ordinal(), Some(2));
    }

    #[test]
    fn test_empty_cursor() {
        let mut cursor = MatchCursor::new(Vec::new());
        assert!(cursor.next().is_none());
        assert!(cursor.prev().is_none());
        assert_eq!(cursor.ordinal(), None);
    }
}
