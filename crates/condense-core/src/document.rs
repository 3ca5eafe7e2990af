use crate::error::DocumentError;

/// Page break emitted by PDF-to-text converters.
const PAGE_BREAK: char = '\x0c';

/// Overlap used once the window shrinks to the whole text, in percent.
const SHRUNK_OVERLAP_PERCENT: usize = 20;

/// Loaded input text as an ordered list of pages.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Document {
    pages: Vec<String>,
}

impl Document {
    /// Split on form feeds; text without them is a single page.
    pub fn from_text(text: &str) -> Self {
        let mut pages: Vec<String> = text.split(PAGE_BREAK).map(str::to_string).collect();
        // A trailing form feed does not open a new page.
        if pages.len() > 1 && pages.last().is_some_and(|page| page.trim().is_empty()) {
            pages.pop();
        }
        Self { pages }
    }

    pub fn from_pages(pages: Vec<String>) -> Self {
        Self { pages }
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    pub fn is_paginated(&self) -> bool {
        self.pages.len() > 1
    }

    pub fn pages(&self) -> &[String] {
        &self.pages
    }

    /// Join pages `start..=end` (1-based) with single spaces.
    pub fn select(&self, start: Option<usize>, end: Option<usize>) -> Result<String, DocumentError> {
        let (start, end) = self.resolve_range(start, end)?;
        if self.pages.is_empty() {
            return Ok(String::new());
        }
        Ok(self.pages[start - 1..end].join(" "))
    }

    /// Clamp missing bounds to the document and validate the rest.
    pub fn resolve_range(
        &self,
        start: Option<usize>,
        end: Option<usize>,
    ) -> Result<(usize, usize), DocumentError> {
        let pages = self.pages.len();
        let start = start.unwrap_or(1);
        let end = end.unwrap_or(pages);
        if pages == 0 && start <= 1 && end == 0 {
            return Ok((1, 0));
        }
        if start == 0 || end < start || end > pages {
            return Err(DocumentError::PageRange { start, end, pages });
        }
        Ok((start, end))
    }

    pub fn word_count(&self) -> usize {
        self.pages.iter().map(|page| word_count(page)).sum()
    }
}

pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

/// Chunk size and overlap chosen for a text of a given length.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkPlan {
    pub size: i64,
    pub overlap: i64,
}

impl ChunkPlan {
    /// Shrink the window to the text when the text is smaller than one chunk,
    /// keeping a 20% overlap.
    pub fn for_word_count(words: usize, size: i64, overlap: i64) -> Self {
        if words == 0 || words as i64 >= size {
            return Self { size, overlap };
        }
        let shrunk = words as i64;
        Self {
            size: shrunk,
            overlap: (words * SHRUNK_OVERLAP_PERCENT / 100) as i64,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_text_is_one_page() {
        let doc = Document::from_text("just some text");
        assert_eq!(doc.page_count(), 1);
        assert!(!doc.is_paginated());
        assert_eq!(doc.select(None, None).unwrap(), "just some text");
    }

    #[test]
    fn form_feeds_split_pages() {
        let doc = Document::from_text("one\x0ctwo\x0cthree\x0c");
        assert_eq!(doc.page_count(), 3);
        assert_eq!(doc.select(Some(2), Some(3)).unwrap(), "two three");
        assert_eq!(doc.select(Some(2), None).unwrap(), "two three");
        assert_eq!(doc.select(None, Some(1)).unwrap(), "one");
    }

    #[test]
    fn out_of_range_selection_fails() {
        let doc = Document::from_pages(vec!["a".into(), "b".into()]);
        assert_eq!(
            doc.select(Some(1), Some(3)),
            Err(DocumentError::PageRange {
                start: 1,
                end: 3,
                pages: 2
            })
        );
        assert!(doc.select(Some(0), Some(1)).is_err());
        assert!(doc.select(Some(2), Some(1)).is_err());
    }

    #[test]
    fn empty_document_selects_empty_text() {
        let doc = Document::from_pages(Vec::new());
        assert_eq!(doc.select(None, None).unwrap(), "");
        assert_eq!(doc.word_count(), 0);
    }

    #[test]
    fn counts_words_across_pages() {
        let doc = Document::from_text("a b\x0c c  d e");
        assert_eq!(doc.word_count(), 5);
        assert_eq!(word_count("  \n "), 0);
    }

    #[test]
    fn plan_keeps_requested_sizes_for_long_text() {
        assert_eq!(
            ChunkPlan::for_word_count(2_000, 500, 50),
            ChunkPlan {
                size: 500,
                overlap: 50
            }
        );
        assert_eq!(
            ChunkPlan::for_word_count(500, 500, 50),
            ChunkPlan {
                size: 500,
                overlap: 50
            }
        );
    }

    #[test]
    fn plan_shrinks_to_short_text() {
        assert_eq!(
            ChunkPlan::for_word_count(120, 500, 50),
            ChunkPlan {
                size: 120,
                overlap: 24
            }
        );
        assert_eq!(
            ChunkPlan::for_word_count(3, 500, 50),
            ChunkPlan {
                size: 3,
                overlap: 0
            }
        );
    }

    #[test]
    fn plan_leaves_empty_text_alone() {
        assert_eq!(
            ChunkPlan::for_word_count(0, 500, 50),
            ChunkPlan {
                size: 500,
                overlap: 50
            }
        );
    }
}
