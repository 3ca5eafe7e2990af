use thiserror::Error;

/// Errors from chunk parameter validation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChunkError {
    #[error("invalid chunk parameters: size={size}, overlap={overlap} (need size > 0 and 0 <= overlap < size)")]
    InvalidChunkParameters { size: i64, overlap: i64 },
}

/// Errors from summarize backends.
#[derive(Debug, Error)]
pub enum BackendError {
    #[error("backend failed: {0}")]
    Failed(String),

    #[error("network error: {0}")]
    Network(String),

    #[error("invalid response: {0}")]
    InvalidResponse(String),
}

/// Errors from summary highlighting.
#[derive(Debug, Error)]
pub enum HighlightError {
    #[error("invalid highlight pattern: {0}")]
    InvalidPattern(#[from] regex::Error),
}

/// Errors from document page selection.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DocumentError {
    #[error("page range {start}-{end} is outside the document (1-{pages})")]
    PageRange {
        start: usize,
        end: usize,
        pages: usize,
    },
}
