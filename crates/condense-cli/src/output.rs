use crate::atomic::write_atomic;
use condense_core::Summary;
use std::io;
use std::path::Path;

/// Write the summary text verbatim to `path`.
pub fn save_summary(path: &Path, summary: &Summary) -> io::Result<()> {
    write_atomic(path, summary.as_str().as_bytes(), false)
}

/// Page range, word count and chunk sizing shown above a summary.
pub fn render_header(
    pages: Option<(usize, usize)>,
    words: usize,
    chunk_size: i64,
    overlap: i64,
) -> String {
    let range = pages
        .map(|(start, end)| format!("{start} - {end} "))
        .unwrap_or_default();
    format!("#### Summary: {range}({words} words) chunkSize={chunk_size}/Overlap={overlap}")
}
