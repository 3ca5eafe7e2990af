use crate::error::ChunkError;
use crate::types::Chunk;

/// Validated window size and overlap, both in words.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkParams {
    size: usize,
    overlap: usize,
}

impl ChunkParams {
    pub fn new(size: i64, overlap: i64) -> Result<Self, ChunkError> {
        if size <= 0 || overlap < 0 || overlap >= size {
            return Err(ChunkError::InvalidChunkParameters { size, overlap });
        }
        Ok(Self {
            size: size as usize,
            overlap: overlap as usize,
        })
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn overlap(&self) -> usize {
        self.overlap
    }

    fn step(&self) -> usize {
        self.size - self.overlap
    }
}

/// Split `text` on whitespace into overlapping word windows.
///
/// Each window after the first starts `size - overlap` words after its
/// predecessor. A trailing window shorter than `overlap` is dropped and its
/// words are appended to the previous window.
pub fn chunk_text(text: &str, params: ChunkParams) -> Vec<Chunk> {
    let words: Vec<&str> = text.split_whitespace().collect();
    let total = words.len();
    let mut chunks: Vec<Chunk> = Vec::new();

    let mut start = 0;
    while start < total {
        let end = (start + params.size).min(total);
        chunks.push(Chunk {
            text: words[start..end].join(" "),
            start_word: start,
            end_word: end,
            size_words: end - start,
            overlap_words: 0,
        });
        start += params.step();
    }

    if chunks.len() > 1
        && let Some(last) = chunks.pop_if(|last| last.size_words < params.overlap)
        && let Some(previous) = chunks.last_mut()
    {
        previous.text.push(' ');
        previous.text.push_str(&last.text);
        previous.size_words += last.size_words;
        previous.end_word = last.end_word;
    }

    for index in 1..chunks.len() {
        let shared = chunks[index - 1]
            .end_word
            .saturating_sub(chunks[index].start_word);
        chunks[index - 1].overlap_words = shared;
    }

    chunks
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts(chunks: &[Chunk]) -> Vec<&str> {
        chunks.iter().map(|chunk| chunk.text.as_str()).collect()
    }

    #[test]
    fn rejects_invalid_params() {
        assert!(ChunkParams::new(0, 0).is_err());
        assert!(ChunkParams::new(-3, 0).is_err());
        assert!(ChunkParams::new(3, 3).is_err());
        assert!(ChunkParams::new(3, 4).is_err());
        assert_eq!(
            ChunkParams::new(3, -1),
            Err(ChunkError::InvalidChunkParameters {
                size: 3,
                overlap: -1
            })
        );
        assert!(ChunkParams::new(3, 0).is_ok());
        assert!(ChunkParams::new(3, 2).is_ok());
    }

    #[test]
    fn windows_overlap_by_requested_words() {
        let params = ChunkParams::new(3, 1).unwrap();
        let chunks = chunk_text("a b c d e f g h", params);
        assert_eq!(texts(&chunks), vec!["a b c", "c d e", "e f g", "g h"]);
        assert_eq!(chunks[0].overlap_words, 1);
        assert_eq!(chunks[1].overlap_words, 1);
        assert_eq!(chunks[2].overlap_words, 1);
        assert_eq!(chunks[3].overlap_words, 0);
        assert_eq!(chunks[3].start_word, 6);
        assert_eq!(chunks[3].end_word, 8);
        assert_eq!(chunks[3].size_words, 2);
    }

    #[test]
    fn short_trailing_window_is_merged() {
        let params = ChunkParams::new(3, 2).unwrap();
        let chunks = chunk_text("a b c d e f g h", params);
        // The lone trailing "h" is appended to "g h".
        assert_eq!(chunks.len(), 7);
        let last = chunks.last().unwrap();
        assert_eq!(last.text, "g h h");
        assert_eq!(last.start_word, 6);
        assert_eq!(last.end_word, 8);
        assert_eq!(last.size_words, 3);
        assert_eq!(last.overlap_words, 0);
        assert_eq!(chunks[5].text, "f g h");
        assert_eq!(chunks[5].overlap_words, 2);
    }

    #[test]
    fn trailing_window_at_overlap_length_is_kept() {
        let params = ChunkParams::new(4, 2).unwrap();
        let chunks = chunk_text("a b c d e f", params);
        assert_eq!(texts(&chunks), vec!["a b c d", "c d e f", "e f"]);
    }

    #[test]
    fn only_the_final_window_is_merged() {
        let params = ChunkParams::new(5, 4).unwrap();
        let chunks = chunk_text("a b c d e f", params);
        assert_eq!(
            texts(&chunks),
            vec!["a b c d e", "b c d e f", "c d e f", "d e f", "e f f"]
        );
    }

    #[test]
    fn every_word_is_covered() {
        let text = (1..=23).map(|i| format!("w{i}")).collect::<Vec<_>>().join(" ");
        for (size, overlap) in [(5, 0), (5, 1), (5, 4), (7, 3), (1, 0), (30, 10)] {
            let chunks = chunk_text(&text, ChunkParams::new(size, overlap).unwrap());
            let mut covered = vec![false; 23];
            for chunk in &chunks {
                for flag in &mut covered[chunk.start_word..chunk.end_word] {
                    *flag = true;
                }
            }
            assert!(covered.iter().all(|flag| *flag), "size={size} overlap={overlap}");
            assert_eq!(chunks[0].start_word, 0);
            assert_eq!(chunks.last().unwrap().end_word, 23);
        }
    }

    #[test]
    fn collapses_irregular_whitespace() {
        let params = ChunkParams::new(2, 0).unwrap();
        let chunks = chunk_text("  one\ttwo\n\nthree  ", params);
        assert_eq!(texts(&chunks), vec!["one two", "three"]);
    }

    #[test]
    fn empty_text_has_no_chunks() {
        let params = ChunkParams::new(5, 1).unwrap();
        assert!(chunk_text("", params).is_empty());
        assert!(chunk_text(" \n\t ", params).is_empty());
    }

    #[test]
    fn single_short_text_is_one_chunk() {
        let params = ChunkParams::new(10, 5).unwrap();
        let chunks = chunk_text("only three words", params);
        assert_eq!(texts(&chunks), vec!["only three words"]);
    }
}
