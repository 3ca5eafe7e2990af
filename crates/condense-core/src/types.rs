use serde::{Deserialize, Serialize};
use std::fmt;

/// Line closing every chunk block in a summary.
pub const CHUNK_SEPARATOR: &str = "***";

/// A contiguous word window over the input text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chunk {
    pub text: String,
    pub start_word: usize,
    /// Exclusive.
    pub end_word: usize,
    pub size_words: usize,
    /// Words shared with the next chunk; zero for the last one.
    pub overlap_words: usize,
}

/// One bullet recovered from a backend reply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Bullet {
    /// The line parsed as a `{"key": ...}` record.
    Parsed(String),
    /// The line only yielded text through substring fallback.
    Repaired(String),
}

impl Bullet {
    pub fn text(&self) -> &str {
        match self {
            Bullet::Parsed(text) | Bullet::Repaired(text) => text,
        }
    }

    pub fn is_repaired(&self) -> bool {
        matches!(self, Bullet::Repaired(_))
    }

    pub fn render(&self) -> String {
        format!("* {}", self.text())
    }
}

/// Anchors and bullets produced for a single chunk.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChunkResult {
    pub index: usize,
    pub anchors: Vec<String>,
    pub bullets: Vec<Bullet>,
    pub backend_failed: bool,
}

impl ChunkResult {
    pub fn repaired_count(&self) -> usize {
        self.bullets.iter().filter(|bullet| bullet.is_repaired()).count()
    }

    /// Anchor lines, then bullet lines, then the separator.
    pub fn render(&self) -> String {
        let mut lines = Vec::with_capacity(self.anchors.len() + self.bullets.len() + 1);
        lines.extend(self.anchors.iter().cloned());
        lines.extend(self.bullets.iter().map(Bullet::render));
        lines.push(CHUNK_SEPARATOR.to_string());
        lines.join("\n")
    }
}

/// Counters describing one pipeline run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummaryStats {
    pub chunks: usize,
    pub bullets: usize,
    pub repaired_lossy: usize,
    pub failed_chunks: usize,
}

/// The joined output of a pipeline run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Summary {
    pub text: String,
    pub stats: SummaryStats,
}

impl Summary {
    pub fn from_results(results: &[ChunkResult]) -> Self {
        let text = results
            .iter()
            .map(ChunkResult::render)
            .collect::<Vec<_>>()
            .join("\n\n");
        let stats = SummaryStats {
            chunks: results.len(),
            bullets: results.iter().map(|result| result.bullets.len()).sum(),
            repaired_lossy: results.iter().map(ChunkResult::repaired_count).sum(),
            failed_chunks: results.iter().filter(|result| result.backend_failed).count(),
        };
        Self { text, stats }
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(index: usize, anchors: &[&str], bullets: Vec<Bullet>) -> ChunkResult {
        ChunkResult {
            index,
            anchors: anchors.iter().map(|a| a.to_string()).collect(),
            bullets,
            backend_failed: false,
        }
    }

    #[test]
    fn chunk_result_renders_anchors_bullets_then_separator() {
        let block = result(
            0,
            &["[00:00:01.000 --> 00:00:02.000]", "(00:01)"],
            vec![Bullet::Parsed("one".into()), Bullet::Repaired("two".into())],
        );
        assert_eq!(
            block.render(),
            "[00:00:01.000 --> 00:00:02.000]\n(00:01)\n* one\n* two\n***"
        );
    }

    #[test]
    fn empty_chunk_result_is_just_separator() {
        assert_eq!(result(0, &[], Vec::new()).render(), "***");
    }

    #[test]
    fn summary_joins_blocks_with_blank_line() {
        let summary = Summary::from_results(&[
            result(0, &[], vec![Bullet::Parsed("a".into())]),
            result(1, &[], vec![Bullet::Repaired("b".into())]),
        ]);
        assert_eq!(summary.as_str(), "* a\n***\n\n* b\n***");
        assert_eq!(summary.stats.chunks, 2);
        assert_eq!(summary.stats.bullets, 2);
        assert_eq!(summary.stats.repaired_lossy, 1);
        assert_eq!(summary.to_string(), summary.text);
    }

    #[test]
    fn summary_of_nothing_is_empty() {
        let summary = Summary::from_results(&[]);
        assert!(summary.is_empty());
        assert_eq!(summary.stats, SummaryStats::default());
    }
}
