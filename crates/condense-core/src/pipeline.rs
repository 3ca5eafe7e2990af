use crate::error::ChunkError;
use crate::summarize::{SUMMARY_PROMPT, SummarizeProvider, invoke, parse_reply};
use crate::text::{ChunkParams, chunk_text, extract_anchors};
use crate::types::{Chunk, ChunkResult, Summary};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::mpsc;
use std::thread;

/// Chunks text, summarizes each chunk through a provider, and joins the results.
///
/// Holds no state between runs: the same input against a deterministic
/// provider always yields the same summary.
pub struct Pipeline {
    provider: Box<dyn SummarizeProvider>,
    system_prompt: String,
    workers: usize,
}

impl Pipeline {
    pub fn new(provider: Box<dyn SummarizeProvider>) -> Self {
        Self {
            provider,
            system_prompt: SUMMARY_PROMPT.to_string(),
            workers: 1,
        }
    }

    /// Number of chunks summarized concurrently. `0` and `1` both mean sequential.
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers.max(1);
        self
    }

    pub fn with_system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.system_prompt = prompt.into();
        self
    }

    pub fn provider_name(&self) -> &'static str {
        self.provider.name()
    }

    pub fn summarize(&self, text: &str, size: i64, overlap: i64) -> Result<Summary, ChunkError> {
        let params = ChunkParams::new(size, overlap)?;
        let chunks = chunk_text(text, params);
        tracing::info!(
            provider = self.provider.name(),
            chunks = chunks.len(),
            size,
            overlap,
            "summarizing"
        );

        let results = if self.workers <= 1 || chunks.len() <= 1 {
            chunks
                .iter()
                .enumerate()
                .map(|(index, chunk)| self.process_chunk(index, chunk))
                .collect()
        } else {
            self.process_parallel(&chunks)
        };

        let summary = Summary::from_results(&results);
        if summary.stats.repaired_lossy > 0 {
            tracing::warn!(
                repaired_lossy = summary.stats.repaired_lossy,
                "some bullets were recovered from malformed lines"
            );
        }
        tracing::info!(
            chunks = summary.stats.chunks,
            bullets = summary.stats.bullets,
            repaired_lossy = summary.stats.repaired_lossy,
            failed_chunks = summary.stats.failed_chunks,
            "summary complete"
        );
        Ok(summary)
    }

    fn process_chunk(&self, index: usize, chunk: &Chunk) -> ChunkResult {
        let anchors = extract_anchors(&chunk.text);
        let invocation = invoke(self.provider.as_ref(), &chunk.text, &self.system_prompt);
        let parsed = parse_reply(&invocation.reply);
        tracing::debug!(
            index,
            start_word = chunk.start_word,
            end_word = chunk.end_word,
            anchors = anchors.len(),
            bullets = parsed.bullets.len(),
            repaired_lossy = parsed.repaired_lossy,
            "chunk summarized"
        );
        ChunkResult {
            index,
            anchors,
            bullets: parsed.bullets,
            backend_failed: invocation.failed,
        }
    }

    // Workers pull indices from a shared cursor; results land in per-index
    // slots so the join order never depends on completion order.
    fn process_parallel(&self, chunks: &[Chunk]) -> Vec<ChunkResult> {
        let workers = self.workers.min(chunks.len());
        let cursor = AtomicUsize::new(0);
        let (tx, rx) = mpsc::channel::<ChunkResult>();

        thread::scope(|scope| {
            for _ in 0..workers {
                let tx = tx.clone();
                let cursor = &cursor;
                scope.spawn(move || {
                    loop {
                        let index = cursor.fetch_add(1, Ordering::Relaxed);
                        let Some(chunk) = chunks.get(index) else {
                            break;
                        };
                        if tx.send(self.process_chunk(index, chunk)).is_err() {
                            break;
                        }
                    }
                });
            }
        });
        drop(tx);

        let mut slots: Vec<Option<ChunkResult>> = vec![None; chunks.len()];
        for result in rx {
            let index = result.index;
            slots[index] = Some(result);
        }
        slots.into_iter().flatten().collect()
    }
}
