pub mod anchor;
pub mod chunker;

pub use anchor::extract_anchors;
pub use chunker::{ChunkParams, chunk_text};
