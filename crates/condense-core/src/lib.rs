pub mod document;
pub mod error;
pub mod highlight;
mod http;
pub mod pipeline;
pub mod summarize;
pub mod text;
pub mod types;

pub use error::*;
pub use types::*;

pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_is_set() {
        assert!(!version().is_empty());
    }
}
