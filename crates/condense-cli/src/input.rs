use condense_core::document::Document;
use std::fs;
use std::io::{self, Read};
use std::path::Path;

/// Load a document from a file, or from stdin when `path` is absent or `-`.
pub fn read_document(path: Option<&Path>) -> io::Result<Document> {
    let text = match path {
        Some(path) if path != Path::new("-") => fs::read_to_string(path)?,
        _ => read_from(io::stdin().lock())?,
    };
    Ok(Document::from_text(&text))
}

fn read_from(mut reader: impl Read) -> io::Result<String> {
    let mut text = String::new();
    reader.read_to_string(&mut text)?;
    Ok(text)
}
