//! Input file type detection

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileType {
    /// A JSON array of documents, or an object with a `documents` array.
    Json,
    /// One JSON document per line.
    JsonLines,
    /// A single posting as plain text or markdown.
    Text,
    Unknown,
}

impl FileType {
    pub fn from_extension(ext: &str) -> Self {
        match ext.to_lowercase().as_str() {
            "json" => FileType::Json,
            "jsonl" | "ndjson" => FileType::JsonLines,
            "txt" | "md" | "markdown" | "html" | "htm" => FileType::Text,
            _ => FileType::Unknown,
        }
    }
}
