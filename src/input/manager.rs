//! Loading job postings and candidate skill lists from disk

use crate::error::{Result, SkillScopeError};
use crate::input::file_detector::FileType;
use crate::processing::document::Document;
use log::{debug, info};
use serde::Deserialize;
use std::path::Path;
use tokio::fs;

#[derive(Deserialize)]
#[serde(untagged)]
enum DocumentFile {
    List(Vec<Document>),
    Wrapped { documents: Vec<Document> },
}

#[derive(Debug, Default)]
pub struct InputManager {
    detect_sections: bool,
}

impl InputManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Split plain-text postings on headings such as `Requirements:`.
    pub fn with_section_detection(mut self, enable: bool) -> Self {
        self.detect_sections = enable;
        self
    }

    /// Load documents from a file, or from every supported file in a directory.
    pub async fn load_documents(&self, path: &Path) -> Result<Vec<Document>> {
        if !path.exists() {
            return Err(SkillScopeError::InvalidInput(format!(
                "Path does not exist: {}",
                path.display()
            )));
        }

        let documents = if path.is_dir() {
            self.load_directory(path).await?
        } else {
            self.load_file(path).await?
        };

        info!("Loaded {} documents from {}", documents.len(), path.display());
        Ok(documents)
    }

    async fn load_directory(&self, dir: &Path) -> Result<Vec<Document>> {
        let mut paths = Vec::new();
        let mut entries = fs::read_dir(dir).await?;
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if path.is_file() && Self::detect_file_type(&path) != FileType::Unknown {
                paths.push(path);
            }
        }
        // read_dir order is platform dependent
        paths.sort();

        let mut documents = Vec::new();
        for path in paths {
            documents.extend(self.load_file(&path).await?);
        }
        Ok(documents)
    }

    async fn load_file(&self, path: &Path) -> Result<Vec<Document>> {
        let content = fs::read_to_string(path).await?;
        debug!("Reading {} ({} bytes)", path.display(), content.len());

        match Self::detect_file_type(path) {
            FileType::Json => Self::parse_json(&content),
            FileType::JsonLines => Self::parse_json_lines(&content),
            FileType::Text => {
                let id = path
                    .file_stem()
                    .map(|s| s.to_string_lossy().to_string())
                    .unwrap_or_else(|| path.display().to_string());
                let mut document = Document::new(id, content).with_source(path.display().to_string());
                if self.detect_sections {
                    document = document.with_detected_sections();
                }
                Ok(vec![document])
            }
            FileType::Unknown => Err(SkillScopeError::InvalidInput(format!(
                "Unsupported file type: {}",
                path.display()
            ))),
        }
    }

    pub fn parse_json(content: &str) -> Result<Vec<Document>> {
        let file: DocumentFile = serde_json::from_str(content)?;
        Ok(match file {
            DocumentFile::List(documents) => documents,
            DocumentFile::Wrapped { documents } => documents,
        })
    }

    pub fn parse_json_lines(content: &str) -> Result<Vec<Document>> {
        content
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(|line| serde_json::from_str(line).map_err(SkillScopeError::from))
            .collect()
    }

    /// A candidate's skills as a JSON array of strings, or one per line /
    /// comma separated in a text file.
    pub async fn load_skill_list(&self, path: &Path) -> Result<Vec<String>> {
        let content = fs::read_to_string(path).await?;
        if Self::detect_file_type(path) == FileType::Json {
            return Ok(serde_json::from_str(&content)?);
        }
        Ok(Self::parse_skill_list(&content))
    }

    pub fn parse_skill_list(content: &str) -> Vec<String> {
        content
            .split(|c| c == ',' || c == '\n' || c == ';')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect()
    }

    fn detect_file_type(path: &Path) -> FileType {
        path.extension()
            .and_then(|ext| ext.to_str())
            .map(FileType::from_extension)
            .unwrap_or(FileType::Unknown)
    }
}
