//! Error handling for the skill extraction pipeline

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SkillScopeError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Caller misuse or an invalid static configuration. Never retried.
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Embedding generation error: {0}")]
    Embedding(String),

    #[error("Processing error: {0}")]
    Processing(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Output formatting error: {0}")]
    OutputFormatting(String),
}

pub type Result<T> = std::result::Result<T, SkillScopeError>;

/// Convert anyhow errors to our custom error type
impl From<anyhow::Error> for SkillScopeError {
    fn from(err: anyhow::Error) -> Self {
        SkillScopeError::Processing(err.to_string())
    }
}

/// Non-fatal data problem attached to a document. The document still flows
/// through every stage with an empty skill set or a zero vector.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataQualityWarning {
    pub document_id: String,
    pub kind: WarningKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WarningKind {
    EmptyText,
    NoSkillsExtracted,
    ZeroVector,
}

impl DataQualityWarning {
    pub fn new(document_id: impl Into<String>, kind: WarningKind) -> Self {
        Self {
            document_id: document_id.into(),
            kind,
        }
    }
}

impl std::fmt::Display for DataQualityWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let reason = match self.kind {
            WarningKind::EmptyText => "document has no text",
            WarningKind::NoSkillsExtracted => "no skills extracted",
            WarningKind::ZeroVector => "document vector is all zeros",
        };
        write!(f, "{}: {}", self.document_id, reason)
    }
}
