use std::fmt;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// The closed set of template file kinds, stored as their file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
pub enum TemplateKind {
    #[serde(rename = ".pdf")]
    #[sqlx(rename = ".pdf")]
    Pdf,
    #[serde(rename = ".docx")]
    #[sqlx(rename = ".docx")]
    Docx,
    #[serde(rename = ".txt")]
    #[sqlx(rename = ".txt")]
    PlainText,
}

impl TemplateKind {
    /// Resolves a kind from a file name's extension, case-insensitively.
    pub fn from_file_name(file_name: &str) -> Option<Self> {
        let (_, ext) = file_name.rsplit_once('.')?;
        match ext.to_ascii_lowercase().as_str() {
            "pdf" => Some(TemplateKind::Pdf),
            "docx" => Some(TemplateKind::Docx),
            "txt" => Some(TemplateKind::PlainText),
            _ => None,
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            TemplateKind::Pdf => ".pdf",
            TemplateKind::Docx => ".docx",
            TemplateKind::PlainText => ".txt",
        }
    }
}

impl fmt::Display for TemplateKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct TemplateRow {
    pub id: i64,
    pub name: String,
    pub file_path: String,
    pub file_type: TemplateKind,
    pub content: Option<String>,
    pub uploaded_at: NaiveDateTime,
}
