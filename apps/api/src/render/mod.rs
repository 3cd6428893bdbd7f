//! Renderer: turns a stored SOW into a downloadable document.
//!
//! One renderer per capability, all behind the `Renderer` trait:
//! - `PaginatedDocument` → PDF via genpdf (`pdf.rs`)
//! - `FlowDocument` → DOCX written as raw OOXML parts (`docx.rs`)
//! - `PlainText` → fixed preamble plus the raw body (`text.rs`)
//!
//! The PDF and DOCX renderers walk the `content::Block` stream; the plain-text
//! export writes the body unclassified. `html.rs` renders the same
//! block stream for the on-screen preview.

pub mod docx;
pub mod handlers;
pub mod html;
pub mod pdf;
pub mod style;
pub mod text;

use std::path::PathBuf;

use chrono::{DateTime, Local, NaiveDateTime, TimeZone, Utc};
use thiserror::Error;

use crate::models::sow::SowDetail;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("font loading failed: {0}")]
    Font(String),

    #[error("PDF rendering failed: {0}")]
    Pdf(String),

    #[error("DOCX packaging failed: {0}")]
    Docx(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Output formats a renderer can produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability {
    PaginatedDocument,
    FlowDocument,
    PlainText,
}

impl Capability {
    /// Maps the export path segment (`pdf`, `docx`, `txt`) to a capability.
    pub fn from_format(format: &str) -> Option<Self> {
        match format.to_ascii_lowercase().as_str() {
            "pdf" => Some(Capability::PaginatedDocument),
            "docx" => Some(Capability::FlowDocument),
            "txt" => Some(Capability::PlainText),
            _ => None,
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            Capability::PaginatedDocument => "pdf",
            Capability::FlowDocument => "docx",
            Capability::PlainText => "txt",
        }
    }

    pub fn content_type(&self) -> &'static str {
        match self {
            Capability::PaginatedDocument => "application/pdf",
            Capability::FlowDocument => {
                "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
            }
            Capability::PlainText => "text/plain; charset=utf-8",
        }
    }
}

/// Client details printed above the document body.
#[derive(Debug, Clone)]
pub struct SowHeader {
    pub account_name: String,
    pub company: Option<String>,
    pub contact: Option<String>,
    pub created_at: NaiveDateTime,
}

impl SowHeader {
    pub fn from_sow(sow: &SowDetail) -> Self {
        SowHeader {
            account_name: sow.account_name.clone(),
            company: sow.account_company.clone(),
            contact: sow.account_email.clone(),
            created_at: sow.created_at,
        }
    }

    /// en-US short date in server-local time, e.g. `3/5/2024`.
    /// `created_at` is stored as UTC.
    pub fn date_label(&self) -> String {
        Utc.from_utc_datetime(&self.created_at)
            .with_timezone(&Local)
            .format("%-m/%-d/%Y")
            .to_string()
    }
}

pub trait Renderer: Send {
    fn capability(&self) -> Capability;

    /// Produces the complete document. Must not touch anything but its inputs.
    fn render(&self, header: &SowHeader, body: &str) -> Result<Vec<u8>, RenderError>;
}

/// Where the PDF renderer finds its TrueType font family.
#[derive(Debug, Clone)]
pub struct FontSource {
    pub dir: PathBuf,
    pub family: String,
}

pub fn renderer_for(capability: Capability, fonts: &FontSource) -> Box<dyn Renderer> {
    match capability {
        Capability::PaginatedDocument => Box::new(pdf::PdfRenderer::new(fonts.clone())),
        Capability::FlowDocument => Box::new(docx::DocxRenderer),
        Capability::PlainText => Box::new(text::PlainTextRenderer),
    }
}

/// `SOW-<account name, whitespace runs as '-'>-<unix millis>.<ext>`
pub fn export_file_name(account_name: &str, now: DateTime<Utc>, capability: Capability) -> String {
    let name = account_name.split_whitespace().collect::<Vec<_>>().join("-");
    format!(
        "SOW-{}-{}.{}",
        name,
        now.timestamp_millis(),
        capability.extension()
    )
}
