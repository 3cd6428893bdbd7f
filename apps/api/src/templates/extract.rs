//! Template text extraction.
//!
//! Plain-text templates are always decoded. PDF and DOCX templates are only read
//! back when `TEMPLATE_EXTRACT_ALL` is enabled; otherwise they are stored without content.

use std::io::{BufReader, Cursor, Read};

use bytes::Bytes;
use quick_xml::events::Event;
use thiserror::Error;
use tracing::warn;

use crate::models::template::TemplateKind;

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("PDF: {0}")]
    Pdf(String),

    #[error("DOCX: {0}")]
    Docx(String),

    #[error("extraction task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

/// Returns the text to store for a template, or `None` when there is nothing usable.
/// Extraction failures never fail the upload.
pub async fn extract_content(kind: TemplateKind, bytes: Bytes, extract_all: bool) -> Option<String> {
    let result = match kind {
        TemplateKind::PlainText => Ok(String::from_utf8_lossy(&bytes).into_owned()),
        _ if !extract_all => return None,
        TemplateKind::Pdf => tokio::task::spawn_blocking(move || extract_pdf(&bytes))
            .await
            .map_err(ExtractError::from)
            .and_then(|r| r),
        TemplateKind::Docx => tokio::task::spawn_blocking(move || extract_docx(&bytes))
            .await
            .map_err(ExtractError::from)
            .and_then(|r| r),
    };

    match result {
        Ok(text) if !text.trim().is_empty() => Some(text),
        Ok(_) => None,
        Err(e) => {
            warn!("Template text extraction failed: {e}");
            None
        }
    }
}

fn extract_pdf(bytes: &[u8]) -> Result<String, ExtractError> {
    // pdf-extract can panic on malformed PDFs
    let result = std::panic::catch_unwind(|| pdf_extract::extract_text_from_mem(bytes));

    match result {
        Ok(Ok(text)) => Ok(text),
        Ok(Err(e)) => Err(ExtractError::Pdf(e.to_string())),
        Err(_) => Err(ExtractError::Pdf(
            "extraction panicked (malformed file)".to_string(),
        )),
    }
}

/// Walks the `<w:t>` runs of `word/document.xml`, one output line per paragraph.
pub(crate) fn extract_docx(bytes: &[u8]) -> Result<String, ExtractError> {
    let mut archive = zip::ZipArchive::new(Cursor::new(bytes))
        .map_err(|e| ExtractError::Docx(format!("zip: {e}")))?;

    let mut xml = String::new();
    archive
        .by_name("word/document.xml")
        .map_err(|e| ExtractError::Docx(format!("missing document.xml: {e}")))?
        .read_to_string(&mut xml)
        .map_err(|e| ExtractError::Docx(format!("document.xml: {e}")))?;

    let mut reader = quick_xml::Reader::from_reader(BufReader::new(xml.as_bytes()));
    let mut buf = Vec::new();
    let mut text = String::new();
    let mut in_text_tag = false;

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) => {
                if e.local_name().as_ref() == b"t" {
                    in_text_tag = true;
                }
            }
            Ok(Event::End(ref e)) => match e.local_name().as_ref() {
                b"t" => in_text_tag = false,
                b"p" => text.push('\n'),
                _ => {}
            },
            Ok(Event::Empty(ref e)) => {
                if e.local_name().as_ref() == b"p" {
                    text.push('\n');
                }
            }
            Ok(Event::Text(ref e)) if in_text_tag => {
                if let Ok(s) = e.unescape() {
                    text.push_str(&s);
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(ExtractError::Docx(format!("xml: {e}"))),
            _ => {}
        }
        buf.clear();
    }

    Ok(text.trim_end().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::docx::DocxRenderer;
    use crate::render::{Renderer, SowHeader};

    #[tokio::test]
    async fn test_plain_text_is_always_extracted() {
        let content = extract_content(
            TemplateKind::PlainText,
            Bytes::from_static(b"## Scope\nOnly this."),
            false,
        )
        .await;
        assert_eq!(content.as_deref(), Some("## Scope\nOnly this."));
    }

    #[tokio::test]
    async fn test_blank_plain_text_is_treated_as_absent() {
        let content =
            extract_content(TemplateKind::PlainText, Bytes::from_static(b"  \n "), false).await;
        assert_eq!(content, None);
    }

    #[tokio::test]
    async fn test_binary_templates_are_skipped_by_default() {
        let content =
            extract_content(TemplateKind::Pdf, Bytes::from_static(b"%PDF-1.4"), false).await;
        assert_eq!(content, None);
    }

    #[tokio::test]
    async fn test_malformed_pdf_yields_none_when_enabled() {
        let content =
            extract_content(TemplateKind::Pdf, Bytes::from_static(b"not a pdf"), true).await;
        assert_eq!(content, None);
    }

    #[test]
    fn test_docx_text_runs_are_recovered() {
        let header = SowHeader {
            account_name: "Acme".to_string(),
            company: None,
            contact: None,
            created_at: chrono::NaiveDate::from_ymd_opt(2024, 3, 5)
                .unwrap()
                .and_hms_opt(9, 0, 0)
                .unwrap(),
        };
        let bytes = DocxRenderer
            .render(&header, "## Scope\nShip the widget & docs")
            .unwrap();

        let text = extract_docx(&bytes).unwrap();
        assert!(text.contains("Scope"));
        assert!(text.contains("Ship the widget & docs"));
    }
}
