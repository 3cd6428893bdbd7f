//! Flow-document export: a minimal WordprocessingML package (content types,
//! package relationships, `word/document.xml`) zipped in memory.
//! Styling is applied with direct run/paragraph properties, no styles part.

use std::io::{Cursor, Write};

use quick_xml::escape::escape;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::content::{classify, Block};
use crate::render::style::{self, Rgb};
use crate::render::{Capability, RenderError, Renderer, SowHeader};

const CONTENT_TYPES_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/><Default Extension="xml" ContentType="application/xml"/><Override PartName="/word/document.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml"/></Types>"#;

const PACKAGE_RELS_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="word/document.xml"/></Relationships>"#;

const DOCUMENT_OPEN: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:body>"#;

// US letter, 1" margins (twentieths of a point).
const SECTION_PROPERTIES: &str = r#"<w:sectPr><w:pgSz w:w="12240" w:h="15840"/><w:pgMar w:top="1440" w:right="1440" w:bottom="1440" w:left="1440" w:header="720" w:footer="720" w:gutter="0"/></w:sectPr>"#;

const DOCUMENT_CLOSE: &str = "</w:body></w:document>";

/// Text width between the margins, in twips.
const TEXT_WIDTH_TWIPS: usize = 9360;

#[derive(Debug, Clone, Copy)]
struct RunStyle {
    bold: bool,
    color: Rgb,
    size_pt: u8,
}

const TITLE_RUN: RunStyle = RunStyle {
    bold: true,
    color: style::TEXT,
    size_pt: style::TITLE_SIZE,
};
const SECTION_RUN: RunStyle = RunStyle {
    bold: true,
    color: style::ACCENT_A,
    size_pt: style::SECTION_SIZE,
};
const SUBHEADER_RUN: RunStyle = RunStyle {
    bold: true,
    color: style::ACCENT_B,
    size_pt: style::SUBHEADER_SIZE,
};
const BODY_RUN: RunStyle = RunStyle {
    bold: false,
    color: style::TEXT,
    size_pt: style::BODY_SIZE,
};
const TABLE_HEADER_RUN: RunStyle = RunStyle {
    bold: true,
    color: style::INVERSE_TEXT,
    size_pt: style::BODY_SIZE,
};

pub struct DocxRenderer;

impl Renderer for DocxRenderer {
    fn capability(&self) -> Capability {
        Capability::FlowDocument
    }

    fn render(&self, header: &SowHeader, body: &str) -> Result<Vec<u8>, RenderError> {
        let document = document_xml(header, body);
        package(&[
            ("[Content_Types].xml", CONTENT_TYPES_XML),
            ("_rels/.rels", PACKAGE_RELS_XML),
            ("word/document.xml", &document),
        ])
    }
}

fn package(parts: &[(&str, &str)]) -> Result<Vec<u8>, RenderError> {
    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

    for (name, xml) in parts {
        zip.start_file(*name, options)
            .map_err(|e| RenderError::Docx(e.to_string()))?;
        zip.write_all(xml.as_bytes())?;
    }

    let cursor = zip.finish().map_err(|e| RenderError::Docx(e.to_string()))?;
    Ok(cursor.into_inner())
}

fn document_xml(header: &SowHeader, body: &str) -> String {
    let mut xml = String::from(DOCUMENT_OPEN);

    xml.push_str(&paragraph(style::TITLE, TITLE_RUN, true, 0, 240));
    xml.push_str(&paragraph(
        &format!("Client: {}", header.account_name),
        BODY_RUN,
        false,
        0,
        0,
    ));
    if let Some(company) = &header.company {
        xml.push_str(&paragraph(&format!("Company: {company}"), BODY_RUN, false, 0, 0));
    }
    if let Some(contact) = &header.contact {
        xml.push_str(&paragraph(&format!("Contact: {contact}"), BODY_RUN, false, 0, 0));
    }
    xml.push_str(&paragraph(
        &format!("Date: {}", header.date_label()),
        BODY_RUN,
        false,
        0,
        0,
    ));
    xml.push_str("<w:p/>");

    for block in classify(body) {
        match block {
            Block::Blank => xml.push_str("<w:p/>"),
            Block::SectionHeader { text } => {
                xml.push_str(&paragraph(&text, SECTION_RUN, false, 240, 120))
            }
            Block::Subheader { text } => {
                xml.push_str(&paragraph(&text, SUBHEADER_RUN, false, 180, 90))
            }
            Block::Body { text } => xml.push_str(&paragraph(&text, BODY_RUN, false, 0, 0)),
            Block::Table { headers, rows } => {
                xml.push_str(&table(&headers, &rows));
                // A table may not end the body; the spacer also separates it from what follows.
                xml.push_str("<w:p/>");
            }
        }
    }

    xml.push_str(SECTION_PROPERTIES);
    xml.push_str(DOCUMENT_CLOSE);
    xml
}

/// `before`/`after` are paragraph spacing in twentieths of a point.
fn paragraph(text: &str, run_style: RunStyle, centered: bool, before: u32, after: u32) -> String {
    let justification = if centered { r#"<w:jc w:val="center"/>"# } else { "" };
    format!(
        r#"<w:p><w:pPr><w:spacing w:before="{before}" w:after="{after}"/>{justification}</w:pPr>{}</w:p>"#,
        run(text, run_style)
    )
}

fn run(text: &str, run_style: RunStyle) -> String {
    let bold = if run_style.bold { "<w:b/>" } else { "" };
    format!(
        r#"<w:r><w:rPr><w:rFonts w:ascii="{font}" w:hAnsi="{font}" w:cs="{font}"/>{bold}<w:color w:val="{color}"/><w:sz w:val="{size}"/></w:rPr><w:t xml:space="preserve">{text}</w:t></w:r>"#,
        font = style::FONT_NAME,
        color = run_style.color.hex(),
        size = u32::from(run_style.size_pt) * 2,
        text = escape(xml_safe(text).as_str()),
    )
}

fn table(headers: &[String], rows: &[Vec<String>]) -> String {
    let columns = rows
        .iter()
        .map(Vec::len)
        .chain(std::iter::once(headers.len()))
        .max()
        .unwrap_or(0)
        .max(1);
    let column_width = TEXT_WIDTH_TWIPS / columns;
    let border_color = style::TABLE_BORDER.hex();

    let mut xml = String::from("<w:tbl><w:tblPr>");
    xml.push_str(r#"<w:tblW w:w="5000" w:type="pct"/><w:tblBorders>"#);
    for edge in ["top", "left", "bottom", "right", "insideH", "insideV"] {
        xml.push_str(&format!(
            r#"<w:{edge} w:val="single" w:sz="4" w:space="0" w:color="{border_color}"/>"#
        ));
    }
    xml.push_str("</w:tblBorders></w:tblPr><w:tblGrid>");
    for _ in 0..columns {
        xml.push_str(&format!(r#"<w:gridCol w:w="{column_width}"/>"#));
    }
    xml.push_str("</w:tblGrid>");

    xml.push_str(&table_row(headers, columns, column_width, true));
    for row in rows {
        xml.push_str(&table_row(row, columns, column_width, false));
    }

    xml.push_str("</w:tbl>");
    xml
}

/// Short rows are padded with empty cells so every row spans the grid.
fn table_row(cells: &[String], columns: usize, column_width: usize, is_header: bool) -> String {
    let mut xml = String::from("<w:tr>");
    for index in 0..columns {
        let text = cells.get(index).map(String::as_str).unwrap_or("");
        let shading = if is_header {
            format!(
                r#"<w:shd w:val="clear" w:color="auto" w:fill="{}"/>"#,
                style::ACCENT_A.hex()
            )
        } else {
            String::new()
        };
        let run_style = if is_header { TABLE_HEADER_RUN } else { BODY_RUN };
        xml.push_str(&format!(
            r#"<w:tc><w:tcPr><w:tcW w:w="{column_width}" w:type="dxa"/>{shading}</w:tcPr><w:p>{}</w:p></w:tc>"#,
            run(text, run_style)
        ));
    }
    xml.push_str("</w:tr>");
    xml
}

/// Drops control characters that XML 1.0 cannot carry.
fn xml_safe(text: &str) -> String {
    text.chars()
        .filter(|c| !c.is_control() || *c == '\t')
        .collect()
}
