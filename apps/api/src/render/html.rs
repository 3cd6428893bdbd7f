//! HTML fragment for the on-screen SOW preview, styled inline from the same
//! contract as the document exports.

use quick_xml::escape::escape;

use crate::content::{classify, Block};
use crate::render::style;

pub fn render_fragment(body: &str) -> String {
    let mut html = String::from(r#"<div class="sow-preview">"#);

    for block in classify(body) {
        match block {
            Block::Blank => html.push_str("<br>"),
            Block::SectionHeader { text } => html.push_str(&format!(
                r#"<h2 style="color:#{};font-size:{}pt;font-weight:bold;">{}</h2>"#,
                style::ACCENT_A.hex(),
                style::SECTION_SIZE,
                escape(text.as_str())
            )),
            Block::Subheader { text } => html.push_str(&format!(
                r#"<h3 style="color:#{};font-size:{}pt;font-weight:bold;">{}</h3>"#,
                style::ACCENT_B.hex(),
                style::SUBHEADER_SIZE,
                escape(text.as_str())
            )),
            Block::Body { text } => {
                html.push_str(&format!("<p>{}</p>", escape(text.as_str())))
            }
            Block::Table { headers, rows } => html.push_str(&table(&headers, &rows)),
        }
    }

    html.push_str("</div>");
    html
}

fn table(headers: &[String], rows: &[Vec<String>]) -> String {
    let border = format!("border:1px solid #{};padding:6px;", style::TABLE_BORDER.hex());
    let mut html = String::from(r#"<table style="border-collapse:collapse;width:100%;"><thead><tr>"#);

    for cell in headers {
        html.push_str(&format!(
            r#"<th style="{border}background:#{};color:#{};font-weight:bold;">{}</th>"#,
            style::ACCENT_A.hex(),
            style::INVERSE_TEXT.hex(),
            escape(cell.as_str())
        ));
    }
    html.push_str("</tr></thead><tbody>");

    for row in rows {
        html.push_str("<tr>");
        for cell in row {
            html.push_str(&format!(r#"<td style="{border}">{}</td>"#, escape(cell.as_str())));
        }
        html.push_str("</tr>");
    }

    html.push_str("</tbody></table>");
    html
}
