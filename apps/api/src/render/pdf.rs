//! Paginated-document export through genpdf.
//!
//! Fonts are loaded per render from `FONT_DIR`, which expects the usual
//! `<family>-Regular.ttf` / `-Bold` / `-Italic` / `-BoldItalic` files.

use std::collections::VecDeque;

use genpdf::elements::{Break, CellDecorator, FrameCellDecorator, Paragraph, TableLayout};
use genpdf::render::Area;
use genpdf::style::{Color, Style, StyledString};
use genpdf::{Alignment, Context, Document, Element, Margins, Mm, Position, RenderResult, Size};

use crate::content::{classify, Block};
use crate::render::style::{self, Rgb};
use crate::render::{Capability, FontSource, RenderError, Renderer, SowHeader};

const PAGE_MARGIN_MM: i32 = 15;
const CELL_PADDING_MM: f64 = 1.5;
/// Below the default 1pt stroke width, so adjacent fill strokes overlap.
const FILL_STEP_MM: f64 = 0.3;

pub struct PdfRenderer {
    fonts: FontSource,
}

impl PdfRenderer {
    pub fn new(fonts: FontSource) -> Self {
        PdfRenderer { fonts }
    }

    fn document(&self) -> Result<Document, RenderError> {
        let family = genpdf::fonts::from_files(&self.fonts.dir, &self.fonts.family, None)
            .map_err(|e| {
                RenderError::Font(format!(
                    "{} in {}: {}",
                    self.fonts.family,
                    self.fonts.dir.display(),
                    e
                ))
            })?;

        let mut doc = Document::new(family);
        doc.set_title(style::TITLE);
        doc.set_font_size(style::BODY_SIZE);
        doc.set_line_spacing(1.25);

        let mut decorator = genpdf::SimplePageDecorator::new();
        decorator.set_margins(PAGE_MARGIN_MM);
        doc.set_page_decorator(decorator);

        Ok(doc)
    }
}

impl Renderer for PdfRenderer {
    fn capability(&self) -> Capability {
        Capability::PaginatedDocument
    }

    fn render(&self, header: &SowHeader, body: &str) -> Result<Vec<u8>, RenderError> {
        let mut doc = self.document()?;

        push_header_block(&mut doc, header);

        for block in classify(body) {
            match block {
                Block::Blank => doc.push(Break::new(1)),
                Block::SectionHeader { text } => {
                    doc.push(Break::new(0.5));
                    doc.push(Paragraph::new(StyledString::new(
                        text,
                        heading(style::ACCENT_A, style::SECTION_SIZE),
                    )));
                }
                Block::Subheader { text } => doc.push(Paragraph::new(StyledString::new(
                    text,
                    heading(style::ACCENT_B, style::SUBHEADER_SIZE),
                ))),
                Block::Body { text } => doc.push(Paragraph::new(text)),
                Block::Table { headers, rows } => {
                    doc.push(table(headers, rows)?);
                    doc.push(Break::new(1));
                }
            }
        }

        let mut bytes = Vec::new();
        doc.render(&mut bytes)
            .map_err(|e| RenderError::Pdf(e.to_string()))?;
        Ok(bytes)
    }
}

fn color(rgb: Rgb) -> Color {
    Color::Rgb(rgb.0, rgb.1, rgb.2)
}

fn heading(rgb: Rgb, size: u8) -> Style {
    Style::new().bold().with_font_size(size).with_color(color(rgb))
}

fn push_header_block(doc: &mut Document, header: &SowHeader) {
    doc.push(
        Paragraph::new(StyledString::new(
            style::TITLE,
            heading(style::TEXT, style::TITLE_SIZE),
        ))
        .aligned(Alignment::Center),
    );
    doc.push(Break::new(1));

    doc.push(Paragraph::new(format!("Client: {}", header.account_name)));
    if let Some(company) = &header.company {
        doc.push(Paragraph::new(format!("Company: {company}")));
    }
    if let Some(contact) = &header.contact {
        doc.push(Paragraph::new(format!("Contact: {contact}")));
    }
    doc.push(Paragraph::new(format!("Date: {}", header.date_label())));
    doc.push(Break::new(1));
}

/// Every row is padded to the widest row so genpdf accepts it.
fn table(headers: Vec<String>, rows: Vec<Vec<String>>) -> Result<TableLayout, RenderError> {
    let columns = rows
        .iter()
        .map(Vec::len)
        .chain(std::iter::once(headers.len()))
        .max()
        .unwrap_or(0)
        .max(1);

    let mut layout = TableLayout::new(vec![1; columns]);
    layout.set_cell_decorator(BorderDecorator {
        frame: FrameCellDecorator::new(true, true, false),
    });

    let mut header_row = layout.row();
    for index in 0..columns {
        header_row.push_element(ShadedCell::new(
            headers.get(index).cloned().unwrap_or_default(),
        ));
    }
    header_row
        .push()
        .map_err(|e| RenderError::Pdf(e.to_string()))?;

    for row in rows {
        let mut table_row = layout.row();
        for index in 0..columns {
            let text = row.get(index).cloned().unwrap_or_default();
            table_row.push_element(Paragraph::new(text).padded(Margins::all(CELL_PADDING_MM)));
        }
        table_row
            .push()
            .map_err(|e| RenderError::Pdf(e.to_string()))?;
    }

    Ok(layout)
}

/// Frame lines in the table border colour. Cell text keeps its own colour.
struct BorderDecorator {
    frame: FrameCellDecorator,
}

impl CellDecorator for BorderDecorator {
    fn set_table_size(&mut self, num_columns: usize, num_rows: usize) {
        self.frame.set_table_size(num_columns, num_rows);
    }

    fn decorate_cell(
        &mut self,
        column: usize,
        row: usize,
        has_more: bool,
        area: Area<'_>,
        cell_style: Style,
    ) {
        let border = cell_style.and(color(style::TABLE_BORDER));
        self.frame.decorate_cell(column, row, has_more, area, border);
    }
}

/// Table header cell: white bold text on an accent-filled background.
///
/// The text is wrapped on first render and the lines still to print are kept,
/// so a cell split across pages resumes where it stopped.
struct ShadedCell {
    text: String,
    lines: Option<VecDeque<String>>,
}

impl ShadedCell {
    fn new(text: String) -> Self {
        ShadedCell { text, lines: None }
    }
}

impl Element for ShadedCell {
    fn render(
        &mut self,
        context: &Context,
        area: Area<'_>,
        cell_style: Style,
    ) -> Result<RenderResult, genpdf::error::Error> {
        let padding = Mm::from(CELL_PADDING_MM);
        let size = area.size();
        let text_style =
            cell_style.and(Style::new().bold().with_color(color(style::INVERSE_TEXT)));

        let text = &self.text;
        let lines = self.lines.get_or_insert_with(|| {
            wrap_words(text, size.width - padding * 2.0, |s| {
                text_style.str_width(&context.font_cache, s)
            })
        });

        let line_height = text_style.line_height(&context.font_cache);
        let fits = |count: usize| padding * 2.0 + line_height * count as f64 <= size.height;
        let mut fitted = 0;
        while fitted < lines.len() && fits(fitted + 1) {
            fitted += 1;
        }

        let mut result = RenderResult::default();
        if fitted == 0 {
            result.has_more = !lines.is_empty();
            return Ok(result);
        }

        // The fill goes down first; text printed afterwards on the same layer sits on top.
        let height = padding * 2.0 + line_height * fitted as f64;
        let fill = Style::new().with_color(color(style::ACCENT_A));
        for y in fill_offsets(height) {
            area.draw_line(vec![Position::new(0, y), Position::new(size.width, y)], fill);
        }

        for (index, line) in lines.drain(..fitted).enumerate() {
            let position = Position::new(padding, padding + line_height * index as f64);
            area.print_str(&context.font_cache, position, text_style, line)?;
        }

        result.size = Size::new(size.width, height);
        result.has_more = !lines.is_empty();
        Ok(result)
    }
}

/// Vertical offsets of the horizontal strokes that paint a filled band of `height`.
fn fill_offsets(height: Mm) -> Vec<Mm> {
    let height = f64::from(height);
    if height <= 0.0 {
        return Vec::new();
    }
    let steps = (height / FILL_STEP_MM).ceil() as usize;
    (0..=steps)
        .map(|step| Mm::from((step as f64 * FILL_STEP_MM).min(height)))
        .collect()
}

/// Greedy word wrap. Always yields at least one line; a word wider than
/// `max_width` gets a line of its own.
fn wrap_words(text: &str, max_width: Mm, width_of: impl Fn(&str) -> Mm) -> VecDeque<String> {
    let mut lines = VecDeque::new();
    let mut current = String::new();
    for word in text.split_whitespace() {
        if current.is_empty() {
            current.push_str(word);
            continue;
        }
        let candidate = format!("{current} {word}");
        if width_of(&candidate) <= max_width {
            current = candidate;
        } else {
            lines.push_back(std::mem::replace(&mut current, word.to_string()));
        }
    }
    lines.push_back(current);
    lines
}
