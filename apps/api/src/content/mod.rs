//! Content Model: line classification for generated SOW bodies.
//!
//! Every styled renderer (PDF, DOCX, HTML preview) consumes the `Block` stream
//! produced here; none of them inspects raw lines itself.
//!
//! Rules, in priority order per line:
//! 1. blank (empty or whitespace-only)
//! 2. table: a run of at least two lines whose trimmed text starts with `|`;
//!    row 1 = headers, row 2 = separator (dropped unchecked), the rest = data rows
//! 3. section header: `# ` / `## ` prefix, or an all-caps line of 3+ characters
//!    with an optional trailing colon
//! 4. subheader: `### ` / `#### ` prefix, or a line wrapped in `**...**`
//! 5. body text, verbatim

use std::iter::Peekable;
use std::str::Split;
use std::sync::LazyLock;

use regex::Regex;

static SECTION_MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^#{1,2}\s+").expect("valid section marker regex"));
static SUBHEADER_MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^#{3,4}\s+").expect("valid subheader marker regex"));
static ALL_CAPS_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Z ]{3,}:?$").expect("valid all-caps regex"));
static BOLD_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\*\*.*\*\*$").expect("valid bold regex"));

/// One classified unit of document content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Block {
    Blank,
    Table {
        headers: Vec<String>,
        rows: Vec<Vec<String>>,
    },
    SectionHeader { text: String },
    Subheader { text: String },
    Body { text: String },
}

/// Lazily classifies `body` line by line.
pub fn classify(body: &str) -> Blocks<'_> {
    Blocks {
        lines: (!body.is_empty()).then(|| body.split('\n').peekable()),
    }
}

/// Iterator over the blocks of one body. Finite and not restartable.
#[derive(Debug)]
pub struct Blocks<'a> {
    lines: Option<Peekable<Split<'a, char>>>,
}

impl Iterator for Blocks<'_> {
    type Item = Block;

    fn next(&mut self) -> Option<Block> {
        let lines = self.lines.as_mut()?;
        let line = strip_cr(lines.next()?);

        if line.trim().is_empty() {
            return Some(Block::Blank);
        }

        if is_table_row(line) {
            let mut run = vec![line];
            while let Some(next) = lines.next_if(|l| is_table_row(l)) {
                run.push(strip_cr(next));
            }
            if run.len() >= 2 {
                return Some(Block::Table {
                    headers: split_cells(run[0]),
                    rows: run[2..].iter().map(|row| split_cells(row)).collect(),
                });
            }
        }

        Some(classify_line(line))
    }
}

fn strip_cr(line: &str) -> &str {
    line.strip_suffix('\r').unwrap_or(line)
}

fn is_table_row(line: &str) -> bool {
    line.trim().starts_with('|')
}

/// Splits a table row on `|`, trimming cells and dropping empty ones.
fn split_cells(row: &str) -> Vec<String> {
    row.split('|')
        .map(str::trim)
        .filter(|cell| !cell.is_empty())
        .map(str::to_string)
        .collect()
}

/// Classifies a single non-blank, non-table line.
fn classify_line(line: &str) -> Block {
    let trimmed = line.trim();

    if SECTION_MARKER.is_match(line) {
        let text = SECTION_MARKER.replace(line, "");
        return Block::SectionHeader {
            text: text.trim().to_string(),
        };
    }

    if ALL_CAPS_LINE.is_match(trimmed) {
        let text = trimmed.strip_suffix(':').unwrap_or(trimmed);
        return Block::SectionHeader {
            text: text.trim().to_string(),
        };
    }

    if SUBHEADER_MARKER.is_match(line) || BOLD_LINE.is_match(trimmed) {
        let text = SUBHEADER_MARKER.replace(line, "").replace("**", "");
        return Block::Subheader {
            text: text.trim().to_string(),
        };
    }

    Block::Body {
        text: line.to_string(),
    }
}
