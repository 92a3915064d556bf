//! Frame loading from comma-separated tables (ACTS all-pairs exports)

use std::path::Path;

use super::RawFrame;
use crate::partition::Dimension;

const COMMENT_MARKER: char = '#';
const SEPARATOR: char = ',';
const QUOTE: char = '"';

/// Error type for table loading
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Missing header row")]
    MissingHeader,

    #[error("Invalid header: {0}")]
    InvalidHeader(String),

    #[error("Line {line}: {message}")]
    MalformedRow { line: usize, message: String },

    #[error("Table has a header but no frames")]
    Empty,
}

/// Load frames from a table file
pub fn load_table(path: impl AsRef<Path>) -> Result<Vec<RawFrame>, ParseError> {
    let path = path.as_ref();
    tracing::info!("Loading all-pairs frames from {}", path.display());
    let content = std::fs::read_to_string(path)?;
    generate_from_table(&content)
}

/// Parse frames from table text.
///
/// Comment lines (leading `#`) and blank lines are skipped. The first
/// remaining line names the columns; every later line is one frame, kept in
/// file order. Cells may be double-quoted. Header names are matched without
/// regard to case, and a header naming no dimension is rejected. Rows are
/// taken as-is: the cross-partition rule is not applied.
pub fn generate_from_table(content: &str) -> Result<Vec<RawFrame>, ParseError> {
    let content = content.strip_prefix('\u{feff}').unwrap_or(content);

    let mut rows = content
        .lines()
        .enumerate()
        .map(|(idx, line)| (idx + 1, line.trim()))
        .filter(|(_, line)| !line.is_empty() && !line.starts_with(COMMENT_MARKER));

    let (_, header_line) = rows.next().ok_or(ParseError::MissingHeader)?;
    let header = parse_header(header_line)?;

    let mut frames = Vec::new();
    for (line, text) in rows {
        frames.push(parse_row(&header, line, text)?);
    }

    if frames.is_empty() {
        return Err(ParseError::Empty);
    }

    tracing::debug!("Parsed {} frames over columns {:?}", frames.len(), header);
    Ok(frames)
}

/// Split a line into trimmed cells, honouring double-quoted fields.
///
/// Inside quotes a comma is literal and `""` is an escaped quote.
fn split_cells(line: &str) -> Result<Vec<String>, String> {
    let mut cells = Vec::new();
    let mut cell = String::new();
    let mut quoted = false;
    let mut chars = line.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            QUOTE if quoted && chars.peek() == Some(&QUOTE) => {
                cell.push(QUOTE);
                chars.next();
            }
            QUOTE if quoted => quoted = false,
            QUOTE if cell.trim().is_empty() => {
                cell.clear();
                quoted = true;
            }
            SEPARATOR if !quoted => {
                cells.push(cell.trim().to_string());
                cell.clear();
            }
            _ => cell.push(c),
        }
    }

    if quoted {
        return Err("unterminated quoted cell".to_string());
    }
    cells.push(cell.trim().to_string());
    Ok(cells)
}

fn parse_header(line: &str) -> Result<Vec<String>, ParseError> {
    let mut header: Vec<String> = Vec::new();

    for (idx, name) in split_cells(line)
        .map_err(ParseError::InvalidHeader)?
        .into_iter()
        .enumerate()
    {
        let name = name.to_lowercase();
        if name.is_empty() {
            return Err(ParseError::InvalidHeader(format!("column {} has no name", idx + 1)));
        }
        if header.contains(&name) {
            return Err(ParseError::InvalidHeader(format!("duplicate column `{}`", name)));
        }
        header.push(name);
    }

    let unknown: Vec<&str> = header
        .iter()
        .map(String::as_str)
        .filter(|name| !Dimension::all().iter().any(|d| d.key() == *name || d.alias() == *name))
        .collect();

    if unknown.len() == header.len() {
        return Err(ParseError::InvalidHeader(format!(
            "no known column in `{}` (expected any of: {})",
            line,
            Dimension::all()
                .iter()
                .map(|d| d.key())
                .collect::<Vec<_>>()
                .join(", ")
        )));
    }
    if !unknown.is_empty() {
        tracing::warn!("Ignoring unknown table columns: {}", unknown.join(", "));
    }

    Ok(header)
}

fn parse_row(header: &[String], line: usize, text: &str) -> Result<RawFrame, ParseError> {
    let cells = split_cells(text).map_err(|message| ParseError::MalformedRow { line, message })?;

    if let Some(extra) = cells.iter().skip(header.len()).find(|c| !c.is_empty()) {
        return Err(ParseError::MalformedRow {
            line,
            message: format!(
                "{} cells for {} columns (unexpected `{}`)",
                cells.len(),
                header.len(),
                extra
            ),
        });
    }

    Ok(header.iter().cloned().zip(cells).collect())
}
