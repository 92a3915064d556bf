//! Test frames: generation, table loading and normalization

pub mod generator;
pub mod normalize;
pub mod table;

pub use generator::generate_exhaustive;
pub use normalize::normalize;
pub use table::{generate_from_table, load_table, ParseError};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::partition::{
    Category, FileContent, FileExistence, FormatterChoice, LexerChoice, OutputMode,
};

/// A frame as produced by a source: column name to cell text, in column order.
///
/// Keys may be canonical or aliased and values may be the wildcard; nothing
/// downstream of [`normalize`] should look at one of these.
pub type RawFrame = IndexMap<String, String>;

/// Where a run's frames come from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FrameSource {
    /// Full cross-product of the partition model
    Exhaustive,
    /// Externally reduced table (e.g. ACTS all-pairs output)
    Table(std::path::PathBuf),
}

impl FrameSource {
    pub fn from_arg(table: Option<std::path::PathBuf>) -> Self {
        match table {
            Some(path) => FrameSource::Table(path),
            None => FrameSource::Exhaustive,
        }
    }

    /// Produce the raw frames for this source
    pub fn raw_frames(&self) -> Result<Vec<RawFrame>, ParseError> {
        match self {
            FrameSource::Exhaustive => Ok(generate_exhaustive()),
            FrameSource::Table(path) => load_table(path),
        }
    }

    pub fn describe(&self) -> String {
        match self {
            FrameSource::Exhaustive => "all combinations (exhaustive)".to_string(),
            FrameSource::Table(path) => format!("table {}", path.display()),
        }
    }
}

/// A normalized test frame: exactly one concrete category per dimension
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Frame {
    pub file_existence: FileExistence,
    pub file_content: FileContent,
    pub lexer: LexerChoice,
    pub formatter: FormatterChoice,
    pub output: OutputMode,
}

impl Frame {
    /// Whether the frame satisfies the only cross-partition rule:
    /// a missing file has empty content.
    pub fn is_consistent(&self) -> bool {
        self.file_existence == FileExistence::Exists || self.file_content == FileContent::Empty
    }

    /// Render back to a canonical raw frame
    pub fn to_raw(&self) -> RawFrame {
        let mut raw = RawFrame::new();
        insert(&mut raw, self.file_existence);
        insert(&mut raw, self.file_content);
        insert(&mut raw, self.lexer);
        insert(&mut raw, self.formatter);
        insert(&mut raw, self.output);
        raw
    }
}

fn insert<C: Category>(raw: &mut RawFrame, value: C) {
    raw.insert(C::DIMENSION.key().to_string(), value.as_str().to_string());
}

impl std::fmt::Display for Frame {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "File:{}, Content:{}, Lexer:{}, Formatter:{}, Output:{}",
            self.file_existence.as_str(),
            self.file_content.as_str(),
            self.lexer.as_str(),
            self.formatter.as_str(),
            self.output.as_str()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_frame_is_all_defaults() {
        let frame = Frame::default();
        assert_eq!(frame.file_existence, FileExistence::Missing);
        assert_eq!(frame.file_content, FileContent::Empty);
        assert_eq!(frame.lexer, LexerChoice::Omitted);
        assert_eq!(frame.formatter, FormatterChoice::Omitted);
        assert_eq!(frame.output, OutputMode::Stdout);
        assert!(frame.is_consistent());
    }

    #[test]
    fn test_missing_with_content_is_inconsistent() {
        let frame = Frame {
            file_content: FileContent::ValidSyntax,
            ..Frame::default()
        };
        assert!(!frame.is_consistent());
    }

    #[test]
    fn test_to_raw_uses_canonical_keys_in_order() {
        let raw = Frame::default().to_raw();
        let keys: Vec<_> = raw.keys().map(String::as_str).collect();
        assert_eq!(
            keys,
            vec!["file_existence", "file_content", "lexer", "formatter", "output"]
        );
        assert_eq!(raw["output"], "stdout");
    }

    #[test]
    fn test_display() {
        let frame = Frame {
            file_existence: FileExistence::Exists,
            file_content: FileContent::ValidSyntax,
            lexer: LexerChoice::ValidMatch,
            formatter: FormatterChoice::Valid,
            output: OutputMode::Stdout,
        };
        assert_eq!(
            frame.to_string(),
            "File:exists, Content:valid_syntax, Lexer:valid_match, Formatter:valid, Output:stdout"
        );
    }

    #[test]
    fn test_frame_source_from_arg() {
        assert_eq!(FrameSource::from_arg(None), FrameSource::Exhaustive);
        assert_eq!(
            FrameSource::from_arg(Some("pairs.csv".into())),
            FrameSource::Table("pairs.csv".into())
        );
    }
}
