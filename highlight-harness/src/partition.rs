//! Partition model: the input dimensions and their category values
//!
//! This is the only place categories, their spellings and their aliases are
//! declared. Both frame sources and the normalizer read from here.

use serde::{Deserialize, Serialize};

/// Table cell value meaning "no constraint"
pub const WILDCARD: &str = "*";

/// Spelling accepted by every dimension for its default category
pub const OMITTED: &str = "omitted";

/// Input dimensions, in declaration order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Dimension {
    FileExistence,
    FileContent,
    Lexer,
    Formatter,
    Output,
}

impl Dimension {
    pub fn all() -> [Dimension; 5] {
        [
            Dimension::FileExistence,
            Dimension::FileContent,
            Dimension::Lexer,
            Dimension::Formatter,
            Dimension::Output,
        ]
    }

    /// Canonical column name
    pub fn key(&self) -> &'static str {
        match self {
            Dimension::FileExistence => "file_existence",
            Dimension::FileContent => "file_content",
            Dimension::Lexer => "lexer",
            Dimension::Formatter => "formatter",
            Dimension::Output => "output",
        }
    }

    /// Short column name accepted in place of the canonical one
    pub fn alias(&self) -> &'static str {
        match self {
            Dimension::FileExistence => "file",
            Dimension::FileContent => "content",
            Dimension::Lexer => "lexer_flag",
            Dimension::Formatter => "formatter_flag",
            Dimension::Output => "output_mode",
        }
    }

    /// Declared category values, in order
    pub fn categories(&self) -> Vec<&'static str> {
        match self {
            Dimension::FileExistence => names(FileExistence::all()),
            Dimension::FileContent => names(FileContent::all()),
            Dimension::Lexer => names(LexerChoice::all()),
            Dimension::Formatter => names(FormatterChoice::all()),
            Dimension::Output => names(OutputMode::all()),
        }
    }

    /// Category used for wildcards and absent columns
    pub fn default_category(&self) -> &'static str {
        match self {
            Dimension::FileExistence => FileExistence::default().as_str(),
            Dimension::FileContent => FileContent::default().as_str(),
            Dimension::Lexer => LexerChoice::default().as_str(),
            Dimension::Formatter => FormatterChoice::default().as_str(),
            Dimension::Output => OutputMode::default().as_str(),
        }
    }
}

impl std::fmt::Display for Dimension {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.key())
    }
}

/// A named dimension together with its legal categories
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Partition {
    pub dimension: Dimension,
    pub categories: Vec<&'static str>,
}

/// The full input space, in declaration order
pub fn partitions() -> Vec<Partition> {
    Dimension::all()
        .into_iter()
        .map(|dimension| Partition {
            dimension,
            categories: dimension.categories(),
        })
        .collect()
}

/// Common behaviour of the per-dimension category enums
pub trait Category: Copy + Default + std::str::FromStr<Err = String> + 'static {
    const DIMENSION: Dimension;

    fn all() -> &'static [Self];

    fn as_str(&self) -> &'static str;
}

fn names<C: Category>(all: &[C]) -> Vec<&'static str> {
    all.iter().map(|c| c.as_str()).collect()
}

/// Whether the input file is present on disk
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FileExistence {
    Exists,
    #[default]
    Missing,
}

impl Category for FileExistence {
    const DIMENSION: Dimension = Dimension::FileExistence;

    fn all() -> &'static [Self] {
        &[FileExistence::Exists, FileExistence::Missing]
    }

    fn as_str(&self) -> &'static str {
        match self {
            FileExistence::Exists => "exists",
            FileExistence::Missing => "missing",
        }
    }
}

impl std::str::FromStr for FileExistence {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "exists" => Ok(FileExistence::Exists),
            "missing" | OMITTED => Ok(FileExistence::Missing),
            _ => Err(format!("Unknown file existence: {}", s)),
        }
    }
}

/// What the fixture file contains
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FileContent {
    #[default]
    Empty,
    ValidSyntax,
    InvalidSyntax,
    RandomText,
}

impl FileContent {
    /// Bytes written to the fixture for this category
    pub fn body(&self) -> &'static str {
        match self {
            FileContent::Empty => "",
            FileContent::ValidSyntax => "print('hello')",
            // missing closing parenthesis
            FileContent::InvalidSyntax => "print('hello'",
            FileContent::RandomText => "This is not code, just a normal sentence.",
        }
    }
}

impl Category for FileContent {
    const DIMENSION: Dimension = Dimension::FileContent;

    fn all() -> &'static [Self] {
        &[
            FileContent::Empty,
            FileContent::ValidSyntax,
            FileContent::InvalidSyntax,
            FileContent::RandomText,
        ]
    }

    fn as_str(&self) -> &'static str {
        match self {
            FileContent::Empty => "empty",
            FileContent::ValidSyntax => "valid_syntax",
            FileContent::InvalidSyntax => "invalid_syntax",
            FileContent::RandomText => "random_text",
        }
    }
}

impl std::str::FromStr for FileContent {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "empty" | OMITTED => Ok(FileContent::Empty),
            "valid_syntax" | "valid_py" => Ok(FileContent::ValidSyntax),
            "invalid_syntax" | "invalid_py" => Ok(FileContent::InvalidSyntax),
            "random_text" => Ok(FileContent::RandomText),
            _ => Err(format!("Unknown file content: {}", s)),
        }
    }
}

/// How the `-l` flag is chosen
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LexerChoice {
    #[default]
    Omitted,
    ValidMatch,
    ValidMismatch,
    Invalid,
}

impl Category for LexerChoice {
    const DIMENSION: Dimension = Dimension::Lexer;

    fn all() -> &'static [Self] {
        &[
            LexerChoice::Omitted,
            LexerChoice::ValidMatch,
            LexerChoice::ValidMismatch,
            LexerChoice::Invalid,
        ]
    }

    fn as_str(&self) -> &'static str {
        match self {
            LexerChoice::Omitted => OMITTED,
            LexerChoice::ValidMatch => "valid_match",
            LexerChoice::ValidMismatch => "valid_mismatch",
            LexerChoice::Invalid => "invalid",
        }
    }
}

impl std::str::FromStr for LexerChoice {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            OMITTED => Ok(LexerChoice::Omitted),
            "valid_match" => Ok(LexerChoice::ValidMatch),
            "valid_mismatch" => Ok(LexerChoice::ValidMismatch),
            "invalid" => Ok(LexerChoice::Invalid),
            _ => Err(format!("Unknown lexer choice: {}", s)),
        }
    }
}

/// How the `-f` flag is chosen
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FormatterChoice {
    #[default]
    Omitted,
    Valid,
    Invalid,
}

impl Category for FormatterChoice {
    const DIMENSION: Dimension = Dimension::Formatter;

    fn all() -> &'static [Self] {
        &[
            FormatterChoice::Omitted,
            FormatterChoice::Valid,
            FormatterChoice::Invalid,
        ]
    }

    fn as_str(&self) -> &'static str {
        match self {
            FormatterChoice::Omitted => OMITTED,
            FormatterChoice::Valid => "valid",
            FormatterChoice::Invalid => "invalid",
        }
    }
}

impl std::str::FromStr for FormatterChoice {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            OMITTED => Ok(FormatterChoice::Omitted),
            "valid" => Ok(FormatterChoice::Valid),
            "invalid" => Ok(FormatterChoice::Invalid),
            _ => Err(format!("Unknown formatter choice: {}", s)),
        }
    }
}

/// Where the tool is told to write
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputMode {
    #[default]
    Stdout,
    FilePath,
    Restricted,
}

impl Category for OutputMode {
    const DIMENSION: Dimension = Dimension::Output;

    fn all() -> &'static [Self] {
        &[OutputMode::Stdout, OutputMode::FilePath, OutputMode::Restricted]
    }

    fn as_str(&self) -> &'static str {
        match self {
            OutputMode::Stdout => "stdout",
            OutputMode::FilePath => "file_path",
            OutputMode::Restricted => "restricted",
        }
    }
}

impl std::str::FromStr for OutputMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "stdout" | OMITTED => Ok(OutputMode::Stdout),
            "file_path" => Ok(OutputMode::FilePath),
            "restricted" => Ok(OutputMode::Restricted),
            _ => Err(format!("Unknown output mode: {}", s)),
        }
    }
}
