//! Frame-to-argument-vector mapping

use std::path::Path;

use crate::config::{FlagValues, HarnessPaths};
use crate::error::{HarnessError, Result};
use crate::frames::Frame;
use crate::partition::{FormatterChoice, LexerChoice, OutputMode};

pub const LEXER_FLAG: &str = "-l";
pub const FORMATTER_FLAG: &str = "-f";
pub const OUTPUT_FLAG: &str = "-o";

/// Builds `[-l <lexer>] [-f <formatter>] [-o <output>] <input>`
#[derive(Debug, Clone)]
pub struct CommandBuilder {
    paths: HarnessPaths,
    values: FlagValues,
}

impl CommandBuilder {
    pub fn new(paths: HarnessPaths, values: FlagValues) -> Self {
        Self { paths, values }
    }

    /// Arguments for `frame`, excluding the program name. The fixture path
    /// is always the last token.
    pub fn build(&self, frame: &Frame, fixture: &Path) -> Result<Vec<String>> {
        let mut args = Vec::new();

        let lexer = match frame.lexer {
            LexerChoice::Omitted => None,
            LexerChoice::ValidMatch => Some(&self.values.lexer_match),
            LexerChoice::ValidMismatch => Some(&self.values.lexer_mismatch),
            LexerChoice::Invalid => Some(&self.values.lexer_invalid),
        };
        if let Some(name) = lexer {
            args.push(LEXER_FLAG.to_string());
            args.push(name.clone());
        }

        let formatter = match frame.formatter {
            FormatterChoice::Omitted => None,
            FormatterChoice::Valid => Some(&self.values.formatter_valid),
            FormatterChoice::Invalid => Some(&self.values.formatter_invalid),
        };
        if let Some(name) = formatter {
            args.push(FORMATTER_FLAG.to_string());
            args.push(name.clone());
        }

        let output = match frame.output {
            OutputMode::Stdout => None,
            OutputMode::FilePath => Some(&self.paths.output),
            OutputMode::Restricted => Some(&self.paths.restricted_output),
        };
        if let Some(path) = output {
            args.push(OUTPUT_FLAG.to_string());
            args.push(path_arg(path)?);
        }

        args.push(path_arg(fixture)?);
        Ok(args)
    }
}

fn path_arg(path: &Path) -> Result<String> {
    path.to_str()
        .map(str::to_string)
        .ok_or_else(|| HarnessError::config(format!("path is not valid UTF-8: {}", path.display())))
}
