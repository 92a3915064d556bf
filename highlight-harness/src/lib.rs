//! Combinatorial test harness for command-line syntax highlighters
//!
//! This crate partitions the input space of a highlighter such as
//! `pygmentize` into categories, turns combinations of those categories into
//! concrete invocations and classifies how the tool responds to each.
//!
//! # Features
//!
//! - Exhaustive generation over five partitioned dimensions
//! - Loading of externally reduced frame tables (e.g. ACTS pairwise output)
//! - Alias- and wildcard-tolerant normalization into typed frames
//! - Timeout-bounded execution with PASS / CAUGHT_ERROR / CRASH_FAIL outcomes
//! - Console and JSON reports with per-frame expectations
//!
//! # Example
//!
//! ```no_run
//! use highlight_harness::{
//!     config::Config,
//!     frames::FrameSource,
//!     reporting::print_console_report,
//!     runner::{ConsoleProgress, Harness},
//! };
//!
//! #[tokio::main]
//! async fn main() {
//!     let config = Config::load_or_default();
//!     let frames = FrameSource::Exhaustive.raw_frames().unwrap();
//!
//!     let harness = Harness::new(&config);
//!     let reports = harness.run(&frames, &ConsoleProgress).await;
//!     print_console_report(&reports);
//! }
//! ```

pub mod command;
pub mod config;
pub mod error;
pub mod fixture;
pub mod frames;
pub mod partition;
pub mod reporting;
pub mod runner;

pub use config::Config;
pub use error::{HarnessError, Result};

/// Prelude module for common imports
pub mod prelude {
    pub use crate::command::CommandBuilder;
    pub use crate::config::{Config, FlagValues, HarnessPaths, ToolConfig};
    pub use crate::error::{HarnessError, Result};
    pub use crate::fixture::FixtureBuilder;
    pub use crate::frames::{
        generate_exhaustive, generate_from_table, load_table, normalize, Frame, FrameSource,
        ParseError, RawFrame,
    };
    pub use crate::partition::{
        Category, Dimension, FileContent, FileExistence, FormatterChoice, LexerChoice, OutputMode,
    };
    pub use crate::reporting::{print_console_report, JsonSummary, RunSummary};
    pub use crate::runner::{
        ConsoleProgress, Executor, ExecutorConfig, Expectation, FrameReport, FrameStatus,
        Harness, NoOpProgress, Outcome, ProgressCallback,
    };
}
