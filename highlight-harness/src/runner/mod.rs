//! Frame execution engine
//!
//! Frames are processed strictly one after another: the fixture and output
//! paths are shared by every frame and are reset before and after each one.

pub mod executor;

pub use executor::{Executor, ExecutorConfig, InvocationResult, Outcome};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::command::CommandBuilder;
use crate::config::{Config, HarnessPaths};
use crate::error::{HarnessError, Result};
use crate::fixture::FixtureBuilder;
use crate::frames::{normalize, Frame, RawFrame};
use crate::partition::{FileExistence, FormatterChoice, LexerChoice, OutputMode};

/// What a well-behaved tool should do with a frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Expectation {
    Pass,
    Error,
}

impl Expectation {
    /// A frame should pass unless it names a missing file, a bogus lexer or
    /// formatter, or an unwritable output path.
    pub fn for_frame(frame: &Frame) -> Self {
        let rejected = frame.file_existence == FileExistence::Missing
            || frame.lexer == LexerChoice::Invalid
            || frame.formatter == FormatterChoice::Invalid
            || frame.output == OutputMode::Restricted;
        if rejected {
            Expectation::Error
        } else {
            Expectation::Pass
        }
    }

    /// `None` when the outcome says nothing about the tool (a crash)
    pub fn is_met_by(&self, outcome: &Outcome) -> Option<bool> {
        match (self, outcome) {
            (_, Outcome::CrashFail { .. }) => None,
            (Expectation::Pass, Outcome::Pass) => Some(true),
            (Expectation::Error, Outcome::CaughtError { .. }) => Some(true),
            _ => Some(false),
        }
    }
}

/// How far a frame got
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FrameStatus {
    /// The tool was invoked
    Executed { result: InvocationResult },
    /// The frame could not be turned into an invocation
    Error { message: String },
}

/// Record of one frame's run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FrameReport {
    /// 1-based position in the run
    pub index: usize,
    pub frame: Option<Frame>,
    pub args: Vec<String>,
    pub command_line: String,
    pub expectation: Option<Expectation>,
    pub status: FrameStatus,
    pub timestamp: DateTime<Utc>,
}

impl FrameReport {
    fn error(index: usize, frame: Option<Frame>, error: HarnessError) -> Self {
        Self {
            index,
            frame,
            args: Vec::new(),
            command_line: String::new(),
            expectation: frame.as_ref().map(Expectation::for_frame),
            status: FrameStatus::Error {
                message: error.to_string(),
            },
            timestamp: Utc::now(),
        }
    }

    pub fn outcome(&self) -> Option<&Outcome> {
        match &self.status {
            FrameStatus::Executed { result } => Some(&result.outcome),
            FrameStatus::Error { .. } => None,
        }
    }

    /// The tool answered, but not the way the frame predicts
    pub fn is_unexpected(&self) -> bool {
        match (self.expectation, self.outcome()) {
            (Some(expectation), Some(outcome)) => expectation.is_met_by(outcome) == Some(false),
            _ => false,
        }
    }

    /// Anything other than a clean, expected answer from the tool
    pub fn needs_attention(&self) -> bool {
        match &self.status {
            FrameStatus::Error { .. } => true,
            FrameStatus::Executed { result } => result.outcome.is_crash() || self.is_unexpected(),
        }
    }
}

/// Progress callback for tracking execution
pub trait ProgressCallback: Send + Sync {
    fn on_frame_start(&self, index: usize, total: usize, command_line: &str);
    fn on_frame_complete(&self, report: &FrameReport);
}

/// Default no-op progress callback
pub struct NoOpProgress;

impl ProgressCallback for NoOpProgress {
    fn on_frame_start(&self, _index: usize, _total: usize, _command_line: &str) {}
    fn on_frame_complete(&self, _report: &FrameReport) {}
}

/// Console progress callback
pub struct ConsoleProgress;

impl ProgressCallback for ConsoleProgress {
    fn on_frame_start(&self, index: usize, _total: usize, command_line: &str) {
        println!("Test #{}: {}", index, command_line);
    }

    fn on_frame_complete(&self, report: &FrameReport) {
        match &report.status {
            FrameStatus::Executed { result } => {
                let marker = if report.is_unexpected() { " [UNEXPECTED]" } else { "" };
                println!("Result: {}{}", result.outcome, marker);
                if report.needs_attention() && !result.stderr.trim().is_empty() {
                    println!("  stderr: {}", result.stderr.trim());
                }
            }
            FrameStatus::Error { message } => {
                println!("Test #{}: ERROR - {}", report.index, message);
            }
        }
        println!();
    }
}

/// A frame ready to run: normalized, with its argument vector
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedFrame {
    pub frame: Frame,
    pub args: Vec<String>,
}

/// Drives frames through fixture, command, execution and cleanup
pub struct Harness {
    paths: HarnessPaths,
    fixtures: FixtureBuilder,
    commands: CommandBuilder,
    executor: Executor,
}

impl Harness {
    pub fn new(config: &Config) -> Self {
        Self {
            paths: config.paths.clone(),
            fixtures: FixtureBuilder::new(config.paths.clone()),
            commands: CommandBuilder::new(config.paths.clone(), config.values.clone()),
            executor: Executor::new(config.tool.clone().into()),
        }
    }

    pub fn program(&self) -> &str {
        self.executor.program()
    }

    /// Normalize a frame and build its arguments without touching the
    /// filesystem
    pub fn plan(&self, raw: &RawFrame) -> Result<PlannedFrame> {
        let frame = normalize(raw)?;
        let fixture = self.fixtures.path_for(&frame);
        let args = self.commands.build(&frame, fixture)?;
        Ok(PlannedFrame { frame, args })
    }

    /// Render `program args...` for display
    pub fn command_line(&self, args: &[String]) -> String {
        std::iter::once(self.program())
            .chain(args.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Run a single frame. Never fails: problems are recorded in the report.
    pub async fn run_frame(
        &self,
        index: usize,
        total: usize,
        raw: &RawFrame,
        progress: &dyn ProgressCallback,
    ) -> FrameReport {
        // No leftovers from a previous frame may be visible to this one
        Executor::cleanup(&self.paths);

        let frame = match normalize(raw) {
            Ok(frame) => frame,
            Err(e) => {
                tracing::error!("Frame {} rejected: {}", index, e);
                return FrameReport::error(index, None, e);
            }
        };

        let report = self.invoke(index, total, frame, progress).await;
        Executor::cleanup(&self.paths);
        report
    }

    async fn invoke(
        &self,
        index: usize,
        total: usize,
        frame: Frame,
        progress: &dyn ProgressCallback,
    ) -> FrameReport {
        let fixture = match self.fixtures.build(&frame) {
            Ok(path) => path,
            Err(e) => {
                tracing::error!("Frame {}: fixture setup failed: {}", index, e);
                return FrameReport::error(index, Some(frame), e);
            }
        };

        let args = match self.commands.build(&frame, &fixture) {
            Ok(args) => args,
            Err(e) => {
                tracing::error!("Frame {}: {}", index, e);
                return FrameReport::error(index, Some(frame), e);
            }
        };

        let command_line = self.command_line(&args);
        tracing::debug!("Frame {} ({}): {}", index, frame, command_line);
        progress.on_frame_start(index, total, &command_line);

        let result = self.executor.execute(&args).await;
        if result.outcome.is_crash() {
            tracing::warn!("Frame {}: {}", index, result.outcome);
        } else {
            tracing::info!("Frame {}: {}", index, result.outcome);
        }

        FrameReport {
            index,
            frame: Some(frame),
            args,
            command_line,
            expectation: Some(Expectation::for_frame(&frame)),
            status: FrameStatus::Executed { result },
            timestamp: Utc::now(),
        }
    }

    /// Run every frame in order
    pub async fn run(&self, frames: &[RawFrame], progress: &dyn ProgressCallback) -> Vec<FrameReport> {
        let total = frames.len();
        let mut reports = Vec::with_capacity(total);

        for (i, raw) in frames.iter().enumerate() {
            let report = self.run_frame(i + 1, total, raw, progress).await;
            progress.on_frame_complete(&report);
            reports.push(report);
        }

        reports
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::partition::FileContent;

    fn config_in(dir: &std::path::Path, program: &str) -> Config {
        let mut config = Config::default();
        config.paths = HarnessPaths::in_dir(dir);
        config.tool.program = program.to_string();
        config.tool.timeout_ms = 5_000;
        config
    }

    fn raw(pairs: &[(&str, &str)]) -> RawFrame {
        pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
    }

    #[test]
    fn test_expectation_for_frame() {
        let good = Frame {
            file_existence: FileExistence::Exists,
            file_content: FileContent::InvalidSyntax,
            lexer: LexerChoice::ValidMismatch,
            ..Frame::default()
        };
        assert_eq!(Expectation::for_frame(&good), Expectation::Pass);
        assert_eq!(Expectation::for_frame(&Frame::default()), Expectation::Error);

        let bad_lexer = Frame { lexer: LexerChoice::Invalid, ..good };
        assert_eq!(Expectation::for_frame(&bad_lexer), Expectation::Error);

        let restricted = Frame { output: OutputMode::Restricted, ..good };
        assert_eq!(Expectation::for_frame(&restricted), Expectation::Error);
    }

    #[test]
    fn test_expectation_matching() {
        assert_eq!(Expectation::Pass.is_met_by(&Outcome::Pass), Some(true));
        assert_eq!(Expectation::Pass.is_met_by(&Outcome::CaughtError { code: 1 }), Some(false));
        assert_eq!(Expectation::Error.is_met_by(&Outcome::Pass), Some(false));
        assert_eq!(
            Expectation::Error.is_met_by(&Outcome::CrashFail { reason: "x".into() }),
            None
        );
    }

    #[test]
    fn test_plan_is_deterministic() {
        let dir = tempfile::tempdir().unwrap();
        let harness = Harness::new(&config_in(dir.path(), "pygmentize"));
        let frame = raw(&[("file", "exists"), ("content", "valid_syntax"), ("lexer", "valid_match")]);

        let first = harness.plan(&frame).unwrap();
        let second = harness.plan(&frame).unwrap();
        assert_eq!(first, second);
        assert_eq!(first.args[..2], ["-l".to_string(), "python".to_string()]);
        assert!(!dir.path().join("test_input.py").exists());
    }

    #[test]
    fn test_plan_rejects_unknown_category() {
        let harness = Harness::new(&Config::default());
        let err = harness.plan(&raw(&[("formatter", "pdf-ish")])).unwrap_err();
        assert!(matches!(err, HarnessError::Config(_)));
    }

    #[test]
    fn test_command_line() {
        let harness = Harness::new(&Config::default());
        let line = harness.command_line(&["-l".to_string(), "python".to_string(), "a.py".to_string()]);
        assert_eq!(line, "pygmentize -l python a.py");
    }

    #[tokio::test]
    async fn test_bad_frame_is_recorded_and_run_continues() {
        let dir = tempfile::tempdir().unwrap();
        let harness = Harness::new(&config_in(dir.path(), "definitely-not-a-real-program-3f9a"));
        let frames = vec![raw(&[("lexer", "bogus")]), raw(&[("lexer", "omitted")])];

        let reports = harness.run(&frames, &NoOpProgress).await;
        assert_eq!(reports.len(), 2);
        assert!(matches!(reports[0].status, FrameStatus::Error { .. }));
        assert!(reports[0].needs_attention());
        assert!(reports[1].outcome().map(Outcome::is_crash).unwrap_or(false));
        assert_eq!(reports[1].index, 2);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_fixture_removed_after_each_frame() {
        let dir = tempfile::tempdir().unwrap();
        let harness = Harness::new(&config_in(dir.path(), "true"));
        let frames = vec![
            raw(&[("file", "exists"), ("content", "valid_syntax"), ("output", "file_path")]),
            raw(&[("file", "missing")]),
        ];

        let reports = harness.run(&frames, &NoOpProgress).await;
        assert!(reports.iter().all(|r| r.outcome() == Some(&Outcome::Pass)));
        assert!(!dir.path().join("test_input.py").exists());
        assert!(!dir.path().join("out.html").exists());
        // `true` succeeds on a missing file, which a real highlighter should not
        assert!(reports[1].is_unexpected());
        assert!(!reports[0].is_unexpected());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_stale_fixture_removed_before_frame() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_in(dir.path(), "true");
        std::fs::write(&config.paths.fixture, "stale").unwrap();
        std::fs::write(&config.paths.output, "stale").unwrap();

        let harness = Harness::new(&config);
        let report = harness
            .run_frame(1, 1, &raw(&[("file", "missing")]), &NoOpProgress)
            .await;

        assert_eq!(report.args, vec![config.paths.missing_fixture.to_str().unwrap()]);
        assert!(!config.paths.fixture.exists());
        assert!(!config.paths.output.exists());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_existing_missing_fixture_blocks_frame() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_in(dir.path(), "true");
        std::fs::write(&config.paths.missing_fixture, "print('left over')").unwrap();

        let harness = Harness::new(&config);
        let frames = vec![raw(&[("file", "missing")]), raw(&[("file", "exists")])];
        let reports = harness.run(&frames, &NoOpProgress).await;

        match &reports[0].status {
            FrameStatus::Error { message } => assert!(message.contains("missing-fixture path"), "{}", message),
            other => panic!("Expected frame error, got {:?}", other),
        }
        assert!(reports[0].args.is_empty());
        assert!(reports[0].needs_attention());
        assert_eq!(reports[1].outcome(), Some(&Outcome::Pass));
        assert!(config.paths.missing_fixture.exists());
    }
}
