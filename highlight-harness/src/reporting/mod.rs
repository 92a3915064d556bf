//! Run reporting

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::runner::{FrameReport, FrameStatus, Outcome};

/// Outcome totals for a run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunSummary {
    pub total_frames: usize,
    pub passed: usize,
    pub caught_errors: usize,
    pub crash_fails: usize,
    /// Frames that never reached the tool
    pub frame_errors: usize,
    /// Pass/caught-error answers that contradict the frame's expectation
    pub unexpected: usize,
}

impl RunSummary {
    pub fn from_reports(reports: &[FrameReport]) -> Self {
        let mut summary = RunSummary {
            total_frames: reports.len(),
            ..Default::default()
        };

        for report in reports {
            match &report.status {
                FrameStatus::Executed { result } => match result.outcome {
                    Outcome::Pass => summary.passed += 1,
                    Outcome::CaughtError { .. } => summary.caught_errors += 1,
                    Outcome::CrashFail { .. } => summary.crash_fails += 1,
                },
                FrameStatus::Error { .. } => summary.frame_errors += 1,
            }
            if report.is_unexpected() {
                summary.unexpected += 1;
            }
        }

        summary
    }

    /// Whether every frame reached the tool and got the answer it predicts
    pub fn is_clean(&self) -> bool {
        self.crash_fails == 0 && self.frame_errors == 0 && self.unexpected == 0
    }
}

/// JSON summary export
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonSummary {
    pub run_id: String,
    pub timestamp: String,
    pub program: String,
    pub source: String,
    pub summary: RunSummary,
    pub frames: Vec<FrameReport>,
}

impl JsonSummary {
    pub fn new(
        run_id: impl Into<String>,
        program: impl Into<String>,
        source: impl Into<String>,
        reports: &[FrameReport],
    ) -> Self {
        Self {
            run_id: run_id.into(),
            timestamp: chrono::Utc::now().to_rfc3339(),
            program: program.into(),
            source: source.into(),
            summary: RunSummary::from_reports(reports),
            frames: reports.to_vec(),
        }
    }

    /// Write to JSON file
    pub fn write_to_file(&self, path: impl AsRef<Path>) -> std::io::Result<()> {
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
        std::fs::write(path, json)
    }
}

/// Print the end-of-run totals and the frames that need a second look
pub fn print_console_report(reports: &[FrameReport]) {
    let summary = RunSummary::from_reports(reports);

    println!("\n=== Highlight Harness Results ===\n");
    println!("Total Frames: {}\n", summary.total_frames);
    println!("{:-<50}", "");
    println!("  PASS          {:>6}", summary.passed);
    println!("  CAUGHT_ERROR  {:>6}", summary.caught_errors);
    println!("  CRASH_FAIL    {:>6}", summary.crash_fails);
    println!("  FRAME_ERROR   {:>6}", summary.frame_errors);
    println!("{:-<50}", "");
    println!("  Unexpected    {:>6}", summary.unexpected);

    let flagged: Vec<_> = reports.iter().filter(|r| r.needs_attention()).collect();
    if !flagged.is_empty() {
        println!("\nNeeds attention:");
        println!("{:-<50}", "");
        for report in flagged {
            let what = match &report.status {
                FrameStatus::Executed { result } => result.outcome.to_string(),
                FrameStatus::Error { message } => format!("ERROR - {}", message),
            };
            match &report.frame {
                Some(frame) => println!("  #{} [{}] {}", report.index, frame, what),
                None => println!("  #{} {}", report.index, what),
            }
        }
    }

    println!("\n{:=<50}", "");
}
