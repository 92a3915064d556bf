//! Highlight Harness CLI

use std::path::PathBuf;

use chrono::Utc;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use highlight_harness::{
    config::Config,
    frames::{FrameSource, RawFrame},
    reporting::{print_console_report, JsonSummary, RunSummary},
    runner::{ConsoleProgress, Harness},
};

/// Exit status when `--strict` finds frames that need attention
const STRICT_FAILURE: i32 = 2;

#[derive(Parser)]
#[command(name = "highlight-harness")]
#[command(about = "Combinatorial test-frame generator and runner for syntax highlighters")]
#[command(version)]
struct Cli {
    /// Frame table (e.g. ACTS pairwise export); all combinations when omitted
    table: Option<PathBuf>,

    /// Configuration file path
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Program to test (overrides the configuration file)
    #[arg(long)]
    tool: Option<String>,

    /// Per-invocation timeout in milliseconds (overrides the configuration file)
    #[arg(long)]
    timeout_ms: Option<u64>,

    /// Print each frame's command without running anything
    #[arg(long)]
    dry_run: bool,

    /// Write a JSON summary to this path
    #[arg(long)]
    json: Option<PathBuf>,

    /// Exit with status 2 if any frame crashed, errored or was unexpected
    #[arg(long)]
    strict: bool,

    /// Write the default configuration to this path and exit
    #[arg(long, value_name = "PATH")]
    init_config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("highlight_harness=debug,info")
    } else {
        EnvFilter::new("highlight_harness=info,warn")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    if let Some(output) = cli.init_config {
        return init_config(output);
    }

    let config = match load_config(cli.config.as_ref(), cli.tool, cli.timeout_ms) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    let source = FrameSource::from_arg(cli.table);
    let frames = match source.raw_frames() {
        Ok(frames) => frames,
        Err(e) => {
            eprintln!("Error: failed to load frames from {}: {}", source.describe(), e);
            std::process::exit(1);
        }
    };

    tracing::info!("Loaded {} frames from {}", frames.len(), source.describe());

    let harness = Harness::new(&config);

    if cli.dry_run {
        dry_run(&harness, &frames);
        return Ok(());
    }

    let reports = harness.run(&frames, &ConsoleProgress).await;
    print_console_report(&reports);

    if let Some(path) = cli.json {
        let run_id = Utc::now().format("%Y%m%d-%H%M%S").to_string();
        JsonSummary::new(run_id, harness.program(), source.describe(), &reports)
            .write_to_file(&path)?;
        println!("JSON summary written to: {}", path.display());
    }

    if cli.strict && !RunSummary::from_reports(&reports).is_clean() {
        std::process::exit(STRICT_FAILURE);
    }

    Ok(())
}

fn load_config(
    path: Option<&PathBuf>,
    tool: Option<String>,
    timeout_ms: Option<u64>,
) -> highlight_harness::Result<Config> {
    let mut config = match path {
        Some(path) => Config::from_file(path)?,
        None => Config::load_or_default(),
    };

    if let Some(program) = tool {
        config.tool.program = program;
    }
    if let Some(timeout_ms) = timeout_ms {
        config.tool.timeout_ms = timeout_ms;
    }

    config.validate()?;
    Ok(config)
}

fn dry_run(harness: &Harness, frames: &[RawFrame]) {
    for (i, raw) in frames.iter().enumerate() {
        match harness.plan(raw) {
            Ok(planned) => {
                println!("Test #{}: {}", i + 1, harness.command_line(&planned.args));
                println!("  {}", planned.frame);
            }
            Err(e) => println!("Test #{}: ERROR - {}", i + 1, e),
        }
    }
    println!("\n{} frames", frames.len());
}

fn init_config(output: PathBuf) -> Result<(), Box<dyn std::error::Error>> {
    Config::default().save_toml(&output)?;
    println!("Configuration written to: {}", output.display());
    Ok(())
}
