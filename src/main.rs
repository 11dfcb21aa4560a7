//! Main application entry point (CLI binary).
//!
//! This is a thin wrapper around the `apistep` library that handles:
//! - Command-line argument parsing
//! - Logger initialization
//! - User-facing output and the process exit code
//!
//! All core functionality is implemented in the library crate.

use anyhow::{Context, Result};
use clap::Parser;
use std::process;

use apistep::initialization::init_logger_with;
use apistep::{run_steps, Config};

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::parse();

    let log_level = config.log_level.clone();
    let log_format = config.log_format.clone();
    init_logger_with(log_level.into(), log_format).context("Failed to initialize logger")?;

    match run_steps(config).await {
        Ok(report) => {
            println!(
                "✅ Executed {} step{} in {:.1}s: {} passed, {} failed",
                report.total_steps,
                if report.total_steps == 1 { "" } else { "s" },
                report.elapsed_seconds,
                report.passed,
                report.failed
            );
            if report.failed > 0 {
                process::exit(1);
            }
            Ok(())
        }
        Err(e) => {
            eprintln!("apistep error: {e:#}");
            process::exit(1);
        }
    }
}
