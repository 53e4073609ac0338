//! CLI for the Bugzilla to GitHub migration.
//!
//! Converts a Bugzilla XML export and imports every bug as a GitHub issue.
//! Nothing is written to GitHub unless `-f` is given.

use bugzilla_migrate::{RunSummary, Runner, RunnerConfig, RunnerError, DEFAULT_LEDGER_FILE};
use clap::error::ErrorKind;
use clap::{CommandFactory, Parser};
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;
use tracing::{error, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Seconds during which Ctrl+C cancels a forced run.
const CANCEL_WINDOW_SECS: u64 = 5;

/// Bugzilla to GitHub migration - Convert a Bugzilla XML export into GitHub issues.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None, disable_help_flag = true)]
struct Args {
    /// Source XML file.
    #[arg(short = 'x', long = "xml", default_value = "bugzilla.xml")]
    xml: PathBuf,

    /// Destination GitHub owner.
    #[arg(short = 'o', long, default_value = "")]
    owner: String,

    /// Destination repository.
    #[arg(short = 'r', long, default_value = "")]
    repo: String,

    /// GitHub access token.
    #[arg(short = 't', long, env = "GITHUB_TOKEN", default_value = "", hide_env_values = true)]
    token: String,

    /// Write to GitHub (without it every write is skipped).
    #[arg(short = 'f', long)]
    force: bool,

    /// File recording completed imports.
    #[arg(long, default_value = DEFAULT_LEDGER_FILE)]
    ledger: PathBuf,

    /// TOML file extending the built-in lookup tables.
    #[arg(long)]
    mappings: Option<PathBuf>,

    /// Bugzilla instance the export came from.
    #[arg(long, default_value = bugzilla_migrate::runner::DEFAULT_TRACKER_URL)]
    tracker_url: String,

    /// URL attachments are linked below [default: <tracker-url>/bugfiles].
    #[arg(long)]
    attachment_url: Option<String>,

    /// GitHub REST API root.
    #[arg(long, default_value = bugzilla_migrate::runner::DEFAULT_API_URL)]
    api_url: String,

    /// Keep the last of repeated bug IDs instead of failing.
    #[arg(long)]
    allow_duplicates: bool,

    /// Print usage.
    #[arg(short = 'h', long)]
    help: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    // Initialize tracing
    init_tracing();

    // Parse arguments; usage errors and -h exit with status 1
    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(e) if e.kind() == ErrorKind::DisplayVersion => {
            let _ = e.print();
            return ExitCode::SUCCESS;
        }
        Err(e) => {
            let _ = e.print();
            return ExitCode::from(1);
        }
    };
    if args.help {
        let _ = Args::command().print_help();
        return ExitCode::from(1);
    }

    // octocrab talks TLS through rustls; pin the provider before any request
    let _ = rustls::crypto::aws_lc_rs::default_provider().install_default();

    if args.force && !confirm_force().await {
        warn!("Update cancelled");
        return ExitCode::from(130);
    }

    // Run the main logic
    match run(args).await {
        Ok(summary) => {
            print_summary(&summary);
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!(error = %e, "Critical failure");
            ExitCode::from(2)
        }
    }
}

/// Initializes tracing with environment filter support.
///
/// Sets up the global tracing subscriber with:
/// - Compact log formatting (single-line output)
/// - Log level filtering via `RUST_LOG` env var (defaults to "info")
fn init_tracing() {
    tracing_subscriber::registry()
        .with(fmt::layer().compact().with_target(false))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();
}

/// Gives the user a few seconds to cancel a forced run.
///
/// Returns false if Ctrl+C was pressed.
async fn confirm_force() -> bool {
    warn!("The repository will be UPDATED! No backups, no undos!");
    warn!(
        seconds = CANCEL_WINDOW_SECS,
        "Press Ctrl+C within the next few seconds to cancel the update"
    );

    tokio::select! {
        () = tokio::time::sleep(Duration::from_secs(CANCEL_WINDOW_SECS)) => true,
        _ = tokio::signal::ctrl_c() => false,
    }
}

/// Main execution logic.
async fn run(args: Args) -> Result<RunSummary, RunnerError> {
    let config = RunnerConfig::new(args.xml, args.owner, args.repo, args.token, args.force)
        .with_ledger_path(args.ledger)
        .with_mappings_path(args.mappings)
        .with_tracker_url(args.tracker_url)
        .with_attachment_url(args.attachment_url)
        .with_api_url(args.api_url)
        .with_allow_duplicates(args.allow_duplicates);
    let runner = Runner::new(config)?;
    runner.run().await
}

/// Prints the final run summary.
fn print_summary(summary: &RunSummary) {
    println!("\nSummary:");
    println!(
        "  Mode: {}",
        if summary.dry_run { "Dry Run" } else { "Live" }
    );
    println!("  Bugs converted: {}", summary.bugs_converted);
    println!("  Duplicate bug IDs: {}", summary.duplicates);
    println!("  Already imported: {}", summary.skipped_imported);
    println!(
        "  Labels: {} existing, {} created, {} missing",
        summary.labels_existing, summary.labels_created, summary.labels_missing
    );

    if summary.dry_run {
        println!("  Imports skipped: {}", summary.imports_skipped);
    } else {
        println!("  Issues imported: {}", summary.issues_imported);
    }

    if summary.has_warnings() {
        println!("  Unconverted fields: {}", summary.unconverted_fields);
        println!(
            "  Unconverted attachments: {}",
            summary.unconverted_attachments
        );
        println!("  Lookup misses: {}", summary.lookup_warnings);
    }
}
