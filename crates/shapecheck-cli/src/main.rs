use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

use shapecheck::{check_files, check_json_files, load_schema, FileReport, Outcome};

#[derive(Parser)]
#[command(name = "shapecheck")]
#[command(about = "Check JSON and YAML documents against structural templates", long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Enable debug output
    #[arg(short, long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate documents against a schema template
    Validate {
        /// Schema template file (JSON or YAML)
        #[arg(short, long, env = "SHAPECHECK_SCHEMA")]
        schema: PathBuf,

        /// Only report whether each document matches
        #[arg(short, long)]
        quiet: bool,

        /// Documents to check
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },

    /// Check that documents contain only valid JSON values
    Json {
        /// Documents to check
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    // Initialize tracing
    let level = if cli.debug {
        tracing::Level::TRACE
    } else if cli.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::WARN
    };

    let filter = EnvFilter::builder()
        .with_default_directive(level.into())
        .from_env_lossy();

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(cli.debug) // Show target module in debug mode
        .with_writer(std::io::stderr)
        .init();

    let reports = match cli.command {
        Commands::Validate {
            schema,
            quiet,
            files,
        } => {
            let schema = load_schema(&schema)?;
            let reports = check_files(&schema, &files, quiet)?;
            print_reports(&reports, quiet);
            reports
        }
        Commands::Json { files } => {
            let reports = check_json_files(&files)?;
            print_reports(&reports, false);
            reports
        }
    };

    if reports.iter().all(FileReport::is_match) {
        Ok(ExitCode::SUCCESS)
    } else {
        Ok(ExitCode::FAILURE)
    }
}

fn print_reports(reports: &[FileReport], quiet: bool) {
    for report in reports {
        match &report.outcome {
            Outcome::Matched if !quiet => println!("ok: {}", report.path.display()),
            Outcome::Matched => {}
            Outcome::Mismatched(Some(message)) => {
                println!("mismatch: {}: {}", report.path.display(), message)
            }
            Outcome::Mismatched(None) => println!("mismatch: {}", report.path.display()),
        }
    }
}
