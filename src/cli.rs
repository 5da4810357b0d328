//! Command-line interface components.

pub mod commands;
pub mod output;

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// CLI arguments for the chemviz equipment dataset tool
#[derive(Debug, Clone, Parser)]
#[command(
    name = "chemviz",
    version,
    about = "Summarise chemical equipment parameter datasets from CSV",
    long_about = "Upload CSV files of chemical equipment parameters (name, type, flowrate, \
                  pressure, temperature), view summary statistics and tabular data, browse \
                  recent uploads and export reports. Works against a remote dataset service \
                  or offline in demo mode."
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Path to configuration file (JSON)
    #[arg(short = 'c', long = "config", value_name = "FILE", global = true)]
    pub config_file: Option<PathBuf>,

    /// Base URL of the remote dataset service
    #[arg(long = "api-url", value_name = "URL", global = true)]
    pub api_url: Option<String>,

    /// Directory holding the saved session and demo history
    #[arg(long = "state-dir", value_name = "PATH", global = true)]
    pub state_dir: Option<PathBuf>,

    /// Logging verbosity level
    #[arg(
        short = 'v',
        long = "verbose",
        action = clap::ArgAction::Count,
        global = true,
        help = "Increase logging verbosity (-v: info, -vv: debug, -vvv: trace)"
    )]
    pub verbose: u8,

    /// Only show errors and warnings
    #[arg(short = 'q', long = "quiet", global = true, conflicts_with = "verbose")]
    pub quiet: bool,
}

/// Available subcommands
#[derive(Debug, Clone, Subcommand)]
pub enum Commands {
    /// Log in to the dataset service (falls back to demo mode when offline)
    Login(LoginArgs),
    /// End the current session and forget local history
    Logout,
    /// Show who is logged in and in which mode
    Whoami,
    /// Upload a CSV file and show its summary
    Upload(UploadArgs),
    /// Summarise a CSV file locally without logging in
    Summarize(SummarizeArgs),
    /// List recent uploads
    History(HistoryArgs),
    /// Show a past upload
    Show(ShowArgs),
    /// Write a report for an upload
    Report(ReportArgs),
    /// Write the bundled sample dataset to a file
    Sample(SampleArgs),
}

#[derive(Debug, Clone, Parser)]
pub struct LoginArgs {
    #[arg(short = 'u', long = "username")]
    pub username: String,

    #[arg(short = 'p', long = "password")]
    pub password: String,
}

#[derive(Debug, Clone, Parser)]
pub struct UploadArgs {
    /// CSV file to upload
    #[arg(value_name = "FILE", required_unless_present = "sample")]
    pub file: Option<PathBuf>,

    /// Upload the bundled sample dataset instead of a file
    #[arg(long = "sample", conflicts_with = "file")]
    pub sample: bool,

    /// Print every record after the summary
    #[arg(long = "show-records")]
    pub show_records: bool,

    #[command(flatten)]
    pub filter: RecordFilterArgs,

    /// Also write a report for the uploaded data into this directory
    #[arg(long = "report", value_name = "DIR")]
    pub report_dir: Option<PathBuf>,
}

#[derive(Debug, Clone, Parser)]
pub struct SummarizeArgs {
    /// CSV file to summarise
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Output format for the summary
    #[arg(long = "format", value_enum, default_value = "human")]
    pub format: OutputFormat,

    /// Print every record after the summary
    #[arg(long = "show-records")]
    pub show_records: bool,

    #[command(flatten)]
    pub filter: RecordFilterArgs,
}

#[derive(Debug, Clone, Parser)]
pub struct HistoryArgs {
    /// Output format for the listing
    #[arg(long = "format", value_enum, default_value = "human")]
    pub format: OutputFormat,

    /// Forget all local uploads (demo mode only)
    #[arg(long = "clear")]
    pub clear: bool,
}

#[derive(Debug, Clone, Parser)]
pub struct ShowArgs {
    /// History entry id
    #[arg(value_name = "ID")]
    pub id: u64,

    /// Print every record after the summary
    #[arg(long = "show-records")]
    pub show_records: bool,

    #[command(flatten)]
    pub filter: RecordFilterArgs,
}

/// Narrow the printed record table
#[derive(Debug, Clone, Default, clap::Args)]
pub struct RecordFilterArgs {
    /// Only show records whose name or type contains TEXT (case-insensitive)
    #[arg(long = "search", value_name = "TEXT", requires = "show_records")]
    pub search: Option<String>,

    /// Only show records of exactly this type
    #[arg(long = "type", value_name = "TYPE", requires = "show_records")]
    pub category: Option<String>,
}

#[derive(Debug, Clone, Parser)]
pub struct ReportArgs {
    /// Report on a past upload by history id
    #[arg(long = "id", value_name = "ID", conflicts_with = "file")]
    pub id: Option<u64>,

    /// Report on a local CSV file without uploading it
    #[arg(long = "file", value_name = "FILE")]
    pub file: Option<PathBuf>,

    /// Directory the report is written to
    #[arg(short = 'o', long = "output", value_name = "DIR")]
    pub output_dir: Option<PathBuf>,
}

#[derive(Debug, Clone, Parser)]
pub struct SampleArgs {
    /// Where to write the sample CSV
    #[arg(
        short = 'o',
        long = "output",
        value_name = "FILE",
        default_value = crate::constants::SAMPLE_FILE_NAME
    )]
    pub output: PathBuf,
}

/// Output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable output
    Human,
    /// JSON format for scripting
    Json,
}

impl Args {
    /// Log level derived from the verbosity flags
    pub fn log_level(&self) -> &'static str {
        if self.quiet {
            return "warn";
        }
        match self.verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    }
}
