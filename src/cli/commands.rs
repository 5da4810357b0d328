//! Command implementations for the chemviz CLI
//!
//! This module contains the command execution logic, logging setup,
//! configuration layering and progress reporting for the CLI interface.

use crate::cli::output::{format_history, format_records, format_summary};
use crate::cli::{
    Args, Commands, HistoryArgs, LoginArgs, OutputFormat, RecordFilterArgs, ReportArgs,
    SampleArgs, ShowArgs, SummarizeArgs, UploadArgs,
};
use crate::config::AppConfig;
use crate::constants::SAMPLE_CSV;
use crate::error::ChemvizError;
use crate::models::{Dataset, EquipmentRecord, SessionMode};
use crate::parser::parse_csv_file;
use crate::report::Report;
use crate::session::{Session, SessionStore};
use crate::summary::{filter_records, summarize};
use anyhow::{Context, Result};
use colored::*;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::Path;
use std::time::Duration;
use tracing::{debug, info};

/// Main command runner
///
/// 1. Set up logging
/// 2. Load layered configuration
/// 3. Dispatch the subcommand
pub async fn run(args: Args) -> Result<()> {
    setup_logging(&args)?;
    debug!("Command line arguments: {:?}", args);

    let config = load_configuration(&args)?;
    debug!("Loaded configuration: {:?}", config);

    let Some(command) = args.command else {
        return Ok(());
    };

    match command {
        Commands::Login(login) => run_login(&config, login).await,
        Commands::Logout => run_logout(&config).await,
        Commands::Whoami => run_whoami(&config),
        Commands::Upload(upload) => run_upload(&config, upload).await,
        Commands::Summarize(summarize_args) => run_summarize(summarize_args),
        Commands::History(history) => run_history(&config, history).await,
        Commands::Show(show) => run_show(&config, show).await,
        Commands::Report(report) => run_report(&config, report).await,
        Commands::Sample(sample) => run_sample(sample),
    }
}

/// Set up structured logging based on CLI arguments
fn setup_logging(args: &Args) -> Result<()> {
    use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

    let log_level = args.log_level();

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("chemviz={}", log_level)));

    if args.quiet {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_level(true)
                    .with_writer(std::io::stderr)
                    .compact(),
            )
            .try_init()
            .context("Failed to initialise logging")?;
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_level(true)
                    .with_timer(fmt::time::uptime())
                    .with_writer(std::io::stderr),
            )
            .try_init()
            .context("Failed to initialise logging")?;
    }

    debug!("Logging initialized at level: {}", log_level);
    Ok(())
}

/// Load configuration using layered approach (file -> env -> args)
pub fn load_configuration(args: &Args) -> Result<AppConfig> {
    let mut config = match &args.config_file {
        Some(path) => {
            info!("Using config file: {}", path.display());
            AppConfig::from_file(path)?
        }
        None => AppConfig::default(),
    };

    config = config.with_env_overrides();

    if let Some(url) = &args.api_url {
        config = config.with_api_base_url(url.clone());
    }
    if let Some(dir) = &args.state_dir {
        config = config.with_state_dir(dir.clone());
    }

    config.validate()?;
    Ok(config)
}

fn spinner(message: impl Into<String>) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.green} {msg}") {
        pb.set_style(style);
    }
    pb.set_message(message.into());
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

/// Resume the remembered session or explain how to create one
fn require_session(config: &AppConfig) -> Result<Session> {
    let store = SessionStore::new(config);
    let stored = store.load()?.ok_or(ChemvizError::NotAuthenticated)?;
    Ok(Session::resume(config, &stored)?)
}

fn mode_label(mode: SessionMode) -> ColoredString {
    match mode {
        SessionMode::Demo => "demo mode (offline, local history)".bright_yellow(),
        SessionMode::Connected => "connected".bright_green(),
    }
}

async fn run_login(config: &AppConfig, args: LoginArgs) -> Result<()> {
    let pb = spinner(format!("Signing in to {}...", config.api_base_url));
    let result = Session::login(config, &args.username, &args.password).await;
    pb.finish_and_clear();

    let session = result?;
    SessionStore::new(config).save(&session.to_stored())?;

    println!(
        "{} {} ({})",
        "Logged in as".bright_green(),
        session.username().bright_white().bold(),
        mode_label(session.mode())
    );
    if session.mode() == SessionMode::Demo {
        println!(
            "  {}",
            "The dataset service is unreachable; uploads are summarised locally.".bright_black()
        );
    }
    Ok(())
}

async fn run_logout(config: &AppConfig) -> Result<()> {
    let store = SessionStore::new(config);
    match store.load()? {
        Some(stored) => {
            let session = Session::resume(config, &stored)?;
            let username = session.username().to_string();
            session.logout(&store).await?;
            println!("{} {}", "Logged out".bright_green(), username.bright_white());
        }
        None => println!("{}", "Not logged in".bright_black()),
    }
    Ok(())
}

fn run_whoami(config: &AppConfig) -> Result<()> {
    match SessionStore::new(config).load()? {
        Some(stored) => println!(
            "{} ({})",
            stored.username.bright_white().bold(),
            mode_label(stored.mode)
        ),
        None => println!("{}", "Not logged in".bright_black()),
    }
    Ok(())
}

fn print_dataset(dataset: &Dataset, show_records: bool, filter: &RecordFilterArgs) {
    println!();
    print!(
        "{}",
        format_summary(&format!("Summary of {}", dataset.file_name), &dataset.summary)
    );
    if show_records {
        println!();
        if dataset.records.is_empty() {
            println!(
                "{}",
                "Rows are not available for this upload".bright_black()
            );
        } else {
            let shown = filtered_records(dataset, filter);
            print!("{}", format_records(&shown));
            println!(
                "{}",
                format!("Showing {} of {} records", shown.len(), dataset.records.len())
                    .bright_black()
            );
        }
    }
}

fn filtered_records<'a>(
    dataset: &'a Dataset,
    filter: &RecordFilterArgs,
) -> Vec<&'a EquipmentRecord> {
    filter_records(
        &dataset.records,
        filter.search.as_deref(),
        filter.category.as_deref(),
    )
}

async fn run_upload(config: &AppConfig, args: UploadArgs) -> Result<()> {
    let mut session = require_session(config)?;

    let pb = spinner("Uploading...");
    let result = match &args.file {
        Some(path) if !args.sample => session.upload_file(path).await.map(|_| ()),
        _ => session.load_sample().await.map(|_| ()),
    };
    pb.finish_and_clear();
    result.context("Upload failed")?;

    let dataset = session.current().ok_or(ChemvizError::NoDataset)?;
    println!(
        "{} {} ({} records)",
        "Uploaded".bright_green(),
        dataset.file_name.bright_cyan(),
        dataset.records.len()
    );
    if let Some(id) = dataset.history_id {
        println!("  {} #{}", "History entry:".bright_cyan(), id);
    }
    print_dataset(dataset, args.show_records, &args.filter);

    if let Some(dir) = &args.report_dir {
        let path = session.report_current(dir)?;
        println!("\n{} {}", "Report written to".bright_green(), path.display());
    }
    Ok(())
}

fn run_summarize(args: SummarizeArgs) -> Result<()> {
    let records = parse_csv_file(&args.file)
        .with_context(|| format!("Failed to read {}", args.file.display()))?;
    let dataset = Dataset {
        file_name: display_name(&args.file),
        summary: summarize(&records),
        records,
        history_id: None,
    };

    match args.format {
        OutputFormat::Human => print_dataset(&dataset, args.show_records, &args.filter),
        OutputFormat::Json => {
            let value = if args.show_records {
                serde_json::json!({
                    "file": dataset.file_name,
                    "summary": dataset.summary,
                    "total_records": dataset.records.len(),
                    "records": filtered_records(&dataset, &args.filter),
                })
            } else {
                serde_json::json!({
                    "file": dataset.file_name,
                    "summary": dataset.summary,
                })
            };
            println!("{}", serde_json::to_string_pretty(&value)?);
        }
    }
    Ok(())
}

async fn run_history(config: &AppConfig, args: HistoryArgs) -> Result<()> {
    let mut session = require_session(config)?;

    if args.clear {
        session.clear_history().await?;
        println!("{}", "History cleared".bright_green());
        return Ok(());
    }

    let pb = spinner("Fetching history...");
    let result = session.history().await;
    pb.finish_and_clear();
    let entries = result.context("Failed to fetch history")?;

    match args.format {
        OutputFormat::Human => {
            println!(
                "{} ({})",
                format!("Last {} uploads", entries.len()).bright_green().bold(),
                mode_label(session.mode())
            );
            print!("{}", format_history(&entries));
        }
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&entries)?),
    }
    Ok(())
}

async fn run_show(config: &AppConfig, args: ShowArgs) -> Result<()> {
    let mut session = require_session(config)?;
    let dataset = session.load_from_history(args.id).await?;
    print_dataset(dataset, args.show_records, &args.filter);
    Ok(())
}

async fn run_report(config: &AppConfig, args: ReportArgs) -> Result<()> {
    let dir = args
        .output_dir
        .clone()
        .unwrap_or_else(|| config.report_dir.clone());

    let path = if let Some(file) = &args.file {
        let records = parse_csv_file(file)
            .with_context(|| format!("Failed to read {}", file.display()))?;
        let dataset = Dataset {
            file_name: display_name(file),
            summary: summarize(&records),
            records,
            history_id: None,
        };
        Report::for_dataset(&dataset).write_to(&dir)?
    } else {
        let session = require_session(config)?;
        let id = match args.id {
            Some(id) => id,
            None => session
                .history()
                .await?
                .first()
                .map(|entry| entry.id)
                .context("No uploads yet - nothing to report on")?,
        };
        let pb = spinner("Generating report...");
        let result = session.report_history_entry(id, &dir).await;
        pb.finish_and_clear();
        result?
    };

    println!("{} {}", "Report written to".bright_green(), path.display());
    Ok(())
}

fn run_sample(args: SampleArgs) -> Result<()> {
    if let Some(parent) = args.output.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(&args.output, format!("{SAMPLE_CSV}\n"))
        .with_context(|| format!("Failed to write {}", args.output.display()))?;
    println!(
        "{} {}",
        "Sample dataset written to".bright_green(),
        args.output.display()
    );
    Ok(())
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
