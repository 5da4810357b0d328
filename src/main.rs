use chemviz::cli::{Args, commands};
use clap::Parser;
use std::process;

fn main() {
    // Parse command line arguments
    let args = Args::parse();

    // If no subcommand was provided, show help and available commands
    if args.command.is_none() {
        show_help_and_commands();
        process::exit(0);
    }

    let runtime = tokio::runtime::Runtime::new().unwrap_or_else(|e| {
        eprintln!("Failed to create async runtime: {}", e);
        process::exit(1);
    });

    let result = runtime.block_on(async {
        tokio::select! {
            result = commands::run(args) => result,
            () = wait_for_ctrl_c() => {
                eprintln!("\nReceived CTRL+C, shutting down...");
                Err(chemviz::ChemvizError::processing_interrupted(
                    "Interrupted by user",
                )
                .into())
            }
        }
    });

    if let Err(error) = result {
        eprintln!("Error: {:#}", error);
        process::exit(1);
    }
}

/// Resolve on CTRL+C; never resolve if the handler cannot be installed
async fn wait_for_ctrl_c() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        eprintln!("Failed to listen for CTRL+C: {}", e);
        std::future::pending::<()>().await;
    }
}

/// Show help information and available commands when no subcommand is provided
fn show_help_and_commands() {
    println!("chemviz - Chemical Equipment Dataset Summaries");
    println!("==============================================");
    println!();
    println!("Summarise CSV files of chemical equipment parameters, browse recent");
    println!("uploads and export reports, online or in offline demo mode.");
    println!();
    println!("USAGE:");
    println!("    chemviz <COMMAND> [OPTIONS]");
    println!();
    println!("COMMANDS:");
    println!("    login       Log in (demo mode when the service is unreachable)");
    println!("    logout      End the session and forget local history");
    println!("    whoami      Show the current user and mode");
    println!("    upload      Upload a CSV file and show its summary");
    println!("    summarize   Summarise a CSV file locally without logging in");
    println!("    history     List recent uploads");
    println!("    show        Show a past upload");
    println!("    report      Write a report for an upload");
    println!("    sample      Write the bundled sample dataset");
    println!();
    println!("EXAMPLES:");
    println!("    chemviz login -u admin -p admin123");
    println!("    chemviz upload equipment.csv --show-records");
    println!("    chemviz summarize equipment.csv --format json");
    println!("    chemviz report --id 3 --output reports/");
    println!();
    println!("For detailed help on any command, use:");
    println!("    chemviz <COMMAND> --help");
}
