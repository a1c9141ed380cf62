use clap::Parser;
use depot_ingest::cli::{args::Args, commands};
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
            signal = tokio::signal::ctrl_c() => {
                if let Err(e) = signal {
                    eprintln!("Failed to listen for CTRL+C: {}", e);
                }
                eprintln!("\nReceived CTRL+C, shutting down...");
                Err(depot_ingest::Error::processing_interrupted(
                    "Ingestion interrupted by user",
                ))
            }
        }
    });

    match result {
        Ok(_stats) => {
            // Success - stats have already been reported by the command
            process::exit(0);
        }
        Err(error) => {
            eprintln!("Error: {:#}", error);
            process::exit(1);
        }
    }
}

/// Show help information and available commands when no subcommand is provided
fn show_help_and_commands() {
    println!("depot-ingest - Portfolio Statement Ingestion");
    println!("============================================");
    println!();
    println!("Parse broker portfolio statements (plain text or markdown) into");
    println!("per-depot holding records stored in a SQLite database.");
    println!();
    println!("USAGE:");
    println!("    depot-ingest <COMMAND> [OPTIONS]");
    println!();
    println!("COMMANDS:");
    println!("    ingest      Ingest statement files or directories");
    println!("    show        Show the stored holdings of one depot");
    println!("    help        Show this help message or help for specific commands");
    println!();
    println!("EXAMPLES:");
    println!("    # Ingest a directory of converted statements:");
    println!("    depot-ingest ingest ./statements --database holdings.sqlite");
    println!();
    println!("    # List one depot as JSON:");
    println!("    depot-ingest show 1234567 --output-format json");
    println!();
    println!("For detailed help on any command, use:");
    println!("    depot-ingest <COMMAND> --help");
}
