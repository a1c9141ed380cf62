//! Command implementations for the depot-ingest CLI
//!
//! Each command is implemented in its own module:
//! - `ingest`: statement files to holdings database
//! - `show`: holdings listing for one depot

pub mod ingest;
pub mod shared;
pub mod show;

pub use shared::CommandStats;

use crate::Result;
use crate::cli::args::{Args, Commands};

/// Main command runner
pub async fn run(args: Args) -> Result<CommandStats> {
    match args.get_command()? {
        Commands::Ingest(ingest_args) => ingest::run_ingest(ingest_args).await,
        Commands::Show(show_args) => show::run_show(show_args).await,
    }
}
