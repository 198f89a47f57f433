//! mist CLI
//!
//! Splits a Mattermost bulk import archive into smaller archives.
//!
//! # Commands
//!
//! - `split` - Write the segments (or preview them with `--dry-run`)
//! - `inspect` - Summarise the records and attachments of an archive

mod commands;

use clap::{Parser, Subcommand};
use commands::size::parse_size;
use mist_core::{Compression, SplitConfig};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Mattermost import archive splitter.
#[derive(Parser)]
#[command(name = "mist")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(global = true, short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Split an import archive into size-bounded segments
    Split {
        /// Import archive to split
        #[arg(short, long, default_value = "mattermost_import.zip")]
        archive: PathBuf,

        /// Prefix of the output file names, the segment number will be appended
        #[arg(short, long, default_value = "mattermost_split_")]
        prefix: String,

        /// The maximum number of lines per segment (0 = unlimited)
        #[arg(short, long, default_value = "100000")]
        lines: u64,

        /// The maximum number of bytes in attachments per segment (0 = unlimited)
        #[arg(short, long, default_value = "512MiB", value_parser = parse_size)]
        size: u64,

        /// Longest accepted record line
        #[arg(long, default_value = "64MiB", value_parser = parse_size)]
        max_line_length: u64,

        /// Store entries without compression
        #[arg(long)]
        store: bool,

        /// Show where the segments would be cut without writing them
        #[arg(short, long)]
        dry_run: bool,

        /// Output format (text, json)
        #[arg(short, long, default_value = "text")]
        format: String,
    },

    /// Summarise the records and attachments of an import archive
    Inspect {
        /// Import archive to inspect
        #[arg(short, long, default_value = "mattermost_import.zip")]
        archive: PathBuf,

        /// Output format (text, json)
        #[arg(short, long, default_value = "text")]
        format: String,
    },

    /// Show version information
    Version,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    match cli.command {
        Commands::Split {
            archive,
            prefix,
            lines,
            size,
            max_line_length,
            store,
            dry_run,
            format,
        } => {
            let max_line_length = usize::try_from(max_line_length)
                .map_err(|_| "max line length does not fit in memory")?;
            let config = SplitConfig::new()
                .archive(archive)
                .prefix(prefix)
                .max_lines(lines)
                .max_bytes(size)
                .max_line_length(max_line_length)
                .compression(if store {
                    Compression::Stored
                } else {
                    Compression::Deflated
                });
            commands::split::run(config, dry_run, &format)?;
        }
        Commands::Inspect { archive, format } => {
            commands::inspect::run(&archive, &format)?;
        }
        Commands::Version => {
            println!("mist CLI v{}", env!("CARGO_PKG_VERSION"));
            println!("mist core v{}", mist_core::VERSION);
        }
    }

    Ok(())
}
