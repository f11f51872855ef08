//! # BioSpace CLI Module
//!
//! This module implements the CLI interface for BioSpace.
//!
//! ## Available Commands
//!
//! - `server` - Load the dataset and start the HTTP server (default)
//! - `search` - Run one publications query and print the page
//! - `show` - Print one publication by id
//! - `stats` - Print category, organism and impact counts

mod commands;

use crate::config::{Overrides, ServerConfig};
use crate::error::AppError;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

pub use commands::*;

// =============================================================================
// CLI STRUCTURE
// =============================================================================

/// BioSpace Explorer
///
/// Read-only search and aggregation API over a table of space biology
/// publications.
#[derive(Parser, Debug)]
#[command(name = "biospace")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Suppress banner output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Path to the publications CSV
    #[arg(short = 'D', long, global = true)]
    pub dataset: Option<PathBuf>,

    /// Path to a TOML configuration file
    #[arg(short = 'c', long, global = true)]
    pub config: Option<PathBuf>,

    /// Output in JSON format (for programmatic access)
    #[arg(long, global = true)]
    pub json_mode: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start HTTP server
    Server {
        /// Host to bind to
        #[arg(short = 'H', long)]
        host: Option<String>,

        /// Port to bind to
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Search publications
    Search {
        /// Text to find in title or summary
        #[arg(long = "q", visible_alias = "query")]
        q: Option<String>,

        /// Category filter (comma-separated alternatives)
        #[arg(long)]
        category: Option<String>,

        /// Organism filter
        #[arg(long)]
        organism: Option<String>,

        /// Impact filter
        #[arg(long)]
        impact: Option<String>,

        /// Number of matches to skip
        #[arg(long, allow_hyphen_values = true)]
        offset: Option<String>,

        /// Maximum number of matches to print
        #[arg(long, allow_hyphen_values = true)]
        limit: Option<String>,

        /// Column to sort by (e.g. Title, Impact)
        #[arg(long)]
        sort_by: Option<String>,
    },

    /// Show one publication
    Show {
        /// Publication id
        #[arg(allow_negative_numbers = true)]
        id: i64,
    },

    /// Show aggregate counts
    Stats,
}

impl Cli {
    /// The banner is for humans; it would corrupt `--json-mode` output.
    pub fn shows_banner(&self) -> bool {
        !self.quiet && !self.json_mode
    }
}

// =============================================================================
// COMMAND EXECUTION
// =============================================================================

/// Execute the CLI with parsed arguments.
pub async fn execute(cli: Cli) -> Result<(), AppError> {
    let json_mode = cli.json_mode;

    let (host, port) = match &cli.command {
        Some(Commands::Server { host, port }) => (host.clone(), *port),
        _ => (None, None),
    };
    let overrides = Overrides {
        host,
        port,
        dataset: cli.dataset.clone(),
    };
    let config = ServerConfig::resolve(cli.config.as_deref(), &overrides)?;

    match cli.command {
        Some(Commands::Server { .. }) | None => cmd_server(&config).await,
        Some(Commands::Search {
            q,
            category,
            organism,
            impact,
            offset,
            limit,
            sort_by,
        }) => {
            let params = biospace_core::QueryParams {
                q,
                category,
                organism,
                impact,
                offset,
                limit,
                sort_by,
            };
            cmd_search(&config.dataset, json_mode, &params)
        }
        Some(Commands::Show { id }) => cmd_show(&config.dataset, json_mode, id),
        Some(Commands::Stats) => cmd_stats(&config.dataset, json_mode),
    }
}

// =============================================================================
// TESTS
// =============================================================================
