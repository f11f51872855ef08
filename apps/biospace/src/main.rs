//! # BioSpace Explorer
//!
//! The main binary for the BioSpace publications API.
//!
//! ## Architecture
//!
//! ```text
//! ┌───────────────────────────────────────────────────┐
//! │              apps/biospace (THE BINARY)           │
//! │                                                   │
//! │   ┌─────────────┐           ┌─────────────┐       │
//! │   │   CLI       │           │   HTTP API  │       │
//! │   │  (clap)     │           │   (axum)    │       │
//! │   └──────┬──────┘           └──────┬──────┘       │
//! │          └────────────┬────────────┘              │
//! │                       ▼                           │
//! │              ┌─────────────────┐                  │
//! │              │  biospace-core  │                  │
//! │              │   (THE LOGIC)   │                  │
//! │              └─────────────────┘                  │
//! └───────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```bash
//! # Start the HTTP server
//! biospace server --host 0.0.0.0 --port 5000 -D dataset/608publications.csv
//!
//! # CLI operations
//! biospace search --q microgravity --category genomics --limit 5
//! biospace show 42
//! biospace stats --json-mode
//! ```

use biospace::cli;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

// =============================================================================
// APPLICATION ENTRY POINT
// =============================================================================

#[tokio::main]
async fn main() {
    // BIOSPACE_LOG_FORMAT=json enables machine-parseable output.
    let log_format = std::env::var("BIOSPACE_LOG_FORMAT").unwrap_or_else(|_| "text".to_string());

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "biospace=info,biospace_core=info,tower_http=debug".into());

    match log_format.as_str() {
        "json" => {
            tracing_subscriber::registry()
                .with(filter)
                .with(tracing_subscriber::fmt::layer().json())
                .init();
        }
        _ => {
            tracing_subscriber::registry()
                .with(filter)
                .with(tracing_subscriber::fmt::layer())
                .init();
        }
    }

    let cli = cli::Cli::parse();

    if cli.shows_banner() {
        print_banner();
    }

    if let Err(e) = cli::execute(cli).await {
        tracing::error!("Error: {}", e);
        std::process::exit(1);
    }
}

/// Print the startup banner.
fn print_banner() {
    println!(
        r#"
  ____  _       ____
 | __ )(_) ___ / ___| _ __   __ _  ___ ___
 |  _ \| |/ _ \\___ \| '_ \ / _` |/ __/ _ \
 | |_) | | (_) |___) | |_) | (_| | (_|  __/
 |____/|_|\___/|____/| .__/ \__,_|\___\___|
                     |_|

  BioSpace Explorer API v{}
"#,
        env!("CARGO_PKG_VERSION")
    );
}
