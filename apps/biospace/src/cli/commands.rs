//! # CLI Command Implementations
//!
//! This module contains the actual implementations of CLI commands.

use crate::api;
use crate::config::ServerConfig;
use crate::error::AppError;
use biospace_core::{
    FrequencyTable, QueryEngine, QueryParams, QuerySpec, Record, RecordStore, Stats,
};
use std::path::Path;

/// Number of entries printed per frequency table in text mode.
const STATS_TOP_N: usize = 10;

// =============================================================================
// DATASET LOADING
// =============================================================================

/// Load the dataset once, logging its shape.
///
/// Any failure here is fatal to the calling command.
pub fn load_store(path: &Path) -> Result<RecordStore, AppError> {
    tracing::info!("Loading dataset from {:?}", path);

    let store = RecordStore::load(path).inspect_err(|e| {
        tracing::error!("Dataset unavailable: {}", e);
    })?;

    tracing::info!(
        records = store.len(),
        columns = store.columns().len(),
        "Dataset loaded"
    );

    Ok(store)
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<(), AppError> {
    let json = serde_json::to_string_pretty(value)?;
    println!("{}", json);
    Ok(())
}

// =============================================================================
// SERVER COMMAND
// =============================================================================

/// Load the dataset, then start the HTTP server.
pub async fn cmd_server(config: &ServerConfig) -> Result<(), AppError> {
    let store = load_store(&config.dataset)?;

    println!("BioSpace Explorer API Starting...");
    println!();
    println!("Configuration:");
    println!("  Host:       {}", config.host);
    println!("  Port:       {}", config.port);
    println!("  Dataset:    {:?}", config.dataset);
    println!("  Records:    {}", store.len());
    println!("  Rate limit: {}", config.api.rate_limit);
    println!();
    println!("Endpoints:");
    println!("  GET /                        - Welcome message");
    println!("  GET /health                  - Health check");
    println!("  GET /api/experiments         - Full table");
    println!("  GET /api/publications        - Search and filter");
    println!("  GET /api/publications/{{id}}   - One publication");
    println!("  GET /api/publications/stats  - Aggregate counts");
    println!();
    println!("Press Ctrl+C to stop");
    println!();

    api::run_server(&config.bind_address(), store, &config.api).await
}

// =============================================================================
// SEARCH COMMAND
// =============================================================================

/// Run one query and print the resulting page.
pub fn cmd_search(
    dataset: &Path,
    json_mode: bool,
    params: &QueryParams,
) -> Result<(), AppError> {
    // Bad offset/limit fails before the dataset is read.
    let spec = QuerySpec::from_params(params)?;
    let store = load_store(dataset)?;
    let result = QueryEngine::execute(store.all(), &spec);

    if json_mode {
        return print_json(&result);
    }

    println!("BioSpace Publications");
    println!("=====================");
    println!(
        "Matches: {} (showing {} from offset {})",
        result.total,
        result.results.len(),
        result.offset
    );
    println!();

    for record in &result.results {
        print_summary_line(record);
    }

    Ok(())
}

fn print_summary_line(record: &Record) {
    println!(
        "[{:>4}] {} | {} | {} | {}",
        record.id.index(),
        record.title,
        record.category,
        record.organism,
        record.impact
    );
}

// =============================================================================
// SHOW COMMAND
// =============================================================================

/// Print one publication.
pub fn cmd_show(dataset: &Path, json_mode: bool, id: i64) -> Result<(), AppError> {
    let store = load_store(dataset)?;
    let record = store.by_id(id)?;

    if json_mode {
        return print_json(record);
    }

    println!("Publication {}", record.id.index());
    println!("===============");
    println!("Title:    {}", record.title);
    println!("Category: {}", record.category);
    println!("Organism: {}", record.organism);
    println!("Impact:   {}", record.impact);
    for (column, value) in &record.extra {
        println!("{}: {}", column, value);
    }
    println!();
    println!("{}", record.summary);

    Ok(())
}

// =============================================================================
// STATS COMMAND
// =============================================================================

/// Print aggregate counts.
pub fn cmd_stats(dataset: &Path, json_mode: bool) -> Result<(), AppError> {
    let store = load_store(dataset)?;
    let stats = Stats::compute(store.all());

    if json_mode {
        return print_json(&stats);
    }

    println!("BioSpace Dataset Stats");
    println!("======================");
    println!("Publications: {}", stats.total_publications);

    print_table("Category", &stats.by_category);
    print_table("Organism", &stats.by_organism);
    print_table("Impact", &stats.by_impact);

    Ok(())
}

fn print_table(name: &str, table: &FrequencyTable) {
    println!();
    println!("By {} ({} distinct):", name, table.len());
    for (value, count) in table.iter().take(STATS_TOP_N) {
        let label = if value.is_empty() { "(empty)" } else { value };
        println!("  {:>5}  {}", count, label);
    }
    if table.len() > STATS_TOP_N {
        println!("  ...");
    }
}

// =============================================================================
// TESTS
// =============================================================================
