//! # biospace-core
//!
//! The query engine for the BioSpace publications dataset - THE LOGIC.
//!
//! This crate holds the immutable record store and the stateless engine
//! that filters, sorts, paginates and aggregates it.
//!
//! ## Architectural Constraints
//!
//! - The record store is built once and is read-only afterwards
//! - Every query is a pure function of (records, query spec)
//! - Has NO async, NO network dependencies (pure Rust)
//!
//! ## Example
//!
//! ```
//! use biospace_core::{QueryEngine, QuerySpec, RecordStore};
//!
//! let table = "Title,Summary,Category,Organism,Impact\n\
//!              Bone loss,Mice in orbit,Physiology,Mouse,High\n";
//! let store = RecordStore::from_reader(table.as_bytes()).expect("load");
//!
//! let spec = QuerySpec::new().organism("mouse");
//! let page = QueryEngine::execute(store.all(), &spec);
//! assert_eq!(page.total, 1);
//! ```

// =============================================================================
// MODULES
// =============================================================================

pub mod primitives;
pub mod query;
pub mod stats;
pub mod store;
pub mod types;

// =============================================================================
// RE-EXPORTS
// =============================================================================

pub use query::{QueryEngine, QueryParams, QueryResult, QuerySpec};
pub use stats::{FrequencyTable, Stats};
pub use store::RecordStore;
pub use types::{BiospaceError, Record, RecordId, RecordRow};
