//! # BioSpace Explorer
//!
//! HTTP API, CLI and configuration around the `biospace-core` query engine.

pub mod api;
pub mod cli;
pub mod config;
pub mod error;
