//! # Configuration
//!
//! Server settings, resolved from four layers (highest wins):
//!
//! 1. Command-line flags
//! 2. Environment variables (`BIOSPACE_*`)
//! 3. An optional TOML file (`--config biospace.toml`)
//! 4. Built-in defaults
//!
//! ## Environment Variables
//!
//! - `BIOSPACE_HOST`, `BIOSPACE_PORT`: listen address
//! - `BIOSPACE_DATASET`: path to the publications CSV
//! - `BIOSPACE_CORS_ORIGINS`: comma-separated allowed origins, or "*" (default)
//! - `BIOSPACE_RATE_LIMIT`: requests per second (default: 0, limiting off)
//!
//! ## File Format
//!
//! ```toml
//! [server]
//! host = "0.0.0.0"
//! port = 5000
//! dataset = "dataset/608publications.csv"
//! cors_origins = ["https://explorer.example.org"]
//! rate_limit = 50
//! ```

use crate::error::AppError;
use serde::Deserialize;
use std::path::{Path, PathBuf};

// =============================================================================
// DEFAULTS
// =============================================================================

pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 5000;
pub const DEFAULT_DATASET: &str = "dataset/608publications.csv";
/// Rate limiting is opt-in; 0 means no limiter.
pub const DEFAULT_RATE_LIMIT: u32 = 0;

/// Maximum configuration file size (1 MB).
const MAX_CONFIG_FILE_SIZE: u64 = 1024 * 1024;

// =============================================================================
// RESOLVED CONFIGURATION
// =============================================================================

/// Which origins may call the API from a browser.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum CorsPolicy {
    /// Any origin, no credentials.
    #[default]
    Any,
    /// Only the listed origins.
    Origins(Vec<String>),
}

impl CorsPolicy {
    /// Parse a list of origins; a lone `*` (or nothing) means any origin.
    pub fn from_origins<I, S>(origins: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let origins: Vec<String> = origins
            .into_iter()
            .map(|o| o.as_ref().trim().to_string())
            .filter(|o| !o.is_empty())
            .collect();

        if origins.is_empty() || origins.iter().any(|o| o == "*") {
            Self::Any
        } else {
            Self::Origins(origins)
        }
    }
}

/// Settings for the HTTP layer itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    pub cors: CorsPolicy,
    /// Requests per second across all clients; 0 disables limiting.
    pub rate_limit: u32,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            cors: CorsPolicy::Any,
            rate_limit: DEFAULT_RATE_LIMIT,
        }
    }
}

/// Fully resolved server configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub dataset: PathBuf,
    pub api: ApiConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            dataset: PathBuf::from(DEFAULT_DATASET),
            api: ApiConfig::default(),
        }
    }
}

impl ServerConfig {
    /// `host:port` for the listener.
    #[must_use]
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Resolve configuration against the process environment.
    pub fn resolve(file: Option<&Path>, overrides: &Overrides) -> Result<Self, AppError> {
        Self::resolve_with(file, overrides, |key| std::env::var(key).ok())
    }

    /// Resolve configuration with an explicit environment lookup.
    pub fn resolve_with<F>(
        file: Option<&Path>,
        overrides: &Overrides,
        env: F,
    ) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(path) = file {
            FileConfig::load(path)?.server.apply(&mut config);
        }

        apply_env(&mut config, &env);
        overrides.apply(&mut config);

        Ok(config)
    }
}

// =============================================================================
// COMMAND-LINE OVERRIDES
// =============================================================================

/// Values given explicitly on the command line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Overrides {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub dataset: Option<PathBuf>,
}

impl Overrides {
    fn apply(&self, config: &mut ServerConfig) {
        if let Some(host) = &self.host {
            config.host.clone_from(host);
        }
        if let Some(port) = self.port {
            config.port = port;
        }
        if let Some(dataset) = &self.dataset {
            config.dataset.clone_from(dataset);
        }
    }
}

// =============================================================================
// ENVIRONMENT
// =============================================================================

fn apply_env<F>(config: &mut ServerConfig, env: &F)
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(host) = env("BIOSPACE_HOST").filter(|h| !h.is_empty()) {
        config.host = host;
    }

    if let Some(raw) = env("BIOSPACE_PORT") {
        match raw.trim().parse() {
            Ok(port) => config.port = port,
            Err(_) => tracing::warn!("Ignoring invalid BIOSPACE_PORT '{}'", raw),
        }
    }

    if let Some(dataset) = env("BIOSPACE_DATASET").filter(|d| !d.is_empty()) {
        config.dataset = PathBuf::from(dataset);
    }

    if let Some(origins) = env("BIOSPACE_CORS_ORIGINS") {
        config.api.cors = CorsPolicy::from_origins(origins.split(','));
    }

    if let Some(raw) = env("BIOSPACE_RATE_LIMIT") {
        match raw.trim().parse() {
            Ok(rate_limit) => config.api.rate_limit = rate_limit,
            Err(_) => tracing::warn!("Ignoring invalid BIOSPACE_RATE_LIMIT '{}'", raw),
        }
    }
}

// =============================================================================
// CONFIGURATION FILE
// =============================================================================

/// On-disk configuration file.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    pub server: ServerSection,
}

/// `[server]` table of the configuration file. Every key is optional.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ServerSection {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub dataset: Option<PathBuf>,
    pub cors_origins: Option<Vec<String>>,
    pub rate_limit: Option<u32>,
}

impl FileConfig {
    /// Read and parse a TOML configuration file.
    pub fn load(path: &Path) -> Result<Self, AppError> {
        let metadata = std::fs::metadata(path).map_err(|e| {
            AppError::Config(format!("Cannot read '{}': {}", path.display(), e))
        })?;

        if metadata.len() > MAX_CONFIG_FILE_SIZE {
            return Err(AppError::Config(format!(
                "'{}' is {} bytes, maximum is {}",
                path.display(),
                metadata.len(),
                MAX_CONFIG_FILE_SIZE
            )));
        }

        let text = std::fs::read_to_string(path).map_err(|e| {
            AppError::Config(format!("Cannot read '{}': {}", path.display(), e))
        })?;

        Self::parse(&text)
            .map_err(|e| AppError::Config(format!("Invalid '{}': {}", path.display(), e)))
    }

    /// Parse TOML text.
    pub fn parse(text: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(text)
    }
}

impl ServerSection {
    fn apply(self, config: &mut ServerConfig) {
        if let Some(host) = self.host {
            config.host = host;
        }
        if let Some(port) = self.port {
            config.port = port;
        }
        if let Some(dataset) = self.dataset {
            config.dataset = dataset;
        }
        if let Some(origins) = self.cors_origins {
            config.api.cors = CorsPolicy::from_origins(origins);
        }
        if let Some(rate_limit) = self.rate_limit {
            config.api.rate_limit = rate_limit;
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================
