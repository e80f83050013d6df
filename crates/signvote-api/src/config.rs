//! Configuration for the signature service.

use anyhow::{Context, Result};
use secrecy::SecretString;
use serde::Deserialize;
use signvote_core::DEFAULT_TARGET;
use std::num::NonZeroU32;
use std::path::PathBuf;

/// Service configuration.
#[derive(Debug, Deserialize)]
pub struct Config {
    /// Server configuration
    #[serde(default)]
    pub server: ServerConfig,

    /// Petition configuration
    #[serde(default)]
    pub petition: PetitionConfig,

    /// Bearer token authentication
    pub auth: AuthConfig,

    /// Signature storage configuration
    #[serde(default)]
    pub storage: StorageConfig,

    /// Rate limiting configuration
    #[serde(default)]
    pub rate_limit: RateLimitConfig,

    /// Logging configuration
    #[serde(default)]
    pub log: LogConfig,

    /// Deployment information
    #[serde(default)]
    pub app: AppConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Server listen address
    #[serde(default = "default_listen_addr")]
    pub listen_addr: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PetitionConfig {
    /// Number of signatures that counts as 100% progress
    #[serde(default = "default_target")]
    pub target: NonZeroU32,
}

#[derive(Debug, Deserialize)]
pub struct AuthConfig {
    /// Shared bearer token required on every non-status route
    pub token: SecretString,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    /// Path to the JSON snapshot file
    #[serde(default = "default_storage_path")]
    pub path: PathBuf,

    /// Enable persistence (if false, signatures are in-memory only)
    #[serde(default = "default_true")]
    pub persist: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RateLimitConfig {
    /// Global requests per minute
    #[serde(default = "default_global_rpm")]
    pub global_per_minute: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LogConfig {
    /// Log level
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Emit JSON lines instead of human-readable output
    #[serde(default)]
    pub json: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Deployment environment reported by /health and /version
    #[serde(default = "default_environment")]
    pub environment: String,
}

// Default implementations
impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_addr: default_listen_addr(),
            port: default_port(),
        }
    }
}

impl Default for PetitionConfig {
    fn default() -> Self {
        Self {
            target: default_target(),
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            path: default_storage_path(),
            persist: true,
        }
    }
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            global_per_minute: default_global_rpm(),
        }
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            environment: default_environment(),
        }
    }
}

// Default value functions
fn default_listen_addr() -> String {
    "0.0.0.0".into()
}

fn default_port() -> u16 {
    8787
}

fn default_target() -> NonZeroU32 {
    NonZeroU32::new(DEFAULT_TARGET).unwrap_or(NonZeroU32::MIN)
}

fn default_storage_path() -> PathBuf {
    PathBuf::from("/data/signatures.json")
}

fn default_true() -> bool {
    true
}

fn default_global_rpm() -> u32 {
    120
}

fn default_log_level() -> String {
    "info".into()
}

fn default_environment() -> String {
    "development".into()
}

impl Config {
    /// Load configuration from environment variables.
    pub fn load() -> Result<Self> {
        // Load .env file if present
        dotenvy::dotenv().ok();

        Self::from_source(config::Environment::default().separator("__"))
    }

    /// Build configuration from any `config` source.
    pub fn from_source<S>(source: S) -> Result<Self>
    where
        S: config::Source + Send + Sync + 'static,
    {
        let config = config::Config::builder()
            .add_source(source)
            .build()
            .context("Failed to build configuration")?;

        config
            .try_deserialize()
            .context("Failed to deserialize configuration")
    }
}
