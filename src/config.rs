//! Runtime configuration read from environment variables, with defaults.
//!
//! HOST, PORT, SCOREKEEPER_DATA, SCOREKEEPER_K_FACTOR, SCOREKEEPER_TOP_N.
//! Unset or unparseable values fall back to the default.

use crate::logic::{DEFAULT_TOP_N, K_FACTOR};
use std::path::PathBuf;
use std::str::FromStr;

/// Tunables for the scoring engine.
#[derive(Clone, Debug, PartialEq)]
pub struct EngineConfig {
    /// Elo K-factor.
    pub k_factor: f64,
    /// Rows shown by a capped standings view.
    pub top_n: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            k_factor: K_FACTOR,
            top_n: DEFAULT_TOP_N,
        }
    }
}

impl EngineConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        let k_factor = env_or("SCOREKEEPER_K_FACTOR", defaults.k_factor);
        Self {
            k_factor: if k_factor.is_finite() && k_factor > 0.0 {
                k_factor
            } else {
                defaults.k_factor
            },
            top_n: env_or("SCOREKEEPER_TOP_N", defaults.top_n),
        }
    }
}

/// Where the web binary listens and stores its data.
#[derive(Clone, Debug, PartialEq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub data_path: PathBuf,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            data_path: PathBuf::from("scoreboards.json"),
        }
    }
}

impl ServerConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            host: std::env::var("HOST").unwrap_or(defaults.host),
            port: env_or("PORT", defaults.port),
            data_path: std::env::var_os("SCOREKEEPER_DATA")
                .map(PathBuf::from)
                .unwrap_or(defaults.data_path),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn env_or<T: FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}
