//! Configuration structures for the claim intake pipeline.

use std::collections::BTreeMap;
use std::path::PathBuf;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::claim::ClaimField;

/// Main configuration for the fnol pipeline.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FnolConfig {
    /// Document and field extraction configuration.
    pub extraction: ExtractionConfig,

    /// Routing configuration.
    pub routing: RoutingConfig,

    /// Claim storage configuration.
    pub storage: StorageConfig,

    /// HTTP server configuration.
    pub server: ServerConfig,
}

/// Document and field extraction configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Document analyzed when a request carries no upload.
    pub sample_document: PathBuf,

    /// Additional label aliases per field, tried after the built-in ones.
    pub extra_aliases: BTreeMap<ClaimField, Vec<String>>,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            sample_document: PathBuf::from("fnols/sample.pdf"),
            extra_aliases: BTreeMap::new(),
        }
    }
}

/// Routing configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RoutingConfig {
    /// Claims estimated strictly below this amount are fast-tracked.
    pub fast_track_threshold: Decimal,
}

impl Default for RoutingConfig {
    fn default() -> Self {
        Self {
            fast_track_threshold: Decimal::from(25_000),
        }
    }
}

/// Claim storage backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StorageBackend {
    /// Claims kept in process memory only.
    Memory,
    /// Claims persisted to a JSON file.
    Json,
}

/// Claim storage configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub backend: StorageBackend,

    /// Path of the JSON claims file.
    pub path: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackend::Json,
            path: PathBuf::from("claims.json"),
        }
    }
}

/// HTTP server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,

    /// Log filter directive (trace, debug, info, warn, error).
    pub log_level: String,

    /// Maximum accepted upload size in bytes.
    pub max_upload_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            log_level: "info".to_string(),
            max_upload_bytes: 10 * 1024 * 1024,
        }
    }
}

impl ServerConfig {
    /// Returns the server address.
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl FnolConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &std::path::Path) -> Result<Self, std::io::Error> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content).map_err(|e| {
            std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string())
        })
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &std::path::Path) -> Result<(), std::io::Error> {
        let content = serde_json::to_string_pretty(self).map_err(|e| {
            std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string())
        })?;
        std::fs::write(path, content)
    }
}
