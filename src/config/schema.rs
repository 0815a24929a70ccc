//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the bridge.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Root configuration for the kernel bridge.
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq)]
#[serde(default)]
pub struct BridgeConfig {
    /// Listener configuration (bind address, timeouts).
    pub listener: ListenerConfig,

    /// Kernel environment and feature toggles.
    pub server: ServerConfig,

    /// Upload handling.
    pub uploads: UploadConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8000").
    pub bind_address: String,

    /// Request timeout (total time for request/response) in seconds.
    pub request_timeout_secs: u64,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8000".to_string(),
            request_timeout_secs: 30,
        }
    }
}

/// Kernel environment and request translation toggles.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct ServerConfig {
    /// Kernel environment name (e.g., "dev", "prod").
    pub environment: String,

    /// Build the kernel in debug mode.
    pub debug: bool,

    /// Skip upload materialization; requests reach the kernel without files.
    pub uploads_disabled: bool,

    /// Strip cookies from every request.
    pub cookies_disabled: bool,

    /// Event exchanges to subscribe to, as "exchange" or "exchange:queue".
    pub exchanges: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            environment: "dev".to_string(),
            debug: false,
            uploads_disabled: false,
            cookies_disabled: false,
            exchanges: Vec::new(),
        }
    }
}

/// Upload handling configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct UploadConfig {
    /// Directory for materialized uploads. Defaults to the OS temp dir.
    pub temp_dir: Option<String>,

    /// Maximum request body size in bytes.
    pub max_body_bytes: usize,
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            temp_dir: None,
            max_body_bytes: 8 * 1024 * 1024, // 8MB
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error) or a full filter directive.
    pub log_level: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}
