//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the
//! replica router. All types derive Serde traits for deserialization
//! from config files.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Root configuration for the replica router.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct RouterConfig {
    /// Read replica definitions.
    pub replicas: Vec<ReplicaConfig>,

    /// Health check settings.
    pub health_check: HealthCheckConfig,

    /// Stats flush settings.
    pub stats: StatsConfig,

    /// Per-query defaults.
    pub query: QueryDefaults,
}

/// A single read replica.
///
/// Immutable once resolved; reconfiguration replaces the whole list.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ReplicaConfig {
    /// Unique replica identifier.
    pub name: String,

    /// Connection URI.
    pub uri: String,

    /// Relative selection weight (must be > 0).
    pub weight: u32,

    /// Maximum pool size passed through to the driver.
    pub max_pool_size: u32,

    /// Read preference tag passed through to the driver.
    pub read_preference: String,

    /// Arbitrary tags passed through to the driver.
    pub tags: HashMap<String, String>,

    /// Disabled replicas are never connected, probed, or selected.
    pub enabled: bool,
}

impl Default for ReplicaConfig {
    fn default() -> Self {
        Self {
            name: String::new(),
            uri: String::new(),
            weight: default_weight(),
            max_pool_size: default_max_pool_size(),
            read_preference: default_read_preference(),
            tags: HashMap::new(),
            enabled: true,
        }
    }
}

impl ReplicaConfig {
    /// Minimal config for a named URI; everything else defaulted.
    pub fn new(name: impl Into<String>, uri: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            uri: uri.into(),
            ..Self::default()
        }
    }

    pub fn with_weight(mut self, weight: u32) -> Self {
        self.weight = weight;
        self
    }

    pub fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }
}

fn default_weight() -> u32 {
    1
}

fn default_max_pool_size() -> u32 {
    10
}

fn default_read_preference() -> String {
    "secondaryPreferred".to_string()
}

/// Health check configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct HealthCheckConfig {
    /// Enable periodic health checks.
    pub enabled: bool,

    /// Interval between probe sweeps in seconds.
    pub interval_secs: u64,

    /// Timeout for each individual ping in seconds.
    pub timeout_secs: u64,
}

impl Default for HealthCheckConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            interval_secs: 30,
            timeout_secs: 5,
        }
    }
}

/// Stats flush configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct StatsConfig {
    /// Interval between flushes to the metrics sink in seconds.
    pub flush_interval_secs: u64,
}

impl Default for StatsConfig {
    fn default() -> Self {
        Self {
            flush_interval_secs: 60,
        }
    }
}

/// Defaults applied when a caller does not set query options explicitly.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct QueryDefaults {
    /// Default per-attempt timeout in seconds.
    pub timeout_secs: u64,

    /// Timeout for queries pinned to the analytics replica in seconds.
    pub analytics_timeout_secs: u64,
}

impl Default for QueryDefaults {
    fn default() -> Self {
        Self {
            timeout_secs: 30,
            analytics_timeout_secs: 120,
        }
    }
}
