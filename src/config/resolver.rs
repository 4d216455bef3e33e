//! Replica configuration resolution.
//!
//! Turns the external configuration (file-level replicas plus the
//! `REPLICA_URIS` environment variable) into the final list of
//! `ReplicaConfig` records handed to the pool. Runs once per process.

use std::collections::HashSet;

use url::Url;

use crate::config::schema::{ReplicaConfig, RouterConfig};

/// Environment variable holding comma-separated replica URIs.
///
/// Entries are auto-named `replica-1`, `replica-2`, ... and carry default
/// weight and pool settings.
pub const REPLICA_URIS_ENV: &str = "REPLICA_URIS";

/// Resolve the final replica list from config and environment.
///
/// Unparseable URIs are dropped with a warning. Configs whose URI is
/// already present under a different name are dropped, first occurrence
/// wins. Zero resulting replicas is not an error.
pub fn resolve(config: &RouterConfig) -> Vec<ReplicaConfig> {
    resolve_with_env(config, std::env::var(REPLICA_URIS_ENV).ok().as_deref())
}

fn resolve_with_env(config: &RouterConfig, env_uris: Option<&str>) -> Vec<ReplicaConfig> {
    let env_replicas = env_uris
        .iter()
        .flat_map(|raw| raw.split(','))
        .map(str::trim)
        .filter(|uri| !uri.is_empty())
        .enumerate()
        .map(|(i, uri)| ReplicaConfig::new(format!("replica-{}", i + 1), uri));

    let mut seen_uris: HashSet<String> = HashSet::new();
    let mut resolved = Vec::new();

    for replica in config.replicas.iter().cloned().chain(env_replicas) {
        if Url::parse(&replica.uri).is_err() {
            tracing::warn!(
                replica = %replica.name,
                uri = %replica.uri,
                "Skipping replica with unparseable URI"
            );
            continue;
        }
        if !seen_uris.insert(replica.uri.clone()) {
            tracing::debug!(
                replica = %replica.name,
                uri = %replica.uri,
                "Duplicate replica URI, first occurrence wins"
            );
            continue;
        }
        resolved.push(replica);
    }

    tracing::info!(count = resolved.len(), "Replica configuration resolved");
    resolved
}
