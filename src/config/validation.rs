//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Check name uniqueness and weight ranges
//! - Validate URIs and timer intervals
//!
//! # Design Decisions
//! - Returns all validation errors, not just the first
//! - Validation is a pure function: RouterConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use url::Url;

use crate::config::schema::RouterConfig;

/// A single semantic validation failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    DuplicateName(String),
    EmptyName,
    ZeroWeight(String),
    InvalidUri { name: String, uri: String },
    ZeroInterval(&'static str),
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValidationError::DuplicateName(name) => {
                write!(f, "duplicate replica name '{}'", name)
            }
            ValidationError::EmptyName => write!(f, "replica name must not be empty"),
            ValidationError::ZeroWeight(name) => {
                write!(f, "replica '{}' has zero weight", name)
            }
            ValidationError::InvalidUri { name, uri } => {
                write!(f, "replica '{}' has invalid URI '{}'", name, uri)
            }
            ValidationError::ZeroInterval(field) => {
                write!(f, "{} must be greater than zero", field)
            }
        }
    }
}

/// Validate a configuration, collecting every error found.
pub fn validate_config(config: &RouterConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();
    let mut seen_names = std::collections::HashSet::new();

    for replica in &config.replicas {
        if replica.name.is_empty() {
            errors.push(ValidationError::EmptyName);
        } else if !seen_names.insert(replica.name.as_str()) {
            errors.push(ValidationError::DuplicateName(replica.name.clone()));
        }
        if replica.weight == 0 {
            errors.push(ValidationError::ZeroWeight(replica.name.clone()));
        }
        if Url::parse(&replica.uri).is_err() {
            errors.push(ValidationError::InvalidUri {
                name: replica.name.clone(),
                uri: replica.uri.clone(),
            });
        }
    }

    if config.health_check.interval_secs == 0 {
        errors.push(ValidationError::ZeroInterval("health_check.interval_secs"));
    }
    if config.health_check.timeout_secs == 0 {
        errors.push(ValidationError::ZeroInterval("health_check.timeout_secs"));
    }
    if config.stats.flush_interval_secs == 0 {
        errors.push(ValidationError::ZeroInterval("stats.flush_interval_secs"));
    }
    if config.query.timeout_secs == 0 {
        errors.push(ValidationError::ZeroInterval("query.timeout_secs"));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
