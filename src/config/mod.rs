//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → RouterConfig (validated, immutable)
//!
//! resolver.rs:
//!     RouterConfig replicas + REPLICA_URIS env var
//!     → drop unparseable URIs
//!     → dedupe by URI (first occurrence wins)
//!     → Vec<ReplicaConfig> handed to the pool
//! ```
//!
//! # Design Decisions
//! - Config is immutable once resolved; reconfiguration replaces the
//!   whole replica set, never patches it
//! - All fields have defaults to allow minimal configs
//! - Resolution runs once per process; the source is not re-read
//! - Zero resolved replicas is valid: the router degrades to primary-only

pub mod loader;
pub mod resolver;
pub mod schema;
pub mod validation;

pub use loader::{load_config, ConfigError};
pub use resolver::resolve;
pub use schema::HealthCheckConfig;
pub use schema::QueryDefaults;
pub use schema::ReplicaConfig;
pub use schema::RouterConfig;
pub use schema::StatsConfig;
