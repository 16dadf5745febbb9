//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → EngineConfig (validated, immutable)
//!     → ChainRegistry + SignerService construction, shared by reference
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded
//! - All fields have defaults so minimal configs work
//! - Validation separates syntactic (serde) from semantic checks
//! - No ambient globals: every component receives its config explicitly

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, ConfigError};
pub use schema::{ChainConfig, EngineConfig, MpcConfig, ObservabilityConfig, StorageConfig};
