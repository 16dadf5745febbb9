//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! All subsystems produce:
//!     → logging.rs (structured log events via tracing)
//!     → metrics.rs (counters for signing, relay, scanning)
//!
//! Consumers:
//!     → Log aggregation (stdout, JSON in production)
//!     → Whatever metrics recorder the host application installs
//! ```
//!
//! # Design Decisions
//! - Structured logging (JSON) for machine parsing, pretty for development
//! - Metric updates are cheap counter increments
//! - This crate emits metrics but never installs a recorder; that belongs
//!   to the embedding application

pub mod logging;
pub mod metrics;

pub use logging::init_logging;
