//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Gateway pipeline produces:
//!     → logging.rs (structured log events)
//!     → metrics.rs (counters, histograms)
//!     → redact.rs (masked header dumps for diagnostics)
//! ```
//!
//! # Design Decisions
//! - Request ID flows through every span
//! - Credentials never reach a log line
//! - Metrics exporter is optional

pub mod logging;
pub mod metrics;
pub mod redact;
