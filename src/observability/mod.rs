//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Sync cycles produce:
//!     → logging.rs (structured log events per stage)
//!     → metrics.rs (cycle outcomes, listener count, reload latency)
//!
//! Consumers:
//!     → Operators reading stdout / journald
//!     → Metrics endpoint (Prometheus scrape, optional)
//! ```

pub mod logging;
pub mod metrics;
