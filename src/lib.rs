//! Keeps an HAProxy configuration in sync with discovered applications.

pub mod config;
pub mod discovery;
pub mod haproxy;
pub mod lifecycle;
pub mod observability;
pub mod sync;

pub use config::SyncConfig;
pub use discovery::{Application, ApplicationMap, Instance};
pub use sync::{CycleOutcome, SyncPipeline};
