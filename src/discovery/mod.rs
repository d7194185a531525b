//! Discovery input.
//!
//! # Data Flow
//! ```text
//! discovery collaborator (scheduler / service registry)
//!     → writes applications.json snapshot
//!     → snapshot.rs (parse into ApplicationMap)
//!     → watcher.rs (re-parse on every change)
//!     → sync daemon (one cycle per map)
//! ```
//!
//! # Design Decisions
//! - Discovery itself is external; this module only consumes its output
//! - The map is handed over by value and never retained after a cycle
//! - Sorted maps so rendering is deterministic

pub mod model;
pub mod snapshot;
pub mod watcher;

pub use model::{Application, ApplicationMap, Instance};
