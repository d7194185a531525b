//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Signals (signals.rs):
//!     SIGTERM/SIGINT → LifecycleEvent::Shutdown
//!     SIGHUP → LifecycleEvent::Resync
//!         → sync daemon
//! ```
//!
//! # Design Decisions
//! - Uses Tokio's signal handling (async-safe)
//! - Shutdown waits for the in-flight cycle; a half-done cycle is never abandoned
//! - SIGHUP forces a reload, not a restart

pub mod signals;

pub use signals::{forward_signals, LifecycleEvent};
