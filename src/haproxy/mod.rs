//! HAProxy config-generation-and-swap subsystem.
//!
//! # Data Flow
//! ```text
//! ApplicationMap
//!     → render.rs (template → haproxy.cfg text, pure)
//!     → install.rs (scratch file → atomic rename onto live path)
//!     → reload.rs (service manager reload, exit status checked)
//! ```
//!
//! # Design Decisions
//! - Full file regenerated every cycle, no diffing
//! - Listener bind and every backend use the application's first port
//! - Failed reloads are reported, never rolled back

pub mod install;
pub mod reload;
pub mod render;

pub use install::{ConfigInstaller, InstallError};
pub use reload::{ReloadError, ReloadMechanism, ServiceReload};
pub use render::{ConfigRenderer, RenderError};
