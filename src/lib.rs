//! # config-reload-informant
//!
//! Tells a long-running server when its configuration data has changed, without
//! ever blocking the request path.
//!
//! ## Overview
//!
//! A [`ConfigDataReloadInformant`](core::ConfigDataReloadInformant) holds a
//! baseline configuration snapshot. The first call to `should_reload()` arms a
//! background poll; each poll loads a fresh snapshot and compares it with the
//! baseline:
//! - Equal: the next poll is scheduled after the configured interval
//! - Different: a change flag is latched and polling stops for good
//! - Load failed: the error is swallowed and the cycle does not reschedule;
//!   the next `should_reload()` arms a new poll
//!
//! `should_reload()` itself is a lock-free load in the common case: it only
//! takes a lock when no poll is outstanding, and at most one poll is ever
//! outstanding per informant.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use config_reload_informant::prelude::*;
//! use std::time::Duration;
//!
//! # #[tokio::main]
//! # async fn main() -> Result<()> {
//! let informant = ConfigDataReloadInformant::builder()
//!     .with_file("config/default.yaml")
//!     .with_env_overrides("APP", "__")
//!     .with_interval(Duration::from_secs(30))
//!     .build::<Snapshot>()?;
//!
//! // Per request:
//! if informant.should_reload() {
//!     // rebuild from fresh configuration, then discard this informant
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Feature Flags
//!
//! - `tokio-runtime` (default): [`TokioScheduler`](core::TokioScheduler), and the
//!   builder's fallback to the ambient tokio runtime

#![warn(missing_docs, rust_2024_compatibility)]
#![deny(unsafe_code)]

pub mod core;
pub mod error;
pub mod sources;

/// Default snapshot type: the merged configuration tree.
///
/// Objects compare regardless of key order; arrays compare element by element.
pub type Snapshot = serde_json::Value;

/// Convenient re-exports for common usage patterns.
pub mod prelude {
    pub use crate::Snapshot;
    pub use crate::core::{ConfigDataReloadInformant, InformantBuilder, Loader, ReloadInformant};
    pub use crate::error::{ConfigError, Result};
}
