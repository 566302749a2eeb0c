//! structgen-logging - Tracing subscriber setup for structgen tools
//!
//! This crate provides:
//! - [`LogOptions`] with [`LogFormat`] and [`LogOutput`] describing where logs go
//! - [`init_logging`] installing a global `tracing` subscriber
//! - [`ReloadHandle`] for changing the level after initialization
//! - [`LogArgs`], a `clap` argument group for `-v`, `--log-format`, and `--log-output`

mod args;
mod options;
mod reload;
mod subscriber;

pub use args::LogArgs;
pub use options::{LogFormat, LogOptions, LogOutput};
pub use reload::ReloadHandle;
pub use structgen_core::LogLevel;
pub use subscriber::init_logging;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{LogArgs, LogFormat, LogLevel, LogOptions, LogOutput, init_logging};
}
