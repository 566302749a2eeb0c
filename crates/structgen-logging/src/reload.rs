//! Runtime log level changes

use once_cell::sync::OnceCell;
use parking_lot::Mutex;
use structgen_core::LogLevel;
use tracing_subscriber::filter::{EnvFilter, LevelFilter};
use tracing_subscriber::{Registry, reload};

/// Handle for replacing the level filter of the installed subscriber
pub struct ReloadHandle {
    handle: Mutex<Option<reload::Handle<EnvFilter, Registry>>>,
}

impl ReloadHandle {
    pub fn new() -> Self {
        Self {
            handle: Mutex::new(None),
        }
    }

    /// Get the global reload handle
    pub fn global() -> &'static ReloadHandle {
        static INSTANCE: OnceCell<ReloadHandle> = OnceCell::new();
        INSTANCE.get_or_init(ReloadHandle::new)
    }

    /// Set the reload handle (called by [`init_logging`](crate::init_logging))
    pub fn set_handle(&self, handle: reload::Handle<EnvFilter, Registry>) {
        *self.handle.lock() = Some(handle);
    }

    /// Replace the filter with one that admits `level` and above
    pub fn reload_level(&self, level: LogLevel) -> Result<(), String> {
        let guard = self.handle.lock();
        let Some(handle) = guard.as_ref() else {
            return Err("Reload handle not initialized".to_string());
        };
        handle
            .reload(level_filter(level))
            .map_err(|e| format!("Failed to reload filter: {e}"))
    }
}

impl Default for ReloadHandle {
    fn default() -> Self {
        Self::new()
    }
}

/// Convert LogLevel to tracing LevelFilter
pub(crate) fn convert_level_to_filter(level: LogLevel) -> LevelFilter {
    match level {
        LogLevel::Trace => LevelFilter::TRACE,
        LogLevel::Debug => LevelFilter::DEBUG,
        LogLevel::Info => LevelFilter::INFO,
        LogLevel::Warn => LevelFilter::WARN,
        LogLevel::Error => LevelFilter::ERROR,
        LogLevel::Off => LevelFilter::OFF,
    }
}

/// Env filter admitting `level` and above for every target
pub(crate) fn level_filter(level: LogLevel) -> EnvFilter {
    EnvFilter::new(convert_level_to_filter(level).to_string())
}
