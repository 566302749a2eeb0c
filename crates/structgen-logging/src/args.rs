//! Command line logging flags

use crate::options::{LogFormat, LogOptions, LogOutput};
use structgen_core::LogLevel;

/// Logging flags shared by structgen command line tools
///
/// Flatten into a `clap` parser with `#[command(flatten)]`.
#[derive(Debug, Clone, clap::Args)]
pub struct LogArgs {
    /// Log verbosity (trace, debug, info, warn, error, off)
    #[arg(short = 'v', long = "verbosity", default_value = "info")]
    pub verbosity: LogLevel,

    /// Log format
    #[arg(long = "log-format", value_enum, default_value_t = LogFormat::Text)]
    pub log_format: LogFormat,

    /// Log output (stderr, stdout, or a file path)
    #[arg(long = "log-output", default_value = "stderr")]
    pub log_output: LogOutput,
}

impl LogArgs {
    pub fn to_options(&self) -> LogOptions {
        LogOptions {
            level: self.verbosity,
            format: self.log_format,
            output: self.log_output.clone(),
        }
    }
}
