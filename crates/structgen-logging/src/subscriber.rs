//! Global subscriber installation

use crate::options::{LogFormat, LogOptions, LogOutput};
use crate::reload::{ReloadHandle, level_filter};
use std::sync::Mutex;
use tracing::warn;
use tracing_subscriber::filter::EnvFilter;
use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::layer::Layered;
use tracing_subscriber::prelude::*;
use tracing_subscriber::util::TryInitError;
use tracing_subscriber::{Layer, Registry, fmt, reload};

type Filtered = Layered<reload::Layer<EnvFilter, Registry>, Registry>;

/// Install the global `tracing` subscriber described by `options`
///
/// `RUST_LOG`, when set, takes precedence over `options.level`. The level can be changed
/// later through [`ReloadHandle::global`]. Fails if a global subscriber is already installed.
pub fn init_logging(options: &LogOptions) -> Result<(), TryInitError> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| level_filter(options.level));
    let (filter, handle) = reload::Layer::new(filter);

    let (writer, fallback) = make_writer(&options.output);
    let fmt_layer: Box<dyn Layer<Filtered> + Send + Sync> = match options.format {
        LogFormat::Text => fmt::layer().with_target(true).with_writer(writer).boxed(),
        LogFormat::Json => fmt::layer()
            .json()
            .with_target(true)
            .with_writer(writer)
            .boxed(),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .try_init()?;

    ReloadHandle::global().set_handle(handle);

    if let Some(error) = fallback {
        warn!(output = %options.output, %error, "cannot open log file, logging to stderr");
    }
    Ok(())
}

/// Writer for `output`, and the error that forced a fallback to stderr
fn make_writer(output: &LogOutput) -> (BoxMakeWriter, Option<std::io::Error>) {
    match output {
        LogOutput::Stdout => (BoxMakeWriter::new(std::io::stdout), None),
        LogOutput::Stderr => (BoxMakeWriter::new(std::io::stderr), None),
        LogOutput::File(_) => match output.open_file() {
            Some(Ok(file)) => (BoxMakeWriter::new(Mutex::new(file)), None),
            Some(Err(error)) => (BoxMakeWriter::new(std::io::stderr), Some(error)),
            None => (BoxMakeWriter::new(std::io::stderr), None),
        },
    }
}
