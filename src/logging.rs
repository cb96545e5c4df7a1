use std::ffi::OsStr;
use std::fs::File;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

/// Env var naming a log file. Unset means log to stderr.
pub const LOG_FILE_ENV: &str = "STDIO_RECORDER_LOG";

/// Install the global subscriber. Called once, by the binary.
///
/// `RUST_LOG` overrides `default_filter`; an unparsable filter falls back to
/// `warn`. The log file gets a `.{timestamp}.{pid}` suffix so that parallel
/// runs never share one.
pub fn init_tracing(default_filter: &str) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_filter))
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    let layer = match std::env::var_os(LOG_FILE_ENV) {
        None => fmt::layer()
            .with_writer(BoxMakeWriter::new(std::io::stderr))
            .with_target(false),
        Some(base) => {
            let path = unique_log_path(&base);
            match File::create(&path) {
                Ok(file) => fmt::layer()
                    .with_writer(BoxMakeWriter::new(Arc::new(file)))
                    .with_ansi(false),
                Err(err) => {
                    eprintln!("Warning: cannot create log file {}: {err}", path.display());
                    return;
                }
            }
        }
    };

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(layer)
        .try_init();
}

fn unique_log_path(base: &OsStr) -> PathBuf {
    let secs = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |elapsed| elapsed.as_secs());
    let mut name = base.to_os_string();
    name.push(format!(".{secs}.{}", std::process::id()));
    PathBuf::from(name)
}
