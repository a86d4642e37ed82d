use std::{fs::OpenOptions, path::Path, sync::Arc};

use tracing_subscriber::EnvFilter;

/// Server logging: `RUST_LOG` or `info`, to stdout.
pub fn init() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();
}

/// The terminal client owns the screen, so it only logs when `RUST_LOG` is set, and then
/// appends to `log_file` instead of writing to the terminal.
pub fn init_file_if_requested(log_file: &Path) -> std::io::Result<()> {
    let Ok(filter) = EnvFilter::try_from_default_env() else { return Ok(()) };
    let file = OpenOptions::new().create(true).append(true).open(log_file)?;
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(false)
        .with_writer(Arc::new(file))
        .init();
    Ok(())
}
