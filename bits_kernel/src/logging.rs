use std::sync::atomic::{AtomicBool, Ordering};

/// Install a `tracing` subscriber filtered by `RUST_LOG`.
/// Only the first call has an effect.
pub fn initialize_logger() {
    static LOGGER_INITIALIZED: AtomicBool = AtomicBool::new(false);
    if LOGGER_INITIALIZED.swap(true, Ordering::SeqCst) {
        return;
    }

    use tracing_subscriber::prelude::*;
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
