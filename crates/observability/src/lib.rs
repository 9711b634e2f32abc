//! Tracing and logging setup shared by the gateway binaries and tests.

/// Initialize process-wide tracing with the format selected by the environment.
///
/// This is safe to call multiple times; subsequent calls become no-ops.
pub fn init() {
    tracing::init(tracing::LogFormat::from_env());
}

/// Tracing configuration (filters, output format).
pub mod tracing;
