//! Tracing/logging setup shared by the service binary.

pub mod logging;

pub use logging::LogFormat;

/// Initialize process-wide logging from the environment.
///
/// This is safe to call multiple times; subsequent calls become no-ops.
pub fn init() {
    logging::init(LogFormat::from_env());
}
