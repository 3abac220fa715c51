//! Process-wide logging setup.

pub mod subscriber;

pub use subscriber::{LogFormat, ParseLogFormatError};

/// Initialize tracing/logging for the process.
///
/// Safe to call multiple times; only the first call installs a subscriber.
pub fn init(format: LogFormat) {
    subscriber::init(format);
}
