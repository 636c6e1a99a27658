//! Operator console logging.

use tracing::Level;

/// Installs the global fmt subscriber. A second call is a no-op.
pub fn init(level: Level) {
    let installed = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .try_init();
    if installed.is_err() {
        tracing::debug!("Tracing subscriber already installed");
    }
}
