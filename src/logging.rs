//! Console logging setup
//!
//! `RUST_LOG` takes precedence; otherwise the level picked on the command line
//! applies to this crate only.

use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use crate::app::AppError;

/// Maps a `-v` count to a level: 0 = warn, 1 = info, 2 = debug, 3+ = trace
pub fn level_for_verbosity(verbosity: u8) -> LevelFilter {
    match verbosity {
        0 => LevelFilter::WARN,
        1 => LevelFilter::INFO,
        2 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    }
}

fn default_directive(level: LevelFilter) -> String {
    format!("{}={}", env!("CARGO_CRATE_NAME"), level.to_string().to_lowercase())
}

/// Installs the global subscriber
///
/// Fails instead of panicking if a subscriber is already installed.
pub fn init(level: LevelFilter) -> Result<(), AppError> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive(level)));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_target(false).with_writer(std::io::stderr))
        .try_init()
        .map_err(|e| AppError::Logging(e.to_string()))
}
