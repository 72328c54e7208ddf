//! Log setup for the demo binary.
//!
//! The library crates only emit `tracing` events; this installs the
//! subscriber that prints them to stderr.

use tracing::Level;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Maps `-v` counts to a level: none is warn, `-v` debug, `-vv` trace.
pub fn level_from_verbosity(verbosity: u8) -> Level {
    match verbosity {
        0 => Level::WARN,
        1 => Level::DEBUG,
        _ => Level::TRACE,
    }
}

/// Builds the filter, letting `RUST_LOG` override the verbosity flags.
fn build_env_filter(level: Level) -> EnvFilter {
    let level = level.as_str().to_lowercase();
    EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "warn,tablekit={level},tablekit_filters={level},tablekit_demo={level}"
        ))
    })
}

/// Installs the global subscriber. Call once, at startup.
pub fn init_logging(verbosity: u8) -> anyhow::Result<()> {
    let filter = build_env_filter(level_from_verbosity(verbosity));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .try_init()?;
    Ok(())
}
