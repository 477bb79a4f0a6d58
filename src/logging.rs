//! Diagnostic logging.
//!
//! Diagnostics go to stderr so they never mix with listings or JSON on
//! stdout. `PDFSTITCH_LOG` takes an `EnvFilter` directive string and wins
//! over the verbosity flags.

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Environment variable holding the log filter.
pub const LOG_ENV: &str = "PDFSTITCH_LOG";

/// Default filter directive for the given verbosity.
pub fn default_directive(verbose: bool, quiet: bool) -> &'static str {
    match (verbose, quiet) {
        (true, _) => "debug",
        (false, true) => "error",
        (false, false) => "warn",
    }
}

/// Build the filter, preferring `PDFSTITCH_LOG` when it parses.
pub fn env_filter(verbose: bool, quiet: bool) -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV)
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbose, quiet)))
}

/// Install the global subscriber.
///
/// Calling it again (tests, embedding) is a no-op.
pub fn init_tracing(verbose: bool, quiet: bool) {
    let _ = tracing_subscriber::registry()
        .with(env_filter(verbose, quiet))
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .try_init();
}
