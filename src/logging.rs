// ABOUTME: Tracing subscriber setup for the CLI binary
// ABOUTME: Library code only emits events; only the binary installs a subscriber

use tracing_subscriber::{fmt, EnvFilter};

/// Initialize the global tracing subscriber.
///
/// `RUST_LOG` wins when set; otherwise `-v` selects debug for this crate and
/// the default is warn. Logs go to stderr so stdout stays parseable JSON.
pub fn init_logging(verbose: bool) {
    let fallback = if verbose {
        "warn,trainerroad_export=debug,trainerroad_cli=debug"
    } else {
        "warn"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));

    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(verbose)
        .compact()
        .init();
}
