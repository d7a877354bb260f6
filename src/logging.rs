//! Diagnostic logging setup.
//!
//! User-facing lines go through [`crate::ui::OutputFormatter`]; this module
//! only wires `tracing` output to stderr.

use tracing_subscriber::EnvFilter;

/// Default filter directive for a verbosity level. `RUST_LOG` overrides it.
pub fn filter_directive(verbose: u8, quiet: bool) -> &'static str {
    if quiet {
        return "off";
    }

    match verbose {
        0 => "warn",
        1 => "gmbleads=info",
        2 => "gmbleads=debug",
        _ => "gmbleads=trace",
    }
}

/// Install the global subscriber. Later calls are ignored.
pub fn init_logging(verbose: u8, quiet: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(filter_directive(verbose, quiet)));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(verbose >= 2)
        .with_line_number(verbose >= 3)
        .try_init();

    tracing::debug!(verbose, "Logging initialized");
}
