//! Diagnostic logging.
//!
//! Progress lines are printed by [`crate::output`] to stdout. This module sets
//! up the `tracing` subscriber for everything else (missing metadata,
//! transform invocations, configuration failures), which goes to stderr so
//! it never mixes with the progress listing.
//!
//! Level selection, first match wins:
//!
//! 1. `--verbose`: `mjml_studio=debug`
//! 2. `--quiet`: `error`
//! 3. `RUST_LOG`
//! 4. `mjml_studio=info`

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

const VERBOSE_DIRECTIVE: &str = "mjml_studio=debug";
const QUIET_DIRECTIVE: &str = "error";
const DEFAULT_DIRECTIVE: &str = "mjml_studio=info";

/// Fixed filter directive for the CLI flags, or `None` to defer to `RUST_LOG`.
fn flag_directive(verbose: bool, quiet: bool) -> Option<&'static str> {
    if verbose {
        Some(VERBOSE_DIRECTIVE)
    } else if quiet {
        Some(QUIET_DIRECTIVE)
    } else {
        None
    }
}

fn build_filter(verbose: bool, quiet: bool) -> EnvFilter {
    match flag_directive(verbose, quiet) {
        Some(directive) => EnvFilter::new(directive),
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_DIRECTIVE)),
    }
}

/// Install the global subscriber. Call once, before anything logs.
pub fn init_logger(verbose: bool, quiet: bool, no_color: bool) {
    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_level(true)
        .with_ansi(!no_color)
        .compact();

    tracing_subscriber::registry()
        .with(build_filter(verbose, quiet))
        .with(fmt_layer)
        .init();
}
