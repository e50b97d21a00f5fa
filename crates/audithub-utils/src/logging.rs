//! Logging infrastructure for audithub
//!
//! Structured logging goes through `tracing`. The subscriber is installed
//! once by the CLI; libraries only emit events.

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// How the global subscriber should render events.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LogOptions {
    /// Lower the default filter to `debug` for audithub crates
    pub verbose: bool,
    /// Emit one JSON object per line instead of compact text
    pub json: bool,
}

/// Default filter directive when `RUST_LOG` is unset.
#[must_use]
pub fn default_directive(verbose: bool) -> &'static str {
    if verbose {
        "warn,audithub=debug,audithub_server=debug,audithub_store=debug,audithub_config=debug"
    } else {
        "warn,audithub=info,audithub_server=info,audithub_store=info,audithub_config=info"
    }
}

/// Initialize the tracing subscriber.
///
/// `RUST_LOG` takes precedence over [`default_directive`]. Calling this twice
/// returns an error from the second call.
pub fn init_tracing(options: LogOptions) -> Result<(), Box<dyn std::error::Error>> {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_directive(options.verbose)))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    if options.json {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(
                fmt::layer()
                    .json()
                    .with_target(true)
                    .with_current_span(true),
            )
            .try_init()?;
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(
                fmt::layer()
                    .with_target(options.verbose)
                    .with_thread_ids(false)
                    .with_thread_names(false)
                    .with_line_number(false)
                    .with_file(false)
                    .compact(),
            )
            .try_init()?;
    }

    Ok(())
}
