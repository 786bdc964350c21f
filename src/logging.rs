//! Logger bootstrap for the binary and for tests that want log output.
use env_logger::{Builder, Env};
use log::LevelFilter;

/// Initializes the global logger.
///
/// Other crates log at warn and above. This crate logs at info, or at
/// debug when `verbose` is set, which adds per-body messages from the
/// integrator. `RUST_LOG` overrides both.
pub fn init(verbose: bool) {
    let env = Env::default().default_filter_or(default_filter(verbose));
    let mut builder = Builder::from_env(env);
    builder.format_timestamp_millis();

    // A logger installed earlier wins; repeated calls from tests are fine.
    if builder.try_init().is_err() {
        log::trace!("logger already initialised");
    }
}

fn default_filter(verbose: bool) -> String {
    let level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    format!("warn,{}={level}", env!("CARGO_CRATE_NAME"))
}
