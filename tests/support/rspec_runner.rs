//! Serial rspec runner for suites that drive a Bevy app.

use rspec::{block::Suite, ConfigurationBuilder, Logger, Runner};
use std::fmt::Debug;
use std::sync::Arc;

/// Runs `suite` on one thread, reporting to stdout.
///
/// Contexts share a single app through their state, so examples must not
/// run concurrently.
pub fn run_serial<T>(suite: &Suite<T>)
where
    T: Clone + Send + Sync + Debug,
{
    let config = ConfigurationBuilder::default()
        .parallel(false)
        .exit_on_failure(false)
        .build()
        .unwrap_or_else(|err| panic!("invalid rspec configuration: {err}"));
    let logger = Arc::new(Logger::new(std::io::stdout()));
    Runner::new(config, vec![logger]).run(suite);
}
