//! Logger setup for the command-line binary

use log::LevelFilter;

/// Initialise `env_logger`. `RUST_LOG` still overrides the default level.
pub fn init(verbose: bool) {
    let default_level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    };

    // Only the first call installs a logger; later calls (tests) are ignored
    let _ = env_logger::Builder::new()
        .filter_level(default_level)
        .parse_default_env()
        .format_timestamp_millis()
        .try_init();
}
