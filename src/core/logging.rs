//! stderr logging setup

use env_logger::Env;

/// Install the global logger
///
/// `MOLLIE_LOG` overrides the level picked from `--verbose` / `--quiet`.
pub fn init(verbose: bool, quiet: bool) {
    let default_filter = if verbose {
        "warn,mollie=debug"
    } else if quiet {
        "error"
    } else {
        "warn"
    };

    let _ = env_logger::Builder::from_env(Env::new().filter_or("MOLLIE_LOG", default_filter))
        .format_timestamp(None)
        .format_target(false)
        .try_init();
}
