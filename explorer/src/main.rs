//! Command line interface of the measurement explorer filter engine.
//!
//! The `explorer` binary restores a filter from a query string, applies field edits in order and
//! prints the submitted filter:
//!
//! ```text
//! $ explorer filter --query 'testName=web_connectivity' --set status=confirmed --set testName=ndt
//! {"testName":"ndt","country":"XX","since":"","until":"2024-01-21","status":"all","hideFailedMeasurements":true}
//! testName=ndt&country=XX&since=&until=2024-01-21&status=all&hideFailedMeasurements=true
//! ```
//!
//! With `explorer options`, it prints the selectable test names grouped for display and the
//! country list, both read from the catalogs configured in `config.yml`.
//!
//! # Workspace Crates
//!
//!  - `explorer`: Main entry point and command line interface.
//!  - [`explorer-common`]: Calendar days and clocks.
//!  - [`explorer-config`]: Static configuration for the CLI.
//!  - [`explorer-filter`]: Field applicability, validation and the filter state reducer.
//!  - [`explorer-log`]: Logging.
//!
//! [`explorer-common`]: ../explorer_common/index.html
//! [`explorer-config`]: ../explorer_config/index.html
//! [`explorer-filter`]: ../explorer_filter/index.html
//! [`explorer-log`]: ../explorer_log/index.html

mod cli;
mod setup;

use std::process;

pub fn main() {
    let exit_code = match cli::execute() {
        Ok(()) => 0,
        Err(err) => {
            explorer_log::ensure_error(&err);
            1
        }
    };

    process::exit(exit_code);
}
