//! Configuration for the measurement explorer command line.
//!
//! The configuration is read from a `config.yml` file in a config directory. It controls logging
//! and points to the catalogs of test names and countries:
//!
//! ```yaml
//! logging:
//!   level: debug
//!   format: pretty
//! catalogs:
//!   test_names: test_names.json
//!   countries: countries.json
//! ```
#![warn(missing_docs)]

mod config;

pub use crate::config::*;
