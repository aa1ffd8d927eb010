//! Common functionality for the measurement explorer filter engine.
#![warn(missing_docs)]

mod time;

pub use crate::time::*;
