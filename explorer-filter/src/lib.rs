//! Filter configuration engine for the measurement explorer.
//!
//! Measurements can be filtered by test name, country, ASN, domain, date range and status. This
//! crate implements the logic behind the filter form, independent of how it is rendered:
//!
//! * [`FieldApplicability`] decides which optional fields apply to the selected test.
//! * The [`validation`] functions check single fields and the date range.
//! * [`FilterSession`] holds the draft, resets fields that no longer apply, and produces the
//!   [`NormalizedFilter`] on submission.
//!
//! # Example
//!
//! ```
//! use explorer_common::{Day, FixedClock};
//! use explorer_filter::{Field, FilterEvent, FilterSession, Status};
//!
//! let clock = FixedClock(Day::from_ymd(2024, 1, 20).unwrap());
//! let mut session = FilterSession::new(clock);
//!
//! session.dispatch(FilterEvent::parse(Field::TestName, "web_connectivity").unwrap());
//! session.dispatch(FilterEvent::parse(Field::Status, "confirmed").unwrap());
//! session.dispatch(FilterEvent::parse(Field::TestName, "ndt").unwrap());
//!
//! let filter = session.normalize().unwrap();
//! assert_eq!(filter.status, Status::All);
//! ```
#![warn(missing_docs)]

pub mod validation;

mod applicability;
mod catalog;
mod draft;
mod query;
mod reducer;

pub use crate::applicability::*;
pub use crate::catalog::*;
pub use crate::draft::*;
pub use crate::query::*;
pub use crate::reducer::*;
pub use crate::validation::{ErrorKind, ValidationError};
