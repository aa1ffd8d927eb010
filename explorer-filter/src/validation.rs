//! Validators for single filter fields and the date range.
//!
//! All validators are pure. The current date is taken from a [`Clock`], and every outcome is
//! returned as a [`ValidationError`] scoped to the validated field.

use explorer_common::{Clock, Day};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

use crate::Field;

/// Classifies a [`ValidationError`].
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// The value does not have the expected format.
    Format,
    /// The date is outside of the permitted range.
    Range,
}

/// A field value that cannot be submitted.
///
/// Validation errors never corrupt the draft. The user can correct the value and resubmit.
#[derive(Clone, Debug, Eq, PartialEq, thiserror::Error)]
pub enum ValidationError {
    /// The ASN is not a positive number with an optional `AS` prefix.
    #[error("invalid ASN, expected a number such as AS1234")]
    InvalidAsn,

    /// The domain is neither a hostname nor an IPv4 address.
    #[error("invalid domain, expected a hostname or an IP address")]
    InvalidDomain,

    /// The date is not in `YYYY-MM-DD` format.
    #[error("invalid date {0:?}, expected YYYY-MM-DD")]
    InvalidDate(String),

    /// The value cannot be parsed for this field.
    #[error("invalid value {value:?} for {field}")]
    InvalidValue {
        /// The field that was edited.
        field: Field,
        /// The rejected input.
        value: String,
    },

    /// The start of the date range is not before its end.
    #[error("start date must be before the end date")]
    SinceNotBeforeUntil,

    /// The end of the date range is not after its start.
    #[error("end date must be after the start date")]
    UntilNotAfterSince,

    /// The date is later than tomorrow.
    #[error("date must not be later than tomorrow")]
    DateInFuture,
}

impl ValidationError {
    /// Returns the kind of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            ValidationError::InvalidAsn
            | ValidationError::InvalidDomain
            | ValidationError::InvalidDate(_)
            | ValidationError::InvalidValue { .. } => ErrorKind::Format,
            ValidationError::SinceNotBeforeUntil
            | ValidationError::UntilNotAfterSince
            | ValidationError::DateInFuture => ErrorKind::Range,
        }
    }
}

static ASN_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(AS)?[1-9][0-9]*$").unwrap());

// The IPv4 alternative is matched as a prefix and does not check octet ranges.
static DOMAIN_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^[a-z0-9]+([-.][a-z0-9]+)*\.[a-z]{2,7}(:[0-9]{1,5})?$|^([0-9]{1,3}\.){3}[0-9]{1,3}",
    )
    .unwrap()
});

/// Validates an ASN such as `AS1234` or `1234`.
///
/// Empty values are valid. Leading zeros and `0` are rejected.
pub fn validate_asn(value: &str) -> Result<(), ValidationError> {
    if value.is_empty() || ASN_REGEX.is_match(value) {
        Ok(())
    } else {
        Err(ValidationError::InvalidAsn)
    }
}

/// Validates a domain name with optional port, or a dotted-quad IPv4 address.
///
/// Empty values are valid.
pub fn validate_domain(value: &str) -> Result<(), ValidationError> {
    if value.is_empty() || DOMAIN_REGEX.is_match(value) {
        Ok(())
    } else {
        Err(ValidationError::InvalidDomain)
    }
}

/// Validates the start of the date range.
///
/// With an end date, the start must be strictly before it. Otherwise, the start may be at most
/// tomorrow.
pub fn validate_since(
    candidate: Day,
    until: Option<Day>,
    clock: &impl Clock,
) -> Result<(), ValidationError> {
    match until {
        Some(until) if candidate < until => Ok(()),
        Some(_) => Err(ValidationError::SinceNotBeforeUntil),
        None if candidate <= clock.tomorrow() => Ok(()),
        None => Err(ValidationError::DateInFuture),
    }
}

/// Validates the end of the date range.
///
/// With a start date, the end must be strictly after it. In any case, the end may be at most
/// tomorrow.
pub fn validate_until(
    candidate: Day,
    since: Option<Day>,
    clock: &impl Clock,
) -> Result<(), ValidationError> {
    if since.is_some_and(|since| candidate <= since) {
        return Err(ValidationError::UntilNotAfterSince);
    }

    if candidate > clock.tomorrow() {
        return Err(ValidationError::DateInFuture);
    }

    Ok(())
}

/// Parses a date field value, where an empty value means the date is unset.
pub fn parse_day(value: &str) -> Result<Option<Day>, ValidationError> {
    if value.is_empty() {
        return Ok(None);
    }

    value
        .parse()
        .map(Some)
        .map_err(|_| ValidationError::InvalidDate(value.to_owned()))
}

#[cfg(test)]
mod tests {
    use explorer_common::FixedClock;

    use super::*;

    fn day(s: &str) -> Day {
        s.parse().unwrap()
    }

    fn clock() -> FixedClock {
        FixedClock(day("2024-01-20"))
    }

    #[test]
    fn test_validate_asn() {
        let examples = &[
            ("", true),
            ("1", true),
            ("1234", true),
            ("AS1234", true),
            ("AS30722", true),
            ("0", false),
            ("AS0", false),
            ("AS0042", false),
            ("0042", false),
            ("as1234", false),
            ("AS", false),
            ("AS 1234", false),
            ("1234a", false),
            ("-1", false),
        ];

        for &(value, expected) in examples {
            assert_eq!(validate_asn(value).is_ok(), expected, "asn {value:?}");
        }
    }

    #[test]
    fn test_validate_domain() {
        let examples = &[
            ("", true),
            ("example.com", true),
            ("www.example.com", true),
            ("my-site.example.org", true),
            ("example.com:8080", true),
            ("twitter.com", true),
            ("192.168.1.1", true),
            ("ex_ample.com", false),
            ("example", false),
            ("Example.com", false),
            ("example.c", false),
            ("example.toolongtld", false),
            ("-example.com", false),
            ("example.com:123456", false),
            ("http://example.com", false),
        ];

        for &(value, expected) in examples {
            assert_eq!(validate_domain(value).is_ok(), expected, "domain {value:?}");
        }
    }

    #[test]
    fn test_validate_domain_accepts_out_of_range_octets() {
        assert_eq!(validate_domain("999.999.999.999"), Ok(()));
        assert_eq!(validate_domain("1.2.3.4/foo"), Ok(()));
    }

    #[test]
    fn test_since_before_until() {
        let until = Some(day("2024-01-05"));
        assert_eq!(validate_since(day("2024-01-04"), until, &clock()), Ok(()));
        assert_eq!(
            validate_since(day("2024-01-05"), until, &clock()),
            Err(ValidationError::SinceNotBeforeUntil)
        );
        assert_eq!(
            validate_since(day("2024-01-10"), until, &clock()),
            Err(ValidationError::SinceNotBeforeUntil)
        );
    }

    #[test]
    fn test_since_without_until() {
        assert_eq!(validate_since(day("2024-01-21"), None, &clock()), Ok(()));
        assert_eq!(
            validate_since(day("2024-01-22"), None, &clock()),
            Err(ValidationError::DateInFuture)
        );
    }

    #[test]
    fn test_until_after_since() {
        let since = Some(day("2024-01-10"));
        assert_eq!(validate_until(day("2024-01-11"), since, &clock()), Ok(()));
        assert_eq!(
            validate_until(day("2024-01-10"), since, &clock()),
            Err(ValidationError::UntilNotAfterSince)
        );
        assert_eq!(
            validate_until(day("2024-01-22"), since, &clock()),
            Err(ValidationError::DateInFuture)
        );
    }

    #[test]
    fn test_until_accepts_tomorrow() {
        assert_eq!(validate_until(day("2024-01-21"), None, &clock()), Ok(()));
        assert_eq!(
            validate_until(day("2024-01-21"), Some(day("2024-01-01")), &clock()),
            Ok(())
        );
        assert_eq!(
            validate_until(day("2024-01-22"), None, &clock()),
            Err(ValidationError::DateInFuture)
        );
    }

    #[test]
    fn test_parse_day() {
        assert_eq!(parse_day(""), Ok(None));
        assert_eq!(parse_day("2024-01-05"), Ok(Some(day("2024-01-05"))));
        assert_eq!(
            parse_day("yesterday"),
            Err(ValidationError::InvalidDate("yesterday".to_owned()))
        );
    }

    #[test]
    fn test_error_kinds() {
        assert_eq!(ValidationError::InvalidAsn.kind(), ErrorKind::Format);
        assert_eq!(ValidationError::InvalidDomain.kind(), ErrorKind::Format);
        assert_eq!(ValidationError::DateInFuture.kind(), ErrorKind::Range);
        assert_eq!(ValidationError::SinceNotBeforeUntil.kind(), ErrorKind::Range);
    }
}
