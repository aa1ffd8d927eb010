use std::fmt;

use explorer_common::Clock;
use serde::{Deserialize, Serialize};

use crate::{CountryCode, FieldApplicability, TestName};

/// Restricts results by their measurement outcome.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    /// All measurements.
    #[default]
    All,
    /// Only measurements with confirmed blocking.
    Confirmed,
    /// Only measurements with anomalies.
    Anomalies,
}

impl Status {
    /// Returns the string identifier of this status.
    pub fn name(self) -> &'static str {
        match self {
            Status::All => "all",
            Status::Confirmed => "confirmed",
            Status::Anomalies => "anomalies",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl<'a> TryFrom<&'a str> for Status {
    type Error = &'a str;

    fn try_from(value: &'a str) -> Result<Self, Self::Error> {
        Ok(match value {
            "all" => Status::All,
            "confirmed" => Status::Confirmed,
            "anomalies" => Status::Anomalies,
            other => return Err(other),
        })
    }
}

/// Names a field of a [`FilterDraft`].
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Field {
    /// The selected test.
    TestName,
    /// The selected country.
    Country,
    /// The network ASN.
    Asn,
    /// The measured domain or IP address.
    Domain,
    /// The first day of the date range.
    Since,
    /// The last day of the date range.
    Until,
    /// The measurement status.
    Status,
    /// Whether failed measurements are hidden.
    HideFailedMeasurements,
}

impl Field {
    /// Returns the name of this field as used in filter objects.
    pub fn name(self) -> &'static str {
        match self {
            Field::TestName => "testName",
            Field::Country => "country",
            Field::Asn => "asn",
            Field::Domain => "domain",
            Field::Since => "since",
            Field::Until => "until",
            Field::Status => "status",
            Field::HideFailedMeasurements => "hideFailedMeasurements",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl<'a> TryFrom<&'a str> for Field {
    type Error = &'a str;

    fn try_from(value: &'a str) -> Result<Self, Self::Error> {
        Ok(match value {
            "testName" => Field::TestName,
            "country" => Field::Country,
            "asn" => Field::Asn,
            "domain" => Field::Domain,
            "since" => Field::Since,
            "until" => Field::Until,
            "status" => Field::Status,
            "hideFailedMeasurements" => Field::HideFailedMeasurements,
            other => return Err(other),
        })
    }
}

/// The filter as currently edited by the user.
///
/// Dates are kept in their canonical `YYYY-MM-DD` form, or empty if unset. A draft may hold
/// invalid values, which are only rejected on submission.
#[derive(Clone, Debug, Eq, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterDraft {
    /// The selected test, or [`ANY`](crate::ANY).
    pub test_name: TestName,
    /// The selected country, or [`ANY`](crate::ANY).
    pub country: CountryCode,
    /// The network ASN, with or without `AS` prefix.
    pub asn: String,
    /// The measured domain or IP address.
    pub domain: String,
    /// The first day of the date range.
    pub since: String,
    /// The last day of the date range.
    pub until: String,
    /// The measurement status.
    pub status: Status,
    /// Whether failed measurements are hidden.
    pub hide_failed_measurements: bool,
}

impl FilterDraft {
    /// Creates a draft with default values.
    ///
    /// The date range ends tomorrow so that measurements of today are included.
    pub fn new(clock: &impl Clock) -> Self {
        Self {
            test_name: TestName::any(),
            country: CountryCode::any(),
            asn: String::new(),
            domain: String::new(),
            since: String::new(),
            until: clock.tomorrow().to_string(),
            status: Status::All,
            hide_failed_measurements: true,
        }
    }

    /// Returns the optional fields that apply to the selected test.
    pub fn applicability(&self) -> FieldApplicability {
        FieldApplicability::resolve(&self.test_name)
    }
}
