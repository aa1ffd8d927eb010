//! The submitted filter object and its query string encoding.

use explorer_common::Clock;
use serde::{Deserialize, Serialize};

use crate::{CountryCode, FilterDraft, Status, TestName};

/// The filter handed to the results collaborator on submission.
///
/// Only fields applicable to the selected test are present. The [`ANY`](crate::ANY) test name and
/// country are kept as sentinels.
#[derive(Clone, Debug, Eq, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedFilter {
    /// The selected test, or [`ANY`](crate::ANY).
    pub test_name: TestName,
    /// The selected country, or [`ANY`](crate::ANY).
    pub country: CountryCode,
    /// The network ASN, if given.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub asn: Option<String>,
    /// The domain, if given and applicable.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub domain: Option<String>,
    /// The first day of the date range in `YYYY-MM-DD` format, or empty.
    pub since: String,
    /// The last day of the date range in `YYYY-MM-DD` format, or empty.
    pub until: String,
    /// The measurement status.
    pub status: Status,
    /// Whether failed measurements are hidden.
    pub hide_failed_measurements: bool,
}

impl NormalizedFilter {
    /// Encodes this filter as a URL query string.
    ///
    /// # Example
    ///
    /// ```
    /// use explorer_common::{Day, FixedClock};
    /// use explorer_filter::FilterSession;
    ///
    /// let clock = FixedClock(Day::from_ymd(2024, 1, 20).unwrap());
    /// let filter = FilterSession::new(clock).normalize().unwrap();
    ///
    /// assert_eq!(
    ///     filter.to_query_string().unwrap(),
    ///     "testName=XX&country=XX&since=&until=2024-01-21&status=all&hideFailedMeasurements=true"
    /// );
    /// ```
    pub fn to_query_string(&self) -> Result<String, QueryError> {
        Ok(serde_urlencoded::to_string(self)?)
    }
}

/// An error encoding or decoding a filter query string.
#[derive(Debug, thiserror::Error)]
pub enum QueryError {
    /// The filter cannot be encoded.
    #[error("failed to encode filter query")]
    Encode(#[from] serde_urlencoded::ser::Error),

    /// The query string is malformed.
    #[error("failed to decode filter query")]
    Decode(#[from] serde_urlencoded::de::Error),
}

/// Query parameters of a deep link, all of which are optional.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct QueryParams {
    test_name: Option<TestName>,
    country: Option<CountryCode>,
    asn: Option<String>,
    domain: Option<String>,
    since: Option<String>,
    until: Option<String>,
    status: Option<Status>,
    hide_failed_measurements: Option<bool>,
}

impl FilterDraft {
    /// Restores a draft from a URL query string.
    ///
    /// Parameters missing from the query take their default values. Values are not validated
    /// until the draft is submitted.
    pub fn from_query_string(query: &str, clock: &impl Clock) -> Result<Self, QueryError> {
        let params: QueryParams = serde_urlencoded::from_str(query)?;
        let defaults = FilterDraft::new(clock);

        Ok(Self {
            test_name: params.test_name.unwrap_or(defaults.test_name),
            country: params.country.unwrap_or(defaults.country),
            asn: params.asn.unwrap_or(defaults.asn),
            domain: params.domain.unwrap_or(defaults.domain),
            since: params.since.unwrap_or(defaults.since),
            until: params.until.unwrap_or(defaults.until),
            status: params.status.unwrap_or(defaults.status),
            hide_failed_measurements: params
                .hide_failed_measurements
                .unwrap_or(defaults.hide_failed_measurements),
        })
    }
}

impl From<NormalizedFilter> for FilterDraft {
    fn from(filter: NormalizedFilter) -> Self {
        Self {
            test_name: filter.test_name,
            country: filter.country,
            asn: filter.asn.unwrap_or_default(),
            domain: filter.domain.unwrap_or_default(),
            since: filter.since,
            until: filter.until,
            status: filter.status,
            hide_failed_measurements: filter.hide_failed_measurements,
        }
    }
}
