//! State transitions of the filter draft and its submission.

use std::collections::BTreeMap;

use explorer_common::{Clock, Day, SystemClock};

use crate::validation::{
    parse_day, validate_asn, validate_domain, validate_since, validate_until,
};
use crate::{
    CountryCode, Field, FieldApplicability, FilterDraft, NormalizedFilter, Status, TestName,
    ValidationError,
};

/// A new value for a single field of the draft.
///
/// Test name changes are not field values, see [`FilterEvent::TestNameChanged`].
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum FieldValue {
    /// Selects a country.
    Country(CountryCode),
    /// Sets the network ASN.
    Asn(String),
    /// Sets the domain.
    Domain(String),
    /// Sets or clears the start of the date range.
    Since(Option<Day>),
    /// Sets or clears the end of the date range.
    Until(Option<Day>),
    /// Selects a measurement status.
    Status(Status),
    /// Shows or hides failed measurements.
    HideFailedMeasurements(bool),
}

impl FieldValue {
    /// Returns the field this value is written to.
    pub fn field(&self) -> Field {
        match self {
            FieldValue::Country(_) => Field::Country,
            FieldValue::Asn(_) => Field::Asn,
            FieldValue::Domain(_) => Field::Domain,
            FieldValue::Since(_) => Field::Since,
            FieldValue::Until(_) => Field::Until,
            FieldValue::Status(_) => Field::Status,
            FieldValue::HideFailedMeasurements(_) => Field::HideFailedMeasurements,
        }
    }

    fn apply(self, draft: &mut FilterDraft) {
        match self {
            FieldValue::Country(country) => draft.country = country,
            FieldValue::Asn(asn) => draft.asn = asn,
            FieldValue::Domain(domain) => draft.domain = domain,
            FieldValue::Since(since) => draft.since = format_day(since),
            FieldValue::Until(until) => draft.until = format_day(until),
            FieldValue::Status(status) => draft.status = status,
            FieldValue::HideFailedMeasurements(hide) => draft.hide_failed_measurements = hide,
        }
    }
}

/// A user interaction with the filter.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum FilterEvent {
    /// A different test was selected.
    TestNameChanged(TestName),
    /// Any other field was edited.
    FieldChanged(FieldValue),
}

impl FilterEvent {
    /// Creates an event from raw text input for the given field.
    ///
    /// Dates must be in `YYYY-MM-DD` format or empty, booleans must be `true` or `false`, and
    /// statuses must be one of `all`, `confirmed` or `anomalies`.
    pub fn parse(field: Field, raw: &str) -> Result<Self, ValidationError> {
        let invalid = || ValidationError::InvalidValue {
            field,
            value: raw.to_owned(),
        };

        let value = match field {
            Field::TestName => return Ok(FilterEvent::TestNameChanged(TestName::new(raw))),
            Field::Country => FieldValue::Country(CountryCode::new(raw)),
            Field::Asn => FieldValue::Asn(raw.to_owned()),
            Field::Domain => FieldValue::Domain(raw.to_owned()),
            Field::Since => FieldValue::Since(parse_day(raw)?),
            Field::Until => FieldValue::Until(parse_day(raw)?),
            Field::Status => FieldValue::Status(Status::try_from(raw).map_err(|_| invalid())?),
            Field::HideFailedMeasurements => {
                FieldValue::HideFailedMeasurements(raw.parse().map_err(|_| invalid())?)
            }
        };

        Ok(FilterEvent::FieldChanged(value))
    }
}

fn format_day(day: Option<Day>) -> String {
    day.map(|day| day.to_string()).unwrap_or_default()
}

/// Resets optional fields that do not apply to the selected test.
///
/// A domain is cleared when the test has no domain, and a status is reset to [`Status::All`] when
/// the test does not report it. This happens even if the user entered the value explicitly.
fn clear_stale_fields(draft: &mut FilterDraft) {
    let applicability = draft.applicability();

    if !applicability.show_domain && !draft.domain.is_empty() {
        explorer_log::debug!(
            test_name = %draft.test_name,
            domain = %draft.domain,
            "clearing domain not applicable to test"
        );
        draft.domain.clear();
    }

    if !applicability.allows(draft.status) {
        explorer_log::debug!(
            test_name = %draft.test_name,
            status = %draft.status,
            "resetting status not applicable to test"
        );
        draft.status = Status::All;
    }
}

/// Applies an event to a draft and returns the next draft.
///
/// Optional fields that no longer apply to the selected test are cleared in the returned draft.
pub fn reduce(mut draft: FilterDraft, event: FilterEvent) -> FilterDraft {
    match event {
        FilterEvent::TestNameChanged(test_name) => draft.test_name = test_name,
        FilterEvent::FieldChanged(value) => value.apply(&mut draft),
    }

    clear_stale_fields(&mut draft);
    draft
}

/// Field-scoped validation errors that block a submission.
#[derive(Clone, Debug, Eq, PartialEq, thiserror::Error)]
#[error("filter has {} invalid field(s)", .errors.len())]
pub struct SubmitError {
    errors: BTreeMap<Field, ValidationError>,
}

impl SubmitError {
    /// Returns the error of every invalid field.
    pub fn errors(&self) -> &BTreeMap<Field, ValidationError> {
        &self.errors
    }

    /// Returns the error for the given field, if it is invalid.
    pub fn get(&self, field: Field) -> Option<&ValidationError> {
        self.errors.get(&field)
    }
}

/// Receives normalized filters on successful submission.
pub trait ApplyFilter {
    /// Handles a submitted filter.
    fn apply_filter(&mut self, filter: NormalizedFilter);
}

impl<F> ApplyFilter for F
where
    F: FnMut(NormalizedFilter),
{
    fn apply_filter(&mut self, filter: NormalizedFilter) {
        self(filter)
    }
}

/// An editing session of a single filter draft.
///
/// The session exclusively owns the draft. All transitions happen synchronously through
/// [`dispatch`](Self::dispatch).
#[derive(Debug)]
pub struct FilterSession<C = SystemClock> {
    draft: FilterDraft,
    clock: C,
}

impl<C: Clock> FilterSession<C> {
    /// Starts a session with a default draft.
    pub fn new(clock: C) -> Self {
        Self {
            draft: FilterDraft::new(&clock),
            clock,
        }
    }

    /// Starts a session from a previously submitted or deep-linked draft.
    ///
    /// Optional fields that do not apply to the draft's test are reset.
    pub fn restore(mut draft: FilterDraft, clock: C) -> Self {
        clear_stale_fields(&mut draft);
        Self { draft, clock }
    }

    /// Returns the current draft.
    pub fn draft(&self) -> &FilterDraft {
        &self.draft
    }

    /// Returns the optional fields that apply to the current draft.
    pub fn applicability(&self) -> FieldApplicability {
        self.draft.applicability()
    }

    /// Applies an event to the draft.
    pub fn dispatch(&mut self, event: FilterEvent) {
        self.draft = reduce(self.draft.clone(), event);
    }

    /// Validates all applicable fields of the draft.
    pub fn validate(&self) -> Result<(), SubmitError> {
        self.check_fields().map(|_| ())
    }

    /// Validates the draft and returns the parsed date range.
    fn check_fields(&self) -> Result<(Option<Day>, Option<Day>), SubmitError> {
        let draft = &self.draft;
        let mut errors = BTreeMap::new();

        if let Err(error) = validate_asn(&draft.asn) {
            errors.insert(Field::Asn, error);
        }

        if self.applicability().show_domain
            && let Err(error) = validate_domain(&draft.domain)
        {
            errors.insert(Field::Domain, error);
        }

        let since = parse_day(&draft.since).unwrap_or_else(|error| {
            errors.insert(Field::Since, error);
            None
        });

        let until = parse_day(&draft.until).unwrap_or_else(|error| {
            errors.insert(Field::Until, error);
            None
        });

        if let Some(candidate) = since
            && let Err(error) = validate_since(candidate, until, &self.clock)
        {
            errors.insert(Field::Since, error);
        }

        if let Some(candidate) = until
            && let Err(error) = validate_until(candidate, since, &self.clock)
        {
            errors.insert(Field::Until, error);
        }

        if errors.is_empty() {
            Ok((since, until))
        } else {
            Err(SubmitError { errors })
        }
    }

    /// Validates the draft and builds the filter that would be submitted.
    ///
    /// Optional fields that do not apply to the selected test are omitted.
    pub fn normalize(&self) -> Result<NormalizedFilter, SubmitError> {
        let (since, until) = self.check_fields()?;

        let draft = &self.draft;
        let applicability = self.applicability();
        let non_empty = |value: &String| (!value.is_empty()).then(|| value.clone());

        Ok(NormalizedFilter {
            test_name: draft.test_name.clone(),
            country: draft.country.clone(),
            asn: non_empty(&draft.asn),
            domain: non_empty(&draft.domain).filter(|_| applicability.show_domain),
            since: format_day(since),
            until: format_day(until),
            status: if applicability.allows(draft.status) {
                draft.status
            } else {
                Status::All
            },
            hide_failed_measurements: draft.hide_failed_measurements,
        })
    }

    /// Submits the draft to the given receiver.
    ///
    /// If any field is invalid, nothing is submitted and the draft remains unchanged.
    pub fn submit<S>(&self, receiver: &mut S) -> Result<(), SubmitError>
    where
        S: ApplyFilter + ?Sized,
    {
        match self.normalize() {
            Ok(filter) => {
                explorer_log::trace!(?filter, "submitting filter");
                receiver.apply_filter(filter);
                Ok(())
            }
            Err(error) => {
                explorer_log::debug!(fields = ?error.errors().keys(), "rejected filter: {error}");
                Err(error)
            }
        }
    }
}

impl Default for FilterSession<SystemClock> {
    fn default() -> Self {
        Self::new(SystemClock)
    }
}

#[cfg(test)]
mod tests {
    use explorer_common::FixedClock;
    use similar_asserts::assert_eq;

    use super::*;

    fn clock() -> FixedClock {
        FixedClock("2024-01-20".parse().unwrap())
    }

    fn event(field: Field, raw: &str) -> FilterEvent {
        FilterEvent::parse(field, raw).unwrap()
    }

    fn session_with(events: &[(Field, &str)]) -> FilterSession<FixedClock> {
        let mut session = FilterSession::new(clock());
        for &(field, raw) in events {
            session.dispatch(event(field, raw));
        }
        session
    }

    #[test]
    fn test_switching_to_ndt_resets_confirmed() {
        explorer_log::init_test!();

        let session = session_with(&[
            (Field::TestName, "web_connectivity"),
            (Field::Status, "confirmed"),
            (Field::TestName, "ndt"),
        ]);

        assert_eq!(session.draft().status, Status::All);
    }

    #[test]
    fn test_switching_keeps_supported_anomalies() {
        let session = session_with(&[
            (Field::TestName, "web_connectivity"),
            (Field::Status, "anomalies"),
            (Field::TestName, "telegram"),
        ]);

        assert_eq!(session.draft().status, Status::Anomalies);
    }

    #[test]
    fn test_switching_resets_unsupported_confirmed() {
        let session = session_with(&[
            (Field::Status, "confirmed"),
            (Field::TestName, "psiphon"),
        ]);

        assert_eq!(session.draft().status, Status::All);
    }

    #[test]
    fn test_switching_clears_domain() {
        let session = session_with(&[
            (Field::Domain, "twitter.com"),
            (Field::TestName, "telegram"),
        ]);
        assert_eq!(session.draft().domain, "");

        // Switching back does not restore the cleared value.
        let mut session = session;
        session.dispatch(event(Field::TestName, "web_connectivity"));
        assert_eq!(session.draft().domain, "");
    }

    #[test]
    fn test_switching_between_domain_tests_keeps_domain() {
        let session = session_with(&[
            (Field::TestName, "web_connectivity"),
            (Field::Domain, "twitter.com"),
            (Field::TestName, "http_requests"),
        ]);

        assert_eq!(session.draft().domain, "twitter.com");
    }

    #[test]
    fn test_inapplicable_edits_are_discarded() {
        let session = session_with(&[
            (Field::TestName, "ndt"),
            (Field::Domain, "example.com"),
            (Field::Status, "anomalies"),
        ]);

        assert_eq!(session.draft().domain, "");
        assert_eq!(session.draft().status, Status::All);
    }

    #[test]
    fn test_reduce_keeps_input_untouched() {
        let draft = FilterDraft::new(&clock());
        let next = reduce(
            draft.clone(),
            FilterEvent::FieldChanged(FieldValue::Asn("AS1234".to_owned())),
        );

        assert_eq!(draft.asn, "");
        assert_eq!(next.asn, "AS1234");
    }

    #[test]
    fn test_dates_are_stored_canonically() {
        let session = session_with(&[(Field::Since, "2024-01-01"), (Field::Until, "")]);
        assert_eq!(session.draft().since, "2024-01-01");
        assert_eq!(session.draft().until, "");
    }

    #[test]
    fn test_parse_rejects_malformed_input() {
        assert_eq!(
            FilterEvent::parse(Field::Since, "01/02/2024"),
            Err(ValidationError::InvalidDate("01/02/2024".to_owned()))
        );
        assert_eq!(
            FilterEvent::parse(Field::Status, "blocked"),
            Err(ValidationError::InvalidValue {
                field: Field::Status,
                value: "blocked".to_owned(),
            })
        );
        assert!(FilterEvent::parse(Field::HideFailedMeasurements, "yes").is_err());
    }

    #[test]
    fn test_since_after_until_is_rejected() {
        let session = session_with(&[(Field::Since, "2024-01-10"), (Field::Until, "2024-01-05")]);

        let error = session.normalize().unwrap_err();
        assert_eq!(
            error.get(Field::Since),
            Some(&ValidationError::SinceNotBeforeUntil)
        );
        assert_eq!(
            error.get(Field::Until),
            Some(&ValidationError::UntilNotAfterSince)
        );
    }

    #[test]
    fn test_range_up_to_tomorrow_is_accepted() {
        let session = session_with(&[(Field::Since, "2024-01-01"), (Field::Until, "2024-01-21")]);
        assert_eq!(session.validate(), Ok(()));
    }

    #[test]
    fn test_equal_dates_are_rejected() {
        let session = session_with(&[(Field::Since, "2024-01-10"), (Field::Until, "2024-01-10")]);
        let error = session.validate().unwrap_err();
        assert_eq!(error.errors().len(), 2);
    }

    #[test]
    fn test_future_until_is_rejected() {
        let session = session_with(&[(Field::Until, "2024-01-22")]);
        let error = session.validate().unwrap_err();
        assert_eq!(error.get(Field::Until), Some(&ValidationError::DateInFuture));
        assert_eq!(error.get(Field::Since), None);
    }

    #[test]
    fn test_field_errors_are_collected() {
        let session = session_with(&[(Field::Asn, "AS0042"), (Field::Domain, "ex_ample.com")]);

        let error = session.validate().unwrap_err();
        assert_eq!(error.to_string(), "filter has 2 invalid field(s)");
        assert_eq!(error.get(Field::Asn), Some(&ValidationError::InvalidAsn));
        assert_eq!(
            error.get(Field::Domain),
            Some(&ValidationError::InvalidDomain)
        );
    }

    #[test]
    fn test_failed_submit_keeps_draft() {
        let mut session = session_with(&[(Field::Asn, "0"), (Field::Country, "IT")]);
        let before = session.draft().clone();

        let mut submitted = Vec::new();
        let result = session.submit(&mut |filter: NormalizedFilter| submitted.push(filter));

        assert!(result.is_err());
        assert!(submitted.is_empty());
        assert_eq!(session.draft(), &before);

        session.dispatch(event(Field::Asn, "AS30722"));
        session
            .submit(&mut |filter: NormalizedFilter| submitted.push(filter))
            .unwrap();
        assert_eq!(submitted.len(), 1);
        assert_eq!(submitted[0].asn.as_deref(), Some("AS30722"));
    }

    #[test]
    fn test_normalize_omits_empty_optionals() {
        let filter = FilterSession::new(clock()).normalize().unwrap();
        assert_eq!(filter.asn, None);
        assert_eq!(filter.domain, None);
        assert_eq!(filter.until, "2024-01-21");
    }

    #[test]
    fn test_restore_resets_stale_values() {
        let mut draft = FilterDraft::new(&clock());
        draft.test_name = TestName::new("ndt");
        draft.domain = "example.com".to_owned();
        draft.status = Status::Confirmed;

        let session = FilterSession::restore(draft, clock());
        assert_eq!(session.draft().domain, "");
        assert_eq!(session.draft().status, Status::All);
    }
}
