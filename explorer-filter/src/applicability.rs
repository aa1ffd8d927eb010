use serde::Serialize;

use crate::{
    Status, TESTS_WITH_ANOMALY_STATUS, TESTS_WITH_CONFIRMED_STATUS, TESTS_WITH_DOMAIN, TestName,
};

/// The optional filter fields that apply to a test name.
///
/// This is derived state. It is never stored and is recomputed from the test name whenever it is
/// needed.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldApplicability {
    /// The domain field applies.
    pub show_domain: bool,
    /// The `confirmed` status applies.
    pub show_confirmed: bool,
    /// The `anomalies` status applies.
    pub show_anomalies: bool,
}

impl FieldApplicability {
    /// Resolves the applicable fields for the given test name.
    ///
    /// This is a pure function of the test name. Selecting [`ANY`](crate::ANY) makes every
    /// optional field applicable.
    pub fn resolve(test_name: &TestName) -> Self {
        Self {
            show_domain: TESTS_WITH_DOMAIN.contains(test_name),
            show_confirmed: TESTS_WITH_CONFIRMED_STATUS.contains(test_name),
            show_anomalies: TESTS_WITH_ANOMALY_STATUS.contains(test_name),
        }
    }

    /// Returns `true` if any status other than [`Status::All`] can be selected.
    pub fn show_status(&self) -> bool {
        self.show_confirmed || self.show_anomalies
    }

    /// Returns `true` if the given status can be submitted.
    pub fn allows(&self, status: Status) -> bool {
        match status {
            Status::All => true,
            Status::Confirmed => self.show_confirmed,
            Status::Anomalies => self.show_anomalies,
        }
    }
}

/// Resolves the applicable fields for the given test name.
///
/// Shorthand for [`FieldApplicability::resolve`].
pub fn resolve(test_name: &TestName) -> FieldApplicability {
    FieldApplicability::resolve(test_name)
}
