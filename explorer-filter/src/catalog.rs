//! Static catalogs of test names, countries and the rule tables keyed by test name.

use std::fmt;

use serde::{Deserialize, Serialize};

/// The identifier of the "any" selection for test names and countries.
///
/// The sentinel is submitted as-is instead of being omitted, so that filter URLs stay stable.
pub const ANY: &str = "XX";

macro_rules! catalog_id {
    ($(#[$attr:meta])* $name:ident) => {
        $(#[$attr])*
        #[derive(Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, Deserialize, Serialize)]
        #[serde(from = "String", into = "String")]
        pub struct $name(String);

        impl $name {
            /// Creates an identifier from its string form.
            ///
            /// An empty string denotes the [`ANY`] selection.
            pub fn new(id: impl Into<String>) -> Self {
                let id = id.into();
                if id.is_empty() {
                    Self::any()
                } else {
                    Self(id)
                }
            }

            /// Returns the [`ANY`] selection.
            pub fn any() -> Self {
                Self(ANY.to_owned())
            }

            /// Returns `true` if this is the [`ANY`] selection.
            pub fn is_any(&self) -> bool {
                self.0 == ANY
            }

            /// Returns the string form of this identifier.
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::any()
            }
        }

        impl From<String> for $name {
            fn from(id: String) -> Self {
                Self::new(id)
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self::new(id)
            }
        }

        impl From<$name> for String {
            fn from(id: $name) -> Self {
                id.0
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                self.as_str()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

catalog_id!(
    /// The identifier of a measurement test, such as `web_connectivity`, or [`ANY`].
    TestName
);

catalog_id!(
    /// An ISO 3166-1 alpha-2 country code, or [`ANY`].
    CountryCode
);

/// Declares whether the [`ANY`] test name is a member of a [`MembershipSet`].
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum AnyPolicy {
    /// Selecting "any test" counts as a member, so the dependent field stays visible.
    Include,
    /// Selecting "any test" does not count as a member.
    Exclude,
}

/// A named, immutable set of test names that a filter field applies to.
#[derive(Debug)]
pub struct MembershipSet {
    name: &'static str,
    any: AnyPolicy,
    tests: &'static [&'static str],
}

impl MembershipSet {
    /// Creates a new set from its name, the policy for [`ANY`] and the member tests.
    pub const fn new(name: &'static str, any: AnyPolicy, tests: &'static [&'static str]) -> Self {
        Self { name, any, tests }
    }

    /// Returns the name of this set.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Returns the policy applied to the [`ANY`] selection.
    pub fn any_policy(&self) -> AnyPolicy {
        self.any
    }

    /// Returns `true` if the given test is a member of this set.
    pub fn contains(&self, test_name: &TestName) -> bool {
        if test_name.is_any() {
            return self.any == AnyPolicy::Include;
        }

        self.tests.contains(&test_name.as_str())
    }
}

/// Tests whose measurements carry a domain or IP address that can be filtered on.
///
/// The domain field is shown by default, when no test is selected.
pub static TESTS_WITH_DOMAIN: MembershipSet = MembershipSet::new(
    "domain",
    AnyPolicy::Include,
    &[
        "web_connectivity",
        "http_requests",
        "dns_consistency",
        "tcp_connect",
    ],
);

/// Tests that report anomalies.
pub static TESTS_WITH_ANOMALY_STATUS: MembershipSet = MembershipSet::new(
    "anomalies",
    AnyPolicy::Include,
    &[
        "web_connectivity",
        "telegram",
        "facebook_messenger",
        "whatsapp",
        "signal",
        "http_header_field_manipulation",
        "http_invalid_request_line",
        "psiphon",
        "tor",
        "riseupvpn",
        "torsf",
    ],
);

/// Tests that report confirmed blocking.
pub static TESTS_WITH_CONFIRMED_STATUS: MembershipSet =
    MembershipSet::new("confirmed", AnyPolicy::Include, &["web_connectivity"]);

/// A display group of tests.
///
/// Groups only affect how test names are presented, never which filters apply.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TestGroup {
    /// Website censorship tests.
    Websites,
    /// Instant messaging apps.
    Im,
    /// Middlebox detection.
    Middlebox,
    /// Network performance.
    Performance,
    /// Circumvention tools.
    Circumvention,
    /// Experimental tests.
    Experimental,
    /// Tests that are no longer run, and all tests not known to this catalog.
    Legacy,
}

impl TestGroup {
    /// All groups in display order.
    pub const ALL: [TestGroup; 7] = [
        TestGroup::Websites,
        TestGroup::Im,
        TestGroup::Middlebox,
        TestGroup::Performance,
        TestGroup::Circumvention,
        TestGroup::Experimental,
        TestGroup::Legacy,
    ];

    /// Returns the group a test is displayed in.
    pub fn of(test_name: &str) -> Self {
        match test_name {
            "web_connectivity" => TestGroup::Websites,
            "telegram" | "facebook_messenger" | "whatsapp" | "signal" => TestGroup::Im,
            "http_header_field_manipulation" | "http_invalid_request_line" => TestGroup::Middlebox,
            "ndt" | "dash" => TestGroup::Performance,
            "psiphon" | "tor" | "torsf" | "riseupvpn" | "vanilla_tor" => TestGroup::Circumvention,
            "dnscheck" | "stunreachability" | "urlgetter" => TestGroup::Experimental,
            _ => TestGroup::Legacy,
        }
    }

    /// Returns the string identifier of this group.
    pub fn name(self) -> &'static str {
        match self {
            TestGroup::Websites => "websites",
            TestGroup::Im => "im",
            TestGroup::Middlebox => "middlebox",
            TestGroup::Performance => "performance",
            TestGroup::Circumvention => "circumvention",
            TestGroup::Experimental => "experimental",
            TestGroup::Legacy => "legacy",
        }
    }
}

impl fmt::Display for TestGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A selectable test, as provided by the test name catalog.
#[derive(Clone, Debug, Eq, PartialEq, Deserialize, Serialize)]
pub struct TestNameOption {
    /// The test identifier.
    pub id: String,
    /// The human readable name of the test.
    pub name: String,
}

/// A selectable country, as provided by the country catalog.
#[derive(Clone, Debug, Eq, PartialEq, Deserialize, Serialize)]
pub struct CountryOption {
    /// The ISO 3166-1 alpha-2 code.
    pub alpha_2: String,
    /// The human readable name of the country.
    pub name: String,
}

/// Test name options of a single [`TestGroup`].
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct TestGroupOptions {
    /// The display group.
    pub group: TestGroup,
    /// Options in this group, in catalog order.
    pub tests: Vec<TestNameOption>,
}

/// Groups test name options for display.
///
/// Groups are returned in [`TestGroup::ALL`] order and groups without tests are omitted. Within a
/// group, options keep the order of the catalog.
pub fn group_test_names(options: &[TestNameOption]) -> Vec<TestGroupOptions> {
    TestGroup::ALL
        .into_iter()
        .filter_map(|group| {
            let tests: Vec<_> = options
                .iter()
                .filter(|option| TestGroup::of(&option.id) == group)
                .cloned()
                .collect();

            (!tests.is_empty()).then_some(TestGroupOptions { group, tests })
        })
        .collect()
}

/// Returns the country options with the [`ANY`] entry prepended.
///
/// The label of the [`ANY`] entry is supplied by the caller.
pub fn country_options(countries: &[CountryOption], any_label: &str) -> Vec<CountryOption> {
    let any = CountryOption {
        alpha_2: ANY.to_owned(),
        name: any_label.to_owned(),
    };

    std::iter::once(any).chain(countries.iter().cloned()).collect()
}
