//! Optional end-to-end smoke test against a locally served registration endpoint
//!
//! Posts URL-encoded forms and looks for expected substrings in the response
//! body. Transport problems become failed checks; nothing here panics.

use crate::checks::CheckReport;
use anyhow::{Context, Result};
use reqwest::blocking::Client;
use std::time::Duration;
use tracing::{debug, warn};

pub const DEFAULT_SMOKE_URL: &str = "http://localhost:8000/public/register.php";

pub const REQUIRED_FIELD_MESSAGE: &str = "This field is required";

const REQUEST_TIMEOUT_SECS: u64 = 10;

/// One form submission and the text its response must contain
#[derive(Debug, Clone)]
pub struct Scenario {
    pub name: &'static str,
    pub fields: Vec<(&'static str, &'static str)>,
    pub expect: &'static str,
}

/// The two registration scenarios the processing script must handle
pub fn registration_scenarios() -> Vec<Scenario> {
    vec![
        Scenario {
            name: "Empty form shows error",
            fields: vec![
                ("student_id", ""),
                ("first_name", ""),
                ("last_name", ""),
                ("email", ""),
                ("club", ""),
            ],
            expect: REQUIRED_FIELD_MESSAGE,
        },
        Scenario {
            name: "Valid form accepts data",
            fields: vec![
                ("student_id", "12345"),
                ("first_name", "Jane"),
                ("last_name", "Doe"),
                ("email", "jane@example.com"),
                ("club", "Music"),
                ("agree_to_rules", "on"),
            ],
            expect: "Jane",
        },
    ]
}

pub struct SmokeClient {
    client: Client,
    url: String,
}

impl SmokeClient {
    pub fn new(url: impl Into<String>) -> Result<Self> {
        let client = Client::builder()
            .no_proxy()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            url: url.into(),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// POSTs `fields` as `application/x-www-form-urlencoded` and returns the body.
    /// Non-2xx responses are errors even when they carry a body.
    pub fn post_form(&self, fields: &[(&str, &str)]) -> Result<String> {
        debug!(url = %self.url, fields = fields.len(), "Posting form");

        self.client
            .post(&self.url)
            .form(fields)
            .send()
            .with_context(|| format!("POST {} failed", self.url))?
            .error_for_status()
            .with_context(|| format!("POST {} returned an error status", self.url))?
            .text()
            .context("Failed to read response body")
    }

    pub fn run(&self, scenarios: &[Scenario]) -> CheckReport {
        let mut report = CheckReport::new("SMOKE TESTS", "SMOKE TESTS").with_banners(
            vec!["✅ Registration endpoint behaves as expected.".to_string()],
            vec![format!("❌ Registration endpoint at {} misbehaved.", self.url)],
        );

        for scenario in scenarios {
            match self.post_form(&scenario.fields) {
                Ok(body) => {
                    report.check(
                        body.contains(scenario.expect),
                        scenario.name,
                        format!("{}: response lacks {:?}", scenario.name, scenario.expect),
                    );
                }
                Err(e) => {
                    warn!(error = %e, scenario = scenario.name, "Smoke request failed");
                    report.fail(format!("{}: {:#}", scenario.name, e));
                }
            }
        }

        report
    }

    pub fn run_registration_scenarios(&self) -> CheckReport {
        self.run(&registration_scenarios())
    }
}
