use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Default number of listings on the jobs page.
pub const DEFAULT_JOB_LIMIT: usize = 20;

/// How many other open listings the sidebar shows.
pub const OTHER_JOBS: usize = 3;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobListing {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
    #[serde(default)]
    pub contact_name: Option<String>,
    #[serde(default)]
    pub contact_email: Option<String>,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub pay: Option<String>,
    #[serde(default)]
    pub hours: Option<String>,
    pub pub_date: DateTime<Utc>,
    #[serde(default)]
    pub is_paid: bool,
    #[serde(default)]
    pub off_campus: bool,
    #[serde(default)]
    pub is_filled: bool,
    #[serde(default)]
    pub needs_car: bool,
    #[serde(default = "default_true")]
    pub is_published: bool,
}

fn default_true() -> bool {
    true
}

/// Conditions picked out of a `/jobs/filter/...` path. `None` means the
/// listing attribute is unconstrained.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct JobFilter {
    pub is_paid: Option<bool>,
    pub off_campus: Option<bool>,
    pub is_filled: Option<bool>,
    pub needs_car: Option<bool>,
}

impl JobFilter {
    /// Parse slash-separated options such as `paid/on-campus/no-car`.
    /// Matching is case-insensitive, unknown options are ignored and a later
    /// option overrides an earlier one for the same attribute.
    pub fn from_options(options: &str) -> Self {
        Self::from_option_list(options.split('/'))
    }

    pub fn from_option_list<'a, I>(options: I) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut filter = Self::default();
        for opt in options {
            let opt = opt.trim().trim_end_matches('/').to_lowercase();
            match opt.as_str() {
                "paid" | "not-paid" => filter.is_paid = Some(opt == "paid"),
                "at-swat" | "on-campus" | "off-campus" => {
                    filter.off_campus = Some(opt == "off-campus")
                }
                "filled" | "not-filled" => filter.is_filled = Some(opt == "filled"),
                "needs-car" | "no-car" => filter.needs_car = Some(opt == "needs-car"),
                _ => {}
            }
        }
        filter
    }

    pub fn matches(&self, job: &JobListing) -> bool {
        fn check(want: Option<bool>, have: bool) -> bool {
            want.map_or(true, |w| w == have)
        }
        check(self.is_paid, job.is_paid)
            && check(self.off_campus, job.off_campus)
            && check(self.is_filled, job.is_filled)
            && check(self.needs_car, job.needs_car)
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// A `?limit=` value. Only all-digit input is honoured; anything else falls
/// back to `default` rather than failing the request.
pub fn parse_limit(raw: Option<&str>, default: usize) -> usize {
    match raw {
        Some(s) if !s.is_empty() && s.chars().all(|c| c.is_ascii_digit()) => {
            s.parse().unwrap_or(default)
        }
        _ => default,
    }
}
