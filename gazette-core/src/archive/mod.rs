//! Archive scoping: which articles an `/archives/...` URL selects, how the
//! scope is widened when it selects nothing, and how the calendar view is
//! resolved.

pub mod calendar;

pub use calendar::{
    build_calendar, calendar_bounds, month_name, month_weeks, published_dates, CalendarCell,
    MonthCursor, MonthGrid, PublishedDates,
};

use chrono::NaiveDate;
use serde::Serialize;
use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ArchiveError {
    #[error("unrecognised archive path: {0}")]
    BadPath(String),

    #[error("no such date: {year}-{month:02}-{day:02}")]
    InvalidDate { year: i32, month: u32, day: u32 },
}

/// Filters an archive page applies to the published articles.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ArchiveScope {
    pub section: Option<String>,
    pub subsection: Option<String>,
    pub year: Option<i32>,
    pub month: Option<u32>,
    pub day: Option<u32>,
}

/// Which archive template a scope renders with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Granularity {
    Day,
    Month,
    Calendar,
}

/// Result of resolving the calendar view for a scope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CalendarOutcome {
    Calendar(Vec<MonthGrid>),
    /// Nothing matched; retry with this wider scope.
    Redirect(ArchiveScope),
    /// Nothing matched and there is no filter left to drop.
    NotFound,
}

impl ArchiveScope {
    /// Parse the segments following `/archives`. Leading non-numeric segments
    /// name the section then the subsection; numeric ones are year, month and
    /// day, in that order. Empty segments (trailing slashes) are ignored.
    pub fn from_segments<'a, I>(segments: I) -> Result<Self, ArchiveError>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut scope = Self::default();
        let segments: Vec<&str> = segments
            .into_iter()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .collect();
        let original = segments.join("/");
        let bad_path = || ArchiveError::BadPath(original.clone());

        for segment in segments.iter().copied() {
            let numeric = segment.chars().all(|c| c.is_ascii_digit());
            if !numeric {
                if scope.year.is_some() {
                    return Err(bad_path());
                }
                if scope.section.is_none() {
                    scope.section = Some(segment.to_lowercase());
                } else if scope.subsection.is_none() {
                    scope.subsection = Some(segment.to_lowercase());
                } else {
                    return Err(bad_path());
                }
                continue;
            }

            if scope.year.is_none() {
                scope.year = Some(segment.parse().map_err(|_| bad_path())?);
            } else if scope.month.is_none() {
                let month: u32 = segment.parse().map_err(|_| bad_path())?;
                if !(1..=12).contains(&month) {
                    return Err(bad_path());
                }
                scope.month = Some(month);
            } else if scope.day.is_none() {
                scope.day = Some(segment.parse().map_err(|_| bad_path())?);
            } else {
                return Err(bad_path());
            }
        }

        scope.validate_date()?;
        Ok(scope)
    }

    fn validate_date(&self) -> Result<(), ArchiveError> {
        if let (Some(year), Some(month), Some(day)) = (self.year, self.month, self.day) {
            if NaiveDate::from_ymd_opt(year, month, day).is_none() {
                return Err(ArchiveError::InvalidDate { year, month, day });
            }
        }
        Ok(())
    }

    pub fn granularity(&self) -> Granularity {
        if self.day.is_some() {
            Granularity::Day
        } else if self.month.is_some() {
            Granularity::Month
        } else {
            Granularity::Calendar
        }
    }

    pub fn has_filters(&self) -> bool {
        self.section.is_some()
            || self.subsection.is_some()
            || self.year.is_some()
            || self.month.is_some()
            || self.day.is_some()
    }

    /// The same scope with its most specific filter dropped: day, then
    /// month, then year, then subsection, then section.
    pub fn broader(&self) -> Option<Self> {
        let mut wider = self.clone();
        if wider.day.take().is_some()
            || wider.month.take().is_some()
            || wider.year.take().is_some()
            || wider.subsection.take().is_some()
            || wider.section.take().is_some()
        {
            Some(wider)
        } else {
            None
        }
    }

    /// Archive URL without the date filters; calendar cells link below it.
    pub fn base_path(&self) -> String {
        let mut path = String::from("/archives");
        if let Some(section) = &self.section {
            path.push('/');
            path.push_str(section);
            if let Some(subsection) = &self.subsection {
                path.push('/');
                path.push_str(subsection);
            }
        }
        path
    }

    pub fn path(&self) -> String {
        let mut path = self.base_path();
        if let Some(year) = self.year {
            path.push_str(&format!("/{year}"));
            if let Some(month) = self.month {
                path.push_str(&format!("/{month:02}"));
                if let Some(day) = self.day {
                    path.push_str(&format!("/{day:02}"));
                }
            }
        }
        path
    }

    /// Human heading for the date part of the scope, e.g. "March 4, 2009".
    pub fn date_label(&self) -> String {
        match (self.year, self.month, self.day) {
            (Some(y), Some(m), Some(d)) => format!("{} {}, {}", month_name(m), d, y),
            (Some(y), Some(m), None) => format!("{} {}", month_name(m), y),
            (Some(y), None, _) => y.to_string(),
            _ => String::from("All issues"),
        }
    }
}

/// What to do when a scope selected no articles.
pub fn fallback(scope: &ArchiveScope) -> CalendarOutcome {
    match scope.broader() {
        Some(wider) => CalendarOutcome::Redirect(wider),
        None => CalendarOutcome::NotFound,
    }
}

/// Build the calendar for `scope` from the publish dates its filters
/// selected, or say how to widen the scope when there are none.
pub fn resolve_calendar(scope: &ArchiveScope, dates: &PublishedDates) -> CalendarOutcome {
    match calendar_bounds(scope.year, dates) {
        Some((start, end)) => CalendarOutcome::Calendar(build_calendar(start, end, dates)),
        None => fallback(scope),
    }
}
