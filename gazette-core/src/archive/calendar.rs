//! Rolling multi-month archive calendar.
//!
//! A calendar is a list of [`MonthGrid`]s running from the most recent month
//! back to the oldest one in range. Each grid cell carries a day of month
//! whose sign says whether anything was published that day: `0` is a padding
//! cell outside the month, a positive day has content, a negated day is in
//! the month but has none.

use chrono::{DateTime, Datelike, Month, NaiveDate, Utc};
use serde::Serialize;
use std::collections::BTreeSet;
use std::fmt;

/// Calendar days bearing at least one qualifying published article.
pub type PublishedDates = BTreeSet<NaiveDate>;

pub const DAYS_PER_WEEK: usize = 7;

/// Collapse publish timestamps into the set of days they fall on.
pub fn published_dates<I>(timestamps: I) -> PublishedDates
where
    I: IntoIterator<Item = DateTime<Utc>>,
{
    timestamps.into_iter().map(|ts| ts.date_naive()).collect()
}

/// Zero-based month index (`year * 12 + month - 1`) so stepping across a
/// year boundary is plain integer arithmetic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MonthCursor(i32);

impl MonthCursor {
    /// `month` is 1-based (January = 1).
    pub fn new(year: i32, month: u32) -> Self {
        Self(year * 12 + month as i32 - 1)
    }

    pub fn from_date(date: NaiveDate) -> Self {
        Self::new(date.year(), date.month())
    }

    pub fn year(self) -> i32 {
        self.0.div_euclid(12)
    }

    pub fn month(self) -> u32 {
        self.0.rem_euclid(12) as u32 + 1
    }

    pub fn prev(self) -> Self {
        Self(self.0 - 1)
    }

    pub fn next(self) -> Self {
        Self(self.0 + 1)
    }

    pub fn days_in_month(self) -> u32 {
        match self.month() {
            4 | 6 | 9 | 11 => 30,
            2 if NaiveDate::from_ymd_opt(self.year(), 2, 29).is_some() => 29,
            2 => 28,
            _ => 31,
        }
    }
}

/// Calendar rows for one month, padded with zeros. Columns always start on
/// Sunday regardless of the host locale.
pub fn month_weeks(year: i32, month: u32) -> Vec<[i32; DAYS_PER_WEEK]> {
    let Some(first) = NaiveDate::from_ymd_opt(year, month, 1) else {
        return Vec::new();
    };
    let days = MonthCursor::new(year, month).days_in_month();

    let mut weeks = Vec::with_capacity(6);
    let mut week = [0; DAYS_PER_WEEK];
    let mut column = first.weekday().num_days_from_sunday() as usize;

    for day in 1..=days {
        week[column] = day as i32;
        column += 1;
        if column == DAYS_PER_WEEK {
            weeks.push(week);
            week = [0; DAYS_PER_WEEK];
            column = 0;
        }
    }
    if column > 0 {
        weeks.push(week);
    }
    weeks
}

pub fn month_name(month: u32) -> &'static str {
    u8::try_from(month)
        .ok()
        .and_then(|m| Month::try_from(m).ok())
        .map(|m| m.name())
        .unwrap_or("")
}

/// One month of the archive calendar with publish markers applied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthGrid {
    pub year: i32,
    pub month: u32,
    pub weeks: Vec<[i32; DAYS_PER_WEEK]>,
}

/// Template-facing view of a single grid cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CalendarCell {
    pub day: u32,
    pub in_month: bool,
    pub has_content: bool,
}

impl CalendarCell {
    pub fn from_value(value: i32) -> Self {
        Self {
            day: value.unsigned_abs(),
            in_month: value != 0,
            has_content: value > 0,
        }
    }
}

impl MonthGrid {
    pub fn build(year: i32, month: u32, dates: &PublishedDates) -> Self {
        let weeks = month_weeks(year, month)
            .into_iter()
            .map(|week| week.map(|day| mark_day(year, month, day, dates)))
            .collect();
        Self { year, month, weeks }
    }

    pub fn month_name(&self) -> &'static str {
        month_name(self.month)
    }

    /// Days of the month that have published content, ascending.
    pub fn content_days(&self) -> Vec<u32> {
        self.weeks
            .iter()
            .flatten()
            .filter(|&&day| day > 0)
            .map(|&day| day as u32)
            .collect()
    }

    pub fn has_content(&self) -> bool {
        self.weeks.iter().flatten().any(|&day| day > 0)
    }

    pub fn cells(&self) -> Vec<Vec<CalendarCell>> {
        self.weeks
            .iter()
            .map(|week| week.iter().map(|&v| CalendarCell::from_value(v)).collect())
            .collect()
    }
}

/// Plain-text rendering for the command line. Days with content are
/// starred.
impl fmt::Display for MonthGrid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} {}", self.month_name(), self.year)?;
        writeln!(f, " Su  Mo  Tu  We  Th  Fr  Sa")?;
        for week in &self.weeks {
            let row: String = week
                .iter()
                .map(|&v| match v {
                    0 => "    ".to_string(),
                    d if d > 0 => format!("{d:>3}*"),
                    d => format!("{:>3} ", -d),
                })
                .collect();
            writeln!(f, "{}", row.trim_end())?;
        }
        Ok(())
    }
}

fn mark_day(year: i32, month: u32, day: i32, dates: &PublishedDates) -> i32 {
    if day == 0 {
        return 0;
    }
    match NaiveDate::from_ymd_opt(year, month, day as u32) {
        Some(date) if dates.contains(&date) => day,
        _ => -day,
    }
}

/// Bounding range for the calendar. An explicit year covers that whole year;
/// otherwise the range is the span of the published dates themselves.
/// Returns `None` when there is nothing to show.
pub fn calendar_bounds(year: Option<i32>, dates: &PublishedDates) -> Option<(NaiveDate, NaiveDate)> {
    let (first, last) = (dates.first()?, dates.last()?);
    match year {
        Some(year) => Some((
            NaiveDate::from_ymd_opt(year, 1, 1)?,
            NaiveDate::from_ymd_opt(year, 12, 31)?,
        )),
        None => Some((*first, *last)),
    }
}

/// Build month grids from `end`'s month back through `start`'s month,
/// most recent first. The end month is always emitted.
pub fn build_calendar(start: NaiveDate, end: NaiveDate, dates: &PublishedDates) -> Vec<MonthGrid> {
    let first = MonthCursor::from_date(start);
    let mut cursor = MonthCursor::from_date(end);

    let mut grids = vec![MonthGrid::build(cursor.year(), cursor.month(), dates)];
    while cursor > first {
        cursor = cursor.prev();
        grids.push(MonthGrid::build(cursor.year(), cursor.month(), dates));
    }
    grids
}
