//! Community announcements and event listings.

use chrono::{Duration, NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Non-event announcements shown on the homepage.
pub const HOMEPAGE_ANNOUNCEMENTS: usize = 7;
/// Upcoming events shown on the homepage.
pub const HOMEPAGE_EVENTS: usize = 5;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Announcement {
    pub id: Uuid,
    pub title: String,
    pub text: String,
    pub date_start: NaiveDate,
    pub date_end: NaiveDate,
    #[serde(default)]
    pub poster_email: Option<String>,
    #[serde(default)]
    pub sponsor: Option<String>,
    #[serde(default)]
    pub sponsor_url: Option<String>,
    #[serde(default)]
    pub is_lost_and_found: bool,
    #[serde(default)]
    pub event_date: Option<NaiveDate>,
    #[serde(default)]
    pub event_time: Option<NaiveTime>,
    #[serde(default)]
    pub event_place: Option<String>,
    #[serde(default)]
    pub approved: bool,
}

impl Announcement {
    pub fn is_event(&self) -> bool {
        self.event_date.is_some()
    }

    /// Running on `today`, inclusive at both ends.
    pub fn is_running(&self, today: NaiveDate) -> bool {
        self.date_start <= today && today <= self.date_end
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("{0} is required.")]
    Required(&'static str),

    #[error("You have to give a sponsor name if you have a sponsor link.")]
    SponsorUrlWithoutSponsor,

    #[error("You need to give a date if this is a specific event.")]
    EventWithoutDate,

    #[error("The announcement can't end before it starts.")]
    EndsBeforeStart,
}

/// Reader-submitted announcement, as posted by the submission form.
/// Blank form fields arrive as empty strings and are read as absent.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AnnouncementSubmission {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub text: String,
    #[serde(default, deserialize_with = "form::optional_date")]
    pub date_start: Option<NaiveDate>,
    #[serde(default, deserialize_with = "form::optional_date")]
    pub date_end: Option<NaiveDate>,
    #[serde(default)]
    pub poster_email: Option<String>,
    #[serde(default)]
    pub sponsor: Option<String>,
    #[serde(default)]
    pub sponsor_url: Option<String>,
    #[serde(default, deserialize_with = "form::checkbox")]
    pub is_lost_and_found: bool,
    #[serde(default, deserialize_with = "form::checkbox")]
    pub is_event: bool,
    #[serde(default, deserialize_with = "form::optional_date")]
    pub event_date: Option<NaiveDate>,
    #[serde(default, deserialize_with = "form::optional_time")]
    pub event_time: Option<NaiveTime>,
    #[serde(default)]
    pub event_place: Option<String>,
}

mod form {
    use chrono::{NaiveDate, NaiveTime};
    use serde::{de, Deserialize, Deserializer};

    fn text<'de, D: Deserializer<'de>>(d: D) -> Result<Option<String>, D::Error> {
        let raw = Option::<String>::deserialize(d)?;
        Ok(raw.map(|s| s.trim().to_string()).filter(|s| !s.is_empty()))
    }

    pub fn optional_date<'de, D: Deserializer<'de>>(d: D) -> Result<Option<NaiveDate>, D::Error> {
        text(d)?
            .map(|s| NaiveDate::parse_from_str(&s, "%Y-%m-%d").map_err(de::Error::custom))
            .transpose()
    }

    pub fn optional_time<'de, D: Deserializer<'de>>(d: D) -> Result<Option<NaiveTime>, D::Error> {
        text(d)?
            .map(|s| {
                NaiveTime::parse_from_str(&s, "%H:%M:%S")
                    .or_else(|_| NaiveTime::parse_from_str(&s, "%H:%M"))
                    .map_err(de::Error::custom)
            })
            .transpose()
    }

    /// HTML checkboxes post `on` when ticked and nothing otherwise.
    pub fn checkbox<'de, D: Deserializer<'de>>(d: D) -> Result<bool, D::Error> {
        Ok(text(d)?.map_or(false, |s| {
            !matches!(s.to_ascii_lowercase().as_str(), "false" | "off" | "0" | "no")
        }))
    }
}

fn present(value: &Option<String>) -> bool {
    value.as_deref().map_or(false, |v| !v.trim().is_empty())
}

impl AnnouncementSubmission {
    /// Check the submission and turn it into an unapproved announcement.
    pub fn validate(self, today: NaiveDate) -> Result<Announcement, ValidationError> {
        if self.title.trim().is_empty() {
            return Err(ValidationError::Required("Title"));
        }
        if self.text.trim().is_empty() {
            return Err(ValidationError::Required("Text"));
        }
        if present(&self.sponsor_url) && !present(&self.sponsor) {
            return Err(ValidationError::SponsorUrlWithoutSponsor);
        }
        if self.is_event && self.event_date.is_none() {
            return Err(ValidationError::EventWithoutDate);
        }

        let date_start = self.date_start.unwrap_or(today);
        let date_end = self.date_end.unwrap_or(date_start);
        if date_end < date_start {
            return Err(ValidationError::EndsBeforeStart);
        }

        let (event_date, event_time, event_place) = if self.is_event {
            (self.event_date, self.event_time, self.event_place)
        } else {
            (None, None, None)
        };

        Ok(Announcement {
            id: Uuid::new_v4(),
            title: self.title.trim().to_string(),
            text: self.text.trim().to_string(),
            date_start,
            date_end,
            poster_email: self.poster_email.filter(|e| !e.trim().is_empty()),
            sponsor: self.sponsor.filter(|s| !s.trim().is_empty()),
            sponsor_url: self.sponsor_url.filter(|s| !s.trim().is_empty()),
            is_lost_and_found: self.is_lost_and_found,
            event_date,
            event_time,
            event_place,
            approved: false,
        })
    }
}

/// Split announcements into dated events, soonest first, and everything
/// else, most recently ending first.
pub fn split_announcements(announcements: Vec<Announcement>) -> (Vec<Announcement>, Vec<Announcement>) {
    let (mut events, mut others): (Vec<_>, Vec<_>) =
        announcements.into_iter().partition(Announcement::is_event);

    events.sort_by(|a, b| {
        a.event_date
            .cmp(&b.event_date)
            .then_with(|| a.event_time.cmp(&b.event_time))
            .then_with(|| a.id.cmp(&b.id))
    });
    others.sort_by(|a, b| {
        b.date_end
            .cmp(&a.date_end)
            .then_with(|| b.date_start.cmp(&a.date_start))
    });
    (events, others)
}

/// Announcements and posters run for a week unless the submitter says
/// otherwise; the blank submission form is pre-filled with this range.
pub const DEFAULT_RUN_DAYS: i64 = 7;

pub fn default_run(today: NaiveDate) -> (NaiveDate, NaiveDate) {
    (today, today + Duration::days(DEFAULT_RUN_DAYS))
}
