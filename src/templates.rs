//! Askama page templates and the view models they render.
//!
//! Views hold display-ready strings so the templates stay free of logic.

use askama::Template;
use chrono::{DateTime, NaiveDate, Utc};
use gazette_core::announcements::{Announcement, AnnouncementSubmission};
use gazette_core::archive::MonthGrid;
use gazette_core::comments::positive_votes;
use gazette_core::display::{self, join_authors, near_future_date};
use gazette_core::feed::FeedItem;
use gazette_core::jobs::JobListing;
use gazette_core::layout::Platform;
use gazette_core::media::{FrontSlot, MediaBucket, MediaFile, MediaKind};
use gazette_core::{Article, Comment, Section, Subsection};

/// Byline format for story listings: linked names with staff positions.
const LIST_BYLINE: &str = "l";

mod filters {
    use gazette_core::display;
    use std::fmt::Display;

    pub fn plain_text<T: Display>(s: T) -> askama::Result<String> {
        Ok(display::plain_text(&s.to_string()))
    }

    pub fn smart_truncate<T: Display>(s: T, length: usize) -> askama::Result<String> {
        Ok(display::smart_truncate(&s.to_string(), length))
    }

    /// Obfuscate every character, for e-mail addresses.
    pub fn entity_sub<T: Display>(s: T) -> askama::Result<String> {
        Ok(display::entity_sub(&s.to_string(), None))
    }

    pub fn before<T: Display>(s: T, prefix: &str) -> askama::Result<String> {
        Ok(display::before(&s.to_string(), prefix))
    }

    pub fn follow<T: Display>(s: T, suffix: &str) -> askama::Result<String> {
        Ok(display::follow(&s.to_string(), suffix))
    }
}

fn long_date(at: DateTime<Utc>) -> String {
    at.format("%B %-d, %Y").to_string()
}

fn short_time(at: DateTime<Utc>) -> String {
    at.format("%b %-d, %-I:%M %p").to_string()
}

pub struct SiteChrome {
    pub site_name: String,
    pub sections: Vec<Section>,
}

pub struct ArticleView {
    pub headline: String,
    pub subheadline: String,
    pub summary: String,
    pub url: String,
    pub byline: String,
    pub date: String,
    pub section: String,
}

impl From<&Article> for ArticleView {
    fn from(article: &Article) -> Self {
        Self {
            headline: article.headline.clone(),
            subheadline: article.subheadline.clone().unwrap_or_default(),
            summary: article.summary.clone().unwrap_or_default(),
            url: article.url(),
            byline: join_authors(&article.authors, LIST_BYLINE),
            date: long_date(article.pub_date),
            section: article.section.clone(),
        }
    }
}

pub fn article_views(articles: &[Article]) -> Vec<ArticleView> {
    articles.iter().map(ArticleView::from).collect()
}

pub struct StreamItem {
    pub kind: &'static str,
    pub title: String,
    pub text: String,
    pub author: String,
    pub url: Option<String>,
    pub when: String,
}

impl From<&FeedItem<'_>> for StreamItem {
    fn from(item: &FeedItem<'_>) -> Self {
        match item {
            FeedItem::Entry(entry) => Self {
                kind: item.kind(),
                title: entry.title.clone(),
                text: String::new(),
                author: entry.source.clone(),
                url: entry.url.clone(),
                when: short_time(item.timestamp()),
            },
            FeedItem::Comment(comment) => Self {
                kind: item.kind(),
                title: comment.subject_title.clone(),
                text: comment.text.clone(),
                author: comment.name.clone(),
                url: None,
                when: short_time(item.timestamp()),
            },
        }
    }
}

pub fn stream_items(items: &[FeedItem<'_>]) -> Vec<StreamItem> {
    items.iter().map(StreamItem::from).collect()
}

pub struct CommentView {
    pub name: String,
    pub text: String,
    pub subject: String,
    pub when: String,
    pub votes: usize,
}

impl From<&Comment> for CommentView {
    fn from(comment: &Comment) -> Self {
        Self {
            name: comment.name.clone(),
            text: comment.text.clone(),
            subject: comment.subject_title.clone(),
            when: short_time(comment.time),
            votes: positive_votes(comment),
        }
    }
}

pub struct CommentGroupView {
    pub subject: String,
    pub comments: Vec<CommentView>,
}

impl CommentGroupView {
    pub fn from_group(group: &[&Comment]) -> Self {
        Self {
            subject: group.first().map(|c| c.subject_title.clone()).unwrap_or_default(),
            comments: group.iter().map(|&c| CommentView::from(c)).collect(),
        }
    }
}

pub struct AnnouncementView {
    pub title: String,
    pub text: String,
    pub sponsor: String,
    pub sponsor_url: Option<String>,
    /// "Tuesday the 10th, 7:30 PM, Sharples" for events, empty otherwise.
    pub when: String,
    pub lost_and_found: bool,
}

impl AnnouncementView {
    pub fn new(announcement: &Announcement, today: NaiveDate) -> Self {
        let when = match announcement.event_date {
            Some(date) => {
                let mut parts = vec![near_future_date(date, today)];
                if let Some(time) = announcement.event_time {
                    parts.push(time.format("%-I:%M %p").to_string());
                }
                if let Some(place) = announcement.event_place.as_deref().filter(|p| !p.is_empty()) {
                    parts.push(place.to_string());
                }
                parts.join(", ")
            }
            None => String::new(),
        };
        Self {
            title: announcement.title.clone(),
            text: announcement.text.clone(),
            sponsor: announcement.sponsor.clone().unwrap_or_default(),
            sponsor_url: announcement.sponsor_url.clone(),
            when,
            lost_and_found: announcement.is_lost_and_found,
        }
    }
}

pub struct JobView {
    pub name: String,
    pub url: String,
    pub description: String,
    pub pay: String,
    pub hours: String,
    pub contact_name: String,
    pub contact_email: String,
    pub tags: Vec<&'static str>,
    pub posted: String,
    pub filled: bool,
}

impl From<&JobListing> for JobView {
    fn from(job: &JobListing) -> Self {
        let tags = vec![
            if job.is_paid { "paid" } else { "not-paid" },
            if job.off_campus { "off-campus" } else { "on-campus" },
            if job.needs_car { "needs-car" } else { "no-car" },
        ];
        Self {
            name: job.name.clone(),
            url: format!("/jobs/view/{}", job.slug),
            description: job.description.clone(),
            pay: job.pay.clone().unwrap_or_default(),
            hours: job.hours.clone().unwrap_or_default(),
            contact_name: job.contact_name.clone().unwrap_or_default(),
            contact_email: job.contact_email.clone().unwrap_or_default(),
            tags,
            posted: long_date(job.pub_date),
            filled: job.is_filled,
        }
    }
}

pub struct DayCell {
    pub label: String,
    pub link: Option<String>,
}

pub struct MonthView {
    pub title: String,
    pub weeks: Vec<Vec<DayCell>>,
}

impl MonthView {
    /// Days with content link to that day's listing under `base_path`.
    pub fn new(grid: &MonthGrid, base_path: &str) -> Self {
        let weeks = grid
            .cells()
            .into_iter()
            .map(|week| {
                week.into_iter()
                    .map(|cell| DayCell {
                        label: if cell.in_month { cell.day.to_string() } else { String::new() },
                        link: cell.has_content.then(|| {
                            format!("{}/{}/{:02}/{:02}", base_path, grid.year, grid.month, cell.day)
                        }),
                    })
                    .collect()
            })
            .collect();
        Self {
            title: format!("{} {}", grid.month_name(), grid.year),
            weeks,
        }
    }
}

pub struct DayGroup {
    pub label: String,
    pub articles: Vec<ArticleView>,
}

/// Group newest-first articles under "4 Wednesday" style day headings.
pub fn day_groups(articles: &[Article]) -> Vec<DayGroup> {
    let mut groups: Vec<(NaiveDate, Vec<ArticleView>)> = Vec::new();
    for article in articles {
        let date = article.publish_date();
        match groups.last_mut() {
            Some((day, views)) if *day == date => views.push(ArticleView::from(article)),
            _ => groups.push((date, vec![ArticleView::from(article)])),
        }
    }
    groups
        .into_iter()
        .map(|(date, articles)| DayGroup {
            label: display::day_label(date),
            articles,
        })
        .collect()
}

pub struct PlatformView {
    pub position: String,
    pub candidate: String,
    pub url: String,
    pub summary: String,
}

impl PlatformView {
    pub fn new(platform: &Platform, article: &Article) -> Self {
        Self {
            position: platform.position.clone(),
            candidate: platform.name.clone(),
            url: article.url(),
            summary: article.summary.clone().unwrap_or_default(),
        }
    }
}

pub struct MediaView {
    pub name: String,
    pub credit: String,
    pub license: &'static str,
    pub description: String,
    pub original: String,
    pub image: Option<String>,
    pub thumbnail: Option<String>,
    pub source_url: Option<String>,
}

impl From<&MediaFile> for MediaView {
    fn from(file: &MediaFile) -> Self {
        let is_image = file.kind == MediaKind::Image;
        Self {
            name: file.name.clone(),
            credit: file.credit(),
            license: file.license_type.label(),
            description: file.description.clone(),
            original: file.url.clone(),
            image: is_image.then(|| file.front_image(FrontSlot::Top)),
            thumbnail: is_image.then(|| file.thumbnail()),
            source_url: file.source_url.clone(),
        }
    }
}

/// Submission form values as strings, so a rejected form re-renders with
/// what the reader typed.
#[derive(Default)]
pub struct AnnouncementForm {
    pub title: String,
    pub text: String,
    pub date_start: String,
    pub date_end: String,
    pub poster_email: String,
    pub sponsor: String,
    pub sponsor_url: String,
    pub is_lost_and_found: bool,
    pub is_event: bool,
    pub event_date: String,
    pub event_time: String,
    pub event_place: String,
}

impl AnnouncementForm {
    pub fn blank(run: (NaiveDate, NaiveDate)) -> Self {
        Self {
            date_start: run.0.to_string(),
            date_end: run.1.to_string(),
            ..Self::default()
        }
    }

    pub fn from_submission(s: &AnnouncementSubmission) -> Self {
        let text = |v: &Option<String>| v.clone().unwrap_or_default();
        let date = |v: &Option<NaiveDate>| v.map(|d| d.to_string()).unwrap_or_default();
        Self {
            title: s.title.clone(),
            text: s.text.clone(),
            date_start: date(&s.date_start),
            date_end: date(&s.date_end),
            poster_email: text(&s.poster_email),
            sponsor: text(&s.sponsor),
            sponsor_url: text(&s.sponsor_url),
            is_lost_and_found: s.is_lost_and_found,
            is_event: s.is_event,
            event_date: date(&s.event_date),
            event_time: s.event_time.map(|t| t.format("%H:%M").to_string()).unwrap_or_default(),
            event_place: text(&s.event_place),
        }
    }
}

#[derive(Template)]
#[template(path = "index.html")]
pub struct IndexTemplate {
    pub site: SiteChrome,
    pub top: Vec<ArticleView>,
    /// Middle tier laid out in rows.
    pub mid_rows: Vec<Vec<ArticleView>>,
    pub low: Vec<ArticleView>,
    pub stream: Vec<StreamItem>,
    pub top_comment: Option<CommentView>,
    pub comment_groups: Vec<CommentGroupView>,
    pub events: Vec<AnnouncementView>,
    pub announcements: Vec<AnnouncementView>,
    pub jobs: Vec<JobView>,
}

#[derive(Template)]
#[template(path = "section.html")]
pub struct SectionTemplate {
    pub site: SiteChrome,
    pub section: Section,
    /// Set on subsection pages.
    pub subsection: Option<Subsection>,
    pub subsections: Vec<Subsection>,
    pub top: Vec<ArticleView>,
    pub mid: Vec<ArticleView>,
    pub columns: Vec<Vec<ArticleView>>,
    pub stream: Vec<StreamItem>,
}

#[derive(Template)]
#[template(path = "platforms.html")]
pub struct PlatformsTemplate {
    pub site: SiteChrome,
    pub section: Section,
    pub subsection: Subsection,
    pub platforms: Vec<PlatformView>,
}

#[derive(Template)]
#[template(path = "archive_calendar.html")]
pub struct ArchiveCalendarTemplate {
    pub site: SiteChrome,
    pub heading: String,
    pub months: Vec<MonthView>,
}

#[derive(Template)]
#[template(path = "archive_list.html")]
pub struct ArchiveListTemplate {
    pub site: SiteChrome,
    pub heading: String,
    pub up: String,
    pub days: Vec<DayGroup>,
}

#[derive(Template)]
#[template(path = "article.html")]
pub struct ArticleTemplate {
    pub site: SiteChrome,
    pub article: ArticleView,
    pub full_byline: String,
    pub body: String,
    pub comments: Vec<CommentView>,
    pub more: Vec<ArticleView>,
}

#[derive(Template)]
#[template(path = "jobs.html")]
pub struct JobsTemplate {
    pub site: SiteChrome,
    pub filter: String,
    pub jobs: Vec<JobView>,
}

#[derive(Template)]
#[template(path = "job.html")]
pub struct JobTemplate {
    pub site: SiteChrome,
    pub job: JobView,
    pub others: Vec<JobView>,
}

#[derive(Template)]
#[template(path = "announcement_form.html")]
pub struct AnnouncementFormTemplate {
    pub site: SiteChrome,
    pub form: AnnouncementForm,
    pub error: Option<String>,
    pub submitted: bool,
}

#[derive(Template)]
#[template(path = "media.html")]
pub struct MediaTemplate {
    pub site: SiteChrome,
    pub bucket: MediaBucket,
    pub file: MediaView,
}

#[derive(Template)]
#[template(path = "error.html")]
pub struct ErrorTemplate {
    pub status: u16,
    pub message: String,
}
