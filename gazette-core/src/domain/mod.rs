use chrono::{DateTime, Datelike, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub use crate::announcements::Announcement;
pub use crate::jobs::JobListing;
pub use crate::media::{MediaBucket, MediaFile};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Section {
    pub name: String,
    pub slug: String,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Subsection {
    pub section: String,
    pub name: String,
    pub slug: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ArticleStatus {
    Draft,
    #[default]
    Published,
}

/// A byline entry. `position` is the staff title shown after the name.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Author {
    pub name: String,
    #[serde(default)]
    pub position: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Article {
    pub id: Uuid,
    pub slug: String,
    pub headline: String,
    #[serde(default)]
    pub subheadline: Option<String>,
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub body: String,
    pub section: String,
    #[serde(default)]
    pub subsection: Option<String>,
    pub pub_date: DateTime<Utc>,
    #[serde(default)]
    pub status: ArticleStatus,
    #[serde(default)]
    pub authors: Vec<Author>,
}

impl Article {
    pub fn is_published(&self) -> bool {
        self.status == ArticleStatus::Published
    }

    /// Calendar day the article was published on.
    pub fn publish_date(&self) -> NaiveDate {
        self.pub_date.date_naive()
    }

    pub fn url(&self) -> String {
        let d = self.publish_date();
        format!("/{}/{:02}/{:02}/{}", d.year(), d.month(), d.day(), self.slug)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Vote {
    pub positive: bool,
}

/// A public reader comment. `article_id` is the comment's subject.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Comment {
    pub id: Uuid,
    pub article_id: Uuid,
    #[serde(default)]
    pub subject_title: String,
    pub name: String,
    pub text: String,
    pub time: DateTime<Utc>,
    #[serde(default = "default_true")]
    pub visible: bool,
    #[serde(default)]
    pub votes: Vec<Vote>,
}

/// A short-form community post (photo, link, status) shown in the stream.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SocialEntry {
    pub id: Uuid,
    pub title: String,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub source: String,
    pub timestamp: DateTime<Utc>,
    #[serde(default = "default_true")]
    pub published: bool,
}

fn default_true() -> bool {
    true
}
