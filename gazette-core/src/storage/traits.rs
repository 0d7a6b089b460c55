use async_trait::async_trait;
use chrono::NaiveDate;
use uuid::Uuid;

use super::query::{ArticleQuery, CommentQuery};
use crate::archive::{published_dates, PublishedDates};
use crate::common::error::Result;
use crate::domain::{
    Announcement, Article, Comment, JobListing, MediaBucket, MediaFile, Section, SocialEntry,
    Subsection,
};
use crate::jobs::JobFilter;

/// Read access to the newspaper's content, plus the one write readers may
/// make (submitting an announcement). Every list comes back in the order the
/// pages display it, so callers never re-sort.
#[async_trait]
pub trait Storage: Send + Sync {
    // Sections
    async fn list_sections(&self) -> Result<Vec<Section>>;
    async fn get_section(&self, slug: &str) -> Result<Option<Section>>;
    async fn list_subsections(&self, section: &str) -> Result<Vec<Subsection>>;
    async fn get_subsection(&self, section: &str, slug: &str) -> Result<Option<Subsection>>;

    // Articles, published only, newest first
    async fn published_articles(&self, query: &ArticleQuery) -> Result<Vec<Article>>;
    async fn get_published_article(&self, date: NaiveDate, slug: &str) -> Result<Option<Article>>;

    /// Distinct publish dates of the articles `query` selects.
    async fn publish_dates(&self, query: &ArticleQuery) -> Result<PublishedDates> {
        let articles = self.published_articles(query).await?;
        Ok(published_dates(articles.iter().map(|a| a.pub_date)))
    }

    // Comments, visible only
    /// Newest first.
    async fn recent_comments(&self, query: &CommentQuery) -> Result<Vec<Comment>>;
    /// Oldest first, as they read under the article.
    async fn comments_for_article(&self, article_id: Uuid) -> Result<Vec<Comment>>;

    // Stream entries, newest first
    async fn recent_entries(&self, limit: usize) -> Result<Vec<SocialEntry>>;

    // Announcements
    /// Approved announcements running on `today`.
    async fn running_announcements(&self, today: NaiveDate) -> Result<Vec<Announcement>>;
    async fn create_announcement(&self, announcement: &Announcement) -> Result<()>;

    // Jobs, published only, newest first
    async fn job_listings(&self, filter: &JobFilter, limit: usize) -> Result<Vec<JobListing>>;
    async fn get_job(&self, slug: &str) -> Result<Option<JobListing>>;

    // Media
    async fn get_bucket(&self, slug: &str) -> Result<Option<MediaBucket>>;
    async fn get_media(&self, bucket: &str, slug: &str) -> Result<Option<MediaFile>>;
}
