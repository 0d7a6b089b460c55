use async_trait::async_trait;
use chrono::NaiveDate;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

use super::fixture::Fixture;
use super::query::{ArticleQuery, CommentQuery};
use super::traits::Storage;
use crate::common::error::Result;
use crate::domain::{
    Announcement, Article, Comment, JobListing, MediaBucket, MediaFile, Section, SocialEntry,
    Subsection,
};
use crate::jobs::JobFilter;

/// In-memory store for development, tests and fixture-backed deployments.
#[derive(Default)]
pub struct InMemoryStorage {
    sections: Arc<RwLock<Vec<Section>>>,
    subsections: Arc<RwLock<Vec<Subsection>>>,
    articles: Arc<RwLock<HashMap<Uuid, Article>>>,
    comments: Arc<RwLock<Vec<Comment>>>,
    entries: Arc<RwLock<Vec<SocialEntry>>>,
    announcements: Arc<RwLock<Vec<Announcement>>>,
    jobs: Arc<RwLock<Vec<JobListing>>>,
    buckets: Arc<RwLock<Vec<MediaBucket>>>,
    media: Arc<RwLock<Vec<MediaFile>>>,
}

fn take<T>(items: impl Iterator<Item = T>, limit: Option<usize>) -> Vec<T> {
    match limit {
        Some(limit) => items.take(limit).collect(),
        None => items.collect(),
    }
}

impl InMemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a store from a fixture. Media and bucket slugs left blank are
    /// filled in from their names.
    pub fn from_fixture(fixture: Fixture) -> Self {
        let articles = fixture.articles.into_iter().map(|a| (a.id, a)).collect();
        Self {
            sections: Arc::new(RwLock::new(fixture.sections)),
            subsections: Arc::new(RwLock::new(fixture.subsections)),
            articles: Arc::new(RwLock::new(articles)),
            comments: Arc::new(RwLock::new(fixture.comments)),
            entries: Arc::new(RwLock::new(fixture.entries)),
            announcements: Arc::new(RwLock::new(fixture.announcements)),
            jobs: Arc::new(RwLock::new(fixture.jobs)),
            buckets: Arc::new(RwLock::new(
                fixture.buckets.into_iter().map(MediaBucket::with_default_slug).collect(),
            )),
            media: Arc::new(RwLock::new(
                fixture.media.into_iter().map(MediaFile::with_default_slug).collect(),
            )),
        }
    }

    pub async fn add_article(&self, article: Article) {
        debug!("Added article: {} with id {}", article.slug, article.id);
        self.articles.write().await.insert(article.id, article);
    }

    pub async fn add_comment(&self, comment: Comment) {
        debug!("Added comment {} on article {}", comment.id, comment.article_id);
        self.comments.write().await.push(comment);
    }

    /// Every announcement, approved or not, in submission order.
    pub async fn all_announcements(&self) -> Vec<Announcement> {
        self.announcements.read().await.clone()
    }
}

#[async_trait]
impl Storage for InMemoryStorage {
    async fn list_sections(&self) -> Result<Vec<Section>> {
        Ok(self.sections.read().await.clone())
    }

    async fn get_section(&self, slug: &str) -> Result<Option<Section>> {
        let sections = self.sections.read().await;
        Ok(sections.iter().find(|s| s.slug == slug).cloned())
    }

    async fn list_subsections(&self, section: &str) -> Result<Vec<Subsection>> {
        let subsections = self.subsections.read().await;
        Ok(subsections
            .iter()
            .filter(|s| s.section == section)
            .cloned()
            .collect())
    }

    async fn get_subsection(&self, section: &str, slug: &str) -> Result<Option<Subsection>> {
        let subsections = self.subsections.read().await;
        Ok(subsections
            .iter()
            .find(|s| s.section == section && s.slug == slug)
            .cloned())
    }

    async fn published_articles(&self, query: &ArticleQuery) -> Result<Vec<Article>> {
        let articles = self.articles.read().await;
        let mut found: Vec<&Article> = articles
            .values()
            .filter(|a| a.is_published() && query.matches(a))
            .collect();
        found.sort_by(|a, b| b.pub_date.cmp(&a.pub_date).then_with(|| a.slug.cmp(&b.slug)));

        let found = take(found.into_iter().cloned(), query.limit);
        debug!("Article query {:?} matched {} articles", query, found.len());
        Ok(found)
    }

    async fn get_published_article(&self, date: NaiveDate, slug: &str) -> Result<Option<Article>> {
        let articles = self.articles.read().await;
        Ok(articles
            .values()
            .find(|a| a.is_published() && a.slug == slug && a.publish_date() == date)
            .cloned())
    }

    async fn recent_comments(&self, query: &CommentQuery) -> Result<Vec<Comment>> {
        let comments = self.comments.read().await;
        let articles = self.articles.read().await;

        let mut found: Vec<&Comment> = comments
            .iter()
            .filter(|c| c.visible)
            .filter(|c| {
                !query.is_scoped()
                    || articles.get(&c.article_id).map_or(false, |a| query.covers(a))
            })
            .collect();
        found.sort_by(|a, b| b.time.cmp(&a.time));
        Ok(take(found.into_iter().cloned(), query.limit))
    }

    async fn comments_for_article(&self, article_id: Uuid) -> Result<Vec<Comment>> {
        let comments = self.comments.read().await;
        let mut found: Vec<Comment> = comments
            .iter()
            .filter(|c| c.visible && c.article_id == article_id)
            .cloned()
            .collect();
        found.sort_by(|a, b| a.time.cmp(&b.time));
        Ok(found)
    }

    async fn recent_entries(&self, limit: usize) -> Result<Vec<SocialEntry>> {
        let entries = self.entries.read().await;
        let mut found: Vec<&SocialEntry> = entries.iter().filter(|e| e.published).collect();
        found.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        Ok(take(found.into_iter().cloned(), Some(limit)))
    }

    async fn running_announcements(&self, today: NaiveDate) -> Result<Vec<Announcement>> {
        let announcements = self.announcements.read().await;
        Ok(announcements
            .iter()
            .filter(|a| a.approved && a.is_running(today))
            .cloned()
            .collect())
    }

    async fn create_announcement(&self, announcement: &Announcement) -> Result<()> {
        let mut announcements = self.announcements.write().await;
        announcements.push(announcement.clone());
        debug!("Created announcement: {} with id {}", announcement.title, announcement.id);
        Ok(())
    }

    async fn job_listings(&self, filter: &JobFilter, limit: usize) -> Result<Vec<JobListing>> {
        let jobs = self.jobs.read().await;
        let mut found: Vec<&JobListing> = jobs
            .iter()
            .filter(|j| j.is_published && filter.matches(j))
            .collect();
        found.sort_by(|a, b| b.pub_date.cmp(&a.pub_date));
        Ok(take(found.into_iter().cloned(), Some(limit)))
    }

    async fn get_job(&self, slug: &str) -> Result<Option<JobListing>> {
        let jobs = self.jobs.read().await;
        Ok(jobs.iter().find(|j| j.is_published && j.slug == slug).cloned())
    }

    async fn get_bucket(&self, slug: &str) -> Result<Option<MediaBucket>> {
        let buckets = self.buckets.read().await;
        Ok(buckets.iter().find(|b| b.slug == slug).cloned())
    }

    async fn get_media(&self, bucket: &str, slug: &str) -> Result<Option<MediaFile>> {
        let media = self.media.read().await;
        Ok(media
            .iter()
            .find(|m| m.bucket == bucket && m.slug == slug)
            .cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ArticleStatus, Vote};
    use chrono::{DateTime, TimeZone, Utc};

    fn at(day: u32, hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2009, 3, day, hour, 0, 0).unwrap()
    }

    fn article(slug: &str, section: &str, when: DateTime<Utc>) -> Article {
        Article {
            id: Uuid::new_v4(),
            slug: slug.to_string(),
            headline: slug.to_string(),
            subheadline: None,
            summary: None,
            body: String::new(),
            section: section.to_string(),
            subsection: None,
            pub_date: when,
            status: ArticleStatus::Published,
            authors: Vec::new(),
        }
    }

    fn comment(article_id: Uuid, when: DateTime<Utc>, visible: bool) -> Comment {
        Comment {
            id: Uuid::new_v4(),
            article_id,
            subject_title: String::new(),
            name: "reader".to_string(),
            text: "hi".to_string(),
            time: when,
            visible,
            votes: vec![Vote { positive: true }],
        }
    }

    #[tokio::test]
    async fn test_published_articles_newest_first_and_drafts_hidden() {
        let storage = InMemoryStorage::new();
        storage.add_article(article("old", "news", at(1, 9))).await;
        storage.add_article(article("new", "news", at(3, 9))).await;
        let mut draft = article("draft", "news", at(4, 9));
        draft.status = ArticleStatus::Draft;
        storage.add_article(draft).await;
        storage.add_article(article("game", "sports", at(2, 9))).await;

        let all = storage.published_articles(&ArticleQuery::default()).await.unwrap();
        let slugs: Vec<_> = all.iter().map(|a| a.slug.as_str()).collect();
        assert_eq!(slugs, vec!["new", "game", "old"]);

        let news = storage
            .published_articles(&ArticleQuery::default().section("news").limit(1))
            .await
            .unwrap();
        assert_eq!(news.len(), 1);
        assert_eq!(news[0].slug, "new");

        let dates = storage.publish_dates(&ArticleQuery::default().section("news")).await.unwrap();
        assert_eq!(dates.len(), 2);
    }

    #[tokio::test]
    async fn test_article_lookup_by_date_and_slug() {
        let storage = InMemoryStorage::new();
        storage.add_article(article("budget", "news", at(4, 22))).await;

        let day = NaiveDate::from_ymd_opt(2009, 3, 4).unwrap();
        assert!(storage.get_published_article(day, "budget").await.unwrap().is_some());
        assert!(storage.get_published_article(day.succ_opt().unwrap(), "budget").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_comments_scoped_by_section_and_hidden_ones_dropped() {
        let storage = InMemoryStorage::new();
        let news = article("budget", "news", at(1, 9));
        let sports = article("game", "sports", at(1, 9));
        let (news_id, sports_id) = (news.id, sports.id);
        storage.add_article(news).await;
        storage.add_article(sports).await;

        storage.add_comment(comment(news_id, at(2, 9), true)).await;
        storage.add_comment(comment(news_id, at(3, 9), false)).await;
        storage.add_comment(comment(sports_id, at(4, 9), true)).await;
        storage.add_comment(comment(news_id, at(5, 9), true)).await;

        let recent = storage.recent_comments(&CommentQuery::recent(10)).await.unwrap();
        let times: Vec<_> = recent.iter().map(|c| c.time).collect();
        assert_eq!(times, vec![at(5, 9), at(4, 9), at(2, 9)]);

        let scoped = storage
            .recent_comments(&CommentQuery::recent(10).section("news"))
            .await
            .unwrap();
        assert_eq!(scoped.len(), 2);

        let thread = storage.comments_for_article(news_id).await.unwrap();
        assert_eq!(thread.first().map(|c| c.time), Some(at(2, 9)));
    }

    #[tokio::test]
    async fn test_announcements_need_approval() {
        let storage = InMemoryStorage::new();
        let today = NaiveDate::from_ymd_opt(2009, 3, 4).unwrap();
        let mut announcement = Announcement {
            id: Uuid::new_v4(),
            title: "Bake sale".to_string(),
            text: "Cookies".to_string(),
            date_start: today,
            date_end: today,
            poster_email: None,
            sponsor: None,
            sponsor_url: None,
            is_lost_and_found: false,
            event_date: None,
            event_time: None,
            event_place: None,
            approved: false,
        };
        storage.create_announcement(&announcement).await.unwrap();
        assert!(storage.running_announcements(today).await.unwrap().is_empty());

        announcement.id = Uuid::new_v4();
        announcement.approved = true;
        storage.create_announcement(&announcement).await.unwrap();
        assert_eq!(storage.running_announcements(today).await.unwrap().len(), 1);
        assert_eq!(storage.all_announcements().await.len(), 2);
    }
}
