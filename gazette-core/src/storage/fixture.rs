use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;
use tracing::{info, warn};

use crate::common::error::{GazetteError, Result};
use crate::domain::{
    Announcement, Article, Comment, JobListing, MediaBucket, MediaFile, Section, SocialEntry,
    Subsection,
};

/// Site content as stored in a JSON fixture file. Every collection may be
/// omitted.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Fixture {
    pub sections: Vec<Section>,
    pub subsections: Vec<Subsection>,
    pub articles: Vec<Article>,
    pub comments: Vec<Comment>,
    pub entries: Vec<SocialEntry>,
    pub announcements: Vec<Announcement>,
    pub jobs: Vec<JobListing>,
    pub buckets: Vec<MediaBucket>,
    pub media: Vec<MediaFile>,
}

/// Counts reported by `check-fixture`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FixtureSummary {
    pub sections: usize,
    pub subsections: usize,
    pub articles: usize,
    pub published_articles: usize,
    pub comments: usize,
    pub entries: usize,
    pub announcements: usize,
    pub jobs: usize,
    pub media: usize,
}

fn invalid(message: String) -> GazetteError {
    GazetteError::Fixture { message }
}

impl Fixture {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read, parse and validate a fixture file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)?;
        let fixture = Self::from_json(&raw)?;
        fixture.validate()?;
        info!(
            "Loaded fixture {} ({} articles, {} comments)",
            path.display(),
            fixture.articles.len(),
            fixture.comments.len()
        );
        Ok(fixture)
    }

    /// Check that everything refers to things that exist and that the URL
    /// keys pages look content up by are unique.
    pub fn validate(&self) -> Result<()> {
        let sections: HashSet<&str> = self.sections.iter().map(|s| s.slug.as_str()).collect();
        if sections.len() != self.sections.len() {
            return Err(invalid("duplicate section slug".to_string()));
        }

        let mut subsections = HashSet::new();
        for sub in &self.subsections {
            if !sections.contains(sub.section.as_str()) {
                return Err(invalid(format!(
                    "subsection '{}' belongs to unknown section '{}'",
                    sub.slug, sub.section
                )));
            }
            if !subsections.insert((sub.section.as_str(), sub.slug.as_str())) {
                return Err(invalid(format!("duplicate subsection '{}/{}'", sub.section, sub.slug)));
            }
        }

        let mut article_keys = HashSet::new();
        let mut article_ids = HashSet::new();
        for article in &self.articles {
            if !sections.contains(article.section.as_str()) {
                return Err(invalid(format!(
                    "article '{}' is in unknown section '{}'",
                    article.slug, article.section
                )));
            }
            if let Some(sub) = article.subsection.as_deref() {
                if !subsections.contains(&(article.section.as_str(), sub)) {
                    return Err(invalid(format!(
                        "article '{}' is in unknown subsection '{}/{}'",
                        article.slug, article.section, sub
                    )));
                }
            }
            if !article_keys.insert((article.publish_date(), article.slug.as_str())) {
                return Err(invalid(format!("duplicate article URL {}", article.url())));
            }
            article_ids.insert(article.id);
        }

        for comment in &self.comments {
            if !article_ids.contains(&comment.article_id) {
                return Err(invalid(format!(
                    "comment {} is on unknown article {}",
                    comment.id, comment.article_id
                )));
            }
        }

        let mut job_slugs = HashSet::new();
        for job in &self.jobs {
            if !job_slugs.insert(job.slug.as_str()) {
                return Err(invalid(format!("duplicate job slug '{}'", job.slug)));
            }
        }

        let buckets: HashSet<String> = self
            .buckets
            .iter()
            .map(|b| b.clone().with_default_slug().slug)
            .collect();
        for file in &self.media {
            if !buckets.contains(&file.bucket) {
                warn!("Media file '{}' is in unknown bucket '{}'", file.name, file.bucket);
            }
        }

        Ok(())
    }

    pub fn summary(&self) -> FixtureSummary {
        FixtureSummary {
            sections: self.sections.len(),
            subsections: self.subsections.len(),
            articles: self.articles.len(),
            published_articles: self.articles.iter().filter(|a| a.is_published()).count(),
            comments: self.comments.len(),
            entries: self.entries.len(),
            announcements: self.announcements.len(),
            jobs: self.jobs.len(),
            media: self.media.len(),
        }
    }
}
