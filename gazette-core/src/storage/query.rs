use chrono::Datelike;
use serde::Serialize;

use crate::archive::ArchiveScope;
use crate::domain::Article;

/// Which published articles a page wants. Unset fields don't constrain.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ArticleQuery {
    pub section: Option<String>,
    pub subsection: Option<String>,
    pub year: Option<i32>,
    pub month: Option<u32>,
    pub day: Option<u32>,
    pub limit: Option<usize>,
}

impl ArticleQuery {
    pub fn section(mut self, slug: impl Into<String>) -> Self {
        self.section = Some(slug.into());
        self
    }

    pub fn subsection(mut self, slug: impl Into<String>) -> Self {
        self.subsection = Some(slug.into());
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Everything an archive scope filters on, without a limit.
    pub fn from_scope(scope: &ArchiveScope) -> Self {
        Self {
            section: scope.section.clone(),
            subsection: scope.subsection.clone(),
            year: scope.year,
            month: scope.month,
            day: scope.day,
            limit: None,
        }
    }

    /// Filter check only; publication status is the store's concern.
    pub fn matches(&self, article: &Article) -> bool {
        let date = article.publish_date();
        self.section.as_deref().map_or(true, |s| article.section == s)
            && self
                .subsection
                .as_deref()
                .map_or(true, |s| article.subsection.as_deref() == Some(s))
            && self.year.map_or(true, |y| date.year() == y)
            && self.month.map_or(true, |m| date.month() == m)
            && self.day.map_or(true, |d| date.day() == d)
    }
}

/// Which visible comments a page wants, newest first.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CommentQuery {
    /// Only comments on articles in this section.
    pub section: Option<String>,
    pub subsection: Option<String>,
    pub limit: Option<usize>,
}

impl CommentQuery {
    pub fn recent(limit: usize) -> Self {
        Self {
            limit: Some(limit),
            ..Self::default()
        }
    }

    pub fn section(mut self, slug: impl Into<String>) -> Self {
        self.section = Some(slug.into());
        self
    }

    pub fn subsection(mut self, slug: impl Into<String>) -> Self {
        self.subsection = Some(slug.into());
        self
    }

    pub fn is_scoped(&self) -> bool {
        self.section.is_some() || self.subsection.is_some()
    }

    /// Whether a comment on `article` falls inside the query's scope.
    pub fn covers(&self, article: &Article) -> bool {
        self.section.as_deref().map_or(true, |s| article.section == s)
            && self
                .subsection
                .as_deref()
                .map_or(true, |s| article.subsection.as_deref() == Some(s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ArticleStatus;
    use chrono::{TimeZone, Utc};
    use uuid::Uuid;

    fn article(section: &str, subsection: Option<&str>, day: u32) -> Article {
        Article {
            id: Uuid::new_v4(),
            slug: "story".to_string(),
            headline: "Story".to_string(),
            subheadline: None,
            summary: None,
            body: String::new(),
            section: section.to_string(),
            subsection: subsection.map(str::to_string),
            pub_date: Utc.with_ymd_and_hms(2009, 3, day, 12, 0, 0).unwrap(),
            status: ArticleStatus::Published,
            authors: Vec::new(),
        }
    }

    #[test]
    fn test_scope_query_filters_every_field() {
        let scope = ArchiveScope::from_segments("news/features/2009/03/04".split('/')).unwrap();
        let query = ArticleQuery::from_scope(&scope);
        assert!(query.matches(&article("news", Some("features"), 4)));
        assert!(!query.matches(&article("news", Some("features"), 5)));
        assert!(!query.matches(&article("news", None, 4)));
        assert!(!query.matches(&article("sports", Some("features"), 4)));
    }

    #[test]
    fn test_builder_query() {
        let query = ArticleQuery::default().section("news").limit(12);
        assert_eq!(query.limit, Some(12));
        assert!(query.matches(&article("news", Some("features"), 20)));
        assert!(!query.matches(&article("sports", None, 20)));
    }

    #[test]
    fn test_comment_scope() {
        let query = CommentQuery::recent(20).section("news");
        assert!(query.is_scoped());
        assert!(query.covers(&article("news", None, 1)));
        assert!(!query.covers(&article("opinions", None, 1)));
        assert!(!CommentQuery::recent(5).is_scoped());
    }
}
