//! Front-page story arrangement.

use chrono::Duration;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

use crate::domain::Article;

/// Articles split into the top, middle and low bands of a front page.
#[derive(Debug, Clone, Default, Serialize)]
pub struct StoryTiers {
    pub top: Vec<Article>,
    pub mid: Vec<Article>,
    pub low: Vec<Article>,
}

/// Tier sizes used by the different pages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TierSizes {
    pub top: usize,
    pub mid: usize,
    pub low: usize,
}

impl TierSizes {
    pub const HOMEPAGE: TierSizes = TierSizes { top: 2, mid: 4, low: 6 };
    pub const SECTION: TierSizes = TierSizes { top: 4, mid: 6, low: 12 };
    pub const SUBSECTION: TierSizes = TierSizes { top: 2, mid: 3, low: 12 };
    pub const SIDEBAR: TierSizes = TierSizes { top: 1, mid: 3, low: 0 };

    pub fn total(&self) -> usize {
        self.top + self.mid + self.low
    }
}

/// Number of columns the low tier is spread over on section pages.
pub const LOW_COLUMNS: usize = 4;

impl StoryTiers {
    pub fn all(&self) -> impl Iterator<Item = &Article> {
        self.top.iter().chain(&self.mid).chain(&self.low)
    }

    pub fn lead(&self) -> Option<&Article> {
        self.top.first()
    }
}

/// Partition newest-first `articles` into tiers; anything past the last
/// tier is dropped.
pub fn split_tiers(articles: Vec<Article>, sizes: TierSizes) -> StoryTiers {
    let mut rest = articles.into_iter();
    let top = rest.by_ref().take(sizes.top).collect();
    let mid = rest.by_ref().take(sizes.mid).collect();
    let low = rest.take(sizes.low).collect();
    StoryTiers { top, mid, low }
}

/// Deal `items` round-robin into `columns` lists.
pub fn distribute_columns<T: Clone>(items: &[T], columns: usize) -> Vec<Vec<T>> {
    let mut lists = vec![Vec::new(); columns];
    if columns == 0 {
        return lists;
    }
    for (i, item) in items.iter().enumerate() {
        lists[i % columns].push(item.clone());
    }
    lists
}

/// Contiguous chunks of `size`; the last chunk may be short. Empty input
/// yields a single empty group so templates always have a row to render.
pub fn in_groups_of<T: Clone>(items: &[T], size: usize) -> Vec<Vec<T>> {
    if items.is_empty() || size == 0 {
        return vec![Vec::new()];
    }
    items.chunks(size).map(|chunk| chunk.to_vec()).collect()
}

/// Subsection whose articles are candidate platforms rather than stories.
pub const PLATFORMS_SUBSECTION: &str = "stuco-platforms";

/// Only platforms published within this window of the latest one are shown.
pub fn platform_window() -> Duration {
    Duration::days(7)
}

static PLATFORM_SEPARATOR: Lazy<Regex> = Lazy::new(|| Regex::new(r"[,:]").expect("valid regex"));

/// A student-council platform, parsed from a "Position: Candidate" headline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Platform {
    pub position: String,
    pub name: String,
}

impl Platform {
    /// Candidate surname, used as the secondary sort key.
    pub fn last_name(&self) -> &str {
        self.name
            .split_once(char::is_whitespace)
            .map(|(_, rest)| rest.trim())
            .unwrap_or("")
    }
}

pub fn parse_platform(headline: &str) -> Option<Platform> {
    let mut parts = PLATFORM_SEPARATOR.splitn(headline, 2);
    let position = parts.next()?.trim();
    let mut name = parts.next()?.trim();
    if let Some(stripped) = name.strip_suffix(',') {
        name = stripped.trim_end();
    }
    if position.is_empty() || name.is_empty() {
        return None;
    }
    Some(Platform {
        position: position.to_string(),
        name: name.to_string(),
    })
}

/// Platforms from the latest election window, ordered by position then
/// candidate surname. Headlines that don't parse are skipped.
pub fn current_platforms(articles: &[Article]) -> Vec<(Platform, Article)> {
    let Some(latest) = articles.iter().map(|a| a.pub_date).max() else {
        return Vec::new();
    };
    let cutoff = latest - platform_window();

    let mut current: Vec<(Platform, Article)> = articles
        .iter()
        .filter(|a| a.pub_date >= cutoff)
        .filter_map(|a| parse_platform(&a.headline).map(|p| (p, a.clone())))
        .collect();
    current.sort_by(|(a, _), (b, _)| {
        a.position
            .cmp(&b.position)
            .then_with(|| a.last_name().cmp(b.last_name()))
    });
    current
}
