//! The "stream": community entries and reader comments interleaved by time.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::domain::{Comment, SocialEntry};

/// Stream lengths used by the different pages.
pub struct FeedLimits;

impl FeedLimits {
    pub const HOMEPAGE: usize = 7;
    pub const SECTION: usize = 14;
    pub const SUBSECTION: usize = 5;

    /// How many of each source the homepage fetches before merging.
    pub const HOMEPAGE_SOURCE: usize = 20;
    pub const SECTION_ENTRIES: usize = 9;
    pub const SECTION_COMMENTS: usize = 20;
}

/// One item of the stream, borrowed from the data layer's results.
#[derive(Debug, Clone, Copy, Serialize)]
#[serde(tag = "kind", content = "item", rename_all = "lowercase")]
pub enum FeedItem<'a> {
    Entry(&'a SocialEntry),
    Comment(&'a Comment),
}

impl<'a> FeedItem<'a> {
    /// Entries are ordered by `timestamp`, comments by `time`.
    pub fn timestamp(&self) -> DateTime<Utc> {
        match self {
            FeedItem::Entry(entry) => entry.timestamp,
            FeedItem::Comment(comment) => comment.time,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            FeedItem::Entry(_) => "entry",
            FeedItem::Comment(_) => "comment",
        }
    }

    pub fn as_entry(&self) -> Option<&'a SocialEntry> {
        match *self {
            FeedItem::Entry(entry) => Some(entry),
            FeedItem::Comment(_) => None,
        }
    }

    pub fn as_comment(&self) -> Option<&'a Comment> {
        match *self {
            FeedItem::Comment(comment) => Some(comment),
            FeedItem::Entry(_) => None,
        }
    }
}

/// Merge entries and comments into one stream, newest first, keeping at
/// most `limit` items.
///
/// The sort is stable: items with equal timestamps keep their concatenation
/// order, so entries come before comments and each source keeps its input
/// order.
pub fn merge_feed<'a>(
    entries: &'a [SocialEntry],
    comments: &'a [Comment],
    limit: usize,
) -> Vec<FeedItem<'a>> {
    let mut stream: Vec<FeedItem<'a>> = entries
        .iter()
        .map(FeedItem::Entry)
        .chain(comments.iter().map(FeedItem::Comment))
        .collect();

    stream.sort_by(|a, b| b.timestamp().cmp(&a.timestamp()));
    stream.truncate(limit);
    stream
}
