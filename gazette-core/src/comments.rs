use std::collections::HashMap;
use uuid::Uuid;

use crate::domain::Comment;

/// How many recent comments compete for the homepage highlight.
pub const TOP_COMMENT_WINDOW: usize = 50;

/// How many recent comments feed the grouped-by-article listing.
pub const GROUPED_COMMENT_WINDOW: usize = 20;

pub fn positive_votes(comment: &Comment) -> usize {
    comment.votes.iter().filter(|vote| vote.positive).count()
}

/// The comment with the most positive votes. Ties go to whichever came
/// first in `comments`; an empty window has no top comment.
pub fn top_comment(comments: &[Comment]) -> Option<&Comment> {
    let mut best: Option<(&Comment, usize)> = None;
    for comment in comments {
        let score = positive_votes(comment);
        if best.map_or(true, |(_, top)| score > top) {
            best = Some((comment, score));
        }
    }
    best.map(|(comment, _)| comment)
}

/// Group newest-first comments by the article they discuss.
///
/// Each group lists its comments oldest first; groups are ordered by their
/// newest comment, most recent group first.
pub fn group_by_subject(comments: &[Comment]) -> Vec<Vec<&Comment>> {
    let mut index: HashMap<Uuid, usize> = HashMap::new();
    let mut groups: Vec<Vec<&Comment>> = Vec::new();

    for comment in comments {
        let slot = *index.entry(comment.article_id).or_insert_with(|| {
            groups.push(Vec::new());
            groups.len() - 1
        });
        groups[slot].insert(0, comment);
    }

    groups.sort_by(|a, b| {
        let newest = |group: &Vec<&Comment>| group.last().map(|c| c.time);
        newest(b).cmp(&newest(a))
    });
    groups
}
