//! Text and date presentation helpers shared by the page templates.

use chrono::{Datelike, NaiveDate};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::domain::Author;

pub use crate::archive::month_name;

static TAGS: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]*>").expect("valid regex"));

/// English ordinal suffix: 1st, 2nd, 3rd, 4th, 11th, 22nd, ...
pub fn ordinal(n: u32) -> String {
    let suffix = match (n % 10, n % 100) {
        (_, 11..=13) => "th",
        (1, _) => "st",
        (2, _) => "nd",
        (3, _) => "rd",
        _ => "th",
    };
    format!("{n}{suffix}")
}

/// Friendly label for an upcoming date: the weekday when it's within the
/// next few days, "Tuesday the 5th" within a few weeks, else "May 12".
pub fn near_future_date(date: NaiveDate, today: NaiveDate) -> String {
    let distance = (date - today).num_days();
    if (0..6).contains(&distance) {
        date.format("%A").to_string()
    } else if (1..20).contains(&distance) {
        format!("{} the {}", date.format("%A"), ordinal(date.day()))
    } else {
        format!("{} {}", date.format("%B"), date.day())
    }
}

/// "4 Wednesday"
pub fn day_label(date: NaiveDate) -> String {
    format!("{} {}", date.day(), date.format("%A"))
}

/// Strip markup and straighten curly double quotes.
pub fn plain_text(html: &str) -> String {
    TAGS.replace_all(html, "")
        .replace(['\u{201c}', '\u{201d}'], "\"")
}

/// HTML-escape with the same rules the page templates use.
pub fn escape_html(text: &str) -> String {
    askama_escape::escape(text, askama_escape::Html).to_string()
}

/// Replace characters with numeric HTML entities to keep addresses away
/// from scrapers. With `only` set, just those characters are replaced.
pub fn entity_sub(text: &str, only: Option<&str>) -> String {
    text.chars()
        .map(|c| match only {
            Some(set) if !set.contains(c) => escape_html(&c.to_string()),
            _ => format!("&#{};", c as u32),
        })
        .collect()
}

/// How far back from the cut point we look for a word boundary.
const TRUNCATE_SLACK: usize = 5;

/// Shorten `text` to about `length` characters, preferring to break at a
/// space, and mark the cut with an ellipsis.
pub fn smart_truncate(text: &str, length: usize) -> String {
    let chars: Vec<char> = text.chars().collect();
    if chars.len() <= length {
        return text.to_string();
    }
    let mut cut = length;
    if let Some(space) = chars[..length].iter().rposition(|c| c.is_whitespace()) {
        if length - space <= TRUNCATE_SLACK {
            cut = space;
        }
    }
    let head: String = chars[..cut].iter().collect();
    format!("{}...", head.trim_end())
}

pub fn before(value: &str, prefix: &str) -> String {
    if value.is_empty() {
        String::new()
    } else {
        format!("{prefix}{value}")
    }
}

pub fn follow(value: &str, suffix: &str) -> String {
    if value.is_empty() {
        String::new()
    } else {
        format!("{value}{suffix}")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BylineCase {
    Upper,
    Lower,
    AsIs,
}

/// Options for [`join_authors`], read from a compact format string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BylineFormat {
    limit: Option<usize>,
    link: bool,
    case: BylineCase,
    positions: bool,
    separator: String,
}

impl Default for BylineFormat {
    fn default() -> Self {
        Self {
            limit: None,
            link: false,
            case: BylineCase::Upper,
            positions: true,
            separator: "; ".to_string(),
        }
    }
}

impl BylineFormat {
    /// Each character sets one option; when two conflict the later wins.
    ///
    /// * a digit limits the number of authors; `0` and `a` show them all
    /// * `l` links names to profile pages, `p` doesn't
    /// * `u` upper-cases, `d` lower-cases, `t` leaves names as written
    /// * `s` shows staff positions, `x` hides them
    /// * `,` or `;` separate authors with that character, `b` with a line break
    pub fn parse(format: &str) -> Self {
        let mut f = Self::default();
        for c in format.to_lowercase().chars() {
            match c {
                '0' => f.limit = None,
                '1'..='9' => f.limit = c.to_digit(10).map(|d| d as usize),
                'a' => f.limit = None,
                'l' | 'p' => f.link = c == 'l',
                'u' => f.case = BylineCase::Upper,
                'd' => f.case = BylineCase::Lower,
                't' => f.case = BylineCase::AsIs,
                's' | 'x' => f.positions = c == 's',
                'b' => f.separator = "<br/> ".to_string(),
                ',' | ';' => f.separator = format!("{c} "),
                _ => {}
            }
        }
        f
    }

    fn casify(&self, text: &str) -> String {
        let cased = match self.case {
            BylineCase::Upper => text.to_uppercase(),
            BylineCase::Lower => text.to_lowercase(),
            BylineCase::AsIs => text.to_string(),
        };
        escape_html(&cased)
    }
}

/// Byline markup such as "JOE SCHMOE, STAFF REPORTER; JANE MCBANE, ARTS
/// EDITOR". Names are escaped, so the result is safe to emit as HTML.
pub fn join_authors(authors: &[Author], format: &str) -> String {
    let f = BylineFormat::parse(format);
    let shown = f.limit.unwrap_or(authors.len()).min(authors.len());

    authors[..shown]
        .iter()
        .map(|author| {
            let mut text = f.casify(&author.name);
            if f.positions {
                if let Some(position) = author.position.as_deref().filter(|p| !p.is_empty()) {
                    text.push_str(", ");
                    text.push_str(&f.casify(position));
                }
            }
            match (&author.url, f.link) {
                (Some(url), true) => format!("<a href='{}'>{}</a>", escape_html(url), text),
                _ => text,
            }
        })
        .collect::<Vec<_>>()
        .join(&f.separator)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2009, m, d).unwrap()
    }

    fn author(name: &str, position: Option<&str>) -> Author {
        Author {
            name: name.to_string(),
            position: position.map(str::to_string),
            url: Some(format!("/users/{}", name.to_lowercase().replace(' ', "-"))),
        }
    }

    #[test]
    fn test_ordinal() {
        let got: Vec<String> = [1, 2, 3, 4, 11, 12, 13, 21, 22, 101, 111].iter().map(|&n| ordinal(n)).collect();
        assert_eq!(got, ["1st", "2nd", "3rd", "4th", "11th", "12th", "13th", "21st", "22nd", "101st", "111th"]);
    }

    #[test]
    fn test_near_future_date() {
        // 2 March 2009 was a Monday
        let today = date(3, 2);
        assert_eq!(near_future_date(date(3, 2), today), "Monday");
        assert_eq!(near_future_date(date(3, 6), today), "Friday");
        assert_eq!(near_future_date(date(3, 10), today), "Tuesday the 10th");
        assert_eq!(near_future_date(date(4, 12), today), "April 12");
        assert_eq!(near_future_date(date(2, 27), today), "February 27");
    }

    #[test]
    fn test_day_and_month_labels() {
        assert_eq!(day_label(date(3, 4)), "4 Wednesday");
        assert_eq!(month_name(5), "May");
        assert_eq!(month_name(13), "");
    }

    #[test]
    fn test_plain_text() {
        assert_eq!(plain_text("<p>\u{201c}Hi\u{201d} <b>there</b></p>"), "\"Hi\" there");
    }

    #[test]
    fn test_entity_sub() {
        assert_eq!(entity_sub("a@b", None), "&#97;&#64;&#98;");
        assert_eq!(entity_sub("a@b", Some("@")), "a&#64;b");
    }

    #[test]
    fn test_smart_truncate_prefers_word_boundary() {
        assert_eq!(smart_truncate("short", 10), "short");
        assert_eq!(smart_truncate("The quick brown fox", 12), "The quick...");
        assert_eq!(smart_truncate("Supercalifragilistic", 8), "Supercal...");
    }

    #[test]
    fn test_before_and_follow() {
        assert_eq!(before("Smith", "by "), "by Smith");
        assert_eq!(before("", "by "), "");
        assert_eq!(follow("Smith", ","), "Smith,");
        assert_eq!(follow("", ","), "");
    }

    #[test]
    fn test_join_authors_default_format() {
        let authors = vec![
            author("Joe Schmoe", Some("Staff Reporter")),
            author("Jane McBane", Some("Arts Editor")),
        ];
        assert_eq!(
            join_authors(&authors, ""),
            "JOE SCHMOE, STAFF REPORTER; JANE MCBANE, ARTS EDITOR"
        );
    }

    #[test]
    fn test_join_authors_options() {
        let authors = vec![
            author("Joe Schmoe", Some("Staff Reporter")),
            author("Jane McBane", None),
        ];
        assert_eq!(join_authors(&authors, "1tx"), "Joe Schmoe");
        assert_eq!(join_authors(&authors, "dx,"), "joe schmoe, jane mcbane");
        assert_eq!(
            join_authors(&authors, "ltxb"),
            "<a href='/users/joe-schmoe'>Joe Schmoe</a><br/> <a href='/users/jane-mcbane'>Jane McBane</a>"
        );
        assert_eq!(join_authors(&[], "a"), "");
    }

    #[test]
    fn test_zero_limit_shows_every_author() {
        let authors = vec![author("Joe Schmoe", None), author("Jane McBane", None)];
        assert_eq!(join_authors(&authors, "0tx"), "Joe Schmoe; Jane McBane");
        assert_eq!(join_authors(&authors, "10tx"), join_authors(&authors, "atx"));
    }

    #[test]
    fn test_join_authors_escapes_names() {
        let authors = vec![author("<script>", None)];
        assert_eq!(join_authors(&authors, "tx"), "&lt;script&gt;");
        // entities survive upper-casing
        let authors = vec![author("Smith & O'Neil", None)];
        assert_eq!(join_authors(&authors, "ux"), "SMITH &amp; O&#x27;NEIL");
        assert_eq!(escape_html("\"a\" <b>"), "&quot;a&quot; &lt;b&gt;");
    }
}
