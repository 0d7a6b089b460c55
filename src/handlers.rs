use askama::Template;
use axum::{
    extract::{Form, Path, Query, State},
    http::{header, StatusCode},
    response::{Html, IntoResponse, Redirect, Response},
    Json,
};
use chrono::NaiveDate;
use gazette_core::announcements::{
    default_run, split_announcements, AnnouncementSubmission, HOMEPAGE_ANNOUNCEMENTS,
    HOMEPAGE_EVENTS,
};
use gazette_core::archive::{fallback, resolve_calendar, ArchiveScope, CalendarOutcome, Granularity};
use gazette_core::comments::{
    group_by_subject, top_comment, GROUPED_COMMENT_WINDOW, TOP_COMMENT_WINDOW,
};
use gazette_core::display::join_authors;
use gazette_core::feed::{merge_feed, FeedLimits};
use gazette_core::jobs::{parse_limit, JobFilter, DEFAULT_JOB_LIMIT, OTHER_JOBS};
use gazette_core::layout::{
    current_platforms, distribute_columns, in_groups_of, split_tiers, TierSizes, LOW_COLUMNS,
    PLATFORMS_SUBSECTION,
};
use gazette_core::storage::{ArticleQuery, CommentQuery};
use gazette_core::Article;
use serde::Deserialize;
use tracing::{debug, info, instrument};
use url::form_urlencoded;

use crate::error::{Result, SiteError};
use crate::metrics::SiteMetrics;
use crate::state::AppState;
use crate::templates::{
    article_views, day_groups, stream_items, AnnouncementForm, AnnouncementFormTemplate,
    AnnouncementView, ArchiveCalendarTemplate, ArchiveListTemplate, ArticleTemplate, ArticleView,
    CommentGroupView, CommentView, IndexTemplate, JobTemplate, JobView, JobsTemplate,
    MediaTemplate, MediaView, MonthView, PlatformView, PlatformsTemplate, SectionTemplate,
};

/// Byline on the article page itself: everyone, linked, names as written.
const ARTICLE_BYLINE: &str = "lt";

const SEARCH_ENGINE: &str = "https://www.google.com/search";

/// Homepage middle-tier stories per row.
const MID_ROW: usize = 2;

fn page(name: &'static str, template: impl Template) -> Result<Response> {
    let body = template.render()?;
    SiteMetrics::record_page_view(name);
    Ok(Html(body).into_response())
}

fn unfilled() -> JobFilter {
    JobFilter {
        is_filled: Some(false),
        ..JobFilter::default()
    }
}

pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "service": "gazette",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

pub async fn metrics(State(state): State<AppState>) -> Response {
    match &state.metrics {
        Some(handle) => (
            [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
            handle.render(),
        )
            .into_response(),
        None => (StatusCode::SERVICE_UNAVAILABLE, "metrics recorder not installed").into_response(),
    }
}

#[instrument(skip(state))]
pub async fn index(State(state): State<AppState>) -> Result<Response> {
    let storage = &state.storage;
    let today = state.today();

    let articles = storage
        .published_articles(&ArticleQuery::default().limit(TierSizes::HOMEPAGE.total()))
        .await?;
    let tiers = split_tiers(articles, TierSizes::HOMEPAGE);

    let entries = storage.recent_entries(FeedLimits::HOMEPAGE_SOURCE).await?;
    let recent = storage
        .recent_comments(&CommentQuery::recent(FeedLimits::HOMEPAGE_SOURCE))
        .await?;
    let stream = merge_feed(&entries, &recent, FeedLimits::HOMEPAGE);

    let window = storage
        .recent_comments(&CommentQuery::recent(TOP_COMMENT_WINDOW))
        .await?;
    let grouped_window = &window[..window.len().min(GROUPED_COMMENT_WINDOW)];

    let (events, others) = split_announcements(storage.running_announcements(today).await?);
    let jobs = storage.job_listings(&unfilled(), OTHER_JOBS).await?;

    let template = IndexTemplate {
        site: state.chrome().await?,
        top: article_views(&tiers.top),
        mid_rows: in_groups_of(&tiers.mid, MID_ROW)
            .iter()
            .map(|row| article_views(row))
            .collect(),
        low: article_views(&tiers.low),
        stream: stream_items(&stream),
        top_comment: top_comment(&window).map(CommentView::from),
        comment_groups: group_by_subject(grouped_window)
            .iter()
            .map(|group| CommentGroupView::from_group(group))
            .collect(),
        events: events
            .iter()
            .take(HOMEPAGE_EVENTS)
            .map(|a| AnnouncementView::new(a, today))
            .collect(),
        announcements: others
            .iter()
            .take(HOMEPAGE_ANNOUNCEMENTS)
            .map(|a| AnnouncementView::new(a, today))
            .collect(),
        jobs: jobs.iter().map(JobView::from).collect(),
    };
    page("index", template)
}

#[instrument(skip(state))]
pub async fn section_page(
    State(state): State<AppState>,
    Path(section_slug): Path<String>,
) -> Result<Response> {
    let storage = &state.storage;
    let section = storage
        .get_section(&section_slug)
        .await?
        .ok_or_else(|| SiteError::not_found(format!("section '{section_slug}'")))?;

    let articles = storage
        .published_articles(
            &ArticleQuery::default()
                .section(&section.slug)
                .limit(TierSizes::SECTION.total()),
        )
        .await?;
    let tiers = split_tiers(articles, TierSizes::SECTION);

    let entries = storage.recent_entries(FeedLimits::SECTION_ENTRIES).await?;
    let comments = storage
        .recent_comments(&CommentQuery::recent(FeedLimits::SECTION_COMMENTS).section(&section.slug))
        .await?;
    let stream = merge_feed(&entries, &comments, FeedLimits::SECTION);

    let template = SectionTemplate {
        site: state.chrome().await?,
        subsections: storage.list_subsections(&section.slug).await?,
        section,
        subsection: None,
        top: article_views(&tiers.top),
        mid: article_views(&tiers.mid),
        columns: distribute_columns(&tiers.low, LOW_COLUMNS)
            .iter()
            .map(|column| article_views(column))
            .collect(),
        stream: stream_items(&stream),
    };
    page("section", template)
}

#[instrument(skip(state))]
pub async fn subsection_page(
    State(state): State<AppState>,
    Path((section_slug, subsection_slug)): Path<(String, String)>,
) -> Result<Response> {
    let storage = &state.storage;
    let section = storage
        .get_section(&section_slug)
        .await?
        .ok_or_else(|| SiteError::not_found(format!("section '{section_slug}'")))?;
    let subsection = storage
        .get_subsection(&section.slug, &subsection_slug)
        .await?
        .ok_or_else(|| {
            SiteError::not_found(format!("subsection '{section_slug}/{subsection_slug}'"))
        })?;

    let query = ArticleQuery::default()
        .section(&section.slug)
        .subsection(&subsection.slug);

    if subsection.slug == PLATFORMS_SUBSECTION {
        let articles = storage.published_articles(&query).await?;
        let platforms = current_platforms(&articles)
            .iter()
            .map(|(platform, article)| PlatformView::new(platform, article))
            .collect();
        let template = PlatformsTemplate {
            site: state.chrome().await?,
            section,
            subsection,
            platforms,
        };
        return page("platforms", template);
    }

    let articles = storage
        .published_articles(&query.limit(TierSizes::SUBSECTION.total()))
        .await?;
    let tiers = split_tiers(articles, TierSizes::SUBSECTION);

    let comments = storage
        .recent_comments(
            &CommentQuery::recent(FeedLimits::SUBSECTION)
                .section(&section.slug)
                .subsection(&subsection.slug),
        )
        .await?;
    let stream = merge_feed(&[], &comments, FeedLimits::SUBSECTION);

    let template = SectionTemplate {
        site: state.chrome().await?,
        subsections: storage.list_subsections(&section.slug).await?,
        section,
        subsection: Some(subsection),
        top: article_views(&tiers.top),
        mid: article_views(&tiers.mid),
        columns: distribute_columns(&tiers.low, LOW_COLUMNS)
            .iter()
            .map(|column| article_views(column))
            .collect(),
        stream: stream_items(&stream),
    };
    page("subsection", template)
}

/// Plain-text `slug | name` lines for the staff tools' subsection picker.
pub async fn subsections_api(
    State(state): State<AppState>,
    Path(section_slug): Path<String>,
) -> Result<String> {
    let section = state
        .storage
        .get_section(&section_slug)
        .await?
        .ok_or_else(|| SiteError::not_found(format!("section '{section_slug}'")))?;
    let subsections = state.storage.list_subsections(&section.slug).await?;
    Ok(subsections
        .iter()
        .map(|s| format!("{} | {}\n", s.slug, s.name))
        .collect())
}

pub async fn archives_root(State(state): State<AppState>) -> Result<Response> {
    render_archive(&state, ArchiveScope::default()).await
}

pub async fn archives(
    State(state): State<AppState>,
    Path(params): Path<Vec<(String, String)>>,
) -> Result<Response> {
    let scope = ArchiveScope::from_segments(params.iter().map(|(_, value)| value.as_str()))?;
    render_archive(&state, scope).await
}

fn widen(scope: &ArchiveScope) -> Result<Response> {
    match fallback(scope) {
        CalendarOutcome::Redirect(wider) => {
            SiteMetrics::record_archive_redirect();
            info!("Archive {} is empty, widening to {}", scope.path(), wider.path());
            Ok(Redirect::to(&wider.path()).into_response())
        }
        _ => Err(SiteError::not_found(format!("archive {}", scope.path()))),
    }
}

#[instrument(skip(state), fields(path = %scope.path()))]
async fn render_archive(state: &AppState, scope: ArchiveScope) -> Result<Response> {
    let names = scope_names(state, &scope).await?;
    let heading = archive_heading(&scope, &names);
    let query = ArticleQuery::from_scope(&scope);

    match scope.granularity() {
        Granularity::Calendar => {
            let dates = state.storage.publish_dates(&query).await?;
            debug!("Archive scope has {} publish dates", dates.len());
            match resolve_calendar(&scope, &dates) {
                CalendarOutcome::Calendar(grids) => {
                    let base = scope.base_path();
                    let template = ArchiveCalendarTemplate {
                        site: state.chrome().await?,
                        heading,
                        months: grids.iter().map(|g| MonthView::new(g, &base)).collect(),
                    };
                    page("archive_calendar", template)
                }
                _ => widen(&scope),
            }
        }
        Granularity::Month | Granularity::Day => {
            let articles = state.storage.published_articles(&query).await?;
            if articles.is_empty() {
                return widen(&scope);
            }
            let up = scope.broader().unwrap_or_default().path();
            let template = ArchiveListTemplate {
                site: state.chrome().await?,
                heading,
                up,
                days: day_groups(&articles),
            };
            page("archive_list", template)
        }
    }
}

/// Names of the section and subsection a scope filters on. An unknown
/// slug is a 404 rather than an empty scope to widen.
async fn scope_names(state: &AppState, scope: &ArchiveScope) -> Result<Vec<String>> {
    let mut names = Vec::new();
    if let Some(slug) = &scope.section {
        let section = state
            .storage
            .get_section(slug)
            .await?
            .ok_or_else(|| SiteError::not_found(format!("section '{slug}'")))?;
        names.push(section.name);
        if let Some(sub) = &scope.subsection {
            let subsection = state
                .storage
                .get_subsection(slug, sub)
                .await?
                .ok_or_else(|| SiteError::not_found(format!("subsection '{slug}/{sub}'")))?;
            names.push(subsection.name);
        }
    }
    Ok(names)
}

/// "News: March 2009" style heading.
fn archive_heading(scope: &ArchiveScope, names: &[String]) -> String {
    let label = scope.date_label();
    if names.is_empty() {
        label
    } else {
        format!("{}: {}", names.join(" / "), label)
    }
}

#[instrument(skip(state))]
pub async fn article_page(
    State(state): State<AppState>,
    Path((year, month, day, slug)): Path<(String, String, String, String)>,
) -> Result<Response> {
    let date = format!("{year}-{month}-{day}");
    let date = NaiveDate::parse_from_str(&date, "%Y-%m-%d")
        .map_err(|_| SiteError::not_found(format!("article dated {date}")))?;
    let article: Article = state
        .storage
        .get_published_article(date, &slug)
        .await?
        .ok_or_else(|| SiteError::not_found(format!("article '{slug}'")))?;

    let comments = state.storage.comments_for_article(article.id).await?;

    let related = state
        .storage
        .published_articles(
            &ArticleQuery::default()
                .section(&article.section)
                .limit(TierSizes::SIDEBAR.total() + 1),
        )
        .await?;
    let more: Vec<Article> = related
        .into_iter()
        .filter(|a| a.id != article.id)
        .take(TierSizes::SIDEBAR.total())
        .collect();

    let template = ArticleTemplate {
        site: state.chrome().await?,
        full_byline: join_authors(&article.authors, ARTICLE_BYLINE),
        body: article.body.clone(),
        article: ArticleView::from(&article),
        comments: comments.iter().map(CommentView::from).collect(),
        more: article_views(&more),
    };
    page("article", template)
}

#[derive(Debug, Deserialize)]
pub struct LimitParams {
    pub limit: Option<String>,
}

pub async fn jobs(
    State(state): State<AppState>,
    Query(params): Query<LimitParams>,
) -> Result<Response> {
    render_jobs(&state, JobFilter::default(), String::new(), params).await
}

pub async fn jobs_filtered(
    State(state): State<AppState>,
    Path(options): Path<Vec<(String, String)>>,
    Query(params): Query<LimitParams>,
) -> Result<Response> {
    let options: Vec<&str> = options.iter().map(|(_, value)| value.as_str()).collect();
    let filter = JobFilter::from_option_list(options.iter().copied());
    render_jobs(&state, filter, options.join(" / "), params).await
}

#[instrument(skip(state, params))]
async fn render_jobs(
    state: &AppState,
    filter: JobFilter,
    label: String,
    params: LimitParams,
) -> Result<Response> {
    let limit = parse_limit(params.limit.as_deref(), DEFAULT_JOB_LIMIT);
    let jobs = state.storage.job_listings(&filter, limit).await?;
    debug!("Job filter {:?} matched {} listings", filter, jobs.len());

    let template = JobsTemplate {
        site: state.chrome().await?,
        filter: label,
        jobs: jobs.iter().map(JobView::from).collect(),
    };
    page("jobs", template)
}

#[instrument(skip(state))]
pub async fn job_page(State(state): State<AppState>, Path(slug): Path<String>) -> Result<Response> {
    let job = state
        .storage
        .get_job(&slug)
        .await?
        .ok_or_else(|| SiteError::not_found(format!("job '{slug}'")))?;

    let others = state
        .storage
        .job_listings(&unfilled(), OTHER_JOBS + 1)
        .await?
        .into_iter()
        .filter(|other| other.id != job.id)
        .take(OTHER_JOBS)
        .collect::<Vec<_>>();

    let template = JobTemplate {
        site: state.chrome().await?,
        job: JobView::from(&job),
        others: others.iter().map(JobView::from).collect(),
    };
    page("job", template)
}

pub async fn announcement_form(State(state): State<AppState>) -> Result<Response> {
    let template = AnnouncementFormTemplate {
        site: state.chrome().await?,
        form: AnnouncementForm::blank(default_run(state.today())),
        error: None,
        submitted: false,
    };
    page("announcement_form", template)
}

#[instrument(skip(state, submission), fields(title = %submission.title))]
pub async fn submit_announcement(
    State(state): State<AppState>,
    Form(submission): Form<AnnouncementSubmission>,
) -> Result<Response> {
    let form = AnnouncementForm::from_submission(&submission);

    match submission.validate(state.today()) {
        Ok(announcement) => {
            state.storage.create_announcement(&announcement).await?;
            info!("Announcement {} submitted for approval", announcement.id);
            let template = AnnouncementFormTemplate {
                site: state.chrome().await?,
                form: AnnouncementForm::blank(default_run(state.today())),
                error: None,
                submitted: true,
            };
            page("announcement_submitted", template)
        }
        Err(e) => {
            SiteMetrics::record_announcement_rejected();
            info!("Announcement rejected: {}", e);
            let template = AnnouncementFormTemplate {
                site: state.chrome().await?,
                form,
                error: Some(e.to_string()),
                submitted: false,
            };
            let body = template.render()?;
            Ok((StatusCode::UNPROCESSABLE_ENTITY, Html(body)).into_response())
        }
    }
}

#[instrument(skip(state))]
pub async fn media_page(
    State(state): State<AppState>,
    Path((bucket_slug, slug)): Path<(String, String)>,
) -> Result<Response> {
    let bucket = state
        .storage
        .get_bucket(&bucket_slug)
        .await?
        .ok_or_else(|| SiteError::not_found(format!("media bucket '{bucket_slug}'")))?;
    let file = state
        .storage
        .get_media(&bucket.slug, &slug)
        .await?
        .ok_or_else(|| SiteError::not_found(format!("media '{bucket_slug}/{slug}'")))?;

    let template = MediaTemplate {
        site: state.chrome().await?,
        bucket,
        file: MediaView::from(&file),
    };
    page("media", template)
}

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    pub s: String,
}

/// Site search is handed to an external engine restricted to our domain.
pub async fn search(State(state): State<AppState>, Query(params): Query<SearchParams>) -> Redirect {
    let query = format!("site:{} {}", state.config.search_domain, params.s.trim());
    let encoded: String = form_urlencoded::byte_serialize(query.as_bytes()).collect();
    Redirect::to(&format!("{SEARCH_ENGINE}?q={encoded}"))
}

pub async fn not_found() -> SiteError {
    SiteError::not_found("page")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_archive_heading_uses_resolved_names() {
        let scope = ArchiveScope::from_segments("news/features/2009/03".split('/')).unwrap();
        let names = vec!["News".to_string(), "Features".to_string()];
        assert_eq!(archive_heading(&scope, &names), "News / Features: March 2009");
        assert_eq!(archive_heading(&ArchiveScope::default(), &[]), "All issues");
    }
}
