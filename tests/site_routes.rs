use axum::body::{to_bytes, Body};
use axum::http::{header, Request, StatusCode};
use axum::response::Response;
use axum::Router;
use chrono::NaiveDate;
use gazette::{app_router, AppState, SiteConfig};
use gazette_core::storage::{Fixture, InMemoryStorage, Storage};
use std::sync::Arc;
use tower::ServiceExt;

const FIXTURE: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/data/fixture.json");

fn config() -> SiteConfig {
    SiteConfig {
        frozen_date: NaiveDate::from_ymd_opt(2009, 3, 5),
        ..SiteConfig::default()
    }
}

fn fixture_storage() -> Arc<InMemoryStorage> {
    let fixture = Fixture::load(FIXTURE).expect("bundled fixture loads");
    Arc::new(InMemoryStorage::from_fixture(fixture))
}

fn app_with(storage: Arc<InMemoryStorage>) -> Router {
    let storage: Arc<dyn Storage> = storage;
    app_router(AppState::new(storage, config()))
}

fn app() -> Router {
    app_with(fixture_storage())
}

async fn get(app: Router, uri: &str) -> Response {
    app.oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap()
}

async fn body_text(response: Response) -> String {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

async fn get_page(uri: &str) -> (StatusCode, String) {
    let response = get(app(), uri).await;
    let status = response.status();
    (status, body_text(response).await)
}

fn location(response: &Response) -> String {
    response
        .headers()
        .get(header::LOCATION)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string()
}

#[tokio::test]
async fn test_homepage_assembles_front_stream_and_sidebars() {
    let (status, body) = get_page("/").await;
    assert_eq!(status, StatusCode::OK);

    assert!(body.contains("Council passes spring budget"));
    assert!(!body.contains("Draft: dining hall hours"));

    // stream: published entries and visible comments only
    assert!(body.contains("Snow on Magill Walk"));
    assert!(!body.contains("Unreviewed post"));
    assert!(!body.contains("cheap watches"));

    // three positive votes beats two
    let top = body.find("Top Comment").expect("top comment box");
    assert!(body[top..].contains("Two hours for this?"));

    assert!(body.contains("Chamber choir concert"));
    assert!(body.contains("Tuesday, 7:30 PM, Lang Concert Hall"));
    assert!(body.contains("Found: blue lanyard"));
    assert!(!body.contains("Waiting for an editor"));
    assert!(!body.contains("bake sale"));

    assert!(body.contains("Library assistant"));
    assert!(!body.contains("Lifeguard"));
}

#[tokio::test]
async fn test_section_page_and_unknown_section() {
    let (status, body) = get_page("/section/news").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("Council passes spring budget"));
    assert!(body.contains("Inside the Parrish renovation"));
    assert!(body.contains("/section/news/features"));
    assert!(!body.contains("Garnet clinch"));

    let (status, _) = get_page("/section/obituaries").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_subsection_page() {
    let (status, body) = get_page("/section/news/features").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("Inside the Parrish renovation"));
    assert!(!body.contains("Council passes spring budget"));

    let (status, _) = get_page("/section/sports/features").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_platforms_page_orders_by_position_then_surname() {
    let (status, body) = get_page("/section/news/stuco-platforms").await;
    assert_eq!(status, StatusCode::OK);

    let ana = body.find("Ana Baker").expect("Ana Baker listed");
    let sam = body.find("Sam Young").expect("Sam Young listed");
    let li = body.find("Li Chen").expect("Li Chen listed");
    assert!(ana < sam && sam < li);
    assert!(!body.contains("Old Candidate"));
}

#[tokio::test]
async fn test_subsections_api() {
    let (status, body) = get_page("/api/subsections/news").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "features | Features\nstuco-platforms | StuCo Platforms\n");

    let (status, _) = get_page("/api/subsections/no-such-section").await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = get_page("/api/subsections/opinions").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.is_empty());
}

#[tokio::test]
async fn test_archive_calendar_spans_published_months() {
    let (status, body) = get_page("/archives").await;
    assert_eq!(status, StatusCode::OK);

    // the stuco fixture reaches back to March 2008
    let newest = body.find("March 2009").expect("newest month");
    let oldest = body.find("March 2008").expect("oldest month");
    assert!(newest < oldest);
    assert!(body.contains("December 2008"));
    assert!(!body.contains("April 2009"));
    assert!(body.contains("href=\"/archives/2009/03/04\""));
    // the draft's day is not linked
    assert!(!body.contains("href=\"/archives/2009/03/05\""));
}

#[tokio::test]
async fn test_archive_explicit_year_shows_whole_year() {
    let (status, body) = get_page("/archives/living/2009").await;
    assert_eq!(status, StatusCode::OK);
    let december = body.find("December 2009").expect("December first");
    let january = body.find("January 2009").expect("January last");
    assert!(december < january);
    assert_eq!(body.matches("<table class=\"month\">").count(), 12);
    assert!(body.contains("href=\"/archives/living/2009/03/03\""));
}

#[tokio::test]
async fn test_archive_day_listing() {
    let (status, body) = get_page("/archives/2009/03/04").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("4 Wednesday"));
    assert!(body.contains("Council passes spring budget"));
    assert!(body.contains("href=\"/archives/2009/03\""));
}

#[tokio::test]
async fn test_empty_archive_scope_widens_step_by_step() {
    let mut uri = "/archives/sports/basketball/2009/03/04".to_string();
    let mut visited = vec![uri.clone()];
    loop {
        let response = get(app(), &uri).await;
        if response.status() == StatusCode::OK {
            break;
        }
        assert!(response.status().is_redirection(), "{} gave {}", uri, response.status());
        uri = location(&response);
        visited.push(uri.clone());
    }
    assert_eq!(
        visited,
        vec![
            "/archives/sports/basketball/2009/03/04",
            "/archives/sports/basketball/2009/03",
            "/archives/sports/basketball/2009",
        ]
    );
}

#[tokio::test]
async fn test_empty_archive_ends_in_not_found() {
    let fixture = Fixture::from_json(r#"{"sections": [{"name": "News", "slug": "news"}]}"#).unwrap();
    let app = app_with(Arc::new(InMemoryStorage::from_fixture(fixture)));

    let response = get(app.clone(), "/archives/news/2009").await;
    assert_eq!(location(&response), "/archives/news");
    let response = get(app.clone(), "/archives/news").await;
    assert_eq!(location(&response), "/archives");
    let response = get(app, "/archives").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_archive_with_unknown_section_is_not_found() {
    for uri in [
        "/archives/no-such-section",
        "/archives/no-such-section/2009",
        "/archives/news/no-such-sub/2009",
        "/archives/sports/features",
    ] {
        let response = get(app(), uri).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND, "{uri}");
        assert!(response.headers().get(header::LOCATION).is_none(), "{uri}");
    }
}

#[tokio::test]
async fn test_archive_heading_names_the_section() {
    let (status, body) = get_page("/archives/news/features/2009/03").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("Archives: News / Features: March 2009"));
}

#[tokio::test]
async fn test_bad_archive_paths_are_not_found() {
    for uri in ["/archives/2009/news", "/archives/2009/02/30", "/archives/a/b/c"] {
        let (status, _) = get_page(uri).await;
        assert_eq!(status, StatusCode::NOT_FOUND, "{uri}");
    }
}

#[tokio::test]
async fn test_article_page() {
    let (status, body) = get_page("/2009/03/04/budget-vote").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("Joe Schmoe, Staff Reporter"));
    assert!(body.contains("after a two-hour debate"));
    let first = body.find("Glad the radio station got funded.").unwrap();
    let second = body.find("Two hours for this?").unwrap();
    assert!(first < second);
    assert!(!body.contains("cheap watches"));

    for uri in [
        "/2009/03/05/budget-vote",
        "/2009/13/01/budget-vote",
        "/2009/03/05/unfinished-story",
    ] {
        let (status, _) = get_page(uri).await;
        assert_eq!(status, StatusCode::NOT_FOUND, "{uri}");
    }
}

#[tokio::test]
async fn test_jobs_limit_falls_back_to_default() {
    let (status, body) = get_page("/jobs?limit=abc").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("Library assistant"));
    assert!(body.contains("Middle school tutor"));
    assert!(body.contains("Lifeguard"));
    assert!(!body.contains("Withdrawn posting"));

    let (_, body) = get_page("/jobs?limit=1").await;
    assert!(body.contains("Library assistant"));
    assert!(!body.contains("Middle school tutor"));
}

#[tokio::test]
async fn test_job_filters() {
    let (_, body) = get_page("/jobs/filter/off-campus").await;
    assert!(body.contains("Middle school tutor"));
    assert!(!body.contains(">Library assistant<"));

    let (_, body) = get_page("/jobs/filter/Paid/not-filled/bogus").await;
    assert!(body.contains(">Library assistant<"));
    assert!(!body.contains(">Lifeguard<"));
    assert!(!body.contains(">Middle school tutor<"));
}

#[tokio::test]
async fn test_job_detail_obfuscates_contact() {
    let (status, body) = get_page("/jobs/view/library-assistant").await;
    assert_eq!(status, StatusCode::OK);
    assert!(!body.contains("preyes@example.edu"));
    assert!(body.contains("&#112;&#114;&#101;"));
    assert!(body.contains("Middle school tutor"));

    let (status, _) = get_page("/jobs/view/withdrawn").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_announcement_form_prefills_a_week() {
    let (status, body) = get_page("/announcements/submit").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("value=\"2009-03-05\""));
    assert!(body.contains("value=\"2009-03-12\""));
}

fn post_form(uri: &str, form: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(form.to_string()))
        .unwrap()
}

#[tokio::test]
async fn test_announcement_validation_rejects_undated_event() {
    let storage = fixture_storage();
    let before = storage.all_announcements().await.len();

    let response = app_with(storage.clone())
        .oneshot(post_form(
            "/announcements/submit",
            "title=Movie+night&text=Popcorn&is_event=on&event_date=",
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = body_text(response).await;
    assert!(body.contains("You need to give a date if this is a specific event."));
    assert!(body.contains("value=\"Movie night\""));
    assert_eq!(storage.all_announcements().await.len(), before);
}

#[tokio::test]
async fn test_announcement_submission_waits_for_approval() {
    let storage = fixture_storage();

    let response = app_with(storage.clone())
        .oneshot(post_form(
            "/announcements/submit",
            "title=Movie+night&text=Popcorn&date_start=2009-03-05&date_end=2009-03-06&sponsor=&sponsor_url=",
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_text(response).await.contains("Thanks!"));

    let saved = storage.all_announcements().await;
    let movie = saved.iter().find(|a| a.title == "Movie night").expect("saved");
    assert!(!movie.approved);
    assert!(movie.sponsor.is_none());

    let (_, homepage) = {
        let response = get(app_with(storage), "/").await;
        (response.status(), body_text(response).await)
    };
    assert!(!homepage.contains("Movie night"));
}

#[tokio::test]
async fn test_media_page_credits_contributors() {
    let (status, body) = get_page("/media/campus-buildings/parrish-hall-at-dusk").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("Credit: Ana Baker, Sam Young"));
    assert!(body.contains("parrish.jpg?variant=topwidefront"));
    assert!(body.contains("Created by the Gazette"));

    let (status, _) = get_page("/media/campus-buildings/missing").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_search_redirects_to_site_search() {
    let response = get(app(), "/search?s=budget+vote").await;
    assert!(response.status().is_redirection());
    assert_eq!(
        location(&response),
        "https://www.google.com/search?q=site%3Agazette.example.edu+budget+vote"
    );

    let response = get(app(), "/search?s=caf%C3%A9+%26+tea%2Fcoffee").await;
    assert_eq!(
        location(&response),
        "https://www.google.com/search?q=site%3Agazette.example.edu+caf%C3%A9+%26+tea%2Fcoffee"
    );
}

#[tokio::test]
async fn test_health_unknown_route_and_metrics_without_recorder() {
    let (status, body) = get_page("/health").await;
    assert_eq!(status, StatusCode::OK);
    let json: serde_json::Value = serde_json::from_str(&body).unwrap();
    assert_eq!(json["status"], "healthy");

    let (status, _) = get_page("/no/such/page/here/at/all").await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = get_page("/metrics").await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
}
