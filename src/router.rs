use axum::{
    routing::get,
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::handlers::{
    announcement_form, archives, archives_root, article_page, health, index, job_page, jobs,
    jobs_filtered, media_page, metrics, not_found, search, section_page, subsection_page,
    submit_announcement, subsections_api,
};
use crate::state::AppState;

pub fn app_router(state: AppState) -> Router {
    let cors = CorsLayer::new().allow_origin(Any).allow_methods(Any);
    let static_dir = state.config.static_dir.clone();

    Router::new()
        .route("/", get(index))
        .route("/section/:section", get(section_page))
        .route("/section/:section/:subsection", get(subsection_page))
        .route("/api/subsections/:section", get(subsections_api))
        // Archive filters: [section[/subsection]][/year[/month[/day]]]
        .route("/archives", get(archives_root))
        .route("/archives/:a", get(archives))
        .route("/archives/:a/:b", get(archives))
        .route("/archives/:a/:b/:c", get(archives))
        .route("/archives/:a/:b/:c/:d", get(archives))
        .route("/archives/:a/:b/:c/:d/:e", get(archives))
        .route("/:year/:month/:day/:slug", get(article_page))
        .route("/jobs", get(jobs))
        .route("/jobs/filter/:a", get(jobs_filtered))
        .route("/jobs/filter/:a/:b", get(jobs_filtered))
        .route("/jobs/filter/:a/:b/:c", get(jobs_filtered))
        .route("/jobs/filter/:a/:b/:c/:d", get(jobs_filtered))
        .route("/jobs/view/:slug", get(job_page))
        .route(
            "/announcements/submit",
            get(announcement_form).post(submit_announcement),
        )
        .route("/media/:bucket/:slug", get(media_page))
        .route("/search", get(search))
        .route("/health", get(health))
        .route("/metrics", get(metrics))
        .nest_service("/static", ServeDir::new(static_dir))
        .fallback(not_found)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
