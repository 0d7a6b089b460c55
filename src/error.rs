use askama::Template;
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use gazette_core::announcements::ValidationError;
use gazette_core::archive::ArchiveError;
use gazette_core::GazetteError;
use thiserror::Error;
use tracing::{error, warn};

use crate::metrics::SiteMetrics;
use crate::templates::ErrorTemplate;

#[derive(Error, Debug)]
pub enum SiteError {
    #[error("{0} not found")]
    NotFound(String),

    #[error(transparent)]
    Archive(#[from] ArchiveError),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Data(#[from] GazetteError),

    #[error("Template rendering failed: {0}")]
    Render(#[from] askama::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("TOML deserialization failed: {0}")]
    Toml(#[from] toml::de::Error),
}

pub type Result<T> = std::result::Result<T, SiteError>;

impl SiteError {
    pub fn not_found(what: impl Into<String>) -> Self {
        Self::NotFound(what.into())
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::NotFound(_) | Self::Archive(_) => StatusCode::NOT_FOUND,
            Self::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for SiteError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match status {
            StatusCode::NOT_FOUND => {
                SiteMetrics::record_not_found();
                warn!("Not found: {}", self);
                "We couldn't find that page.".to_string()
            }
            StatusCode::UNPROCESSABLE_ENTITY => self.to_string(),
            _ => {
                error!("Request failed: {}", self);
                "Something went wrong on our end.".to_string()
            }
        };

        let page = ErrorTemplate {
            status: status.as_u16(),
            message,
        };
        match page.render() {
            Ok(body) => (status, Html(body)).into_response(),
            Err(_) => status.into_response(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(SiteError::not_found("article").status(), StatusCode::NOT_FOUND);
        assert_eq!(
            SiteError::from(ArchiveError::BadPath("a/b/c".into())).status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            SiteError::from(ValidationError::EventWithoutDate).status(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            SiteError::from(GazetteError::Fixture { message: "bad".into() }).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
