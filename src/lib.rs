pub mod config;
pub mod error;
pub mod handlers;
pub mod logging;
pub mod metrics;
pub mod router;
pub mod state;
pub mod templates;

pub use config::SiteConfig;
pub use error::{Result, SiteError};
pub use router::app_router;
pub use state::AppState;
