use chrono::{Local, NaiveDate};
use gazette_core::storage::Storage;
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::Arc;

use crate::config::SiteConfig;
use crate::error::Result;
use crate::templates::SiteChrome;

#[derive(Clone)]
pub struct AppState {
    pub storage: Arc<dyn Storage>,
    pub config: Arc<SiteConfig>,
    pub metrics: Option<PrometheusHandle>,
}

impl AppState {
    pub fn new(storage: Arc<dyn Storage>, config: SiteConfig) -> Self {
        Self {
            storage,
            config: Arc::new(config),
            metrics: None,
        }
    }

    pub fn with_metrics(mut self, handle: Option<PrometheusHandle>) -> Self {
        self.metrics = handle;
        self
    }

    pub fn today(&self) -> NaiveDate {
        self.config
            .frozen_date
            .unwrap_or_else(|| Local::now().date_naive())
    }

    /// Site name and section navigation shared by every page.
    pub async fn chrome(&self) -> Result<SiteChrome> {
        Ok(SiteChrome {
            site_name: self.config.site_name.clone(),
            sections: self.storage.list_sections().await?,
        })
    }
}
