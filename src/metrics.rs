//! Site metrics, rendered in Prometheus text format at `/metrics`.
//!
//! Metric names follow `gazette_{phase}_{name}[_total]` via [`phase_metric!`].

use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use std::sync::OnceLock;
use tracing::{info, warn};

static HANDLE: OnceLock<Option<PrometheusHandle>> = OnceLock::new();

/// Install the Prometheus recorder and register the site metrics.
///
/// Idempotent. Returns `None` if another recorder was already installed.
pub fn init_metrics() -> Option<PrometheusHandle> {
    HANDLE
        .get_or_init(|| match PrometheusBuilder::new().install_recorder() {
            Ok(handle) => {
                SiteMetrics::register_metrics();
                info!(
                    "Prometheus recorder installed; {} site metrics registered",
                    SiteMetrics::metrics_documentation().len()
                );
                Some(handle)
            }
            Err(e) => {
                warn!("Failed to install Prometheus recorder: {}", e);
                None
            }
        })
        .clone()
}

/// A group of metrics owned by one part of the site.
pub trait PhaseMetrics {
    /// Describe every metric so it shows up before its first increment.
    fn register_metrics();

    fn phase_name() -> &'static str;

    fn metrics_documentation() -> Vec<MetricDoc>;
}

#[derive(Debug, Clone)]
pub struct MetricDoc {
    pub name: &'static str,
    pub metric_type: MetricType,
    pub help: &'static str,
    pub labels: Vec<&'static str>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MetricType {
    Counter,
}

macro_rules! phase_metric {
    (counter, $phase:literal, $name:literal) => {
        concat!("gazette_", $phase, "_", $name, "_total")
    };
}

/// Request-level counters for the public pages.
pub struct SiteMetrics;

impl SiteMetrics {
    /// Count a rendered page, labelled by which page it was.
    pub fn record_page_view(page: &'static str) {
        ::metrics::counter!(phase_metric!(counter, "site", "page_views"), "page" => page).increment(1);
    }

    pub fn record_archive_redirect() {
        ::metrics::counter!(phase_metric!(counter, "site", "archive_redirects")).increment(1);
    }

    pub fn record_not_found() {
        ::metrics::counter!(phase_metric!(counter, "site", "not_found")).increment(1);
    }

    pub fn record_announcement_rejected() {
        ::metrics::counter!(phase_metric!(counter, "site", "announcements_rejected")).increment(1);
    }
}

impl PhaseMetrics for SiteMetrics {
    fn register_metrics() {
        for doc in Self::metrics_documentation() {
            ::metrics::describe_counter!(doc.name, doc.help);
        }
    }

    fn phase_name() -> &'static str {
        "site"
    }

    fn metrics_documentation() -> Vec<MetricDoc> {
        vec![
            MetricDoc {
                name: phase_metric!(counter, "site", "page_views"),
                metric_type: MetricType::Counter,
                help: "Pages rendered, by page",
                labels: vec!["page"],
            },
            MetricDoc {
                name: phase_metric!(counter, "site", "archive_redirects"),
                metric_type: MetricType::Counter,
                help: "Archive requests widened to a broader scope",
                labels: vec![],
            },
            MetricDoc {
                name: phase_metric!(counter, "site", "not_found"),
                metric_type: MetricType::Counter,
                help: "Requests answered with 404",
                labels: vec![],
            },
            MetricDoc {
                name: phase_metric!(counter, "site", "announcements_rejected"),
                metric_type: MetricType::Counter,
                help: "Announcement submissions that failed validation",
                labels: vec![],
            },
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metric_names_follow_convention() {
        for doc in SiteMetrics::metrics_documentation() {
            assert!(doc.name.starts_with("gazette_site_"), "{}", doc.name);
            assert!(doc.name.ends_with("_total"));
            assert_eq!(doc.metric_type, MetricType::Counter);
        }
        assert_eq!(SiteMetrics::phase_name(), "site");
        assert_eq!(
            SiteMetrics::metrics_documentation()[0].labels,
            vec!["page"]
        );
    }

    #[test]
    fn test_init_is_idempotent() {
        let first = init_metrics();
        let second = init_metrics();
        assert_eq!(first.is_some(), second.is_some());
        if let Some(handle) = second {
            SiteMetrics::record_not_found();
            assert!(handle.render().contains("gazette_site_not_found_total"));
        }
    }
}
