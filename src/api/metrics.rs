use crate::services::ReconciliationReport;
use actix_web::HttpResponse;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};

static REQUEST_COUNT: AtomicU64 = AtomicU64::new(0);
static ERROR_COUNT: AtomicU64 = AtomicU64::new(0);
static RECONCILIATION_COUNT: AtomicU64 = AtomicU64::new(0);
static REGISTRATION_COUNT: AtomicU64 = AtomicU64::new(0);
static REFRESH_COUNT: AtomicU64 = AtomicU64::new(0);
static BACKEND_FAILURE_COUNT: AtomicU64 = AtomicU64::new(0);
static CLIPBOARD_WRITE_COUNT: AtomicU64 = AtomicU64::new(0);
static CLIPBOARD_FAILURE_COUNT: AtomicU64 = AtomicU64::new(0);

pub fn increment_request_count() {
    REQUEST_COUNT.fetch_add(1, Ordering::Relaxed);
}

pub fn increment_error_count() {
    ERROR_COUNT.fetch_add(1, Ordering::Relaxed);
}

pub fn record_reconciliation(report: &ReconciliationReport) {
    RECONCILIATION_COUNT.fetch_add(1, Ordering::Relaxed);
    if report.registered() {
        REGISTRATION_COUNT.fetch_add(1, Ordering::Relaxed);
    }
    BACKEND_FAILURE_COUNT.fetch_add(report.errors().len() as u64, Ordering::Relaxed);
}

pub fn record_refresh(failed: bool) {
    REFRESH_COUNT.fetch_add(1, Ordering::Relaxed);
    if failed {
        BACKEND_FAILURE_COUNT.fetch_add(1, Ordering::Relaxed);
    }
}

pub fn record_clipboard_write(ok: bool) {
    if ok {
        CLIPBOARD_WRITE_COUNT.fetch_add(1, Ordering::Relaxed);
    } else {
        CLIPBOARD_FAILURE_COUNT.fetch_add(1, Ordering::Relaxed);
    }
}

#[derive(Serialize, Deserialize, utoipa::ToSchema)]
pub struct MetricsResponse {
    pub http_requests_total: u64,
    pub http_errors_total: u64,
    pub widget_reconciliations_total: u64,
    pub widget_registrations_total: u64,
    pub widget_refreshes_total: u64,
    pub referral_backend_failures_total: u64,
    pub clipboard_writes_total: u64,
    pub clipboard_failures_total: u64,
}

impl MetricsResponse {
    pub fn snapshot() -> Self {
        Self {
            http_requests_total: REQUEST_COUNT.load(Ordering::Relaxed),
            http_errors_total: ERROR_COUNT.load(Ordering::Relaxed),
            widget_reconciliations_total: RECONCILIATION_COUNT.load(Ordering::Relaxed),
            widget_registrations_total: REGISTRATION_COUNT.load(Ordering::Relaxed),
            widget_refreshes_total: REFRESH_COUNT.load(Ordering::Relaxed),
            referral_backend_failures_total: BACKEND_FAILURE_COUNT.load(Ordering::Relaxed),
            clipboard_writes_total: CLIPBOARD_WRITE_COUNT.load(Ordering::Relaxed),
            clipboard_failures_total: CLIPBOARD_FAILURE_COUNT.load(Ordering::Relaxed),
        }
    }

    fn counters(&self) -> [(&'static str, &'static str, u64); 8] {
        [
            ("http_requests_total", "Total number of HTTP requests", self.http_requests_total),
            ("http_errors_total", "Total number of HTTP errors", self.http_errors_total),
            (
                "widget_reconciliations_total",
                "Registration/referral reconciliations run",
                self.widget_reconciliations_total,
            ),
            (
                "widget_registrations_total",
                "Users registered with the referral backend",
                self.widget_registrations_total,
            ),
            (
                "widget_refreshes_total",
                "Referral code refreshes requested",
                self.widget_refreshes_total,
            ),
            (
                "referral_backend_failures_total",
                "Failed calls against the referral backend",
                self.referral_backend_failures_total,
            ),
            (
                "clipboard_writes_total",
                "Referral links copied to the clipboard",
                self.clipboard_writes_total,
            ),
            (
                "clipboard_failures_total",
                "Failed clipboard writes",
                self.clipboard_failures_total,
            ),
        ]
    }

    /// Prometheus text exposition
    pub fn render(&self) -> String {
        self.counters()
            .iter()
            .map(|(name, help, value)| {
                format!(
                    "# HELP {name} {help}\n# TYPE {name} counter\n{name} {value}\n",
                    name = name,
                    help = help,
                    value = value
                )
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[utoipa::path(
    get,
    path = "/metrics",
    tag = "Health",
    responses(
        (status = 200, description = "Widget host counters, Prometheus text format")
    )
)]
pub async fn get_metrics() -> HttpResponse {
    HttpResponse::Ok()
        .content_type("text/plain; version=0.0.4")
        .body(MetricsResponse::snapshot().render())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_exposes_every_counter() {
        let text = MetricsResponse::snapshot().render();

        for name in [
            "http_requests_total",
            "widget_reconciliations_total",
            "referral_backend_failures_total",
            "clipboard_failures_total",
        ] {
            assert!(text.contains(&format!("# TYPE {} counter", name)), "{}", name);
        }
    }

    #[test]
    fn test_clipboard_counters_move() {
        let before = MetricsResponse::snapshot();
        record_clipboard_write(true);
        record_clipboard_write(false);
        let after = MetricsResponse::snapshot();

        assert!(after.clipboard_writes_total > before.clipboard_writes_total);
        assert!(after.clipboard_failures_total > before.clipboard_failures_total);
    }
}
