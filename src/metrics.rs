use axum::{Router, routing::get};
use metrics::counter;
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use std::sync::OnceLock;
use std::time::Duration;

static OBSERVABILITY_ENABLED: OnceLock<bool> = OnceLock::new();

/// Check if observability is enabled via OBSERVABILITY_ENABLED env var
pub fn is_observability_enabled() -> bool {
    *OBSERVABILITY_ENABLED.get_or_init(|| {
        std::env::var("OBSERVABILITY_ENABLED")
            .map(|v| v.to_lowercase() != "false" && v != "0")
            .unwrap_or(true)
    })
}

/// Install the Prometheus recorder and spawn its upkeep task.
///
/// Returns `Ok(None)` when observability is disabled.
pub fn init_metrics() -> anyhow::Result<Option<PrometheusHandle>> {
    if !is_observability_enabled() {
        return Ok(None);
    }

    let handle = PrometheusBuilder::new().install_recorder()?;

    let upkeep_handle = handle.clone();
    tokio::spawn(async move {
        loop {
            tokio::time::sleep(Duration::from_secs(5)).await;
            upkeep_handle.run_upkeep();
        }
    });

    Ok(Some(handle))
}

/// Router for metrics server
pub fn metrics_app(handle: PrometheusHandle) -> Router {
    Router::new().route("/metrics", get(move || async move { handle.render() }))
}

/// `outcome` is one of `found`, `created`, `failed`.
pub fn track_identity_resolution(outcome: &'static str) {
    if !is_observability_enabled() {
        return;
    }
    counter!("identity_resolutions_total", "outcome" => outcome).increment(1);
}

/// `reason` is one of `empty_header`, `malformed_header`, `backend`.
pub fn track_identity_rejection(reason: &'static str) {
    if !is_observability_enabled() {
        return;
    }
    counter!("identity_rejections_total", "reason" => reason).increment(1);
}

pub fn track_user_created(provider: &str) {
    if !is_observability_enabled() {
        return;
    }
    counter!("users_created_total", "provider" => provider.to_string()).increment(1);
}
