use axum::{
    extract::{MatchedPath, Request},
    http::StatusCode,
    middleware::Next,
    response::Response,
};
use std::time::Instant;
use tracing::{Instrument, Level, debug, error, info, info_span, warn};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{EnvFilter, Layer, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// How a finished request is reported.
fn outcome(status: StatusCode) -> (Level, &'static str) {
    if status.is_server_error() {
        (Level::ERROR, "failed")
    } else if status.is_client_error() {
        (Level::WARN, "rejected")
    } else {
        (Level::DEBUG, "ok")
    }
}

/// Runs the request inside a span carrying a request id, method and route,
/// and emits one completion event whose level follows the status class.
///
/// Headers are never recorded, so identity claims stay out of the logs.
pub async fn logging_middleware(req: Request, next: Next) -> Response {
    let path = req
        .extensions()
        .get::<MatchedPath>()
        .map(|p| p.as_str().to_owned())
        .unwrap_or_else(|| req.uri().path().to_owned());

    let span = info_span!(
        "request",
        request_id = %uuid::Uuid::new_v4(),
        method = %req.method(),
        path = %path,
    );

    async move {
        let start = Instant::now();
        let response = next.run(req).await;
        let status = response.status().as_u16();
        let latency_ms = start.elapsed().as_millis() as u64;

        let (level, label) = outcome(response.status());
        if level == Level::ERROR {
            error!(status, latency_ms, outcome = label, "Request completed");
        } else if level == Level::WARN {
            warn!(status, latency_ms, outcome = label, "Request completed");
        } else {
            debug!(status, latency_ms, outcome = label, "Request completed");
        }

        response
    }
    .instrument(span)
    .await
}

/// Installs the global subscriber: a compact console layer filtered by
/// `RUST_LOG` and a daily-rolling JSON file under `LOG_DIR`
/// (default `storage/logs`).
pub fn init_tracing() -> anyhow::Result<()> {
    let log_dir = std::env::var("LOG_DIR").unwrap_or_else(|_| "storage/logs".to_string());
    std::fs::create_dir_all(&log_dir)?;

    let console_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "{}=info,tower_http=warn,hyper=info,sqlx=warn",
            env!("CARGO_CRATE_NAME")
        ))
    });

    let console_layer = fmt::layer()
        .with_target(false)
        .with_thread_ids(false)
        .with_thread_names(false)
        .with_file(true)
        .with_line_number(true)
        .compact()
        .with_filter(console_filter);

    // JSON file layer for structured logs (can be ingested by Loki)
    let json_appender = RollingFileAppender::new(Rotation::DAILY, &log_dir, "columbus.json");

    let json_layer = fmt::layer()
        .json()
        .with_writer(json_appender)
        .with_current_span(true)
        .with_span_list(true)
        .with_filter(EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(console_layer)
        .with(json_layer)
        .try_init()?;

    info!(log_dir = %log_dir, "Tracing initialized");
    Ok(())
}
