use axum::{extract::Request, middleware::Next, response::Response};
use std::time::Instant;
use tracing::{error, info, warn};
use tracing_subscriber::{EnvFilter, Layer, layer::SubscriberExt, util::SubscriberInitExt};

/// Logs every request with the path the client sent, before any rewriting.
pub async fn logging_middleware(req: Request, next: Next) -> Response {
    let start = Instant::now();
    let method = req.method().clone();
    let path = req.uri().path().to_string();
    let request_id = uuid::Uuid::new_v4().to_string();

    let response = next.run(req).await;
    let latency = start.elapsed();
    let status = response.status();

    match status.as_u16() {
        500..=599 => {
            error!(
                request_id = %request_id,
                method = %method,
                path = %path,
                status = %status.as_u16(),
                latency_ms = %latency.as_millis(),
                "Server error"
            );
        }
        400..=499 => {
            warn!(
                request_id = %request_id,
                method = %method,
                path = %path,
                status = %status.as_u16(),
                latency_ms = %latency.as_millis(),
                "Client error"
            );
        }
        _ => {
            info!(
                request_id = %request_id,
                method = %method,
                path = %path,
                status = %status.as_u16(),
                latency_ms = %latency.as_millis(),
                "Request completed"
            );
        }
    }

    response
}

/// Console logging, plus daily-rotated JSON logs when `log_dir` is set.
///
/// The console level comes from `RUST_LOG` if present, otherwise from
/// `LOG_LEVEL` (default `info`).
pub fn init_tracing(log_dir: Option<&str>) {
    use tracing_appender::rolling::{RollingFileAppender, Rotation};
    use tracing_subscriber::fmt;

    let log_level = std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string());
    let console_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "{}={},hashed_urls_core={},hashed_urls_db={},tower_http=warn,hyper=warn,sqlx=warn",
            env!("CARGO_CRATE_NAME"),
            log_level,
            log_level,
            log_level
        ))
    });

    let console_layer = fmt::layer()
        .compact()
        .with_target(true)
        .with_thread_ids(false)
        .with_thread_names(false)
        .with_file(true)
        .with_line_number(true)
        .with_filter(console_filter);

    let Some(log_dir) = log_dir else {
        tracing_subscriber::registry().with(console_layer).init();
        return;
    };

    if let Err(e) = std::fs::create_dir_all(log_dir) {
        tracing_subscriber::registry().with(console_layer).init();
        warn!(error = %e, log_dir, "Failed to create log directory, logging to console only");
        return;
    }

    // JSON file layer for structured logs (can be ingested by Loki)
    let json_appender = RollingFileAppender::new(Rotation::DAILY, log_dir, "hashed-urls.json");
    let json_layer = fmt::layer()
        .json()
        .with_writer(json_appender)
        .with_current_span(true)
        .with_span_list(true)
        .with_filter(EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(console_layer)
        .with(json_layer)
        .init();

    info!(log_dir, "Tracing initialized with JSON file logging");
}
