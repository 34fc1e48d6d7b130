//! HTTP request handlers: metrics, landing page, health.

use axum::extract::State;
use axum::http::{StatusCode, header};
use axum::response::{Html, IntoResponse, Response};
use tracing::error;

use mpd_exporter_core::metrics::{CONTENT_TYPE, render};

use crate::access_log::ScrapeSummary;
use crate::state::{AppState, release_memory_to_os};

// ============================================================
// Metrics
// ============================================================

/// Runs one scrape and returns it in the text exposition format.
///
/// The scrape does blocking socket I/O, so it runs on the blocking pool.
/// A scrape that fails partway still answers 200 with the samples it got.
pub(crate) async fn handle_metrics(State(state): State<AppState>) -> Response {
    let registry = state.registry.clone();
    let rendered = tokio::task::spawn_blocking(move || {
        let rendered = render(&registry);
        release_memory_to_os();
        rendered
    })
    .await;

    match rendered {
        Ok(Ok(body)) => {
            let summary = ScrapeSummary::of_exposition(&body);
            let mut response = ([(header::CONTENT_TYPE, CONTENT_TYPE)], body).into_response();
            response.extensions_mut().insert(summary);
            response
        }
        Ok(Err(e)) => {
            error!(error = %e, "failed to encode metrics");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
        Err(e) => {
            error!(error = %e, "scrape task failed");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

// ============================================================
// Landing page & health
// ============================================================

pub(crate) async fn handle_index(State(state): State<AppState>) -> Html<String> {
    Html(format!(
        "<html>\n\
         <head><title>MPD Exporter</title></head>\n\
         <body>\n\
         <h1>MPD Exporter</h1>\n\
         <p><a href=\"{path}\">Metrics</a></p>\n\
         </body>\n\
         </html>\n",
        path = state.metrics_path
    ))
}

pub(crate) async fn handle_health() -> &'static str {
    "ok"
}
