//! Request logging.
//!
//! Every request is logged at debug level with its client, status and
//! latency. Scrapes also report how many samples they exposed and the size
//! of the uncompressed body, taken from the [`ScrapeSummary`] the metrics
//! handler attaches to its response.

use std::net::SocketAddr;
use std::time::Instant;

use axum::extract::{ConnectInfo, Request};
use axum::middleware::Next;
use axum::response::Response;
use tracing::debug;

/// Size of one rendered scrape.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct ScrapeSummary {
    pub(crate) samples: usize,
    pub(crate) bytes: usize,
}

impl ScrapeSummary {
    /// Counts the sample lines of a text exposition (everything but comments).
    pub(crate) fn of_exposition(body: &str) -> Self {
        let samples = body
            .lines()
            .filter(|line| !line.is_empty() && !line.starts_with('#'))
            .count();
        Self {
            samples,
            bytes: body.len(),
        }
    }
}

pub(crate) async fn log_request(req: Request, next: Next) -> Response {
    let method = req.method().clone();
    let path = req.uri().path().to_owned();
    let client = req
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip().to_string())
        .unwrap_or_else(|| "-".to_owned());
    let started = Instant::now();

    let response = next.run(req).await;

    let latency_ms = started.elapsed().as_millis() as u64;
    let status = response.status().as_u16();
    match response.extensions().get::<ScrapeSummary>() {
        Some(scrape) => debug!(
            client,
            status,
            latency_ms,
            samples = scrape.samples,
            bytes = scrape.bytes,
            "{method} {path}"
        ),
        None => debug!(client, status, latency_ms, "{method} {path}"),
    }
    response
}
