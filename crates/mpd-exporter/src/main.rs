//! mpd_exporter - Prometheus exporter for MPD (Music Player Daemon).
//!
//! Every request to the metrics path opens a fresh connection to MPD, reads
//! stats, outputs and the full song listing, and answers with the result.

mod access_log;
mod handlers;
mod state;

use std::net::SocketAddr;
use std::process;
use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use axum::middleware;
use axum::routing::get;
use clap::Parser;
use prometheus_client::registry::Registry;
use tower_http::compression::CompressionLayer;
use tracing::{Level, error, info};
use tracing_subscriber::EnvFilter;

use mpd_exporter_core::VERSION;
use mpd_exporter_core::collector::MpdCollector;
use mpd_exporter_core::mpd::ConnectionConfig;
use mpd_exporter_core::util::TimestampZone;

use state::AppState;

const SW_NAME: &str = "mpd_exporter";

const HEALTH_PATH: &str = "/health";

// ============================================================
// CLI
// ============================================================

/// Prometheus exporter for MPD.
#[derive(Parser, Debug)]
#[command(name = "mpd_exporter", disable_version_flag = true)]
struct Args {
    /// Listen address for HTTP requests.
    #[arg(
        long = "web.listen-address",
        default_value = "0.0.0.0:9778",
        env = "MPD_EXPORTER_LISTEN_ADDRESS"
    )]
    listen_address: String,

    /// Path under which to expose metrics.
    #[arg(
        long = "web.telemetry-path",
        default_value = "/metrics",
        env = "MPD_EXPORTER_TELEMETRY_PATH"
    )]
    metrics_path: String,

    /// Address of mpd. An empty host (":6600") means localhost.
    #[arg(long = "mpd.addr", default_value = ":6600", env = "MPD_EXPORTER_MPD_ADDR")]
    mpd_addr: String,

    /// MPD password (optional).
    #[arg(long = "mpd.pass", env = "MPD_EXPORTER_MPD_PASS", hide_env_values = true)]
    mpd_pass: Option<String>,

    /// Timeout in seconds for connecting to and talking with mpd.
    /// Without it a hung daemon blocks the scrape until Prometheus gives up.
    #[arg(
        long = "mpd.timeout",
        env = "MPD_EXPORTER_MPD_TIMEOUT",
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    mpd_timeout: Option<u64>,

    /// Read song Last-Modified stamps as UTC instead of local time.
    #[arg(long = "mpd.timestamps-utc", env = "MPD_EXPORTER_TIMESTAMPS_UTC")]
    timestamps_utc: bool,

    /// Increase logging verbosity (-v for debug, -vv for trace). Default is info level.
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Quiet mode - only show errors.
    #[arg(short, long)]
    quiet: bool,

    /// Show version and exit.
    #[arg(long)]
    version: bool,
}

impl Args {
    fn collector(&self) -> MpdCollector {
        let config = ConnectionConfig::new(self.mpd_addr.clone())
            .with_password(self.mpd_pass.clone())
            .with_timeout(self.mpd_timeout.map(Duration::from_secs));
        let zone = if self.timestamps_utc {
            TimestampZone::Utc
        } else {
            TimestampZone::Local
        };
        MpdCollector::new(config).with_timestamp_zone(zone)
    }
}

/// Initializes the tracing subscriber with the appropriate log level.
/// Default level is INFO. Use -q for quiet mode (errors only).
fn init_logging(verbose: u8, quiet: bool) {
    let level = if quiet {
        Level::ERROR
    } else {
        match verbose {
            0 => Level::INFO,
            1 => Level::DEBUG,
            _ => Level::TRACE,
        }
    };

    let filter = EnvFilter::from_default_env()
        .add_directive(format!("mpd_exporter={}", level).parse().unwrap())
        .add_directive(format!("mpd_exporter_core={}", level).parse().unwrap());

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

// ============================================================
// Main
// ============================================================

fn main() {
    let args = Args::parse();

    if args.version {
        println!("{} v{}", SW_NAME, VERSION);
        return;
    }

    init_logging(args.verbose, args.quiet);

    let addr: SocketAddr = match args.listen_address.parse() {
        Ok(addr) => addr,
        Err(e) => {
            error!(address = %args.listen_address, error = %e, "invalid listen address");
            process::exit(1);
        }
    };
    if !args.metrics_path.starts_with('/') {
        error!(path = %args.metrics_path, "telemetry path must start with '/'");
        process::exit(1);
    }

    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .expect("failed to build tokio runtime")
        .block_on(async_main(args, addr));
}

async fn async_main(args: Args, addr: SocketAddr) {
    let collector = args.collector();
    info!(
        version = VERSION,
        mpd = collector.config().addr(),
        auth = collector.config().password().is_some(),
        timestamps = ?collector.timestamp_zone(),
        "starting"
    );

    let mut registry = Registry::default();
    registry.register_collector(Box::new(collector));

    let state = AppState {
        registry: Arc::new(registry),
        metrics_path: Arc::from(args.metrics_path.as_str()),
    };
    let app = build_router(state).into_make_service_with_connect_info::<SocketAddr>();

    let listener = match tokio::net::TcpListener::bind(addr).await {
        Ok(listener) => listener,
        Err(e) => {
            error!(%addr, error = %e, "failed to bind");
            process::exit(1);
        }
    };
    info!(%addr, path = %args.metrics_path, "listening");

    if let Err(e) = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        error!(error = %e, "server error");
        process::exit(1);
    }
    info!("stopped");
}

/// Builds the router: metrics path, landing page and health check.
fn build_router(state: AppState) -> Router {
    let metrics_path = state.metrics_path.clone();

    let mut app = Router::new().route(&metrics_path, get(handlers::handle_metrics));
    if &*metrics_path != "/" {
        app = app.route("/", get(handlers::handle_index));
    }
    if &*metrics_path != HEALTH_PATH {
        app = app.route(HEALTH_PATH, get(handlers::handle_health));
    }

    app.with_state(state)
        .layer(middleware::from_fn(access_log::log_request))
        .layer(CompressionLayer::new())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("shutdown requested");
}

#[cfg(test)]
mod tests {
    use super::*;

    use axum::body::{Body, to_bytes};
    use axum::http::{Request, StatusCode, header};
    use clap::CommandFactory;
    use tower::ServiceExt;

    use mpd_exporter_core::collector::mock::{FakeDaemon, Script};

    use crate::access_log::ScrapeSummary;

    fn router_for(collector: MpdCollector, metrics_path: &str) -> Router {
        let mut registry = Registry::default();
        registry.register_collector(Box::new(collector));
        build_router(AppState {
            registry: Arc::new(registry),
            metrics_path: Arc::from(metrics_path),
        })
    }

    async fn get_body(app: Router, uri: &str) -> (StatusCode, Option<String>, String) {
        let response = app
            .oneshot(Request::get(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let content_type = response
            .headers()
            .get(header::CONTENT_TYPE)
            .map(|v| v.to_str().unwrap().to_string());
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, content_type, String::from_utf8(bytes.to_vec()).unwrap())
    }

    #[test]
    fn test_cli_definition() {
        Args::command().debug_assert();
    }

    #[test]
    fn test_cli_defaults() {
        let args = Args::try_parse_from(["mpd_exporter"]).unwrap();
        assert_eq!(args.listen_address, "0.0.0.0:9778");
        assert_eq!(args.metrics_path, "/metrics");
        assert_eq!(args.mpd_addr, ":6600");
        assert_eq!(args.mpd_pass, None);
        assert!(!args.timestamps_utc);
        assert!(!args.version);

        let collector = args.collector();
        assert_eq!(collector.config().addr(), ":6600");
        assert_eq!(collector.config().timeout(), None);
        assert_eq!(collector.timestamp_zone(), TimestampZone::Local);
    }

    #[test]
    fn test_cli_dotted_flags() {
        let args = Args::try_parse_from([
            "mpd_exporter",
            "--web.listen-address",
            "127.0.0.1:9000",
            "--web.telemetry-path",
            "/mpd",
            "--mpd.addr",
            "music:6601",
            "--mpd.pass",
            "secret",
            "--mpd.timeout",
            "5",
            "--mpd.timestamps-utc",
        ])
        .unwrap();

        let collector = args.collector();
        assert_eq!(args.metrics_path, "/mpd");
        assert_eq!(collector.config().addr(), "music:6601");
        assert_eq!(collector.config().password(), Some("secret"));
        assert_eq!(collector.config().timeout(), Some(Duration::from_secs(5)));
        assert_eq!(collector.timestamp_zone(), TimestampZone::Utc);
    }

    #[test]
    fn test_cli_rejects_zero_timeout() {
        assert!(Args::try_parse_from(["mpd_exporter", "--mpd.timeout", "0"]).is_err());
    }

    #[tokio::test]
    async fn test_metrics_endpoint_scrapes_daemon() {
        let daemon = FakeDaemon::start(Script::typical_library());
        let host = daemon.addr().to_string();
        let app = router_for(MpdCollector::new(daemon.config()), "/metrics");

        let (status, content_type, body) = get_body(app, "/metrics").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(content_type.as_deref(), Some(mpd_exporter_core::metrics::CONTENT_TYPE));
        assert!(body.contains(&format!("mpd_stats_songs{{mpd_host=\"{}\"}} 10.0", host)));
        assert!(body.contains(&format!("mpd_stats_playtime{{mpd_host=\"{}\"}} 3600.0", host)));
        assert!(body.contains("output_name=\"A\""));
        assert!(body.contains("# TYPE mpd_song_lastmodified_epoch gauge"));
    }

    #[tokio::test]
    async fn test_metrics_response_carries_scrape_summary() {
        let daemon = FakeDaemon::start(Script::typical_library());
        let app = router_for(MpdCollector::new(daemon.config()), "/metrics");

        let response = app
            .oneshot(Request::get("/metrics").body(Body::empty()).unwrap())
            .await
            .unwrap();

        let summary = *response.extensions().get::<ScrapeSummary>().unwrap();
        // 4 counters, 2 outputs, 2 songs with 2 samples each.
        assert_eq!(summary.samples, 10);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(summary.bytes, bytes.len());
    }

    #[tokio::test]
    async fn test_health_has_no_scrape_summary() {
        let daemon = FakeDaemon::start(Script::typical_library());
        let app = router_for(MpdCollector::new(daemon.config()), "/metrics");

        let response = app
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert!(response.extensions().get::<ScrapeSummary>().is_none());
        assert!(daemon.log().commands.is_empty());
    }

    #[tokio::test]
    async fn test_metrics_endpoint_survives_unreachable_daemon() {
        let addr = {
            let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
            listener.local_addr().unwrap()
        };
        let collector = MpdCollector::new(ConnectionConfig::new(addr.to_string()));
        let app = router_for(collector, "/metrics");

        let (status, _, body) = get_body(app, "/metrics").await;

        assert_eq!(status, StatusCode::OK);
        assert!(!body.contains("mpd_stats_songs"));
    }

    #[tokio::test]
    async fn test_custom_metrics_path_and_index() {
        let daemon = FakeDaemon::start(Script::typical_library());
        let app = router_for(MpdCollector::new(daemon.config()), "/mpd");

        let (status, _, body) = get_body(app.clone(), "/").await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("href=\"/mpd\""));

        let (status, _, _) = get_body(app.clone(), "/metrics").await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, _, body) = get_body(app, "/health").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "ok");
    }
}
