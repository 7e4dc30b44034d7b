//! Headline aggregator: binary entrypoint.
//! Boots the Axum HTTP server: `POST /refresh` runs one aggregation cycle,
//! `GET /metrics` exposes Prometheus series.

use headline_aggregator::{app, metrics::Metrics, AggregatorConfig};
use shuttle_axum::ShuttleAxum;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Compact tracing logs; `RUST_LOG` wins over the default filter.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("headline_aggregator=info,warn"));

    // The runtime may already have installed a subscriber.
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().compact())
        .try_init();
}

#[shuttle_runtime::main]
async fn axum() -> ShuttleAxum {
    // Load .env in local/dev; no-op in prod environments.
    let _ = dotenvy::dotenv();

    init_tracing();

    let cfg = AggregatorConfig::load_default()?;
    let metrics = Metrics::init()?;
    let router = app(&cfg)?.merge(metrics.router());

    Ok(router.into())
}
