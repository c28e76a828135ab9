//! Takshashil Foundation site server.
//!
//! Serves the public pages, the library catalog, both shops and the
//! donation flow from a single axum process. Carts, checkout progress and
//! notices live in in-memory sessions; generated certificates and catalogs
//! sit in a short-lived download cache. Nothing touches a database.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::borrow::Cow;
use std::net::SocketAddr;

use sentry::integrations::tracing::{self as sentry_tracing, EventFilter};
use takshashil_storefront::config::StorefrontConfig;
use takshashil_storefront::state::AppState;
use takshashil_storefront::{content_dir, router};
use tracing::{Level, Metadata};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

const DEFAULT_LOG_FILTER: &str = "takshashil_storefront=info,tower_http=debug";

#[tokio::main]
async fn main() {
    let config = StorefrontConfig::from_env().expect("invalid storefront configuration");

    // The Sentry client has to exist before the tracing layer that feeds it.
    let _sentry = config.sentry_dsn.as_deref().map(|dsn| start_sentry(dsn, &config));
    init_tracing();

    if !config.rate_limit_enabled {
        tracing::warn!("form rate limiting is disabled");
    }

    let state = AppState::new(config.clone(), &content_dir())
        .expect("failed to load catalogs and pages");
    let app = router(state)
        .layer(sentry_tower::NewSentryLayer::new_from_top())
        .layer(sentry_tower::SentryHttpLayer::new().enable_transaction());

    let addr = config.socket_addr();
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .unwrap_or_else(|err| panic!("cannot bind {addr}: {err}"));
    tracing::info!(%addr, base_url = %config.base_url, "storefront listening");

    // Connect info gives the form rate limiter a peer address to key on.
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_requested())
    .await
    .expect("server terminated abnormally");

    tracing::info!("storefront stopped");
}

fn start_sentry(dsn: &str, config: &StorefrontConfig) -> sentry::ClientInitGuard {
    let options = sentry::ClientOptions {
        release: sentry::release_name!(),
        environment: config.sentry_environment.clone().map(Cow::Owned),
        sample_rate: config.sentry_sample_rate,
        traces_sample_rate: config.sentry_traces_sample_rate,
        attach_stacktrace: true,
        ..Default::default()
    };
    sentry::init((dsn, options))
}

fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    // Warnings and errors become Sentry events; info and debug only breadcrumbs.
    let sentry_layer =
        sentry_tracing::layer().event_filter(|meta: &Metadata<'_>| match *meta.level() {
            Level::ERROR | Level::WARN => EventFilter::Event,
            Level::INFO | Level::DEBUG => EventFilter::Breadcrumb,
            _ => EventFilter::Ignore,
        });

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .with(sentry_layer)
        .init();
}

/// Resolves on Ctrl+C, or SIGTERM on unix.
async fn shutdown_requested() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{SignalKind, signal};

        let mut sigterm = signal(SignalKind::terminate()).expect("cannot listen for SIGTERM");
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {}
            _ = sigterm.recv() => {}
        }
    }

    #[cfg(not(unix))]
    let _ = tokio::signal::ctrl_c().await;

    tracing::info!("shutdown requested, draining connections");
}
