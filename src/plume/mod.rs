//! HTTP server assembly for the blog admin slice.

use anyhow::{Context, Result};
use axum::{
    body::Body,
    extract::MatchedPath,
    http::{HeaderName, HeaderValue, Method, Request},
    middleware,
    routing::{get, post},
    Extension, Router,
};
use sqlx::postgres::PgPoolOptions;
use std::{sync::Arc, time::Duration};
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    request_id::PropagateRequestIdLayer,
    set_header::SetRequestHeaderLayer,
    trace::TraceLayer,
};
use tracing::{error, info, info_span, Span};
use ulid::Ulid;

pub mod audit;
pub mod auth;
pub mod digest;
pub mod handlers;
pub mod locale;
pub mod models;
pub mod openapi;
pub mod response;
pub mod state;
pub mod storage;

use self::audit::AuditSink;
use self::auth::{account::AccountStore, AuthGuard, MemorySessionStore, SessionIssuer};
use self::handlers::{admin, galleries, menus};
use self::state::{AppConfig, AppState};
use self::storage::postgres::{PgAccountStore, PgAuditSink, PgGalleryRepo, PgMenuRepo};
use self::storage::{GalleryRepo, MenuRepo};

/// Start the server
/// # Errors
/// Return error if failed to start the server
pub async fn new(port: u16, dsn: String, config: AppConfig) -> Result<()> {
    // Connect to database
    let pool = PgPoolOptions::new()
        .min_connections(1)
        .max_connections(5)
        .max_lifetime(Duration::from_secs(60 * 2))
        .test_before_acquire(true)
        .connect(&dsn)
        .await
        .context("Failed to connect to database")?;

    let audit: Arc<dyn AuditSink> = Arc::new(PgAuditSink::new(pool.clone()));
    let accounts: Arc<dyn AccountStore> = Arc::new(PgAccountStore::new(pool.clone()));
    let guard = AuthGuard::new(accounts, audit.clone());
    let sessions = SessionIssuer::new(Arc::new(MemorySessionStore::new(
        chrono::Duration::seconds(config.session_ttl_seconds()),
    )));
    let gallery_repo: Arc<dyn GalleryRepo> = Arc::new(PgGalleryRepo::new(pool.clone()));
    let menu_repo: Arc<dyn MenuRepo> = Arc::new(PgMenuRepo::new(pool));
    let app_state = Arc::new(AppState::new(
        config,
        guard,
        sessions,
        audit,
        gallery_repo,
        menu_repo,
    ));

    let app = router(app_state);

    let listener = TcpListener::bind(format!("::0:{port}")).await?;

    info!("Listening on [::]:{}", port);

    axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

/// Assemble routes and the middleware stack around the shared state.
#[must_use]
pub fn router(app_state: Arc<AppState>) -> Router {
    // The public listing API accepts any origin; theme clients live anywhere.
    let cors = CorsLayer::new()
        .allow_methods([Method::GET])
        .allow_origin(Any);

    let api = Router::new()
        .route("/api/galleries", get(galleries::galleries))
        .route("/api/galleries/:id", get(galleries::gallery))
        .route("/api/menus", get(menus::menus))
        .layer(cors);

    Router::new()
        .route("/", get(handlers::root))
        .route("/health", get(handlers::health))
        .route("/openapi.json", get(openapi::openapi))
        .route("/admin/login", post(admin::login))
        .route("/admin/logout", get(admin::logout))
        .route("/admin/token", get(admin::get_token))
        .merge(api)
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestHeaderLayer::if_not_present(
                    HeaderName::from_static("x-request-id"),
                    |_req: &Request<Body>| {
                        HeaderValue::from_str(Ulid::new().to_string().as_str()).ok()
                    },
                ))
                .layer(PropagateRequestIdLayer::new(HeaderName::from_static(
                    "x-request-id",
                )))
                .layer(TraceLayer::new_for_http().make_span_with(make_span))
                .layer(Extension(app_state))
                .layer(middleware::from_fn(locale::select_locale)),
        )
}

fn make_span(request: &Request<Body>) -> Span {
    let request_id = request
        .headers()
        .get("x-request-id")
        .and_then(|val| val.to_str().ok())
        .unwrap_or("none");
    let matched_path = request
        .extensions()
        .get::<MatchedPath>()
        .map_or_else(|| request.uri().path(), MatchedPath::as_str);

    info_span!(
        "http.request",
        http.method = %request.method(),
        http.route = matched_path,
        request_id
    )
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for shutdown signal: {err}");
        return;
    }
    info!("Gracefully shutdown");
}
