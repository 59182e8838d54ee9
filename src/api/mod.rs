use crate::api::handlers::{auth, health, quiz, root};
use anyhow::{Context, Result, anyhow};
use axum::{
    Extension, Router,
    body::Body,
    extract::MatchedPath,
    http::{HeaderName, HeaderValue, Method, Request, header::CONTENT_TYPE},
    middleware,
    routing::{delete, get, post},
};
use sqlx::{PgPool, postgres::PgPoolOptions};
use std::{sync::Arc, time::Duration};
use tokio::{net::TcpListener, signal};
use tower::ServiceBuilder;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    request_id::PropagateRequestIdLayer,
    set_header::SetRequestHeaderLayer,
    trace::TraceLayer,
};
use tracing::{Span, error, info, info_span, warn};
use ulid::Ulid;
use url::Url;
use utoipa_swagger_ui::SwaggerUi;

pub mod handlers;
// OpenAPI document assembly lives in openapi.rs.
mod openapi;

pub use handlers::auth::AdminConfig;
pub use openapi::openapi;

/// Build the route table: public quiz endpoints, the gated admin API and the
/// service plumbing. Layers are added by [`app`].
#[must_use]
pub fn router() -> Router {
    Router::new()
        .route("/", get(root::root))
        .route("/health", get(health::health).options(health::health))
        .route("/api/questions", get(quiz::questions::list_questions))
        .route(
            "/api/participants",
            post(quiz::participants::submit_participant),
        )
        .route("/api/admin/login", post(auth::login::login))
        .route("/api/admin/logout", post(auth::login::logout))
        .route(
            "/api/admin/questions",
            get(quiz::questions::list_all_questions).post(quiz::questions::create_question),
        )
        .route(
            "/api/admin/questions/:id",
            delete(quiz::questions::delete_question),
        )
        .route(
            "/api/admin/participants",
            get(quiz::participants::list_participants),
        )
        .route(
            "/api/admin/participants/:id",
            get(quiz::participants::get_participant).delete(quiz::participants::delete_participant),
        )
        .merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", openapi()))
}

/// Assemble the full application: routes, tracing, CORS, shared state and
/// the admin gate in front of everything.
///
/// # Errors
///
/// Returns an error when the configured base URL cannot be turned into a
/// CORS origin.
pub fn app(config: Arc<AdminConfig>, pool: PgPool) -> Result<Router> {
    let origin = base_origin(config.base_url())?;

    let cors = CorsLayer::new()
        .allow_headers([CONTENT_TYPE])
        .allow_methods([Method::GET, Method::POST, Method::DELETE])
        .allow_origin(AllowOrigin::exact(origin))
        .allow_credentials(true);

    // The gate sits innermost so the extensions it needs are already set.
    Ok(router().layer(
        ServiceBuilder::new()
            .layer(SetRequestHeaderLayer::if_not_present(
                HeaderName::from_static("x-request-id"),
                |_req: &_| HeaderValue::from_str(Ulid::new().to_string().as_str()).ok(),
            ))
            .layer(PropagateRequestIdLayer::new(HeaderName::from_static(
                "x-request-id",
            )))
            .layer(TraceLayer::new_for_http().make_span_with(make_span))
            .layer(cors)
            .layer(Extension(config))
            .layer(Extension(pool))
            .layer(middleware::from_fn(auth::gate::admin_gate)),
    ))
}

/// Start the server
/// # Errors
/// Return error if failed to start the server
pub async fn new(port: u16, dsn: String, config: AdminConfig) -> Result<()> {
    // Lazy pool: the process starts and serves even while the database is
    // down, health reports the difference.
    let pool = PgPoolOptions::new()
        .min_connections(1)
        .max_connections(5)
        .max_lifetime(Duration::from_secs(60 * 2))
        .test_before_acquire(true)
        .connect_lazy(&dsn)
        .context("Failed to parse database DSN")?;

    if let Err(error) = quiz::storage::ensure_schema(&pool).await {
        warn!("Could not prepare the database schema yet: {error}");
    }

    let app = app(Arc::new(config), pool)?;

    let listener = TcpListener::bind(format!("::0:{port}")).await?;

    info!("Listening on [::]:{}", port);

    axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(async {
            if let Err(error) = signal::ctrl_c().await {
                error!("Failed to listen for shutdown signal: {error}");
            }

            info!("Gracefully shutdown");
        })
        .await?;

    Ok(())
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

fn base_origin(base_url: &str) -> Result<HeaderValue> {
    let parsed = Url::parse(base_url).with_context(|| format!("Invalid base URL: {base_url}"))?;
    let host = parsed
        .host_str()
        .ok_or_else(|| anyhow!("Base URL must include a valid host: {base_url}"))?;
    let port = parsed
        .port()
        .map_or_else(String::new, |port| format!(":{port}"));
    let origin = format!("{}://{}{}", parsed.scheme(), host, port);
    HeaderValue::from_str(&origin).context("Failed to build origin header")
}
