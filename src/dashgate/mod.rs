pub mod auth;
pub mod handlers;
pub mod passage;
pub mod templates;

use crate::cli::globals::GlobalArgs;
use anyhow::{Context, Result};
use axum::{
    body::Body,
    extract::MatchedPath,
    http::{HeaderName, HeaderValue, Request},
    middleware,
    routing::get,
    Router,
};
use std::sync::Arc;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::{
    catch_panic::CatchPanicLayer, compression::CompressionLayer,
    request_id::PropagateRequestIdLayer, set_header::SetRequestHeaderLayer, trace::TraceLayer,
};
use tracing::{info, info_span, Span};
use ulid::Ulid;

use self::passage::{Connector, PassageConnector};

/// Shared, read-only state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    globals: Arc<GlobalArgs>,
    connector: Arc<dyn Connector>,
}

impl AppState {
    #[must_use]
    pub fn new(globals: GlobalArgs, connector: Arc<dyn Connector>) -> Self {
        Self {
            globals: Arc::new(globals),
            connector,
        }
    }

    #[must_use]
    pub fn app_id(&self) -> &str {
        &self.globals.passage_app_id
    }

    #[must_use]
    pub fn connector(&self) -> &dyn Connector {
        self.connector.as_ref()
    }
}

/// Build the application router: the public index, the gated dashboard, and
/// the global middleware stack.
pub fn router(state: AppState) -> Router {
    let protected = Router::new()
        .route("/dashboard", get(handlers::dashboard))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth::require_user,
        ));

    Router::new()
        .route("/", get(handlers::index))
        .merge(protected)
        .with_state(state)
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestHeaderLayer::if_not_present(
                    HeaderName::from_static("x-request-id"),
                    |_req: &_| HeaderValue::from_str(Ulid::new().to_string().as_str()).ok(),
                ))
                .layer(PropagateRequestIdLayer::new(HeaderName::from_static(
                    "x-request-id",
                )))
                .layer(TraceLayer::new_for_http().make_span_with(make_span))
                .layer(CompressionLayer::new())
                .layer(CatchPanicLayer::new()),
        )
}

/// Start the server
/// # Errors
/// Return error if the Passage client cannot be built or the port cannot be bound
pub async fn new(port: u16, globals: GlobalArgs) -> Result<()> {
    let connector =
        PassageConnector::new(globals.clone()).context("Failed to build Passage HTTP client")?;

    let app = router(AppState::new(globals, Arc::new(connector)));

    let listener = TcpListener::bind(format!("::0:{port}"))
        .await
        .with_context(|| format!("Failed to bind port {port}"))?;

    info!("Listening on [::]:{}", port);

    axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for ctrl-c: {err}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                tracing::error!("Failed to listen for SIGTERM: {err}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    info!("Gracefully shutdown");
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
