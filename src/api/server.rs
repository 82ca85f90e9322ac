//! HTTP server: router, middleware stack and listen loop.

use super::middleware::{PathParam, extract_path_param};
use super::tasks::{self, ID};
use crate::config::ServerConfig;
use crate::tasks::TaskService;
use axum::{
    Router,
    http::StatusCode,
    middleware::from_fn_with_state,
    response::{IntoResponse, Json},
    routing::get,
};
use std::net::SocketAddr;
use std::time::Duration;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

/// Base path of the task endpoints.
pub const TASKS_PATH: &str = "/api/v1/tasks";

/// State shared across handlers.
#[derive(Clone)]
pub struct AppState {
    service: TaskService,
}

impl AppState {
    pub fn new(service: TaskService) -> Self {
        Self { service }
    }

    pub fn service(&self) -> &TaskService {
        &self.service
    }
}

/// Health check response.
#[derive(serde::Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

async fn health() -> impl IntoResponse {
    Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// Build the router with all routes.
pub fn build_router(state: AppState, config: &ServerConfig) -> Router {
    // Routes that carry `{id}` get the id extracted into the request scope.
    let task_routes = Router::new()
        .route(
            &format!("{TASKS_PATH}/{{{ID}}}"),
            get(tasks::get_by_id)
                .put(tasks::update)
                .delete(tasks::remove_by_id),
        )
        .route_layer(from_fn_with_state(PathParam::int(ID), extract_path_param));

    let router = Router::new()
        .route(
            TASKS_PATH,
            get(tasks::get_all)
                .post(tasks::add)
                .delete(tasks::remove_by_ids),
        )
        .merge(task_routes)
        .route("/api/health", get(health))
        .with_state(state);

    with_service_layers(router, config)
}

/// Wrap `router` in the stack shared by every route: request timeout (408),
/// panic recovery (500), permissive CORS and request tracing.
pub fn with_service_layers(router: Router, config: &ServerConfig) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    router
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            Duration::from_secs(config.request_timeout_secs),
        ))
        .layer(CatchPanicLayer::new())
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

/// Running server.
pub struct ServerHandle {
    addr: SocketAddr,
    shutdown_tx: Option<oneshot::Sender<()>>,
    task: JoinHandle<()>,
}

impl ServerHandle {
    /// Address the listener is bound to.
    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// Stop accepting connections and wait for in-flight requests.
    pub async fn shutdown(mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
        if let Err(e) = self.task.await {
            tracing::error!("Server task failed: {}", e);
        }
    }
}

/// Bind the configured address and serve in a background task.
pub async fn start_server(state: AppState, config: &ServerConfig) -> anyhow::Result<ServerHandle> {
    let app = build_router(state, config);

    let listener = tokio::net::TcpListener::bind((config.host.as_str(), config.port)).await?;
    let addr = listener.local_addr()?;

    info!("Server listening on http://{}", addr);

    let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();

    let task = tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app)
            .with_graceful_shutdown(async {
                let _ = shutdown_rx.await;
                info!("Server shutting down");
            })
            .await
        {
            tracing::error!("Server error: {}", e);
        }
    });

    Ok(ServerHandle {
        addr,
        shutdown_tx: Some(shutdown_tx),
        task,
    })
}
