//! HTTP surface.
//!
//! Routes are method-agnostic; path segments carry the arguments:
//!
//! - `/allocate/{job}/{executionNumber}/{preference?}` holds the request open
//!   until the job is matched, then answers with the grant.
//! - `/release/{job}/{executionNumber?}` frees the job's resource and re-runs
//!   matching before answering.
//! - `/state` and `/healthz` are read-only.
//!
//! No request timeout is installed: an allocation may wait indefinitely. A
//! handler that panics is answered with 500 `{"error": ...}`; the shared state
//! is never left half-updated because no handler panics while holding the lock.

use std::any::Any;
use std::future::Future;
use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::{StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::routing::any;
use axum::{Json, Router};
use tokio::net::TcpListener;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::trace::TraceLayer;

use crate::core::{Admission, ReleaseOutcome, Scheduler, SchedulerError};
use crate::runtime::api::{health, ErrorResponse, WarningResponse};

/// Scheduler handle shared by all handlers.
pub type SharedScheduler = Arc<Scheduler>;

/// Build the router over a scheduler.
pub fn router(scheduler: SharedScheduler) -> Router {
    let routes = Router::new()
        .route("/allocate/{job}", any(allocate_unnumbered))
        .route("/allocate/{job}/{execution}", any(allocate))
        .route(
            "/allocate/{job}/{execution}/{preference}",
            any(allocate_with_preference),
        )
        .route("/release/{job}", any(release))
        .route("/release/{job}/{execution}", any(release_execution))
        .route("/state", any(state))
        .route("/healthz", any(healthz))
        .fallback(not_found);
    with_request_boundary(routes).with_state(scheduler)
}

/// Wrap routes with request tracing and panic recovery.
pub fn with_request_boundary<S>(routes: Router<S>) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    routes
        .layer(CatchPanicLayer::custom(panic_response))
        .layer(TraceLayer::new_for_http())
}

/// Serve until `shutdown` resolves.
pub async fn serve<F>(
    listener: TcpListener,
    scheduler: SharedScheduler,
    shutdown: F,
) -> std::io::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    axum::serve(listener, router(scheduler))
        .with_graceful_shutdown(shutdown)
        .await
}

async fn allocate_unnumbered(
    State(scheduler): State<SharedScheduler>,
    Path(job): Path<String>,
) -> Response {
    admit(&scheduler, &job, "", None).await
}

async fn allocate(
    State(scheduler): State<SharedScheduler>,
    Path((job, execution)): Path<(String, String)>,
) -> Response {
    admit(&scheduler, &job, &execution, None).await
}

async fn allocate_with_preference(
    State(scheduler): State<SharedScheduler>,
    Path((job, execution, preference)): Path<(String, String, String)>,
) -> Response {
    admit(&scheduler, &job, &execution, Some(&preference)).await
}

async fn admit(
    scheduler: &Scheduler,
    job: &str,
    execution: &str,
    preference: Option<&str>,
) -> Response {
    tracing::info!(job, execution, ?preference, "received allocation request");
    match scheduler.admit(job, execution, preference) {
        Ok(Admission::Duplicate { warning }) => Json(WarningResponse { warning }).into_response(),
        Ok(Admission::Pending(pending)) => match pending.wait().await {
            Ok(grant) => Json(grant).into_response(),
            Err(err) => {
                tracing::error!(error = %err, job, "pending allocation dropped");
                error_response(StatusCode::INTERNAL_SERVER_ERROR, &err)
            }
        },
        Err(err @ SchedulerError::QueueFull(_)) => {
            error_response(StatusCode::SERVICE_UNAVAILABLE, &err)
        }
        Err(err) => {
            tracing::error!(error = %err, job, "allocation request failed");
            error_response(StatusCode::INTERNAL_SERVER_ERROR, &err)
        }
    }
}

async fn release(State(scheduler): State<SharedScheduler>, Path(job): Path<String>) -> Response {
    release_response(&scheduler, &job, None)
}

async fn release_execution(
    State(scheduler): State<SharedScheduler>,
    Path((job, execution)): Path<(String, String)>,
) -> Response {
    release_response(&scheduler, &job, Some(&execution))
}

fn release_response(scheduler: &Scheduler, job: &str, execution: Option<&str>) -> Response {
    tracing::info!(job, ?execution, "received release request");
    match scheduler.release(job, execution) {
        ReleaseOutcome::Released(released) => Json(released).into_response(),
        ReleaseOutcome::NotFound { warning } => Json(WarningResponse { warning }).into_response(),
    }
}

async fn state(State(scheduler): State<SharedScheduler>) -> Response {
    Json(scheduler.snapshot()).into_response()
}

async fn healthz() -> Response {
    Json(health()).into_response()
}

async fn not_found(uri: Uri) -> Response {
    tracing::warn!(%uri, "invalid endpoint requested");
    (StatusCode::NOT_FOUND, Json(ErrorResponse::not_found())).into_response()
}

fn panic_response(panic: Box<dyn Any + Send + 'static>) -> Response {
    let detail = panic
        .downcast_ref::<&str>()
        .map(|s| (*s).to_string())
        .or_else(|| panic.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "unknown panic".to_string());
    tracing::error!(panic = %detail, "request handler panicked");
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorResponse {
            error: "Internal Server Error".to_string(),
        }),
    )
        .into_response()
}

fn error_response(status: StatusCode, err: &SchedulerError) -> Response {
    (
        status,
        Json(ErrorResponse {
            error: err.to_string(),
        }),
    )
        .into_response()
}
