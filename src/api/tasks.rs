//! Task endpoint handlers.

use super::error::ApiError;
use super::middleware::Scope;
use super::server::AppState;
use crate::error::Error;
use crate::tasks::{BulkDeleteRequest, TaskResponse, UpsertTaskRequest};
use axum::{
    Json,
    body::Bytes,
    extract::State,
    http::{StatusCode, Uri, header},
    response::{IntoResponse, Response},
};
use serde::de::DeserializeOwned;
use tracing::{debug, error};

/// Scope key of the task id path parameter.
pub const ID: &str = "id";

const INVALID_CONTENT: &str = "Invalid request content";

/// `GET /api/v1/tasks`
pub async fn get_all(State(state): State<AppState>) -> Response {
    let tasks = state.service().get_all();
    if tasks.is_empty() {
        return StatusCode::NO_CONTENT.into_response();
    }

    debug!(payload = ?tasks, "GetAll response");
    Json(tasks).into_response()
}

/// `GET /api/v1/tasks/{id}`
pub async fn get_by_id(
    State(state): State<AppState>,
    scope: Scope,
) -> Result<Json<TaskResponse>, ApiError> {
    let id = task_id(&scope)?;

    let task = state
        .service()
        .get_by_id(id)
        .map_err(|err| failed("GetById", Some(id), err))?;

    debug!(payload = ?task, "GetById response");
    Ok(Json(task))
}

/// `POST /api/v1/tasks`
pub async fn add(
    State(state): State<AppState>,
    uri: Uri,
    body: Bytes,
) -> Result<impl IntoResponse, ApiError> {
    let mut request: UpsertTaskRequest = parse_body("Add", &body)?;
    if !request.is_valid(None) {
        error!(field = ID, "Add failed: invalid request content");
        return Err(ApiError::bad_request(INVALID_CONTENT));
    }
    request.id = None;

    let task = state.service().upsert(request).map_err(|err| {
        error!(error = %err, "Add failed");
        ApiError::internal(&err.to_string())
    })?;

    let location = format!("{}/{}", uri.path().trim_end_matches('/'), task.id);
    debug!(location = %location, payload = ?task, "Add response");

    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, location)],
        Json(task),
    ))
}

/// `PUT /api/v1/tasks/{id}`
///
/// Answers with the record as it was before the update.
pub async fn update(
    State(state): State<AppState>,
    scope: Scope,
    body: Bytes,
) -> Result<Json<TaskResponse>, ApiError> {
    let id = task_id(&scope)?;

    let mut request: UpsertTaskRequest = parse_body("Update", &body)?;
    if !request.is_valid(Some(id)) {
        error!(field = ID, id, "Update failed: invalid request content");
        return Err(ApiError::bad_request(INVALID_CONTENT));
    }
    request.id = Some(id);

    let previous = state
        .service()
        .upsert(request)
        .map_err(|err| failed("Update", Some(id), err))?;

    debug!(payload = ?previous, "Update response");
    Ok(Json(previous))
}

/// `DELETE /api/v1/tasks/{id}`
pub async fn remove_by_id(
    State(state): State<AppState>,
    scope: Scope,
) -> Result<StatusCode, ApiError> {
    let id = task_id(&scope)?;

    state
        .service()
        .remove_by_id(id)
        .map_err(|err| failed("RemoveById", Some(id), err))?;

    Ok(StatusCode::NO_CONTENT)
}

/// `DELETE /api/v1/tasks` with body `{"ids": [...]}`
///
/// Removes all listed tasks or none of them.
pub async fn remove_by_ids(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<StatusCode, ApiError> {
    let request: BulkDeleteRequest = parse_body("RemoveByIds", &body)?;

    state
        .service()
        .remove_by_ids(&request.ids)
        .map_err(|err| failed("RemoveByIds", None, err))?;

    Ok(StatusCode::NO_CONTENT)
}

/// Read the task id the extraction middleware stored in the request scope.
fn task_id(scope: &Scope) -> Result<i64, ApiError> {
    scope.param(ID).and_then(|cell| cell.as_int()).map_err(|err| {
        error!(error = %err, field = ID, "Cannot retrieve field from request scope");
        ApiError::internal("Unable to retrieve the Task Id")
    })
}

fn parse_body<T: DeserializeOwned>(operation: &'static str, body: &[u8]) -> Result<T, ApiError> {
    serde_json::from_slice(body).map_err(|err| {
        error!(
            error = %err,
            body = %String::from_utf8_lossy(body),
            "{} failed",
            operation
        );
        ApiError::bad_request(&err.to_string())
    })
}

/// Map a service error to a response, logging the ones that are not an
/// expected outcome.
fn failed(operation: &'static str, id: Option<i64>, err: Error) -> ApiError {
    if matches!(err, Error::Internal(_) | Error::InvalidArgument(_)) {
        error!(error = %err, id = ?id, "{} failed", operation);
    }
    err.into()
}
