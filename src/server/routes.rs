//! Request handlers for the plan API

use super::session::SessionStore;
use crate::error::Error;
use crate::pipeline::{PlanOrchestrator, PlanSnapshot, Transition};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, warn};
use uuid::Uuid;

/// API response wrapper
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    fn error(message: String) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message),
        }
    }
}

/// Maps crate errors onto HTTP status codes.
///
/// Generation failures never get here: they are part of the snapshot.
#[derive(Debug)]
pub struct ApiError(Error);

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match &self.0 {
            Error::NotFound(_) => StatusCode::NOT_FOUND,
            Error::InvalidTransition(_) => StatusCode::CONFLICT,
            Error::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            warn!("Request failed: {}", self.0);
        } else {
            debug!("Request rejected ({}): {}", status, self.0);
        }
        (status, Json(ApiResponse::<()>::error(self.0.to_string()))).into_response()
    }
}

type ApiResult<T> = std::result::Result<Json<ApiResponse<T>>, ApiError>;

#[derive(Debug, Deserialize)]
pub struct CreatePlanRequest {
    pub description: String,
}

#[derive(Debug, Serialize)]
pub struct CreatedPlan {
    pub id: Uuid,
    pub state: Option<PlanSnapshot>,
}

pub async fn health_check() -> Json<ApiResponse<&'static str>> {
    Json(ApiResponse::success("Plan API is healthy"))
}

pub async fn create_plan(
    State(store): State<Arc<SessionStore>>,
    Json(request): Json<CreatePlanRequest>,
) -> ApiResult<CreatedPlan> {
    if request.description.trim().is_empty() {
        return Err(Error::Validation("City description must not be empty".to_string()).into());
    }

    let (id, orchestrator) = store.create().await;
    if let Err(e) = orchestrator.start(&request.description).await {
        store.remove(&id).await;
        return Err(e.into());
    }

    Ok(Json(ApiResponse::success(CreatedPlan {
        id,
        state: orchestrator.snapshot().await,
    })))
}

/// Start a new plan in an existing session, typically after a reset.
pub async fn start_plan(
    State(store): State<Arc<SessionStore>>,
    Path(id): Path<String>,
    Json(request): Json<CreatePlanRequest>,
) -> ApiResult<Option<PlanSnapshot>> {
    let orchestrator = lookup(&store, &id).await?;
    let transition = orchestrator.start(&request.description).await?;
    respond(&orchestrator, transition).await
}

pub async fn get_plan(
    State(store): State<Arc<SessionStore>>,
    Path(id): Path<String>,
) -> ApiResult<Option<PlanSnapshot>> {
    let orchestrator = lookup(&store, &id).await?;
    Ok(Json(ApiResponse::success(orchestrator.snapshot().await)))
}

pub async fn optimize_plan(
    State(store): State<Arc<SessionStore>>,
    Path(id): Path<String>,
) -> ApiResult<Option<PlanSnapshot>> {
    let orchestrator = lookup(&store, &id).await?;
    let transition = orchestrator.optimize().await?;
    respond(&orchestrator, transition).await
}

pub async fn finalize_plan(
    State(store): State<Arc<SessionStore>>,
    Path(id): Path<String>,
) -> ApiResult<Option<PlanSnapshot>> {
    let orchestrator = lookup(&store, &id).await?;
    let transition = orchestrator.finalize().await?;
    respond(&orchestrator, transition).await
}

pub async fn evaluate_plan(
    State(store): State<Arc<SessionStore>>,
    Path(id): Path<String>,
) -> ApiResult<Option<PlanSnapshot>> {
    let orchestrator = lookup(&store, &id).await?;
    let transition = orchestrator.evaluate().await?;
    respond(&orchestrator, transition).await
}

pub async fn reset_plan(
    State(store): State<Arc<SessionStore>>,
    Path(id): Path<String>,
) -> ApiResult<Option<PlanSnapshot>> {
    let orchestrator = lookup(&store, &id).await?;
    orchestrator.reset().await;
    Ok(Json(ApiResponse::success(None)))
}

pub async fn delete_plan(
    State(store): State<Arc<SessionStore>>,
    Path(id): Path<String>,
) -> ApiResult<Uuid> {
    let uuid = parse_id(&id)?;
    if !store.remove(&uuid).await {
        return Err(not_found(&id));
    }
    Ok(Json(ApiResponse::success(uuid)))
}

async fn lookup(store: &SessionStore, id: &str) -> Result<Arc<PlanOrchestrator>, ApiError> {
    let uuid = parse_id(id)?;
    store.get(&uuid).await.ok_or_else(|| not_found(id))
}

fn parse_id(id: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(id).map_err(|_| not_found(id))
}

fn not_found(id: &str) -> ApiError {
    Error::NotFound(format!("Plan session {id}")).into()
}

async fn respond(
    orchestrator: &PlanOrchestrator,
    transition: Transition,
) -> ApiResult<Option<PlanSnapshot>> {
    if transition == Transition::Superseded {
        debug!("Transition superseded by a reset; returning current state");
    }
    Ok(Json(ApiResponse::success(orchestrator.snapshot().await)))
}
