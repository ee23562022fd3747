use axum::{extract::State, http::StatusCode, Json};
use serde_json::{json, Value};

use crate::{
    error::{AppError, AppResult},
    middleware::extract::{JsonBody, PathId},
    models::incident::{CreateIncidentRequest, UpdateIncidentStatusRequest},
    services::incidents::IncidentService,
    AppState,
};

fn incident_not_found() -> AppError {
    AppError::not_found("Incident not found")
}

pub async fn create_incident(
    State(state): State<AppState>,
    JsonBody(body): JsonBody<CreateIncidentRequest>,
) -> AppResult<(StatusCode, Json<Value>)> {
    let new = body.validate()?;
    let incident = IncidentService::create(&state.db, &new).await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "success": true,
            "message": "Incident recorded",
            "data": incident,
        })),
    ))
}

pub async fn get_incident(
    State(state): State<AppState>,
    PathId(id): PathId,
) -> AppResult<Json<Value>> {
    let incident = IncidentService::find_by_id(&state.db, id)
        .await?
        .ok_or_else(incident_not_found)?;

    Ok(Json(json!({ "success": true, "data": incident })))
}

pub async fn update_status(
    State(state): State<AppState>,
    PathId(id): PathId,
    JsonBody(body): JsonBody<UpdateIncidentStatusRequest>,
) -> AppResult<Json<Value>> {
    let status = body.validate()?;
    let incident = IncidentService::update_status(&state.db, id, status)
        .await?
        .ok_or_else(incident_not_found)?;

    Ok(Json(json!({
        "success": true,
        "message": "Incident updated",
        "data": incident,
    })))
}

pub async fn remove_incident(
    State(state): State<AppState>,
    PathId(id): PathId,
) -> AppResult<Json<Value>> {
    if !IncidentService::remove(&state.db, id).await? {
        return Err(incident_not_found());
    }

    Ok(Json(json!({ "success": true, "message": "Incident removed" })))
}
