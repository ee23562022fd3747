use axum::{extract::State, http::StatusCode, Json};
use serde_json::{json, Value};

use crate::{
    error::{AppError, AppResult},
    middleware::extract::{JsonBody, PathId},
    models::child::{AddChildRequest, ChildLoginRequest, ConnectChildRequest, UpdateStatusRequest},
    services::{children::ChildService, incidents::IncidentService},
    AppState,
};

fn child_not_found() -> AppError {
    AppError::not_found("Child not found")
}

pub async fn child_login(
    State(state): State<AppState>,
    JsonBody(body): JsonBody<ChildLoginRequest>,
) -> AppResult<Json<Value>> {
    let (family_code, name) = body.validate()?;
    let child = ChildService::login(&state.db, &family_code, &name).await?;

    Ok(Json(json!({
        "success": true,
        "message": "Login successful",
        "data": child,
    })))
}

pub async fn connect(
    State(state): State<AppState>,
    JsonBody(body): JsonBody<ConnectChildRequest>,
) -> AppResult<(StatusCode, Json<Value>)> {
    let (family_code, new) = body.validate()?;
    let child = ChildService::connect(&state.db, &family_code, &new).await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "success": true,
            "message": "Child connected successfully",
            "data": child,
        })),
    ))
}

pub async fn add_child(
    State(state): State<AppState>,
    JsonBody(body): JsonBody<AddChildRequest>,
) -> AppResult<(StatusCode, Json<Value>)> {
    let (parent_id, new) = body.validate()?;
    let child = ChildService::add(&state.db, parent_id, &new).await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "success": true,
            "message": "Child added successfully",
            "data": child,
        })),
    ))
}

pub async fn get_child(
    State(state): State<AppState>,
    PathId(id): PathId,
) -> AppResult<Json<Value>> {
    let child = ChildService::find_by_id(&state.db, id)
        .await?
        .ok_or_else(child_not_found)?;

    Ok(Json(json!({ "success": true, "data": child })))
}

pub async fn update_status(
    State(state): State<AppState>,
    PathId(id): PathId,
    JsonBody(body): JsonBody<UpdateStatusRequest>,
) -> AppResult<Json<Value>> {
    let status = body.validate()?;
    let child = ChildService::update_status(&state.db, id, status)
        .await?
        .ok_or_else(child_not_found)?;

    Ok(Json(json!({
        "success": true,
        "message": "Status updated",
        "data": child,
    })))
}

pub async fn remove_child(
    State(state): State<AppState>,
    PathId(id): PathId,
) -> AppResult<Json<Value>> {
    if !ChildService::remove(&state.db, id).await? {
        return Err(child_not_found());
    }

    Ok(Json(json!({ "success": true, "message": "Child removed successfully" })))
}

pub async fn list_incidents(
    State(state): State<AppState>,
    PathId(id): PathId,
) -> AppResult<Json<Value>> {
    ChildService::find_by_id(&state.db, id)
        .await?
        .ok_or_else(child_not_found)?;
    let incidents = IncidentService::list_for_child(&state.db, id).await?;

    Ok(Json(json!({
        "success": true,
        "count": incidents.len(),
        "data": incidents,
    })))
}
