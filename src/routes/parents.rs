use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde_json::{json, Value};

use crate::{
    error::{AppError, AppResult},
    middleware::extract::{JsonBody, PathId},
    models::{
        auth::AuthenticatedParent,
        parent::{
            FamilyOwner, LoginRequest, ParentProfile, RegisterParentRequest, UpdateProfileRequest,
        },
    },
    services::{children::ChildService, incidents::IncidentService, parents::ParentService},
    AppState,
};

fn parent_not_found() -> AppError {
    AppError::not_found("Parent not found")
}

pub async fn register(
    State(state): State<AppState>,
    JsonBody(body): JsonBody<RegisterParentRequest>,
) -> AppResult<(StatusCode, Json<Value>)> {
    let new = body.validate()?;
    let parent = ParentService::register(&state.db, &new, state.config.bcrypt_cost).await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "success": true,
            "message": "Parent registered successfully",
            "data": ParentProfile::from(parent),
        })),
    ))
}

pub async fn login(
    State(state): State<AppState>,
    JsonBody(body): JsonBody<LoginRequest>,
) -> AppResult<Json<Value>> {
    let (email, password) = body.validate()?;
    let response = ParentService::login(
        &state.db,
        &email,
        &password,
        state.config.bcrypt_cost,
        &state.config.jwt_secret,
        state.config.jwt_expiry_days,
    )
    .await?;

    Ok(Json(json!({
        "success": true,
        "message": "Login successful",
        "data": response,
    })))
}

pub async fn me(
    State(state): State<AppState>,
    auth: AuthenticatedParent,
) -> AppResult<Json<Value>> {
    let parent = ParentService::find_by_id(&state.db, auth.parent_id)
        .await?
        .ok_or_else(parent_not_found)?;

    Ok(Json(json!({ "success": true, "data": ParentProfile::from(parent) })))
}

pub async fn get_parent(
    State(state): State<AppState>,
    PathId(id): PathId,
) -> AppResult<Json<Value>> {
    let parent = ParentService::find_by_id(&state.db, id)
        .await?
        .ok_or_else(parent_not_found)?;
    let children_count = ChildService::count_for_parent(&state.db, id).await?;

    let mut data = json!(ParentProfile::from(parent));
    data["childrenCount"] = json!(children_count);
    Ok(Json(json!({ "success": true, "data": data })))
}

pub async fn get_by_family_code(
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> AppResult<Json<Value>> {
    let parent = ParentService::find_by_family_code(&state.db, code.trim())
        .await?
        .ok_or_else(|| AppError::not_found("Invalid family code"))?;

    Ok(Json(json!({ "success": true, "data": FamilyOwner::from(parent) })))
}

pub async fn update_profile(
    State(state): State<AppState>,
    PathId(id): PathId,
    JsonBody(body): JsonBody<UpdateProfileRequest>,
) -> AppResult<Json<Value>> {
    let update = body.validate()?;
    let parent = ParentService::update_profile(&state.db, id, &update)
        .await?
        .ok_or_else(parent_not_found)?;

    Ok(Json(json!({
        "success": true,
        "message": "Profile updated successfully",
        "data": ParentProfile::from(parent),
    })))
}

pub async fn list_parents(State(state): State<AppState>) -> AppResult<Json<Value>> {
    let parents: Vec<ParentProfile> = ParentService::find_all(&state.db)
        .await?
        .into_iter()
        .map(ParentProfile::from)
        .collect();

    Ok(Json(json!({
        "success": true,
        "count": parents.len(),
        "data": parents,
    })))
}

pub async fn list_children(
    State(state): State<AppState>,
    PathId(id): PathId,
) -> AppResult<Json<Value>> {
    ParentService::find_by_id(&state.db, id)
        .await?
        .ok_or_else(parent_not_found)?;
    let children = ChildService::find_by_parent_id(&state.db, id).await?;

    Ok(Json(json!({
        "success": true,
        "count": children.len(),
        "data": children,
    })))
}

pub async fn list_incidents(
    State(state): State<AppState>,
    PathId(id): PathId,
) -> AppResult<Json<Value>> {
    ParentService::find_by_id(&state.db, id)
        .await?
        .ok_or_else(parent_not_found)?;
    let incidents = IncidentService::list_for_parent(&state.db, id).await?;

    Ok(Json(json!({
        "success": true,
        "count": incidents.len(),
        "data": incidents,
    })))
}
