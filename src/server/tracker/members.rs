use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
    response::IntoResponse,
};

use crate::error::Error;
use crate::server::AppState;
use crate::server::response::{
    ApiError, ApiResponse, StoreOptionExt, StoreResultExt, json_body, parse_id,
};
use crate::types::{MemberPatch, NewMember, Validate};

const ALREADY_MEMBER: &str = "user is already a member of this project";

pub async fn create_member(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<NewMember>, JsonRejection>,
) -> impl IntoResponse {
    let req = json_body(payload, "failed to parse the member")?;
    req.validate()?;

    let existing = state
        .store
        .find_member(&req.user_id, req.project_id)
        .api_err("failed to check the membership")?;

    if existing.is_some() {
        return Err(ApiError::forbidden(ALREADY_MEMBER));
    }

    // The unique index still catches a concurrent insert of the same pair.
    let member = match state.store.create_member(&req) {
        Ok(member) => member,
        Err(Error::DuplicateKey) => return Err(ApiError::forbidden(ALREADY_MEMBER)),
        Err(e) => {
            tracing::error!("Failed to create member: {e}");
            return Err(ApiError::internal("failed to create the member"));
        }
    };

    tracing::info!(
        id = member.id,
        user_id = %member.user_id,
        project_id = member.project_id,
        "Member added"
    );

    Ok::<_, ApiError>((
        StatusCode::CREATED,
        Json(ApiResponse::success("member created successfully", member)),
    ))
}

pub async fn list_members(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let members = state
        .store
        .list_members()
        .api_err("failed to list the members")?;

    Ok::<_, ApiError>(Json(ApiResponse::success(
        "all members retrieved successfully",
        members,
    )))
}

pub async fn get_member(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> impl IntoResponse {
    let id = parse_id(&id, "member")?;

    let member = state
        .store
        .get_member(id)
        .api_err("failed to get the member")?
        .or_not_found("member not found")?;

    Ok::<_, ApiError>(Json(ApiResponse::success(
        "member is retrieved successfully",
        member,
    )))
}

pub async fn update_member(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    payload: Result<Json<MemberPatch>, JsonRejection>,
) -> impl IntoResponse {
    let id = parse_id(&id, "member")?;

    state
        .store
        .get_member(id)
        .api_err("failed to get the member")?
        .or_not_found("member not found")?;

    let patch = json_body(payload, "failed to parse the member")?;
    patch.validate()?;

    let member = state
        .store
        .update_member(id, &patch)
        .api_err_or_not_found("member not found", "failed to update the member")?;

    Ok::<_, ApiError>(Json(ApiResponse::success(
        "member ownership updated successfully",
        member,
    )))
}

pub async fn delete_member(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> impl IntoResponse {
    let id = parse_id(&id, "member")?;

    let deleted = state
        .store
        .delete_member(id)
        .api_err("failed to delete the member")?;

    if !deleted {
        return Err(ApiError::not_found("member not found"));
    }

    tracing::info!(id, "Member removed");

    Ok::<_, ApiError>(Json(ApiResponse::message("member is deleted successfully")))
}
