use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, Query, State, rejection::JsonRejection},
    http::StatusCode,
    response::IntoResponse,
};

use crate::server::AppState;
use crate::server::dto::ComponentQuery;
use crate::server::response::{
    ApiError, ApiResponse, StoreOptionExt, StoreResultExt, json_body, parse_id,
};
use crate::types::{ComponentPatch, NewComponent, Validate};

pub async fn create_component(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<NewComponent>, JsonRejection>,
) -> impl IntoResponse {
    let req = json_body(payload, "failed to parse the component")?;
    req.validate()?;

    let component = state
        .store
        .create_component(&req)
        .api_err("failed to create the component")?;

    tracing::info!(
        id = component.id,
        project_id = component.project_id,
        "Component created"
    );

    Ok::<_, ApiError>((
        StatusCode::CREATED,
        Json(ApiResponse::success(
            "component is created successfully",
            component,
        )),
    ))
}

pub async fn get_component(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> impl IntoResponse {
    let id = parse_id(&id, "component")?;

    let component = state
        .store
        .get_component(id)
        .api_err("failed to get the component")?
        .or_not_found("component not found")?;

    Ok::<_, ApiError>(Json(ApiResponse::success(
        "component is retrieved successfully",
        component,
    )))
}

pub async fn filter_components(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ComponentQuery>,
) -> impl IntoResponse {
    let filter = params.into_filter()?;

    let components = state
        .store
        .filter_components(&filter)
        .api_err("failed to filter the components")?;

    if components.is_empty() {
        return Err(ApiError::not_found(
            "no components found for the specified project_id or name",
        ));
    }

    Ok::<_, ApiError>(Json(ApiResponse::success(
        "components are retrieved successfully",
        components,
    )))
}

pub async fn update_component(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    payload: Result<Json<ComponentPatch>, JsonRejection>,
) -> impl IntoResponse {
    let id = parse_id(&id, "component")?;

    state
        .store
        .get_component(id)
        .api_err("failed to get the component")?
        .or_not_found("component not found")?;

    let patch = json_body(payload, "failed to parse the component")?;
    patch.validate()?;

    let component = state
        .store
        .update_component(id, &patch)
        .api_err_or_not_found("component not found", "failed to update the component")?;

    Ok::<_, ApiError>(Json(ApiResponse::success(
        "component is updated successfully",
        component,
    )))
}

pub async fn delete_component(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> impl IntoResponse {
    let id = parse_id(&id, "component")?;

    let deleted = state
        .store
        .delete_component(id)
        .api_err("failed to delete the component")?;

    if !deleted {
        return Err(ApiError::not_found("component not found"));
    }

    tracing::info!(id, "Component deleted");

    Ok::<_, ApiError>(Json(ApiResponse::message(
        "component is deleted successfully",
    )))
}
