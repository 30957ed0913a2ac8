// src/presentation/http/controllers/roles.rs
use crate::application::dto::RoleDto;
use crate::presentation::http::error::{HttpResult, IntoHttpResult};
use crate::presentation::http::extractors::Authenticated;
use crate::presentation::http::response::ApiResponse;
use crate::presentation::http::state::HttpState;
use axum::{Extension, Json, extract::Path};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct RoleRequest {
    pub name: String,
}

pub async fn list_roles(
    Extension(state): Extension<HttpState>,
    Authenticated(user): Authenticated,
) -> HttpResult<Json<ApiResponse<Vec<RoleDto>>>> {
    let roles = state.services.role_queries.list(&user).await.into_http()?;
    Ok(Json(ApiResponse::data(roles)))
}

pub async fn get_role(
    Extension(state): Extension<HttpState>,
    Authenticated(user): Authenticated,
    Path(id): Path<i64>,
) -> HttpResult<Json<ApiResponse<RoleDto>>> {
    let role = state.services.role_queries.get(&user, id).await.into_http()?;
    Ok(Json(ApiResponse::data(role)))
}

pub async fn create_role(
    Extension(state): Extension<HttpState>,
    Authenticated(user): Authenticated,
    Json(payload): Json<RoleRequest>,
) -> HttpResult<Json<ApiResponse<RoleDto>>> {
    let role = state
        .services
        .role_commands
        .create_role(&user, &payload.name)
        .await
        .into_http()?;
    Ok(Json(
        ApiResponse::data(role).with_message("Role created successfully"),
    ))
}

pub async fn update_role(
    Extension(state): Extension<HttpState>,
    Authenticated(user): Authenticated,
    Path(id): Path<i64>,
    Json(payload): Json<RoleRequest>,
) -> HttpResult<Json<ApiResponse<RoleDto>>> {
    let role = state
        .services
        .role_commands
        .rename_role(&user, id, &payload.name)
        .await
        .into_http()?;
    Ok(Json(
        ApiResponse::data(role).with_message("Role updated successfully"),
    ))
}

pub async fn delete_role(
    Extension(state): Extension<HttpState>,
    Authenticated(user): Authenticated,
    Path(id): Path<i64>,
) -> HttpResult<Json<ApiResponse<()>>> {
    state
        .services
        .role_commands
        .delete_role(&user, id)
        .await
        .into_http()?;
    Ok(Json(
        ApiResponse::data(()).with_message("Role deleted successfully"),
    ))
}
