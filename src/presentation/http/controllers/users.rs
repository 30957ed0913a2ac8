// src/presentation/http/controllers/users.rs
use crate::application::{
    commands::users::{CreateUserCommand, UpdateUserCommand},
    dto::UserDto,
    queries::users::UserListParams,
};
use crate::domain::listing::Page;
use crate::presentation::http::controllers::double_option;
use crate::presentation::http::error::{HttpResult, IntoHttpResult};
use crate::presentation::http::extractors::{Authenticated, ClientMeta};
use crate::presentation::http::response::ApiResponse;
use crate::presentation::http::state::HttpState;
use axum::{
    Extension, Json,
    extract::{Path, Query},
};
use serde::Deserialize;

#[derive(Debug, Default, Deserialize)]
pub struct UserListQuery {
    pub search: Option<String>,
    pub role: Option<String>,
    pub status: Option<String>,
    pub page: Option<u32>,
    pub per_page: Option<u32>,
    #[serde(default)]
    pub include_stats: bool,
}

#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    pub role: String,
    pub status: Option<String>,
    pub company_name: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateUserRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub role: Option<String>,
    pub status: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    pub company_name: Option<Option<String>>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateUserRoleRequest {
    pub role: String,
}

pub async fn list_users(
    Extension(state): Extension<HttpState>,
    Authenticated(user): Authenticated,
    Query(params): Query<UserListQuery>,
) -> HttpResult<Json<ApiResponse<Page<UserDto>>>> {
    let listing = state
        .services
        .user_queries
        .list(
            &user,
            UserListParams {
                search: params.search,
                role: params.role,
                status: params.status,
                page: params.page,
                per_page: params.per_page,
                include_stats: params.include_stats,
            },
        )
        .await
        .into_http()?;

    let mut response = ApiResponse::data(listing.page);
    if let Some(stats) = listing.stats {
        response = response.with_stats(stats);
    }
    Ok(Json(response))
}

pub async fn get_user(
    Extension(state): Extension<HttpState>,
    Authenticated(user): Authenticated,
    Path(id): Path<i64>,
) -> HttpResult<Json<ApiResponse<UserDto>>> {
    let found = state.services.user_queries.get(&user, id).await.into_http()?;
    Ok(Json(ApiResponse::data(found)))
}

pub async fn create_user(
    Extension(state): Extension<HttpState>,
    Authenticated(user): Authenticated,
    ClientMeta(meta): ClientMeta,
    Json(payload): Json<CreateUserRequest>,
) -> HttpResult<Json<ApiResponse<UserDto>>> {
    let created = state
        .services
        .user_commands
        .create_user(
            &user,
            &meta,
            CreateUserCommand {
                name: payload.name,
                email: payload.email,
                password: payload.password,
                role: payload.role,
                status: payload.status,
                company_name: payload.company_name,
            },
        )
        .await
        .into_http()?;
    Ok(Json(
        ApiResponse::data(created).with_message("User created successfully"),
    ))
}

pub async fn update_user(
    Extension(state): Extension<HttpState>,
    Authenticated(user): Authenticated,
    ClientMeta(meta): ClientMeta,
    Path(id): Path<i64>,
    Json(payload): Json<UpdateUserRequest>,
) -> HttpResult<Json<ApiResponse<UserDto>>> {
    let updated = state
        .services
        .user_commands
        .update_user(
            &user,
            &meta,
            id,
            UpdateUserCommand {
                name: payload.name,
                email: payload.email,
                role: payload.role,
                status: payload.status,
                company_name: payload.company_name,
            },
        )
        .await
        .into_http()?;
    Ok(Json(
        ApiResponse::data(updated).with_message("User updated successfully"),
    ))
}

pub async fn update_user_role(
    Extension(state): Extension<HttpState>,
    Authenticated(user): Authenticated,
    ClientMeta(meta): ClientMeta,
    Path(id): Path<i64>,
    Json(payload): Json<UpdateUserRoleRequest>,
) -> HttpResult<Json<ApiResponse<UserDto>>> {
    let updated = state
        .services
        .user_commands
        .update_role(&user, &meta, id, &payload.role)
        .await
        .into_http()?;
    Ok(Json(
        ApiResponse::data(updated).with_message("User role updated successfully"),
    ))
}

pub async fn delete_user(
    Extension(state): Extension<HttpState>,
    Authenticated(user): Authenticated,
    ClientMeta(meta): ClientMeta,
    Path(id): Path<i64>,
) -> HttpResult<Json<ApiResponse<()>>> {
    state
        .services
        .user_commands
        .delete_user(&user, &meta, id)
        .await
        .into_http()?;
    Ok(Json(
        ApiResponse::data(()).with_message("User deleted successfully"),
    ))
}
