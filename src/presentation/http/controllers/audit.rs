// src/presentation/http/controllers/audit.rs
use crate::application::{dto::AuditLogDto, queries::audit::AuditListParams};
use crate::domain::listing::Page;
use crate::presentation::http::error::{HttpResult, IntoHttpResult};
use crate::presentation::http::extractors::Authenticated;
use crate::presentation::http::response::ApiResponse;
use crate::presentation::http::state::HttpState;
use axum::{
    Extension, Json,
    extract::Query,
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use serde::Deserialize;

#[derive(Debug, Default, Deserialize)]
pub struct AuditListQuery {
    pub user: Option<String>,
    pub search: Option<String>,
    pub role: Option<String>,
    pub action: Option<String>,
    pub date: Option<String>,
    pub date_from: Option<String>,
    pub date_to: Option<String>,
    pub page: Option<u32>,
    pub per_page: Option<u32>,
    #[serde(default)]
    pub include_stats: bool,
}

impl From<AuditListQuery> for AuditListParams {
    fn from(query: AuditListQuery) -> Self {
        Self {
            user: query.user,
            search: query.search,
            role: query.role,
            action: query.action,
            date: query.date,
            date_from: query.date_from,
            date_to: query.date_to,
            page: query.page,
            per_page: query.per_page,
            include_stats: query.include_stats,
        }
    }
}

pub async fn list_audit_logs(
    Extension(state): Extension<HttpState>,
    Authenticated(user): Authenticated,
    Query(params): Query<AuditListQuery>,
) -> HttpResult<Json<ApiResponse<Page<AuditLogDto>>>> {
    let listing = state
        .services
        .audit_queries
        .list(&user, params.into())
        .await
        .into_http()?;

    let mut response = ApiResponse::data(listing.page);
    if let Some(stats) = listing.stats {
        response = response.with_stats(stats);
    }
    Ok(Json(response))
}

/// Streams the filtered trail as a CSV attachment rather than JSON.
pub async fn export_audit_logs(
    Extension(state): Extension<HttpState>,
    Authenticated(user): Authenticated,
    Query(params): Query<AuditListQuery>,
) -> HttpResult<Response> {
    let export = state
        .services
        .audit_queries
        .export_csv(&user, params.into())
        .await
        .into_http()?;

    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "text/csv".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", export.filename),
            ),
        ],
        export.body,
    )
        .into_response())
}
