// src/presentation/http/controllers/leads.rs
use crate::application::{
    commands::leads::{CreateLeadCommand, UpdateLeadCommand},
    dto::LeadDto,
    queries::leads::LeadListParams,
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
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Deserialize;

#[derive(Debug, Default, Deserialize)]
pub struct LeadListQuery {
    pub search: Option<String>,
    pub status: Option<String>,
    pub date: Option<String>,
    pub date_from: Option<String>,
    pub date_to: Option<String>,
    pub page: Option<u32>,
    pub per_page: Option<u32>,
}

#[derive(Debug, Deserialize)]
pub struct CreateLeadRequest {
    pub company: String,
    pub contact: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub value: Option<Decimal>,
    pub added_date: Option<NaiveDate>,
    pub last_contact: Option<NaiveDate>,
    pub status: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateLeadRequest {
    pub company: Option<String>,
    pub contact: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    pub email: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub phone: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub value: Option<Option<Decimal>>,
    #[serde(default, deserialize_with = "double_option")]
    pub added_date: Option<Option<NaiveDate>>,
    #[serde(default, deserialize_with = "double_option")]
    pub last_contact: Option<Option<NaiveDate>>,
    pub status: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct StatusRequest {
    pub status: String,
    pub note: Option<String>,
}

pub async fn list_leads(
    Extension(state): Extension<HttpState>,
    Authenticated(user): Authenticated,
    Query(params): Query<LeadListQuery>,
) -> HttpResult<Json<ApiResponse<Page<LeadDto>>>> {
    let page = state
        .services
        .lead_queries
        .list(
            &user,
            LeadListParams {
                search: params.search,
                status: params.status,
                date: params.date,
                date_from: params.date_from,
                date_to: params.date_to,
                page: params.page,
                per_page: params.per_page,
            },
        )
        .await
        .into_http()?;
    Ok(Json(ApiResponse::data(page)))
}

pub async fn get_lead(
    Extension(state): Extension<HttpState>,
    Authenticated(user): Authenticated,
    Path(id): Path<i64>,
) -> HttpResult<Json<ApiResponse<LeadDto>>> {
    let lead = state.services.lead_queries.get(&user, id).await.into_http()?;
    Ok(Json(ApiResponse::data(lead)))
}

pub async fn create_lead(
    Extension(state): Extension<HttpState>,
    Authenticated(user): Authenticated,
    ClientMeta(meta): ClientMeta,
    Json(payload): Json<CreateLeadRequest>,
) -> HttpResult<Json<ApiResponse<LeadDto>>> {
    let lead = state
        .services
        .lead_commands
        .create_lead(
            &user,
            &meta,
            CreateLeadCommand {
                company: payload.company,
                contact: payload.contact,
                email: payload.email,
                phone: payload.phone,
                value: payload.value,
                added_date: payload.added_date,
                last_contact: payload.last_contact,
                status: payload.status,
            },
        )
        .await
        .into_http()?;
    Ok(Json(
        ApiResponse::data(lead).with_message("Lead created successfully"),
    ))
}

pub async fn update_lead(
    Extension(state): Extension<HttpState>,
    Authenticated(user): Authenticated,
    ClientMeta(meta): ClientMeta,
    Path(id): Path<i64>,
    Json(payload): Json<UpdateLeadRequest>,
) -> HttpResult<Json<ApiResponse<LeadDto>>> {
    let lead = state
        .services
        .lead_commands
        .update_lead(
            &user,
            &meta,
            id,
            UpdateLeadCommand {
                company: payload.company,
                contact: payload.contact,
                email: payload.email,
                phone: payload.phone,
                value: payload.value,
                added_date: payload.added_date,
                last_contact: payload.last_contact,
                status: payload.status,
            },
        )
        .await
        .into_http()?;
    Ok(Json(
        ApiResponse::data(lead).with_message("Lead updated successfully"),
    ))
}

pub async fn update_lead_status(
    Extension(state): Extension<HttpState>,
    Authenticated(user): Authenticated,
    ClientMeta(meta): ClientMeta,
    Path(id): Path<i64>,
    Json(payload): Json<StatusRequest>,
) -> HttpResult<Json<ApiResponse<LeadDto>>> {
    let lead = state
        .services
        .lead_commands
        .update_status(&user, &meta, id, &payload.status, payload.note)
        .await
        .into_http()?;
    Ok(Json(
        ApiResponse::data(lead).with_message("Lead status updated successfully"),
    ))
}

pub async fn delete_lead(
    Extension(state): Extension<HttpState>,
    Authenticated(user): Authenticated,
    ClientMeta(meta): ClientMeta,
    Path(id): Path<i64>,
) -> HttpResult<Json<ApiResponse<()>>> {
    state
        .services
        .lead_commands
        .delete_lead(&user, &meta, id)
        .await
        .into_http()?;
    Ok(Json(
        ApiResponse::data(()).with_message("Lead deleted successfully"),
    ))
}
