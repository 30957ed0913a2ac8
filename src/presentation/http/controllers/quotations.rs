// src/presentation/http/controllers/quotations.rs
use crate::application::{
    commands::quotations::{CreateQuotationCommand, QuotationItemInput, UpdateQuotationCommand},
    dto::QuotationDto,
    queries::quotations::QuotationListParams,
};
use crate::domain::listing::Page;
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
pub struct QuotationListQuery {
    pub search: Option<String>,
    pub status: Option<String>,
    pub page: Option<u32>,
    pub per_page: Option<u32>,
}

#[derive(Debug, Deserialize)]
pub struct QuotationItemRequest {
    pub description: String,
    pub quantity: u32,
    pub unit: Option<String>,
    pub unit_price: Decimal,
}

#[derive(Debug, Deserialize)]
pub struct CreateQuotationRequest {
    pub customer_id: i64,
    pub date: NaiveDate,
    pub valid_until: NaiveDate,
    pub terms_and_conditions: Option<String>,
    #[serde(default)]
    pub items: Vec<QuotationItemRequest>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateQuotationRequest {
    #[serde(default)]
    pub items: Vec<QuotationItemRequest>,
}

#[derive(Debug, Deserialize)]
pub struct QuotationStatusRequest {
    pub status: String,
}

#[derive(Debug, Deserialize)]
pub struct QuotationResponseRequest {
    pub status: String,
    pub customer_note: Option<String>,
}

fn item_inputs(items: Vec<QuotationItemRequest>) -> Vec<QuotationItemInput> {
    items
        .into_iter()
        .map(|item| QuotationItemInput {
            description: item.description,
            quantity: item.quantity,
            unit: item.unit,
            unit_price: item.unit_price,
        })
        .collect()
}

pub async fn list_quotations(
    Extension(state): Extension<HttpState>,
    Authenticated(user): Authenticated,
    Query(params): Query<QuotationListQuery>,
) -> HttpResult<Json<ApiResponse<Page<QuotationDto>>>> {
    let page = state
        .services
        .quotation_queries
        .list(
            &user,
            QuotationListParams {
                search: params.search,
                status: params.status,
                page: params.page,
                per_page: params.per_page,
            },
        )
        .await
        .into_http()?;
    Ok(Json(ApiResponse::data(page)))
}

pub async fn get_quotation(
    Extension(state): Extension<HttpState>,
    Authenticated(user): Authenticated,
    Path(id): Path<i64>,
) -> HttpResult<Json<ApiResponse<QuotationDto>>> {
    let quotation = state
        .services
        .quotation_queries
        .get(&user, id)
        .await
        .into_http()?;
    Ok(Json(ApiResponse::data(quotation)))
}

pub async fn create_quotation(
    Extension(state): Extension<HttpState>,
    Authenticated(user): Authenticated,
    ClientMeta(meta): ClientMeta,
    Json(payload): Json<CreateQuotationRequest>,
) -> HttpResult<Json<ApiResponse<QuotationDto>>> {
    let quotation = state
        .services
        .quotation_commands
        .create_quotation(
            &user,
            &meta,
            CreateQuotationCommand {
                customer_id: payload.customer_id,
                date: payload.date,
                valid_until: payload.valid_until,
                terms_and_conditions: payload.terms_and_conditions,
                items: item_inputs(payload.items),
            },
        )
        .await
        .into_http()?;
    Ok(Json(
        ApiResponse::data(quotation).with_message("Quotation created successfully"),
    ))
}

pub async fn update_quotation(
    Extension(state): Extension<HttpState>,
    Authenticated(user): Authenticated,
    ClientMeta(meta): ClientMeta,
    Path(id): Path<i64>,
    Json(payload): Json<UpdateQuotationRequest>,
) -> HttpResult<Json<ApiResponse<QuotationDto>>> {
    let quotation = state
        .services
        .quotation_commands
        .update_quotation(
            &user,
            &meta,
            id,
            UpdateQuotationCommand {
                items: item_inputs(payload.items),
            },
        )
        .await
        .into_http()?;
    Ok(Json(
        ApiResponse::data(quotation).with_message("Quotation updated successfully"),
    ))
}

pub async fn update_quotation_status(
    Extension(state): Extension<HttpState>,
    Authenticated(user): Authenticated,
    ClientMeta(meta): ClientMeta,
    Path(id): Path<i64>,
    Json(payload): Json<QuotationStatusRequest>,
) -> HttpResult<Json<ApiResponse<QuotationDto>>> {
    let quotation = state
        .services
        .quotation_commands
        .update_status(&user, &meta, id, &payload.status)
        .await
        .into_http()?;
    Ok(Json(
        ApiResponse::data(quotation).with_message("Quotation status updated successfully"),
    ))
}

pub async fn respond_to_quotation(
    Extension(state): Extension<HttpState>,
    Authenticated(user): Authenticated,
    ClientMeta(meta): ClientMeta,
    Path(id): Path<i64>,
    Json(payload): Json<QuotationResponseRequest>,
) -> HttpResult<Json<ApiResponse<QuotationDto>>> {
    let quotation = state
        .services
        .quotation_commands
        .respond(&user, &meta, id, &payload.status, payload.customer_note)
        .await
        .into_http()?;
    Ok(Json(
        ApiResponse::data(quotation).with_message("Response recorded successfully"),
    ))
}

pub async fn delete_quotation(
    Extension(state): Extension<HttpState>,
    Authenticated(user): Authenticated,
    ClientMeta(meta): ClientMeta,
    Path(id): Path<i64>,
) -> HttpResult<Json<ApiResponse<()>>> {
    state
        .services
        .quotation_commands
        .delete_quotation(&user, &meta, id)
        .await
        .into_http()?;
    Ok(Json(
        ApiResponse::data(()).with_message("Quotation deleted successfully"),
    ))
}
