// src/presentation/http/controllers/clearances.rs
use crate::application::{
    commands::clearances::{CreateClearanceCommand, RegisterClearanceDocumentCommand},
    dto::{ClearanceDocumentDto, ClearanceDto},
    queries::clearances::ClearanceListParams,
};
use crate::domain::listing::Page;
use crate::presentation::http::controllers::shipments::DocumentRequest;
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
pub struct ClearanceListQuery {
    pub search: Option<String>,
    pub status: Option<String>,
    pub page: Option<u32>,
    pub per_page: Option<u32>,
}

#[derive(Debug, Deserialize)]
pub struct CreateClearanceRequest {
    pub shipment_id: i64,
    pub cha_id: Option<i64>,
    pub arrival_port: Option<String>,
    pub arrival_date: Option<NaiveDate>,
    pub duty_amount: Option<Decimal>,
    pub currency: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ClearanceStatusRequest {
    pub status: String,
}

#[derive(Debug, Deserialize)]
pub struct RegisterClearanceDocumentsRequest {
    #[serde(default)]
    pub documents: Vec<DocumentRequest>,
}

pub async fn list_clearances(
    Extension(state): Extension<HttpState>,
    Authenticated(user): Authenticated,
    Query(params): Query<ClearanceListQuery>,
) -> HttpResult<Json<ApiResponse<Page<ClearanceDto>>>> {
    let page = state
        .services
        .clearance_queries
        .list(
            &user,
            ClearanceListParams {
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

pub async fn get_clearance(
    Extension(state): Extension<HttpState>,
    Authenticated(user): Authenticated,
    Path(id): Path<i64>,
) -> HttpResult<Json<ApiResponse<ClearanceDto>>> {
    let clearance = state
        .services
        .clearance_queries
        .get(&user, id)
        .await
        .into_http()?;
    Ok(Json(ApiResponse::data(clearance)))
}

pub async fn create_clearance(
    Extension(state): Extension<HttpState>,
    Authenticated(user): Authenticated,
    ClientMeta(meta): ClientMeta,
    Json(payload): Json<CreateClearanceRequest>,
) -> HttpResult<Json<ApiResponse<ClearanceDto>>> {
    let clearance = state
        .services
        .clearance_commands
        .create_clearance(
            &user,
            &meta,
            CreateClearanceCommand {
                shipment_id: payload.shipment_id,
                cha_id: payload.cha_id,
                arrival_port: payload.arrival_port,
                arrival_date: payload.arrival_date,
                duty_amount: payload.duty_amount,
                currency: payload.currency,
            },
        )
        .await
        .into_http()?;
    Ok(Json(
        ApiResponse::data(clearance).with_message("Clearance created successfully"),
    ))
}

pub async fn update_clearance_status(
    Extension(state): Extension<HttpState>,
    Authenticated(user): Authenticated,
    ClientMeta(meta): ClientMeta,
    Path(id): Path<i64>,
    Json(payload): Json<ClearanceStatusRequest>,
) -> HttpResult<Json<ApiResponse<ClearanceDto>>> {
    let clearance = state
        .services
        .clearance_commands
        .update_status(&user, &meta, id, &payload.status)
        .await
        .into_http()?;
    Ok(Json(
        ApiResponse::data(clearance).with_message("Clearance status updated successfully"),
    ))
}

pub async fn register_clearance_documents(
    Extension(state): Extension<HttpState>,
    Authenticated(user): Authenticated,
    ClientMeta(meta): ClientMeta,
    Path(id): Path<i64>,
    Json(payload): Json<RegisterClearanceDocumentsRequest>,
) -> HttpResult<Json<ApiResponse<Vec<ClearanceDocumentDto>>>> {
    let documents = payload
        .documents
        .into_iter()
        .map(|document| RegisterClearanceDocumentCommand {
            file_name: document.file_name,
            file_path: document.file_path,
            mime_type: document.mime_type,
            file_size: document.file_size,
        })
        .collect();
    let stored = state
        .services
        .clearance_commands
        .register_documents(&user, &meta, id, documents)
        .await
        .into_http()?;
    Ok(Json(
        ApiResponse::data(stored).with_message("Documents uploaded successfully"),
    ))
}
