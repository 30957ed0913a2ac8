// src/presentation/http/controllers/shipments.rs
use crate::application::{
    commands::shipments::{CreateShipmentCommand, RegisterDocumentCommand},
    dto::{ShipmentDocumentDto, ShipmentDto},
    queries::shipments::ShipmentListParams,
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
use serde::Deserialize;

#[derive(Debug, Default, Deserialize)]
pub struct ShipmentListQuery {
    pub search: Option<String>,
    pub status: Option<String>,
    pub page: Option<u32>,
    pub per_page: Option<u32>,
    #[serde(default)]
    pub include_stats: bool,
}

#[derive(Debug, Deserialize)]
pub struct CreateShipmentRequest {
    pub order_id: i64,
    pub customer_id: Option<i64>,
    pub origin: Option<String>,
    pub destination: Option<String>,
    pub carrier_name: Option<String>,
    pub tracking_no: Option<String>,
    pub eta: Option<NaiveDate>,
    pub status: Option<String>,
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ShipmentStatusRequest {
    pub status: String,
}

#[derive(Debug, Deserialize)]
pub struct DocumentRequest {
    pub file_name: String,
    pub file_path: String,
    pub mime_type: Option<String>,
    pub file_size: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct RegisterDocumentsRequest {
    #[serde(default)]
    pub documents: Vec<DocumentRequest>,
}

pub(crate) fn document_commands(documents: Vec<DocumentRequest>) -> Vec<RegisterDocumentCommand> {
    documents
        .into_iter()
        .map(|document| RegisterDocumentCommand {
            file_name: document.file_name,
            file_path: document.file_path,
            mime_type: document.mime_type,
            file_size: document.file_size,
        })
        .collect()
}

pub async fn list_shipments(
    Extension(state): Extension<HttpState>,
    Authenticated(user): Authenticated,
    Query(params): Query<ShipmentListQuery>,
) -> HttpResult<Json<ApiResponse<Page<ShipmentDto>>>> {
    let listing = state
        .services
        .shipment_queries
        .list(
            &user,
            ShipmentListParams {
                search: params.search,
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

pub async fn get_shipment(
    Extension(state): Extension<HttpState>,
    Authenticated(user): Authenticated,
    Path(id): Path<i64>,
) -> HttpResult<Json<ApiResponse<ShipmentDto>>> {
    let shipment = state
        .services
        .shipment_queries
        .get(&user, id)
        .await
        .into_http()?;
    Ok(Json(ApiResponse::data(shipment)))
}

pub async fn create_shipment(
    Extension(state): Extension<HttpState>,
    Authenticated(user): Authenticated,
    ClientMeta(meta): ClientMeta,
    Json(payload): Json<CreateShipmentRequest>,
) -> HttpResult<Json<ApiResponse<ShipmentDto>>> {
    let shipment = state
        .services
        .shipment_commands
        .create_shipment(
            &user,
            &meta,
            CreateShipmentCommand {
                order_id: payload.order_id,
                customer_id: payload.customer_id,
                origin: payload.origin,
                destination: payload.destination,
                carrier_name: payload.carrier_name,
                tracking_no: payload.tracking_no,
                eta: payload.eta,
                status: payload.status,
                notes: payload.notes,
            },
        )
        .await
        .into_http()?;
    Ok(Json(
        ApiResponse::data(shipment).with_message("Shipment created successfully"),
    ))
}

pub async fn update_shipment_status(
    Extension(state): Extension<HttpState>,
    Authenticated(user): Authenticated,
    ClientMeta(meta): ClientMeta,
    Path(id): Path<i64>,
    Json(payload): Json<ShipmentStatusRequest>,
) -> HttpResult<Json<ApiResponse<ShipmentDto>>> {
    let shipment = state
        .services
        .shipment_commands
        .update_status(&user, &meta, id, &payload.status)
        .await
        .into_http()?;
    Ok(Json(
        ApiResponse::data(shipment).with_message("Shipment status updated successfully"),
    ))
}

pub async fn register_shipment_documents(
    Extension(state): Extension<HttpState>,
    Authenticated(user): Authenticated,
    ClientMeta(meta): ClientMeta,
    Path(id): Path<i64>,
    Json(payload): Json<RegisterDocumentsRequest>,
) -> HttpResult<Json<ApiResponse<Vec<ShipmentDocumentDto>>>> {
    let documents = state
        .services
        .shipment_commands
        .register_documents(&user, &meta, id, document_commands(payload.documents))
        .await
        .into_http()?;
    Ok(Json(
        ApiResponse::data(documents).with_message("Documents uploaded successfully"),
    ))
}
