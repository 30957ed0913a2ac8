// src/presentation/http/controllers/orders.rs
use crate::application::{
    commands::orders::CreateOrderCommand,
    dto::{OrderDto, OrderTimelineDto},
    queries::orders::OrderListParams,
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
pub struct OrderListQuery {
    pub search: Option<String>,
    pub status: Option<String>,
    pub page: Option<u32>,
    pub per_page: Option<u32>,
}

#[derive(Debug, Deserialize)]
pub struct CreateOrderRequest {
    pub customer_id: i64,
    pub supplier_id: Option<i64>,
    pub quotation_id: Option<i64>,
    pub origin_country: Option<String>,
    pub destination_port: Option<String>,
    pub invoice_value: Option<Decimal>,
    pub currency: Option<String>,
    pub expected_arrival_date: Option<NaiveDate>,
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct OrderStatusRequest {
    pub status: String,
    pub note: Option<String>,
}

pub async fn list_orders(
    Extension(state): Extension<HttpState>,
    Authenticated(user): Authenticated,
    Query(params): Query<OrderListQuery>,
) -> HttpResult<Json<ApiResponse<Page<OrderDto>>>> {
    let page = state
        .services
        .order_queries
        .list(
            &user,
            OrderListParams {
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

pub async fn get_order(
    Extension(state): Extension<HttpState>,
    Authenticated(user): Authenticated,
    Path(id): Path<i64>,
) -> HttpResult<Json<ApiResponse<OrderDto>>> {
    let order = state.services.order_queries.get(&user, id).await.into_http()?;
    Ok(Json(ApiResponse::data(order)))
}

pub async fn get_order_timeline(
    Extension(state): Extension<HttpState>,
    Authenticated(user): Authenticated,
    Path(id): Path<i64>,
) -> HttpResult<Json<ApiResponse<OrderTimelineDto>>> {
    let timeline = state
        .services
        .order_queries
        .timeline(&user, id)
        .await
        .into_http()?;
    Ok(Json(ApiResponse::data(timeline)))
}

pub async fn create_order(
    Extension(state): Extension<HttpState>,
    Authenticated(user): Authenticated,
    ClientMeta(meta): ClientMeta,
    Json(payload): Json<CreateOrderRequest>,
) -> HttpResult<Json<ApiResponse<OrderDto>>> {
    let order = state
        .services
        .order_commands
        .create_order(
            &user,
            &meta,
            CreateOrderCommand {
                customer_id: payload.customer_id,
                supplier_id: payload.supplier_id,
                quotation_id: payload.quotation_id,
                origin_country: payload.origin_country,
                destination_port: payload.destination_port,
                invoice_value: payload.invoice_value,
                currency: payload.currency,
                expected_arrival_date: payload.expected_arrival_date,
                notes: payload.notes,
            },
        )
        .await
        .into_http()?;
    Ok(Json(
        ApiResponse::data(order).with_message("Order created successfully"),
    ))
}

pub async fn update_order_status(
    Extension(state): Extension<HttpState>,
    Authenticated(user): Authenticated,
    ClientMeta(meta): ClientMeta,
    Path(id): Path<i64>,
    Json(payload): Json<OrderStatusRequest>,
) -> HttpResult<Json<ApiResponse<OrderDto>>> {
    let order = state
        .services
        .order_commands
        .update_status(&user, &meta, id, &payload.status, payload.note)
        .await
        .into_http()?;
    Ok(Json(
        ApiResponse::data(order).with_message("Order status updated successfully"),
    ))
}
