// src/presentation/http/routes.rs
use crate::presentation::http::controllers::{
    audit, clearances, leads, orders, quotations, roles, shipments, users,
};
use crate::presentation::http::state::HttpState;
use axum::{
    Extension, Json, Router,
    routing::{get, post},
};
use serde_json::json;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

pub fn build_router(state: HttpState) -> Router {
    let api = Router::new()
        .route("/roles", get(roles::list_roles).post(roles::create_role))
        .route(
            "/roles/{id}",
            get(roles::get_role)
                .put(roles::update_role)
                .delete(roles::delete_role),
        )
        .route("/users", get(users::list_users).post(users::create_user))
        .route(
            "/users/{id}",
            get(users::get_user)
                .put(users::update_user)
                .delete(users::delete_user),
        )
        .route("/users/{id}/role", axum::routing::put(users::update_user_role))
        .route("/leads", get(leads::list_leads).post(leads::create_lead))
        .route(
            "/leads/{id}",
            get(leads::get_lead)
                .put(leads::update_lead)
                .delete(leads::delete_lead),
        )
        .route("/leads/{id}/status", post(leads::update_lead_status))
        .route(
            "/quotations",
            get(quotations::list_quotations).post(quotations::create_quotation),
        )
        .route(
            "/quotations/{id}",
            get(quotations::get_quotation)
                .put(quotations::update_quotation)
                .delete(quotations::delete_quotation),
        )
        .route(
            "/quotations/{id}/status",
            post(quotations::update_quotation_status),
        )
        .route(
            "/quotations/{id}/respond",
            post(quotations::respond_to_quotation),
        )
        .route("/orders", get(orders::list_orders).post(orders::create_order))
        .route("/orders/{id}", get(orders::get_order))
        .route("/orders/{id}/status", post(orders::update_order_status))
        .route("/orders/{id}/timeline", get(orders::get_order_timeline))
        .route(
            "/shipments",
            get(shipments::list_shipments).post(shipments::create_shipment),
        )
        .route("/shipments/{id}", get(shipments::get_shipment))
        .route(
            "/shipments/{id}/status",
            post(shipments::update_shipment_status),
        )
        .route(
            "/shipments/{id}/documents",
            post(shipments::register_shipment_documents),
        )
        .route(
            "/clearances",
            get(clearances::list_clearances).post(clearances::create_clearance),
        )
        .route("/clearances/{id}", get(clearances::get_clearance))
        .route(
            "/clearances/{id}/status",
            post(clearances::update_clearance_status),
        )
        .route(
            "/clearances/{id}/documents",
            post(clearances::register_clearance_documents),
        )
        .route("/audit-logs", get(audit::list_audit_logs))
        .route("/audit-logs/export", get(audit::export_audit_logs));

    Router::new()
        .route("/health", get(health))
        .nest("/api/v1", api)
        .layer(Extension(state))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

async fn health() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}
