use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{
        Extension, Path, Query,
        rejection::{JsonRejection, QueryRejection},
    },
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};

use pizzapos_invoicing::InvoiceFilter;

use crate::app::services::AppServices;
use crate::app::{dto, errors};

pub fn router() -> Router {
    Router::new()
        .route("/", get(list_invoices).post(create_invoice))
        .route("/:id", get(get_invoice).put(replace_invoice).delete(delete_invoice))
}

/// `GET /invoices?from=YYYY-MM-DD&to=YYYY-MM-DD&q=term`, newest first.
pub async fn list_invoices(
    Extension(services): Extension<Arc<AppServices>>,
    filter: Result<Query<InvoiceFilter>, QueryRejection>,
) -> axum::response::Response {
    let Query(filter) = match filter {
        Ok(v) => v,
        Err(rejection) => return errors::query_rejection(rejection),
    };
    match services.pos.list_invoices(&filter) {
        Ok(invoices) => Json(invoices).into_response(),
        Err(e) => errors::service_error_to_response(e),
    }
}

pub async fn create_invoice(
    Extension(services): Extension<Arc<AppServices>>,
    body: Result<Json<dto::InvoiceBody>, JsonRejection>,
) -> axum::response::Response {
    let Json(body) = match body {
        Ok(v) => v,
        Err(rejection) => return errors::json_rejection(rejection),
    };
    let request = match body.into_request(services.default_tax_rate) {
        Ok(r) => r,
        Err(e) => return errors::domain_error_to_response(e),
    };
    match services.pos.create_invoice(request) {
        Ok(invoice) => (StatusCode::CREATED, Json(invoice)).into_response(),
        Err(e) => errors::service_error_to_response(e),
    }
}

pub async fn get_invoice(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id = match dto::parse_invoice_id(&id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    match services.pos.get_invoice(id) {
        Ok(invoice) => Json(invoice).into_response(),
        Err(e) => errors::service_error_to_response(e),
    }
}

pub async fn replace_invoice(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
    body: Result<Json<dto::InvoiceBody>, JsonRejection>,
) -> axum::response::Response {
    let id = match dto::parse_invoice_id(&id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    let Json(body) = match body {
        Ok(v) => v,
        Err(rejection) => return errors::json_rejection(rejection),
    };
    let request = match body.into_request(services.default_tax_rate) {
        Ok(r) => r,
        Err(e) => return errors::domain_error_to_response(e),
    };
    match services.pos.replace_invoice(id, request) {
        Ok(invoice) => Json(invoice).into_response(),
        Err(e) => errors::service_error_to_response(e),
    }
}

pub async fn delete_invoice(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id = match dto::parse_invoice_id(&id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    match services.pos.delete_invoice(id) {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => errors::service_error_to_response(e),
    }
}
