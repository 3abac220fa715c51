use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;

use pizzapos_core::DomainError;
use pizzapos_infra::{ServiceError, StoreError};

pub fn service_error_to_response(err: ServiceError) -> axum::response::Response {
    match err {
        ServiceError::Domain(e) => domain_error_to_response(e),
        ServiceError::Store(e) => store_error_to_response(e),
    }
}

pub fn domain_error_to_response(err: DomainError) -> axum::response::Response {
    let message = err.to_string();
    match err {
        DomainError::Validation(_) => {
            json_error(StatusCode::BAD_REQUEST, "validation_error", message)
        }
        DomainError::InvalidQuantity(_) => {
            json_error(StatusCode::BAD_REQUEST, "invalid_quantity", message)
        }
        DomainError::InvalidId(_) => json_error(StatusCode::BAD_REQUEST, "invalid_id", message),
        DomainError::ItemNotFound(_) => {
            json_error(StatusCode::UNPROCESSABLE_ENTITY, "item_not_found", message)
        }
        DomainError::NotFound => json_error(StatusCode::NOT_FOUND, "not_found", message),
        DomainError::Conflict(_) => json_error(StatusCode::CONFLICT, "conflict", message),
        DomainError::InvariantViolation(_) => {
            tracing::error!(error = %message, "invariant violated");
            json_error(StatusCode::INTERNAL_SERVER_ERROR, "invariant_violation", message)
        }
    }
}

pub fn store_error_to_response(err: StoreError) -> axum::response::Response {
    let message = err.to_string();
    match err {
        StoreError::NotFound => json_error(StatusCode::NOT_FOUND, "not_found", message),
        StoreError::Conflict(_) => json_error(StatusCode::CONFLICT, "conflict", message),
        StoreError::Unavailable(_) => {
            tracing::error!(error = %message, "storage unavailable");
            json_error(StatusCode::SERVICE_UNAVAILABLE, "storage_unavailable", message)
        }
        StoreError::Corrupt { .. } => {
            tracing::error!(error = %message, "stored data is corrupt");
            json_error(StatusCode::INTERNAL_SERVER_ERROR, "storage_corrupt", message)
        }
    }
}

/// Malformed bodies (bad JSON, wrong types, negative prices) are client
/// errors.
pub fn json_rejection(rejection: JsonRejection) -> axum::response::Response {
    json_error(StatusCode::BAD_REQUEST, "validation_error", rejection.body_text())
}

pub fn query_rejection(rejection: QueryRejection) -> axum::response::Response {
    json_error(StatusCode::BAD_REQUEST, "validation_error", rejection.body_text())
}

pub fn json_error(
    status: StatusCode,
    code: &'static str,
    message: impl Into<String>,
) -> axum::response::Response {
    (
        status,
        axum::Json(json!({
            "error": code,
            "message": message.into(),
        })),
    )
        .into_response()
}
