use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Extension, Path, rejection::JsonRejection},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};

use pizzapos_catalog::{ItemPatch, NewItem};

use crate::app::services::AppServices;
use crate::app::{dto, errors};

pub fn router() -> Router {
    Router::new()
        .route("/", get(list_items).post(create_item))
        .route("/:id", get(get_item).put(update_item).delete(delete_item))
}

pub async fn list_items(
    Extension(services): Extension<Arc<AppServices>>,
) -> axum::response::Response {
    match services.pos.list_items() {
        Ok(items) => Json(items).into_response(),
        Err(e) => errors::service_error_to_response(e),
    }
}

pub async fn get_item(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id = match dto::parse_item_id(&id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    match services.pos.get_item(id) {
        Ok(item) => Json(item).into_response(),
        Err(e) => errors::service_error_to_response(e),
    }
}

pub async fn create_item(
    Extension(services): Extension<Arc<AppServices>>,
    body: Result<Json<NewItem>, JsonRejection>,
) -> axum::response::Response {
    let Json(body) = match body {
        Ok(v) => v,
        Err(rejection) => return errors::json_rejection(rejection),
    };
    match services.pos.create_item(body) {
        Ok(item) => (StatusCode::CREATED, Json(item)).into_response(),
        Err(e) => errors::service_error_to_response(e),
    }
}

pub async fn update_item(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
    body: Result<Json<ItemPatch>, JsonRejection>,
) -> axum::response::Response {
    let id = match dto::parse_item_id(&id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    let Json(patch) = match body {
        Ok(v) => v,
        Err(rejection) => return errors::json_rejection(rejection),
    };
    match services.pos.update_item(id, patch) {
        Ok(item) => Json(item).into_response(),
        Err(e) => errors::service_error_to_response(e),
    }
}

pub async fn delete_item(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id = match dto::parse_item_id(&id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    match services.pos.delete_item(id) {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => errors::service_error_to_response(e),
    }
}
