use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Extension, Query, rejection::QueryRejection},
    response::IntoResponse,
    routing::get,
};

use crate::app::services::AppServices;
use crate::app::{dto, errors};

pub fn router() -> Router {
    Router::new()
        .route("/metrics", get(metrics))
        .route("/top-items", get(top_items))
        .route("/recent-orders", get(recent_orders))
}

pub async fn metrics(Extension(services): Extension<Arc<AppServices>>) -> axum::response::Response {
    match services.pos.dashboard_metrics(services.growth_rate) {
        Ok(m) => Json(m).into_response(),
        Err(e) => errors::service_error_to_response(e),
    }
}

pub async fn top_items(
    Extension(services): Extension<Arc<AppServices>>,
    query: Result<Query<dto::LimitQuery>, QueryRejection>,
) -> axum::response::Response {
    let Query(query) = match query {
        Ok(v) => v,
        Err(rejection) => return errors::query_rejection(rejection),
    };
    let limit = query.limit.unwrap_or(services.top_items_limit);
    match services.pos.top_items(limit) {
        Ok(rows) => Json(rows).into_response(),
        Err(e) => errors::service_error_to_response(e),
    }
}

pub async fn recent_orders(
    Extension(services): Extension<Arc<AppServices>>,
    query: Result<Query<dto::LimitQuery>, QueryRejection>,
) -> axum::response::Response {
    let Query(query) = match query {
        Ok(v) => v,
        Err(rejection) => return errors::query_rejection(rejection),
    };
    let limit = query.limit.unwrap_or(services.recent_orders_limit);
    match services.pos.recent_orders(limit) {
        Ok(rows) => Json(rows).into_response(),
        Err(e) => errors::service_error_to_response(e),
    }
}
