use axum::Router;

pub mod dashboard;
pub mod invoices;
pub mod items;
pub mod system;

/// Router for all point-of-sale endpoints.
pub fn router() -> Router {
    Router::new()
        .nest("/items", items::router())
        .nest("/invoices", invoices::router())
        .nest("/dashboard", dashboard::router())
}
