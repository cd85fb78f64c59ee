//! # HTTP Routes
//!
//! ```text
//! GET    /health
//! GET    /api/orders?pageNumber=&pageSize=     orders::list_orders
//! POST   /api/orders                           orders::create_order
//! GET    /api/orders/{id}                      orders::get_order
//! PUT    /api/orders/{id}                      orders::update_order
//! DELETE /api/orders/{id}                      orders::delete_order
//! GET    /api/orders/{id}/order-details        order_details::list_order_details
//! POST   /api/orders/{id}/order-details        order_details::create_order_detail
//! DELETE /api/order-details/{id}               order_details::delete_order_detail
//! ```

pub mod health;
pub mod order_details;
pub mod orders;

use axum::routing::{delete, get};
use axum::Router;
use tower_http::trace::TraceLayer;

use crate::AppState;

/// Builds the application router with request tracing.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health))
        .route(
            "/api/orders",
            get(orders::list_orders).post(orders::create_order),
        )
        .route(
            "/api/orders/{id}",
            get(orders::get_order)
                .put(orders::update_order)
                .delete(orders::delete_order),
        )
        .route(
            "/api/orders/{id}/order-details",
            get(order_details::list_order_details).post(order_details::create_order_detail),
        )
        .route(
            "/api/order-details/{id}",
            delete(order_details::delete_order_detail),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
