//! `/api/orders` handlers.

use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Json;
use tracing::info;

use ordo_core::validation::{validate_new_order, validate_order_patch};
use ordo_core::{PageRequest, Paginated};

use crate::dto::{CreateOrderRequest, OrderResponse, PageQuery, UpdateOrderRequest};
use crate::error::{ApiError, ApiResult};
use crate::AppState;

/// `GET /api/orders?pageNumber=&pageSize=`
pub async fn list_orders(
    State(state): State<AppState>,
    query: Result<Query<PageQuery>, QueryRejection>,
) -> ApiResult<Json<Paginated<OrderResponse>>> {
    let Query(query) = query?;
    let page = PageRequest::new(query.page_number(), query.page_size())?;

    let orders = state.orders.list(page).await?;
    Ok(Json(orders.map(OrderResponse::from)))
}

/// `GET /api/orders/{id}`
pub async fn get_order(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
) -> ApiResult<Json<OrderResponse>> {
    let Path(id) = id?;

    let order = state
        .orders
        .get_by_id(id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Order not found: {}", id)))?;

    Ok(Json(order.into()))
}

/// `POST /api/orders`
pub async fn create_order(
    State(state): State<AppState>,
    payload: Result<Json<CreateOrderRequest>, JsonRejection>,
) -> ApiResult<impl IntoResponse> {
    let Json(payload) = payload?;
    let new_order = payload.into_domain()?;
    validate_new_order(&new_order)?;

    let order = state.orders.create(&new_order).await?;
    info!(
        id = order.id,
        details = order.details.len(),
        total_cents = order.total_cents,
        "Order created"
    );

    let location = format!("/api/orders/{}", order.id);
    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, location)],
        Json(OrderResponse::from(order)),
    ))
}

/// `PUT /api/orders/{id}`
pub async fn update_order(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
    payload: Result<Json<UpdateOrderRequest>, JsonRejection>,
) -> ApiResult<Json<OrderResponse>> {
    let Path(id) = id?;
    let Json(payload) = payload?;
    let patch = payload.into_domain();
    validate_order_patch(&patch)?;

    let order = state.orders.update(id, &patch).await?;
    info!(id, status = ?order.status, "Order updated");

    Ok(Json(order.into()))
}

/// `DELETE /api/orders/{id}`
pub async fn delete_order(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
) -> ApiResult<StatusCode> {
    let Path(id) = id?;

    state.orders.delete(id).await?;
    info!(id, "Order deleted");

    Ok(StatusCode::NO_CONTENT)
}
