//! Order detail handlers, nested under an order for listing and creation.

use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use tracing::info;

use ordo_core::validation::validate_new_detail;

use crate::dto::{CreateOrderDetailRequest, OrderDetailResponse};
use crate::error::{ApiError, ApiResult};
use crate::AppState;

/// `GET /api/orders/{id}/order-details`
pub async fn list_order_details(
    State(state): State<AppState>,
    order_id: Result<Path<i64>, PathRejection>,
) -> ApiResult<Json<Vec<OrderDetailResponse>>> {
    let Path(order_id) = order_id?;

    if !state.orders.exists(order_id).await? {
        return Err(ApiError::NotFound(format!("Order not found: {}", order_id)));
    }

    let details = state.order_details.list_by_order(order_id).await?;
    Ok(Json(details.into_iter().map(Into::into).collect()))
}

/// `POST /api/orders/{id}/order-details`
///
/// Validation runs before the order lookup, so a bad payload against a
/// missing order is a 400.
pub async fn create_order_detail(
    State(state): State<AppState>,
    order_id: Result<Path<i64>, PathRejection>,
    payload: Result<Json<CreateOrderDetailRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<OrderDetailResponse>)> {
    let Path(order_id) = order_id?;
    let Json(payload) = payload?;
    let new_detail = payload.into_domain()?;
    validate_new_detail(&new_detail)?;

    let detail = state.order_details.create(order_id, &new_detail).await?;
    info!(id = detail.id, order_id, "Order detail added");

    Ok((StatusCode::CREATED, Json(detail.into())))
}

/// `DELETE /api/order-details/{id}`
pub async fn delete_order_detail(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
) -> ApiResult<StatusCode> {
    let Path(id) = id?;

    state.order_details.delete(id).await?;
    info!(id, "Order detail removed");

    Ok(StatusCode::NO_CONTENT)
}
