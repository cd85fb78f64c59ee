//! # Data Transfer Objects
//!
//! JSON shapes exchanged over HTTP. Field names are camelCase and money
//! travels as a JSON number (`rust_decimal::Decimal` on this side), while
//! the domain keeps integer cents.
//!
//! ```text
//! CreateOrderRequest ──into_domain()──► NewOrder ──► OrderStore::create
//!                                                         │
//! OrderResponse ◄──────────From<Order>────────────────────┘
//! ```
//!
//! Missing strings and numbers deserialize to their empty value, so an
//! absent `customerName` surfaces as a field validation error rather than
//! a decoding failure.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use ordo_core::{
    Money, NewOrder, NewOrderDetail, Order, OrderDetail, OrderPatch, OrderStatus,
    ValidationError, ValidationErrors, DEFAULT_PAGE_NUMBER, DEFAULT_PAGE_SIZE, MAX_AMOUNT,
};

// =============================================================================
// Requests
// =============================================================================

/// `GET /api/orders` query string.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageQuery {
    pub page_number: Option<i64>,
    pub page_size: Option<i64>,
}

impl PageQuery {
    pub fn page_number(&self) -> i64 {
        self.page_number.unwrap_or(DEFAULT_PAGE_NUMBER)
    }

    pub fn page_size(&self) -> i64 {
        self.page_size.unwrap_or(DEFAULT_PAGE_SIZE)
    }
}

/// Body of `POST /api/orders/{id}/order-details`, also nested in order creation.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderDetailRequest {
    #[serde(default)]
    pub product_name: String,
    #[serde(default)]
    pub quantity: i64,
    #[serde(default, with = "rust_decimal::serde::float")]
    pub price: Decimal,
}

impl CreateOrderDetailRequest {
    /// Fails only when `price` does not fit in cents at all. Every other
    /// rule is checked by `validate_new_detail` on the result.
    pub fn into_domain(self) -> Result<NewOrderDetail, ValidationError> {
        let price = Money::from_decimal(self.price).ok_or_else(|| {
            if self.price.is_sign_negative() {
                ValidationError::MustBePositive {
                    field: "price".to_string(),
                }
            } else {
                ValidationError::TooLarge {
                    field: "price".to_string(),
                    max: MAX_AMOUNT,
                }
            }
        })?;

        Ok(NewOrderDetail {
            product_name: self.product_name,
            quantity: self.quantity,
            price,
        })
    }
}

/// Body of `POST /api/orders`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderRequest {
    #[serde(default)]
    pub customer_name: String,
    #[serde(default)]
    pub status: OrderStatus,
    #[serde(default)]
    pub order_details: Vec<CreateOrderDetailRequest>,
}

impl CreateOrderRequest {
    /// Converts every detail, reporting unconvertible prices as
    /// `orderDetails[i].price`.
    pub fn into_domain(self) -> Result<NewOrder, ValidationErrors> {
        let mut errors = ValidationErrors::new();
        let mut details = Vec::with_capacity(self.order_details.len());

        for (i, detail) in self.order_details.into_iter().enumerate() {
            match detail.into_domain() {
                Ok(detail) => details.push(detail),
                Err(e) => errors.merge_nested(&format!("orderDetails[{}]", i), e.into()),
            }
        }
        errors.into_result()?;

        Ok(NewOrder {
            customer_name: self.customer_name,
            status: self.status,
            details,
        })
    }
}

/// Body of `PUT /api/orders/{id}`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateOrderRequest {
    #[serde(default)]
    pub customer_name: String,
    #[serde(default)]
    pub status: OrderStatus,
}

impl UpdateOrderRequest {
    pub fn into_domain(self) -> OrderPatch {
        OrderPatch {
            customer_name: self.customer_name,
            status: self.status,
        }
    }
}

// =============================================================================
// Responses
// =============================================================================

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderDetailResponse {
    pub id: i64,
    pub order_id: i64,
    pub product_name: String,
    pub quantity: i64,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
}

impl From<OrderDetail> for OrderDetailResponse {
    fn from(detail: OrderDetail) -> Self {
        OrderDetailResponse {
            price: detail.price().to_decimal(),
            id: detail.id,
            order_id: detail.order_id,
            product_name: detail.product_name,
            quantity: detail.quantity,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderResponse {
    pub id: i64,
    pub customer_name: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub total_amount: Decimal,
    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub order_details: Vec<OrderDetailResponse>,
}

impl From<Order> for OrderResponse {
    fn from(order: Order) -> Self {
        OrderResponse {
            total_amount: order.total().to_decimal(),
            id: order.id,
            customer_name: order.customer_name,
            status: order.status,
            created_at: order.created_at,
            updated_at: order.updated_at,
            order_details: order.details.into_iter().map(Into::into).collect(),
        }
    }
}

/// Body of `GET /health`.
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_order_request_defaults() {
        let req: CreateOrderRequest = serde_json::from_str(r#"{"customerName":"Alice"}"#).unwrap();

        assert_eq!(req.status, OrderStatus::Pending);
        assert!(req.order_details.is_empty());

        let req: CreateOrderRequest = serde_json::from_str("{}").unwrap();
        assert!(req.customer_name.is_empty());
    }

    #[test]
    fn test_price_is_rounded_to_cents() {
        let req: CreateOrderDetailRequest =
            serde_json::from_str(r#"{"productName":"Pen","quantity":2,"price":1.505}"#).unwrap();
        let detail = req.into_domain().unwrap();

        // half to even: 1.505 → 1.50
        assert_eq!(detail.price.cents(), 150);
        assert_eq!(detail.quantity, 2);
    }

    #[test]
    fn test_integer_price_accepted() {
        let req: CreateOrderDetailRequest =
            serde_json::from_str(r#"{"productName":"Pad","quantity":1,"price":4}"#).unwrap();
        assert_eq!(req.into_domain().unwrap().price.cents(), 400);
    }

    #[test]
    fn test_price_beyond_cents_range_is_rejected() {
        let req: CreateOrderDetailRequest =
            serde_json::from_str(r#"{"productName":"Pad","quantity":1,"price":1e17}"#).unwrap();
        assert!(matches!(
            req.into_domain(),
            Err(ValidationError::TooLarge { .. })
        ));

        let req: CreateOrderRequest = serde_json::from_str(
            r#"{"customerName":"Alice","orderDetails":[
                {"productName":"Pen","quantity":1,"price":1.0},
                {"productName":"Pad","quantity":1,"price":-1e17}
            ]}"#,
        )
        .unwrap();
        let errors = req.into_domain().unwrap_err();
        let fields: Vec<&str> = errors.iter().map(|e| e.field()).collect();
        assert_eq!(fields, vec!["orderDetails[1].price"]);
    }

    #[test]
    fn test_order_response_shape() {
        let now = Utc::now();
        let order = Order {
            id: 7,
            customer_name: "Alice".to_string(),
            total_cents: 700,
            status: OrderStatus::Completed,
            created_at: now,
            updated_at: now,
            details: vec![OrderDetail {
                id: 1,
                order_id: 7,
                product_name: "Pen".to_string(),
                quantity: 2,
                price_cents: 350,
            }],
        };

        let json = serde_json::to_value(OrderResponse::from(order)).unwrap();

        assert_eq!(json["customerName"], "Alice");
        assert_eq!(json["totalAmount"].as_f64(), Some(7.0));
        assert_eq!(json["status"], "Completed");
        assert_eq!(json["orderDetails"][0]["orderId"], 7);
        assert_eq!(json["orderDetails"][0]["productName"], "Pen");
        assert_eq!(json["orderDetails"][0]["price"].as_f64(), Some(3.5));
        assert!(json.get("createdAt").is_some());
    }

    #[test]
    fn test_page_query_defaults() {
        let query = PageQuery::default();
        assert_eq!(query.page_number(), 1);
        assert_eq!(query.page_size(), 10);
    }
}
