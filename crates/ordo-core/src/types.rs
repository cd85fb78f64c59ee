//! # Domain Types
//!
//! Core domain types for orders and their line items.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐  1     * ┌─────────────────┐                       │
//! │  │     Order       │─────────►│  OrderDetail    │                       │
//! │  │  ─────────────  │  owns,   │  ─────────────  │                       │
//! │  │  id (store)     │  cascade │  id (store)     │                       │
//! │  │  customer_name  │  delete  │  order_id (FK)  │                       │
//! │  │  total_cents ◄──┼──────────┼─ Σ price × qty  │                       │
//! │  │  status         │          │  product_name   │                       │
//! │  │  created_at     │          │  quantity       │                       │
//! │  │  updated_at     │          │  price_cents    │                       │
//! │  └─────────────────┘          └─────────────────┘                       │
//! │                                                                         │
//! │  ┌─────────────────┐   Inputs (no id, no timestamps):                   │
//! │  │  OrderStatus    │   NewOrder, NewOrderDetail, OrderPatch             │
//! │  │  Pending        │                                                    │
//! │  │  Completed      │                                                    │
//! │  │  Canceled       │                                                    │
//! │  └─────────────────┘                                                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Total Invariant
//! `Order::total_cents` always equals the sum of `price_cents * quantity`
//! over the order's details. Callers never set it; the repositories in
//! ordo-db maintain it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::money::Money;

// =============================================================================
// Order Status
// =============================================================================

/// Lifecycle status of an order.
///
/// No transition rules are enforced: any status may follow any other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
pub enum OrderStatus {
    /// Order placed, not yet fulfilled.
    #[default]
    Pending,
    /// Order fulfilled.
    Completed,
    /// Order called off.
    Canceled,
}

// =============================================================================
// Order Detail
// =============================================================================

/// One stored line item of an order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct OrderDetail {
    pub id: i64,
    pub order_id: i64,
    pub product_name: String,
    pub quantity: i64,
    /// Unit price in cents.
    pub price_cents: i64,
}

impl OrderDetail {
    /// Returns the unit price as Money.
    #[inline]
    pub fn price(&self) -> Money {
        Money::from_cents(self.price_cents)
    }

    /// Returns `price × quantity`.
    #[inline]
    pub fn line_total(&self) -> Money {
        self.price() * self.quantity
    }
}

// =============================================================================
// Order
// =============================================================================

/// A stored order together with its details.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Order {
    pub id: i64,
    pub customer_name: String,
    /// Sum of all detail line totals, in cents.
    pub total_cents: i64,
    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Loaded separately from the `order_details` table.
    #[cfg_attr(feature = "sqlx", sqlx(skip))]
    pub details: Vec<OrderDetail>,
}

impl Order {
    /// Returns the stored total as Money.
    #[inline]
    pub fn total(&self) -> Money {
        Money::from_cents(self.total_cents)
    }

    /// Recomputes the total from the loaded details.
    ///
    /// Equal to [`Order::total`] whenever the details are fully loaded.
    pub fn details_total(&self) -> Money {
        self.details.iter().map(OrderDetail::line_total).sum()
    }
}

// =============================================================================
// Inputs
// =============================================================================

/// A line item to be stored, before the store assigns an id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewOrderDetail {
    pub product_name: String,
    pub quantity: i64,
    pub price: Money,
}

impl NewOrderDetail {
    /// Returns `price × quantity`, or `None` if it overflows.
    #[inline]
    pub fn line_total(&self) -> Option<Money> {
        self.price.checked_mul_quantity(self.quantity)
    }
}

/// An order to be created with zero or more initial details.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewOrder {
    pub customer_name: String,
    pub status: OrderStatus,
    pub details: Vec<NewOrderDetail>,
}

/// The fields an update may overwrite.
///
/// The total is deliberately absent: it is recomputed from stored details.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderPatch {
    pub customer_name: String,
    pub status: OrderStatus,
}

/// Sums the line totals of details supplied at creation time.
///
/// `None` if any line total or the running sum overflows i64 cents.
pub fn order_total(details: &[NewOrderDetail]) -> Option<Money> {
    details
        .iter()
        .try_fold(Money::zero(), |acc, d| acc.checked_add(d.line_total()?))
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn detail(id: i64, qty: i64, price_cents: i64) -> OrderDetail {
        OrderDetail {
            id,
            order_id: 1,
            product_name: format!("item-{}", id),
            quantity: qty,
            price_cents,
        }
    }

    #[test]
    fn test_order_status_default() {
        assert_eq!(OrderStatus::default(), OrderStatus::Pending);
    }

    #[test]
    fn test_order_status_json_form() {
        assert_eq!(
            serde_json::to_string(&OrderStatus::Canceled).unwrap(),
            "\"Canceled\""
        );
        let parsed: OrderStatus = serde_json::from_str("\"Completed\"").unwrap();
        assert_eq!(parsed, OrderStatus::Completed);
    }

    #[test]
    fn test_detail_line_total() {
        assert_eq!(detail(1, 2, 150).line_total().cents(), 300);
    }

    #[test]
    fn test_order_details_total() {
        let now = Utc::now();
        let order = Order {
            id: 1,
            customer_name: "Alice".to_string(),
            total_cents: 700,
            status: OrderStatus::Pending,
            created_at: now,
            updated_at: now,
            details: vec![detail(1, 2, 150), detail(2, 1, 400)],
        };

        assert_eq!(order.details_total(), order.total());
    }

    #[test]
    fn test_order_total_of_new_details() {
        let details = vec![
            NewOrderDetail {
                product_name: "Pen".to_string(),
                quantity: 2,
                price: Money::from_cents(150),
            },
            NewOrderDetail {
                product_name: "Pad".to_string(),
                quantity: 1,
                price: Money::from_cents(400),
            },
        ];

        assert_eq!(order_total(&details), Some(Money::from_cents(700)));
        assert_eq!(order_total(&[]), Some(Money::zero()));
    }

    #[test]
    fn test_order_total_overflow() {
        let huge = NewOrderDetail {
            product_name: "Yacht".to_string(),
            quantity: 1,
            price: Money::from_cents(5_000_000_000_000_000_000),
        };

        assert!(huge.line_total().is_some());
        assert_eq!(order_total(&[huge.clone(), huge]), None);
    }
}
