//! # Repository Module
//!
//! Data access for orders and their details.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Repository Pattern                                 │
//! │                                                                         │
//! │  HTTP handlers hold Arc<dyn OrderStore> / Arc<dyn OrderDetailStore>    │
//! │  and never see SQL:                                                    │
//! │                                                                         │
//! │  Handler                                                                │
//! │       │                                                                 │
//! │       │  store.create(&new_order)                                      │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    OrderRepository                              │   │
//! │  │  BEGIN                                                          │   │
//! │  │  INSERT INTO orders ...                                         │   │
//! │  │  INSERT INTO order_details ... (one per detail)                 │   │
//! │  │  COMMIT                                                         │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Order (ordo-core type)                                                │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//! - [`order::OrderRepository`] - order CRUD, paged listing, total recompute
//! - [`order_detail::OrderDetailRepository`] - detail add/remove with
//!   parent total adjustment

pub mod order;
pub mod order_detail;

use async_trait::async_trait;
use ordo_core::{NewOrder, NewOrderDetail, Order, OrderDetail, OrderPatch, PageRequest, Paginated};

use crate::error::DbResult;

/// Persistence operations on orders.
///
/// Every returned [`Order`] carries its details.
#[async_trait]
pub trait OrderStore: Send + Sync {
    /// One page of orders, newest first, plus the total order count.
    async fn list(&self, page: PageRequest) -> DbResult<Paginated<Order>>;

    /// The order with `id`, or `None`.
    async fn get_by_id(&self, id: i64) -> DbResult<Option<Order>>;

    /// Stores the order and its initial details atomically.
    ///
    /// The total is computed from the details; timestamps are set to now.
    async fn create(&self, order: &NewOrder) -> DbResult<Order>;

    /// Overwrites name and status, recomputes the total, refreshes `updated_at`.
    ///
    /// `DbError::NotFound` when no such order exists.
    async fn update(&self, id: i64, patch: &OrderPatch) -> DbResult<Order>;

    /// Deletes the order and, by cascade, its details.
    ///
    /// `DbError::NotFound` when no such order exists.
    async fn delete(&self, id: i64) -> DbResult<()>;

    /// True when an order with `id` exists.
    async fn exists(&self, id: i64) -> DbResult<bool>;
}

/// Persistence operations on order details.
///
/// Adding or removing a detail adjusts the parent order's total and
/// `updated_at` in the same transaction.
#[async_trait]
pub trait OrderDetailStore: Send + Sync {
    /// Details of one order, in insertion order. Empty for unknown orders.
    async fn list_by_order(&self, order_id: i64) -> DbResult<Vec<OrderDetail>>;

    /// The detail with `id`, or `None`.
    async fn get_by_id(&self, id: i64) -> DbResult<Option<OrderDetail>>;

    /// Adds a detail to an existing order.
    ///
    /// `DbError::NotFound` when the order doesn't exist and
    /// `DbError::AmountOutOfRange` when its total would pass
    /// `MAX_AMOUNT`. Either way nothing is stored.
    async fn create(&self, order_id: i64, detail: &NewOrderDetail) -> DbResult<OrderDetail>;

    /// Removes a detail.
    ///
    /// `DbError::NotFound` when no such detail exists.
    async fn delete(&self, id: i64) -> DbResult<()>;
}

// =============================================================================
// Test Fixtures
// =============================================================================
