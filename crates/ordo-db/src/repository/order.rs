//! # Order Repository
//!
//! Database operations for orders.
//!
//! ## Total Bookkeeping
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    orders.total_cents                                   │
//! │                                                                         │
//! │  create()  ── total = Σ line totals of the supplied details            │
//! │               (order row + detail rows in ONE transaction)             │
//! │                                                                         │
//! │  update()  ── total = (SELECT COALESCE(SUM(price_cents * quantity), 0) │
//! │                        FROM order_details WHERE order_id = id)         │
//! │               computed inside the UPDATE statement itself              │
//! │                                                                         │
//! │  detail add / remove ── see order_detail.rs                            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Listing Order
//! Newest first. `julianday()` normalizes the stored RFC 3339 text so rows
//! with different fractional-second widths still sort correctly; `id`
//! breaks ties.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use sqlx::{QueryBuilder, Sqlite, SqlitePool};
use tracing::debug;

use crate::error::{DbError, DbResult};
use crate::repository::OrderStore;
use ordo_core::{
    order_total, NewOrder, Order, OrderDetail, OrderPatch, PageRequest, Paginated, MAX_AMOUNT,
};

const ORDER_COLUMNS: &str = "id, customer_name, total_cents, status, created_at, updated_at";

/// Repository for order database operations.
#[derive(Debug, Clone)]
pub struct OrderRepository {
    pool: SqlitePool,
}

impl OrderRepository {
    /// Creates a new OrderRepository.
    pub fn new(pool: SqlitePool) -> Self {
        OrderRepository { pool }
    }

    /// Loads details for a batch of orders with one `IN (...)` query.
    async fn attach_details(&self, orders: &mut [Order]) -> DbResult<()> {
        if orders.is_empty() {
            return Ok(());
        }

        let mut qb: QueryBuilder<Sqlite> = QueryBuilder::new(
            "SELECT id, order_id, product_name, quantity, price_cents \
             FROM order_details WHERE order_id IN (",
        );
        let mut ids = qb.separated(", ");
        for order in orders.iter() {
            ids.push_bind(order.id);
        }
        ids.push_unseparated(") ORDER BY id");

        let details: Vec<OrderDetail> = qb.build_query_as().fetch_all(&self.pool).await?;

        let mut by_order: HashMap<i64, Vec<OrderDetail>> = HashMap::new();
        for detail in details {
            by_order.entry(detail.order_id).or_default().push(detail);
        }

        for order in orders.iter_mut() {
            order.details = by_order.remove(&order.id).unwrap_or_default();
        }

        Ok(())
    }
}

#[async_trait]
impl OrderStore for OrderRepository {
    async fn list(&self, page: PageRequest) -> DbResult<Paginated<Order>> {
        let total_count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM orders")
            .fetch_one(&self.pool)
            .await?;

        let sql = format!(
            "SELECT {ORDER_COLUMNS} FROM orders \
             ORDER BY julianday(created_at) DESC, id DESC \
             LIMIT ?1 OFFSET ?2"
        );
        let mut orders: Vec<Order> = sqlx::query_as::<_, Order>(&sql)
            .bind(page.limit())
            .bind(page.offset())
            .fetch_all(&self.pool)
            .await?;

        self.attach_details(&mut orders).await?;

        debug!(
            page = page.number(),
            size = page.size(),
            returned = orders.len(),
            total_count,
            "Listed orders"
        );

        Ok(Paginated::new(orders, page, total_count))
    }

    async fn get_by_id(&self, id: i64) -> DbResult<Option<Order>> {
        let sql = format!("SELECT {ORDER_COLUMNS} FROM orders WHERE id = ?1");
        let order: Option<Order> = sqlx::query_as::<_, Order>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        match order {
            Some(order) => {
                let mut found = [order];
                self.attach_details(&mut found).await?;
                let [order] = found;
                Ok(Some(order))
            }
            None => Ok(None),
        }
    }

    async fn create(&self, new_order: &NewOrder) -> DbResult<Order> {
        let now = Utc::now();
        let total = order_total(&new_order.details)
            .filter(|t| *t <= MAX_AMOUNT)
            .ok_or_else(|| {
                DbError::AmountOutOfRange(format!("order total exceeds {}", MAX_AMOUNT))
            })?;

        let mut tx = self.pool.begin().await?;

        let order_id = sqlx::query(
            r#"
            INSERT INTO orders (customer_name, total_cents, status, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?4)
            "#,
        )
        .bind(&new_order.customer_name)
        .bind(total.cents())
        .bind(new_order.status)
        .bind(now)
        .execute(&mut *tx)
        .await?
        .last_insert_rowid();

        let mut details = Vec::with_capacity(new_order.details.len());
        for detail in &new_order.details {
            let detail_id = sqlx::query(
                r#"
                INSERT INTO order_details (order_id, product_name, quantity, price_cents)
                VALUES (?1, ?2, ?3, ?4)
                "#,
            )
            .bind(order_id)
            .bind(&detail.product_name)
            .bind(detail.quantity)
            .bind(detail.price.cents())
            .execute(&mut *tx)
            .await?
            .last_insert_rowid();

            details.push(OrderDetail {
                id: detail_id,
                order_id,
                product_name: detail.product_name.clone(),
                quantity: detail.quantity,
                price_cents: detail.price.cents(),
            });
        }

        tx.commit().await?;

        debug!(
            id = order_id,
            details = details.len(),
            total_cents = total.cents(),
            "Created order"
        );

        Ok(Order {
            id: order_id,
            customer_name: new_order.customer_name.clone(),
            total_cents: total.cents(),
            status: new_order.status,
            created_at: now,
            updated_at: now,
            details,
        })
    }

    async fn update(&self, id: i64, patch: &OrderPatch) -> DbResult<Order> {
        let now = Utc::now();

        let result = sqlx::query(
            r#"
            UPDATE orders SET
                customer_name = ?1,
                status = ?2,
                total_cents = (
                    SELECT COALESCE(SUM(price_cents * quantity), 0)
                    FROM order_details
                    WHERE order_id = ?4
                ),
                updated_at = ?3
            WHERE id = ?4
            "#,
        )
        .bind(&patch.customer_name)
        .bind(patch.status)
        .bind(now)
        .bind(id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Order", id));
        }

        debug!(id, status = ?patch.status, "Updated order");

        // Gone only if deleted between the two statements
        self.get_by_id(id)
            .await?
            .ok_or_else(|| DbError::not_found("Order", id))
    }

    async fn delete(&self, id: i64) -> DbResult<()> {
        let result = sqlx::query("DELETE FROM orders WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Order", id));
        }

        debug!(id, "Deleted order");
        Ok(())
    }

    async fn exists(&self, id: i64) -> DbResult<bool> {
        let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM orders WHERE id = ?1)")
            .bind(id)
            .fetch_one(&self.pool)
            .await?;

        Ok(exists)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::fixtures::{database, detail, order};
    use crate::repository::OrderDetailStore;
    use ordo_core::OrderStatus;

    #[tokio::test]
    async fn test_create_with_details_sets_total() {
        let db = database().await;
        let orders = db.orders();

        let created = orders
            .create(&order("Alice", vec![detail("Pen", 2, 150), detail("Pad", 1, 400)]))
            .await
            .unwrap();

        assert!(created.id > 0);
        assert_eq!(created.total_cents, 700);
        assert_eq!(created.status, OrderStatus::Pending);
        assert_eq!(created.created_at, created.updated_at);
        assert_eq!(created.details.len(), 2);
        assert!(created.details.iter().all(|d| d.order_id == created.id));

        let stored = orders.get_by_id(created.id).await.unwrap().unwrap();
        assert_eq!(stored, created);
    }

    #[tokio::test]
    async fn test_create_without_details_has_zero_total() {
        let db = database().await;

        let created = db.orders().create(&order("Bob", vec![])).await.unwrap();

        assert_eq!(created.total_cents, 0);
        assert!(created.details.is_empty());
    }

    #[tokio::test]
    async fn test_create_over_amount_limit_stores_nothing() {
        let db = database().await;
        let orders = db.orders();
        let half = MAX_AMOUNT.cents() / 2 + 1;

        let err = orders
            .create(&order("Dave", vec![detail("Yacht", 1, half), detail("Jet", 1, half)]))
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::AmountOutOfRange(_)));

        let page = orders.list(PageRequest::new(1, 10).unwrap()).await.unwrap();
        assert_eq!(page.total_count, 0);
    }

    #[tokio::test]
    async fn test_create_is_atomic() {
        let db = database().await;
        let orders = db.orders();

        // quantity 0 violates the CHECK constraint on the second detail
        let err = orders
            .create(&order("Carol", vec![detail("Pen", 1, 100), detail("Pad", 0, 100)]))
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::ConstraintViolation { .. }));

        let page = orders.list(PageRequest::new(1, 10).unwrap()).await.unwrap();
        assert_eq!(page.total_count, 0);

        let details: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM order_details")
            .fetch_one(db.pool())
            .await
            .unwrap();
        assert_eq!(details, 0);
    }

    #[tokio::test]
    async fn test_get_missing_returns_none() {
        let db = database().await;
        assert!(db.orders().get_by_id(999).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_list_newest_first_with_paging() {
        let db = database().await;
        let orders = db.orders();

        let mut ids = Vec::new();
        for name in ["first", "second", "third"] {
            ids.push(orders.create(&order(name, vec![])).await.unwrap().id);
        }

        let page = orders.list(PageRequest::new(1, 2).unwrap()).await.unwrap();
        assert_eq!(page.total_count, 3);
        assert_eq!(page.total_pages, 2);
        let names: Vec<&str> = page.items.iter().map(|o| o.customer_name.as_str()).collect();
        assert_eq!(names, vec!["third", "second"]);

        let page = orders.list(PageRequest::new(2, 2).unwrap()).await.unwrap();
        assert_eq!(page.items.len(), 1);
        assert_eq!(page.items[0].id, ids[0]);

        let page = orders.list(PageRequest::new(5, 2).unwrap()).await.unwrap();
        assert!(page.items.is_empty());
        assert_eq!(page.total_count, 3);
    }

    #[tokio::test]
    async fn test_list_includes_details() {
        let db = database().await;
        let orders = db.orders();

        orders.create(&order("A", vec![detail("Pen", 1, 100)])).await.unwrap();
        orders
            .create(&order("B", vec![detail("Pad", 2, 50), detail("Ink", 1, 25)]))
            .await
            .unwrap();

        let page = orders.list(PageRequest::new(1, 10).unwrap()).await.unwrap();
        assert_eq!(page.items[0].details.len(), 2);
        assert_eq!(page.items[1].details.len(), 1);
        for o in &page.items {
            assert_eq!(o.details_total(), o.total());
        }
    }

    #[tokio::test]
    async fn test_update_overwrites_fields_and_recomputes_total() {
        let db = database().await;
        let orders = db.orders();

        let created = orders
            .create(&order("Alice", vec![detail("Pen", 2, 150)]))
            .await
            .unwrap();

        // Corrupt the stored total to prove update recomputes it
        sqlx::query("UPDATE orders SET total_cents = 1 WHERE id = ?1")
            .bind(created.id)
            .execute(db.pool())
            .await
            .unwrap();

        let updated = orders
            .update(
                created.id,
                &OrderPatch {
                    customer_name: "Alicia".to_string(),
                    status: OrderStatus::Completed,
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.customer_name, "Alicia");
        assert_eq!(updated.status, OrderStatus::Completed);
        assert_eq!(updated.total_cents, 300);
        assert_eq!(updated.created_at, created.created_at);
        assert!(updated.updated_at >= created.updated_at);
    }

    #[tokio::test]
    async fn test_update_missing_is_not_found() {
        let db = database().await;

        let err = db
            .orders()
            .update(
                42,
                &OrderPatch {
                    customer_name: "Nobody".to_string(),
                    status: OrderStatus::Canceled,
                },
            )
            .await
            .unwrap_err();

        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_delete_cascades_to_details() {
        let db = database().await;
        let orders = db.orders();

        let created = orders
            .create(&order("Alice", vec![detail("Pen", 2, 150), detail("Pad", 1, 400)]))
            .await
            .unwrap();
        let detail_id = created.details[0].id;

        orders.delete(created.id).await.unwrap();

        assert!(!orders.exists(created.id).await.unwrap());
        assert!(db.order_details().get_by_id(detail_id).await.unwrap().is_none());
        assert!(db
            .order_details()
            .list_by_order(created.id)
            .await
            .unwrap()
            .is_empty());
    }

    #[tokio::test]
    async fn test_delete_missing_is_not_found() {
        let db = database().await;
        assert!(db.orders().delete(7).await.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn test_exists() {
        let db = database().await;
        let orders = db.orders();

        let created = orders.create(&order("Alice", vec![])).await.unwrap();

        assert!(orders.exists(created.id).await.unwrap());
        assert!(!orders.exists(created.id + 1).await.unwrap());
    }
}
