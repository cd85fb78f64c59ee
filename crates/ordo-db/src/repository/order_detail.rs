//! # Order Detail Repository
//!
//! Database operations for order line items.
//!
//! Every write here also moves the parent order's total by the line total
//! and refreshes its `updated_at`, inside one transaction:
//!
//! ```text
//! create(order_id, d)                     delete(id)
//! ───────────────────                     ──────────
//! BEGIN                                   BEGIN
//! UPDATE orders                           DELETE FROM order_details
//!   SET total_cents += qty × price          RETURNING order_id, qty × price
//!   WHERE id = order_id                   UPDATE orders
//!     AND total stays ≤ MAX_AMOUNT          SET total_cents -= line total
//!   (0 rows → NotFound or                 COMMIT
//!    AmountOutOfRange, rollback)
//! INSERT INTO order_details
//! COMMIT
//! ```
//!
//! The increments are relative, so concurrent writers on the same order
//! never lose each other's adjustments. The range check sits in the same
//! UPDATE, so two concurrent adds cannot both pass it against a stale
//! total.

use async_trait::async_trait;
use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbError, DbResult};
use crate::repository::OrderDetailStore;
use ordo_core::{NewOrderDetail, OrderDetail, MAX_AMOUNT};

const DETAIL_COLUMNS: &str = "id, order_id, product_name, quantity, price_cents";

/// Repository for order detail database operations.
#[derive(Debug, Clone)]
pub struct OrderDetailRepository {
    pool: SqlitePool,
}

impl OrderDetailRepository {
    /// Creates a new OrderDetailRepository.
    pub fn new(pool: SqlitePool) -> Self {
        OrderDetailRepository { pool }
    }
}

#[async_trait]
impl OrderDetailStore for OrderDetailRepository {
    async fn list_by_order(&self, order_id: i64) -> DbResult<Vec<OrderDetail>> {
        let sql = format!("SELECT {DETAIL_COLUMNS} FROM order_details WHERE order_id = ?1 ORDER BY id");
        let details = sqlx::query_as::<_, OrderDetail>(&sql)
            .bind(order_id)
            .fetch_all(&self.pool)
            .await?;

        Ok(details)
    }

    async fn get_by_id(&self, id: i64) -> DbResult<Option<OrderDetail>> {
        let sql = format!("SELECT {DETAIL_COLUMNS} FROM order_details WHERE id = ?1");
        let detail = sqlx::query_as::<_, OrderDetail>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(detail)
    }

    async fn create(&self, order_id: i64, detail: &NewOrderDetail) -> DbResult<OrderDetail> {
        let line_total = detail
            .line_total()
            .filter(|t| *t <= MAX_AMOUNT)
            .ok_or_else(|| {
                DbError::AmountOutOfRange(format!(
                    "line total of {} x {} exceeds {}",
                    detail.quantity, detail.price, MAX_AMOUNT
                ))
            })?;
        let now = Utc::now();

        let mut tx = self.pool.begin().await?;

        // Touching the parent first takes the write lock and proves it exists.
        // `?4 - ?1` is never negative, the line total is already capped.
        let touched = sqlx::query(
            r#"
            UPDATE orders SET total_cents = total_cents + ?1, updated_at = ?2
            WHERE id = ?3 AND total_cents <= ?4 - ?1
            "#,
        )
        .bind(line_total.cents())
        .bind(now)
        .bind(order_id)
        .bind(MAX_AMOUNT.cents())
        .execute(&mut *tx)
        .await?
        .rows_affected();

        if touched == 0 {
            let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM orders WHERE id = ?1)")
                .bind(order_id)
                .fetch_one(&mut *tx)
                .await?;

            return Err(if exists {
                DbError::AmountOutOfRange(format!(
                    "adding {} to order {} exceeds {}",
                    line_total, order_id, MAX_AMOUNT
                ))
            } else {
                DbError::not_found("Order", order_id)
            });
        }

        let id = sqlx::query(
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

        tx.commit().await?;

        debug!(id, order_id, line_total_cents = line_total.cents(), "Added order detail");

        Ok(OrderDetail {
            id,
            order_id,
            product_name: detail.product_name.clone(),
            quantity: detail.quantity,
            price_cents: detail.price.cents(),
        })
    }

    async fn delete(&self, id: i64) -> DbResult<()> {
        let now = Utc::now();
        let mut tx = self.pool.begin().await?;

        let removed: Option<(i64, i64)> = sqlx::query_as(
            "DELETE FROM order_details WHERE id = ?1 RETURNING order_id, price_cents * quantity",
        )
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?;

        let (order_id, line_total_cents) =
            removed.ok_or_else(|| DbError::not_found("OrderDetail", id))?;

        sqlx::query(
            "UPDATE orders SET total_cents = total_cents - ?1, updated_at = ?2 WHERE id = ?3",
        )
        .bind(line_total_cents)
        .bind(now)
        .bind(order_id)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        debug!(id, order_id, line_total_cents, "Removed order detail");
        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::task::JoinSet;

    use crate::pool::{Database, DbConfig};
    use crate::repository::fixtures::{database, detail, order};
    use crate::repository::OrderStore;

    #[tokio::test]
    async fn test_add_then_remove_adjusts_total() {
        let db = database().await;
        let orders = db.orders();
        let details = db.order_details();

        let created = orders
            .create(&order("Alice", vec![detail("Pen", 2, 150)]))
            .await
            .unwrap();
        assert_eq!(created.total_cents, 300);

        let pad = details.create(created.id, &detail("Pad", 1, 400)).await.unwrap();
        assert_eq!(pad.order_id, created.id);

        let after_add = orders.get_by_id(created.id).await.unwrap().unwrap();
        assert_eq!(after_add.total_cents, 700);
        assert!(after_add.updated_at >= created.updated_at);

        let pen_id = created.details[0].id;
        details.delete(pen_id).await.unwrap();

        let after_remove = orders.get_by_id(created.id).await.unwrap().unwrap();
        assert_eq!(after_remove.total_cents, 400);
        assert_eq!(after_remove.details.len(), 1);
        assert_eq!(after_remove.details[0].product_name, "Pad");
        assert!(after_remove.updated_at >= after_add.updated_at);
    }

    #[tokio::test]
    async fn test_create_for_missing_order_stores_nothing() {
        let db = database().await;
        let details = db.order_details();

        let err = details.create(404, &detail("Pen", 1, 100)).await.unwrap_err();
        assert!(err.is_not_found());

        assert!(details.list_by_order(404).await.unwrap().is_empty());
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM order_details")
            .fetch_one(db.pool())
            .await
            .unwrap();
        assert_eq!(count, 0);
    }

    #[tokio::test]
    async fn test_get_and_list() {
        let db = database().await;
        let created = db
            .orders()
            .create(&order("Alice", vec![detail("Pen", 2, 150), detail("Pad", 1, 400)]))
            .await
            .unwrap();
        let details = db.order_details();

        let listed = details.list_by_order(created.id).await.unwrap();
        assert_eq!(listed, created.details);

        let fetched = details.get_by_id(listed[1].id).await.unwrap().unwrap();
        assert_eq!(fetched.product_name, "Pad");
        assert_eq!(fetched.price_cents, 400);

        assert!(details.get_by_id(9999).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_delete_missing_is_not_found() {
        let db = database().await;
        assert!(db.order_details().delete(1).await.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn test_total_matches_sum_after_many_changes() {
        let db = database().await;
        let orders = db.orders();
        let details = db.order_details();

        let created = orders.create(&order("Alice", vec![])).await.unwrap();

        let mut ids = Vec::new();
        for (qty, price) in [(1, 199), (3, 250), (2, 1), (5, 1000)] {
            ids.push(details.create(created.id, &detail("item", qty, price)).await.unwrap().id);
        }
        details.delete(ids[1]).await.unwrap();
        details.delete(ids[3]).await.unwrap();

        let stored = orders.get_by_id(created.id).await.unwrap().unwrap();
        assert_eq!(stored.total_cents, 199 + 2);
        assert_eq!(stored.details_total(), stored.total());
    }

    #[tokio::test]
    async fn test_add_past_amount_limit_is_rejected() {
        let db = database().await;
        let orders = db.orders();
        let details = db.order_details();
        let half = MAX_AMOUNT.cents() / 2 + 1;

        let created = orders
            .create(&order("Alice", vec![detail("Yacht", 1, half)]))
            .await
            .unwrap();

        let err = details.create(created.id, &detail("Jet", 1, half)).await.unwrap_err();
        assert!(matches!(err, DbError::AmountOutOfRange(_)));

        // Order is untouched and still readable
        let stored = orders.get_by_id(created.id).await.unwrap().unwrap();
        assert_eq!(stored.total_cents, half);
        assert_eq!(stored.details.len(), 1);

        // Landing exactly on the limit is allowed
        let rest = MAX_AMOUNT.cents() - half;
        details.create(created.id, &detail("Pen", 1, rest)).await.unwrap();
        let stored = orders.get_by_id(created.id).await.unwrap().unwrap();
        assert_eq!(stored.total(), MAX_AMOUNT);
        assert_eq!(stored.details_total(), stored.total());
    }

    #[tokio::test]
    async fn test_missing_order_wins_over_amount_limit() {
        let db = database().await;
        let err = db
            .order_details()
            .create(404, &detail("Yacht", 1, MAX_AMOUNT.cents()))
            .await
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_changes_keep_total_consistent() {
        let dir = tempfile::tempdir().unwrap();
        let url = format!("sqlite://{}", dir.path().join("ordo.db").display());
        let db = Database::new(DbConfig::new(url).max_connections(4))
            .await
            .unwrap();
        let order_id = db.orders().create(&order("Alice", vec![])).await.unwrap().id;

        let mut adds = JoinSet::new();
        for i in 1..=24 {
            let details = db.order_details();
            adds.spawn(async move { details.create(order_id, &detail("item", i, 100 + i)).await });
        }

        let mut ids = Vec::new();
        while let Some(joined) = adds.join_next().await {
            ids.push(joined.unwrap().unwrap().id);
        }
        assert_eq!(ids.len(), 24);

        // Half removed while the other half gets company
        let mut mixed = JoinSet::new();
        for (n, id) in ids.into_iter().enumerate() {
            let details = db.order_details();
            if n % 2 == 0 {
                mixed.spawn(async move { details.delete(id).await });
            } else {
                mixed.spawn(async move {
                    details.create(order_id, &detail("extra", 2, 999)).await.map(|_| ())
                });
            }
        }
        while let Some(joined) = mixed.join_next().await {
            joined.unwrap().unwrap();
        }

        let stored = db.orders().get_by_id(order_id).await.unwrap().unwrap();
        assert_eq!(stored.details.len(), 24);
        assert_eq!(stored.details_total(), stored.total());

        db.close().await;
    }
}
