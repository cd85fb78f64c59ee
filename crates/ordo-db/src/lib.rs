//! # ordo-db: Database Layer for Ordo
//!
//! SQLite persistence for orders and order details, through sqlx.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                          Ordo Data Flow                                 │
//! │                                                                         │
//! │  axum handler (POST /orders/{id}/order-details)                        │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     ordo-db (THIS CRATE)                        │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌────────────────────┐  ┌────────────┐ │   │
//! │  │   │   Database    │    │   Repositories     │  │ Migrations │ │   │
//! │  │   │   (pool.rs)   │    │                    │  │ (embedded) │ │   │
//! │  │   │               │    │ OrderRepository    │  │            │ │   │
//! │  │   │ SqlitePool    │◄───│ OrderDetailRepo    │  │ 001_init   │ │   │
//! │  │   └───────────────┘    └────────────────────┘  └────────────┘ │   │
//! │  │                                                                 │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  SQLite file (DATABASE_URL, default sqlite://ordo.db)                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation and configuration
//! - [`migrations`] - Embedded database migrations
//! - [`error`] - Database error types
//! - [`repository`] - Store traits and their SQLite implementations
//!
//! ## Usage
//!
//! ```rust,ignore
//! use ordo_db::{Database, DbConfig, OrderStore};
//!
//! let db = Database::new(DbConfig::new("sqlite://ordo.db")).await?;
//! let order = db.orders().get_by_id(1).await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{DbError, DbResult};
pub use pool::{Database, DbConfig};

pub use repository::order::OrderRepository;
pub use repository::order_detail::OrderDetailRepository;
pub use repository::{OrderDetailStore, OrderStore};
