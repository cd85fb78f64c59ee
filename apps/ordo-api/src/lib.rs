//! # Ordo API
//!
//! REST server for orders and their line items.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                          Ordo API Server                                │
//! │                                                                         │
//! │  Client ──► axum Router (TraceLayer) ──► handler                       │
//! │                                            │                            │
//! │                          ordo-core validation (400 on failure)         │
//! │                                            │                            │
//! │                          Arc<dyn OrderStore / OrderDetailStore>        │
//! │                                            │                            │
//! │                                            ▼                            │
//! │                                   SQLite (ordo-db)                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod config;
pub mod dto;
pub mod error;
pub mod logging;
pub mod routes;

use std::sync::Arc;

use ordo_db::{Database, OrderDetailStore, OrderStore};

pub use routes::router;

/// Shared application state, cloned into every handler.
#[derive(Clone)]
pub struct AppState {
    pub orders: Arc<dyn OrderStore>,
    pub order_details: Arc<dyn OrderDetailStore>,
    pub db: Database,
}

impl AppState {
    /// Wires the SQLite repositories of `db` into the state.
    pub fn new(db: Database) -> Self {
        AppState {
            orders: Arc::new(db.orders()),
            order_details: Arc::new(db.order_details()),
            db,
        }
    }
}
