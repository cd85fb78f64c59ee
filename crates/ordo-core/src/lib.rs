//! # ordo-core: Pure Domain Logic for Ordo
//!
//! Domain types and rules for orders and their line items, with zero I/O
//! dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                          Ordo Architecture                              │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    ordo-api (axum)                              │   │
//! │  │    /api/orders ──► handlers ──► DTO mapping                     │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ ordo-core (THIS CRATE) ★                        │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌────────────┐  ┌───────────┐ │   │
//! │  │   │   types   │  │   money   │  │ pagination │  │ validation│ │   │
//! │  │   │   Order   │  │   Money   │  │ PageReq    │  │   rules   │ │   │
//! │  │   │OrderDetail│  │  Decimal  │  │ Paginated  │  │  checks   │ │   │
//! │  │   └───────────┘  └───────────┘  └────────────┘  └───────────┘ │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    ordo-db (Database Layer)                     │   │
//! │  │              SQLite queries, migrations, repositories           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Order, OrderDetail, OrderStatus, inputs)
//! - [`money`] - Money type with integer arithmetic
//! - [`pagination`] - Page requests and the paginated result envelope
//! - [`error`] - Domain error types
//! - [`validation`] - Field-level rules for incoming payloads
//!
//! ## Example Usage
//!
//! ```rust
//! use ordo_core::money::Money;
//! use ordo_core::types::{order_total, NewOrderDetail};
//!
//! let details = vec![NewOrderDetail {
//!     product_name: "Pen".to_string(),
//!     quantity: 2,
//!     price: Money::from_cents(150),
//! }];
//!
//! assert_eq!(order_total(&details), Some(Money::from_cents(300)));
//! ```

pub mod error;
pub mod money;
pub mod pagination;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::{ValidationError, ValidationErrors};
pub use money::Money;
pub use pagination::{PageRequest, Paginated};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Maximum length of customer and product names.
///
/// Matches the `VARCHAR(255)` columns in the schema.
pub const MAX_NAME_LENGTH: usize = 255;

/// Largest price, line total or order total an order may carry.
///
/// 9999999999999999.99, the top of the `decimal(18,2)` range order amounts
/// are kept in. Far enough below `i64::MAX` cents that adding two capped
/// amounts cannot overflow.
pub const MAX_AMOUNT: Money = Money::from_cents(999_999_999_999_999_999);

/// Page number used when the caller does not supply one.
pub const DEFAULT_PAGE_NUMBER: i64 = 1;

/// Page size used when the caller does not supply one.
pub const DEFAULT_PAGE_SIZE: i64 = 10;

/// Largest page a single list request may ask for.
pub const MAX_PAGE_SIZE: i64 = 100;
