//! # Validation Module
//!
//! Field-level rules for incoming order and order detail payloads.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: axum extractors                                              │
//! │  ├── JSON shape and field types (deserialization)                      │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE                                                  │
//! │  ├── Required / length / positivity rules                              │
//! │  └── Every failing field collected into ValidationErrors               │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Database (SQLite)                                            │
//! │  ├── NOT NULL / CHECK constraints                                      │
//! │  └── Foreign key constraints                                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use ordo_core::validation::validate_order_patch;
//! use ordo_core::{OrderPatch, OrderStatus};
//!
//! let patch = OrderPatch { customer_name: "".into(), status: OrderStatus::Completed };
//! let errors = validate_order_patch(&patch).unwrap_err();
//! assert_eq!(errors.iter().next().unwrap().field(), "customerName");
//! ```

use crate::error::{ValidationError, ValidationErrors, ValidationResult};
use crate::types::{order_total, NewOrder, NewOrderDetail, OrderPatch};
use crate::{MAX_AMOUNT, MAX_NAME_LENGTH};

// =============================================================================
// Field Rules
// =============================================================================

/// Required, at most [`MAX_NAME_LENGTH`] characters.
///
/// Whitespace-only counts as empty.
fn validate_name(field: &str, value: &str) -> ValidationResult<()> {
    if value.trim().is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    if value.chars().count() > MAX_NAME_LENGTH {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max: MAX_NAME_LENGTH,
        });
    }

    Ok(())
}

/// Validates an order's customer name.
///
/// ## Example
/// ```rust
/// use ordo_core::validation::validate_customer_name;
///
/// assert!(validate_customer_name("Alice").is_ok());
/// assert!(validate_customer_name("").is_err());
/// assert!(validate_customer_name(&"A".repeat(256)).is_err());
/// ```
pub fn validate_customer_name(name: &str) -> ValidationResult<()> {
    validate_name("customerName", name)
}

/// Validates a detail's product name.
pub fn validate_product_name(name: &str) -> ValidationResult<()> {
    validate_name("productName", name)
}

/// Quantity must be greater than zero.
pub fn validate_quantity(qty: i64) -> ValidationResult<()> {
    if qty <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }

    Ok(())
}

/// Unit price must be greater than zero and at most [`MAX_AMOUNT`], and so
/// must the line total it makes with the quantity.
pub fn validate_price(detail: &NewOrderDetail) -> ValidationResult<()> {
    if !detail.price.is_positive() {
        return Err(ValidationError::MustBePositive {
            field: "price".to_string(),
        });
    }

    if detail.price > MAX_AMOUNT {
        return Err(ValidationError::TooLarge {
            field: "price".to_string(),
            max: MAX_AMOUNT,
        });
    }

    // Only meaningful once quantity is known to be positive
    if detail.quantity > 0 && !detail.line_total().is_some_and(|t| t <= MAX_AMOUNT) {
        return Err(ValidationError::InvalidFormat {
            field: "price".to_string(),
            reason: format!("price multiplied by quantity exceeds {}", MAX_AMOUNT),
        });
    }

    Ok(())
}

// =============================================================================
// Payload Validators
// =============================================================================

/// Validates a single detail, as posted to `/orders/{id}/order-details`.
pub fn validate_new_detail(detail: &NewOrderDetail) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::new();
    errors.check(validate_product_name(&detail.product_name));
    errors.check(validate_quantity(detail.quantity));
    errors.check(validate_price(detail));
    errors.into_result()
}

/// Validates an order create payload, including every initial detail.
///
/// Detail failures are reported as `orderDetails[i].<field>`. When every
/// detail is valid on its own, their sum must still stay within
/// [`MAX_AMOUNT`].
pub fn validate_new_order(order: &NewOrder) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::new();
    errors.check(validate_customer_name(&order.customer_name));

    let mut details_valid = true;
    for (i, detail) in order.details.iter().enumerate() {
        if let Err(nested) = validate_new_detail(detail) {
            details_valid = false;
            errors.merge_nested(&format!("orderDetails[{}]", i), nested);
        }
    }

    if details_valid && !order_total(&order.details).is_some_and(|t| t <= MAX_AMOUNT) {
        errors.push(ValidationError::TooLarge {
            field: "orderDetails".to_string(),
            max: MAX_AMOUNT,
        });
    }

    errors.into_result()
}

/// Validates an order update payload.
pub fn validate_order_patch(patch: &OrderPatch) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::new();
    errors.check(validate_customer_name(&patch.customer_name));
    errors.into_result()
}

// =============================================================================
// Unit Tests
// =============================================================================
