//! # Error Types
//!
//! Domain-specific error types for ordo-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  ordo-core errors (this file)                                          │
//! │  ├── ValidationError   - One failed field rule                         │
//! │  └── ValidationErrors  - Every failed rule of one payload              │
//! │                                                                         │
//! │  ordo-db errors (separate crate)                                       │
//! │  └── DbError           - Database operation failures                   │
//! │                                                                         │
//! │  ordo-api errors (in app)                                              │
//! │  └── ApiError          - What HTTP clients see (400/404/500)           │
//! │                                                                         │
//! │  Flow: ValidationErrors ─┐                                             │
//! │        DbError ──────────┴──► ApiError ──► JSON response               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Every variant names the offending field
//! 3. Errors are enum variants, never String

use serde::Serialize;
use std::fmt;
use thiserror::Error;

use crate::money::Money;

// =============================================================================
// Validation Error
// =============================================================================

/// A single field rule failure.
///
/// `field` uses the JSON name of the payload field, prefixed with its
/// path for nested items (`orderDetails[1].quantity`).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must not exceed {max} characters")]
    TooLong { field: String, max: usize },

    /// Value must be greater than zero.
    #[error("{field} must be greater than 0")]
    MustBePositive { field: String },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Amount above the largest storable value.
    #[error("{field} must not exceed {max}")]
    TooLarge { field: String, max: Money },

    /// Value cannot be represented (e.g. line total overflow).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },
}

impl ValidationError {
    /// Returns the field this error refers to.
    pub fn field(&self) -> &str {
        match self {
            ValidationError::Required { field }
            | ValidationError::TooLong { field, .. }
            | ValidationError::MustBePositive { field }
            | ValidationError::OutOfRange { field, .. }
            | ValidationError::TooLarge { field, .. }
            | ValidationError::InvalidFormat { field, .. } => field,
        }
    }

    fn field_mut(&mut self) -> &mut String {
        match self {
            ValidationError::Required { field }
            | ValidationError::TooLong { field, .. }
            | ValidationError::MustBePositive { field }
            | ValidationError::OutOfRange { field, .. }
            | ValidationError::TooLarge { field, .. }
            | ValidationError::InvalidFormat { field, .. } => field,
        }
    }
}

// =============================================================================
// Validation Errors (collection)
// =============================================================================

/// All rule failures found in one payload.
///
/// Validators keep going after the first failure so a client sees every
/// bad field in one 400 response.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors(Vec<ValidationError>);

/// Wire form of one failure: `{ "field": ..., "message": ... }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldMessage {
    pub field: String,
    pub message: String,
}

impl ValidationErrors {
    /// Creates an empty collection.
    pub fn new() -> Self {
        ValidationErrors(Vec::new())
    }

    /// Records a failure.
    pub fn push(&mut self, error: ValidationError) {
        self.0.push(error);
    }

    /// Records the error of `result`, if any.
    pub fn check(&mut self, result: Result<(), ValidationError>) {
        if let Err(e) = result {
            self.push(e);
        }
    }

    /// Absorbs the failures of a nested item under `prefix`.
    ///
    /// ```rust
    /// use ordo_core::{ValidationError, ValidationErrors};
    ///
    /// let mut inner = ValidationErrors::new();
    /// inner.push(ValidationError::MustBePositive { field: "quantity".into() });
    ///
    /// let mut outer = ValidationErrors::new();
    /// outer.merge_nested("orderDetails[0]", inner);
    /// assert_eq!(outer.iter().next().unwrap().field(), "orderDetails[0].quantity");
    /// ```
    pub fn merge_nested(&mut self, prefix: &str, nested: ValidationErrors) {
        for mut error in nested.0 {
            let field = error.field_mut();
            *field = format!("{}.{}", prefix, field);
            self.0.push(error);
        }
    }

    /// Returns `Ok(())` when nothing failed.
    pub fn into_result(self) -> Result<(), ValidationErrors> {
        if self.0.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ValidationError> {
        self.0.iter()
    }

    /// Per-field messages for the response body.
    pub fn field_messages(&self) -> Vec<FieldMessage> {
        self.0
            .iter()
            .map(|e| FieldMessage {
                field: e.field().to_string(),
                message: e.to_string(),
            })
            .collect()
    }
}

impl From<ValidationError> for ValidationErrors {
    fn from(error: ValidationError) -> Self {
        ValidationErrors(vec![error])
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let messages: Vec<String> = self.0.iter().map(|e| e.to_string()).collect();
        write!(f, "{}", messages.join("; "))
    }
}

impl std::error::Error for ValidationErrors {}

/// Result type for single-rule checks.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// Unit Tests
// =============================================================================
