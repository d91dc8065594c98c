//! # Error Types
//!
//! Domain-specific error types for farmstand-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  farmstand-core (this file)                                            │
//! │  ├── CoreError        - Domain rule violations                         │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  farmstand-store                                                       │
//! │  └── StoreError       - Local persistence failures                     │
//! │                                                                         │
//! │  farmstand-client                                                      │
//! │  └── ClientError      - Normalized, user-facing                        │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → ClientError → user message        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Domain rule violations.
#[derive(Debug, Error)]
pub enum CoreError {
    /// No cart line with this local id.
    #[error("Cart item not found: {0}")]
    CartItemNotFound(String),

    /// Cart has reached its line limit.
    #[error("Cart cannot have more than {max} items")]
    CartTooLarge { max: usize },

    /// Line quantity exceeds the per-item maximum.
    #[error("Quantity {requested} exceeds maximum allowed ({max})")]
    QuantityTooLarge { requested: u64, max: u32 },

    /// Requested quantity is more than the product has in stock.
    #[error("Only {available} of product {product_id} in stock (requested {requested})")]
    InsufficientStock {
        product_id: String,
        requested: u64,
        available: u64,
    },

    /// Line or cart total does not fit in the money representation.
    #[error("Cart total is out of range")]
    AmountOverflow,

    /// Order is past the point where the customer may cancel it.
    ///
    /// ## When This Occurs
    /// ```text
    /// cancel_order("ord-1")
    ///      │
    ///      ▼
    /// status = shipped  ──► OrderNotCancellable
    /// ```
    #[error("Order {order_id} is {status} and can no longer be cancelled")]
    OrderNotCancellable { order_id: String, status: String },

    /// Operation is restricted to another role.
    #[error("This action requires the {required} role (current role: {actual})")]
    RoleNotPermitted { required: String, actual: String },

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors, raised before any network call.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too short.
    #[error("{field} must be at least {min} characters")]
    TooShort { field: String, min: usize },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Invalid format (phone number, one-time code, ...).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = CoreError::OrderNotCancellable {
            order_id: "ord-1".to_string(),
            status: "shipped".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Order ord-1 is shipped and can no longer be cancelled"
        );

        let err = ValidationError::TooShort {
            field: "password".to_string(),
            min: 8,
        };
        assert_eq!(err.to_string(), "password must be at least 8 characters");
    }

    #[test]
    fn test_validation_converts_to_core_error() {
        let validation_err = ValidationError::Required {
            field: "phone".to_string(),
        };
        let core_err: CoreError = validation_err.into();
        assert!(matches!(core_err, CoreError::Validation(_)));
    }
}
