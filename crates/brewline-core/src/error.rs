//! # Error Types
//!
//! Domain-specific error types for brewline-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  ShopError                                                             │
//! │  ├── Validation(ValidationError) - bad input / business rule broken    │
//! │  ├── Authentication              - no valid session                    │
//! │  ├── Authorization               - valid caller, missing capability    │
//! │  ├── NotFound                    - unknown order / product / line      │
//! │  └── Internal                    - collaborator failure (hashing...)   │
//! │                                                                         │
//! │  None of these are retryable: they describe caller misuse or an        │
//! │  invalid business state, never a transient fault.                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

use crate::types::{Category, OrderStatus};

// =============================================================================
// Shop Error
// =============================================================================

/// Top-level error returned by every fallible ordering operation.
#[derive(Debug, Error)]
pub enum ShopError {
    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Caller identity is missing or invalid.
    #[error("Authentication failed: {0}")]
    Authentication(String),

    /// Caller is known but lacks the required capability.
    ///
    /// ## When This Occurs
    /// - Customer tries an admin-only mutation (status update, catalog edit)
    /// - Customer tries to cancel or pay somebody else's order
    /// - Admin tries a customer-only action (add to cart, checkout)
    #[error("Permission denied: {0}")]
    Authorization(String),

    /// Entity does not exist.
    #[error("{entity} not found: {id}")]
    NotFound { entity: String, id: String },

    /// A collaborator failed in a way the caller cannot fix.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ShopError {
    /// Creates a NotFound error for a given entity type and ID.
    pub fn not_found(entity: impl Into<String>, id: impl Into<String>) -> Self {
        ShopError::NotFound {
            entity: entity.into(),
            id: id.into(),
        }
    }

    /// Creates an Authentication error.
    pub fn unauthenticated(reason: impl Into<String>) -> Self {
        ShopError::Authentication(reason.into())
    }

    /// Creates an Authorization error.
    pub fn forbidden(reason: impl Into<String>) -> Self {
        ShopError::Authorization(reason.into())
    }

    /// Machine-readable code for presentation layers.
    pub fn code(&self) -> &'static str {
        match self {
            ShopError::Validation(_) => "VALIDATION_ERROR",
            ShopError::Authentication(_) => "AUTHENTICATION_ERROR",
            ShopError::Authorization(_) => "AUTHORIZATION_ERROR",
            ShopError::NotFound { .. } => "NOT_FOUND",
            ShopError::Internal(_) => "INTERNAL_ERROR",
        }
    }
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input and business-rule validation failures.
///
/// Raised before any state is touched, so a failed operation leaves
/// carts, orders and payments exactly as they were.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too short.
    #[error("{field} must be at least {min} characters")]
    TooShort { field: String, min: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Value must be strictly positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Value must not be negative.
    #[error("{field} cannot be negative")]
    Negative { field: String },

    /// Amount does not fit in `Money`.
    #[error("{field} is too large")]
    TooLarge { field: String },

    /// Size is not one of S, M, L.
    #[error("Invalid size '{value}'. Must be S, M, or L")]
    InvalidSize { value: String },

    /// Size changes only make sense for drinks.
    #[error("Cannot update size for {category} items")]
    SizeNotApplicable { category: Category },

    /// Checkout was attempted with nothing in the cart.
    #[error("Cannot create order with empty cart")]
    EmptyCart,

    /// Order is READY or DELIVERED.
    #[error("Cannot cancel order that is {status}")]
    NotCancellable { status: OrderStatus },

    /// Settlement attempted before the order created its payment.
    #[error("Payment not initialized for order {order_id}")]
    PaymentNotInitialized { order_id: String },

    /// Payment attempted on a cancelled order.
    #[error("Order {order_id} is {status} and cannot be paid")]
    OrderClosed { order_id: String, status: OrderStatus },

    /// Product exists but is switched off in the catalog.
    #[error("Product {product_id} is not available")]
    ProductUnavailable { product_id: String },

    /// Duplicate value (e.g., duplicate username).
    #[error("{field} '{value}' already exists")]
    Duplicate { field: String, value: String },
}

// =============================================================================
// Result Type Aliases
// =============================================================================

/// Convenience type alias for Results with ShopError.
pub type ShopResult<T> = Result<T, ShopError>;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// Unit Tests
// =============================================================================
