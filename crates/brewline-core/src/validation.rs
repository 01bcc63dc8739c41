//! # Validation Module
//!
//! Input validation rules shared by the core types and the stores.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Shop facade (brewline-store)                                 │
//! │  ├── Capability checks (admin / owner)                                 │
//! │  └── Cart limits from ShopConfig                                       │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE                                                  │
//! │  └── Field rules, called from constructors before any state changes    │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Type invariants                                              │
//! │  └── CartLine / Order / Payment keep fields private                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub use crate::error::ValidationResult;

use crate::error::ValidationError;
use crate::money::Money;

/// Minimum password length for customer and admin accounts.
pub const MIN_PASSWORD_LEN: usize = 6;

// =============================================================================
// String Validators
// =============================================================================

fn require(field: &str, value: &str) -> ValidationResult<()> {
    if value.trim().is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }
    Ok(())
}

pub fn validate_product_name(name: &str) -> ValidationResult<()> {
    require("product name", name)
}

pub fn validate_delivery_address(address: &str) -> ValidationResult<()> {
    require("delivery address", address)
}

pub fn validate_username(username: &str) -> ValidationResult<()> {
    require("username", username)
}

pub fn validate_phone_number(phone: &str) -> ValidationResult<()> {
    require("phone number", phone)
}

/// Passwords need at least [`MIN_PASSWORD_LEN`] characters.
pub fn validate_password(password: &str) -> ValidationResult<()> {
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(ValidationError::TooShort {
            field: "password".to_string(),
            min: MIN_PASSWORD_LEN,
        });
    }
    Ok(())
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Catalog and line prices must be strictly positive.
pub fn validate_unit_price(price: Money) -> ValidationResult<()> {
    if !price.is_positive() {
        return Err(ValidationError::MustBePositive {
            field: "price".to_string(),
        });
    }
    Ok(())
}

/// Quantity for an existing line: zero allowed (means remove).
pub fn validate_line_quantity(qty: i64) -> ValidationResult<()> {
    if qty < 0 {
        return Err(ValidationError::Negative {
            field: "quantity".to_string(),
        });
    }
    Ok(())
}

/// Quantity when adding to a cart.
///
/// ## Rules
/// - Must be positive (> 0)
/// - Must not exceed `max`
pub fn validate_add_quantity(qty: i64, max: i64) -> ValidationResult<()> {
    if qty <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }

    if qty > max {
        return Err(ValidationError::OutOfRange {
            field: "quantity".to_string(),
            min: 1,
            max,
        });
    }

    Ok(())
}

/// Fails once the cart already holds `max` lines.
pub fn validate_cart_size(current_lines: usize, max: usize) -> ValidationResult<()> {
    if current_lines >= max {
        return Err(ValidationError::OutOfRange {
            field: "cart lines".to_string(),
            min: 0,
            max: max as i64,
        });
    }
    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================
