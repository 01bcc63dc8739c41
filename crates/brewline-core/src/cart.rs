//! # Cart Line
//!
//! One priced, quantified selection of a product variant waiting for
//! checkout.
//!
//! ## Pricing
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  total = quantity × unit_price × multiplier                             │
//! │                                                                         │
//! │            │  S      M      L                                           │
//! │  ──────────┼─────────────────────                                       │
//! │  DRINK     │  0.8    1.0    1.3                                         │
//! │  FOOD      │  1.0    1.0    1.0    ← size never moves a food price      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Lifecycle
//! Created on add-to-cart with the catalog price frozen in. Quantity and
//! size stay editable until checkout moves the line into an `Order`.
//! A quantity of zero tells the owning cart to drop the line; the line
//! never deletes itself.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::catalog::CatalogEntry;
use crate::error::{ValidationError, ValidationResult};
use crate::money::Money;
use crate::types::{Category, Size};
use crate::validation::{validate_line_quantity, validate_unit_price};

/// A line item in a customer's cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CartLine {
    id: String,
    product_id: String,
    owner_id: String,
    quantity: i64,
    /// Catalog price at add time (frozen).
    unit_price: Money,
    category: Category,
    size: Size,
    #[ts(as = "String")]
    added_at: DateTime<Utc>,
}

impl CartLine {
    /// Creates a line with a fresh id.
    ///
    /// ## Errors
    /// - `Negative` if `quantity < 0`
    /// - `MustBePositive` if `unit_price <= 0`
    /// - `TooLarge` if the line total does not fit in `Money`
    ///
    /// ```rust
    /// use brewline_core::{CartLine, Category, Money, Size};
    ///
    /// let price = Money::from_minor(20_000);
    /// let line = CartLine::new("espresso", "cust-1", 2, price, Category::Drink, Size::S)?;
    /// assert_eq!(line.total_price().amount(), 32_000);
    /// # Ok::<(), brewline_core::ValidationError>(())
    /// ```
    pub fn new(
        product_id: impl Into<String>,
        owner_id: impl Into<String>,
        quantity: i64,
        unit_price: Money,
        category: Category,
        size: Size,
    ) -> ValidationResult<Self> {
        validate_line_quantity(quantity)?;
        validate_unit_price(unit_price)?;

        let line = CartLine {
            id: crate::new_id(),
            product_id: product_id.into(),
            owner_id: owner_id.into(),
            quantity,
            unit_price,
            category,
            size,
            added_at: Utc::now(),
        };
        line.checked_total_price()?;
        Ok(line)
    }

    /// Creates a line from a catalog snapshot.
    pub fn from_entry(
        entry: &CatalogEntry,
        owner_id: impl Into<String>,
        quantity: i64,
        size: Size,
    ) -> ValidationResult<Self> {
        CartLine::new(
            entry.product_id.clone(),
            owner_id,
            quantity,
            entry.unit_price,
            entry.category,
            size,
        )
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn product_id(&self) -> &str {
        &self.product_id
    }

    pub fn owner_id(&self) -> &str {
        &self.owner_id
    }

    pub fn quantity(&self) -> i64 {
        self.quantity
    }

    pub fn unit_price(&self) -> Money {
        self.unit_price
    }

    pub fn category(&self) -> Category {
        self.category
    }

    pub fn size(&self) -> Size {
        self.size
    }

    pub fn added_at(&self) -> DateTime<Utc> {
        self.added_at
    }

    /// Multiplier in basis points. Only drinks are affected by size.
    pub fn multiplier_bps(&self) -> u32 {
        size_multiplier(self.category, self.size)
    }

    /// `quantity × unit_price × multiplier`, rounded once.
    ///
    /// Every constructor and setter rejects edits whose total would not
    /// fit, so this only saturates for lines built by deserialization.
    pub fn total_price(&self) -> Money {
        self.checked_total_price().unwrap_or(Money::from_minor(i64::MAX))
    }

    /// [`CartLine::total_price`], or `TooLarge` on overflow.
    pub fn checked_total_price(&self) -> ValidationResult<Money> {
        line_total(self.unit_price, self.quantity, self.multiplier_bps())
    }

    /// Sets a new quantity. Zero is accepted and means "remove me".
    pub fn update_quantity(&mut self, quantity: i64) -> ValidationResult<()> {
        validate_line_quantity(quantity)?;
        line_total(self.unit_price, quantity, self.multiplier_bps())?;
        self.quantity = quantity;
        Ok(())
    }

    /// True once the quantity has been set to zero.
    pub fn is_depleted(&self) -> bool {
        self.quantity == 0
    }

    /// Sets a new size from its letter.
    ///
    /// Accepted for any category; a food line keeps its price regardless.
    /// Carts route edits through [`CartLine::update_drink_size`] instead.
    pub fn update_size(&mut self, size: &str) -> ValidationResult<()> {
        let size: Size = size.parse()?;
        self.resize(size)
    }

    /// Size update for the cart-management path: drinks only.
    ///
    /// The size letter is checked first, so `"Z"` on a food line reports
    /// `InvalidSize` rather than `SizeNotApplicable`.
    pub fn update_drink_size(&mut self, size: &str) -> ValidationResult<()> {
        let size: Size = size.parse()?;
        if self.category != Category::Drink {
            return Err(ValidationError::SizeNotApplicable {
                category: self.category,
            });
        }
        self.resize(size)
    }

    fn resize(&mut self, size: Size) -> ValidationResult<()> {
        line_total(self.unit_price, self.quantity, size_multiplier(self.category, size))?;
        self.size = size;
        Ok(())
    }
}

fn size_multiplier(category: Category, size: Size) -> u32 {
    match category {
        Category::Drink => size.multiplier_bps(),
        Category::Food => Size::M.multiplier_bps(),
    }
}

fn line_total(unit_price: Money, quantity: i64, multiplier_bps: u32) -> ValidationResult<Money> {
    unit_price
        .checked_multiply_quantity(quantity)
        .and_then(|amount| amount.checked_apply_bps(multiplier_bps))
        .ok_or_else(|| ValidationError::TooLarge {
            field: "line total".to_string(),
        })
}

// =============================================================================
// Unit Tests
// =============================================================================
