//! # Catalog Types
//!
//! Products as the ordering engine sees them, plus the collaborator trait
//! a catalog implementation exposes to checkout.
//!
//! The engine never re-reads the catalog after a line is added: the
//! [`CatalogEntry`] returned by [`Catalog::lookup`] is snapshotted into the
//! `CartLine` and later price edits do not reach existing carts or orders.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::ShopResult;
use crate::money::Money;
use crate::types::Category;

/// Category-specific product attributes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ProductDetails {
    Drink { hot: bool },
    Food { vegetarian: bool },
}

impl ProductDetails {
    pub const fn category(&self) -> Category {
        match self {
            ProductDetails::Drink { .. } => Category::Drink,
            ProductDetails::Food { .. } => Category::Food,
        }
    }
}

/// A menu item.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Product {
    pub id: String,
    pub name: String,
    pub price: Money,
    /// Unavailable products stay in the catalog but cannot be added to carts.
    pub available: bool,
    pub details: ProductDetails,
}

impl Product {
    #[inline]
    pub fn category(&self) -> Category {
        self.details.category()
    }

    /// The snapshot handed to the cart at add time.
    pub fn entry(&self) -> CatalogEntry {
        CatalogEntry {
            product_id: self.id.clone(),
            unit_price: self.price,
            category: self.category(),
            available: self.available,
        }
    }
}

/// What checkout needs to know about a product at the moment it is added.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogEntry {
    pub product_id: String,
    pub unit_price: Money,
    pub category: Category,
    pub available: bool,
}

/// Catalog collaborator.
///
/// Implementations return `ShopError::NotFound` for unknown ids.
pub trait Catalog {
    fn lookup(&self, product_id: &str) -> ShopResult<CatalogEntry>;
}
