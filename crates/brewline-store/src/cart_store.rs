//! # Cart Store
//!
//! Per-owner carts behind one mutex.
//!
//! ## Cart Operations Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Cart Store Operations                                │
//! │                                                                         │
//! │  Shop call                 Store method            Cart change          │
//! │  ─────────                 ────────────            ───────────          │
//! │  add_to_cart() ──────────► add() ────────────────► lines.push(line)    │
//! │  update_cart_quantity() ─► update_quantity() ────► qty = n (0 → drop)  │
//! │  update_cart_size() ─────► update_size() ────────► DRINK lines only    │
//! │  remove_cart_line() ─────► remove() ─────────────► lines.remove(i)     │
//! │  clear_cart() ───────────► clear() ──────────────► lines.clear()       │
//! │  checkout() ─────────────► with_cart_mut() ──────► drained into Order  │
//! │                                                                         │
//! │  NOTE: Every method holds the lock for its whole body, so checkout     │
//! │        sees and clears exactly one version of the cart.                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use tracing::debug;

use brewline_core::validation::{validate_add_quantity, validate_cart_size};
use brewline_core::{
    CartLine, CatalogEntry, Money, ShopError, ShopResult, Size, ValidationError,
};

/// Limits applied on add.
#[derive(Debug, Clone, Copy)]
pub struct CartLimits {
    pub max_lines: usize,
    pub max_quantity: i64,
}

impl Default for CartLimits {
    fn default() -> Self {
        CartLimits {
            max_lines: brewline_core::MAX_CART_LINES,
            max_quantity: brewline_core::MAX_LINE_QUANTITY,
        }
    }
}

/// Ordered cart lines keyed by owner id.
#[derive(Debug, Default)]
pub struct CartStore {
    carts: Mutex<HashMap<String, Vec<CartLine>>>,
    limits: CartLimits,
}

impl CartStore {
    pub fn new(limits: CartLimits) -> Self {
        CartStore {
            carts: Mutex::new(HashMap::new()),
            limits,
        }
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, Vec<CartLine>>> {
        self.carts.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Runs `f` with write access to one owner's cart.
    ///
    /// The cart map stays locked for the duration of `f`.
    pub fn with_cart_mut<F, R>(&self, owner_id: &str, f: F) -> R
    where
        F: FnOnce(&mut Vec<CartLine>) -> R,
    {
        let mut carts = self.lock();
        let lines = carts.entry(owner_id.to_string()).or_default();
        f(lines)
    }

    /// Adds a line priced from the catalog snapshot.
    ///
    /// Every add creates its own line, even for a product already in the
    /// cart, because the same drink may be ordered in two sizes.
    pub fn add(
        &self,
        owner_id: &str,
        entry: &CatalogEntry,
        quantity: i64,
        size: Size,
    ) -> ShopResult<CartLine> {
        validate_add_quantity(quantity, self.limits.max_quantity)?;
        if !entry.available {
            return Err(ValidationError::ProductUnavailable {
                product_id: entry.product_id.clone(),
            }
            .into());
        }

        self.with_cart_mut(owner_id, |lines| {
            validate_cart_size(lines.len(), self.limits.max_lines)?;
            let line = CartLine::from_entry(entry, owner_id, quantity, size)?;
            debug!(
                owner_id,
                line_id = line.id(),
                product_id = %entry.product_id,
                quantity,
                %size,
                "Adding cart line"
            );
            lines.push(line.clone());
            Ok(line)
        })
    }

    /// Snapshot of an owner's cart in insertion order.
    pub fn list(&self, owner_id: &str) -> Vec<CartLine> {
        self.lock().get(owner_id).cloned().unwrap_or_default()
    }

    /// Sum of line totals, before tax and delivery.
    pub fn subtotal(&self, owner_id: &str) -> ShopResult<Money> {
        let carts = self.lock();
        let totals = carts.get(owner_id).into_iter().flatten().map(CartLine::total_price);
        Money::checked_sum(totals).ok_or_else(|| {
            ValidationError::TooLarge {
                field: "cart subtotal".to_string(),
            }
            .into()
        })
    }

    /// Sets a line's quantity. Zero removes the line.
    pub fn update_quantity(
        &self,
        owner_id: &str,
        line_id: &str,
        quantity: i64,
    ) -> ShopResult<()> {
        if quantity > self.limits.max_quantity {
            return Err(ValidationError::OutOfRange {
                field: "quantity".to_string(),
                min: 0,
                max: self.limits.max_quantity,
            }
            .into());
        }

        self.with_cart_mut(owner_id, |lines| {
            let index = position(lines, line_id)?;
            lines[index].update_quantity(quantity)?;
            if lines[index].is_depleted() {
                debug!(owner_id, line_id, "Quantity set to zero, removing cart line");
                lines.remove(index);
            } else {
                debug!(owner_id, line_id, quantity, "Updated cart line quantity");
            }
            Ok(())
        })
    }

    /// Changes a drink line's size.
    pub fn update_size(&self, owner_id: &str, line_id: &str, size: &str) -> ShopResult<()> {
        self.with_cart_mut(owner_id, |lines| {
            let index = position(lines, line_id)?;
            lines[index].update_drink_size(size)?;
            debug!(owner_id, line_id, size, "Updated cart line size");
            Ok(())
        })
    }

    pub fn remove(&self, owner_id: &str, line_id: &str) -> ShopResult<()> {
        self.with_cart_mut(owner_id, |lines| {
            let index = position(lines, line_id)?;
            lines.remove(index);
            debug!(owner_id, line_id, "Removed cart line");
            Ok(())
        })
    }

    /// Drains the cart, leaving it empty.
    pub fn take(&self, owner_id: &str) -> Vec<CartLine> {
        self.with_cart_mut(owner_id, std::mem::take)
    }

    pub fn clear(&self, owner_id: &str) {
        if let Some(lines) = self.lock().get_mut(owner_id) {
            lines.clear();
        }
        debug!(owner_id, "Cleared cart");
    }
}

fn position(lines: &[CartLine], line_id: &str) -> ShopResult<usize> {
    lines
        .iter()
        .position(|line| line.id() == line_id)
        .ok_or_else(|| ShopError::not_found("Cart item", line_id))
}
