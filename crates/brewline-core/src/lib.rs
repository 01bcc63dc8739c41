//! # brewline-core: Ordering Engine for Brewline
//!
//! Pricing, order lifecycle and payment reconciliation as plain data and
//! pure functions. Nothing in this crate locks, logs or touches the disk;
//! `brewline-store` wraps these types in shared state.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Brewline Architecture                            │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │               brewline-store (Shop facade)                      │   │
//! │  │   add_to_cart, checkout, pay_order, cancel_order, revenue      │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ brewline-core (THIS CRATE) ★                    │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   cart    │  │  payment  │  │   order   │  │   auth    │  │   │
//! │  │   │ CartLine  │─►│  Payment  │─►│   Order   │  │  Caller   │  │   │
//! │  │   │ pricing   │  │ Settlement│  │  status   │  │ Identity  │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO LOCKS • NO LOGGING • PURE FUNCTIONS               │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`money`] - Integer money with basis-point rounding
//! - [`types`] - Enums shared by every entity (size, status, method...)
//! - [`catalog`] - Product snapshots and the catalog collaborator trait
//! - [`cart`] - `CartLine` and its size-dependent pricing
//! - [`payment`] - `Payment` settlement, change and refund
//! - [`order`] - `Order` totals and status state machine
//! - [`auth`] - `Caller` roles and the identity collaborator trait
//! - [`error`] - Domain error types
//! - [`validation`] - Input validation rules
//!
//! ## Example Usage
//!
//! ```rust
//! use brewline_core::{CartLine, Category, Money, Order, OrderType, PaymentMethod, Size};
//!
//! let latte = CartLine::new("latte", "cust-1", 1, Money::from_minor(45_000), Category::Drink, Size::L)?;
//! let bagel = CartLine::new("bagel", "cust-1", 2, Money::from_minor(30_000), Category::Food, Size::M)?;
//!
//! let order = Order::place(
//!     "cust-1",
//!     vec![latte, bagel],
//!     OrderType::Regular,
//!     "12 Tran Hung Dao",
//!     PaymentMethod::BankTransfer,
//! )?;
//!
//! assert_eq!(order.subtotal().amount(), 118_500);
//! assert_eq!(order.tax().amount(), 11_850);
//! assert_eq!(order.total().amount(), 155_350);
//! # Ok::<(), brewline_core::ValidationError>(())
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod auth;
pub mod cart;
pub mod catalog;
pub mod error;
pub mod money;
pub mod order;
pub mod payment;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use auth::{AdminProfile, Caller, CustomerProfile, IdentityProvider};
pub use cart::CartLine;
pub use catalog::{Catalog, CatalogEntry, Product, ProductDetails};
pub use error::{ShopError, ShopResult, ValidationError};
pub use money::Money;
pub use order::Order;
pub use payment::{Payment, Settlement, SettlementRejection};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Tax applied to every order subtotal, in basis points (10%).
pub const TAX_RATE_BPS: u32 = 1_000;

/// Delivery fee for [`OrderType::Regular`] orders.
pub const REGULAR_DELIVERY_FEE: Money = Money::from_minor(25_000);

/// Delivery fee for [`OrderType::Express`] orders.
pub const EXPRESS_DELIVERY_FEE: Money = Money::from_minor(50_000);

/// Default number of distinct lines a cart may hold.
pub const MAX_CART_LINES: usize = 100;

/// Default maximum quantity on a single cart line.
pub const MAX_LINE_QUANTITY: i64 = 999;

/// Generates a fresh entity id.
pub(crate) fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}
