//! # brewline-store: Shared State for Brewline
//!
//! Wraps the pure brewline-core types in locked, in-memory stores and
//! exposes them through the [`Shop`] facade.
//!
//! ## State Layout
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                              Shop                                       │
//! │                                                                         │
//! │  ┌───────────────┐  ┌───────────────┐  ┌──────────────┐  ┌───────────┐ │
//! │  │  Directory    │  │ProductCatalog │  │  CartStore   │  │ OrderRepo │ │
//! │  │  RwLock x2    │  │   RwLock      │  │   Mutex      │  │  Mutex    │ │
//! │  │ accounts,     │  │ menu items    │  │ owner → lines│  │ orders +  │ │
//! │  │ sessions      │  │               │  │              │  │ revenue   │ │
//! │  └───────────────┘  └───────────────┘  └──────────────┘  └───────────┘ │
//! │                                                                         │
//! │  ShopConfig (read-only)         tracing (telemetry::init_tracing)      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Example
//!
//! ```rust
//! use brewline_store::{Shop, ShopConfig};
//! use brewline_core::{Money, OrderType, PaymentMethod, Size};
//!
//! let shop = Shop::bootstrap(ShopConfig::default())?;
//! let admin = shop.login("admin", "admin123")?;
//! let latte = shop.add_drink(&admin, "Latte", Money::from_minor(45_000), true)?;
//!
//! shop.register_customer("alice", "secret1", "0901")?;
//! let alice = shop.login("alice", "secret1")?;
//! shop.add_to_cart(&alice, &latte.id, 1, Size::M)?;
//!
//! let order = shop.checkout(&alice, OrderType::Regular, "12 Tran Hung Dao", PaymentMethod::CashOnDelivery)?;
//! assert_eq!(order.total().amount(), 74_500);
//! # Ok::<(), brewline_core::ShopError>(())
//! ```

pub mod cart_store;
pub mod catalog;
pub mod config;
pub mod identity;
pub mod order_repo;
pub mod shop;
pub mod telemetry;

pub use cart_store::{CartLimits, CartStore};
pub use catalog::{ProductCatalog, ProductUpdate};
pub use config::{ConfigError, ShopConfig, MAX_CURRENCY_DECIMALS};
pub use identity::Directory;
pub use order_repo::OrderRepository;
pub use shop::Shop;
pub use telemetry::init_tracing;
