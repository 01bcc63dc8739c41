//! # Shop Facade
//!
//! The one entry point a presentation layer talks to. Every operation
//! resolves the session token first, checks the caller's capability, then
//! delegates to the stores and to brewline-core.
//!
//! ## Capability Matrix
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Operation                     Guest   Customer          Admin          │
//! │  ─────────                     ─────   ────────          ─────          │
//! │  browse / browse_category        ✓        ✓                ✓            │
//! │  catalog edits                   ✗        ✗                ✓            │
//! │  cart ops / checkout             ✗        ✓ (own cart)     ✗            │
//! │  order / cancel / pay            ✗        ✓ (own orders)   ✓ (any)      │
//! │  update_order_status             ✗        ✗                ✓            │
//! │  revenue / payments              ✗        ✗                ✓            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Locking
//! Carts are always locked before orders. Checkout holds both so the
//! order it records and the cart it clears are the same snapshot.

use std::sync::{Mutex, MutexGuard, PoisonError};

use tracing::{debug, info, warn};

use brewline_core::{
    Caller, CartLine, Catalog, Category, CustomerProfile, IdentityProvider, Money, Order,
    OrderStatus, OrderType, Payment, PaymentMethod, Product, Settlement, ShopError, ShopResult,
    Size, ValidationError,
};

use crate::cart_store::{CartLimits, CartStore};
use crate::catalog::{ProductCatalog, ProductUpdate};
use crate::config::ShopConfig;
use crate::identity::Directory;
use crate::order_repo::OrderRepository;

pub struct Shop {
    config: ShopConfig,
    directory: Directory,
    catalog: ProductCatalog,
    carts: CartStore,
    orders: Mutex<OrderRepository>,
}

impl Shop {
    /// An empty shop with no accounts.
    pub fn new(config: ShopConfig) -> Self {
        let carts = CartStore::new(CartLimits {
            max_lines: config.max_cart_lines,
            max_quantity: config.max_line_quantity,
        });

        Shop {
            config,
            directory: Directory::new(),
            catalog: ProductCatalog::new(),
            carts,
            orders: Mutex::new(OrderRepository::new()),
        }
    }

    /// A shop with the configured admin account already registered.
    pub fn bootstrap(config: ShopConfig) -> ShopResult<Self> {
        let shop = Shop::new(config);
        let admin = shop
            .directory
            .register_admin(&shop.config.admin_username, &shop.config.admin_password)?;
        info!(admin = %admin.username, "Shop bootstrapped");
        Ok(shop)
    }

    pub fn config(&self) -> &ShopConfig {
        &self.config
    }

    fn orders(&self) -> MutexGuard<'_, OrderRepository> {
        self.orders.lock().unwrap_or_else(PoisonError::into_inner)
    }

    // =========================================================================
    // Accounts
    // =========================================================================

    pub fn register_customer(
        &self,
        username: &str,
        password: &str,
        phone_number: &str,
    ) -> ShopResult<CustomerProfile> {
        self.directory.register_customer(username, password, phone_number)
    }

    pub fn login(&self, username: &str, password: &str) -> ShopResult<String> {
        self.directory.login(username, password)
    }

    pub fn logout(&self, token: &str) -> ShopResult<()> {
        self.directory.logout(token)
    }

    pub fn whoami(&self, token: &str) -> ShopResult<Caller> {
        self.directory.resolve(token)
    }

    pub fn set_address(&self, token: &str, address: &str) -> ShopResult<CustomerProfile> {
        self.directory.set_address(token, address)
    }

    // =========================================================================
    // Catalog
    // =========================================================================

    pub fn add_drink(
        &self,
        token: &str,
        name: &str,
        price: Money,
        hot: bool,
    ) -> ShopResult<Product> {
        self.directory.require_admin(token)?;
        self.catalog.add_drink(name, price, hot)
    }

    pub fn add_food(
        &self,
        token: &str,
        name: &str,
        price: Money,
        vegetarian: bool,
    ) -> ShopResult<Product> {
        self.directory.require_admin(token)?;
        self.catalog.add_food(name, price, vegetarian)
    }

    pub fn update_product(
        &self,
        token: &str,
        product_id: &str,
        update: ProductUpdate,
    ) -> ShopResult<Product> {
        self.directory.require_admin(token)?;
        self.catalog.update(product_id, update)
    }

    pub fn remove_product(&self, token: &str, product_id: &str) -> ShopResult<Product> {
        self.directory.require_admin(token)?;
        self.catalog.remove(product_id)
    }

    /// Available products. No session needed.
    pub fn browse(&self) -> Vec<Product> {
        self.catalog.list_available()
    }

    pub fn browse_category(&self, category: Category) -> Vec<Product> {
        self.catalog.list_by_category(category)
    }

    pub fn product(&self, product_id: &str) -> ShopResult<Product> {
        self.catalog.get(product_id)
    }

    // =========================================================================
    // Cart
    // =========================================================================

    /// Adds `quantity` of a product at the catalog's current price.
    pub fn add_to_cart(
        &self,
        token: &str,
        product_id: &str,
        quantity: i64,
        size: Size,
    ) -> ShopResult<CartLine> {
        let owner_id = self.directory.current_owner_id(token)?;
        let entry = self.catalog.lookup(product_id)?;
        self.carts.add(&owner_id, &entry, quantity, size)
    }

    pub fn view_cart(&self, token: &str) -> ShopResult<Vec<CartLine>> {
        let owner_id = self.directory.current_owner_id(token)?;
        Ok(self.carts.list(&owner_id))
    }

    /// Sum of line totals, before tax and delivery.
    pub fn cart_subtotal(&self, token: &str) -> ShopResult<Money> {
        let owner_id = self.directory.current_owner_id(token)?;
        self.carts.subtotal(&owner_id)
    }

    pub fn update_cart_quantity(
        &self,
        token: &str,
        line_id: &str,
        quantity: i64,
    ) -> ShopResult<()> {
        let owner_id = self.directory.current_owner_id(token)?;
        self.carts.update_quantity(&owner_id, line_id, quantity)
    }

    pub fn update_cart_size(&self, token: &str, line_id: &str, size: &str) -> ShopResult<()> {
        let owner_id = self.directory.current_owner_id(token)?;
        self.carts.update_size(&owner_id, line_id, size)
    }

    pub fn remove_from_cart(&self, token: &str, line_id: &str) -> ShopResult<()> {
        let owner_id = self.directory.current_owner_id(token)?;
        self.carts.remove(&owner_id, line_id)
    }

    pub fn clear_cart(&self, token: &str) -> ShopResult<()> {
        let owner_id = self.directory.current_owner_id(token)?;
        self.carts.clear(&owner_id);
        Ok(())
    }

    // =========================================================================
    // Checkout
    // =========================================================================

    /// Turns the caller's cart into an order.
    ///
    /// A blank `delivery_address` falls back to the saved address. Cash on
    /// delivery orders come back CONFIRMED and PAID; bank transfers stay
    /// PENDING until [`Shop::pay_order`]. The cart is emptied only when the
    /// order was recorded.
    pub fn checkout(
        &self,
        token: &str,
        order_type: OrderType,
        delivery_address: &str,
        method: PaymentMethod,
    ) -> ShopResult<Order> {
        let customer = self.directory.require_customer(token)?;
        let address = match delivery_address.trim() {
            "" => customer.address.clone().unwrap_or_default(),
            given => given.to_string(),
        };

        let order = self.carts.with_cart_mut(&customer.id, |lines| {
            let order = Order::place(&customer.id, lines.clone(), order_type, address, method)?;
            let order = self.orders().create(order)?.clone();
            lines.clear();
            Ok::<_, ShopError>(order)
        })?;

        self.directory.record_order(&customer.id, order.id())?;
        info!(
            order_id = order.id(),
            customer = %customer.username,
            %order_type,
            %method,
            total = %self.config.format_money(order.total()),
            status = %order.status(),
            "Order placed"
        );
        Ok(order)
    }

    // =========================================================================
    // Orders
    // =========================================================================

    pub fn my_orders(&self, token: &str) -> ShopResult<Vec<Order>> {
        let owner_id = self.directory.current_owner_id(token)?;
        Ok(self.orders().list_by_owner(&owner_id))
    }

    pub fn all_orders(&self, token: &str) -> ShopResult<Vec<Order>> {
        self.directory.require_admin(token)?;
        Ok(self.orders().list_all())
    }

    /// One order, visible to its owner and to admins.
    pub fn order(&self, token: &str, order_id: &str) -> ShopResult<Order> {
        let caller = self.directory.resolve(token)?;
        let orders = self.orders();
        let order = orders.get(order_id)?;
        ensure_can_act_on(&caller, order)?;
        debug!(order_id, "Fetched order");
        Ok(order.clone())
    }

    /// Sets any status. Admin only.
    pub fn update_order_status(
        &self,
        token: &str,
        order_id: &str,
        status: OrderStatus,
    ) -> ShopResult<Order> {
        let admin = self.directory.require_admin(token)?;
        let mut orders = self.orders();
        let order = orders.get_mut(order_id)?;

        let previous = order.status();
        if !previous.is_forward_step(status) {
            warn!(
                order_id,
                from = %previous,
                to = %status,
                admin = %admin.username,
                "Unusual status transition"
            );
        }
        order.update_status(status);
        info!(order_id, from = %previous, to = %status, "Order status updated");
        Ok(order.clone())
    }

    /// Cancels an order and refunds a paid payment.
    pub fn cancel_order(&self, token: &str, order_id: &str) -> ShopResult<Order> {
        let caller = self.directory.resolve(token)?;
        let mut orders = self.orders();
        let order = orders.get_mut(order_id)?;
        ensure_can_act_on(&caller, order)?;

        if let Err(e) = order.cancel() {
            warn!(order_id, status = %order.status(), "Cancel rejected");
            return Err(e.into());
        }
        info!(order_id, by = caller.username(), "Order cancelled");
        Ok(order.clone())
    }

    /// Offers `tendered` against an order's payment.
    ///
    /// A paid PENDING order moves to CONFIRMED. Insufficient tender comes
    /// back as [`Settlement::Rejected`] with nothing changed.
    pub fn pay_order(
        &self,
        token: &str,
        order_id: &str,
        tendered: Money,
    ) -> ShopResult<Settlement> {
        let caller = self.directory.resolve(token)?;
        let mut orders = self.orders();
        let order = orders.get_mut(order_id)?;
        ensure_can_act_on(&caller, order)?;

        if order.status() == OrderStatus::Cancelled {
            return Err(ValidationError::OrderClosed {
                order_id: order_id.to_string(),
                status: order.status(),
            }
            .into());
        }

        let outcome = order.settle_payment(tendered)?;
        match outcome {
            Settlement::Paid { change } => {
                if order.status() == OrderStatus::Pending {
                    order.update_status(OrderStatus::Confirmed);
                }
                info!(order_id, %tendered, %change, status = %order.status(), "Payment settled");
            }
            Settlement::Rejected { reason } => {
                warn!(order_id, %tendered, ?reason, "Payment rejected");
            }
        }
        Ok(outcome)
    }

    // =========================================================================
    // Revenue
    // =========================================================================

    pub fn total_revenue(&self, token: &str) -> ShopResult<Money> {
        self.directory.require_admin(token)?;
        let revenue = self.orders().total_revenue()?;
        debug!(revenue = %self.config.format_money(revenue), "Computed revenue");
        Ok(revenue)
    }

    pub fn paid_payments(&self, token: &str) -> ShopResult<Vec<Payment>> {
        self.directory.require_admin(token)?;
        Ok(self.orders().list_paid_payments())
    }

    pub fn all_payments(&self, token: &str) -> ShopResult<Vec<Payment>> {
        self.directory.require_admin(token)?;
        Ok(self.orders().all_payments())
    }

    pub fn payment_for_order(&self, token: &str, order_id: &str) -> ShopResult<Payment> {
        self.directory.require_admin(token)?;
        self.orders().payment_by_order_id(order_id)
    }
}

fn ensure_can_act_on(caller: &Caller, order: &Order) -> ShopResult<()> {
    if caller.can_act_on(order.owner_id()) {
        return Ok(());
    }
    warn!(order_id = order.id(), caller = caller.username(), "Access to order denied");
    Err(ShopError::forbidden("order belongs to another customer"))
}

// =============================================================================
// Unit Tests
// =============================================================================
