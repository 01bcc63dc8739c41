//! # Order
//!
//! Aggregates a cart snapshot into priced totals, owns the order's single
//! payment and carries the status state machine.
//!
//! ## Totals
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  subtotal     = Σ line.total_price()                                    │
//! │  tax          = round(subtotal × 10%)                                   │
//! │  delivery_fee = 25,000 REGULAR | 50,000 EXPRESS                         │
//! │  total        = subtotal + tax + delivery_fee     (exact, never set)    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Everything except `status` and the payment is fixed at construction.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::cart::CartLine;
use crate::error::{ValidationError, ValidationResult};
use crate::money::Money;
use crate::payment::{Payment, Settlement};
use crate::types::{OrderStatus, OrderType, PaymentMethod, TaxRate};
use crate::validation::validate_delivery_address;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Order {
    id: String,
    owner_id: String,
    lines: Vec<CartLine>,
    subtotal: Money,
    tax: Money,
    delivery_fee: Money,
    total: Money,
    status: OrderStatus,
    order_type: OrderType,
    delivery_address: String,
    payment: Option<Payment>,
    #[ts(as = "String")]
    created_at: DateTime<Utc>,
    #[ts(as = "String")]
    updated_at: DateTime<Utc>,
}

impl Order {
    /// Builds a PENDING order from a cart snapshot.
    ///
    /// ## Errors
    /// - `EmptyCart` if `lines` is empty
    /// - `Required` if `delivery_address` is blank
    /// - `TooLarge` if the total does not fit in `Money`
    pub fn new(
        owner_id: impl Into<String>,
        lines: Vec<CartLine>,
        order_type: OrderType,
        delivery_address: impl Into<String>,
    ) -> ValidationResult<Self> {
        let delivery_address = delivery_address.into();
        if lines.is_empty() {
            return Err(ValidationError::EmptyCart);
        }
        validate_delivery_address(&delivery_address)?;

        let subtotal = lines
            .iter()
            .map(CartLine::checked_total_price)
            .collect::<ValidationResult<Vec<_>>>()
            .and_then(|totals| Money::checked_sum(totals).ok_or_else(|| too_large("subtotal")))?;
        let tax = subtotal.calculate_tax(TaxRate::default());
        let delivery_fee = order_type.delivery_fee();
        let total = Money::checked_sum([subtotal, tax, delivery_fee])
            .ok_or_else(|| too_large("order total"))?;
        let now = Utc::now();

        Ok(Order {
            id: crate::new_id(),
            owner_id: owner_id.into(),
            lines,
            subtotal,
            tax,
            delivery_fee,
            total,
            status: OrderStatus::Pending,
            order_type,
            delivery_address,
            payment: None,
            created_at: now,
            updated_at: now,
        })
    }

    /// Checkout in one step: build the order, attach its payment and, for
    /// cash on delivery, move straight to CONFIRMED.
    pub fn place(
        owner_id: impl Into<String>,
        lines: Vec<CartLine>,
        order_type: OrderType,
        delivery_address: impl Into<String>,
        method: PaymentMethod,
    ) -> ValidationResult<Self> {
        let mut order = Order::new(owner_id, lines, order_type, delivery_address)?;
        order.create_payment(method);
        if method == PaymentMethod::CashOnDelivery {
            order.update_status(OrderStatus::Confirmed);
        }
        Ok(order)
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn owner_id(&self) -> &str {
        &self.owner_id
    }

    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    pub fn subtotal(&self) -> Money {
        self.subtotal
    }

    pub fn tax(&self) -> Money {
        self.tax
    }

    pub fn delivery_fee(&self) -> Money {
        self.delivery_fee
    }

    pub fn total(&self) -> Money {
        self.total
    }

    pub fn status(&self) -> OrderStatus {
        self.status
    }

    pub fn order_type(&self) -> OrderType {
        self.order_type
    }

    pub fn delivery_address(&self) -> &str {
        &self.delivery_address
    }

    pub fn payment(&self) -> Option<&Payment> {
        self.payment.as_ref()
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    pub fn is_owned_by(&self, owner_id: &str) -> bool {
        self.owner_id == owner_id
    }

    pub fn is_paid(&self) -> bool {
        self.payment.as_ref().is_some_and(Payment::is_paid)
    }

    /// Attaches a payment for the order total.
    ///
    /// Idempotent: a second call returns the existing payment unchanged,
    /// whatever method it is given.
    pub fn create_payment(&mut self, method: PaymentMethod) -> &Payment {
        let order_id = self.id.clone();
        let total = self.total;
        self.payment
            .get_or_insert_with(|| Payment::new(order_id, total, method))
    }

    /// Forwards a tender to the payment.
    pub fn settle_payment(&mut self, tendered: Money) -> ValidationResult<Settlement> {
        let order_id = &self.id;
        let payment = self
            .payment
            .as_mut()
            .ok_or_else(|| ValidationError::PaymentNotInitialized {
                order_id: order_id.clone(),
            })?;
        let before = payment.status();
        let outcome = payment.settle(tendered);
        if payment.status() != before {
            self.updated_at = Utc::now();
        }
        Ok(outcome)
    }

    /// Sets any status.
    ///
    /// Transition legality is a capability decision made by the caller (an
    /// admin may jump PENDING → DELIVERED). Use
    /// [`OrderStatus::is_forward_step`] to detect unusual jumps.
    pub fn update_status(&mut self, status: OrderStatus) {
        self.status = status;
        self.updated_at = Utc::now();
    }

    /// Cancels the order and refunds a PAID payment.
    ///
    /// READY and DELIVERED orders are rejected and left untouched.
    pub fn cancel(&mut self) -> ValidationResult<()> {
        if matches!(self.status, OrderStatus::Ready | OrderStatus::Delivered) {
            return Err(ValidationError::NotCancellable {
                status: self.status,
            });
        }

        self.status = OrderStatus::Cancelled;
        if let Some(payment) = self.payment.as_mut() {
            payment.refund();
        }
        self.updated_at = Utc::now();
        Ok(())
    }
}

fn too_large(field: &str) -> ValidationError {
    ValidationError::TooLarge {
        field: field.to_string(),
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
