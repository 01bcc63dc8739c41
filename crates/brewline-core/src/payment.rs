//! # Payment
//!
//! Settlement rules for the single payment every order owns.
//!
//! ## State Machine
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │   BANK_TRANSFER:      UNPAID ──settle(≥ due)──► PAID ──refund──► REFUNDED│
//! │                          │                                              │
//! │                          └─settle(< due)──► UNPAID (nothing recorded)   │
//! │                                                                         │
//! │   CASH_ON_DELIVERY:   created PAID (amount_paid = amount_due)           │
//! │                                              └──refund──► REFUNDED      │
//! │                                                                         │
//! │   No reverse transitions. REFUNDED is terminal.                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;
use crate::types::{PaymentMethod, PaymentStatus};

// =============================================================================
// Settlement Outcome
// =============================================================================

/// Result of a settle attempt.
///
/// Insufficient tender is an expected business outcome, not an error, so
/// it comes back as a value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum Settlement {
    /// The payment is PAID (now or already).
    Paid { change: Money },
    /// Nothing changed.
    Rejected { reason: SettlementRejection },
}

impl Settlement {
    pub const fn is_paid(&self) -> bool {
        matches!(self, Settlement::Paid { .. })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SettlementRejection {
    /// Tendered amount did not cover the amount due.
    InsufficientTender { due: Money, tendered: Money },
    /// Payment was refunded and cannot be collected again.
    Refunded,
}

// =============================================================================
// Payment
// =============================================================================

/// The payment attached to an order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Payment {
    id: String,
    order_id: String,
    method: PaymentMethod,
    status: PaymentStatus,
    amount_due: Money,
    amount_paid: Money,
    #[ts(as = "String")]
    created_at: DateTime<Utc>,
    #[ts(as = "Option<String>")]
    settled_at: Option<DateTime<Utc>>,
}

impl Payment {
    /// Creates the payment for an order.
    ///
    /// Cash on delivery is modelled as collected at order time, so it starts
    /// PAID with `amount_paid == amount_due`. Bank transfers start UNPAID.
    pub fn new(order_id: impl Into<String>, amount_due: Money, method: PaymentMethod) -> Self {
        let now = Utc::now();
        let (status, amount_paid, settled_at) = match method {
            PaymentMethod::CashOnDelivery => (PaymentStatus::Paid, amount_due, Some(now)),
            PaymentMethod::BankTransfer => (PaymentStatus::Unpaid, Money::zero(), None),
        };

        Payment {
            id: crate::new_id(),
            order_id: order_id.into(),
            method,
            status,
            amount_due,
            amount_paid,
            created_at: now,
            settled_at,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn order_id(&self) -> &str {
        &self.order_id
    }

    pub fn method(&self) -> PaymentMethod {
        self.method
    }

    pub fn status(&self) -> PaymentStatus {
        self.status
    }

    pub fn amount_due(&self) -> Money {
        self.amount_due
    }

    pub fn amount_paid(&self) -> Money {
        self.amount_paid
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn settled_at(&self) -> Option<DateTime<Utc>> {
        self.settled_at
    }

    pub fn is_paid(&self) -> bool {
        self.status == PaymentStatus::Paid
    }

    /// Attempts to collect `tendered`.
    ///
    /// Already PAID is a successful no-op. A bank transfer settles only when
    /// the tender covers the amount due, recording the full tender; anything
    /// less is rejected and leaves the payment untouched. No partial credit.
    pub fn settle(&mut self, tendered: Money) -> Settlement {
        match self.status {
            PaymentStatus::Paid => Settlement::Paid {
                change: self.change(),
            },
            PaymentStatus::Refunded => Settlement::Rejected {
                reason: SettlementRejection::Refunded,
            },
            PaymentStatus::Unpaid if tendered >= self.amount_due => {
                self.amount_paid = tendered;
                self.status = PaymentStatus::Paid;
                self.settled_at = Some(Utc::now());
                Settlement::Paid {
                    change: self.change(),
                }
            }
            PaymentStatus::Unpaid => Settlement::Rejected {
                reason: SettlementRejection::InsufficientTender {
                    due: self.amount_due,
                    tendered,
                },
            },
        }
    }

    /// Change owed back: `max(0, amount_paid - amount_due)`.
    pub fn change(&self) -> Money {
        self.amount_paid.saturating_sub(self.amount_due)
    }

    /// PAID → REFUNDED. Any other status is left alone.
    ///
    /// Returns whether a refund actually happened.
    pub fn refund(&mut self) -> bool {
        if self.status == PaymentStatus::Paid {
            self.status = PaymentStatus::Refunded;
            true
        } else {
            false
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn bank_transfer(id: &str) -> Payment {
        Payment::new(id, Money::from_minor(100_000), PaymentMethod::BankTransfer)
    }

    fn cash_on_delivery(id: &str) -> Payment {
        Payment::new(id, Money::from_minor(100_000), PaymentMethod::CashOnDelivery)
    }

    #[test]
    fn test_cash_on_delivery_is_paid_at_creation() {
        let payment = cash_on_delivery("o-1");
        assert_eq!(payment.status(), PaymentStatus::Paid);
        assert_eq!(payment.amount_paid(), payment.amount_due());
        assert!(payment.change().is_zero());
        assert!(payment.settled_at().is_some());
    }

    #[test]
    fn test_bank_transfer_starts_unpaid() {
        let payment = bank_transfer("o-1");
        assert_eq!(payment.status(), PaymentStatus::Unpaid);
        assert!(payment.amount_paid().is_zero());
        assert!(payment.settled_at().is_none());
    }

    #[test]
    fn test_bank_transfer_settlement() {
        let mut payment = bank_transfer("o-1");

        let outcome = payment.settle(Money::from_minor(50_000));
        assert!(!outcome.is_paid());
        assert_eq!(payment.status(), PaymentStatus::Unpaid);
        assert!(payment.amount_paid().is_zero());

        let outcome = payment.settle(Money::from_minor(120_000));
        assert_eq!(
            outcome,
            Settlement::Paid {
                change: Money::from_minor(20_000)
            }
        );
        assert_eq!(payment.status(), PaymentStatus::Paid);
        assert_eq!(payment.change().amount(), 20_000);
    }

    #[test]
    fn test_settle_exact_amount() {
        let mut payment = bank_transfer("o-1");
        assert!(payment.settle(Money::from_minor(100_000)).is_paid());
        assert!(payment.change().is_zero());
    }

    #[test]
    fn test_settle_when_paid_is_noop() {
        let mut payment = bank_transfer("o-1");
        payment.settle(Money::from_minor(120_000));

        // A second, smaller tender must not overwrite the recorded amount.
        assert!(payment.settle(Money::from_minor(1)).is_paid());
        assert_eq!(payment.amount_paid().amount(), 120_000);
    }

    #[test]
    fn test_refund_transitions() {
        let mut unpaid = bank_transfer("o-1");
        assert!(!unpaid.refund());
        assert_eq!(unpaid.status(), PaymentStatus::Unpaid);

        let mut paid = cash_on_delivery("o-2");
        assert!(paid.refund());
        assert_eq!(paid.status(), PaymentStatus::Refunded);
        assert!(!paid.refund());
        assert_eq!(paid.status(), PaymentStatus::Refunded);
    }

    #[test]
    fn test_refunded_cannot_be_settled_again() {
        let mut payment = cash_on_delivery("o-1");
        payment.refund();

        let outcome = payment.settle(Money::from_minor(500_000));
        assert_eq!(
            outcome,
            Settlement::Rejected {
                reason: SettlementRejection::Refunded
            }
        );
        assert_eq!(payment.status(), PaymentStatus::Refunded);
    }
}
