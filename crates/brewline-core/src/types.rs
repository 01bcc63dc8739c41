//! # Domain Types
//!
//! Small value types shared by cart lines, orders and payments.
//!
//! ## Type Map
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────┐  ┌─────────────┐  ┌───────────────┐  ┌─────────────┐  │
//! │  │  Category   │  │    Size     │  │  OrderStatus  │  │ OrderType   │  │
//! │  │  DRINK      │  │  S  ×0.8    │  │  PENDING      │  │ REGULAR     │  │
//! │  │  FOOD       │  │  M  ×1.0    │  │  CONFIRMED    │  │ EXPRESS     │  │
//! │  └─────────────┘  │  L  ×1.3    │  │  PREPARING    │  └─────────────┘  │
//! │                   └─────────────┘  │  READY        │                   │
//! │  ┌───────────────┐ ┌─────────────┐ │  DELIVERED    │                   │
//! │  │ PaymentMethod │ │PaymentStatus│ │  CANCELLED    │                   │
//! │  │ BANK_TRANSFER │ │ UNPAID      │ └───────────────┘                   │
//! │  │ CASH_ON_DELIV.│ │ PAID        │                                     │
//! │  └───────────────┘ │ REFUNDED    │                                     │
//! │                    └─────────────┘                                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use ts_rs::TS;

use crate::error::ValidationError;
use crate::money::Money;
use crate::{EXPRESS_DELIVERY_FEE, REGULAR_DELIVERY_FEE};

// =============================================================================
// Tax Rate
// =============================================================================

/// Tax rate represented in basis points (bps).
///
/// 1 basis point = 0.01%, so 1000 bps = 10%.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct TaxRate(u32);

impl TaxRate {
    #[inline]
    pub const fn from_bps(bps: u32) -> Self {
        TaxRate(bps)
    }

    #[inline]
    pub const fn bps(&self) -> u32 {
        self.0
    }

    /// Returns the rate as a percentage (for display only).
    #[inline]
    pub fn percentage(&self) -> f64 {
        self.0 as f64 / 100.0
    }
}

impl Default for TaxRate {
    fn default() -> Self {
        TaxRate::from_bps(crate::TAX_RATE_BPS)
    }
}

// =============================================================================
// Category
// =============================================================================

/// What kind of product a line refers to. Only drinks are sized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Category {
    Drink,
    Food,
}

impl Category {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Category::Drink => "DRINK",
            Category::Food => "FOOD",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Size
// =============================================================================

/// Cup size. Prices scale by [`Size::multiplier_bps`] for drinks only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum Size {
    S,
    #[default]
    M,
    L,
}

impl Size {
    /// Price multiplier in basis points: S 0.8, M 1.0, L 1.3.
    pub const fn multiplier_bps(&self) -> u32 {
        match self {
            Size::S => 8_000,
            Size::M => 10_000,
            Size::L => 13_000,
        }
    }

    pub const fn as_str(&self) -> &'static str {
        match self {
            Size::S => "S",
            Size::M => "M",
            Size::L => "L",
        }
    }
}

impl FromStr for Size {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "S" => Ok(Size::S),
            "M" => Ok(Size::M),
            "L" => Ok(Size::L),
            other => Err(ValidationError::InvalidSize {
                value: other.to_string(),
            }),
        }
    }
}

impl fmt::Display for Size {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Order Type
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderType {
    #[default]
    Regular,
    Express,
}

impl OrderType {
    /// Flat delivery fee: 25,000 regular, 50,000 express.
    pub const fn delivery_fee(&self) -> Money {
        match self {
            OrderType::Regular => REGULAR_DELIVERY_FEE,
            OrderType::Express => EXPRESS_DELIVERY_FEE,
        }
    }
}

impl fmt::Display for OrderType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            OrderType::Regular => "REGULAR",
            OrderType::Express => "EXPRESS",
        })
    }
}

// =============================================================================
// Order Status
// =============================================================================

/// Where an order is in its lifecycle.
///
/// ```text
/// PENDING → CONFIRMED → PREPARING → READY → DELIVERED
///    ↓           ↓           ↓
/// CANCELLED  CANCELLED   CANCELLED
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    #[default]
    Pending,
    Confirmed,
    Preparing,
    Ready,
    Delivered,
    Cancelled,
}

impl OrderStatus {
    /// READY and DELIVERED orders have left the kitchen and cannot be cancelled.
    pub const fn is_cancellable(&self) -> bool {
        matches!(
            self,
            OrderStatus::Pending | OrderStatus::Confirmed | OrderStatus::Preparing
        )
    }

    pub const fn is_terminal(&self) -> bool {
        matches!(self, OrderStatus::Delivered | OrderStatus::Cancelled)
    }

    /// Whether `next` is a legal step on the diagram above.
    ///
    /// Advisory only: `Order::update_status` does not enforce it.
    pub const fn is_forward_step(&self, next: OrderStatus) -> bool {
        matches!(
            (*self, next),
            (OrderStatus::Pending, OrderStatus::Confirmed)
                | (OrderStatus::Confirmed, OrderStatus::Preparing)
                | (OrderStatus::Preparing, OrderStatus::Ready)
                | (OrderStatus::Ready, OrderStatus::Delivered)
                | (
                    OrderStatus::Pending | OrderStatus::Confirmed | OrderStatus::Preparing,
                    OrderStatus::Cancelled
                )
        )
    }

    pub const fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "PENDING",
            OrderStatus::Confirmed => "CONFIRMED",
            OrderStatus::Preparing => "PREPARING",
            OrderStatus::Ready => "READY",
            OrderStatus::Delivered => "DELIVERED",
            OrderStatus::Cancelled => "CANCELLED",
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Payment Method / Status
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentMethod {
    /// Customer wires the money; settled later by an explicit call.
    BankTransfer,
    /// Courier collects cash; treated as settled when the order is placed.
    CashOnDelivery,
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            PaymentMethod::BankTransfer => "Bank Transfer",
            PaymentMethod::CashOnDelivery => "Cash on Delivery",
        })
    }
}

/// UNPAID → PAID → REFUNDED, never backwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentStatus {
    #[default]
    Unpaid,
    Paid,
    Refunded,
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            PaymentStatus::Unpaid => "UNPAID",
            PaymentStatus::Paid => "PAID",
            PaymentStatus::Refunded => "REFUNDED",
        })
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
