//! # Callers and Capabilities
//!
//! Who is calling, as a tagged variant rather than a user record that has
//! to be downcast. Role checks are a `match`.
//!
//! ```text
//! session token ──► IdentityProvider::resolve ──► Caller
//!                                                 ├── Customer(profile) → owns a cart and orders
//!                                                 └── Admin(profile)    → status, catalog, revenue
//! ```
//!
//! The engine never stores credentials; it only asks the provider.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::{ShopError, ShopResult};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CustomerProfile {
    pub id: String,
    pub username: String,
    pub phone_number: String,
    /// Used by checkout when no address is given.
    pub address: Option<String>,
    /// Order ids, oldest first.
    pub order_history: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct AdminProfile {
    pub id: String,
    pub username: String,
}

/// An authenticated caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(tag = "role", rename_all = "snake_case")]
pub enum Caller {
    Customer(CustomerProfile),
    Admin(AdminProfile),
}

impl Caller {
    pub fn id(&self) -> &str {
        match self {
            Caller::Customer(c) => &c.id,
            Caller::Admin(a) => &a.id,
        }
    }

    pub fn username(&self) -> &str {
        match self {
            Caller::Customer(c) => &c.username,
            Caller::Admin(a) => &a.username,
        }
    }

    pub const fn is_admin(&self) -> bool {
        matches!(self, Caller::Admin(_))
    }

    /// The customer view, or `Authorization` for admins.
    pub fn as_customer(&self) -> ShopResult<&CustomerProfile> {
        match self {
            Caller::Customer(c) => Ok(c),
            Caller::Admin(_) => Err(ShopError::forbidden("current user is not a customer")),
        }
    }

    /// The admin view, or `Authorization` for customers.
    pub fn as_admin(&self) -> ShopResult<&AdminProfile> {
        match self {
            Caller::Admin(a) => Ok(a),
            Caller::Customer(_) => Err(ShopError::forbidden("admin privileges required")),
        }
    }

    /// Admins may act on any order; customers only on their own.
    pub fn can_act_on(&self, owner_id: &str) -> bool {
        match self {
            Caller::Admin(_) => true,
            Caller::Customer(c) => c.id == owner_id,
        }
    }
}

/// Identity collaborator.
///
/// Only [`IdentityProvider::resolve`] is required. The helpers propagate
/// `Authentication` unchanged instead of folding it into `false`.
pub trait IdentityProvider {
    /// Resolves a session token. Unknown or expired tokens are
    /// `ShopError::Authentication`.
    fn resolve(&self, token: &str) -> ShopResult<Caller>;

    fn is_admin(&self, token: &str) -> ShopResult<bool> {
        Ok(self.resolve(token)?.is_admin())
    }

    /// The caller's owner id (customers only).
    fn current_owner_id(&self, token: &str) -> ShopResult<String> {
        let caller = self.resolve(token)?;
        Ok(caller.as_customer()?.id.clone())
    }

    fn require_admin(&self, token: &str) -> ShopResult<AdminProfile> {
        match self.resolve(token)? {
            Caller::Admin(admin) => Ok(admin),
            Caller::Customer(_) => Err(ShopError::forbidden("admin privileges required")),
        }
    }

    fn require_customer(&self, token: &str) -> ShopResult<CustomerProfile> {
        match self.resolve(token)? {
            Caller::Customer(customer) => Ok(customer),
            Caller::Admin(_) => Err(ShopError::forbidden("current user is not a customer")),
        }
    }
}
