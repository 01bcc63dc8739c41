//! # Identity Directory
//!
//! In-memory accounts and login sessions, implementing
//! [`brewline_core::IdentityProvider`] for the shop.
//!
//! ## Login Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  register_customer / register_admin                                     │
//! │      validate ──► argon2 hash ──► accounts[username]                    │
//! │                                                                         │
//! │  login(username, password)                                              │
//! │      verify hash ──► sessions[token] = username ──► token               │
//! │                                                                         │
//! │  resolve(token)                                                         │
//! │      sessions[token] ──► accounts[username].caller (fresh snapshot)     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Passwords are never stored in clear; only the PHC string is kept.

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::SaltString;
use argon2::{Algorithm, Argon2, Params, PasswordHash, PasswordHasher, PasswordVerifier, Version};
use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

use brewline_core::validation::{
    validate_delivery_address, validate_password, validate_phone_number, validate_username,
};
use brewline_core::{
    AdminProfile, Caller, CustomerProfile, IdentityProvider, ShopError, ShopResult, ValidationError,
};

// =============================================================================
// Password Hashing
// =============================================================================

/// Argon2 memory cost in KiB.
const HASH_MEMORY_KIB: u32 = 8 * 1024;

fn hasher() -> ShopResult<Argon2<'static>> {
    let params = Params::new(HASH_MEMORY_KIB, 1, 1, None)
        .map_err(|e| ShopError::Internal(format!("Invalid hashing parameters: {}", e)))?;
    Ok(Argon2::new(Algorithm::Argon2id, Version::V0x13, params))
}

fn hash_password(password: &str) -> ShopResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = hasher()?
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| ShopError::Internal(format!("Failed to hash password: {}", e)))?;
    Ok(hash.to_string())
}

fn verify_password(password: &str, hash: &str) -> bool {
    let parsed = match PasswordHash::new(hash) {
        Ok(h) => h,
        Err(_) => return false,
    };
    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok()
}

// =============================================================================
// Directory
// =============================================================================

#[derive(Debug)]
struct Account {
    caller: Caller,
    password_hash: String,
}

#[derive(Debug)]
struct Session {
    username: String,
    started_at: DateTime<Utc>,
}

/// Accounts keyed by username, sessions keyed by token.
///
/// Lock order is always accounts, then sessions.
#[derive(Debug, Default)]
pub struct Directory {
    accounts: RwLock<HashMap<String, Account>>,
    sessions: RwLock<HashMap<String, Session>>,
}

impl Directory {
    pub fn new() -> Self {
        Self::default()
    }

    fn accounts(&self) -> RwLockReadGuard<'_, HashMap<String, Account>> {
        self.accounts.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn accounts_mut(&self) -> RwLockWriteGuard<'_, HashMap<String, Account>> {
        self.accounts.write().unwrap_or_else(PoisonError::into_inner)
    }

    fn sessions(&self) -> RwLockReadGuard<'_, HashMap<String, Session>> {
        self.sessions.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn sessions_mut(&self) -> RwLockWriteGuard<'_, HashMap<String, Session>> {
        self.sessions.write().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn register_customer(
        &self,
        username: &str,
        password: &str,
        phone_number: &str,
    ) -> ShopResult<CustomerProfile> {
        validate_phone_number(phone_number)?;
        let profile = CustomerProfile {
            id: uuid::Uuid::new_v4().to_string(),
            username: username.trim().to_string(),
            phone_number: phone_number.trim().to_string(),
            address: None,
            order_history: Vec::new(),
        };
        self.register(username, password, Caller::Customer(profile.clone()))?;
        Ok(profile)
    }

    pub fn register_admin(&self, username: &str, password: &str) -> ShopResult<AdminProfile> {
        let profile = AdminProfile {
            id: uuid::Uuid::new_v4().to_string(),
            username: username.trim().to_string(),
        };
        self.register(username, password, Caller::Admin(profile.clone()))?;
        Ok(profile)
    }

    fn register(&self, username: &str, password: &str, caller: Caller) -> ShopResult<()> {
        validate_username(username)?;
        validate_password(password)?;

        let key = username.trim().to_string();
        if self.accounts().contains_key(&key) {
            return Err(duplicate_username(&key));
        }

        // Hash outside the write lock; re-check before inserting.
        let password_hash = hash_password(password)?;
        let mut accounts = self.accounts_mut();
        if accounts.contains_key(&key) {
            return Err(duplicate_username(&key));
        }

        info!(username = %key, admin = caller.is_admin(), "Registered account");
        accounts.insert(
            key,
            Account {
                caller,
                password_hash,
            },
        );
        Ok(())
    }

    /// Verifies credentials and opens a session.
    pub fn login(&self, username: &str, password: &str) -> ShopResult<String> {
        let username = username.trim();
        let verified = self
            .accounts()
            .get(username)
            .is_some_and(|account| verify_password(password, &account.password_hash));

        if !verified {
            warn!(username, "Login rejected");
            return Err(ShopError::unauthenticated("Invalid username or password"));
        }

        let token = uuid::Uuid::new_v4().to_string();
        self.sessions_mut().insert(
            token.clone(),
            Session {
                username: username.to_string(),
                started_at: Utc::now(),
            },
        );
        info!(username, "Logged in");
        Ok(token)
    }

    /// Ends a session. Unknown tokens are an authentication error.
    pub fn logout(&self, token: &str) -> ShopResult<()> {
        let session = self
            .sessions_mut()
            .remove(token)
            .ok_or_else(session_expired)?;
        let seconds = (Utc::now() - session.started_at).num_seconds();
        info!(username = %session.username, seconds, "Logged out");
        Ok(())
    }

    /// Saves the customer's default delivery address.
    pub fn set_address(&self, token: &str, address: &str) -> ShopResult<CustomerProfile> {
        validate_delivery_address(address)?;
        let customer = self.require_customer(token)?;

        self.with_customer_mut(&customer.id, |profile| {
            profile.address = Some(address.trim().to_string());
            debug!(customer_id = %profile.id, "Saved delivery address");
            profile.clone()
        })
    }

    /// Appends an order id to a customer's history.
    pub fn record_order(&self, customer_id: &str, order_id: &str) -> ShopResult<()> {
        self.with_customer_mut(customer_id, |profile| {
            profile.order_history.push(order_id.to_string());
        })
    }

    fn with_customer_mut<F, R>(&self, customer_id: &str, f: F) -> ShopResult<R>
    where
        F: FnOnce(&mut CustomerProfile) -> R,
    {
        let mut accounts = self.accounts_mut();
        accounts
            .values_mut()
            .find_map(|account| match &mut account.caller {
                Caller::Customer(profile) if profile.id == customer_id => Some(profile),
                _ => None,
            })
            .map(f)
            .ok_or_else(|| ShopError::not_found("Customer", customer_id))
    }
}

impl IdentityProvider for Directory {
    fn resolve(&self, token: &str) -> ShopResult<Caller> {
        let accounts = self.accounts();
        let sessions = self.sessions();
        sessions
            .get(token)
            .and_then(|session| accounts.get(&session.username))
            .map(|account| account.caller.clone())
            .ok_or_else(session_expired)
    }
}

fn session_expired() -> ShopError {
    ShopError::unauthenticated("Session not found or expired")
}

fn duplicate_username(username: &str) -> ShopError {
    ValidationError::Duplicate {
        field: "username".to_string(),
        value: username.to_string(),
    }
    .into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hashes_are_salted_argon2id() {
        let first = hash_password("secret1").unwrap();
        let second = hash_password("secret1").unwrap();

        assert!(first.starts_with("$argon2id$"));
        assert_ne!(first, second);
        assert!(verify_password("secret1", &first));
        assert!(verify_password("secret1", &second));
        assert!(!verify_password("secret2", &first));
    }

    #[test]
    fn test_register_and_login() {
        let directory = Directory::new();
        let alice = directory.register_customer("alice", "secret1", "0901").unwrap();

        let token = directory.login("alice", "secret1").unwrap();
        let caller = directory.resolve(&token).unwrap();
        assert_eq!(caller.id(), alice.id);
        assert!(!directory.is_admin(&token).unwrap());

        assert!(matches!(
            directory.login("alice", "wrong-password"),
            Err(ShopError::Authentication(_))
        ));
        assert!(matches!(
            directory.login("bob", "secret1"),
            Err(ShopError::Authentication(_))
        ));
    }

    #[test]
    fn test_registration_rules() {
        let directory = Directory::new();
        assert!(matches!(
            directory.register_customer("", "secret1", "0901"),
            Err(ShopError::Validation(ValidationError::Required { .. }))
        ));
        assert!(matches!(
            directory.register_customer("alice", "123", "0901"),
            Err(ShopError::Validation(ValidationError::TooShort { .. }))
        ));
        assert!(matches!(
            directory.register_customer("alice", "secret1", " "),
            Err(ShopError::Validation(ValidationError::Required { .. }))
        ));

        directory.register_customer("alice", "secret1", "0901").unwrap();
        assert!(matches!(
            directory.register_admin("alice", "secret1"),
            Err(ShopError::Validation(ValidationError::Duplicate { .. }))
        ));
    }

    #[test]
    fn test_admin_session() {
        let directory = Directory::new();
        directory.register_admin("admin", "admin123").unwrap();
        let token = directory.login("admin", "admin123").unwrap();

        assert!(directory.is_admin(&token).unwrap());
        assert!(directory.require_admin(&token).is_ok());
        assert!(matches!(
            directory.current_owner_id(&token),
            Err(ShopError::Authorization(_))
        ));
    }

    #[test]
    fn test_logout_ends_session() {
        let directory = Directory::new();
        directory.register_customer("alice", "secret1", "0901").unwrap();
        let token = directory.login("alice", "secret1").unwrap();

        directory.logout(&token).unwrap();
        assert!(matches!(directory.resolve(&token), Err(ShopError::Authentication(_))));
        assert!(directory.logout(&token).is_err());
    }

    #[test]
    fn test_address_and_history_show_up_on_resolve() {
        let directory = Directory::new();
        let alice = directory.register_customer("alice", "secret1", "0901").unwrap();
        let token = directory.login("alice", "secret1").unwrap();

        directory.set_address(&token, "12 Tran Hung Dao").unwrap();
        directory.record_order(&alice.id, "o-1").unwrap();

        let profile = directory.require_customer(&token).unwrap();
        assert_eq!(profile.address.as_deref(), Some("12 Tran Hung Dao"));
        assert_eq!(profile.order_history, vec!["o-1".to_string()]);

        assert!(directory.set_address(&token, "  ").is_err());
        assert!(directory.record_order("nobody", "o-2").is_err());
    }
}
