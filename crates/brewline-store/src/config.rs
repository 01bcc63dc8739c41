//! # Shop Configuration
//!
//! Settings loaded once at startup.
//!
//! ## Configuration Sources (Priority Order)
//! 1. Environment variables (`BREWLINE_*`)
//! 2. Defaults (this file)
//!
//! Read-only after construction, so no lock is needed.

use serde::{Deserialize, Serialize};
use std::env;
use std::str::FromStr;

use brewline_core::{Money, MAX_CART_LINES, MAX_LINE_QUANTITY};

/// Largest accepted `BREWLINE_CURRENCY_DECIMALS`.
pub const MAX_CURRENCY_DECIMALS: u8 = 6;

/// Shop configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShopConfig {
    /// Bootstrap admin account created by `Shop::bootstrap`.
    pub admin_username: String,
    pub admin_password: String,

    /// Distinct lines a single cart may hold.
    pub max_cart_lines: usize,

    /// Quantity ceiling for one line.
    pub max_line_quantity: i64,

    /// Currency code (ISO 4217)
    pub currency_code: String,

    /// Currency symbol (for display)
    pub currency_symbol: String,

    /// Number of decimal places the smallest unit is divided by for display,
    /// at most [`MAX_CURRENCY_DECIMALS`].
    pub currency_decimals: u8,

    /// `tracing_subscriber::EnvFilter` directive used when `RUST_LOG` is unset.
    pub log_filter: String,
}

impl Default for ShopConfig {
    fn default() -> Self {
        ShopConfig {
            admin_username: "admin".to_string(),
            admin_password: "admin123".to_string(),
            max_cart_lines: MAX_CART_LINES,
            max_line_quantity: MAX_LINE_QUANTITY,
            currency_code: "VND".to_string(),
            currency_symbol: "₫".to_string(),
            currency_decimals: 0,
            log_filter: "info".to_string(),
        }
    }
}

impl ShopConfig {
    /// Creates a config from `BREWLINE_*` environment variables and defaults.
    ///
    /// ## Environment Variables
    /// - `BREWLINE_ADMIN_USERNAME`, `BREWLINE_ADMIN_PASSWORD`
    /// - `BREWLINE_MAX_CART_LINES`, `BREWLINE_MAX_LINE_QUANTITY`
    /// - `BREWLINE_CURRENCY_CODE`, `BREWLINE_CURRENCY_SYMBOL`, `BREWLINE_CURRENCY_DECIMALS`
    /// - `BREWLINE_LOG`
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Same as [`ShopConfig::from_env`] with an injectable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = ShopConfig::default();

        let config = ShopConfig {
            admin_username: lookup("BREWLINE_ADMIN_USERNAME").unwrap_or(defaults.admin_username),
            admin_password: lookup("BREWLINE_ADMIN_PASSWORD").unwrap_or(defaults.admin_password),
            max_cart_lines: parse_var(&lookup, "BREWLINE_MAX_CART_LINES", defaults.max_cart_lines)?,
            max_line_quantity: parse_var(
                &lookup,
                "BREWLINE_MAX_LINE_QUANTITY",
                defaults.max_line_quantity,
            )?,
            currency_code: lookup("BREWLINE_CURRENCY_CODE").unwrap_or(defaults.currency_code),
            currency_symbol: lookup("BREWLINE_CURRENCY_SYMBOL").unwrap_or(defaults.currency_symbol),
            currency_decimals: parse_var(
                &lookup,
                "BREWLINE_CURRENCY_DECIMALS",
                defaults.currency_decimals,
            )?,
            log_filter: lookup("BREWLINE_LOG").unwrap_or(defaults.log_filter),
        };

        if config.max_cart_lines == 0 {
            return Err(ConfigError::InvalidValue("BREWLINE_MAX_CART_LINES".to_string()));
        }
        if config.max_line_quantity <= 0 {
            return Err(ConfigError::InvalidValue("BREWLINE_MAX_LINE_QUANTITY".to_string()));
        }
        if config.currency_decimals > MAX_CURRENCY_DECIMALS {
            return Err(ConfigError::InvalidValue("BREWLINE_CURRENCY_DECIMALS".to_string()));
        }

        Ok(config)
    }

    /// Formats an amount for display, e.g. `155,350 ₫` or `$12.34`.
    ///
    /// Decimals above [`MAX_CURRENCY_DECIMALS`] are clamped.
    pub fn format_money(&self, money: Money) -> String {
        let decimals = self.currency_decimals.min(MAX_CURRENCY_DECIMALS);
        if decimals == 0 {
            return format!("{} {}", money, self.currency_symbol);
        }

        let cents = money.amount();
        let divisor = 10_i64.pow(u32::from(decimals));
        let whole = (cents / divisor).abs();
        let frac = (cents % divisor).abs();
        format!(
            "{}{}{}.{:0width$}",
            if cents < 0 { "-" } else { "" },
            self.currency_symbol,
            whole,
            frac,
            width = usize::from(decimals)
        )
    }
}

fn parse_var<F, T>(lookup: &F, key: &str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidValue(key.to_string())),
        None => Ok(default),
    }
}

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}")]
    InvalidValue(String),
}
