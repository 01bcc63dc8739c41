//! # Ordering Walkthrough
//!
//! Scripted run of the whole ordering flow against an in-memory shop.
//!
//! ## Usage
//! ```bash
//! cargo run -p brewline-store --bin walkthrough
//!
//! # Print the placed orders as JSON
//! cargo run -p brewline-store --bin walkthrough -- --json
//!
//! # More log output
//! RUST_LOG=brewline_store=debug cargo run -p brewline-store --bin walkthrough
//! ```
//!
//! ## Steps
//! 1. Bootstrap the admin account and seed the menu
//! 2. Register a customer and fill a cart
//! 3. Check out by bank transfer, pay short, then pay in full
//! 4. Check out cash on delivery, then cancel it
//! 5. Print revenue

use std::env;

use brewline_core::{Money, OrderType, PaymentMethod, Settlement, Size};
use brewline_store::{init_tracing, Shop, ShopConfig};

/// Menu seeded at startup: (name, price, is_drink)
const MENU: &[(&str, i64, bool)] = &[
    ("Latte", 45_000, true),
    ("Cold Brew", 40_000, true),
    ("Matcha Latte", 50_000, true),
    ("Bagel", 30_000, false),
    ("Croissant", 35_000, false),
];

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut json = false;
    for arg in env::args().skip(1) {
        match arg.as_str() {
            "--json" | "-j" => json = true,
            "--help" | "-h" => {
                println!("Brewline Ordering Walkthrough");
                println!();
                println!("Usage: walkthrough [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -j, --json    Print placed orders as JSON");
                println!("  -h, --help    Show this help message");
                return Ok(());
            }
            _ => {}
        }
    }

    let config = ShopConfig::from_env()?;
    init_tracing(&config.log_filter);

    println!("☕ Brewline Ordering Walkthrough");
    println!("================================");
    println!("Currency: {}", config.currency_code);
    println!();

    let shop = Shop::bootstrap(config)?;
    let admin = shop.login(&shop.config().admin_username, &shop.config().admin_password)?;
    println!("✓ Admin '{}' logged in", shop.config().admin_username);

    for (name, price, is_drink) in MENU {
        let price = Money::from_minor(*price);
        if *is_drink {
            shop.add_drink(&admin, name, price, true)?;
        } else {
            shop.add_food(&admin, name, price, false)?;
        }
    }
    let menu = shop.browse();
    println!("✓ Seeded {} products", menu.len());

    shop.register_customer("alice", "secret1", "0901234567")?;
    let alice = shop.login("alice", "secret1")?;
    shop.set_address(&alice, "12 Tran Hung Dao")?;
    println!("✓ Customer 'alice' registered");

    // Scenario: one large latte and two bagels
    let latte = find(&menu, "Latte")?;
    let bagel = find(&menu, "Bagel")?;
    shop.add_to_cart(&alice, latte, 1, Size::L)?;
    shop.add_to_cart(&alice, bagel, 2, Size::M)?;
    println!();
    println!("Cart subtotal: {}", shop.config().format_money(shop.cart_subtotal(&alice)?));

    let order = shop.checkout(&alice, OrderType::Regular, "", PaymentMethod::BankTransfer)?;
    println!(
        "✓ Order {} placed: subtotal {} + tax {} + delivery {} = {} ({})",
        order.id(),
        shop.config().format_money(order.subtotal()),
        shop.config().format_money(order.tax()),
        shop.config().format_money(order.delivery_fee()),
        shop.config().format_money(order.total()),
        order.status()
    );

    for tendered in [100_000, 200_000] {
        let tendered = Money::from_minor(tendered);
        match shop.pay_order(&alice, order.id(), tendered)? {
            Settlement::Paid { change } => println!(
                "  Paid {} → change {}",
                shop.config().format_money(tendered),
                shop.config().format_money(change)
            ),
            Settlement::Rejected { reason } => println!(
                "  Tendered {} → rejected ({:?})",
                shop.config().format_money(tendered),
                reason
            ),
        }
    }

    // Scenario: express cash on delivery, cancelled before preparation
    let cold_brew = find(&menu, "Cold Brew")?;
    shop.add_to_cart(&alice, cold_brew, 1, Size::S)?;
    let express = shop.checkout(&alice, OrderType::Express, "", PaymentMethod::CashOnDelivery)?;
    println!();
    println!(
        "✓ Order {} placed: {} ({})",
        express.id(),
        shop.config().format_money(express.total()),
        express.status()
    );
    let cancelled = shop.cancel_order(&alice, express.id())?;
    println!("  Cancelled → {}", cancelled.status());

    println!();
    println!("Revenue: {}", shop.config().format_money(shop.total_revenue(&admin)?));
    println!("Paid payments: {}", shop.paid_payments(&admin)?.len());
    println!("All payments: {}", shop.all_payments(&admin)?.len());

    if json {
        println!();
        println!("{}", serde_json::to_string_pretty(&shop.all_orders(&admin)?)?);
    }

    shop.logout(&alice)?;
    shop.logout(&admin)?;
    println!();
    println!("✓ Walkthrough complete!");

    Ok(())
}

fn find<'a>(menu: &'a [brewline_core::Product], name: &str) -> Result<&'a str, String> {
    menu.iter()
        .find(|p| p.name == name)
        .map(|p| p.id.as_str())
        .ok_or_else(|| format!("{} missing from menu", name))
}
