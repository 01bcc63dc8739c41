//! End-to-end ordering flows through the `Shop` facade.

use std::thread;

use brewline_core::{
    Category, Money, OrderStatus, OrderType, Payment, PaymentMethod, PaymentStatus, Settlement,
    SettlementRejection, ShopError, Size, ValidationError,
};
use brewline_store::{ProductUpdate, Shop, ShopConfig};

struct Setup {
    shop: Shop,
    admin: String,
    customer: String,
    latte: String,
    bagel: String,
}

fn setup() -> Setup {
    let shop = Shop::bootstrap(ShopConfig::default()).unwrap();
    let admin = shop.login("admin", "admin123").unwrap();
    let latte = shop
        .add_drink(&admin, "Latte", Money::from_minor(45_000), true)
        .unwrap()
        .id;
    let bagel = shop
        .add_food(&admin, "Bagel", Money::from_minor(30_000), false)
        .unwrap()
        .id;

    shop.register_customer("minh", "secret1", "0901234567").unwrap();
    let customer = shop.login("minh", "secret1").unwrap();

    Setup {
        shop,
        admin,
        customer,
        latte,
        bagel,
    }
}

fn scenario_cart(s: &Setup) {
    s.shop.add_to_cart(&s.customer, &s.latte, 1, Size::L).unwrap();
    s.shop.add_to_cart(&s.customer, &s.bagel, 2, Size::M).unwrap();
}

#[test]
fn regular_order_totals() {
    let s = setup();
    scenario_cart(&s);

    let order = s
        .shop
        .checkout(&s.customer, OrderType::Regular, "12 Tran Hung Dao", PaymentMethod::BankTransfer)
        .unwrap();

    assert_eq!(order.subtotal().amount(), 118_500);
    assert_eq!(order.tax().amount(), 11_850);
    assert_eq!(order.delivery_fee().amount(), 25_000);
    assert_eq!(order.total().amount(), 155_350);
    assert_eq!(order.lines().len(), 2);
}

#[test]
fn cash_on_delivery_is_confirmed_and_paid_at_checkout() {
    let s = setup();
    scenario_cart(&s);

    let order = s
        .shop
        .checkout(
            &s.customer,
            OrderType::Express,
            "12 Tran Hung Dao",
            PaymentMethod::CashOnDelivery,
        )
        .unwrap();

    assert_eq!(order.status(), OrderStatus::Confirmed);
    assert_eq!(order.delivery_fee().amount(), 50_000);
    let payment = order.payment().unwrap();
    assert_eq!(payment.status(), PaymentStatus::Paid);
    assert_eq!(payment.amount_paid(), order.total());
    assert_eq!(s.shop.total_revenue(&s.admin).unwrap(), order.total());
}

#[test]
fn bank_transfer_settles_only_on_full_tender() {
    let mut payment = Payment::new("o-1", Money::from_minor(100_000), PaymentMethod::BankTransfer);

    let short = payment.settle(Money::from_minor(50_000));
    assert!(!short.is_paid());
    assert_eq!(payment.status(), PaymentStatus::Unpaid);
    assert_eq!(payment.amount_paid(), Money::zero());

    let full = payment.settle(Money::from_minor(120_000));
    assert_eq!(
        full,
        Settlement::Paid {
            change: Money::from_minor(20_000)
        }
    );
    assert_eq!(payment.status(), PaymentStatus::Paid);
    assert_eq!(payment.change().amount(), 20_000);
}

#[test]
fn bank_transfer_through_shop() {
    let s = setup();
    scenario_cart(&s);
    let order = s
        .shop
        .checkout(&s.customer, OrderType::Regular, "12 Tran Hung Dao", PaymentMethod::BankTransfer)
        .unwrap();
    assert_eq!(s.shop.total_revenue(&s.admin).unwrap(), Money::zero());

    let outcome = s
        .shop
        .pay_order(&s.customer, order.id(), Money::from_minor(150_000))
        .unwrap();
    assert_eq!(
        outcome,
        Settlement::Rejected {
            reason: SettlementRejection::InsufficientTender {
                due: Money::from_minor(155_350),
                tendered: Money::from_minor(150_000),
            }
        }
    );

    let outcome = s
        .shop
        .pay_order(&s.admin, order.id(), Money::from_minor(155_350))
        .unwrap();
    assert_eq!(outcome, Settlement::Paid { change: Money::zero() });

    // Paying again is a no-op success.
    let again = s
        .shop
        .pay_order(&s.customer, order.id(), Money::from_minor(1))
        .unwrap();
    assert!(again.is_paid());

    let stored = s.shop.order(&s.customer, order.id()).unwrap();
    assert_eq!(stored.status(), OrderStatus::Confirmed);
    assert_eq!(s.shop.total_revenue(&s.admin).unwrap().amount(), 155_350);
}

#[test]
fn size_changes_are_validated() {
    let s = setup();
    let latte = s.shop.add_to_cart(&s.customer, &s.latte, 1, Size::M).unwrap();
    let bagel = s.shop.add_to_cart(&s.customer, &s.bagel, 1, Size::M).unwrap();

    for line_id in [latte.id(), bagel.id()] {
        assert!(matches!(
            s.shop.update_cart_size(&s.customer, line_id, "Z"),
            Err(ShopError::Validation(ValidationError::InvalidSize { .. }))
        ));
    }
    assert!(matches!(
        s.shop.update_cart_size(&s.customer, bagel.id(), "L"),
        Err(ShopError::Validation(ValidationError::SizeNotApplicable {
            category: Category::Food
        }))
    ));

    s.shop.update_cart_size(&s.customer, latte.id(), "S").unwrap();
    assert_eq!(s.shop.cart_subtotal(&s.customer).unwrap().amount(), 36_000 + 30_000);
}

#[test]
fn oversized_amounts_are_rejected_without_panicking() {
    let s = setup();
    let gold = s
        .shop
        .add_food(&s.admin, "Gold Leaf Cake", Money::from_minor(i64::MAX / 2), false)
        .unwrap()
        .id;

    assert!(matches!(
        s.shop.add_to_cart(&s.customer, &gold, 3, Size::M),
        Err(ShopError::Validation(ValidationError::TooLarge { .. }))
    ));
    assert!(s.shop.view_cart(&s.customer).unwrap().is_empty());

    s.shop.add_to_cart(&s.customer, &gold, 1, Size::M).unwrap();
    s.shop.add_to_cart(&s.customer, &gold, 1, Size::M).unwrap();
    let checkout = s.shop.checkout(
        &s.customer,
        OrderType::Regular,
        "12 Tran Hung Dao",
        PaymentMethod::BankTransfer,
    );
    assert!(matches!(
        checkout,
        Err(ShopError::Validation(ValidationError::TooLarge { .. }))
    ));
    assert_eq!(s.shop.view_cart(&s.customer).unwrap().len(), 2);
    assert!(s.shop.my_orders(&s.customer).unwrap().is_empty());
}

#[test]
fn cart_prices_are_snapshots() {
    let s = setup();
    s.shop.add_to_cart(&s.customer, &s.latte, 1, Size::M).unwrap();

    s.shop
        .update_product(
            &s.admin,
            &s.latte,
            ProductUpdate {
                price: Some(Money::from_minor(60_000)),
                ..ProductUpdate::default()
            },
        )
        .unwrap();

    assert_eq!(s.shop.cart_subtotal(&s.customer).unwrap().amount(), 45_000);

    s.shop
        .update_product(
            &s.admin,
            &s.latte,
            ProductUpdate {
                available: Some(false),
                ..ProductUpdate::default()
            },
        )
        .unwrap();
    assert!(matches!(
        s.shop.add_to_cart(&s.customer, &s.latte, 1, Size::M),
        Err(ShopError::Validation(ValidationError::ProductUnavailable { .. }))
    ));
    assert!(matches!(
        s.shop.add_to_cart(&s.customer, "no-such-product", 1, Size::M),
        Err(ShopError::NotFound { .. })
    ));
}

#[test]
fn cart_editing() {
    let s = setup();
    let line = s.shop.add_to_cart(&s.customer, &s.bagel, 1, Size::M).unwrap();

    s.shop.update_cart_quantity(&s.customer, line.id(), 4).unwrap();
    assert_eq!(s.shop.cart_subtotal(&s.customer).unwrap().amount(), 120_000);

    assert!(s.shop.update_cart_quantity(&s.customer, line.id(), -1).is_err());
    s.shop.update_cart_quantity(&s.customer, line.id(), 0).unwrap();
    assert!(s.shop.view_cart(&s.customer).unwrap().is_empty());

    s.shop.add_to_cart(&s.customer, &s.bagel, 1, Size::M).unwrap();
    s.shop.clear_cart(&s.customer).unwrap();
    assert!(s.shop.view_cart(&s.customer).unwrap().is_empty());
}

#[test]
fn cancel_rules_and_refunds() {
    let s = setup();

    scenario_cart(&s);
    let cod = s
        .shop
        .checkout(&s.customer, OrderType::Regular, "addr", PaymentMethod::CashOnDelivery)
        .unwrap();

    scenario_cart(&s);
    let delivered = s
        .shop
        .checkout(&s.customer, OrderType::Regular, "addr", PaymentMethod::CashOnDelivery)
        .unwrap();
    s.shop
        .update_order_status(&s.admin, delivered.id(), OrderStatus::Delivered)
        .unwrap();

    assert_eq!(s.shop.total_revenue(&s.admin).unwrap().amount(), 310_700);

    let cancelled = s.shop.cancel_order(&s.customer, cod.id()).unwrap();
    assert_eq!(cancelled.status(), OrderStatus::Cancelled);
    assert_eq!(cancelled.payment().unwrap().status(), PaymentStatus::Refunded);

    assert!(matches!(
        s.shop.cancel_order(&s.customer, delivered.id()),
        Err(ShopError::Validation(ValidationError::NotCancellable {
            status: OrderStatus::Delivered
        }))
    ));
    assert_eq!(
        s.shop.order(&s.customer, delivered.id()).unwrap().status(),
        OrderStatus::Delivered
    );

    assert_eq!(s.shop.total_revenue(&s.admin).unwrap().amount(), 155_350);
    assert_eq!(s.shop.paid_payments(&s.admin).unwrap().len(), 1);
}

#[test]
fn order_history_and_listing() {
    let s = setup();
    let mut placed = Vec::new();
    for _ in 0..3 {
        scenario_cart(&s);
        let order = s
            .shop
            .checkout(&s.customer, OrderType::Regular, "addr", PaymentMethod::BankTransfer)
            .unwrap();
        placed.push(order.id().to_string());
    }

    let mine: Vec<_> = s
        .shop
        .my_orders(&s.customer)
        .unwrap()
        .iter()
        .map(|o| o.id().to_string())
        .collect();
    assert_eq!(mine, placed);

    let caller = s.shop.whoami(&s.customer).unwrap();
    assert_eq!(caller.as_customer().unwrap().order_history, placed);
    assert_eq!(s.shop.all_orders(&s.admin).unwrap().len(), 3);
}

#[test]
fn sessions_gate_every_operation() {
    let s = setup();
    s.shop.logout(&s.customer).unwrap();

    assert!(matches!(
        s.shop.view_cart(&s.customer),
        Err(ShopError::Authentication(_))
    ));
    assert!(matches!(
        s.shop.checkout(&s.customer, OrderType::Regular, "addr", PaymentMethod::BankTransfer),
        Err(ShopError::Authentication(_))
    ));
    // Browsing stays open.
    assert_eq!(s.shop.browse().len(), 2);
}

#[test]
fn concurrent_customers_keep_separate_carts() {
    let s = setup();
    let tokens: Vec<String> = (0..8)
        .map(|i| {
            let name = format!("guest{}", i);
            s.shop.register_customer(&name, "secret1", "0900").unwrap();
            s.shop.login(&name, "secret1").unwrap()
        })
        .collect();

    thread::scope(|scope| {
        for token in &tokens {
            let s = &s;
            scope.spawn(move || {
                for _ in 0..5 {
                    s.shop.add_to_cart(token, &s.bagel, 1, Size::M).unwrap();
                }
                s.shop
                    .checkout(token, OrderType::Regular, "addr", PaymentMethod::CashOnDelivery)
                    .unwrap();
            });
        }
    });

    let orders = s.shop.all_orders(&s.admin).unwrap();
    assert_eq!(orders.len(), 8);
    // 150,000 + 15,000 tax + 25,000 delivery
    assert!(orders.iter().all(|o| o.total().amount() == 190_000));
    assert_eq!(s.shop.total_revenue(&s.admin).unwrap().amount(), 8 * 190_000);
    for token in &tokens {
        assert!(s.shop.view_cart(token).unwrap().is_empty());
    }
}
