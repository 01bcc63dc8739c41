//! # Order Repository
//!
//! Insertion-ordered order storage with an id index, and the revenue
//! rollups built on top of it.
//!
//! Not synchronized on its own; [`crate::Shop`] keeps it behind a mutex.

use std::collections::HashMap;

use brewline_core::{Money, Order, Payment, ShopError, ShopResult, ValidationError};

#[derive(Debug, Default)]
pub struct OrderRepository {
    orders: Vec<Order>,
    index: HashMap<String, usize>,
}

impl OrderRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.orders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }

    /// Stores a new order. Ids are unique.
    pub fn create(&mut self, order: Order) -> ShopResult<&Order> {
        if self.index.contains_key(order.id()) {
            return Err(ValidationError::Duplicate {
                field: "order id".to_string(),
                value: order.id().to_string(),
            }
            .into());
        }

        let position = self.orders.len();
        self.index.insert(order.id().to_string(), position);
        self.orders.push(order);
        Ok(&self.orders[position])
    }

    pub fn get(&self, order_id: &str) -> ShopResult<&Order> {
        self.index
            .get(order_id)
            .map(|&i| &self.orders[i])
            .ok_or_else(|| ShopError::not_found("Order", order_id))
    }

    pub fn get_mut(&mut self, order_id: &str) -> ShopResult<&mut Order> {
        match self.index.get(order_id) {
            Some(&i) => Ok(&mut self.orders[i]),
            None => Err(ShopError::not_found("Order", order_id)),
        }
    }

    /// An owner's orders, oldest first.
    pub fn list_by_owner(&self, owner_id: &str) -> Vec<Order> {
        self.orders
            .iter()
            .filter(|order| order.is_owned_by(owner_id))
            .cloned()
            .collect()
    }

    pub fn list_all(&self) -> Vec<Order> {
        self.orders.clone()
    }

    fn payments(&self) -> impl Iterator<Item = &Payment> {
        self.orders.iter().filter_map(Order::payment)
    }

    /// Sum of `amount_due` over PAID payments.
    ///
    /// Change handed back is not revenue, and refunded payments drop out.
    pub fn total_revenue(&self) -> ShopResult<Money> {
        let paid = self
            .payments()
            .filter(|payment| payment.is_paid())
            .map(Payment::amount_due);
        Money::checked_sum(paid).ok_or_else(|| {
            ValidationError::TooLarge {
                field: "revenue".to_string(),
            }
            .into()
        })
    }

    pub fn list_paid_payments(&self) -> Vec<Payment> {
        self.payments()
            .filter(|payment| payment.is_paid())
            .cloned()
            .collect()
    }

    pub fn all_payments(&self) -> Vec<Payment> {
        self.payments().cloned().collect()
    }

    pub fn payment_by_order_id(&self, order_id: &str) -> ShopResult<Payment> {
        self.get(order_id)?
            .payment()
            .cloned()
            .ok_or_else(|| ShopError::not_found("Payment", order_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use brewline_core::{CartLine, Category, OrderType, PaymentMethod, Size};

    fn order(owner: &str, method: PaymentMethod) -> Order {
        let latte = Money::from_minor(45_000);
        let bagel = Money::from_minor(30_000);
        let lines = vec![
            CartLine::new("latte", owner, 1, latte, Category::Drink, Size::L).unwrap(),
            CartLine::new("bagel", owner, 2, bagel, Category::Food, Size::M).unwrap(),
        ];
        Order::place(owner, lines, OrderType::Regular, "12 Tran Hung Dao", method).unwrap()
    }

    fn place(repo: &mut OrderRepository, owner: &str, method: PaymentMethod) -> String {
        repo.create(order(owner, method)).unwrap().id().to_string()
    }

    #[test]
    fn test_create_and_get() {
        let mut repo = OrderRepository::new();
        let placed = order("c-1", PaymentMethod::BankTransfer);
        let id = placed.id().to_string();

        repo.create(placed.clone()).unwrap();
        assert_eq!(repo.get(&id).unwrap().id(), id);
        assert_eq!(repo.len(), 1);

        assert!(matches!(
            repo.create(placed),
            Err(ShopError::Validation(ValidationError::Duplicate { .. }))
        ));
        assert!(matches!(repo.get("missing"), Err(ShopError::NotFound { .. })));
    }

    #[test]
    fn test_listing_keeps_insertion_order() {
        let mut repo = OrderRepository::new();
        let a = place(&mut repo, "c-1", PaymentMethod::BankTransfer);
        let b = place(&mut repo, "c-2", PaymentMethod::BankTransfer);
        let c = place(&mut repo, "c-1", PaymentMethod::CashOnDelivery);

        let mine: Vec<_> = repo.list_by_owner("c-1").iter().map(|o| o.id().to_string()).collect();
        assert_eq!(mine, vec![a.clone(), c.clone()]);

        let all: Vec<_> = repo.list_all().iter().map(|o| o.id().to_string()).collect();
        assert_eq!(all, vec![a, b, c]);
        assert!(repo.list_by_owner("nobody").is_empty());
    }

    #[test]
    fn test_revenue_counts_amount_due_of_paid_only() {
        let mut repo = OrderRepository::new();
        let cod = place(&mut repo, "c-1", PaymentMethod::CashOnDelivery);
        let bank = place(&mut repo, "c-1", PaymentMethod::BankTransfer);
        place(&mut repo, "c-2", PaymentMethod::BankTransfer);

        assert_eq!(repo.total_revenue().unwrap().amount(), 155_350);

        // Over-tender: change is not revenue.
        repo.get_mut(&bank)
            .unwrap()
            .settle_payment(Money::from_minor(200_000))
            .unwrap();
        assert_eq!(repo.total_revenue().unwrap().amount(), 310_700);
        assert_eq!(repo.list_paid_payments().len(), 2);
        assert_eq!(repo.all_payments().len(), 3);

        repo.get_mut(&cod).unwrap().cancel().unwrap();
        assert_eq!(repo.total_revenue().unwrap().amount(), 155_350);
        assert_eq!(repo.list_paid_payments().len(), 1);
    }

    #[test]
    fn test_revenue_overflow_is_an_error() {
        let mut repo = OrderRepository::new();
        let price = Money::from_minor(4_000_000_000_000_000_000);
        for _ in 0..3 {
            let line = CartLine::new("gold", "c-1", 1, price, Category::Food, Size::M).unwrap();
            let order = Order::place(
                "c-1",
                vec![line],
                OrderType::Regular,
                "addr",
                PaymentMethod::CashOnDelivery,
            )
            .unwrap();
            repo.create(order).unwrap();
        }

        assert!(matches!(
            repo.total_revenue(),
            Err(ShopError::Validation(ValidationError::TooLarge { .. }))
        ));
    }

    #[test]
    fn test_payment_by_order_id() {
        let mut repo = OrderRepository::new();
        let id = place(&mut repo, "c-1", PaymentMethod::BankTransfer);

        let payment = repo.payment_by_order_id(&id).unwrap();
        assert_eq!(payment.order_id(), id);
        assert!(matches!(
            repo.payment_by_order_id("missing"),
            Err(ShopError::NotFound { .. })
        ));
    }
}
