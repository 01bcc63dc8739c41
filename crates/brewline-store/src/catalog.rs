//! # Product Catalog
//!
//! Menu storage behind an `RwLock`. Browsing takes the read side, admin
//! edits take the write side. Listing keeps insertion order.
//!
//! Implements [`brewline_core::Catalog`] so the cart only ever sees a
//! [`CatalogEntry`] snapshot.

use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use tracing::{debug, info};

use brewline_core::validation::{validate_product_name, validate_unit_price};
use brewline_core::{
    Catalog, CatalogEntry, Category, Money, Product, ProductDetails, ShopError, ShopResult,
};

/// Fields an admin may change on an existing product. `None` keeps the
/// current value.
#[derive(Debug, Clone, Default)]
pub struct ProductUpdate {
    pub name: Option<String>,
    pub price: Option<Money>,
    pub available: Option<bool>,
    pub details: Option<ProductDetails>,
}

#[derive(Debug, Default)]
pub struct ProductCatalog {
    products: RwLock<Vec<Product>>,
}

impl ProductCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> RwLockReadGuard<'_, Vec<Product>> {
        self.products.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Vec<Product>> {
        self.products.write().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn add_drink(&self, name: &str, price: Money, hot: bool) -> ShopResult<Product> {
        self.insert(name, price, ProductDetails::Drink { hot })
    }

    pub fn add_food(&self, name: &str, price: Money, vegetarian: bool) -> ShopResult<Product> {
        self.insert(name, price, ProductDetails::Food { vegetarian })
    }

    fn insert(&self, name: &str, price: Money, details: ProductDetails) -> ShopResult<Product> {
        validate_product_name(name)?;
        validate_unit_price(price)?;

        let product = Product {
            id: uuid::Uuid::new_v4().to_string(),
            name: name.trim().to_string(),
            price,
            available: true,
            details,
        };
        info!(
            product_id = %product.id,
            name = %product.name,
            %price,
            category = %product.category(),
            "Added product"
        );
        self.write().push(product.clone());
        Ok(product)
    }

    /// Applies `update` to an existing product.
    ///
    /// Carts already holding the product keep the price they were given.
    pub fn update(&self, product_id: &str, update: ProductUpdate) -> ShopResult<Product> {
        if let Some(name) = update.name.as_deref() {
            validate_product_name(name)?;
        }
        if let Some(price) = update.price {
            validate_unit_price(price)?;
        }

        let mut products = self.write();
        let product = products
            .iter_mut()
            .find(|p| p.id == product_id)
            .ok_or_else(|| ShopError::not_found("Product", product_id))?;

        if let Some(name) = update.name {
            product.name = name.trim().to_string();
        }
        if let Some(price) = update.price {
            product.price = price;
        }
        if let Some(available) = update.available {
            product.available = available;
        }
        if let Some(details) = update.details {
            product.details = details;
        }

        info!(product_id, price = %product.price, available = product.available, "Updated product");
        Ok(product.clone())
    }

    pub fn remove(&self, product_id: &str) -> ShopResult<Product> {
        let mut products = self.write();
        let index = products
            .iter()
            .position(|p| p.id == product_id)
            .ok_or_else(|| ShopError::not_found("Product", product_id))?;
        info!(product_id, "Removed product");
        Ok(products.remove(index))
    }

    pub fn get(&self, product_id: &str) -> ShopResult<Product> {
        self.read()
            .iter()
            .find(|p| p.id == product_id)
            .cloned()
            .ok_or_else(|| ShopError::not_found("Product", product_id))
    }

    pub fn list_available(&self) -> Vec<Product> {
        let products = self.read();
        debug!(count = products.len(), "Listing available products");
        products.iter().filter(|p| p.available).cloned().collect()
    }

    pub fn list_by_category(&self, category: Category) -> Vec<Product> {
        self.read()
            .iter()
            .filter(|p| p.available && p.category() == category)
            .cloned()
            .collect()
    }
}

impl Catalog for ProductCatalog {
    fn lookup(&self, product_id: &str) -> ShopResult<CatalogEntry> {
        self.get(product_id).map(|product| product.entry())
    }
}
