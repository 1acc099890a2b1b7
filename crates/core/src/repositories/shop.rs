//! Health shop products and the shopping cart counter.

use super::matches_term;
use crate::constants::PRODUCT_SEED;
use crate::error::{HealthError, HealthResult};
use serde::Serialize;

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Product {
    pub id: u32,
    pub name: String,
    pub category: String,
    /// Price in yuan.
    pub price: u32,
    /// Pre-discount price, when the product is on sale.
    pub original_price: Option<u32>,
    pub description: String,
    pub rating: f64,
    pub sales: u32,
    pub tags: Vec<String>,
}

/// Product listing plus the number of items added to the cart this session.
#[derive(Clone, Debug, Default)]
pub struct ProductCatalogue {
    products: Vec<Product>,
    cart_count: usize,
}

impl ProductCatalogue {
    pub fn new(products: Vec<Product>) -> Self {
        Self {
            products,
            cart_count: 0,
        }
    }

    /// The six products shown in the shop, with ids starting at 1 and an empty cart.
    pub fn seeded() -> Self {
        let products = PRODUCT_SEED
            .iter()
            .zip(1..)
            .map(|(row, id)| Product {
                id,
                name: row.name.to_string(),
                category: row.category.to_string(),
                price: row.price,
                original_price: row.original_price,
                description: row.description.to_string(),
                rating: row.rating,
                sales: row.sales,
                tags: row.tags.iter().map(|t| t.to_string()).collect(),
            })
            .collect();
        Self::new(products)
    }

    pub fn list(&self) -> &[Product] {
        &self.products
    }

    /// Products whose name, category or description contains `term`, ignoring case.
    pub fn search(&self, term: &str) -> Vec<&Product> {
        self.products
            .iter()
            .filter(|p| matches_term(term, &[&p.name, &p.category, &p.description]))
            .collect()
    }

    /// Add one unit of a product to the cart.
    ///
    /// # Returns
    ///
    /// The cart count after the addition.
    ///
    /// # Errors
    ///
    /// Returns [`HealthError::UnknownRecord`] if no product has `id`; the count is unchanged.
    pub fn add_to_cart(&mut self, id: u32) -> HealthResult<usize> {
        if !self.products.iter().any(|p| p.id == id) {
            return Err(HealthError::UnknownRecord(format!("product {id}")));
        }
        self.cart_count += 1;
        tracing::debug!(product = id, cart = self.cart_count, "added to cart");
        Ok(self.cart_count)
    }

    pub fn cart_count(&self) -> usize {
        self.cart_count
    }
}
