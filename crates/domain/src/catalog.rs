//! Static product catalog.

use std::collections::HashSet;
use std::path::Path;

use common::ItemId;
use serde::{Deserialize, Serialize};

use crate::error::CatalogError;

/// A sellable product.
///
/// Products are created once at startup and never change afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    /// Unique, positive product id.
    pub id: ItemId,
    /// Display name.
    pub name: String,
    /// Unit price in whole currency units.
    pub price: u32,
    /// Units available before any reservation is made.
    pub initial_stock: u32,
}

impl Product {
    /// Creates a new product.
    pub fn new(id: i64, name: impl Into<String>, price: u32, initial_stock: u32) -> Self {
        Self {
            id: ItemId::new(id),
            name: name.into(),
            price,
            initial_stock,
        }
    }

    /// Returns the initial stock as a counter value.
    pub fn initial_quantity(&self) -> i64 {
        i64::from(self.initial_stock)
    }
}

/// Read-only list of products, kept in configuration order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Catalog {
    products: Vec<Product>,
}

impl Catalog {
    /// Builds a catalog, rejecting non-positive or duplicate ids.
    pub fn new(products: Vec<Product>) -> Result<Self, CatalogError> {
        let mut seen = HashSet::with_capacity(products.len());
        for product in &products {
            if product.id.as_i64() <= 0 {
                return Err(CatalogError::InvalidId(product.id));
            }
            if !seen.insert(product.id) {
                return Err(CatalogError::DuplicateId(product.id));
            }
        }
        Ok(Self { products })
    }

    /// Parses a JSON array of products.
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let products: Vec<Product> = serde_json::from_str(json)?;
        Self::new(products)
    }

    /// Loads a JSON catalog file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// The built-in suitcase catalog.
    pub fn suitcases() -> Self {
        Self {
            products: vec![
                Product::new(1, "Suitcase 250", 50, 4),
                Product::new(2, "Suitcase 450", 100, 10),
                Product::new(3, "Suitcase 650", 350, 2),
                Product::new(4, "Suitcase 1050", 550, 5),
            ],
        }
    }

    /// Finds a product by id.
    pub fn find_by_id(&self, id: ItemId) -> Option<&Product> {
        self.products.iter().find(|p| p.id == id)
    }

    /// Returns every product in configuration order.
    pub fn products(&self) -> &[Product] {
        &self.products
    }

    /// Returns the number of products.
    pub fn len(&self) -> usize {
        self.products.len()
    }

    /// Returns true if the catalog has no products.
    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::suitcases()
    }
}
