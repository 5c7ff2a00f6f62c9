use std::collections::BTreeMap;

use stockroom_core::{DomainError, DomainResult, ProductId};

use crate::numbering::{CatalogNumbers, next_catalog_numbers};
use crate::product::Product;

/// Products keyed by identity, as loaded for a reporting run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductCatalog {
    products: BTreeMap<ProductId, Product>,
}

impl ProductCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, product: Product) -> Option<Product> {
        self.products.insert(product.id, product)
    }

    pub fn get(&self, id: ProductId) -> Option<&Product> {
        self.products.get(&id)
    }

    pub fn require(&self, id: ProductId) -> DomainResult<&Product> {
        self.get(id)
            .ok_or_else(|| DomainError::not_found(format!("product {id}")))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Product> {
        self.products.values()
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    /// Suggested catalog numbers for the next product.
    pub fn next_catalog_numbers(&self) -> CatalogNumbers {
        next_catalog_numbers(self.iter().filter_map(|p| p.catalog_number))
    }
}

impl FromIterator<Product> for ProductCatalog {
    fn from_iter<I: IntoIterator<Item = Product>>(iter: I) -> Self {
        let mut catalog = Self::new();
        for product in iter {
            catalog.insert(product);
        }
        catalog
    }
}
