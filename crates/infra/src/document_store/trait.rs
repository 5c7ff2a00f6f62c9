use std::sync::Arc;

use async_trait::async_trait;

use stockroom_core::ProductId;
use stockroom_inventory::MovementSourceError;
use stockroom_products::Product;

/// Read access to product records.
///
/// Shares its error type with movement queries since both hit the same store.
#[async_trait]
pub trait ProductStore: Send + Sync {
    async fn find_product(&self, id: ProductId) -> Result<Option<Product>, MovementSourceError>;

    async fn list_products(&self) -> Result<Vec<Product>, MovementSourceError>;
}

#[async_trait]
impl<S> ProductStore for Arc<S>
where
    S: ProductStore + ?Sized,
{
    async fn find_product(&self, id: ProductId) -> Result<Option<Product>, MovementSourceError> {
        (**self).find_product(id).await
    }

    async fn list_products(&self) -> Result<Vec<Product>, MovementSourceError> {
        (**self).list_products().await
    }
}
