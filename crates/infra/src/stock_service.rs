//! Stock figures on demand.
//!
//! Stock is never stored: every call reconciles the product's movement
//! history afresh. The load phase runs under the configured deadline; the
//! reconciler itself has none.

use std::time::Duration;

use thiserror::Error;

use stockroom_core::ProductId;
use stockroom_inventory::{InventoryReconciler, MovementSource, MovementSourceError, StockReport};
use stockroom_products::Product;

use crate::config::StockroomConfig;
use crate::document_store::ProductStore;

#[derive(Debug, Error)]
pub enum StockServiceError {
    #[error("product not found: {0}")]
    ProductNotFound(ProductId),

    #[error(transparent)]
    Source(#[from] MovementSourceError),

    #[error("loading movements timed out after {0:?}")]
    Timeout(Duration),
}

/// Runs reconciliations against a document store.
#[derive(Debug, Clone)]
pub struct StockService<S> {
    store: S,
    load_timeout: Duration,
}

impl<S> StockService<S>
where
    S: MovementSource + ProductStore + Clone,
{
    pub fn new(store: S, load_timeout: Duration) -> Self {
        Self { store, load_timeout }
    }

    pub fn from_config(store: S, config: &StockroomConfig) -> Self {
        Self::new(store, config.load_timeout())
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Current stock of one product, in its export unit.
    #[tracing::instrument(skip(self))]
    pub async fn stock_of(&self, product_id: ProductId) -> Result<StockReport, StockServiceError> {
        let product = self
            .store
            .find_product(product_id)
            .await?
            .ok_or(StockServiceError::ProductNotFound(product_id))?;

        self.reconcile(product).await
    }

    /// Reconcile an already-fetched product record.
    pub async fn reconcile(&self, product: Product) -> Result<StockReport, StockServiceError> {
        let reconciler = InventoryReconciler::new(product, self.store.clone());

        let loaded = tokio::time::timeout(self.load_timeout, reconciler.load())
            .await
            .map_err(|_| StockServiceError::Timeout(self.load_timeout))??;

        let report = loaded.report();
        if report.unconvertible_lines > 0 {
            tracing::info!(
                product = %report.product,
                unconvertible_lines = report.unconvertible_lines,
                "stock computed with unconvertible lines counted as zero"
            );
        }

        Ok(report)
    }

    /// Stock of every product. Each product is reconciled independently; the
    /// first failure aborts the run.
    pub async fn stock_levels(&self) -> Result<Vec<(Product, StockReport)>, StockServiceError> {
        let products = self.store.list_products().await?;
        let mut levels = Vec::with_capacity(products.len());

        for product in products {
            let report = self.reconcile(product.clone()).await?;
            levels.push((product, report));
        }

        tracing::debug!(products = levels.len(), "stock levels computed");
        Ok(levels)
    }
}
