use std::collections::BTreeMap;
use std::sync::RwLock;

use async_trait::async_trait;

use stockroom_core::{ProductId, UnitId};
use stockroom_inventory::{
    AdjustmentDocument, MovementDocument, MovementKind, MovementSource, MovementSourceError,
};
use stockroom_products::{CatalogNumbers, Product, ProductCatalog, Unit};
use stockroom_purchasing::ImportDocument;
use stockroom_sales::{ExportDocument, next_invoice_number};

use super::r#trait::ProductStore;
use super::snapshot::Snapshot;

#[derive(Debug, Default)]
struct Collections {
    units: BTreeMap<UnitId, Unit>,
    products: ProductCatalog,
    imports: Vec<ImportDocument>,
    exports: Vec<ExportDocument>,
    adjustments: Vec<AdjustmentDocument>,
}

/// In-memory document store.
///
/// Intended for tests, dev and file-based reporting. Queries filter at
/// document granularity, like the real store.
#[derive(Debug, Default)]
pub struct InMemoryDocumentStore {
    inner: RwLock<Collections>,
}

fn poisoned() -> MovementSourceError {
    MovementSourceError::Unavailable("lock poisoned".to_string())
}

impl InMemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_snapshot(snapshot: Snapshot) -> Self {
        let collections = Collections {
            units: snapshot.units.into_iter().map(|u| (u.id, u)).collect(),
            products: snapshot.products.into_iter().collect(),
            imports: snapshot.imports,
            exports: snapshot.exports,
            adjustments: snapshot.adjustments,
        };
        Self {
            inner: RwLock::new(collections),
        }
    }

    pub fn snapshot(&self) -> Result<Snapshot, MovementSourceError> {
        let inner = self.inner.read().map_err(|_| poisoned())?;
        Ok(Snapshot {
            units: inner.units.values().cloned().collect(),
            products: inner.products.iter().cloned().collect(),
            imports: inner.imports.clone(),
            exports: inner.exports.clone(),
            adjustments: inner.adjustments.clone(),
        })
    }

    fn write(&self, f: impl FnOnce(&mut Collections)) -> Result<(), MovementSourceError> {
        let mut inner = self.inner.write().map_err(|_| poisoned())?;
        f(&mut inner);
        Ok(())
    }

    pub fn insert_unit(&self, unit: Unit) -> Result<(), MovementSourceError> {
        self.write(|c| {
            c.units.insert(unit.id, unit);
        })
    }

    pub fn insert_product(&self, product: Product) -> Result<(), MovementSourceError> {
        self.write(|c| {
            c.products.insert(product);
        })
    }

    pub fn insert_import(&self, doc: ImportDocument) -> Result<(), MovementSourceError> {
        self.write(|c| c.imports.push(doc))
    }

    pub fn insert_export(&self, doc: ExportDocument) -> Result<(), MovementSourceError> {
        self.write(|c| c.exports.push(doc))
    }

    pub fn insert_adjustment(&self, doc: AdjustmentDocument) -> Result<(), MovementSourceError> {
        self.write(|c| c.adjustments.push(doc))
    }

    pub fn unit(&self, id: UnitId) -> Option<Unit> {
        self.inner.read().ok()?.units.get(&id).cloned()
    }

    pub fn catalog(&self) -> Result<ProductCatalog, MovementSourceError> {
        Ok(self.inner.read().map_err(|_| poisoned())?.products.clone())
    }

    pub fn imports(&self) -> Result<Vec<ImportDocument>, MovementSourceError> {
        Ok(self.inner.read().map_err(|_| poisoned())?.imports.clone())
    }

    pub fn exports(&self) -> Result<Vec<ExportDocument>, MovementSourceError> {
        Ok(self.inner.read().map_err(|_| poisoned())?.exports.clone())
    }

    pub fn next_catalog_numbers(&self) -> Result<CatalogNumbers, MovementSourceError> {
        Ok(self.inner.read().map_err(|_| poisoned())?.products.next_catalog_numbers())
    }

    pub fn next_invoice_number(&self) -> Result<u64, MovementSourceError> {
        let inner = self.inner.read().map_err(|_| poisoned())?;
        Ok(next_invoice_number(inner.exports.iter().filter_map(|e| e.invoice_number)))
    }
}

#[async_trait]
impl MovementSource for InMemoryDocumentStore {
    async fn find_by_product(
        &self,
        kind: MovementKind,
        product: ProductId,
    ) -> Result<Vec<MovementDocument>, MovementSourceError> {
        let inner = self.inner.read().map_err(|_| poisoned())?;

        let documents: Vec<MovementDocument> = match kind {
            MovementKind::Import => inner.imports.iter().map(ImportDocument::to_movement).collect(),
            MovementKind::Export => inner.exports.iter().map(ExportDocument::to_movement).collect(),
            MovementKind::Adjustment => inner
                .adjustments
                .iter()
                .map(AdjustmentDocument::to_movement)
                .collect(),
        };

        Ok(documents.into_iter().filter(|doc| doc.mentions(product)).collect())
    }
}

#[async_trait]
impl ProductStore for InMemoryDocumentStore {
    async fn find_product(&self, id: ProductId) -> Result<Option<Product>, MovementSourceError> {
        let inner = self.inner.read().map_err(|_| poisoned())?;
        Ok(inner.products.get(id).cloned())
    }

    async fn list_products(&self) -> Result<Vec<Product>, MovementSourceError> {
        let inner = self.inner.read().map_err(|_| poisoned())?;
        Ok(inner.products.iter().cloned().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use stockroom_inventory::MovementLine;
    use stockroom_purchasing::ImportLine;

    #[tokio::test]
    async fn query_returns_whole_documents_mentioning_the_product() {
        let store = InMemoryDocumentStore::new();
        let (p, q, kg) = (ProductId::new(), ProductId::new(), UnitId::new());
        let import_line = |product| ImportLine {
            product: Some(product),
            quantity: 1.0,
            unit: Some(kg),
            price: None,
        };
        store
            .insert_import(ImportDocument::new(Utc::now(), vec![import_line(p), import_line(q)]))
            .unwrap();
        store
            .insert_import(ImportDocument::new(Utc::now(), vec![import_line(q)]))
            .unwrap();
        store
            .insert_adjustment(AdjustmentDocument::new(Utc::now(), vec![MovementLine::new(p, 1.0, kg)]))
            .unwrap();

        let imports = store.find_by_product(MovementKind::Import, p).await.unwrap();
        assert_eq!(imports.len(), 1);
        assert_eq!(imports[0].lines.len(), 2);

        let exports = store.find_by_product(MovementKind::Export, p).await.unwrap();
        assert!(exports.is_empty());

        let adjustments = store.find_by_product(MovementKind::Adjustment, q).await.unwrap();
        assert!(adjustments.is_empty());
    }

    #[test]
    fn snapshot_restores_collections() {
        let store = InMemoryDocumentStore::new();
        let kg = Unit::new("kg");
        let mut product = Product::new("Salt", kg.id);
        product.catalog_number = Some(7);
        store.insert_unit(kg.clone()).unwrap();
        store.insert_product(product.clone()).unwrap();

        let restored = InMemoryDocumentStore::from_snapshot(store.snapshot().unwrap());

        assert_eq!(restored.unit(kg.id), Some(kg));
        assert_eq!(restored.catalog().unwrap().get(product.id), Some(&product));
        assert_eq!(restored.next_catalog_numbers().unwrap().low, 8);
        assert_eq!(restored.next_invoice_number().unwrap(), 1);
    }
}
