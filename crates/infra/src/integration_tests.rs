//! Integration tests for the full reconciliation pipeline.
//!
//! Tests: documents → InMemoryDocumentStore → StockService → StockReport
//!
//! Verifies:
//! - stock is expressed in the export unit across import/export/adjustment units
//! - documents shared between products are scoped per product
//! - store failures and slow stores surface as service errors

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use async_trait::async_trait;
    use chrono::Utc;

    use stockroom_core::ProductId;
    use stockroom_inventory::{
        AdjustmentDocument, MovementDocument, MovementKind, MovementLine, MovementSource,
        MovementSourceError,
    };
    use stockroom_products::{ConversionRule, Product, Unit};
    use stockroom_purchasing::{ImportDocument, ImportLine};
    use stockroom_sales::{ExportDocument, ExportLine};

    use crate::document_store::{InMemoryDocumentStore, ProductStore, Snapshot};
    use crate::stock_service::{StockService, StockServiceError};

    struct Units {
        g: Unit,
        kg: Unit,
        sack: Unit,
    }

    fn units() -> Units {
        Units {
            g: Unit::new("g"),
            kg: Unit::new("kg"),
            sack: Unit::new("sack"),
        }
    }

    fn import_line(product: &Product, quantity: f64, unit: &Unit) -> ImportLine {
        ImportLine {
            product: Some(product.id),
            quantity,
            unit: Some(unit.id),
            price: Some(1.0),
        }
    }

    fn export_line(product: &Product, quantity: f64, unit: &Unit) -> ExportLine {
        ExportLine {
            product: Some(product.id),
            quantity,
            unit: Some(unit.id),
            price: 2.0,
            bill_quantity: None,
            bill_price: None,
        }
    }

    fn service(store: Arc<InMemoryDocumentStore>) -> StockService<Arc<InMemoryDocumentStore>> {
        StockService::new(store, Duration::from_secs(1))
    }

    fn assert_close(actual: f64, expected: f64) {
        assert!((actual - expected).abs() < 1e-9, "expected {expected}, got {actual}");
    }

    #[tokio::test]
    async fn stock_is_expressed_in_export_unit() {
        let Units { g, kg, sack } = units();
        // 1 sack == 25 kg, 1 g == 0.001 kg
        let flour = Product::new("Flour", kg.id)
            .with_conversion(ConversionRule::new(sack.id, 25.0, kg.id))
            .with_conversion(ConversionRule::new(g.id, 0.001, kg.id));

        let store = Arc::new(InMemoryDocumentStore::new());
        store.insert_product(flour.clone()).unwrap();
        store
            .insert_import(ImportDocument::new(Utc::now(), vec![import_line(&flour, 4.0, &sack)]))
            .unwrap();
        store
            .insert_export(ExportDocument::new(Utc::now(), vec![export_line(&flour, 30.0, &kg)]))
            .unwrap();
        store
            .insert_adjustment(AdjustmentDocument::new(
                Utc::now(),
                vec![MovementLine::new(flour.id, -1500.0, g.id)],
            ))
            .unwrap();

        let report = service(store).stock_of(flour.id).await.unwrap();

        assert_close(report.import_total, 100.0);
        assert_close(report.export_total, 30.0);
        assert_close(report.adjustment_total, -1.5);
        assert_close(report.total, 68.5);
    }

    #[tokio::test]
    async fn two_hop_conversion_reaches_export_unit() {
        let Units { g, kg, sack } = units();
        // sack -> kg -> g, export unit g
        let sugar = Product::new("Sugar", g.id)
            .with_conversion(ConversionRule::new(sack.id, 50.0, kg.id))
            .with_conversion(ConversionRule::new(kg.id, 1000.0, g.id));

        let store = Arc::new(InMemoryDocumentStore::new());
        store.insert_product(sugar.clone()).unwrap();
        store
            .insert_import(ImportDocument::new(Utc::now(), vec![import_line(&sugar, 2.0, &sack)]))
            .unwrap();

        let report = service(store).stock_of(sugar.id).await.unwrap();
        assert_close(report.total, 100_000.0);
    }

    #[tokio::test]
    async fn shared_documents_are_scoped_per_product() {
        let Units { kg, sack, .. } = units();
        let rice = Product::new("Rice", kg.id);
        let beans = Product::new("Beans", kg.id);

        let store = Arc::new(InMemoryDocumentStore::new());
        store.insert_product(rice.clone()).unwrap();
        store.insert_product(beans.clone()).unwrap();
        store
            .insert_import(ImportDocument::new(
                Utc::now(),
                vec![
                    import_line(&rice, 10.0, &kg),
                    import_line(&beans, 6.0, &kg),
                    // no sack rule for beans: counted as zero
                    import_line(&beans, 1.0, &sack),
                ],
            ))
            .unwrap();

        let levels = service(store).stock_levels().await.unwrap();
        let by_id = |id: ProductId| levels.iter().find(|(p, _)| p.id == id).map(|(_, r)| r).unwrap();

        assert_close(by_id(rice.id).total, 10.0);
        assert_close(by_id(beans.id).total, 6.0);
        assert_eq!(by_id(beans.id).unconvertible_lines, 1);
    }

    #[tokio::test]
    async fn unknown_product_is_reported() {
        let store = Arc::new(InMemoryDocumentStore::new());
        let missing = ProductId::new();

        let err = service(store).stock_of(missing).await.unwrap_err();
        assert!(matches!(err, StockServiceError::ProductNotFound(id) if id == missing));
    }

    /// Store that answers product lookups but never finishes movement queries.
    #[derive(Clone)]
    struct StalledStore {
        product: Product,
    }

    #[async_trait]
    impl MovementSource for StalledStore {
        async fn find_by_product(
            &self,
            _kind: MovementKind,
            _product: ProductId,
        ) -> Result<Vec<MovementDocument>, MovementSourceError> {
            std::future::pending().await
        }
    }

    #[async_trait]
    impl ProductStore for StalledStore {
        async fn find_product(&self, _id: ProductId) -> Result<Option<Product>, MovementSourceError> {
            Ok(Some(self.product.clone()))
        }

        async fn list_products(&self) -> Result<Vec<Product>, MovementSourceError> {
            Ok(vec![self.product.clone()])
        }
    }

    #[tokio::test]
    async fn slow_store_hits_the_load_deadline() {
        let product = Product::new("Salt", Unit::new("kg").id);
        let id = product.id;
        let service = StockService::new(StalledStore { product }, Duration::from_millis(20));

        let err = service.stock_of(id).await.unwrap_err();
        assert!(matches!(err, StockServiceError::Timeout(d) if d == Duration::from_millis(20)));
    }

    #[tokio::test]
    async fn snapshot_json_round_trips_into_a_working_store() {
        let Units { g, kg, .. } = units();
        let product = Product::new("Coffee", kg.id).with_conversion(ConversionRule::new(g.id, 0.001, kg.id));
        let snapshot = Snapshot {
            units: vec![g.clone(), kg.clone()],
            products: vec![product.clone()],
            imports: vec![ImportDocument::new(Utc::now(), vec![import_line(&product, 2500.0, &g)])],
            exports: vec![],
            adjustments: vec![],
        };

        let json = snapshot.to_json().unwrap();
        let store = Arc::new(InMemoryDocumentStore::from_snapshot(Snapshot::from_json(&json).unwrap()));

        let report = service(store).stock_of(product.id).await.unwrap();
        assert_close(report.total, 2.5);
    }
}
