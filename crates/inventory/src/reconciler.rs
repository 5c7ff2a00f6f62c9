//! Stock reconciliation for a single product.
//!
//! Two phases:
//! - **load** (async): fetch the import, export and adjustment documents that
//!   mention the product and keep only the lines referring to it
//! - **sum** (pure): convert every line into the product's export unit and
//!   fold `imports - exports + adjustments`
//!
//! A line whose unit cannot be converted still takes part in the fold, with a
//! contribution of exactly zero.

use serde::{Deserialize, Serialize};

use stockroom_core::ProductId;
use stockroom_products::{ConversionFactor, Product};

use crate::movement::{MovementDocument, MovementKind, MovementLine};
use crate::source::{MovementSource, MovementSourceError};

/// Loads a product's movement history from a [`MovementSource`].
#[derive(Debug, Clone)]
pub struct InventoryReconciler<S> {
    product: Product,
    source: S,
}

impl<S> InventoryReconciler<S>
where
    S: MovementSource,
{
    pub fn new(product: Product, source: S) -> Self {
        Self { product, source }
    }

    pub fn product(&self) -> &Product {
        &self.product
    }

    /// Fetch and scope the three movement histories.
    ///
    /// The fetches are independent and run concurrently. The first failure is
    /// returned as is; there is no retry and no deadline here.
    #[tracing::instrument(skip(self), fields(product = %self.product.id))]
    pub async fn load(&self) -> Result<LoadedInventory, MovementSourceError> {
        let (imports, exports, adjustments) = tokio::try_join!(
            self.fetch_scoped(MovementKind::Import),
            self.fetch_scoped(MovementKind::Export),
            self.fetch_scoped(MovementKind::Adjustment),
        )?;

        Ok(LoadedInventory {
            product: self.product.clone(),
            imports,
            exports,
            adjustments,
        })
    }

    async fn fetch_scoped(&self, kind: MovementKind) -> Result<Vec<MovementLine>, MovementSourceError> {
        let documents = self.source.find_by_product(kind, self.product.id).await?;
        let lines = scope_lines(self.product.id, &documents);

        tracing::debug!(
            kind = %kind,
            documents = documents.len(),
            lines = lines.len(),
            "movement lines loaded"
        );

        Ok(lines)
    }
}

fn scope_lines<'a>(
    product: ProductId,
    documents: impl IntoIterator<Item = &'a MovementDocument>,
) -> Vec<MovementLine> {
    documents
        .into_iter()
        .flat_map(|doc| doc.lines_for(product))
        .cloned()
        .collect()
}

/// Per-kind and net stock figures, all in the product's export unit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StockReport {
    pub product: ProductId,
    pub total: f64,
    pub import_total: f64,
    pub export_total: f64,
    pub adjustment_total: f64,
    /// Lines that contributed zero because their unit could not be converted.
    pub unconvertible_lines: usize,
}

#[derive(Debug, Default, Copy, Clone)]
struct KindTotal {
    total: f64,
    unconvertible: usize,
}

/// A product's movement lines, scoped and ready to be summed.
///
/// Loaded state is immutable: `sum` and `report` may be called any number of
/// times and always agree.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedInventory {
    product: Product,
    imports: Vec<MovementLine>,
    exports: Vec<MovementLine>,
    adjustments: Vec<MovementLine>,
}

impl LoadedInventory {
    /// Build from documents already at hand. Lines for other products are
    /// dropped; each document counts according to its own kind.
    pub fn from_documents<'a>(
        product: Product,
        documents: impl IntoIterator<Item = &'a MovementDocument>,
    ) -> Self {
        let mut loaded = Self {
            product,
            imports: Vec::new(),
            exports: Vec::new(),
            adjustments: Vec::new(),
        };

        for doc in documents {
            let scoped = doc.lines_for(loaded.product.id).cloned();
            match doc.kind {
                MovementKind::Import => loaded.imports.extend(scoped),
                MovementKind::Export => loaded.exports.extend(scoped),
                MovementKind::Adjustment => loaded.adjustments.extend(scoped),
            }
        }

        loaded
    }

    pub fn product(&self) -> &Product {
        &self.product
    }

    pub fn lines(&self, kind: MovementKind) -> &[MovementLine] {
        match kind {
            MovementKind::Import => &self.imports,
            MovementKind::Export => &self.exports,
            MovementKind::Adjustment => &self.adjustments,
        }
    }

    /// Net stock: `imports - exports + adjustments`, in the export unit.
    pub fn sum(&self) -> f64 {
        let imports = self.kind_total(MovementKind::Import).total;
        let exports = self.kind_total(MovementKind::Export).total;
        let adjustments = self.kind_total(MovementKind::Adjustment).total;

        imports - exports + adjustments
    }

    pub fn report(&self) -> StockReport {
        let imports = self.kind_total(MovementKind::Import);
        let exports = self.kind_total(MovementKind::Export);
        let adjustments = self.kind_total(MovementKind::Adjustment);

        StockReport {
            product: self.product.id,
            total: imports.total - exports.total + adjustments.total,
            import_total: imports.total,
            export_total: exports.total,
            adjustment_total: adjustments.total,
            unconvertible_lines: imports.unconvertible + exports.unconvertible + adjustments.unconvertible,
        }
    }

    fn kind_total(&self, kind: MovementKind) -> KindTotal {
        self.lines(kind).iter().fold(KindTotal::default(), |mut acc, line| {
            let factor = self.product.factor_to_export_unit(line.unit);
            if let ConversionFactor::Unconvertible(reason) = factor {
                acc.unconvertible += 1;
                tracing::debug!(
                    product = %self.product.id,
                    kind = %kind,
                    quantity = line.quantity,
                    %reason,
                    "line not convertible to export unit; counted as zero"
                );
            }
            acc.total += line.quantity * factor.multiplier();
            acc
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use stockroom_core::UnitId;
    use stockroom_products::ConversionRule;

    /// Document-granular source: returns whole documents mentioning the product.
    struct FixedSource {
        documents: Vec<MovementDocument>,
    }

    #[async_trait]
    impl MovementSource for FixedSource {
        async fn find_by_product(
            &self,
            kind: MovementKind,
            product: ProductId,
        ) -> Result<Vec<MovementDocument>, MovementSourceError> {
            Ok(self
                .documents
                .iter()
                .filter(|doc| doc.kind == kind && doc.mentions(product))
                .cloned()
                .collect())
        }
    }

    struct FailingSource {
        failing: MovementKind,
    }

    #[async_trait]
    impl MovementSource for FailingSource {
        async fn find_by_product(
            &self,
            kind: MovementKind,
            _product: ProductId,
        ) -> Result<Vec<MovementDocument>, MovementSourceError> {
            if kind == self.failing {
                return Err(MovementSourceError::Query {
                    collection: kind.collection(),
                    message: "connection reset".to_string(),
                });
            }
            Ok(vec![])
        }
    }

    struct Fixture {
        g: UnitId,
        kg: UnitId,
        product: Product,
    }

    fn fixture() -> Fixture {
        let (g, kg) = (UnitId::new(), UnitId::new());
        let product = Product::new("Flour", kg).with_conversion(ConversionRule::new(g, 0.001, kg));
        Fixture { g, kg, product }
    }

    fn assert_close(actual: f64, expected: f64) {
        assert!((actual - expected).abs() < 1e-9, "expected {expected}, got {actual}");
    }

    #[tokio::test]
    async fn reconciles_imports_exports_and_adjustments() {
        let Fixture { g, kg, product } = fixture();
        let p = product.id;
        let source = FixedSource {
            documents: vec![
                MovementDocument::new(MovementKind::Import, vec![MovementLine::new(p, 2000.0, g)]),
                MovementDocument::new(MovementKind::Export, vec![MovementLine::new(p, 1.0, kg)]),
                MovementDocument::new(MovementKind::Adjustment, vec![MovementLine::new(p, 0.5, kg)]),
            ],
        };

        let loaded = InventoryReconciler::new(product, source).load().await.unwrap();

        assert_close(loaded.sum(), 1.5);
        let report = loaded.report();
        assert_close(report.import_total, 2.0);
        assert_close(report.export_total, 1.0);
        assert_close(report.adjustment_total, 0.5);
        assert_eq!(report.unconvertible_lines, 0);
    }

    #[tokio::test]
    async fn shared_documents_contribute_only_matching_lines() {
        let kg = UnitId::new();
        let p = Product::new("Rice", kg);
        let q = Product::new("Beans", kg);
        let shared = MovementDocument::new(
            MovementKind::Import,
            vec![
                MovementLine::new(p.id, 10.0, kg),
                MovementLine::new(q.id, 4.0, kg),
                MovementLine::new(p.id, 5.0, kg),
            ],
        );
        let source = std::sync::Arc::new(FixedSource { documents: vec![shared] });

        let p_stock = InventoryReconciler::new(p, source.clone()).load().await.unwrap();
        let q_stock = InventoryReconciler::new(q, source).load().await.unwrap();

        assert_eq!(p_stock.lines(MovementKind::Import).len(), 2);
        assert_close(p_stock.sum(), 15.0);
        assert_eq!(q_stock.lines(MovementKind::Import).len(), 1);
        assert_close(q_stock.sum(), 4.0);
    }

    #[tokio::test]
    async fn load_propagates_source_failure() {
        let Fixture { product, .. } = fixture();
        let source = FailingSource {
            failing: MovementKind::Export,
        };

        let err = InventoryReconciler::new(product, source).load().await.unwrap_err();
        assert_eq!(
            err,
            MovementSourceError::Query {
                collection: "Export",
                message: "connection reset".to_string(),
            }
        );
    }

    #[test]
    fn unconvertible_line_counts_zero_and_does_not_stop_the_fold() {
        let Fixture { kg, product, .. } = fixture();
        let p = product.id;
        let crate_unit = UnitId::new();
        let doc = MovementDocument::new(
            MovementKind::Import,
            vec![
                MovementLine::new(p, 3.0, kg),
                MovementLine::new(p, 100.0, crate_unit),
                MovementLine {
                    product: Some(p),
                    quantity: 7.0,
                    unit: None,
                },
                MovementLine::new(p, 2.0, kg),
            ],
        );

        let loaded = LoadedInventory::from_documents(product, [&doc]);

        assert_close(loaded.sum(), 5.0);
        assert_eq!(loaded.report().unconvertible_lines, 2);
    }

    #[test]
    fn empty_history_is_zero() {
        let Fixture { product, .. } = fixture();
        let loaded = LoadedInventory::from_documents(product, []);
        assert_eq!(loaded.sum(), 0.0);
    }

    #[test]
    fn negative_adjustments_reduce_stock() {
        let Fixture { g, kg, product } = fixture();
        let p = product.id;
        let docs = [
            MovementDocument::new(MovementKind::Import, vec![MovementLine::new(p, 5.0, kg)]),
            MovementDocument::new(MovementKind::Adjustment, vec![MovementLine::new(p, -500.0, g)]),
        ];

        let loaded = LoadedInventory::from_documents(product, &docs);
        assert_close(loaded.sum(), 4.5);
    }

    mod proptest_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #![proptest_config(ProptestConfig {
                cases: 256,
                ..ProptestConfig::default()
            })]

            /// Property: summing is repeatable and agrees with the report.
            #[test]
            fn sum_is_idempotent(
                imports in prop::collection::vec(-1_000.0f64..1_000.0, 0..10),
                exports in prop::collection::vec(-1_000.0f64..1_000.0, 0..10),
                grams in prop::collection::vec(0.0f64..100_000.0, 0..10),
            ) {
                let Fixture { g, kg, product } = fixture();
                let p = product.id;
                let line = |unit| move |q: &f64| MovementLine::new(p, *q, unit);
                let docs = [
                    MovementDocument::new(MovementKind::Import, imports.iter().map(line(kg)).collect()),
                    MovementDocument::new(MovementKind::Export, exports.iter().map(line(kg)).collect()),
                    MovementDocument::new(MovementKind::Adjustment, grams.iter().map(line(g)).collect()),
                ];

                let loaded = LoadedInventory::from_documents(product, &docs);
                let first = loaded.sum();

                prop_assert_eq!(first, loaded.sum());
                prop_assert_eq!(first, loaded.report().total);
            }
        }
    }
}
