use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use stockroom_core::{DocumentId, Entity, PartyId, ProductId, UnitId, ValueObject};
use stockroom_products::Product;

/// Kind of stock movement; decides the sign of its contribution.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MovementKind {
    /// Goods received; increases stock.
    Import,
    /// Goods sold or delivered; decreases stock.
    Export,
    /// Signed correction (stocktake, breakage).
    Adjustment,
}

impl MovementKind {
    pub const ALL: [MovementKind; 3] = [
        MovementKind::Import,
        MovementKind::Export,
        MovementKind::Adjustment,
    ];

    /// Collection name in the document store.
    pub fn collection(&self) -> &'static str {
        match self {
            MovementKind::Import => "Import",
            MovementKind::Export => "Export",
            MovementKind::Adjustment => "Adjustment",
        }
    }
}

impl core::fmt::Display for MovementKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.collection())
    }
}

/// One product/quantity/unit entry inside a movement document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovementLine {
    #[serde(default)]
    pub product: Option<ProductId>,
    #[serde(default)]
    pub quantity: f64,
    #[serde(default)]
    pub unit: Option<UnitId>,
}

impl MovementLine {
    pub fn new(product: ProductId, quantity: f64, unit: UnitId) -> Self {
        Self {
            product: Some(product),
            quantity,
            unit: Some(unit),
        }
    }

    pub fn refers_to(&self, product: ProductId) -> bool {
        self.product == Some(product)
    }
}

impl ValueObject for MovementLine {}

/// Movement document as returned by a [`crate::MovementSource`] query.
///
/// A document may carry lines for several products; consumers scope them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovementDocument {
    pub id: DocumentId,
    pub kind: MovementKind,
    pub lines: Vec<MovementLine>,
}

impl MovementDocument {
    pub fn new(kind: MovementKind, lines: Vec<MovementLine>) -> Self {
        Self {
            id: DocumentId::new(),
            kind,
            lines,
        }
    }

    pub fn mentions(&self, product: ProductId) -> bool {
        self.lines.iter().any(|line| line.refers_to(product))
    }

    /// Lines of this document that refer to `product`, in document order.
    pub fn lines_for(&self, product: ProductId) -> impl Iterator<Item = &MovementLine> {
        self.lines.iter().filter(move |line| line.refers_to(product))
    }
}

impl Entity for MovementDocument {
    type Id = DocumentId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

/// Stock correction document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdjustmentDocument {
    pub id: DocumentId,
    pub date: DateTime<Utc>,
    #[serde(default)]
    pub adjusted_by: Option<PartyId>,
    #[serde(default)]
    pub reason: Option<String>,
    #[serde(default, alias = "item")]
    pub lines: Vec<MovementLine>,
}

impl AdjustmentDocument {
    pub fn new(date: DateTime<Utc>, lines: Vec<MovementLine>) -> Self {
        Self {
            id: DocumentId::new(),
            date,
            adjusted_by: None,
            reason: None,
            lines,
        }
    }

    /// Draft correction for one product: a single empty line recorded in the
    /// product's import unit.
    pub fn for_product(product: &Product, date: DateTime<Utc>) -> Self {
        Self::new(
            date,
            vec![MovementLine {
                product: Some(product.id),
                quantity: 0.0,
                unit: product.import_unit,
            }],
        )
    }

    pub fn to_movement(&self) -> MovementDocument {
        MovementDocument {
            id: self.id,
            kind: MovementKind::Adjustment,
            lines: self.lines.clone(),
        }
    }
}
