use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use stockroom_core::{DocumentId, Entity, PartyId, ProductId, UnitId};
use stockroom_inventory::{MovementDocument, MovementKind, MovementLine};
use stockroom_products::ProductCatalog;

/// Import status lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImportStatus {
    #[serde(alias = "Bestellt")]
    Ordered,
    #[serde(alias = "Erhalten")]
    Received,
}

/// Import line: product, quantity and unit as received, purchase price per unit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImportLine {
    #[serde(default)]
    pub product: Option<ProductId>,
    #[serde(default)]
    pub quantity: f64,
    #[serde(default)]
    pub unit: Option<UnitId>,
    #[serde(default)]
    pub price: Option<f64>,
}

impl ImportLine {
    pub fn movement(&self) -> MovementLine {
        MovementLine {
            product: self.product,
            quantity: self.quantity,
            unit: self.unit,
        }
    }
}

/// Goods received from a provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImportDocument {
    pub id: DocumentId,
    pub date: DateTime<Utc>,
    /// Provider's delivery reference.
    #[serde(default)]
    pub reference: Option<String>,
    #[serde(default)]
    pub status: Option<ImportStatus>,
    #[serde(default)]
    pub provider: Option<PartyId>,
    #[serde(default)]
    pub note: Option<String>,
    #[serde(default)]
    pub shipping_cost: Option<f64>,
    #[serde(default, alias = "item")]
    pub lines: Vec<ImportLine>,
}

impl ImportDocument {
    pub fn new(date: DateTime<Utc>, lines: Vec<ImportLine>) -> Self {
        Self {
            id: DocumentId::new(),
            date,
            reference: None,
            status: None,
            provider: None,
            note: None,
            shipping_cost: None,
            lines,
        }
    }

    /// Purchase value including import VAT of each line's product.
    ///
    /// Lines without a price or whose product is not in `catalog` add nothing.
    pub fn gross_total(&self, catalog: &ProductCatalog) -> f64 {
        self.lines
            .iter()
            .filter_map(|line| {
                let product = catalog.get(line.product?)?;
                let vat = f64::from(product.import_vat) / 100.0;
                Some(line.quantity * line.price? * (1.0 + vat))
            })
            .sum()
    }

    pub fn to_movement(&self) -> MovementDocument {
        MovementDocument {
            id: self.id,
            kind: MovementKind::Import,
            lines: self.lines.iter().map(ImportLine::movement).collect(),
        }
    }
}

impl Entity for ImportDocument {
    type Id = DocumentId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}
