use serde::{Deserialize, Serialize};

use stockroom_core::{Entity, ProductId, UnitId};

use crate::conversion::{ConversionFactor, resolve_factor};
use crate::unit::ConversionRule;

/// VAT rate (percent) applied when a product record does not set one.
pub const DEFAULT_VAT_PERCENT: u32 = 7;

fn default_vat() -> u32 {
    DEFAULT_VAT_PERCENT
}

/// Product record as supplied by the document store.
///
/// The export unit is the canonical unit every stock figure is expressed in;
/// `conversions` is the product's own directed rule catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    /// Human-facing catalog number (shelf label / price list).
    #[serde(default)]
    pub catalog_number: Option<u32>,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub import_unit: Option<UnitId>,
    #[serde(default)]
    pub import_price: Option<f64>,
    #[serde(default = "default_vat")]
    pub import_vat: u32,
    #[serde(default)]
    pub export_unit: Option<UnitId>,
    #[serde(default)]
    pub export_price: Option<f64>,
    #[serde(default = "default_vat")]
    pub export_vat: u32,
    #[serde(default)]
    pub min_stock_quantity: Option<f64>,
    #[serde(alias = "convert", default)]
    pub conversions: Vec<ConversionRule>,
}

impl Product {
    pub fn new(name: impl Into<String>, export_unit: UnitId) -> Self {
        Self {
            id: ProductId::new(),
            catalog_number: None,
            name: name.into(),
            import_unit: None,
            import_price: None,
            import_vat: DEFAULT_VAT_PERCENT,
            export_unit: Some(export_unit),
            export_price: None,
            export_vat: DEFAULT_VAT_PERCENT,
            min_stock_quantity: None,
            conversions: Vec::new(),
        }
    }

    pub fn with_conversion(mut self, rule: ConversionRule) -> Self {
        self.conversions.push(rule);
        self
    }

    /// Display title: name followed by the catalog number.
    pub fn title(&self) -> String {
        match self.catalog_number {
            Some(number) => format!("{}   {}", self.name, number),
            None => self.name.clone(),
        }
    }

    /// Factor converting a quantity recorded in `unit` into the export unit.
    pub fn factor_to_export_unit(&self, unit: Option<UnitId>) -> ConversionFactor {
        resolve_factor(&self.conversions, unit, self.export_unit)
    }

    /// Whether `stock` has fallen below the configured minimum.
    pub fn is_below_minimum(&self, stock: f64) -> bool {
        self.min_stock_quantity.is_some_and(|min| stock < min)
    }
}

impl Entity for Product {
    type Id = ProductId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}
