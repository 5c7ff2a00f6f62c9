use serde::{Deserialize, Serialize};

use stockroom_core::{Entity, UnitId, ValueObject};

/// A unit of measure. Only its identity takes part in conversion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Unit {
    pub id: UnitId,
    pub name: String,
}

impl Unit {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: UnitId::new(),
            name: name.into(),
        }
    }
}

impl Entity for Unit {
    type Id = UnitId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

/// Directed conversion rule owned by a product: `1 from_unit == factor to_unit`.
///
/// Either reference may be unset when the record comes from a half-filled
/// form row; such rules are treated as malformed by [`crate::resolve_factor`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversionRule {
    #[serde(alias = "unit1", default)]
    pub from_unit: Option<UnitId>,
    #[serde(alias = "quantity", default)]
    pub factor: f64,
    #[serde(alias = "unit2", default)]
    pub to_unit: Option<UnitId>,
}

impl ConversionRule {
    pub fn new(from_unit: UnitId, factor: f64, to_unit: UnitId) -> Self {
        Self {
            from_unit: Some(from_unit),
            factor,
            to_unit: Some(to_unit),
        }
    }
}

impl ValueObject for ConversionRule {}
