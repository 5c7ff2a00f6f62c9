//! Products domain module.
//!
//! Units of measure, products with their per-product conversion catalogs, and
//! the unit converter used by stock reconciliation. Pure domain logic (no IO).

pub mod catalog;
pub mod conversion;
pub mod numbering;
pub mod product;
pub mod unit;

pub use catalog::ProductCatalog;
pub use conversion::{ConversionFactor, Unconvertible, resolve_factor};
pub use numbering::{CatalogNumbers, HIGH_RANGE_START, next_catalog_numbers};
pub use product::{DEFAULT_VAT_PERCENT, Product};
pub use unit::{ConversionRule, Unit};
