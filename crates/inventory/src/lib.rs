//! Inventory domain module.
//!
//! Movement lines (imports, exports, adjustments) and the reconciliation that
//! folds a product's movement history into one stock figure expressed in the
//! product's export unit. The document store is reached only through the
//! [`MovementSource`] boundary.

pub mod movement;
pub mod reconciler;
pub mod source;

pub use movement::{AdjustmentDocument, MovementDocument, MovementKind, MovementLine};
pub use reconciler::{InventoryReconciler, LoadedInventory, StockReport};
pub use source::{MovementSource, MovementSourceError};
