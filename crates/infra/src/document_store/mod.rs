//! Document store boundary.
//!
//! The store is the external collaborator that owns products and movement
//! documents. Reconciliation only reads from it, through
//! [`stockroom_inventory::MovementSource`] and [`ProductStore`].

pub mod in_memory;
pub mod snapshot;
pub mod r#trait;

pub use in_memory::InMemoryDocumentStore;
pub use r#trait::ProductStore;
pub use snapshot::{Snapshot, SnapshotError};
