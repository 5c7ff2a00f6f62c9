//! Infrastructure layer: document store adapters, configuration and the
//! stock service that runs reconciliations against a store.

pub mod config;
pub mod document_store;
pub mod stock_service;

mod integration_tests;

pub use config::StockroomConfig;
pub use document_store::{InMemoryDocumentStore, ProductStore, Snapshot, SnapshotError};
pub use stock_service::{StockService, StockServiceError};
