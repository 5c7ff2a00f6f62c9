//! Purchasing domain module.
//!
//! Goods-receipt ("import") documents and their totals. Pure domain logic
//! (no IO, no HTTP, no storage).

pub mod import;

pub use import::{ImportDocument, ImportLine, ImportStatus};
