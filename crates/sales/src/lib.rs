//! Sales domain module.
//!
//! Export documents (sales and deliveries), their net/gross/VAT totals for the
//! invoice and delivery note, and invoice numbering. Pure domain logic.

pub mod export;
pub mod numbering;

pub use export::{ExportDocument, ExportLine, ExportStatus, PaymentOption, ReturnLine, VatBreakdown};
pub use numbering::next_invoice_number;
