use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use stockroom_core::{DocumentId, Entity, PartyId, ProductId, UnitId};
use stockroom_inventory::{MovementDocument, MovementKind, MovementLine};
use stockroom_products::ProductCatalog;

/// VAT amount per rate (percent).
pub type VatBreakdown = BTreeMap<u32, f64>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentOption {
    #[serde(alias = "EC")]
    Card,
    #[serde(alias = "Barverkauf")]
    Cash,
    #[serde(alias = "Überweisung")]
    Transfer,
}

/// Export status lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExportStatus {
    #[serde(alias = "BestellungErhalten")]
    OrderReceived,
    #[serde(alias = "Bezahlt")]
    Paid,
    #[serde(alias = "Geliefert")]
    Delivered,
}

/// Export line. `bill_quantity` / `bill_price` override what is printed on the
/// invoice without touching the delivered quantity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportLine {
    #[serde(default)]
    pub product: Option<ProductId>,
    #[serde(default)]
    pub quantity: f64,
    #[serde(default)]
    pub unit: Option<UnitId>,
    #[serde(default)]
    pub price: f64,
    #[serde(default)]
    pub bill_quantity: Option<f64>,
    #[serde(default)]
    pub bill_price: Option<f64>,
}

impl ExportLine {
    /// Lines billed with an explicit zero quantity stay off the invoice and
    /// the delivery note.
    pub fn is_billable(&self) -> bool {
        self.bill_quantity != Some(0.0)
    }

    pub fn billed_quantity(&self) -> f64 {
        self.bill_quantity.unwrap_or(self.quantity)
    }

    /// A zero bill price falls back to the sale price.
    pub fn billed_price(&self) -> f64 {
        self.bill_price.filter(|price| *price != 0.0).unwrap_or(self.price)
    }

    pub fn net(&self) -> f64 {
        self.quantity * self.price
    }

    pub fn billed_net(&self) -> f64 {
        self.billed_quantity() * self.billed_price()
    }

    pub fn movement(&self) -> MovementLine {
        MovementLine {
            product: self.product,
            quantity: self.quantity,
            unit: self.unit,
        }
    }
}

/// Goods coming back from a customer. Recorded on the export but not counted
/// as a stock movement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReturnLine {
    #[serde(default)]
    pub product: Option<ProductId>,
    #[serde(default)]
    pub quantity: f64,
    /// Returned goods are broken and get thrown away.
    #[serde(default = "default_disposal")]
    pub disposal: bool,
}

fn default_disposal() -> bool {
    true
}

/// Sale/delivery to a customer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportDocument {
    pub id: DocumentId,
    #[serde(default)]
    pub invoice_number: Option<u64>,
    pub date: DateTime<Utc>,
    #[serde(default)]
    pub ship_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub payment_option: Option<PaymentOption>,
    #[serde(default)]
    pub status: Option<ExportStatus>,
    #[serde(default)]
    pub customer: Option<PartyId>,
    #[serde(default)]
    pub note: Option<String>,
    #[serde(default)]
    pub shipping_cost: Option<f64>,
    #[serde(default, alias = "item")]
    pub lines: Vec<ExportLine>,
    #[serde(default, alias = "returnItem")]
    pub return_lines: Vec<ReturnLine>,
}

impl ExportDocument {
    pub fn new(date: DateTime<Utc>, lines: Vec<ExportLine>) -> Self {
        Self {
            id: DocumentId::new(),
            invoice_number: None,
            date,
            ship_date: None,
            payment_option: None,
            status: None,
            customer: None,
            note: None,
            shipping_cost: None,
            lines,
            return_lines: Vec::new(),
        }
    }

    /// Lines shown on the invoice and delivery note.
    pub fn billable_lines(&self) -> impl Iterator<Item = &ExportLine> {
        self.lines.iter().filter(|line| line.is_billable())
    }

    pub fn net_total(&self) -> f64 {
        self.lines.iter().map(ExportLine::net).sum()
    }

    pub fn gross_total(&self, catalog: &ProductCatalog) -> f64 {
        gross(self.lines.iter(), catalog, ExportLine::net)
    }

    pub fn vat_breakdown(&self, catalog: &ProductCatalog) -> VatBreakdown {
        vat_by_rate(self.lines.iter(), catalog, ExportLine::net)
    }

    pub fn bill_net_total(&self) -> f64 {
        self.billable_lines().map(ExportLine::billed_net).sum()
    }

    pub fn bill_gross_total(&self, catalog: &ProductCatalog) -> f64 {
        gross(self.billable_lines(), catalog, ExportLine::billed_net)
    }

    pub fn bill_vat_breakdown(&self, catalog: &ProductCatalog) -> VatBreakdown {
        vat_by_rate(self.billable_lines(), catalog, ExportLine::billed_net)
    }

    pub fn to_movement(&self) -> MovementDocument {
        MovementDocument {
            id: self.id,
            kind: MovementKind::Export,
            lines: self.lines.iter().map(ExportLine::movement).collect(),
        }
    }
}

impl Entity for ExportDocument {
    type Id = DocumentId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

/// Pairs each line with its product's export VAT rate. Lines whose product is
/// unknown are skipped.
fn with_vat<'a>(
    lines: impl Iterator<Item = &'a ExportLine>,
    catalog: &'a ProductCatalog,
) -> impl Iterator<Item = (&'a ExportLine, u32)> {
    lines.filter_map(move |line| {
        let product = catalog.get(line.product?)?;
        Some((line, product.export_vat))
    })
}

fn gross<'a>(
    lines: impl Iterator<Item = &'a ExportLine>,
    catalog: &'a ProductCatalog,
    amount: fn(&ExportLine) -> f64,
) -> f64 {
    with_vat(lines, catalog)
        .map(|(line, rate)| amount(line) * (1.0 + f64::from(rate) / 100.0))
        .sum()
}

fn vat_by_rate<'a>(
    lines: impl Iterator<Item = &'a ExportLine>,
    catalog: &'a ProductCatalog,
    amount: fn(&ExportLine) -> f64,
) -> VatBreakdown {
    let mut breakdown = VatBreakdown::new();
    for (line, rate) in with_vat(lines, catalog) {
        *breakdown.entry(rate).or_insert(0.0) += amount(line) * f64::from(rate) / 100.0;
    }
    breakdown
}
