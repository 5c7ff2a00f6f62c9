mod commands;

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};

use stockroom_infra::{InMemoryDocumentStore, Snapshot, StockService, StockroomConfig};
use stockroom_inventory::StockReport;
use stockroom_products::Product;

use crate::commands::{CommandLine, Commands};

#[tokio::main]
async fn main() -> Result<()> {
    let config = StockroomConfig::load().context("failed to load configuration")?;
    stockroom_observability::init_with_filter(&config.log_filter);

    let cli = CommandLine::parse_args();

    match cli.command {
        Commands::Stock {
            snapshot,
            product,
            json,
        } => {
            let store = load_store(&snapshot)?;
            let service = StockService::from_config(store.clone(), &config);

            let levels = match product {
                Some(id) => {
                    let report = service.stock_of(id).await?;
                    let product = store
                        .catalog()?
                        .require(id)
                        .cloned()
                        .context("product vanished from snapshot")?;
                    vec![(product, report)]
                }
                None => service.stock_levels().await?,
            };

            if json {
                let reports: Vec<&StockReport> = levels.iter().map(|(_, r)| r).collect();
                println!("{}", serde_json::to_string_pretty(&reports)?);
            } else {
                for (product, report) in &levels {
                    print_stock(&store, product, report);
                }
            }
        }
        Commands::Totals { snapshot } => {
            let store = load_store(&snapshot)?;
            let catalog = store.catalog()?;

            for doc in store.imports()? {
                println!(
                    "import {} {}  gross {:.2}",
                    doc.date.format("%Y-%m-%d"),
                    doc.id,
                    doc.gross_total(&catalog)
                );
            }

            for doc in store.exports()? {
                let number = doc.invoice_number.map(|n| n.to_string()).unwrap_or_else(|| "-".to_string());
                println!(
                    "export {} #{}  net {:.2}  gross {:.2}  bill net {:.2}  bill gross {:.2}",
                    doc.date.format("%Y-%m-%d"),
                    number,
                    doc.net_total(),
                    doc.gross_total(&catalog),
                    doc.bill_net_total(),
                    doc.bill_gross_total(&catalog)
                );
                for (rate, amount) in doc.bill_vat_breakdown(&catalog) {
                    println!("    vat {rate}%  {amount:.2}");
                }
            }
        }
        Commands::NextNumbers { snapshot } => {
            let store = load_store(&snapshot)?;
            let numbers = store.next_catalog_numbers()?;
            println!("catalog numbers: {} / {}", numbers.low, numbers.high);
            println!("invoice number: {}", store.next_invoice_number()?);
        }
    }

    Ok(())
}

fn load_store(path: &Path) -> Result<Arc<InMemoryDocumentStore>> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read snapshot {}", path.display()))?;
    let snapshot = Snapshot::from_json(&json)
        .with_context(|| format!("invalid snapshot {}", path.display()))?;

    tracing::info!(
        products = snapshot.products.len(),
        imports = snapshot.imports.len(),
        exports = snapshot.exports.len(),
        adjustments = snapshot.adjustments.len(),
        "snapshot loaded"
    );

    Ok(Arc::new(InMemoryDocumentStore::from_snapshot(snapshot)))
}

fn print_stock(store: &InMemoryDocumentStore, product: &Product, report: &StockReport) {
    let unit = product
        .export_unit
        .and_then(|id| store.unit(id))
        .map(|u| u.name)
        .unwrap_or_default();

    let mut flags = Vec::new();
    if product.is_below_minimum(report.total) {
        flags.push("below minimum".to_string());
    }
    if report.unconvertible_lines > 0 {
        flags.push(format!("{} unconvertible lines", report.unconvertible_lines));
    }

    let flags = if flags.is_empty() {
        String::new()
    } else {
        format!("  [{}]", flags.join(", "))
    };

    println!("{:<40} {:>12.3} {}{}", product.title(), report.total, unit, flags);
}
