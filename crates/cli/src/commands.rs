use std::path::PathBuf;

use clap::{Parser, Subcommand};

use stockroom_core::ProductId;

#[derive(Parser)]
#[command(name = "stockroom")]
#[command(about = "Stock levels and document totals from a store snapshot.")]
pub struct CommandLine {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Reconcile stock for every product (or one product)
    Stock {
        snapshot: PathBuf,
        #[arg(long)]
        product: Option<ProductId>,
        /// Print reports as JSON
        #[arg(long)]
        json: bool,
    },
    /// Import gross totals and export net/gross/VAT totals
    Totals { snapshot: PathBuf },
    /// Suggested catalog numbers and the next invoice number
    NextNumbers { snapshot: PathBuf },
}

impl CommandLine {
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
