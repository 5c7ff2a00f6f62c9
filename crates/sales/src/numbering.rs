/// Next invoice number: one past the highest issued, or 1 for the first invoice.
pub fn next_invoice_number(issued: impl IntoIterator<Item = u64>) -> u64 {
    issued.into_iter().max().map_or(1, |max| max + 1)
}
