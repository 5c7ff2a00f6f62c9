//! Tracing/logging setup shared by the binaries.

/// Initialize process-wide logging with the `info` default filter.
///
/// This is safe to call multiple times; subsequent calls become no-ops.
pub fn init() {
    tracing::init("info");
}

/// Initialize process-wide logging, using `default_filter` when `RUST_LOG`
/// is not set.
pub fn init_with_filter(default_filter: &str) {
    tracing::init(default_filter);
}

/// Tracing configuration (filters, layers).
pub mod tracing;
