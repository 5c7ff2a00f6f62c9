//! Catalog number suggestions for new products.
//!
//! Catalog numbers are split in two ranges: below [`HIGH_RANGE_START`] and
//! from it upward. A new product gets one suggestion per range.

use serde::{Deserialize, Serialize};

/// First number of the upper catalog range.
pub const HIGH_RANGE_START: u32 = 200;

/// Next free number in each catalog range.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogNumbers {
    pub low: u32,
    pub high: u32,
}

/// One past the highest used number in each range. An empty lower range
/// starts at 1, an empty upper range at [`HIGH_RANGE_START`].
pub fn next_catalog_numbers(existing: impl IntoIterator<Item = u32>) -> CatalogNumbers {
    let mut low_max = None;
    let mut high_max = None;

    for number in existing {
        let slot = if number < HIGH_RANGE_START {
            &mut low_max
        } else {
            &mut high_max
        };
        *slot = Some(slot.map_or(number, |max: u32| max.max(number)));
    }

    CatalogNumbers {
        low: low_max.map_or(1, |max| max + 1),
        high: high_max.map_or(HIGH_RANGE_START, |max| max.saturating_add(1)),
    }
}
