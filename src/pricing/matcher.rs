//! Resolution of line items against the material catalog.
//!
//! Matching is deliberately simple: a single pass over the catalog in its
//! given order, stopping at the first material whose name equals the line
//! description case-insensitively or whose id equals the
//! line's catalog reference. There is no scoring. When two materials share a
//! name the earlier one wins, so callers that need reproducible output must
//! hand over the catalog in a stable order.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::model::{LineItem, MaterialCatalogItem, MaterialTier};

/// Borrowing view over a loaded catalog.
#[derive(Debug, Clone, Copy)]
pub struct CatalogMatcher<'a> {
    catalog: &'a [MaterialCatalogItem],
}

impl<'a> CatalogMatcher<'a> {
    /// Wrap a catalog slice. Order is significant: first hit wins.
    pub fn new(catalog: &'a [MaterialCatalogItem]) -> Self {
        Self { catalog }
    }

    /// Find the catalog material a line item refers to.
    pub fn match_item(&self, item: &LineItem) -> Option<&'a MaterialCatalogItem> {
        let description = item.description.to_lowercase();
        self.catalog.iter().find(|m| {
            m.name.to_lowercase() == description || item.item_id.as_deref() == Some(m.id.as_str())
        })
    }

    /// All materials in the same trade and category as `material` at
    /// `target` tier, in catalog order. Callers substitute with the first.
    pub fn tier_equivalents(
        &self,
        material: &MaterialCatalogItem,
        target: MaterialTier,
    ) -> Vec<&'a MaterialCatalogItem> {
        self.catalog
            .iter()
            .filter(|m| m.same_family(material) && m.tier == target)
            .collect()
    }

    /// First tier equivalent, if any.
    pub fn first_equivalent(
        &self,
        material: &MaterialCatalogItem,
        target: MaterialTier,
    ) -> Option<&'a MaterialCatalogItem> {
        self.catalog
            .iter()
            .find(|m| m.same_family(material) && m.tier == target)
    }

    /// Every material at `tier`, in catalog order.
    pub fn materials_by_tier(&self, tier: MaterialTier) -> Vec<&'a MaterialCatalogItem> {
        self.catalog.iter().filter(|m| m.tier == tier).collect()
    }

    /// Warranty summary over whatever materials the given items match.
    pub fn warranty_range<'i, I>(&self, items: I) -> Option<WarrantyRange>
    where
        I: IntoIterator<Item = &'i LineItem>,
    {
        WarrantyRange::from_years(
            items
                .into_iter()
                .filter_map(|li| self.match_item(li))
                .filter_map(|m| m.warranty_years),
        )
    }
}

/// Min/max warranty in years across a set of materials.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WarrantyRange {
    pub min: u32,
    pub max: u32,
}

impl WarrantyRange {
    /// `None` when the iterator is empty.
    pub fn from_years<I: IntoIterator<Item = u32>>(years: I) -> Option<Self> {
        years.into_iter().fold(None, |acc, y| {
            Some(match acc {
                None => WarrantyRange { min: y, max: y },
                Some(r) => r.include(y),
            })
        })
    }

    /// Widen the range to cover `years`.
    pub fn include(self, years: u32) -> Self {
        Self {
            min: self.min.min(years),
            max: self.max.max(years),
        }
    }
}

impl fmt::Display for WarrantyRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.min == self.max {
            write!(f, "{} yr", self.min)
        } else {
            write!(f, "{}-{} yr", self.min, self.max)
        }
    }
}
