//! Material catalog reference data.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::model::MaterialTier;

/// One material in the catalog. Read-only from the pricing engine's side.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaterialCatalogItem {
    pub id: String,
    pub name: String,
    /// Trade code, e.g. `RFG` for roofing.
    pub trade: String,
    pub category: String,
    pub tier: MaterialTier,
    pub cost_per_unit: Decimal,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub warranty_years: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub brand: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub photo_url: Option<String>,
}

impl MaterialCatalogItem {
    /// Create a material with no warranty, brand or photo.
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        trade: impl Into<String>,
        category: impl Into<String>,
        tier: MaterialTier,
        cost_per_unit: Decimal,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            trade: trade.into(),
            category: category.into(),
            tier,
            cost_per_unit,
            warranty_years: None,
            brand: None,
            photo_url: None,
        }
    }

    /// Set the manufacturer warranty in years.
    pub fn with_warranty(mut self, years: u32) -> Self {
        self.warranty_years = Some(years);
        self
    }

    /// Same trade and category, different tier.
    pub fn is_tier_equivalent(&self, other: &MaterialCatalogItem) -> bool {
        self.same_family(other) && self.tier != other.tier
    }

    /// Same trade and category, any tier.
    pub(crate) fn same_family(&self, other: &MaterialCatalogItem) -> bool {
        self.trade == other.trade && self.category == other.category
    }
}
