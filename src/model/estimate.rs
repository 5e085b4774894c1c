//! Estimates, areas and change orders.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::pricing::Totals;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EstimateType {
    #[default]
    Regular,
    Insurance,
}

/// Overhead, profit and tax percentages applied during a roll-up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PricingRates {
    pub overhead_percent: Decimal,
    pub profit_percent: Decimal,
    pub tax_percent: Decimal,
}

impl PricingRates {
    /// Create a rate set from percentages (10 means 10%).
    pub fn new(overhead_percent: Decimal, profit_percent: Decimal, tax_percent: Decimal) -> Self {
        Self {
            overhead_percent,
            profit_percent,
            tax_percent,
        }
    }

    /// True when no rate is negative.
    pub fn is_valid(&self) -> bool {
        self.overhead_percent >= Decimal::ZERO
            && self.profit_percent >= Decimal::ZERO
            && self.tax_percent >= Decimal::ZERO
    }
}

/// An estimate header. Line items and areas are stored separately.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Estimate {
    pub id: Uuid,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub estimate_type: EstimateType,
    #[serde(flatten)]
    pub rates: PricingRates,
    /// Insurance deductible; ignored for regular estimates.
    #[serde(default)]
    pub deductible: Decimal,
    /// Last totals written by the engine. Display only; live totals are
    /// always recomputed from line items.
    #[serde(default)]
    pub totals: Totals,
}

impl Estimate {
    /// Create a regular (non-insurance) estimate with zero totals.
    pub fn new(title: impl Into<String>, rates: PricingRates) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: title.into(),
            estimate_type: EstimateType::Regular,
            rates,
            deductible: Decimal::ZERO,
            totals: Totals::default(),
        }
    }

    /// Mark as an insurance estimate with the given deductible.
    pub fn insurance(mut self, deductible: Decimal) -> Self {
        self.estimate_type = EstimateType::Insurance;
        self.deductible = deductible;
        self
    }

    /// Whether the deductible and net claim apply.
    pub fn is_insurance(&self) -> bool {
        self.estimate_type == EstimateType::Insurance
    }
}

/// A named room or location. Dimensions are display-only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Area {
    pub id: Uuid,
    pub estimate_id: Uuid,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub floor_number: i32,
    #[serde(default)]
    pub length_ft: Decimal,
    #[serde(default)]
    pub width_ft: Decimal,
    #[serde(default)]
    pub height_ft: Decimal,
    #[serde(default)]
    pub window_count: u32,
    #[serde(default)]
    pub door_count: u32,
    #[serde(default)]
    pub sort_order: u32,
}

impl Area {
    /// Create an area on the first floor with no dimensions.
    pub fn new(estimate_id: Uuid, name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            estimate_id,
            name: name.into(),
            description: String::new(),
            floor_number: 1,
            length_ft: Decimal::ZERO,
            width_ft: Decimal::ZERO,
            height_ft: Decimal::ZERO,
            window_count: 0,
            door_count: 0,
            sort_order: 0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeOrderStatus {
    #[default]
    Pending,
    Approved,
    Rejected,
}

/// Post-estimate contract adjustment. `total_change` may be negative.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChangeOrder {
    pub id: Uuid,
    pub estimate_id: Uuid,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub status: ChangeOrderStatus,
    pub total_change: Decimal,
}

impl ChangeOrder {
    /// Create a pending change order.
    pub fn new(estimate_id: Uuid, description: impl Into<String>, total_change: Decimal) -> Self {
        Self {
            id: Uuid::new_v4(),
            estimate_id,
            description: description.into(),
            status: ChangeOrderStatus::Pending,
            total_change,
        }
    }

    /// Mark as approved, so it counts toward the revised total.
    pub fn approved(mut self) -> Self {
        self.status = ChangeOrderStatus::Approved;
        self
    }
}
