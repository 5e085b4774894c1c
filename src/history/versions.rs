//! Pricing snapshots with bounded history.

use std::collections::VecDeque;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::model::{LineItem, LineItemPatch, MaterialTier};

/// Maximum number of versions to keep by default.
const DEFAULT_MAX_VERSIONS: usize = 20;

/// Pricing fields of one line item at snapshot time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineSnapshot {
    pub id: Uuid,
    pub description: String,
    pub unit_price: Decimal,
    pub material_cost: Decimal,
}

impl LineSnapshot {
    /// Take the pricing fields of `item`.
    pub fn of(item: &LineItem) -> Self {
        Self {
            id: item.id,
            description: item.description.clone(),
            unit_price: item.unit_price,
            material_cost: item.material_cost,
        }
    }

    /// Restore these fields onto `item` and return the patch that persists
    /// the change, or `None` when the item already matches.
    pub fn restore_onto(&self, item: &mut LineItem) -> Option<LineItemPatch> {
        if item.description == self.description
            && item.unit_price == self.unit_price
            && item.material_cost == self.material_cost
        {
            return None;
        }
        item.description = self.description.clone();
        item.material_cost = self.material_cost;
        item.set_unit_price(self.unit_price);
        Some(LineItemPatch::pricing(item))
    }
}

/// A labeled snapshot of an estimate's line pricing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EstimateVersion {
    pub id: Uuid,
    pub estimate_id: Uuid,
    /// What was about to happen, e.g. "Before tier switch to premium".
    pub label: String,
    /// Estimate-level tier in effect when the snapshot was taken.
    pub tier: MaterialTier,
    pub lines: Vec<LineSnapshot>,
    pub created_at: DateTime<Utc>,
}

impl EstimateVersion {
    /// Snapshot the pricing of `items` under `label`.
    pub fn capture<'a, I>(
        estimate_id: Uuid,
        label: impl Into<String>,
        tier: MaterialTier,
        items: I,
    ) -> Self
    where
        I: IntoIterator<Item = &'a LineItem>,
    {
        Self {
            id: Uuid::new_v4(),
            estimate_id,
            label: label.into(),
            tier,
            lines: items.into_iter().map(LineSnapshot::of).collect(),
            created_at: Utc::now(),
        }
    }

    /// Snapshot of one line item, if it existed at capture time.
    pub fn line(&self, id: Uuid) -> Option<&LineSnapshot> {
        self.lines.iter().find(|l| l.id == id)
    }
}

/// In-memory list of recent versions, oldest first.
#[derive(Debug, Clone)]
pub struct VersionHistory {
    versions: VecDeque<EstimateVersion>,
    max_versions: usize,
}

impl VersionHistory {
    /// Create an empty history with the default limit.
    pub fn new() -> Self {
        Self {
            versions: VecDeque::new(),
            max_versions: DEFAULT_MAX_VERSIONS,
        }
    }

    /// Create with a custom version limit.
    pub fn with_max_versions(mut self, max: usize) -> Self {
        self.max_versions = max;
        self.trim();
        self
    }

    /// Append a version, dropping the oldest past the limit.
    pub fn record(&mut self, version: EstimateVersion) {
        self.versions.push_back(version);
        self.trim();
    }

    /// Most recently recorded version.
    pub fn latest(&self) -> Option<&EstimateVersion> {
        self.versions.back()
    }

    /// Get a version by id.
    pub fn get(&self, id: Uuid) -> Option<&EstimateVersion> {
        self.versions.iter().find(|v| v.id == id)
    }

    /// All versions, oldest first.
    pub fn list(&self) -> Vec<&EstimateVersion> {
        self.versions.iter().collect()
    }

    /// Number of versions held.
    pub fn len(&self) -> usize {
        self.versions.len()
    }

    /// Check if no version has been recorded.
    pub fn is_empty(&self) -> bool {
        self.versions.is_empty()
    }

    fn trim(&mut self) {
        while self.versions.len() > self.max_versions {
            self.versions.pop_front();
        }
    }
}

impl Default for VersionHistory {
    fn default() -> Self {
        Self::new()
    }
}
