//! Selected tier and per-area tier overrides.
//!
//! Kept apart from the pricing functions so it can live wherever the caller
//! wants it: in memory for one editing session, or serialized alongside the
//! estimate.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::model::MaterialTier;

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TierOverrides {
    /// Estimate-level tier; areas without an override inherit it.
    pub selected: MaterialTier,
    #[serde(default)]
    overrides: BTreeMap<Uuid, MaterialTier>,
}

impl TierOverrides {
    /// Start at `selected` with no overrides.
    pub fn new(selected: MaterialTier) -> Self {
        Self {
            selected,
            overrides: BTreeMap::new(),
        }
    }

    /// Tier in effect for an area. Unassigned lines (`None`) use the
    /// estimate-level tier.
    pub fn effective_tier(&self, area_id: Option<Uuid>) -> MaterialTier {
        area_id
            .and_then(|id| self.overrides.get(&id).copied())
            .unwrap_or(self.selected)
    }

    /// The override for an area, if one is set.
    pub fn override_for(&self, area_id: Uuid) -> Option<MaterialTier> {
        self.overrides.get(&area_id).copied()
    }

    /// Pin an area to `tier`.
    pub fn set_override(&mut self, area_id: Uuid, tier: MaterialTier) {
        self.overrides.insert(area_id, tier);
    }

    /// Drop an area's override, returning the old tier.
    pub fn clear_override(&mut self, area_id: Uuid) -> Option<MaterialTier> {
        self.overrides.remove(&area_id)
    }

    /// Change the estimate-level tier and drop every area override.
    pub fn reset_to(&mut self, tier: MaterialTier) {
        self.selected = tier;
        self.overrides.clear();
    }

    /// Check if any area is overridden.
    pub fn has_overrides(&self) -> bool {
        !self.overrides.is_empty()
    }

    /// Overrides in area id order.
    pub fn iter(&self) -> impl Iterator<Item = (&Uuid, &MaterialTier)> {
        self.overrides.iter()
    }
}
