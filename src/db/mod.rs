//! Persistence seams for the pricing engine.
//!
//! The engine never talks to a database directly. It reads the material
//! catalog through [`MaterialCatalog`] and reads and writes estimates through
//! [`EstimateStore`]. [`InMemoryStore`] implements both.

mod memory;

pub use memory::InMemoryStore;

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::StoreError;
use crate::history::EstimateVersion;
use crate::model::{
    Area, ChangeOrder, Estimate, LineItem, LineItemPatch, MaterialCatalogItem, PricingRates,
};
use crate::pricing::Totals;

/// Read access to the material catalog.
#[async_trait]
pub trait MaterialCatalog: Send + Sync {
    /// Every material, in the catalog's stable order. Matching is
    /// first-hit-wins, so the order is significant.
    async fn list_materials(&self) -> Result<Vec<MaterialCatalogItem>, StoreError>;
}

/// Estimate persistence.
#[async_trait]
pub trait EstimateStore: Send + Sync {
    async fn load_estimate(&self, id: Uuid) -> Result<Estimate, StoreError>;

    async fn list_areas(&self, estimate_id: Uuid) -> Result<Vec<Area>, StoreError>;

    /// Live (not deleted) line items, in display order.
    async fn list_line_items(&self, estimate_id: Uuid) -> Result<Vec<LineItem>, StoreError>;

    async fn insert_line_item(&self, item: &LineItem) -> Result<(), StoreError>;

    /// Apply a partial update to one line item.
    async fn update_line_item(&self, id: Uuid, patch: &LineItemPatch) -> Result<(), StoreError>;

    /// Soft delete: the row is kept but no longer listed.
    async fn delete_line_item(&self, id: Uuid) -> Result<(), StoreError>;

    /// Replace the overhead, profit and tax percentages of an estimate.
    async fn update_estimate_rates(
        &self,
        estimate_id: Uuid,
        rates: &PricingRates,
    ) -> Result<(), StoreError>;

    /// Persist the totals snapshot shown on the estimate header.
    async fn recalculate_totals(
        &self,
        estimate_id: Uuid,
        totals: &Totals,
    ) -> Result<(), StoreError>;

    // --- Versions ---

    async fn save_version(&self, version: &EstimateVersion) -> Result<(), StoreError>;

    /// Versions of an estimate, oldest first.
    async fn list_versions(&self, estimate_id: Uuid) -> Result<Vec<EstimateVersion>, StoreError>;

    // --- Change orders ---

    async fn list_change_orders(&self, estimate_id: Uuid) -> Result<Vec<ChangeOrder>, StoreError>;
}
