//! In-memory catalog and estimate store.
//!
//! Backs the CLI and the test suite. Writes to selected line items can be made
//! to fail or stall so batch error handling can be exercised.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::db::{EstimateStore, MaterialCatalog};
use crate::error::StoreError;
use crate::history::EstimateVersion;
use crate::model::{
    Area, ChangeOrder, Estimate, LineItem, LineItemPatch, MaterialCatalogItem, PricingRates,
};
use crate::pricing::Totals;

#[derive(Debug, Clone)]
struct StoredLine {
    item: LineItem,
    deleted_at: Option<DateTime<Utc>>,
}

/// Store holding everything in `RwLock`-guarded collections.
#[derive(Default)]
pub struct InMemoryStore {
    catalog: RwLock<Vec<MaterialCatalogItem>>,
    estimates: RwLock<HashMap<Uuid, Estimate>>,
    areas: RwLock<Vec<Area>>,
    lines: RwLock<Vec<StoredLine>>,
    versions: RwLock<Vec<EstimateVersion>>,
    change_orders: RwLock<Vec<ChangeOrder>>,
    failing_lines: RwLock<HashSet<Uuid>>,
    stalled_lines: RwLock<HashMap<Uuid, Duration>>,
    fail_versions: RwLock<bool>,
    line_writes: AtomicUsize,
}

impl InMemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the material catalog.
    pub fn with_catalog(mut self, catalog: Vec<MaterialCatalogItem>) -> Self {
        self.catalog = RwLock::new(catalog);
        self
    }

    /// Insert or replace an estimate header.
    pub async fn put_estimate(&self, estimate: Estimate) {
        self.estimates.write().await.insert(estimate.id, estimate);
    }

    /// Add an area.
    pub async fn put_area(&self, area: Area) {
        self.areas.write().await.push(area);
    }

    /// Add a change order.
    pub async fn put_change_order(&self, order: ChangeOrder) {
        self.change_orders.write().await.push(order);
    }

    /// Insert line items without going through the trait.
    pub async fn put_line_items(&self, items: impl IntoIterator<Item = LineItem>) {
        let mut lines = self.lines.write().await;
        lines.extend(items.into_iter().map(|item| StoredLine {
            item,
            deleted_at: None,
        }));
    }

    /// Make every subsequent update of `id` fail.
    pub async fn fail_writes_for(&self, id: Uuid) {
        self.failing_lines.write().await.insert(id);
    }

    /// Delay every subsequent update of `id` by `delay`.
    pub async fn stall_writes_for(&self, id: Uuid, delay: Duration) {
        self.stalled_lines.write().await.insert(id, delay);
    }

    /// Make `save_version` fail.
    pub async fn fail_version_writes(&self, fail: bool) {
        *self.fail_versions.write().await = fail;
    }

    /// Number of successful line-item updates so far.
    pub fn line_write_count(&self) -> usize {
        self.line_writes.load(Ordering::SeqCst)
    }

    /// A line item by id, including soft-deleted ones.
    pub async fn line_item(&self, id: Uuid) -> Option<LineItem> {
        self.lines
            .read()
            .await
            .iter()
            .find(|l| l.item.id == id)
            .map(|l| l.item.clone())
    }

    /// Whether a line item has been soft-deleted.
    pub async fn is_deleted(&self, id: Uuid) -> bool {
        self.lines
            .read()
            .await
            .iter()
            .any(|l| l.item.id == id && l.deleted_at.is_some())
    }
}

#[async_trait]
impl MaterialCatalog for InMemoryStore {
    async fn list_materials(&self) -> Result<Vec<MaterialCatalogItem>, StoreError> {
        Ok(self.catalog.read().await.clone())
    }
}

#[async_trait]
impl EstimateStore for InMemoryStore {
    async fn load_estimate(&self, id: Uuid) -> Result<Estimate, StoreError> {
        self.estimates
            .read()
            .await
            .get(&id)
            .cloned()
            .ok_or(StoreError::EstimateNotFound(id))
    }

    async fn list_areas(&self, estimate_id: Uuid) -> Result<Vec<Area>, StoreError> {
        let mut areas: Vec<Area> = self
            .areas
            .read()
            .await
            .iter()
            .filter(|a| a.estimate_id == estimate_id)
            .cloned()
            .collect();
        areas.sort_by_key(|a| a.sort_order);
        Ok(areas)
    }

    async fn list_line_items(&self, estimate_id: Uuid) -> Result<Vec<LineItem>, StoreError> {
        Ok(self
            .lines
            .read()
            .await
            .iter()
            .filter(|l| l.item.estimate_id == estimate_id && l.deleted_at.is_none())
            .map(|l| l.item.clone())
            .collect())
    }

    async fn insert_line_item(&self, item: &LineItem) -> Result<(), StoreError> {
        let mut lines = self.lines.write().await;
        if lines.iter().any(|l| l.item.id == item.id) {
            return Err(StoreError::WriteFailed(format!("duplicate line item {}", item.id)));
        }
        lines.push(StoredLine {
            item: item.clone(),
            deleted_at: None,
        });
        Ok(())
    }

    async fn update_line_item(&self, id: Uuid, patch: &LineItemPatch) -> Result<(), StoreError> {
        let delay = self.stalled_lines.read().await.get(&id).copied();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        if self.failing_lines.read().await.contains(&id) {
            return Err(StoreError::WriteFailed(format!("update rejected for {}", id)));
        }

        let mut lines = self.lines.write().await;
        let line = lines
            .iter_mut()
            .find(|l| l.item.id == id && l.deleted_at.is_none())
            .ok_or(StoreError::LineItemNotFound(id))?;
        patch.apply_to(&mut line.item);
        self.line_writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn delete_line_item(&self, id: Uuid) -> Result<(), StoreError> {
        let mut lines = self.lines.write().await;
        let line = lines
            .iter_mut()
            .find(|l| l.item.id == id && l.deleted_at.is_none())
            .ok_or(StoreError::LineItemNotFound(id))?;
        line.deleted_at = Some(Utc::now());
        Ok(())
    }

    async fn update_estimate_rates(
        &self,
        estimate_id: Uuid,
        rates: &PricingRates,
    ) -> Result<(), StoreError> {
        let mut estimates = self.estimates.write().await;
        let estimate = estimates
            .get_mut(&estimate_id)
            .ok_or(StoreError::EstimateNotFound(estimate_id))?;
        estimate.rates = *rates;
        Ok(())
    }

    async fn recalculate_totals(
        &self,
        estimate_id: Uuid,
        totals: &Totals,
    ) -> Result<(), StoreError> {
        let mut estimates = self.estimates.write().await;
        let estimate = estimates
            .get_mut(&estimate_id)
            .ok_or(StoreError::EstimateNotFound(estimate_id))?;
        estimate.totals = *totals;
        Ok(())
    }

    async fn save_version(&self, version: &EstimateVersion) -> Result<(), StoreError> {
        if *self.fail_versions.read().await {
            return Err(StoreError::WriteFailed("version table unavailable".to_string()));
        }
        self.versions.write().await.push(version.clone());
        Ok(())
    }

    async fn list_versions(&self, estimate_id: Uuid) -> Result<Vec<EstimateVersion>, StoreError> {
        Ok(self
            .versions
            .read()
            .await
            .iter()
            .filter(|v| v.estimate_id == estimate_id)
            .cloned()
            .collect())
    }

    async fn list_change_orders(&self, estimate_id: Uuid) -> Result<Vec<ChangeOrder>, StoreError> {
        Ok(self
            .change_orders
            .read()
            .await
            .iter()
            .filter(|c| c.estimate_id == estimate_id)
            .cloned()
            .collect())
    }
}
