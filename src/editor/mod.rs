//! Estimate editing session.
//!
//! [`EstimateEditor`] owns one estimate's line items, the loaded catalog and
//! the tier selection, and turns editing actions into store calls:
//!
//! 1. batch operations (tier switch, area override, version restore) record a
//!    snapshot first and refuse to start if that fails;
//! 2. per-line writes run with bounded concurrency and a per-call timeout,
//!    and a failed line never stops the rest of the batch;
//! 3. totals are recomputed and persisted once, after every write settled.

mod report;

pub use report::{BatchReport, LineEdit, TotalsSummary};

use std::sync::Arc;

use futures::stream::{self, StreamExt};
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::config::PricingConfig;
use crate::db::{EstimateStore, MaterialCatalog};
use crate::error::{EditorError, Result, StoreError};
use crate::history::{EstimateVersion, VersionHistory};
use crate::model::{
    Area, Estimate, LineItem, LineItemPatch, MaterialCatalogItem, MaterialTier, PricingRates,
};
use crate::pricing::{
    self, AreaTotals, CatalogMatcher, GbbComparison, SkipReason, TierOverrides, Totals,
    WarrantyRange,
};

/// Editing session for one estimate.
pub struct EstimateEditor {
    store: Arc<dyn EstimateStore>,
    config: PricingConfig,
    catalog: Vec<MaterialCatalogItem>,
    estimate: Estimate,
    areas: Vec<Area>,
    items: Vec<LineItem>,
    tiers: TierOverrides,
    history: VersionHistory,
}

impl EstimateEditor {
    /// Load an estimate, its areas, line items and versions, and the catalog.
    pub async fn open(
        store: Arc<dyn EstimateStore>,
        catalog: &dyn MaterialCatalog,
        estimate_id: Uuid,
        config: PricingConfig,
    ) -> Result<Self> {
        let estimate = store.load_estimate(estimate_id).await?;
        ensure_valid_rates(&estimate.rates)?;
        let areas = store.list_areas(estimate_id).await?;
        let items = store.list_line_items(estimate_id).await?;
        let materials = catalog.list_materials().await?;

        let mut history = VersionHistory::new().with_max_versions(config.max_versions);
        for version in store.list_versions(estimate_id).await? {
            history.record(version);
        }

        tracing::debug!(
            estimate_id = %estimate_id,
            lines = items.len(),
            areas = areas.len(),
            materials = materials.len(),
            "Opened estimate"
        );

        Ok(Self {
            store,
            tiers: TierOverrides::new(config.default_tier),
            config,
            catalog: materials,
            estimate,
            areas,
            items,
            history,
        })
    }

    /// The estimate header, including the last persisted totals.
    pub fn estimate(&self) -> &Estimate {
        &self.estimate
    }

    /// Areas of the estimate, in display order.
    pub fn areas(&self) -> &[Area] {
        &self.areas
    }

    /// Live line items, in display order.
    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    /// Current estimate tier and area overrides.
    pub fn tiers(&self) -> &TierOverrides {
        &self.tiers
    }

    /// Versions recorded for this estimate, oldest first.
    pub fn history(&self) -> &VersionHistory {
        &self.history
    }

    /// Matcher over the catalog loaded at open.
    pub fn matcher(&self) -> CatalogMatcher<'_> {
        CatalogMatcher::new(&self.catalog)
    }

    /// Tier in effect for an area, falling back to the estimate tier.
    pub fn effective_tier(&self, area_id: Option<Uuid>) -> MaterialTier {
        self.tiers.effective_tier(area_id)
    }

    /// Live totals from the current line items.
    pub fn totals(&self) -> Totals {
        pricing::rollup(&self.items, &self.estimate.rates)
    }

    /// Live totals per area, unassigned lines grouped under `None`.
    pub fn area_totals(&self) -> Vec<AreaTotals> {
        pricing::rollup_by_area(&self.items, &self.estimate.rates)
    }

    /// Warranty span over the materials the current lines match.
    pub fn warranty_range(&self) -> Option<WarrantyRange> {
        self.matcher().warranty_range(&self.items)
    }

    /// Good/Better/Best comparison of the current line items.
    pub fn compare(&self) -> GbbComparison {
        pricing::compare(&self.matcher(), &self.estimate, &self.items)
    }

    /// Totals panel contents, including approved change orders and the
    /// insurance net claim.
    pub async fn summary(&self) -> Result<TotalsSummary> {
        let totals = self.totals();
        let orders = self.store.list_change_orders(self.estimate.id).await?;
        let change_orders = pricing::approved_change_orders(&orders);

        let net_claim = (self.estimate.is_insurance() && self.estimate.deductible > Decimal::ZERO)
            .then(|| totals.net_claim(self.estimate.deductible));

        Ok(TotalsSummary {
            tier: self.tiers.selected,
            line_count: self.items.len(),
            totals,
            net_claim,
            change_orders,
            revised_grand: totals.with_change_orders(change_orders),
            warranty_range: self.warranty_range(),
        })
    }

    /// Recompute totals from the current line items and persist them.
    pub async fn refresh_totals(&mut self) -> Result<Totals> {
        let totals = self.totals();
        self.store.recalculate_totals(self.estimate.id, &totals).await?;
        self.estimate.totals = totals;
        Ok(totals)
    }

    /// Change overhead, profit and tax rates, persist them and refresh totals.
    pub async fn update_rates(&mut self, rates: PricingRates) -> Result<Totals> {
        ensure_valid_rates(&rates)?;

        self.store
            .update_estimate_rates(self.estimate.id, &rates)
            .await?;
        self.estimate.rates = rates;

        tracing::info!(
            estimate_id = %self.estimate.id,
            overhead = %rates.overhead_percent,
            profit = %rates.profit_percent,
            tax = %rates.tax_percent,
            "Updated pricing rates"
        );

        self.refresh_totals().await
    }

    /// Move every line item to `target` and make it the estimate-level tier.
    /// Area overrides are cleared.
    pub async fn switch_tier(&mut self, target: MaterialTier) -> Result<BatchReport> {
        tracing::info!(
            estimate_id = %self.estimate.id,
            from = %self.tiers.selected,
            to = %target,
            "Switching estimate tier"
        );

        let snapshot_id = self
            .snapshot(format!("Before tier switch to {}", target))
            .await?;
        let plan = pricing::plan_tier_switch(&self.matcher(), &self.items, target);
        let report = self.execute(snapshot_id, plan).await;

        // A batch where every attempted write failed leaves the lines on the
        // old tier, so the selection stays put too.
        if !report.updated.is_empty() || report.failed.is_empty() {
            self.tiers.reset_to(target);
        }
        Ok(report)
    }

    /// Move the line items of one area to `target` and record the override.
    ///
    /// The override is only recorded once the snapshot is saved and at least
    /// one planned write went through (or nothing needed writing).
    pub async fn override_area_tier(
        &mut self,
        area_id: Uuid,
        target: MaterialTier,
    ) -> Result<BatchReport> {
        if !self.areas.iter().any(|a| a.id == area_id) {
            return Err(EditorError::UnknownArea(area_id));
        }

        tracing::info!(
            estimate_id = %self.estimate.id,
            area_id = %area_id,
            to = %target,
            "Overriding area tier"
        );

        let snapshot_id = self
            .snapshot(format!("Before area tier override to {}", target))
            .await?;
        let plan = pricing::plan_tier_switch(
            &self.matcher(),
            self.items.iter().filter(|li| li.area_id == Some(area_id)),
            target,
        );
        let report = self.execute(snapshot_id, plan).await;

        if !report.updated.is_empty() || report.failed.is_empty() {
            self.tiers.set_override(area_id, target);
        }
        Ok(report)
    }

    /// Put every line still on the estimate back to its pricing in `version_id`.
    /// The current state is snapshotted first, so a restore can be undone too.
    pub async fn restore_version(&mut self, version_id: Uuid) -> Result<BatchReport> {
        let version = match self.history.get(version_id) {
            Some(v) => v.clone(),
            None => self
                .store
                .list_versions(self.estimate.id)
                .await?
                .into_iter()
                .find(|v| v.id == version_id)
                .ok_or(EditorError::UnknownVersion(version_id))?,
        };

        tracing::info!(
            estimate_id = %self.estimate.id,
            version_id = %version_id,
            label = %version.label,
            "Restoring version"
        );

        let snapshot_id = self
            .snapshot(format!("Before restoring \"{}\"", version.label))
            .await?;

        let mut writes = Vec::new();
        for item in &self.items {
            let Some(line) = version.line(item.id) else {
                continue;
            };
            let mut restored = item.clone();
            if let Some(patch) = line.restore_onto(&mut restored) {
                writes.push((restored, patch));
            }
        }

        let report = self.persist(snapshot_id, writes, Vec::new()).await;
        self.tiers.reset_to(version.tier);
        Ok(report)
    }

    /// Edit one field of a line item and refresh totals.
    pub async fn update_line(&mut self, line_id: Uuid, edit: LineEdit) -> Result<LineItem> {
        let index = self.line_index(line_id)?;
        let mut updated = self.items[index].clone();

        let patch = match edit {
            LineEdit::Quantity(q) => {
                ensure_non_negative("quantity", q)?;
                updated.set_quantity(q);
                LineItemPatch {
                    quantity: Some(q),
                    line_total: Some(updated.line_total),
                    ..Default::default()
                }
            }
            LineEdit::UnitPrice(p) => {
                ensure_non_negative("unit_price", p)?;
                updated.set_unit_price(p);
                LineItemPatch {
                    unit_price: Some(p),
                    line_total: Some(updated.line_total),
                    ..Default::default()
                }
            }
            LineEdit::ActionType(a) => {
                updated.action_type = a;
                LineItemPatch {
                    action_type: Some(a),
                    ..Default::default()
                }
            }
            LineEdit::Description(d) => {
                updated.description = d.clone();
                LineItemPatch {
                    description: Some(d),
                    ..Default::default()
                }
            }
            LineEdit::Notes(n) => {
                updated.notes = n.clone();
                LineItemPatch {
                    notes: Some(n),
                    ..Default::default()
                }
            }
        };

        self.store.update_line_item(line_id, &patch).await?;
        self.items[index] = updated.clone();
        self.refresh_totals().await?;
        Ok(updated)
    }

    /// Add a line item for a catalog material and refresh totals.
    pub async fn add_catalog_item(
        &mut self,
        material_id: &str,
        area_id: Option<Uuid>,
        labor_cost: Decimal,
        equipment_cost: Decimal,
    ) -> Result<LineItem> {
        ensure_non_negative("labor_cost", labor_cost)?;
        ensure_non_negative("equipment_cost", equipment_cost)?;

        if let Some(id) = area_id {
            if !self.areas.iter().any(|a| a.id == id) {
                return Err(EditorError::UnknownArea(id));
            }
        }

        let material = self
            .catalog
            .iter()
            .find(|m| m.id == material_id)
            .ok_or_else(|| EditorError::UnknownMaterial(material_id.to_string()))?;

        let mut item =
            LineItem::from_material(self.estimate.id, material, labor_cost, equipment_cost);
        item.area_id = area_id;
        item.sort_order = self.items.iter().filter(|li| li.area_id == area_id).count() as u32;

        self.store.insert_line_item(&item).await?;
        tracing::debug!(line_id = %item.id, material = %material.id, "Added catalog line item");

        self.items.push(item.clone());
        self.refresh_totals().await?;
        Ok(item)
    }

    /// Soft-delete a line item and refresh totals.
    pub async fn delete_line(&mut self, line_id: Uuid) -> Result<Totals> {
        let index = self.line_index(line_id)?;
        self.store.delete_line_item(line_id).await?;
        self.items.remove(index);
        self.refresh_totals().await
    }

    /// Re-read line items from the store, discarding local state.
    pub async fn reload(&mut self) -> Result<()> {
        self.items = self.store.list_line_items(self.estimate.id).await?;
        self.areas = self.store.list_areas(self.estimate.id).await?;
        Ok(())
    }

    fn line_index(&self, line_id: Uuid) -> Result<usize> {
        self.items
            .iter()
            .position(|li| li.id == line_id)
            .ok_or(EditorError::UnknownLineItem(line_id))
    }

    /// Durably record the current pricing. Nothing is written to line items
    /// if this fails.
    async fn snapshot(&mut self, label: String) -> Result<Uuid> {
        let version = EstimateVersion::capture(
            self.estimate.id,
            label.clone(),
            self.tiers.selected,
            &self.items,
        );
        let id = version.id;

        self.store
            .save_version(&version)
            .await
            .map_err(|source| EditorError::SnapshotFailed {
                operation: label,
                source,
            })?;

        self.history.record(version);
        Ok(id)
    }

    async fn execute(&mut self, snapshot_id: Uuid, plan: pricing::SubstitutionPlan) -> BatchReport {
        let writes = plan
            .substitutions
            .into_iter()
            .map(|sub| {
                let patch = LineItemPatch::pricing(&sub.updated);
                (sub.updated, patch)
            })
            .collect();
        self.persist(snapshot_id, writes, plan.skipped).await
    }

    /// Write each planned line, then recompute and persist totals.
    async fn persist(
        &mut self,
        snapshot_id: Uuid,
        writes: Vec<(LineItem, LineItemPatch)>,
        skipped: Vec<(Uuid, SkipReason)>,
    ) -> BatchReport {
        let timeout = self.config.write_timeout;
        let store = &self.store;

        let results: Vec<(LineItem, std::result::Result<(), StoreError>)> = stream::iter(writes)
            .map(|(item, patch)| async move {
                let write = store.update_line_item(item.id, &patch);
                let result = match tokio::time::timeout(timeout, write).await {
                    Ok(r) => r,
                    Err(_) => Err(StoreError::Timeout(timeout)),
                };
                (item, result)
            })
            .buffered(self.config.write_concurrency)
            .collect()
            .await;

        let mut updated = Vec::new();
        let mut failed = Vec::new();

        for (item, result) in results {
            match result {
                Ok(()) => {
                    updated.push(item.id);
                    if let Some(slot) = self.items.iter_mut().find(|li| li.id == item.id) {
                        *slot = item;
                    }
                }
                Err(e) => {
                    tracing::warn!(line_id = %item.id, error = %e, "Line item update failed");
                    failed.push((item.id, e));
                }
            }
        }

        let totals = self.totals();
        let totals_error = match self.store.recalculate_totals(self.estimate.id, &totals).await {
            Ok(()) => {
                self.estimate.totals = totals;
                None
            }
            Err(e) => {
                tracing::warn!(
                    estimate_id = %self.estimate.id,
                    error = %e,
                    "Persisting totals failed"
                );
                Some(e)
            }
        };

        tracing::info!(
            estimate_id = %self.estimate.id,
            updated = updated.len(),
            skipped = skipped.len(),
            failed = failed.len(),
            grand = %totals.grand,
            "Batch finished"
        );

        BatchReport {
            snapshot_id,
            updated,
            skipped,
            failed,
            totals,
            totals_error,
        }
    }
}

fn ensure_valid_rates(rates: &PricingRates) -> Result<()> {
    if !rates.is_valid() {
        return Err(EditorError::InvalidValue {
            field: "rates",
            reason: format!(
                "percentages must not be negative, got overhead {} profit {} tax {}",
                rates.overhead_percent, rates.profit_percent, rates.tax_percent
            ),
        });
    }
    Ok(())
}

fn ensure_non_negative(field: &'static str, value: Decimal) -> Result<()> {
    if value < Decimal::ZERO {
        return Err(EditorError::InvalidValue {
            field,
            reason: format!("must not be negative, got {}", value),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::InMemoryStore;
    use crate::model::{ActionType, ChangeOrder};
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;
    use std::time::Duration;

    struct Fixture {
        store: Arc<InMemoryStore>,
        estimate: Estimate,
        kitchen: Area,
        bath: Area,
        shingle: LineItem,
        vent: LineItem,
        labor: LineItem,
    }

    fn rfg(
        id: &str,
        name: &str,
        category: &str,
        tier: MaterialTier,
        cost: rust_decimal::Decimal,
    ) -> MaterialCatalogItem {
        MaterialCatalogItem::new(id, name, "RFG", category, tier, cost)
    }

    fn catalog() -> Vec<MaterialCatalogItem> {
        vec![
            rfg("shg-s", "Asphalt Shingle - Standard", "shingle", MaterialTier::Standard, dec!(120))
                .with_warranty(15),
            rfg("shg-p", "Asphalt Shingle - Premium", "shingle", MaterialTier::Premium, dec!(180))
                .with_warranty(30),
            rfg("vent-s", "Box Vent", "vent", MaterialTier::Standard, dec!(30)),
            rfg("vent-p", "Ridge Vent", "vent", MaterialTier::Premium, dec!(55)),
        ]
    }

    async fn fixture() -> Fixture {
        let store = Arc::new(InMemoryStore::new().with_catalog(catalog()));
        let estimate =
            Estimate::new("Roof replacement", PricingRates::new(dec!(10), dec!(15), dec!(8)));
        let kitchen = Area::new(estimate.id, "Kitchen");
        let bath = Area::new(estimate.id, "Bathroom");

        let shingle = LineItem::new(estimate.id, "Asphalt Shingle - Standard", dec!(2), dec!(170))
            .with_costs(dec!(120), dec!(50), dec!(0))
            .in_area(kitchen.id);
        let vent = LineItem::new(estimate.id, "Box Vent", dec!(4), dec!(45))
            .with_costs(dec!(30), dec!(10), dec!(5))
            .in_area(bath.id);
        let labor = LineItem::new(estimate.id, "Tear-off labor", dec!(10), dec!(65));

        store.put_estimate(estimate.clone()).await;
        store.put_area(kitchen.clone()).await;
        store.put_area(bath.clone()).await;
        store
            .put_line_items([shingle.clone(), vent.clone(), labor.clone()])
            .await;

        Fixture {
            store,
            estimate,
            kitchen,
            bath,
            shingle,
            vent,
            labor,
        }
    }

    async fn open(f: &Fixture, config: PricingConfig) -> EstimateEditor {
        EstimateEditor::open(f.store.clone(), f.store.as_ref(), f.estimate.id, config)
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_switch_tier_rewrites_matched_lines() {
        let f = fixture().await;
        let mut editor = open(&f, PricingConfig::default()).await;

        let report = editor.switch_tier(MaterialTier::Premium).await.unwrap();

        assert!(report.is_complete());
        assert_eq!(report.updated, vec![f.shingle.id, f.vent.id]);
        assert_eq!(report.skipped, vec![(f.labor.id, SkipReason::NoMatch)]);

        let shingle = f.store.line_item(f.shingle.id).await.unwrap();
        assert_eq!(shingle.description, "Asphalt Shingle - Premium");
        assert_eq!(shingle.unit_price, dec!(230));
        assert_eq!(shingle.line_total, dec!(460));
        assert_eq!(shingle.labor_cost, dec!(50));

        let vent = f.store.line_item(f.vent.id).await.unwrap();
        assert_eq!(vent.unit_price, dec!(70));
        assert_eq!(vent.equipment_cost, dec!(5));

        assert_eq!(f.store.line_item(f.labor.id).await.unwrap(), f.labor);
        assert_eq!(editor.tiers().selected, MaterialTier::Premium);

        // 460 + 280 + 650 = 1390; +10% +15% = 1737.5; +8% tax = 1876.5
        assert_eq!(report.totals.subtotal, dec!(1390));
        assert_eq!(report.totals.grand, dec!(1876.5));
        let stored = f.store.load_estimate(f.estimate.id).await.unwrap();
        assert_eq!(stored.totals, report.totals);
    }

    #[tokio::test]
    async fn test_snapshot_recorded_before_writes() {
        let f = fixture().await;
        let mut editor = open(&f, PricingConfig::default()).await;

        let report = editor.switch_tier(MaterialTier::Premium).await.unwrap();

        let versions = f.store.list_versions(f.estimate.id).await.unwrap();
        assert_eq!(versions.len(), 1);
        assert_eq!(versions[0].id, report.snapshot_id);
        assert_eq!(versions[0].label, "Before tier switch to premium");
        assert_eq!(versions[0].tier, MaterialTier::Standard);
        assert_eq!(versions[0].line(f.shingle.id).unwrap().unit_price, dec!(170));
        assert_eq!(editor.history().len(), 1);
    }

    #[tokio::test]
    async fn test_snapshot_failure_blocks_batch() {
        let f = fixture().await;
        f.store.fail_version_writes(true).await;
        let mut editor = open(&f, PricingConfig::default()).await;

        let err = editor.switch_tier(MaterialTier::Premium).await.unwrap_err();
        assert!(matches!(err, EditorError::SnapshotFailed { .. }));
        assert_eq!(f.store.line_write_count(), 0);
        assert_eq!(editor.tiers().selected, MaterialTier::Standard);
    }

    #[tokio::test]
    async fn test_area_override_not_recorded_when_snapshot_fails() {
        let f = fixture().await;
        f.store.fail_version_writes(true).await;
        let mut editor = open(&f, PricingConfig::default()).await;

        let err = editor
            .override_area_tier(f.kitchen.id, MaterialTier::Premium)
            .await
            .unwrap_err();

        assert!(matches!(err, EditorError::SnapshotFailed { .. }));
        assert_eq!(editor.effective_tier(Some(f.kitchen.id)), MaterialTier::Standard);
        assert!(!editor.tiers().has_overrides());
        assert_eq!(f.store.line_item(f.shingle.id).await.unwrap(), f.shingle);
    }

    #[tokio::test]
    async fn test_tier_kept_when_every_write_fails() {
        let f = fixture().await;
        f.store.fail_writes_for(f.shingle.id).await;
        f.store.fail_writes_for(f.vent.id).await;
        let mut editor = open(&f, PricingConfig::default()).await;

        let report = editor.switch_tier(MaterialTier::Premium).await.unwrap();
        assert!(report.updated.is_empty());
        assert_eq!(report.failed.len(), 2);
        assert_eq!(editor.tiers().selected, MaterialTier::Standard);

        let report = editor
            .override_area_tier(f.kitchen.id, MaterialTier::Premium)
            .await
            .unwrap();
        assert_eq!(report.failed_ids(), vec![f.shingle.id]);
        assert_eq!(editor.effective_tier(Some(f.kitchen.id)), MaterialTier::Standard);
    }

    #[tokio::test]
    async fn test_failed_line_does_not_abort_batch() {
        let f = fixture().await;
        f.store.fail_writes_for(f.shingle.id).await;
        let mut editor = open(&f, PricingConfig::default()).await;

        let report = editor.switch_tier(MaterialTier::Premium).await.unwrap();

        assert!(!report.is_complete());
        assert_eq!(report.failed_ids(), vec![f.shingle.id]);
        assert_eq!(report.updated, vec![f.vent.id]);

        // The rejected line keeps its old pricing locally and in the store.
        let local = editor.items().iter().find(|li| li.id == f.shingle.id).unwrap();
        assert_eq!(local, &f.shingle);
        assert_eq!(f.store.line_item(f.shingle.id).await.unwrap(), f.shingle);
        assert_eq!(report.totals, editor.totals());
    }

    #[tokio::test]
    async fn test_write_timeout_counts_as_failure() {
        let f = fixture().await;
        f.store.stall_writes_for(f.vent.id, Duration::from_millis(500)).await;
        let config = PricingConfig::default()
            .with_write_timeout(Duration::from_millis(20))
            .with_write_concurrency(4);
        let mut editor = open(&f, config).await;

        let report = editor.switch_tier(MaterialTier::Premium).await.unwrap();

        assert_eq!(report.updated, vec![f.shingle.id]);
        assert_eq!(report.failed.len(), 1);
        assert!(matches!(report.failed[0].1, StoreError::Timeout(_)));
    }

    #[tokio::test]
    async fn test_area_override_touches_only_that_area() {
        let f = fixture().await;
        let mut editor = open(&f, PricingConfig::default()).await;

        let report = editor
            .override_area_tier(f.kitchen.id, MaterialTier::Premium)
            .await
            .unwrap();

        assert_eq!(report.updated, vec![f.shingle.id]);
        assert!(report.skipped.is_empty());
        assert_eq!(f.store.line_item(f.vent.id).await.unwrap(), f.vent);
        assert_eq!(editor.effective_tier(Some(f.kitchen.id)), MaterialTier::Premium);
        assert_eq!(editor.effective_tier(Some(f.bath.id)), MaterialTier::Standard);

        // An estimate-wide switch clears the override.
        editor.switch_tier(MaterialTier::Standard).await.unwrap();
        assert!(!editor.tiers().has_overrides());
        assert_eq!(
            f.store.line_item(f.shingle.id).await.unwrap().unit_price,
            dec!(170)
        );
    }

    #[tokio::test]
    async fn test_area_override_unknown_area() {
        let f = fixture().await;
        let mut editor = open(&f, PricingConfig::default()).await;
        let err = editor
            .override_area_tier(Uuid::new_v4(), MaterialTier::Elite)
            .await
            .unwrap_err();
        assert!(matches!(err, EditorError::UnknownArea(_)));
    }

    #[tokio::test]
    async fn test_restore_version_undoes_switch() {
        let f = fixture().await;
        let mut editor = open(&f, PricingConfig::default()).await;
        let before = editor.totals();

        let switch = editor.switch_tier(MaterialTier::Premium).await.unwrap();
        assert_ne!(editor.totals(), before);

        let restore = editor.restore_version(switch.snapshot_id).await.unwrap();
        assert!(restore.is_complete());
        assert_eq!(restore.updated.len(), 2);
        assert_eq!(editor.totals(), before);
        assert_eq!(f.store.line_item(f.shingle.id).await.unwrap(), f.shingle);
        assert_eq!(editor.tiers().selected, MaterialTier::Standard);

        let err = editor.restore_version(Uuid::new_v4()).await.unwrap_err();
        assert!(matches!(err, EditorError::UnknownVersion(_)));
    }

    #[tokio::test]
    async fn test_line_edits_keep_total_and_refresh() {
        let f = fixture().await;
        let mut editor = open(&f, PricingConfig::default()).await;

        let updated = editor
            .update_line(f.labor.id, LineEdit::Quantity(dec!(12)))
            .await
            .unwrap();
        assert_eq!(updated.line_total, dec!(780));

        let updated = editor
            .update_line(f.labor.id, LineEdit::UnitPrice(dec!(70)))
            .await
            .unwrap();
        assert_eq!(updated.line_total, dec!(840));
        assert_eq!(f.store.line_item(f.labor.id).await.unwrap().line_total, dec!(840));

        editor
            .update_line(f.labor.id, LineEdit::ActionType(ActionType::Remove))
            .await
            .unwrap();
        editor
            .update_line(f.labor.id, LineEdit::Notes("north slope only".into()))
            .await
            .unwrap();
        let stored = f.store.line_item(f.labor.id).await.unwrap();
        assert_eq!(stored.action_type, ActionType::Remove);
        assert_eq!(stored.notes, "north slope only");

        let persisted = f.store.load_estimate(f.estimate.id).await.unwrap().totals;
        assert_eq!(persisted, editor.totals());

        let err = editor
            .update_line(f.labor.id, LineEdit::Quantity(dec!(-1)))
            .await
            .unwrap_err();
        assert!(matches!(err, EditorError::InvalidValue { field: "quantity", .. }));
    }

    #[tokio::test]
    async fn test_add_and_delete_lines() {
        let f = fixture().await;
        let mut editor = open(&f, PricingConfig::default()).await;

        let added = editor
            .add_catalog_item("vent-p", Some(f.kitchen.id), dec!(20), dec!(0))
            .await
            .unwrap();
        assert_eq!(added.description, "Ridge Vent");
        assert_eq!(added.unit_price, dec!(75));
        assert_eq!(added.sort_order, 1);
        assert_eq!(editor.items().len(), 4);

        let totals = editor.delete_line(added.id).await.unwrap();
        assert!(f.store.is_deleted(added.id).await);
        assert_eq!(editor.items().len(), 3);
        assert_eq!(totals.subtotal, dec!(340) + dec!(180) + dec!(650));

        assert!(matches!(
            editor.add_catalog_item("nope", None, dec!(0), dec!(0)).await,
            Err(EditorError::UnknownMaterial(_))
        ));
        assert!(matches!(
            editor.delete_line(added.id).await,
            Err(EditorError::UnknownLineItem(_))
        ));
    }

    #[tokio::test]
    async fn test_summary_includes_change_orders_and_net_claim() {
        let f = fixture().await;
        f.store
            .put_change_order(
                ChangeOrder::new(f.estimate.id, "extra flashing", dec!(250)).approved(),
            )
            .await;
        f.store
            .put_change_order(ChangeOrder::new(f.estimate.id, "maybe skylight", dec!(900)))
            .await;

        f.store
            .put_estimate(f.estimate.clone().insurance(dec!(1000)))
            .await;

        let editor = open(&f, PricingConfig::default()).await;
        let summary = editor.summary().await.unwrap();

        assert_eq!(summary.line_count, 3);
        assert_eq!(summary.change_orders, dec!(250));
        assert_eq!(summary.revised_grand, summary.totals.grand + dec!(250));
        assert_eq!(summary.net_claim, Some(summary.totals.grand - dec!(1000)));
        assert_eq!(summary.warranty_range.unwrap().to_string(), "15 yr");
    }

    #[tokio::test]
    async fn test_update_rates_persists_and_refreshes() {
        let f = fixture().await;
        let mut editor = open(&f, PricingConfig::default()).await;

        let totals = editor
            .update_rates(PricingRates::new(dec!(0), dec!(0), dec!(10)))
            .await
            .unwrap();
        // 340 + 180 + 650 = 1170, +10% tax
        assert_eq!(totals.subtotal, dec!(1170));
        assert_eq!(totals.grand, dec!(1287));

        let stored = f.store.load_estimate(f.estimate.id).await.unwrap();
        assert_eq!(stored.rates.tax_percent, dec!(10));
        assert_eq!(stored.totals, totals);

        let err = editor
            .update_rates(PricingRates::new(dec!(-5), dec!(0), dec!(0)))
            .await
            .unwrap_err();
        assert!(matches!(err, EditorError::InvalidValue { field: "rates", .. }));
        assert_eq!(editor.estimate().rates.tax_percent, dec!(10));
        let stored = f.store.load_estimate(f.estimate.id).await.unwrap();
        assert_eq!(stored.rates.overhead_percent, dec!(0));
    }

    #[tokio::test]
    async fn test_open_rejects_negative_rates() {
        let store = Arc::new(InMemoryStore::new().with_catalog(catalog()));
        let estimate = Estimate::new("Bad", PricingRates::new(dec!(10), dec!(-15), dec!(8)));
        store.put_estimate(estimate.clone()).await;

        let config = PricingConfig::default();
        let result = EstimateEditor::open(store.clone(), store.as_ref(), estimate.id, config).await;
        assert!(matches!(result, Err(EditorError::InvalidValue { field: "rates", .. })));
    }

    #[tokio::test]
    async fn test_area_totals_and_reload() {
        let f = fixture().await;
        let mut editor = open(&f, PricingConfig::default()).await;

        let by_area = editor.area_totals();
        let ids: Vec<Option<Uuid>> = by_area.iter().map(|a| a.area_id).collect();
        assert_eq!(ids, vec![Some(f.kitchen.id), Some(f.bath.id), None]);
        assert_eq!(by_area[0].totals.subtotal, dec!(340));
        assert_eq!(by_area[1].totals.subtotal, dec!(180));
        assert_eq!(by_area[2].line_count, 1);

        // A line written by someone else shows up only after a reload.
        let extra = LineItem::new(f.estimate.id, "Permit", dec!(1), dec!(150)).in_area(f.bath.id);
        f.store.put_line_items([extra.clone()]).await;
        assert_eq!(editor.items().len(), 3);

        editor.reload().await.unwrap();
        assert_eq!(editor.items().len(), 4);
        assert_eq!(editor.area_totals()[1].totals.subtotal, dec!(330));
    }

    #[tokio::test]
    async fn test_empty_estimate() {
        let store = Arc::new(InMemoryStore::new().with_catalog(catalog()));
        let estimate = Estimate::new("Empty", PricingRates::new(dec!(10), dec!(10), dec!(5)));
        store.put_estimate(estimate.clone()).await;

        let config = PricingConfig::default();
        let mut editor = EstimateEditor::open(store.clone(), store.as_ref(), estimate.id, config)
            .await
            .unwrap();

        assert!(editor.totals().is_zero());
        assert!(editor.compare().is_empty());
        let report = editor.switch_tier(MaterialTier::Elite).await.unwrap();
        assert!(report.updated.is_empty());
        assert!(report.totals.is_zero());
    }
}
