//! JSON estimate fixtures.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::db::{EstimateStore, InMemoryStore};
use crate::error::StoreError;
use crate::model::{Area, ChangeOrder, Estimate, LineItem, MaterialCatalogItem};

/// One estimate with everything needed to price it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EstimateFixture {
    pub estimate: Estimate,
    #[serde(default)]
    pub areas: Vec<Area>,
    #[serde(default)]
    pub line_items: Vec<LineItem>,
    #[serde(default)]
    pub catalog: Vec<MaterialCatalogItem>,
    #[serde(default)]
    pub change_orders: Vec<ChangeOrder>,
}

impl EstimateFixture {
    /// Read a fixture from a JSON file.
    pub async fn load(path: &Path) -> anyhow::Result<Self> {
        let raw = tokio::fs::read_to_string(path).await?;
        Ok(serde_json::from_str(&raw)?)
    }

    /// Write the fixture as pretty-printed JSON.
    pub async fn save(&self, path: &Path) -> anyhow::Result<()> {
        tokio::fs::write(path, serde_json::to_string_pretty(self)?).await?;
        Ok(())
    }

    /// Seed a fresh in-memory store with this fixture.
    pub async fn into_store(self) -> InMemoryStore {
        let store = InMemoryStore::new().with_catalog(self.catalog);
        store.put_estimate(self.estimate).await;
        for area in self.areas {
            store.put_area(area).await;
        }
        for order in self.change_orders {
            store.put_change_order(order).await;
        }
        store.put_line_items(self.line_items).await;
        store
    }

    /// Read the current state of `estimate_id` back out of a store.
    pub async fn from_store(
        store: &InMemoryStore,
        estimate_id: uuid::Uuid,
        catalog: Vec<MaterialCatalogItem>,
    ) -> Result<Self, StoreError> {
        Ok(Self {
            estimate: store.load_estimate(estimate_id).await?,
            areas: store.list_areas(estimate_id).await?,
            line_items: store.list_line_items(estimate_id).await?,
            catalog,
            change_orders: store.list_change_orders(estimate_id).await?,
        })
    }
}
