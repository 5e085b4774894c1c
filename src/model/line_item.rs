//! Line items and the partial updates sent to the estimate store.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::model::MaterialCatalogItem;

/// What kind of work a line item describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActionType {
    Remove,
    #[default]
    Replace,
    Install,
    Repair,
    Clean,
    Treat,
    Other,
}

impl std::str::FromStr for ActionType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "remove" => Ok(ActionType::Remove),
            "replace" => Ok(ActionType::Replace),
            "install" => Ok(ActionType::Install),
            "repair" => Ok(ActionType::Repair),
            "clean" => Ok(ActionType::Clean),
            "treat" => Ok(ActionType::Treat),
            "other" => Ok(ActionType::Other),
            _ => Err(format!("invalid action type '{}'", s)),
        }
    }
}

/// One priced unit of work or material within an estimate.
///
/// `line_total` is always `quantity * unit_price`; every mutator below
/// recomputes it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    pub id: Uuid,
    pub estimate_id: Uuid,
    #[serde(default)]
    pub area_id: Option<Uuid>,
    /// Catalog reference, when the item was added from the catalog.
    #[serde(default)]
    pub item_id: Option<String>,
    pub description: String,
    #[serde(default)]
    pub action_type: ActionType,
    pub quantity: Decimal,
    #[serde(default)]
    pub unit_code: String,
    pub unit_price: Decimal,
    #[serde(default)]
    pub material_cost: Decimal,
    #[serde(default)]
    pub labor_cost: Decimal,
    #[serde(default)]
    pub equipment_cost: Decimal,
    pub line_total: Decimal,
    #[serde(default)]
    pub sort_order: u32,
    #[serde(default)]
    pub notes: String,
}

impl LineItem {
    /// Create a manually entered line item.
    pub fn new(
        estimate_id: Uuid,
        description: impl Into<String>,
        quantity: Decimal,
        unit_price: Decimal,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            estimate_id,
            area_id: None,
            item_id: None,
            description: description.into(),
            action_type: ActionType::default(),
            quantity,
            unit_code: String::new(),
            unit_price,
            material_cost: Decimal::ZERO,
            labor_cost: Decimal::ZERO,
            equipment_cost: Decimal::ZERO,
            line_total: quantity * unit_price,
            sort_order: 0,
            notes: String::new(),
        }
    }

    /// Create a line item from a catalog material. Unit price is the sum of
    /// the material, labor and equipment components.
    pub fn from_material(
        estimate_id: Uuid,
        material: &MaterialCatalogItem,
        labor_cost: Decimal,
        equipment_cost: Decimal,
    ) -> Self {
        let mut item = Self::new(estimate_id, material.name.clone(), Decimal::ONE, Decimal::ZERO);
        item.item_id = Some(material.id.clone());
        item.material_cost = material.cost_per_unit;
        item.labor_cost = labor_cost;
        item.equipment_cost = equipment_cost;
        item.unit_price = item.component_price();
        item.recompute_total();
        item
    }

    /// Assign to an area.
    pub fn in_area(mut self, area_id: Uuid) -> Self {
        self.area_id = Some(area_id);
        self
    }

    /// Set the material, labor and equipment components. Unit price is left as is.
    pub fn with_costs(mut self, material: Decimal, labor: Decimal, equipment: Decimal) -> Self {
        self.material_cost = material;
        self.labor_cost = labor;
        self.equipment_cost = equipment;
        self
    }

    /// Link to a catalog material by id.
    pub fn with_item_id(mut self, item_id: impl Into<String>) -> Self {
        self.item_id = Some(item_id.into());
        self
    }

    /// Material + labor + equipment.
    pub fn component_price(&self) -> Decimal {
        self.material_cost + self.labor_cost + self.equipment_cost
    }

    /// Set `line_total` from quantity and unit price.
    pub fn recompute_total(&mut self) {
        self.line_total = self.quantity * self.unit_price;
    }

    /// Change the quantity and recompute the total.
    pub fn set_quantity(&mut self, quantity: Decimal) {
        self.quantity = quantity;
        self.recompute_total();
    }

    /// Change the unit price and recompute the total.
    pub fn set_unit_price(&mut self, unit_price: Decimal) {
        self.unit_price = unit_price;
        self.recompute_total();
    }

    /// Swap the material component. Labor and equipment are kept; unit price
    /// becomes the new component sum.
    pub fn reprice_material(&mut self, name: impl Into<String>, material_cost: Decimal) {
        self.description = name.into();
        self.material_cost = material_cost;
        self.unit_price = self.component_price();
        self.recompute_total();
    }

    /// Whether the stored total agrees with quantity and unit price.
    pub fn total_is_consistent(&self) -> bool {
        self.line_total == self.quantity * self.unit_price
    }
}

/// Partial update of a line item. `None` fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LineItemPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action_type: Option<ActionType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quantity: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit_price: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub material_cost: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line_total: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl LineItemPatch {
    /// The fields a material swap touches, taken from the already-updated item.
    pub fn pricing(item: &LineItem) -> Self {
        Self {
            description: Some(item.description.clone()),
            material_cost: Some(item.material_cost),
            unit_price: Some(item.unit_price),
            line_total: Some(item.line_total),
            ..Default::default()
        }
    }

    /// True when no field would change.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Apply to an item in place. The line total is recomputed from the
    /// resulting quantity and unit price regardless of `line_total`.
    pub fn apply_to(&self, item: &mut LineItem) {
        if let Some(ref d) = self.description {
            item.description = d.clone();
        }
        if let Some(a) = self.action_type {
            item.action_type = a;
        }
        if let Some(q) = self.quantity {
            item.quantity = q;
        }
        if let Some(p) = self.unit_price {
            item.unit_price = p;
        }
        if let Some(m) = self.material_cost {
            item.material_cost = m;
        }
        if let Some(ref n) = self.notes {
            item.notes = n.clone();
        }
        item.recompute_total();
    }
}
