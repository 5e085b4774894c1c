//! Estimate data model.
//!
//! Money and quantities are `Decimal` throughout. Line items carry their own
//! total, kept equal to `quantity * unit_price` by every mutator.

mod catalog;
mod estimate;
mod line_item;
mod tier;

pub use catalog::MaterialCatalogItem;
pub use estimate::{
    Area, ChangeOrder, ChangeOrderStatus, Estimate, EstimateType, PricingRates,
};
pub use line_item::{ActionType, LineItem, LineItemPatch};
pub use tier::{GbbTier, MaterialTier};
