//! Estimate pricing.
//!
//! Everything here is a pure function of its inputs:
//! - roll-up of line items into subtotal, overhead, profit, tax and grand total
//! - catalog matching and tier equivalents
//! - tier substitution planning
//! - Good/Better/Best comparison
//!
//! Persistence of the results lives in [`crate::editor`].

mod comparison;
mod matcher;
mod overrides;
mod rollup;
mod substitution;

pub use comparison::{build_tier_estimate, compare, ComparedItem, GbbComparison, TierEstimate};
pub use matcher::{CatalogMatcher, WarrantyRange};
pub use overrides::TierOverrides;
pub use rollup::{approved_change_orders, rollup, rollup_by_area, to_cents, AreaTotals, Totals};
pub use substitution::{plan_tier_switch, substitute, SkipReason, Substitution, SubstitutionPlan};
