//! Tier substitution: rewriting line items onto equivalent materials of
//! another tier.
//!
//! Planning is pure. [`plan_tier_switch`] decides, per line item, either the
//! replacement item or the reason it is left alone; persisting the plan is the
//! editor's job. Only the material component moves: labor and equipment
//! costs are carried over unchanged.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::model::{LineItem, MaterialTier};
use crate::pricing::CatalogMatcher;

/// Why a line item was not rewritten. None of these are errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    /// The catalog has no material for this line.
    NoMatch,
    /// The material exists but has no equivalent at the target tier.
    NoTierEquivalent,
    /// The equivalent produces an identical line; nothing to write.
    Unchanged,
}

impl std::fmt::Display for SkipReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SkipReason::NoMatch => write!(f, "no catalog match"),
            SkipReason::NoTierEquivalent => write!(f, "no equivalent at target tier"),
            SkipReason::Unchanged => write!(f, "already priced at target material"),
        }
    }
}

/// A planned rewrite of one line item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Substitution {
    /// Catalog id of the material the line matched.
    pub from_material: String,
    /// Catalog id of the replacement.
    pub to_material: String,
    /// The line item as it will be after the rewrite.
    pub updated: LineItem,
}

/// Outcome of planning a tier switch over a batch of line items.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubstitutionPlan {
    pub target: MaterialTier,
    pub substitutions: Vec<Substitution>,
    pub skipped: Vec<(Uuid, SkipReason)>,
}

impl SubstitutionPlan {
    /// True when nothing would be written.
    pub fn is_noop(&self) -> bool {
        self.substitutions.is_empty()
    }

    /// Replace planned items in `items` by id. Items absent from the plan are
    /// left as they are.
    pub fn apply(&self, items: &mut [LineItem]) {
        for item in items.iter_mut() {
            if let Some(sub) = self.substitutions.iter().find(|s| s.updated.id == item.id) {
                *item = sub.updated.clone();
            }
        }
    }
}

/// Rewrite a single line item onto the first equivalent at `target`.
pub fn substitute(
    matcher: &CatalogMatcher<'_>,
    item: &LineItem,
    target: MaterialTier,
) -> Result<Substitution, SkipReason> {
    let current = matcher.match_item(item).ok_or(SkipReason::NoMatch)?;
    let replacement = matcher
        .first_equivalent(current, target)
        .ok_or(SkipReason::NoTierEquivalent)?;

    let mut updated = item.clone();
    updated.reprice_material(replacement.name.clone(), replacement.cost_per_unit);
    if updated == *item {
        return Err(SkipReason::Unchanged);
    }

    Ok(Substitution {
        from_material: current.id.clone(),
        to_material: replacement.id.clone(),
        updated,
    })
}

/// Plan a tier switch for every item. One unmatched item never stops the rest.
pub fn plan_tier_switch<'i, I>(
    matcher: &CatalogMatcher<'_>,
    items: I,
    target: MaterialTier,
) -> SubstitutionPlan
where
    I: IntoIterator<Item = &'i LineItem>,
{
    let mut plan = SubstitutionPlan {
        target,
        substitutions: Vec::new(),
        skipped: Vec::new(),
    };

    for item in items {
        match substitute(matcher, item, target) {
            Ok(sub) => plan.substitutions.push(sub),
            Err(reason) => {
                tracing::debug!(line_id = %item.id, %reason, "Skipping line in tier switch");
                plan.skipped.push((item.id, reason));
            }
        }
    }

    plan
}
