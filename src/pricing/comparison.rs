//! Good/Better/Best comparison of an estimate priced at three tiers.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::model::{Estimate, GbbTier, LineItem, MaterialTier, PricingRates};
use crate::pricing::{CatalogMatcher, Totals, WarrantyRange};

/// One line of a tier estimate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparedItem {
    pub line_id: Uuid,
    /// Description of the live line item.
    pub description: String,
    /// Name of the material priced in this tier, or the description when the
    /// line has no catalog match.
    pub material_name: String,
    pub material_id: Option<String>,
    pub quantity: Decimal,
    pub unit_price: Decimal,
    pub line_total: Decimal,
    pub photo_url: Option<String>,
    pub warranty_years: Option<u32>,
}

/// The estimate re-priced at one tier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TierEstimate {
    pub tier: MaterialTier,
    pub items: Vec<ComparedItem>,
    #[serde(flatten)]
    pub totals: Totals,
    pub warranty_range: Option<WarrantyRange>,
}

impl TierEstimate {
    /// Grand total of this tier.
    pub fn grand(&self) -> Decimal {
        self.totals.grand
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GbbComparison {
    pub good: TierEstimate,
    pub better: TierEstimate,
    pub best: TierEstimate,
}

impl GbbComparison {
    /// The estimate for one Good/Better/Best bucket.
    pub fn get(&self, bucket: GbbTier) -> &TierEstimate {
        match bucket {
            GbbTier::Good => &self.good,
            GbbTier::Better => &self.better,
            GbbTier::Best => &self.best,
        }
    }

    /// True when the estimate had no line items to compare.
    pub fn is_empty(&self) -> bool {
        self.good.items.is_empty()
    }

    /// Grand-total difference of Better and Best over Good.
    pub fn upgrade_deltas(&self) -> (Decimal, Decimal) {
        (
            self.better.grand() - self.good.grand(),
            self.best.grand() - self.good.grand(),
        )
    }
}

/// Price every line at standard, premium and elite using the estimate's rates.
pub fn compare(
    matcher: &CatalogMatcher<'_>,
    estimate: &Estimate,
    items: &[LineItem],
) -> GbbComparison {
    let build = |bucket: GbbTier| {
        build_tier_estimate(matcher, &estimate.rates, items, bucket.comparison_tier())
    };

    GbbComparison {
        good: build(GbbTier::Good),
        better: build(GbbTier::Better),
        best: build(GbbTier::Best),
    }
}

/// Price every line at `tier`.
///
/// - no catalog match: the line passes through with its own price;
/// - match with an equivalent at `tier`: first equivalent's cost plus the
///   line's labor and equipment;
/// - match without one: the matched material's own cost.
pub fn build_tier_estimate(
    matcher: &CatalogMatcher<'_>,
    rates: &PricingRates,
    items: &[LineItem],
    tier: MaterialTier,
) -> TierEstimate {
    let mut priced = Vec::with_capacity(items.len());
    let mut warranty: Option<WarrantyRange> = None;

    for li in items {
        let Some(current) = matcher.match_item(li) else {
            priced.push(ComparedItem {
                line_id: li.id,
                description: li.description.clone(),
                material_name: li.description.clone(),
                material_id: None,
                quantity: li.quantity,
                unit_price: li.unit_price,
                line_total: li.line_total,
                photo_url: None,
                warranty_years: None,
            });
            continue;
        };

        let material = matcher.first_equivalent(current, tier).unwrap_or(current);
        let unit_price = material.cost_per_unit + li.labor_cost + li.equipment_cost;

        if let Some(years) = material.warranty_years {
            warranty = Some(match warranty {
                None => WarrantyRange { min: years, max: years },
                Some(r) => r.include(years),
            });
        }

        priced.push(ComparedItem {
            line_id: li.id,
            description: li.description.clone(),
            material_name: material.name.clone(),
            material_id: Some(material.id.clone()),
            quantity: li.quantity,
            unit_price,
            line_total: li.quantity * unit_price,
            photo_url: material.photo_url.clone(),
            warranty_years: material.warranty_years,
        });
    }

    let subtotal: Decimal = priced.iter().map(|i| i.line_total).sum();

    TierEstimate {
        tier,
        items: priced,
        totals: Totals::from_subtotal(subtotal, rates),
        warranty_range: warranty,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::MaterialCatalogItem;
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

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
            rfg("s", "Asphalt Shingle - Standard", "shingle", MaterialTier::Standard, dec!(120))
                .with_warranty(15),
            rfg("p", "Asphalt Shingle - Premium", "shingle", MaterialTier::Premium, dec!(180))
                .with_warranty(25),
            rfg("e", "Slate - Elite", "shingle", MaterialTier::Elite, dec!(400))
                .with_warranty(50),
            rfg("gs", "Gutter - Standard", "gutter", MaterialTier::Standard, dec!(8))
                .with_warranty(10),
        ]
    }

    fn estimate() -> Estimate {
        Estimate::new("Roof", PricingRates::new(dec!(10), dec!(15), dec!(8)))
    }

    #[test]
    fn test_three_tiers_priced_from_catalog() {
        let cat = catalog();
        let m = CatalogMatcher::new(&cat);
        let est = estimate();
        let shingle = LineItem::new(est.id, "Asphalt Shingle - Standard", dec!(2), dec!(170))
            .with_costs(dec!(120), dec!(50), dec!(0));

        let cmp = compare(&m, &est, std::slice::from_ref(&shingle));

        assert_eq!(cmp.good.tier, MaterialTier::Standard);
        assert_eq!(cmp.better.tier, MaterialTier::Premium);
        assert_eq!(cmp.best.tier, MaterialTier::Elite);

        assert_eq!(cmp.good.items[0].unit_price, dec!(170));
        assert_eq!(cmp.better.items[0].unit_price, dec!(230));
        assert_eq!(cmp.best.items[0].unit_price, dec!(450));

        assert_eq!(cmp.good.totals.subtotal, dec!(340));
        assert_eq!(cmp.better.totals.subtotal, dec!(460));
        assert_eq!(cmp.better.totals, Totals::from_subtotal(dec!(460), &est.rates));

        assert_eq!(cmp.good.warranty_range.unwrap().to_string(), "15 yr");
        assert_eq!(cmp.best.warranty_range.unwrap().to_string(), "50 yr");
    }

    #[test]
    fn test_unmatched_item_identical_across_tiers() {
        let cat = catalog();
        let m = CatalogMatcher::new(&cat);
        let est = estimate();
        let labor = LineItem::new(est.id, "Tear-off labor", dec!(12), dec!(65));

        let cmp = compare(&m, &est, std::slice::from_ref(&labor));
        for bucket in GbbTier::ALL {
            let tier = cmp.get(bucket);
            assert_eq!(tier.items[0].description, "Tear-off labor");
            assert_eq!(tier.items[0].unit_price, dec!(65));
            assert_eq!(tier.items[0].line_total, dec!(780));
            assert_eq!(tier.warranty_range, None);
        }
        assert_eq!(cmp.upgrade_deltas(), (Decimal::ZERO, Decimal::ZERO));
    }

    #[test]
    fn test_missing_tier_falls_back_to_matched_material() {
        let cat = catalog();
        let m = CatalogMatcher::new(&cat);
        let est = estimate();
        let gutter = LineItem::new(est.id, "Gutter - Standard", dec!(100), dec!(12))
            .with_costs(dec!(8), dec!(4), dec!(0));

        let cmp = compare(&m, &est, std::slice::from_ref(&gutter));
        assert_eq!(cmp.best.items[0].material_name, "Gutter - Standard");
        assert_eq!(cmp.best.items[0].unit_price, dec!(12));
        assert_eq!(cmp.best.warranty_range.unwrap().to_string(), "10 yr");
    }

    #[test]
    fn test_warranty_range_spans_items() {
        let cat = catalog();
        let m = CatalogMatcher::new(&cat);
        let est = estimate();
        let items = vec![
            LineItem::new(est.id, "Asphalt Shingle - Standard", dec!(1), dec!(120)),
            LineItem::new(est.id, "Gutter - Standard", dec!(1), dec!(8)),
        ];
        let cmp = compare(&m, &est, &items);
        assert_eq!(cmp.good.warranty_range.unwrap().to_string(), "10-15 yr");
        assert_eq!(cmp.better.warranty_range.unwrap().to_string(), "10-25 yr");
    }

    #[test]
    fn test_empty_estimate() {
        let cat = catalog();
        let cmp = compare(&CatalogMatcher::new(&cat), &estimate(), &[]);
        assert!(cmp.is_empty());
        assert!(cmp.best.totals.is_zero());
        assert_eq!(cmp.best.warranty_range, None);
    }
}
