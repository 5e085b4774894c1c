//! Roll-up of line items into subtotal, overhead, profit, tax and grand total.
//!
//! Sums are exact `Decimal` arithmetic, so results do not depend on line
//! ordering. Nothing is rounded here; [`Totals::rounded`] rounds to cents for
//! presentation.

use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::model::{ChangeOrder, ChangeOrderStatus, LineItem, PricingRates};

/// Computed totals for a set of line items.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Totals {
    pub subtotal: Decimal,
    pub overhead: Decimal,
    pub profit: Decimal,
    pub tax: Decimal,
    pub grand: Decimal,
}

impl Totals {
    /// Build totals from a subtotal and the rate structure.
    pub fn from_subtotal(subtotal: Decimal, rates: &PricingRates) -> Self {
        let overhead = percent_of(subtotal, rates.overhead_percent);
        let profit = percent_of(subtotal, rates.profit_percent);
        let taxable = subtotal + overhead + profit;
        let tax = percent_of(taxable, rates.tax_percent);

        Self {
            subtotal,
            overhead,
            profit,
            tax,
            grand: taxable + tax,
        }
    }

    /// Subtotal plus overhead and profit; the base tax is charged on.
    pub fn taxable_base(&self) -> Decimal {
        self.subtotal + self.overhead + self.profit
    }

    /// Every field rounded to cents, midpoint away from zero.
    pub fn rounded(&self) -> Self {
        Self {
            subtotal: to_cents(self.subtotal),
            overhead: to_cents(self.overhead),
            profit: to_cents(self.profit),
            tax: to_cents(self.tax),
            grand: to_cents(self.grand),
        }
    }

    /// Insurance payout after the deductible, floored at zero.
    pub fn net_claim(&self, deductible: Decimal) -> Decimal {
        (self.grand - deductible).max(Decimal::ZERO)
    }

    /// Grand total revised by a change-order amount.
    pub fn with_change_orders(&self, change_total: Decimal) -> Decimal {
        self.grand + change_total
    }

    /// True when every field is zero.
    pub fn is_zero(&self) -> bool {
        *self == Self::default()
    }
}

/// Roll up line items with the given rates. Empty input yields all zeros.
pub fn rollup<'a, I>(items: I, rates: &PricingRates) -> Totals
where
    I: IntoIterator<Item = &'a LineItem>,
{
    let subtotal: Decimal = items.into_iter().map(|li| li.line_total).sum();
    Totals::from_subtotal(subtotal, rates)
}

/// Totals for one area (or the unassigned bucket when `area_id` is `None`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AreaTotals {
    pub area_id: Option<Uuid>,
    pub line_count: usize,
    pub totals: Totals,
}

/// Group items by area, in order of first appearance, and roll up each group.
pub fn rollup_by_area(items: &[LineItem], rates: &PricingRates) -> Vec<AreaTotals> {
    let mut groups: Vec<(Option<Uuid>, Vec<&LineItem>)> = Vec::new();

    for item in items {
        match groups.iter_mut().find(|(id, _)| *id == item.area_id) {
            Some((_, members)) => members.push(item),
            None => groups.push((item.area_id, vec![item])),
        }
    }

    groups
        .into_iter()
        .map(|(area_id, members)| AreaTotals {
            area_id,
            line_count: members.len(),
            totals: rollup(members, rates),
        })
        .collect()
}

/// Sum of approved change orders. Pending and rejected orders are ignored.
pub fn approved_change_orders(orders: &[ChangeOrder]) -> Decimal {
    orders
        .iter()
        .filter(|co| co.status == ChangeOrderStatus::Approved)
        .map(|co| co.total_change)
        .sum()
}

fn percent_of(amount: Decimal, percent: Decimal) -> Decimal {
    amount * percent / dec!(100)
}

/// Round to cents, midpoint away from zero. Used for every displayed amount.
pub fn to_cents(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}
