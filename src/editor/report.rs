//! Results of editor operations.

use rust_decimal::Decimal;
use serde::Serialize;
use uuid::Uuid;

use crate::error::StoreError;
use crate::model::{ActionType, MaterialTier};
use crate::pricing::{SkipReason, Totals, WarrantyRange};

/// Outcome of a batch rewrite (tier switch, area override or version restore).
///
/// A batch never aborts on a single line: lines the store rejected are listed
/// in `failed` and keep their previous values.
#[derive(Debug, Clone)]
pub struct BatchReport {
    /// Version recorded before the first write.
    pub snapshot_id: Uuid,
    pub updated: Vec<Uuid>,
    pub skipped: Vec<(Uuid, SkipReason)>,
    pub failed: Vec<(Uuid, StoreError)>,
    /// Totals recomputed after every write settled.
    pub totals: Totals,
    /// Set when persisting `totals` failed.
    pub totals_error: Option<StoreError>,
}

impl BatchReport {
    /// Every planned write and the totals update succeeded.
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty() && self.totals_error.is_none()
    }

    /// Ids of the lines the store rejected.
    pub fn failed_ids(&self) -> Vec<Uuid> {
        self.failed.iter().map(|(id, _)| *id).collect()
    }
}

/// A single-field edit of a line item.
#[derive(Debug, Clone, PartialEq)]
pub enum LineEdit {
    Quantity(Decimal),
    UnitPrice(Decimal),
    ActionType(ActionType),
    Description(String),
    Notes(String),
}

/// Everything the totals panel shows.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TotalsSummary {
    pub tier: MaterialTier,
    pub line_count: usize,
    pub totals: Totals,
    /// Insurance estimates with a deductible only.
    pub net_claim: Option<Decimal>,
    /// Sum of approved change orders.
    pub change_orders: Decimal,
    /// Grand total including approved change orders.
    pub revised_grand: Decimal,
    pub warranty_range: Option<WarrantyRange>,
}
