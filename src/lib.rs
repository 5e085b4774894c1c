//! Estimate pricing and Good/Better/Best material tier substitution.
//!
//! Line items roll up into subtotal, overhead, profit, tax and grand total.
//! Each line is matched to a catalog material so the whole estimate (or one
//! area of it) can be re-priced at another tier, or shown side by side as
//! Good, Better and Best.
//!
//! ```text
//! ┌────────────┐   ┌─────────────────────────────────┐   ┌──────────────┐
//! │  Catalog   │──▶│ pricing: match, substitute,     │──▶│ EstimateStore│
//! │  (trait)   │   │ roll up, compare                │   │   (trait)    │
//! └────────────┘   └─────────────────────────────────┘   └──────────────┘
//!                               ▲
//!                               │
//!                        ┌──────┴──────┐
//!                        │   editor    │ snapshots, batches, edits
//!                        └─────────────┘
//! ```

pub mod cli;
pub mod config;
pub mod db;
pub mod editor;
pub mod error;
pub mod history;
pub mod model;
pub mod pricing;

pub use config::PricingConfig;
pub use editor::EstimateEditor;
pub use error::{EditorError, Result, StoreError};
