//! Material quality tiers and the Good/Better/Best presentation buckets.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Quality grade of a catalog material.
///
/// Variants are declared cheapest to most expensive, so the derived `Ord`
/// follows that ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MaterialTier {
    Economy,
    #[default]
    Standard,
    Premium,
    Elite,
    Luxury,
}

impl MaterialTier {
    /// All tiers, cheapest first.
    pub const ALL: [MaterialTier; 5] = [
        MaterialTier::Economy,
        MaterialTier::Standard,
        MaterialTier::Premium,
        MaterialTier::Elite,
        MaterialTier::Luxury,
    ];

    /// Lowercase identifier used in storage and on the command line.
    pub fn as_str(&self) -> &'static str {
        match self {
            MaterialTier::Economy => "economy",
            MaterialTier::Standard => "standard",
            MaterialTier::Premium => "premium",
            MaterialTier::Elite => "elite",
            MaterialTier::Luxury => "luxury",
        }
    }

    /// Display label.
    pub fn label(&self) -> &'static str {
        match self {
            MaterialTier::Economy => "Economy",
            MaterialTier::Standard => "Standard",
            MaterialTier::Premium => "Premium",
            MaterialTier::Elite => "Elite",
            MaterialTier::Luxury => "Luxury",
        }
    }

    /// The Good/Better/Best bucket this tier is presented under.
    pub fn gbb(&self) -> GbbTier {
        match self {
            MaterialTier::Economy | MaterialTier::Standard => GbbTier::Good,
            MaterialTier::Premium => GbbTier::Better,
            MaterialTier::Elite | MaterialTier::Luxury => GbbTier::Best,
        }
    }
}

impl fmt::Display for MaterialTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for MaterialTier {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "economy" | "eco" => Ok(MaterialTier::Economy),
            "standard" | "std" => Ok(MaterialTier::Standard),
            "premium" => Ok(MaterialTier::Premium),
            "elite" => Ok(MaterialTier::Elite),
            "luxury" | "lux" => Ok(MaterialTier::Luxury),
            _ => Err(format!(
                "invalid material tier '{}', expected one of {}",
                s,
                MaterialTier::ALL.map(|t| t.as_str()).join(", ")
            )),
        }
    }
}

/// Three-way price presentation.
///
/// ```text
/// ┌────────┬───────────────────┬──────────────────┐
/// │ Bucket │ Covers            │ Compared at      │
/// ├────────┼───────────────────┼──────────────────┤
/// │ Good   │ economy, standard │ standard         │
/// │ Better │ premium           │ premium          │
/// │ Best   │ elite, luxury     │ elite            │
/// └────────┴───────────────────┴──────────────────┘
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GbbTier {
    Good,
    Better,
    Best,
}

impl GbbTier {
    pub const ALL: [GbbTier; 3] = [GbbTier::Good, GbbTier::Better, GbbTier::Best];

    /// Tier whose materials are priced when building this column of a
    /// comparison. Fixed; not configurable.
    pub fn comparison_tier(&self) -> MaterialTier {
        match self {
            GbbTier::Good => MaterialTier::Standard,
            GbbTier::Better => MaterialTier::Premium,
            GbbTier::Best => MaterialTier::Elite,
        }
    }

    /// Tiers presented under this bucket.
    pub fn covers(&self) -> &'static [MaterialTier] {
        match self {
            GbbTier::Good => &[MaterialTier::Economy, MaterialTier::Standard],
            GbbTier::Better => &[MaterialTier::Premium],
            GbbTier::Best => &[MaterialTier::Elite, MaterialTier::Luxury],
        }
    }

    /// Display label, e.g. "Good".
    pub fn label(&self) -> &'static str {
        match self {
            GbbTier::Good => "Good",
            GbbTier::Better => "Better",
            GbbTier::Best => "Best",
        }
    }
}
