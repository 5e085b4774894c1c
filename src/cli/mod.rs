//! Command-line interface.
//!
//! Every command works on a JSON estimate fixture loaded into an
//! [`InMemoryStore`](crate::db::InMemoryStore).

mod fixture;

pub use fixture::EstimateFixture;

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use uuid::Uuid;

use crate::config::PricingConfig;
use crate::editor::{BatchReport, EstimateEditor};
use crate::model::{GbbTier, MaterialTier};
use crate::pricing::to_cents;

#[derive(Parser, Debug)]
#[command(name = "tierbid")]
#[command(about = "Price estimates and switch material tiers")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Show subtotal, overhead, profit, tax and grand total
    Totals {
        /// Estimate fixture (JSON)
        fixture: PathBuf,

        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Show the Good/Better/Best comparison
    Compare {
        /// Estimate fixture (JSON)
        fixture: PathBuf,

        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Re-price line items at another tier
    Switch {
        /// Estimate fixture (JSON)
        fixture: PathBuf,

        /// Target tier (economy, standard, premium, elite, luxury)
        #[arg(short, long)]
        tier: MaterialTier,

        /// Only switch the line items of this area
        #[arg(short, long)]
        area: Option<Uuid>,

        /// Write the updated fixture here
        #[arg(short, long)]
        out: Option<PathBuf>,
    },
}

/// Run a CLI command.
pub async fn run(cmd: Command, config: PricingConfig) -> anyhow::Result<()> {
    match cmd {
        Command::Totals { fixture, json } => show_totals(fixture, json, config).await,
        Command::Compare { fixture, json } => show_comparison(fixture, json, config).await,
        Command::Switch {
            fixture,
            tier,
            area,
            out,
        } => switch_tier(fixture, tier, area, out, config).await,
    }
}

async fn open_fixture(
    path: PathBuf,
    config: PricingConfig,
) -> anyhow::Result<(EstimateEditor, Arc<crate::db::InMemoryStore>, EstimateFixture)> {
    let fixture = EstimateFixture::load(&path).await?;
    let estimate_id = fixture.estimate.id;
    let store = Arc::new(fixture.clone().into_store().await);
    let editor = EstimateEditor::open(store.clone(), store.as_ref(), estimate_id, config).await?;
    Ok((editor, store, fixture))
}

async fn show_totals(path: PathBuf, json: bool, config: PricingConfig) -> anyhow::Result<()> {
    let (editor, _, _) = open_fixture(path, config).await?;
    let summary = editor.summary().await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
        return Ok(());
    }

    let t = summary.totals.rounded();
    println!("{} ({} line items)", editor.estimate().title, summary.line_count);
    println!();
    println!("  Subtotal   {:>12}", t.subtotal);
    println!("  Overhead   {:>12}", t.overhead);
    println!("  Profit     {:>12}", t.profit);
    println!("  Tax        {:>12}", t.tax);
    println!("  Grand      {:>12}", t.grand);

    if let Some(net) = summary.net_claim {
        println!("  Net claim  {:>12}", to_cents(net));
    }
    if !summary.change_orders.is_zero() {
        println!("  Changes    {:>12}", to_cents(summary.change_orders));
        println!("  Revised    {:>12}", to_cents(summary.revised_grand));
    }
    if let Some(range) = summary.warranty_range {
        println!("  Warranty   {:>12}", range.to_string());
    }

    Ok(())
}

async fn show_comparison(path: PathBuf, json: bool, config: PricingConfig) -> anyhow::Result<()> {
    let (editor, _, _) = open_fixture(path, config).await?;
    let comparison = editor.compare();

    if json {
        println!("{}", serde_json::to_string_pretty(&comparison)?);
        return Ok(());
    }

    if comparison.is_empty() {
        println!("No line items to compare.");
        return Ok(());
    }

    for bucket in GbbTier::ALL {
        let tier = comparison.get(bucket);
        let warranty = tier
            .warranty_range
            .map(|w| w.to_string())
            .unwrap_or_else(|| "-".to_string());
        println!(
            "{:<7} {:<9} {:>12}  warranty {}",
            bucket.label(),
            tier.tier.as_str(),
            tier.totals.rounded().grand,
            warranty
        );
        for item in &tier.items {
            println!(
                "    {:<40} {:>8} x {:>10} = {:>12}",
                item.material_name,
                item.quantity,
                to_cents(item.unit_price),
                to_cents(item.line_total)
            );
        }
    }

    let (to_better, to_best) = comparison.upgrade_deltas();
    println!();
    println!("Upgrade to Better: +{}", to_cents(to_better));
    println!("Upgrade to Best:   +{}", to_cents(to_best));

    Ok(())
}

async fn switch_tier(
    path: PathBuf,
    tier: MaterialTier,
    area: Option<Uuid>,
    out: Option<PathBuf>,
    config: PricingConfig,
) -> anyhow::Result<()> {
    let (mut editor, store, fixture) = open_fixture(path, config).await?;

    let report = match area {
        Some(area_id) => editor.override_area_tier(area_id, tier).await?,
        None => editor.switch_tier(tier).await?,
    };
    print_report(&report);

    if let Some(out) = out {
        let updated =
            EstimateFixture::from_store(&store, fixture.estimate.id, fixture.catalog).await?;
        updated.save(&out).await?;
        println!("Wrote {}", out.display());
    }

    Ok(())
}

fn print_report(report: &BatchReport) {
    println!("Updated: {}", report.updated.len());
    for (id, reason) in &report.skipped {
        println!("Skipped {}: {}", id, reason);
    }
    for (id, err) in &report.failed {
        println!("Failed  {}: {}", id, err);
    }
    if let Some(ref err) = report.totals_error {
        println!("Totals not saved: {}", err);
    }
    println!("Grand total: {}", report.totals.rounded().grand);
}
