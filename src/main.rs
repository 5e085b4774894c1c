use clap::Parser;
use tracing_subscriber::EnvFilter;

use tierbid::PricingConfig;
use tierbid::cli::{self, Cli};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("tierbid=info"));
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    // Logs go to stderr so command output stays pipeable.
    if std::env::var("TIERBID_LOG_JSON").is_ok_and(|v| v == "1" || v == "true") {
        subscriber.json().init();
    } else {
        subscriber.init();
    }

    let args = Cli::parse();
    let config = PricingConfig::from_env()?;
    tracing::debug!(?config, "Loaded pricing config");

    cli::run(args.command, config).await
}
