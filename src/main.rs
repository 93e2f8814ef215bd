use clap::Parser;
use crypto_dashboard_sdk::{
    Dashboard, DashboardConfig, FailurePolicy, Route, SortField, TableOptions,
};
use std::time::Duration;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "crypto-dashboard", version, about = "Render crypto market dashboard pages")]
struct Cli {
    /// Page to render: dashboard, cryptocurrencies or market (paths like /market work too)
    #[arg(default_value = "/")]
    route: Route,

    /// Sort column for the cryptocurrencies table (rank|name|price|change|market_cap|volume)
    #[arg(long)]
    sort: Option<SortField>,

    /// Sort the table in descending order
    #[arg(long)]
    desc: bool,

    /// Filter the table by name or symbol
    #[arg(long)]
    search: Option<String>,

    /// What to do when a fetch fails (fallback|surface)
    #[arg(long)]
    policy: Option<FailurePolicy>,

    /// Share responses between views for this many seconds
    #[arg(long)]
    cache_ttl: Option<u64>,

    /// Render from the built-in datasets without network access
    #[arg(long)]
    offline: bool,

    /// Override the market data API base URL
    #[arg(long)]
    api_url: Option<String>,

    /// Quote currency
    #[arg(long)]
    currency: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let mut config = DashboardConfig::from_env()?;
    if let Some(policy) = cli.policy {
        config.failure_policy = policy;
    }
    if let Some(ttl) = cli.cache_ttl {
        config.cache_ttl = Some(Duration::from_secs(ttl)).filter(|ttl| !ttl.is_zero());
    }
    if cli.offline {
        config.offline = true;
    }
    if let Some(url) = cli.api_url {
        config.api_url = url;
    }
    if let Some(currency) = cli.currency {
        config.vs_currency = currency.to_lowercase();
    }

    let dashboard = Dashboard::new(config)?;
    let options = TableOptions {
        sort: cli.sort,
        descending: cli.desc,
        search: cli.search,
    };

    let page = dashboard.render(cli.route, &options).await;
    print!("{}", page);

    let metrics = dashboard.metrics().await;
    tracing::info!(
        source = %metrics.source_name,
        requests = metrics.total_requests,
        failed = metrics.failed_requests,
        fallbacks = metrics.fallbacks_served,
        p50_ms = metrics.latency_p50_ms,
        "Render complete"
    );

    Ok(())
}
