//! Bakery order service
//!
//! Usage: `bakery-orders [config.yaml]`. Without an argument the path is read
//! from `BAKERY_CONFIG`; without either the built-in defaults are used.

use anyhow::Result;
use bakery::config::AppConfig;
use bakery::core::auth::HeaderAuthProvider;
use bakery::server::ServerBuilder;
use bakery::storage::InMemoryDataStore;
use tracing_subscriber::EnvFilter;

const CONFIG_ENV: &str = "BAKERY_CONFIG";

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config_path = std::env::args()
        .nth(1)
        .or_else(|| std::env::var(CONFIG_ENV).ok());
    let config = AppConfig::load(config_path.as_deref())?;

    tracing::info!(
        config = config_path.as_deref().unwrap_or("<defaults>"),
        "Starting {} v{}",
        env!("CARGO_PKG_NAME"),
        env!("CARGO_PKG_VERSION")
    );
    for (operation, rule) in config.describe_access()? {
        tracing::info!(operation, rule = ?rule, "Access rule");
    }

    let auth_provider = HeaderAuthProvider::new(&config.auth.username_header)?;
    tracing::info!(header = %auth_provider.header(), "Reading caller identity from header");

    let store = InMemoryDataStore::new();
    store.seed(&config.seed).await?;

    ServerBuilder::new()
        .with_repositories(store.repositories())
        .with_auth_provider(auth_provider)
        .with_access_policy(config.access_policy()?)
        .serve(&config.server.bind)
        .await
}
