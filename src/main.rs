//! HD Store storefront service

use anyhow::Result;
use hd_storefront::api::{self, AppState};
use hd_storefront::storage::FileStorage;
use hd_storefront::{Catalog, StorefrontConfig};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::registry().with(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into())).with(tracing_subscriber::fmt::layer()).init();

    let config = StorefrontConfig::from_env()?;
    let catalog = match &config.catalog_path {
        Some(path) => Catalog::from_path(path)?,
        None => Catalog::builtin()?,
    };
    tracing::info!(products = catalog.len(), "Catalog loaded");

    let storage = FileStorage::new(config.storage_dir.clone());
    let port = config.port;
    let app = api::router(AppState::new(catalog, storage, config));

    tracing::info!("🚀 HD Store storefront listening on 0.0.0.0:{}", port);
    axum::serve(tokio::net::TcpListener::bind(format!("0.0.0.0:{}", port)).await?, app).await?;
    Ok(())
}
