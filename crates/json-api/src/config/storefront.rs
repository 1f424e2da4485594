//! Storefront Config

use std::time::Duration;

use clap::Args;

use auvea_app::context::AppSettings;

/// Storefront behaviour settings.
#[derive(Debug, Args)]
pub struct StorefrontConfig {
    /// Base URL prefixed to relative product media paths
    #[arg(long, env = "ASSET_BASE_URL", default_value = "http://localhost:8698/storage")]
    pub asset_base_url: String,

    /// Largest quantity a single cart line may hold
    #[arg(long, env = "CART_MAX_ITEM_QUANTITY", default_value_t = 100_u32)]
    pub cart_max_item_quantity: u32,

    /// Catalog read cache lifetime in seconds
    #[arg(long, env = "CATALOG_CACHE_TTL_SECONDS", default_value_t = 3_600_u64)]
    pub catalog_cache_ttl_seconds: u64,
}

impl StorefrontConfig {
    /// Settings handed to the application services.
    #[must_use]
    pub fn app_settings(&self) -> AppSettings {
        AppSettings {
            asset_base_url: self.asset_base_url.clone(),
            max_item_quantity: self.cart_max_item_quantity,
            catalog_ttl: Duration::from_secs(self.catalog_cache_ttl_seconds),
            ..AppSettings::default()
        }
    }
}
