//! Server configuration module

use auvea_app::context::AppSettings;
use clap::Parser;

use crate::config::{
    db::DatabaseConfig,
    observability::{LoggingConfig, ObservabilityConfig},
    server::ServerRuntimeConfig,
    storefront::StorefrontConfig,
};

pub(crate) mod db;
pub(crate) mod observability;
pub(crate) mod server;
pub(crate) mod storefront;

/// Auvéa JSON API Server configuration
#[derive(Debug, Parser)]
#[command(name = "auvea-json", about = "Auvéa JSON API Server", long_about = None)]
pub struct ServerConfig {
    /// Server network settings.
    #[command(flatten)]
    pub server: ServerRuntimeConfig,

    /// Logging output settings.
    #[command(flatten)]
    pub logging: LoggingConfig,

    /// Observability (traces/metrics) settings.
    #[command(flatten)]
    pub observability: ObservabilityConfig,

    /// Application database settings.
    #[command(flatten)]
    pub database: DatabaseConfig,

    /// Cart and catalog settings.
    #[command(flatten)]
    pub storefront: StorefrontConfig,
}

impl ServerConfig {
    /// Load configuration from environment and CLI arguments
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be parsed
    pub fn load() -> Result<Self, clap::Error> {
        // Load .env file if present (ignore if missing)
        _ = dotenvy::dotenv();

        Self::try_parse()
    }

    /// Get the socket address for binding
    #[must_use]
    pub fn socket_addr(&self) -> String {
        self.server.socket_addr()
    }

    /// Service settings for the app context, including the pool size.
    #[must_use]
    pub fn app_settings(&self) -> AppSettings {
        AppSettings {
            max_connections: self.database.database_max_connections,
            ..self.storefront.app_settings()
        }
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    #[test]
    fn flags_override_defaults() -> TestResult {
        let config = ServerConfig::try_parse_from([
            "auvea-json",
            "--database-url",
            "postgres://auvea@localhost/auvea",
            "--host",
            "127.0.0.1",
            "--port",
            "9000",
            "--cart-max-item-quantity",
            "5",
            "--shutdown-grace-seconds",
            "3",
            "--database-max-connections",
            "4",
        ])?;

        assert_eq!(config.socket_addr(), "127.0.0.1:9000");
        assert_eq!(config.database.database_url, "postgres://auvea@localhost/auvea");
        assert_eq!(config.storefront.app_settings().max_item_quantity, 5);
        assert_eq!(config.server.shutdown_grace().as_secs(), 3);
        assert_eq!(config.app_settings().max_connections, 4);
        assert_eq!(config.app_settings().max_item_quantity, 5);

        Ok(())
    }
}
