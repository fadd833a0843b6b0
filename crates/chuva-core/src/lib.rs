pub mod config;
pub mod error;
pub mod preferences;

pub use config::{
    Config, EndpointsConfig, LocationConfig, PlaceConfig, PositionConfig, UiConfig, ValidationResult,
    WeatherConfig,
};
pub use error::{AppError, ConfigError, LocationError, NetworkError, ReqwestErrorExt, WeatherError};
pub use preferences::{PreferenceStore, TemperatureUnit};

use anyhow::Result;

/// Initialize logging for the application. Logs go to stderr so rendered
/// output on stdout stays clean.
pub fn init() -> Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to initialize tracing: {}", e))?;

    tracing::info!("Chuva core initialized");
    Ok(())
}
