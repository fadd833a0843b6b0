use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use url::Url;

use crate::error::ConfigError;

/// Configuration validation errors
#[derive(Debug, Clone)]
pub struct ConfigValidationError {
    pub field: String,
    pub message: String,
}

impl std::fmt::Display for ConfigValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Result of config validation
#[derive(Debug, Clone, Default)]
pub struct ValidationResult {
    pub errors: Vec<ConfigValidationError>,
    pub warnings: Vec<ConfigValidationError>,
}

impl ValidationResult {
    /// Returns true if there are no errors (warnings are OK)
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn add_error(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.errors.push(ConfigValidationError {
            field: field.into(),
            message: message.into(),
        });
    }

    pub fn add_warning(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.warnings.push(ConfigValidationError {
            field: field.into(),
            message: message.into(),
        });
    }

    /// Get a one-line message summarizing all errors
    pub fn error_summary(&self) -> String {
        self.errors
            .iter()
            .map(|e| e.to_string())
            .collect::<Vec<_>>()
            .join("; ")
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Directory holding `config.toml` and `preferences.toml`. Resolved at load time.
    #[serde(skip)]
    pub config_dir: PathBuf,

    /// Remote API endpoints
    pub endpoints: EndpointsConfig,

    /// Forecast request settings
    pub weather: WeatherConfig,

    /// Status line and autocomplete behaviour
    pub ui: UiConfig,

    /// Default place and geolocation limits
    pub location: LocationConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EndpointsConfig {
    pub geocoding_url: String,
    pub forecast_url: String,
    pub air_quality_url: String,
    pub reverse_geocoding_url: String,
}

impl Default for EndpointsConfig {
    fn default() -> Self {
        Self {
            geocoding_url: "https://geocoding-api.open-meteo.com/v1/search".to_string(),
            forecast_url: "https://api.open-meteo.com/v1/forecast".to_string(),
            air_quality_url: "https://air-quality-api.open-meteo.com/v1/air-quality".to_string(),
            reverse_geocoding_url: "https://nominatim.openstreetmap.org/reverse".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WeatherConfig {
    /// Language for geocoding results
    pub language: String,

    /// Maximum number of geocoding matches
    pub result_limit: u32,

    /// Forecast horizon in days
    pub forecast_days: u32,

    /// Per-request timeout
    pub request_timeout_secs: u64,

    /// Sent with every request; Nominatim rejects anonymous clients
    pub user_agent: String,
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self {
            language: "pt".to_string(),
            result_limit: 5,
            forecast_days: 7,
            request_timeout_secs: 10,
            user_agent: format!("chuva/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UiConfig {
    /// Seconds before a non-loading status message disappears
    pub status_dismiss_secs: u64,

    /// Quiet period before an autocomplete query is sent
    pub autocomplete_debounce_ms: u64,

    /// Shorter queries never trigger autocomplete
    pub autocomplete_min_chars: usize,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            status_dismiss_secs: 4,
            autocomplete_debounce_ms: 200,
            autocomplete_min_chars: 2,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaceConfig {
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
}

/// A bare latitude/longitude pair
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PositionConfig {
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LocationConfig {
    /// Place shown on startup when nothing else is requested
    pub default_place: PlaceConfig,

    /// Position reported by the geolocation provider. Unset means no
    /// provider is available.
    pub fixed_position: Option<PositionConfig>,

    pub geolocation_timeout_secs: u64,

    /// Cached positions older than this are not reused
    pub geolocation_max_age_secs: u64,
}

impl Default for LocationConfig {
    fn default() -> Self {
        Self {
            default_place: PlaceConfig {
                name: "São Paulo, BR".to_string(),
                latitude: -23.55,
                longitude: -46.63,
            },
            fixed_position: None,
            geolocation_timeout_secs: 10,
            geolocation_max_age_secs: 60,
        }
    }
}

impl Config {
    /// Load configuration from the platform config directory.
    pub fn load() -> Result<Self> {
        let config_dir = Self::default_config_dir()?;
        Self::load_from(&config_dir)
    }

    /// Load `config.toml` from `config_dir` (optional), then apply `CHUVA__*`
    /// environment overrides. Missing keys take their defaults.
    pub fn load_from(config_dir: &Path) -> Result<Self> {
        let config_path = config_dir.join("config.toml");

        let settings = config::Config::builder()
            .add_source(config::File::from(config_path.as_path()).required(false))
            .add_source(
                config::Environment::with_prefix("CHUVA")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| ConfigError::ParseError(e.to_string()))
            .with_context(|| format!("Failed to read {}", config_path.display()))?;

        let mut config: Config = settings
            .try_deserialize()
            .map_err(|e| ConfigError::ParseError(e.to_string()))
            .context("Failed to parse config")?;

        config.config_dir = config_dir.to_path_buf();
        Ok(config)
    }

    /// Load configuration and validate it
    ///
    /// Warnings are logged; errors abort.
    pub fn load_validated() -> Result<(Self, ValidationResult)> {
        let config = Self::load()?;
        let validation = config.validate();

        if !validation.is_valid() {
            return Err(ConfigError::Invalid(validation.error_summary()).into());
        }

        for warning in &validation.warnings {
            tracing::warn!("Config warning: {}", warning);
        }

        Ok((config, validation))
    }

    pub fn validate(&self) -> ValidationResult {
        let mut result = ValidationResult::default();

        self.validate_url(&self.endpoints.geocoding_url, "endpoints.geocoding_url", &mut result);
        self.validate_url(&self.endpoints.forecast_url, "endpoints.forecast_url", &mut result);
        self.validate_url(
            &self.endpoints.air_quality_url,
            "endpoints.air_quality_url",
            &mut result,
        );
        self.validate_url(
            &self.endpoints.reverse_geocoding_url,
            "endpoints.reverse_geocoding_url",
            &mut result,
        );

        if self.weather.result_limit == 0 {
            result.add_error("weather.result_limit", "Result limit must be greater than 0");
        } else if self.weather.result_limit > 100 {
            result.add_warning("weather.result_limit", "Geocoding caps results at 100");
        }

        if self.weather.forecast_days == 0 || self.weather.forecast_days > 16 {
            result.add_error("weather.forecast_days", "Forecast days must be between 1 and 16");
        }

        if self.weather.request_timeout_secs == 0 {
            result.add_error("weather.request_timeout_secs", "Timeout must be greater than 0");
        }

        if self.weather.language.len() != 2 {
            result.add_warning(
                "weather.language",
                format!("Unusual language code: {}", self.weather.language),
            );
        }

        if self.ui.status_dismiss_secs == 0 {
            result.add_warning("ui.status_dismiss_secs", "Status messages will vanish immediately");
        }

        if self.ui.autocomplete_debounce_ms == 0 {
            result.add_warning(
                "ui.autocomplete_debounce_ms",
                "Autocomplete will query on every keystroke",
            );
        }

        let place = &self.location.default_place;
        if !(-90.0..=90.0).contains(&place.latitude) {
            result.add_error("location.default_place.latitude", "Latitude must be in [-90, 90]");
        }
        if !(-180.0..=180.0).contains(&place.longitude) {
            result.add_error(
                "location.default_place.longitude",
                "Longitude must be in [-180, 180]",
            );
        }

        if let Some(position) = &self.location.fixed_position {
            if !(-90.0..=90.0).contains(&position.latitude)
                || !(-180.0..=180.0).contains(&position.longitude)
            {
                result.add_error(
                    "location.fixed_position",
                    "Fixed position is outside valid coordinates",
                );
            }
        }

        if self.location.geolocation_timeout_secs == 0 {
            result.add_error(
                "location.geolocation_timeout_secs",
                "Geolocation timeout must be greater than 0",
            );
        }

        result
    }

    fn validate_url(&self, url_str: &str, field_name: &str, result: &mut ValidationResult) {
        match Url::parse(url_str) {
            Ok(url) => {
                if url.scheme() != "http" && url.scheme() != "https" {
                    result.add_error(
                        field_name,
                        format!("URL must use http or https scheme, got: {}", url.scheme()),
                    );
                }

                if url.host().is_none() {
                    result.add_error(field_name, "URL must have a host");
                }
            }
            Err(e) => {
                result.add_error(field_name, format!("Invalid URL: {}", e));
            }
        }
    }

    fn default_config_dir() -> Result<PathBuf> {
        Ok(dirs::config_dir()
            .context("Failed to get config directory")?
            .join("chuva"))
    }
}
