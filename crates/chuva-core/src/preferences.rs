//! Persisted display-unit preference.
//!
//! A single key (`temp_unit`) lives in `preferences.toml` under the config
//! directory. Reading never fails: anything unexpected falls back to Celsius.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Temperature unit used for display. Forecast data always arrives in Celsius.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum TemperatureUnit {
    #[default]
    #[serde(rename = "C")]
    Celsius,
    #[serde(rename = "F")]
    Fahrenheit,
    #[serde(rename = "K")]
    Kelvin,
}

impl TemperatureUnit {
    pub const ALL: [TemperatureUnit; 3] = [Self::Celsius, Self::Fahrenheit, Self::Kelvin];

    /// Parse the one-letter code (`C`, `F`, `K`), case-insensitive.
    pub fn from_code(code: &str) -> Option<Self> {
        match code.trim() {
            "C" | "c" => Some(Self::Celsius),
            "F" | "f" => Some(Self::Fahrenheit),
            "K" | "k" => Some(Self::Kelvin),
            _ => None,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            Self::Celsius => "C",
            Self::Fahrenheit => "F",
            Self::Kelvin => "K",
        }
    }

    /// Suffix shown next to values
    pub fn label(&self) -> &'static str {
        match self {
            Self::Celsius => "°C",
            Self::Fahrenheit => "°F",
            Self::Kelvin => "K",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Celsius => "Celsius",
            Self::Fahrenheit => "Fahrenheit",
            Self::Kelvin => "Kelvin",
        }
    }

    /// Convert a Celsius reading into this unit. Non-finite input yields `None`.
    pub fn convert(&self, celsius: f64) -> Option<f64> {
        if !celsius.is_finite() {
            return None;
        }
        Some(match self {
            Self::Celsius => celsius,
            Self::Fahrenheit => celsius * 9.0 / 5.0 + 32.0,
            Self::Kelvin => celsius + 273.15,
        })
    }
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct PreferenceFile {
    temp_unit: Option<String>,
}

/// File-backed store for the temperature unit preference.
#[derive(Debug, Clone)]
pub struct PreferenceStore {
    path: PathBuf,
}

impl PreferenceStore {
    pub fn new(config_dir: &Path) -> Self {
        Self {
            path: config_dir.join("preferences.toml"),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the stored unit. Missing or corrupt data yields Celsius.
    pub fn load(&self) -> TemperatureUnit {
        if !self.path.exists() {
            return TemperatureUnit::default();
        }

        let contents = match std::fs::read_to_string(&self.path) {
            Ok(c) => c,
            Err(e) => {
                tracing::warn!("Failed to read preferences {}: {}", self.path.display(), e);
                return TemperatureUnit::default();
            }
        };

        let file: PreferenceFile = match toml::from_str(&contents) {
            Ok(f) => f,
            Err(e) => {
                tracing::warn!("Ignoring malformed preferences file: {}", e);
                return TemperatureUnit::default();
            }
        };

        match file.temp_unit.as_deref().map(TemperatureUnit::from_code) {
            Some(Some(unit)) => unit,
            Some(None) => {
                tracing::warn!("Unknown temperature unit in preferences, using Celsius");
                TemperatureUnit::default()
            }
            None => TemperatureUnit::default(),
        }
    }

    /// Persist the unit, creating the config directory if needed.
    pub fn save(&self, unit: TemperatureUnit) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).context("Failed to create config directory")?;
        }

        let file = PreferenceFile {
            temp_unit: Some(unit.code().to_string()),
        };
        let contents = toml::to_string(&file).context("Failed to serialize preferences")?;
        std::fs::write(&self.path, contents).context("Failed to write preferences file")?;

        tracing::debug!("Saved temperature unit {}", unit.code());
        Ok(())
    }
}
