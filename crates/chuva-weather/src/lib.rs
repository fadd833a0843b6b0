//! Weather data and rain heuristics for Chuva
//!
//! HTTP clients for Open-Meteo (geocoding, forecast, air quality) and
//! Nominatim (reverse geocoding), the hourly window aggregation, the
//! point-based rain decision and the weekly outlook.

pub mod client;
pub mod decision;
pub mod geocode;
pub mod location;
pub mod types;
pub mod week;
pub mod window;

pub use client::{ClientOptions, Endpoints, WeatherClient};
pub use decision::{score, Decision, Tone, Verdict, RULES, VERDICT_THRESHOLDS};
pub use location::{ConfiguredLocation, FixedLocation, Geolocator, LocationProvider, NoLocation};
pub use types::*;
pub use week::{summarize, DaySummary, WeekSummary, WeekVerdict};
pub use window::{day_detail, forward_metrics, DayDetail, Metrics, SunWindow, ValueRange};
