//! Application state and request sequencing.

use std::sync::atomic::{AtomicU64, Ordering};

use chrono::NaiveDate;
use chuva_core::TemperatureUnit;
use chuva_weather::{summarize, ForecastBundle, Place, WeekSummary};

/// Identifies one logical fetch. Later tokens compare greater.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RequestToken(u64);

impl RequestToken {
    pub fn value(&self) -> u64 {
        self.0
    }
}

/// Hands out request tokens and tells whether a completion is still wanted.
///
/// Only the most recently issued token is current; completions for older
/// tokens are stale and must not touch the state.
#[derive(Debug, Default)]
pub struct RequestSequencer {
    latest: AtomicU64,
}

impl RequestSequencer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next(&self) -> RequestToken {
        RequestToken(self.latest.fetch_add(1, Ordering::SeqCst) + 1)
    }

    pub fn is_current(&self, token: RequestToken) -> bool {
        self.latest.load(Ordering::SeqCst) == token.0
    }

    /// Make every token issued so far stale.
    pub fn invalidate(&self) {
        self.latest.fetch_add(1, Ordering::SeqCst);
    }
}

/// What the screen is showing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewMode {
    Now,
    Day(NaiveDate),
}

/// Everything the presentation needs between requests.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Place of the last successful fetch
    pub last_place: Option<Place>,
    pub bundle: Option<ForecastBundle>,
    pub week: Option<WeekSummary>,
    pub selected_date: Option<NaiveDate>,
    pub unit: TemperatureUnit,
}

impl AppState {
    pub fn new(unit: TemperatureUnit) -> Self {
        Self {
            last_place: None,
            bundle: None,
            week: None,
            selected_date: None,
            unit,
        }
    }

    /// Replace the payload with a completed fetch. The view returns to "now".
    pub fn apply_bundle(&mut self, bundle: ForecastBundle) {
        let week = summarize(&bundle.forecast.daily);
        self.last_place = Some(bundle.place.clone());
        self.week = Some(week);
        self.selected_date = None;
        self.bundle = Some(bundle);
    }

    pub fn mode(&self) -> ViewMode {
        match self.selected_date {
            Some(date) => ViewMode::Day(date),
            None => ViewMode::Now,
        }
    }

    pub fn has_data(&self) -> bool {
        self.bundle.is_some()
    }

    /// True when `query` names the last successful place exactly.
    pub fn is_last_place(&self, query: &str) -> bool {
        self.last_place
            .as_ref()
            .is_some_and(|p| p.display_name == query)
    }
}
