//! Visual theme selection.

use chrono::{NaiveDateTime, Timelike};
use chuva_weather::{forward_metrics, HourlySeries, WeekSummary};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Theme {
    ClearDay,
    Night,
    Cloudy,
    Rain,
    HeavyRain,
    WeekIsolated,
    WeekWet,
}

impl Theme {
    pub fn class(&self) -> &'static str {
        match self {
            Self::ClearDay => "theme-clear-day",
            Self::Night => "theme-night",
            Self::Cloudy => "theme-cloudy",
            Self::Rain => "theme-rain",
            Self::HeavyRain => "theme-rain-heavy",
            Self::WeekIsolated => "theme-week-isolated",
            Self::WeekWet => "theme-week-wet",
        }
    }
}

/// Resolved theme plus the weekly background intensity
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThemeView {
    pub theme: Theme,
    /// `week-bg-0` ..= `week-bg-3`
    pub background_class: String,
    /// `Tema: <mood>` label
    pub label: String,
}

fn is_night(hour: u32) -> bool {
    !(6..19).contains(&hour)
}

/// Theme from the next hours alone. Later rules override earlier ones.
pub fn short_term(reference: NaiveDateTime, hourly: &HourlySeries) -> Theme {
    let night = is_night(reference.hour());
    let m = forward_metrics(hourly, reference);

    let mut theme = if night { Theme::Night } else { Theme::ClearDay };
    if !night && (20.0..40.0).contains(&m.max_prob24) && m.sum6 == 0.0 {
        theme = Theme::Cloudy;
    }
    if m.max_prob24 >= 40.0 || m.sum6 > 0.2 {
        theme = Theme::Rain;
    }
    if m.sum6 >= 5.0 || m.max_prob24 >= 80.0 {
        theme = Theme::HeavyRain;
    }
    theme
}

/// A week with any rain sets the theme; a dry week lets the short-term
/// signal decide.
pub fn resolve(week: Option<&WeekSummary>, reference: NaiveDateTime, hourly: &HourlySeries) -> ThemeView {
    let (rainy_days, level, label) = match week {
        Some(w) => (w.rainy_days, w.mood_level, w.verdict.mood_label()),
        None => (0, 0, "—"),
    };

    let theme = match rainy_days {
        0 => short_term(reference, hourly),
        1..=2 => Theme::WeekIsolated,
        _ => Theme::WeekWet,
    };

    ThemeView {
        theme,
        background_class: format!("week-bg-{}", level),
        label: format!("Tema: {}", label),
    }
}
