//! Week-level summary from the daily arrays.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::decision::Tone;
use crate::types::DailySeries;
use crate::window::{value_at, SunWindow};

/// A day with at least this much rain (mm) is rainy
pub const RAINY_DAY_MM: f64 = 2.0;
/// A day whose max probability reaches this (%) is rainy
pub const RAINY_DAY_POP: f64 = 60.0;
/// Accumulation treated as full confidence when no probability is available
pub const FULL_CONFIDENCE_MM: f64 = 5.0;

/// One day of the outlook
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DaySummary {
    pub date: NaiveDate,
    /// mm, missing values count as 0
    pub precipitation_sum: f64,
    /// percent
    pub pop_max: Option<f64>,
    pub is_rainy: bool,
    pub temp_min: Option<f64>,
    pub temp_max: Option<f64>,
    /// 0..=1
    pub confidence: f64,
    pub sunrise: Option<String>,
    pub sunset: Option<String>,
}

impl DaySummary {
    pub fn sun_window(&self) -> Option<SunWindow> {
        SunWindow::resolve(self.sunrise.as_deref(), self.sunset.as_deref())
    }
}

/// Rain classification of a whole week
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WeekVerdict {
    Dry,
    IsolatedRain,
    RainyWeek,
}

impl WeekVerdict {
    pub fn from_rainy_days(rainy_days: usize) -> Self {
        match rainy_days {
            0 => Self::Dry,
            1..=2 => Self::IsolatedRain,
            _ => Self::RainyWeek,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Dry => "Não deve chover na semana",
            Self::IsolatedRain => "Chuva isolada nesta semana",
            Self::RainyWeek => "Semana chuvosa",
        }
    }

    /// Short name of the visual theme
    pub fn mood_label(&self) -> &'static str {
        match self {
            Self::Dry => "Semana seca",
            Self::IsolatedRain => "Chuva isolada",
            Self::RainyWeek => "Semana chuvosa",
        }
    }

    pub fn emoji(&self) -> &'static str {
        match self {
            Self::Dry => "🌤️",
            Self::IsolatedRain => "🌦️",
            Self::RainyWeek => "🌧️",
        }
    }

    pub fn tone(&self) -> Tone {
        match self {
            Self::Dry => Tone::Good,
            Self::IsolatedRain => Tone::Warn,
            Self::RainyWeek => Tone::Bad,
        }
    }
}

/// Visual intensity 0..=3: 0, 1-2, 3-4 and 5+ rainy days.
pub fn mood_level(rainy_days: usize) -> u8 {
    match rainy_days {
        0 => 0,
        1..=2 => 1,
        3..=4 => 2,
        _ => 3,
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeekSummary {
    pub days: Vec<DaySummary>,
    pub rainy_days: usize,
    pub verdict: WeekVerdict,
    pub mood_level: u8,
}

/// A day is rainy by accumulation or, when known, by probability.
pub fn is_rainy_day(precipitation_sum: f64, pop_max: Option<f64>) -> bool {
    precipitation_sum >= RAINY_DAY_MM || pop_max.is_some_and(|p| p >= RAINY_DAY_POP)
}

/// Probability as a fraction, or accumulation normalised to [`FULL_CONFIDENCE_MM`].
pub fn confidence(precipitation_sum: f64, pop_max: Option<f64>) -> f64 {
    match pop_max {
        Some(p) => p / 100.0,
        None => (precipitation_sum / FULL_CONFIDENCE_MM).min(1.0),
    }
}

pub fn summarize(daily: &DailySeries) -> WeekSummary {
    let days: Vec<DaySummary> = daily
        .time
        .iter()
        .enumerate()
        .map(|(i, &date)| {
            let precipitation_sum = value_at(&daily.precipitation_sum, i).unwrap_or(0.0);
            let pop_max = value_at(&daily.precipitation_probability_max, i);
            DaySummary {
                date,
                precipitation_sum,
                pop_max,
                is_rainy: is_rainy_day(precipitation_sum, pop_max),
                temp_min: value_at(&daily.temperature_min, i),
                temp_max: value_at(&daily.temperature_max, i),
                confidence: confidence(precipitation_sum, pop_max),
                sunrise: daily.sunrise.get(i).cloned().flatten(),
                sunset: daily.sunset.get(i).cloned().flatten(),
            }
        })
        .collect();

    let rainy_days = days.iter().filter(|d| d.is_rainy).count();
    let verdict = WeekVerdict::from_rainy_days(rainy_days);

    tracing::info!(rainy_days, verdict = verdict.label(), "Week summarized");

    WeekSummary {
        days,
        rainy_days,
        verdict,
        mood_level: mood_level(rainy_days),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn week(sums: [Option<f64>; 7], pops: [Option<f64>; 7]) -> DailySeries {
        let start = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();
        DailySeries {
            time: (0..7).map(|i| start + chrono::Days::new(i)).collect(),
            precipitation_sum: sums.to_vec(),
            precipitation_probability_max: pops.to_vec(),
            temperature_max: vec![Some(28.0); 7],
            temperature_min: vec![Some(17.0); 7],
            sunrise: vec![Some("2024-05-01T06:30".into()); 7],
            sunset: vec![Some("2024-05-01T17:40".into()); 7],
        }
    }

    #[test]
    fn test_dry_week() {
        let summary = summarize(&week([Some(0.0); 7], [None; 7]));
        assert_eq!(summary.rainy_days, 0);
        assert_eq!(summary.verdict, WeekVerdict::Dry);
        assert_eq!(summary.mood_level, 0);
        assert_eq!(summary.days.len(), 7);
        assert!(summary.days.iter().all(|d| d.confidence == 0.0));
    }

    #[test]
    fn test_isolated_rain_week() {
        let sums = [Some(3.0), Some(0.0), Some(0.0), Some(2.5), Some(0.0), Some(0.0), Some(0.0)];
        let summary = summarize(&week(sums, [None; 7]));
        assert_eq!(summary.rainy_days, 2);
        assert_eq!(summary.verdict, WeekVerdict::IsolatedRain);
        assert_eq!(summary.verdict.label(), "Chuva isolada nesta semana");
        assert_eq!(summary.mood_level, 1);
        assert_eq!(summary.days[0].confidence, 0.6);
    }

    #[test]
    fn test_probability_alone_makes_a_rainy_day() {
        let mut pops = [Some(10.0); 7];
        pops[2] = Some(60.0);
        pops[3] = Some(59.0);
        let summary = summarize(&week([Some(0.0); 7], pops));
        assert!(summary.days[2].is_rainy);
        assert!(!summary.days[3].is_rainy);
        assert_eq!(summary.days[2].confidence, 0.6);
    }

    #[test]
    fn test_missing_sum_counts_as_zero() {
        let summary = summarize(&week([None; 7], [None; 7]));
        assert!(summary.days.iter().all(|d| d.precipitation_sum == 0.0 && !d.is_rainy));
    }

    #[test]
    fn test_rainy_week_and_mood_levels() {
        assert_eq!(WeekVerdict::from_rainy_days(3), WeekVerdict::RainyWeek);
        assert_eq!(mood_level(2), 1);
        assert_eq!(mood_level(3), 2);
        assert_eq!(mood_level(4), 2);
        assert_eq!(mood_level(5), 3);
        assert_eq!(mood_level(7), 3);
    }

    #[test]
    fn test_confidence_is_capped() {
        assert_eq!(confidence(12.0, None), 1.0);
        assert_eq!(confidence(12.0, Some(30.0)), 0.3);
    }

    #[test]
    fn test_rainy_count_is_monotonic() {
        let mut previous = 0;
        for mm in [0.0, 1.0, 1.99, 2.0, 5.0, 10.0] {
            let mut sums = [Some(0.5); 7];
            sums[0] = Some(mm);
            sums[4] = Some(mm);
            let count = summarize(&week(sums, [None; 7])).rainy_days;
            assert!(count >= previous);
            previous = count;
        }

        let mut previous = 0;
        for pop in [0.0, 30.0, 59.9, 60.0, 90.0] {
            let pops = [Some(pop); 7];
            let count = summarize(&week([Some(0.0); 7], pops)).rainy_days;
            assert!(count >= previous);
            previous = count;
        }
    }

    #[test]
    fn test_day_sun_window() {
        let summary = summarize(&week([Some(0.0); 7], [None; 7]));
        assert!(summary.days[0].sun_window().is_some());
    }
}
