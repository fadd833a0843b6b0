//! Time-window aggregation over hourly series.
//!
//! Two views share the same [`Metrics`]: a forward window starting at a
//! reference instant ("the next hours"), and a day-bounded slice ("all of day D").
//! The reference instant is always passed in; nothing here reads the clock.

use std::ops::Range;

use chrono::{NaiveDate, NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};

use crate::types::{parse_local_datetime, HourlySeries};

/// Hours summed for `sum6` and scanned for `max_precip6`
pub const SHORT_WINDOW_HOURS: usize = 6;
/// Hours scanned for probability maxima
pub const LONG_WINDOW_HOURS: usize = 24;
/// Local hours considered "daytime"
pub const DAYTIME_HOURS: Range<u32> = 7..19;

/// Aggregated inputs to the rain decision
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Metrics {
    /// mm accumulated in the short window
    pub sum6: f64,
    /// Max precipitation probability (%) in the long window
    pub max_prob24: f64,
    /// Max single-hour precipitation (mm) in the short window
    pub max_precip6: f64,
    /// Max precipitation probability (%) over daytime hours in the long window
    pub max_prob_daytime: f64,
}

/// Inclusive min/max of the finite values in a slice
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ValueRange {
    pub min: f64,
    pub max: f64,
}

impl ValueRange {
    fn extend(range: Option<Self>, value: f64) -> Option<Self> {
        Some(match range {
            None => Self {
                min: value,
                max: value,
            },
            Some(r) => Self {
                min: r.min.min(value),
                max: r.max.max(value),
            },
        })
    }
}

/// Sunrise/sunset of one day, both resolved to local instants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SunWindow {
    pub sunrise: NaiveDateTime,
    pub sunset: NaiveDateTime,
}

impl SunWindow {
    /// Resolve raw sunrise/sunset strings. Both must parse and be ordered.
    pub fn resolve(sunrise: Option<&str>, sunset: Option<&str>) -> Option<Self> {
        let sunrise = parse_local_datetime(sunrise?)?;
        let sunset = parse_local_datetime(sunset?)?;
        (sunrise <= sunset).then_some(Self { sunrise, sunset })
    }

    pub fn contains(&self, t: NaiveDateTime) -> bool {
        self.sunrise <= t && t <= self.sunset
    }
}

/// Metrics and observation ranges for one calendar day
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DayDetail {
    pub date: NaiveDate,
    /// Indices of the day's hours within the series
    pub range: Range<usize>,
    pub metrics: Metrics,
    pub temperature: Option<ValueRange>,
    pub wind_speed: Option<ValueRange>,
    pub humidity: Option<ValueRange>,
    /// Only hours between sunrise and sunset; unset without a sun window
    pub uv_index: Option<ValueRange>,
}

/// Finite value at `i`, or `None` for gaps, nulls and short arrays.
pub fn value_at(values: &[Option<f64>], i: usize) -> Option<f64> {
    values.get(i).copied().flatten().filter(|v| v.is_finite())
}

fn value_or_zero(values: &[Option<f64>], i: usize) -> f64 {
    value_at(values, i).unwrap_or(0.0)
}

fn clamp(start: usize, len: usize, total: usize) -> Range<usize> {
    let start = start.min(total);
    start..start.saturating_add(len).min(total)
}

fn sum_over(values: &[Option<f64>], range: Range<usize>) -> f64 {
    range.map(|i| value_or_zero(values, i)).sum()
}

fn max_over(values: &[Option<f64>], range: Range<usize>) -> f64 {
    range.map(|i| value_or_zero(values, i)).fold(0.0, f64::max)
}

fn range_over(values: &[Option<f64>], range: Range<usize>) -> Option<ValueRange> {
    range
        .filter_map(|i| value_at(values, i))
        .fold(None, ValueRange::extend)
}

fn max_daytime(series: &HourlySeries, range: Range<usize>) -> f64 {
    range
        .filter(|&i| DAYTIME_HOURS.contains(&series.time[i].hour()))
        .map(|i| value_or_zero(&series.precipitation_probability, i))
        .fold(0.0, f64::max)
}

/// First index whose timestamp is at or after `reference`.
pub fn first_index_at_or_after(series: &HourlySeries, reference: NaiveDateTime) -> Option<usize> {
    series.time.iter().position(|t| *t >= reference)
}

/// Index treated as "the current hour". Falls back to 0 when every
/// timestamp is before `reference`, and for an empty series.
pub fn reference_index(series: &HourlySeries, reference: NaiveDateTime) -> usize {
    first_index_at_or_after(series, reference).unwrap_or(0)
}

/// Metrics for the windows starting at `start`, clamped to the series.
pub fn metrics_from_index(series: &HourlySeries, start: usize) -> Metrics {
    let total = series.len();
    let short = clamp(start, SHORT_WINDOW_HOURS, total);
    let long = clamp(start, LONG_WINDOW_HOURS, total);

    Metrics {
        sum6: sum_over(&series.precipitation, short.clone()),
        max_prob24: max_over(&series.precipitation_probability, long.clone()),
        max_precip6: max_over(&series.precipitation, short),
        max_prob_daytime: max_daytime(series, long),
    }
}

/// Forward-looking metrics from the reference instant.
pub fn forward_metrics(series: &HourlySeries, reference: NaiveDateTime) -> Metrics {
    let start = reference_index(series, reference);
    let metrics = metrics_from_index(series, start);
    tracing::debug!(start, ?metrics, "Forward window aggregated");
    metrics
}

/// Contiguous indices whose timestamps fall on `date`.
pub fn day_range(series: &HourlySeries, date: NaiveDate) -> Option<Range<usize>> {
    let start = series.time.iter().position(|t| t.date() == date)?;
    let len = series.time[start..]
        .iter()
        .take_while(|t| t.date() == date)
        .count();
    Some(start..start + len)
}

/// Largest accumulation over any `window` consecutive hours. A slice no longer
/// than the window yields its total.
pub fn max_window_sum(values: &[f64], window: usize) -> f64 {
    if values.len() <= window || window == 0 {
        return values.iter().sum();
    }
    values
        .windows(window)
        .map(|w| w.iter().sum::<f64>())
        .fold(0.0, f64::max)
}

/// Aggregate one calendar day. `None` means the series has no hours on that
/// date, which is different from a day with all-zero metrics.
pub fn day_detail(
    series: &HourlySeries,
    date: NaiveDate,
    sun: Option<SunWindow>,
) -> Option<DayDetail> {
    let range = day_range(series, date)?;

    let precip: Vec<f64> = range
        .clone()
        .map(|i| value_or_zero(&series.precipitation, i))
        .collect();

    let metrics = Metrics {
        sum6: max_window_sum(&precip, SHORT_WINDOW_HOURS),
        max_prob24: max_over(&series.precipitation_probability, range.clone()),
        max_precip6: precip.iter().copied().fold(0.0, f64::max),
        max_prob_daytime: max_daytime(series, range.clone()),
    };

    let uv_index = sun.and_then(|sun| {
        range
            .clone()
            .filter(|&i| sun.contains(series.time[i]))
            .filter_map(|i| value_at(&series.uv_index, i))
            .fold(None, ValueRange::extend)
    });

    Some(DayDetail {
        date,
        metrics,
        temperature: range_over(&series.temperature, range.clone()),
        wind_speed: range_over(&series.wind_speed, range.clone()),
        humidity: range_over(&series.relative_humidity, range.clone()),
        uv_index,
        range,
    })
}

/// Indices shown in the hourly chart: up to 24 hours from the first hour at or
/// after `reference`. Unlike the metrics window there is no fallback to the
/// start of the series.
pub fn chart_range(series: &HourlySeries, reference: NaiveDateTime) -> Option<Range<usize>> {
    let start = first_index_at_or_after(series, reference)?;
    Some(clamp(start, LONG_WINDOW_HOURS, series.len()))
}
