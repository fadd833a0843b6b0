//! View models.
//!
//! Plain structs holding final display strings, built from the application
//! state. Renderers only lay them out.

use chrono::{NaiveDate, NaiveDateTime};
use chuva_core::TemperatureUnit;
use chuva_weather::decision::{max_score, ALGORITHM_NAME};
use chuva_weather::window::{chart_range, day_range, reference_index, value_at};
use chuva_weather::{
    day_detail, forward_metrics, score, DaySummary, Decision, ForecastBundle, HourlySeries,
    Verdict, WeekSummary, RULES, VERDICT_THRESHOLDS,
};

use crate::format::{self, AqiLevel};
use crate::state::{AppState, ViewMode};
use crate::theme::{self, ThemeView};

/// Probability at which a day card gets the high-chance marker
pub const HIGH_CHANCE_POP: f64 = 75.0;
pub const HIGH_CHANCE_TOOLTIP: &str = "Alta chance de chuva no dia (>= 75%)";
pub const NEXT_HOURS_TITLE: &str = "Previsão para as próximas 24h";
pub const NO_HOURLY_DATA: &str = "Sem dados horários para este dia.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummaryLabels {
    pub temperature: &'static str,
    pub rain6h: &'static str,
    pub pop24h: &'static str,
    pub wind: &'static str,
    pub humidity: &'static str,
    pub uv: &'static str,
    pub aqi: &'static str,
}

pub const NOW_LABELS: SummaryLabels = SummaryLabels {
    temperature: "Temp. agora:",
    rain6h: "Chuva nas próximas 6h:",
    pop24h: "Prob. de chuva (próx. 24h):",
    wind: "Vento:",
    humidity: "Umidade agora:",
    uv: "Índice UV agora:",
    aqi: "IQA (US):",
};

pub const DAY_LABELS: SummaryLabels = SummaryLabels {
    temperature: "Temp. do dia (min/max):",
    rain6h: "Pico de chuva (6h):",
    pop24h: "Prob. de chuva (dia):",
    wind: "Vento (máx. dia):",
    humidity: "Umidade (min/max dia):",
    uv: "Índice UV (min/max dia):",
    aqi: "IQA (US):",
};

/// The "will it rain?" card
#[derive(Debug, Clone, PartialEq)]
pub struct SummaryView {
    pub location: String,
    pub timezone: String,
    pub mode: ViewMode,
    pub labels: SummaryLabels,
    pub decision: Decision,
    pub temperature: String,
    pub rain6h: String,
    pub pop24h: String,
    pub wind: String,
    pub humidity: String,
    pub uv: String,
    pub aqi: String,
    pub aqi_class: Option<&'static str>,
    pub sunrise: String,
    pub sunset: String,
}

impl SummaryView {
    pub fn emoji(&self) -> &'static str {
        self.decision.emoji()
    }

    pub fn verdict(&self) -> &'static str {
        self.decision.label()
    }

    pub fn style_class(&self) -> &'static str {
        self.decision.style_class()
    }
}

fn base_summary(bundle: &ForecastBundle, mode: ViewMode, labels: SummaryLabels, decision: Decision) -> SummaryView {
    let aqi_value = bundle.air_quality.and_then(|a| a.us_aqi);
    SummaryView {
        location: bundle.place.display_name.clone(),
        timezone: bundle.timezone().to_string(),
        mode,
        labels,
        decision,
        temperature: format::MISSING.to_string(),
        rain6h: format::millimetres(decision.metrics.sum6),
        pop24h: format::percent(Some(decision.metrics.max_prob24)),
        wind: format::MISSING.to_string(),
        humidity: format::MISSING.to_string(),
        uv: format::MISSING.to_string(),
        aqi: format::air_quality(aqi_value),
        aqi_class: AqiLevel::classify(aqi_value).map(|l| l.tone().class()),
        sunrise: format::MISSING.to_string(),
        sunset: format::MISSING.to_string(),
    }
}

/// Summary for the hours ahead of the forecast's current time.
pub fn summary_now(bundle: &ForecastBundle, unit: TemperatureUnit) -> SummaryView {
    let reference = bundle.reference_time();
    let hourly = &bundle.forecast.hourly;
    let daily = &bundle.forecast.daily;
    let current = &bundle.forecast.current;

    let decision = score(&forward_metrics(hourly, reference));
    let now_index = (!hourly.is_empty()).then(|| reference_index(hourly, reference));

    let humidity = current
        .relative_humidity
        .or_else(|| now_index.and_then(|i| value_at(&hourly.relative_humidity, i)));
    let uv = now_index.and_then(|i| value_at(&hourly.uv_index, i));
    let today = daily.index_of(reference.date());

    let mut view = base_summary(bundle, ViewMode::Now, NOW_LABELS, decision);
    view.temperature = format::temperature(current.temperature, unit);
    view.wind = format::wind(current.wind_speed);
    view.humidity = format::percent(humidity);
    view.uv = format::uv(uv);
    view.sunrise = format::sun_time(today.and_then(|i| daily.sunrise.get(i)?.as_deref()));
    view.sunset = format::sun_time(today.and_then(|i| daily.sunset.get(i)?.as_deref()));
    view
}

/// Summary for a whole day. A day without hourly data reuses the "now"
/// figures under the day's mode and labels, with the day's sun times.
pub fn summary_day(
    bundle: &ForecastBundle,
    day: &DaySummary,
    unit: TemperatureUnit,
) -> SummaryView {
    let sunrise = format::sun_time(day.sunrise.as_deref());
    let sunset = format::sun_time(day.sunset.as_deref());

    let Some(detail) = day_detail(&bundle.forecast.hourly, day.date, day.sun_window()) else {
        let mut view = summary_now(bundle, unit);
        view.mode = ViewMode::Day(day.date);
        view.labels = DAY_LABELS;
        view.sunrise = sunrise;
        view.sunset = sunset;
        return view;
    };

    let decision = score(&detail.metrics);
    let mut view = base_summary(bundle, ViewMode::Day(day.date), DAY_LABELS, decision);
    view.temperature = format::temperature_range(
        detail.temperature.map(|r| r.min),
        detail.temperature.map(|r| r.max),
        unit,
    );
    view.wind = format::wind(detail.wind_speed.map(|r| r.max));
    view.humidity = format::value_range(detail.humidity, format::percent);
    view.uv = format::value_range(detail.uv_index, format::uv);
    view.sunrise = sunrise;
    view.sunset = sunset;
    view
}

#[derive(Debug, Clone, PartialEq)]
pub struct HourBar {
    pub hour: u32,
    /// Bar height in percent
    pub pop: f64,
    /// Empty when there is no chance of rain
    pub pop_label: String,
    pub hour_label: String,
    pub tooltip: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChartView {
    pub title: String,
    pub bars: Vec<HourBar>,
    /// Shown instead of bars
    pub placeholder: Option<&'static str>,
}

fn bars(hourly: &HourlySeries, range: std::ops::Range<usize>) -> Vec<HourBar> {
    use chrono::Timelike;

    range
        .map(|i| {
            let hour = hourly.time[i].hour();
            let pop = value_at(&hourly.precipitation_probability, i).unwrap_or(0.0);
            let pop_text = format::percent(Some(pop));
            HourBar {
                hour,
                pop,
                pop_label: if pop > 0.0 { pop_text.clone() } else { String::new() },
                hour_label: format!("{}h", hour),
                tooltip: format!("{} de chance de chuva às {}h", pop_text, hour),
            }
        })
        .collect()
}

/// Up to 24 bars from the reference hour. Empty when nothing is ahead.
pub fn chart_now(hourly: &HourlySeries, reference: NaiveDateTime) -> ChartView {
    ChartView {
        title: NEXT_HOURS_TITLE.to_string(),
        bars: chart_range(hourly, reference)
            .map(|r| bars(hourly, r))
            .unwrap_or_default(),
        placeholder: None,
    }
}

pub fn chart_day(hourly: &HourlySeries, date: NaiveDate) -> ChartView {
    let title = format!("Previsão horária — {}", day_label(date));
    match day_range(hourly, date) {
        Some(r) => ChartView {
            title,
            bars: bars(hourly, r),
            placeholder: None,
        },
        None => ChartView {
            title,
            bars: Vec::new(),
            placeholder: Some(NO_HOURLY_DATA),
        },
    }
}

/// `qua, 01/05`
pub fn day_label(date: NaiveDate) -> String {
    format!("{}, {}", format::weekday(date), format::day_month(date))
}

#[derive(Debug, Clone, PartialEq)]
pub struct DayCard {
    pub date: NaiveDate,
    pub weekday: &'static str,
    pub day_month: String,
    pub emoji: &'static str,
    /// `3.0 mm • 75%`
    pub precipitation: String,
    pub temperature: String,
    pub humidity: String,
    pub uv: String,
    pub sunrise: String,
    pub sunset: String,
    /// Width of the confidence bar, 0..=100
    pub confidence_percent: u32,
    pub high_chance: bool,
    pub active: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct WeekView {
    /// `🌦️ Chuva isolada nesta semana • 1/7 dias com chuva`
    pub headline: String,
    pub style_class: &'static str,
    pub cards: Vec<DayCard>,
}

/// Emoji from the daily figures alone
pub fn fallback_emoji(day: &DaySummary) -> &'static str {
    if !day.is_rainy {
        return Verdict::NoRain.emoji();
    }
    if day.pop_max.is_some_and(|p| p >= 70.0) || day.precipitation_sum >= 5.0 {
        Verdict::WillRain.emoji()
    } else {
        Verdict::MayRain.emoji()
    }
}

/// Day-bounded decision when hourly data exists, else the daily fallback.
pub fn card_emoji(day: &DaySummary, hourly: &HourlySeries) -> &'static str {
    match day_detail(hourly, day.date, day.sun_window()) {
        Some(detail) => score(&detail.metrics).emoji(),
        None => fallback_emoji(day),
    }
}

pub fn week_view(
    week: &WeekSummary,
    hourly: &HourlySeries,
    unit: TemperatureUnit,
    selected: Option<NaiveDate>,
) -> WeekView {
    let cards = week
        .days
        .iter()
        .map(|day| {
            let detail = day_detail(hourly, day.date, day.sun_window());
            let pop = match day.pop_max {
                Some(p) => format::percent(Some(p)),
                None => format!("{}%", format::MISSING),
            };
            DayCard {
                date: day.date,
                weekday: format::weekday(day.date),
                day_month: format::day_month(day.date),
                emoji: card_emoji(day, hourly),
                precipitation: format!("{} • {}", format::millimetres(day.precipitation_sum), pop),
                temperature: format::temperature_range_compact(day.temp_min, day.temp_max, unit),
                humidity: format::value_range(
                    detail.as_ref().and_then(|d| d.humidity),
                    format::percent,
                ),
                uv: format::value_range(detail.as_ref().and_then(|d| d.uv_index), format::uv),
                sunrise: format::sun_time(day.sunrise.as_deref()),
                sunset: format::sun_time(day.sunset.as_deref()),
                confidence_percent: (day.confidence * 100.0).round().clamp(0.0, 100.0) as u32,
                high_chance: day.pop_max.is_some_and(|p| p >= HIGH_CHANCE_POP),
                active: selected == Some(day.date),
            }
        })
        .collect();

    WeekView {
        headline: format!(
            "{} {} • {}/{} dias com chuva",
            week.verdict.emoji(),
            week.verdict.label(),
            week.rainy_days,
            week.days.len()
        ),
        style_class: week.verdict.tone().class(),
        cards,
    }
}

/// The rule table in words
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExplanationView {
    pub title: String,
    pub intro: &'static str,
    pub rules: Vec<String>,
    pub result: String,
}

pub fn explanation() -> ExplanationView {
    let threshold = |v: Verdict| {
        VERDICT_THRESHOLDS
            .iter()
            .find(|t| t.verdict == v)
            .map_or(0, |t| t.min_score)
    };

    ExplanationView {
        title: format!("Algoritmo de Decisão ({})", ALGORITHM_NAME),
        intro: "A decisão é baseada em um sistema de pontos que avalia vários fatores. \
                A pontuação final determina o resultado:",
        rules: RULES
            .iter()
            .map(|r| format!("+{} pontos: {}", r.points, r.description))
            .collect(),
        result: format!(
            "Resultado: A previsão será \"{}\" com {} ou mais pontos, e \"{}\" com {} ou mais pontos (máximo {}).",
            Verdict::WillRain.label(),
            threshold(Verdict::WillRain),
            Verdict::MayRain.label(),
            threshold(Verdict::MayRain),
            max_score()
        ),
    }
}

/// Everything on screen for one state
#[derive(Debug, Clone, PartialEq)]
pub struct Screen {
    pub summary: SummaryView,
    pub chart: ChartView,
    pub week: Option<WeekView>,
    pub theme: ThemeView,
}

pub fn build_screen(state: &AppState) -> Option<Screen> {
    let bundle = state.bundle.as_ref()?;
    let hourly = &bundle.forecast.hourly;
    let reference = bundle.reference_time();
    let week = state.week.as_ref();

    let selected_day = match state.mode() {
        ViewMode::Day(date) => week.and_then(|w| w.days.iter().find(|d| d.date == date)),
        ViewMode::Now => None,
    };

    let (summary, chart) = match selected_day {
        Some(day) => (summary_day(bundle, day, state.unit), chart_day(hourly, day.date)),
        None => (summary_now(bundle, state.unit), chart_now(hourly, reference)),
    };

    Some(Screen {
        summary,
        chart,
        week: week.map(|w| week_view(w, hourly, state.unit, state.selected_date)),
        theme: theme::resolve(week, reference, hourly),
    })
}
