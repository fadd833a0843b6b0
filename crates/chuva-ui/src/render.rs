//! Plain-text rendering of the view models.

use std::fmt;

use crate::autocomplete::SuggestionList;
use crate::status::{StatusKind, StatusMessage};
use crate::tour::Tour;
use crate::view::{ChartView, DayCard, ExplanationView, Screen, SummaryView, WeekView};

const BAR_WIDTH: usize = 20;

fn bar(percent: f64, width: usize) -> String {
    let filled = ((percent.clamp(0.0, 100.0) / 100.0) * width as f64).round() as usize;
    format!("{}{}", "█".repeat(filled), "░".repeat(width - filled))
}

impl fmt::Display for SummaryView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} {}", self.emoji(), self.verdict())?;
        writeln!(f, "{} ({})", self.location, self.timezone)?;

        let l = &self.labels;
        let rows = [
            (l.temperature, &self.temperature),
            (l.rain6h, &self.rain6h),
            (l.pop24h, &self.pop24h),
            (l.wind, &self.wind),
            (l.humidity, &self.humidity),
            (l.uv, &self.uv),
            (l.aqi, &self.aqi),
        ];
        let width = rows.iter().map(|(k, _)| k.chars().count()).max().unwrap_or(0);
        for (label, value) in rows {
            writeln!(f, "  {:<width$} {}", label, value, width = width)?;
        }
        writeln!(f, "  🌅 {}   🌇 {}", self.sunrise, self.sunset)
    }
}

impl fmt::Display for ChartView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.title)?;
        if let Some(placeholder) = self.placeholder {
            return writeln!(f, "  {}", placeholder);
        }
        for b in &self.bars {
            writeln!(f, "  {:>3} {} {}", b.hour_label, bar(b.pop, BAR_WIDTH), b.pop_label)?;
        }
        Ok(())
    }
}

fn write_card(f: &mut fmt::Formatter<'_>, card: &DayCard) -> fmt::Result {
    let marker = if card.active { '>' } else { ' ' };
    let high = if card.high_chance { " ⚠️" } else { "" };
    writeln!(
        f,
        "{} {} {} {} {}{}",
        marker, card.weekday, card.day_month, card.emoji, card.precipitation, high
    )?;
    writeln!(
        f,
        "    {}  💧 {}  ☀️ {}  🌅 {}  🌇 {}",
        card.temperature, card.humidity, card.uv, card.sunrise, card.sunset
    )?;
    writeln!(f, "    {} {}%", bar(card.confidence_percent as f64, 10), card.confidence_percent)
}

impl fmt::Display for WeekView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.headline)?;
        for card in &self.cards {
            write_card(f, card)?;
        }
        Ok(())
    }
}

impl fmt::Display for Screen {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.summary)?;
        writeln!(f, "{}", self.chart)?;
        if let Some(week) = &self.week {
            writeln!(f, "{}", week)?;
        }
        writeln!(f, "{}", self.theme.label)
    }
}

impl fmt::Display for ExplanationView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.title)?;
        writeln!(f, "{}", self.intro)?;
        for rule in &self.rules {
            writeln!(f, "  {}", rule)?;
        }
        writeln!(f, "{}", self.result)
    }
}

impl fmt::Display for StatusMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            StatusKind::Loading => write!(f, "… {}", self.text),
            StatusKind::Info | StatusKind::Error => write!(f, "{}", self.text),
        }
    }
}

/// Numbered suggestion rows, the highlighted one marked.
pub fn suggestions(list: &SuggestionList) -> String {
    list.places()
        .iter()
        .enumerate()
        .map(|(i, place)| {
            let marker = if list.active_index() == Some(i) { '>' } else { ' ' };
            format!("{} {}. {}\n", marker, i + 1, place.display_name)
        })
        .collect()
}

/// Every step of a started tour, in order.
pub fn tour(tour: &Tour) -> String {
    let total = tour.steps().len();
    tour.steps()
        .iter()
        .enumerate()
        .map(|(i, step)| format!("[{}/{}] {}\n", i + 1, total, step.text))
        .collect()
}
