//! Rain decision: an additive point system over [`Metrics`].
//!
//! Each rule in [`RULES`] contributes its points independently. The total is
//! classified by [`VERDICT_THRESHOLDS`], checked from the highest threshold down.

use serde::{Deserialize, Serialize};

use crate::window::Metrics;

/// Visual tone shared by every verdict-like value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tone {
    Good,
    Warn,
    Bad,
}

impl Tone {
    /// Style class name used by renderers
    pub fn class(&self) -> &'static str {
        match self {
            Self::Good => "good",
            Self::Warn => "warn",
            Self::Bad => "bad",
        }
    }
}

/// Three-way rain classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    WillRain,
    MayRain,
    NoRain,
}

impl Verdict {
    pub fn label(&self) -> &'static str {
        match self {
            Self::WillRain => "Vai chover",
            Self::MayRain => "Pode chover",
            Self::NoRain => "Não deve chover",
        }
    }

    pub fn emoji(&self) -> &'static str {
        match self {
            Self::WillRain => "🌧️",
            Self::MayRain => "🌦️",
            Self::NoRain => "🌤️",
        }
    }

    pub fn tone(&self) -> Tone {
        match self {
            Self::WillRain => Tone::Bad,
            Self::MayRain => Tone::Warn,
            Self::NoRain => Tone::Good,
        }
    }
}

/// One scoring rule
#[derive(Debug, Clone, Copy)]
pub struct Rule {
    pub id: &'static str,
    pub description: &'static str,
    pub points: u32,
    predicate: fn(&Metrics) -> bool,
}

impl Rule {
    pub fn applies(&self, metrics: &Metrics) -> bool {
        (self.predicate)(metrics)
    }
}

pub static RULES: [Rule; 6] = [
    Rule {
        id: "prob24h_40",
        description: "Prob. de chuva ≥ 40% nas próx. 24h",
        points: 2,
        predicate: |m| m.max_prob24 >= 40.0,
    },
    Rule {
        id: "prob24h_70",
        description: "Prob. de chuva ≥ 70% nas próx. 24h",
        points: 2,
        predicate: |m| m.max_prob24 >= 70.0,
    },
    Rule {
        id: "sum6h_0_5",
        description: "Chuva acumulada ≥ 0.5mm nas próx. 6h",
        points: 2,
        predicate: |m| m.sum6 >= 0.5,
    },
    Rule {
        id: "sum6h_2_0",
        description: "Chuva acumulada ≥ 2.0mm nas próx. 6h",
        points: 2,
        predicate: |m| m.sum6 >= 2.0,
    },
    Rule {
        id: "maxPrecip6h_1_0",
        description: "Pico de chuva ≥ 1.0mm/h nas próx. 6h",
        points: 2,
        predicate: |m| m.max_precip6 >= 1.0,
    },
    Rule {
        id: "probDaytime_50",
        description: "Prob. de chuva ≥ 50% durante o dia",
        points: 2,
        predicate: |m| m.max_prob_daytime >= 50.0,
    },
];

/// Minimum score for a verdict
#[derive(Debug, Clone, Copy)]
pub struct VerdictThreshold {
    pub min_score: u32,
    pub verdict: Verdict,
}

/// Ordered from the highest threshold; the first match wins.
pub static VERDICT_THRESHOLDS: [VerdictThreshold; 3] = [
    VerdictThreshold {
        min_score: 6,
        verdict: Verdict::WillRain,
    },
    VerdictThreshold {
        min_score: 3,
        verdict: Verdict::MayRain,
    },
    VerdictThreshold {
        min_score: 0,
        verdict: Verdict::NoRain,
    },
];

/// Name shown with the rule table
pub const ALGORITHM_NAME: &str = "Sistema de Pontos";

/// Highest achievable score
pub fn max_score() -> u32 {
    RULES.iter().map(|r| r.points).sum()
}

/// Outcome of scoring one set of metrics
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Decision {
    pub verdict: Verdict,
    pub score: u32,
    /// The inputs that produced this decision
    pub metrics: Metrics,
}

impl Decision {
    pub fn emoji(&self) -> &'static str {
        self.verdict.emoji()
    }

    pub fn label(&self) -> &'static str {
        self.verdict.label()
    }

    pub fn style_class(&self) -> &'static str {
        self.verdict.tone().class()
    }

    /// Rules that contributed to the score
    pub fn fired_rules(&self) -> impl Iterator<Item = &'static Rule> + '_ {
        RULES.iter().filter(move |r| r.applies(&self.metrics))
    }
}

fn classify(score: u32) -> Verdict {
    VERDICT_THRESHOLDS
        .iter()
        .find(|t| score >= t.min_score)
        .map_or(Verdict::NoRain, |t| t.verdict)
}

/// Score metrics against the rule table. Total and side-effect free.
pub fn score(metrics: &Metrics) -> Decision {
    let score = RULES
        .iter()
        .filter(|r| r.applies(metrics))
        .map(|r| r.points)
        .sum();

    let decision = Decision {
        verdict: classify(score),
        score,
        metrics: *metrics,
    };

    tracing::debug!(
        score,
        max_prob24 = metrics.max_prob24,
        sum6 = metrics.sum6,
        max_precip6 = metrics.max_precip6,
        max_prob_daytime = metrics.max_prob_daytime,
        "Rain score"
    );
    decision
}
