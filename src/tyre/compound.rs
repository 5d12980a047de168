use std::fmt;

use serde::{Deserialize, Serialize};

/// Tire rubber formulation. Closed set: every consumer matches exhaustively.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Compound {
    Soft,
    Medium,
    Hard,
    Intermediate,
    Wet,
}

impl Compound {
    /// Inventory numbering order.
    pub const ALL: [Compound; 5] = [
        Compound::Soft,
        Compound::Medium,
        Compound::Hard,
        Compound::Intermediate,
        Compound::Wet,
    ];

    /// Slick compounds, softest first.
    pub const SLICKS: [Compound; 3] = [Compound::Soft, Compound::Medium, Compound::Hard];

    pub const fn is_slick(self) -> bool {
        match self {
            Self::Soft | Self::Medium | Self::Hard => true,
            Self::Intermediate | Self::Wet => false,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Soft => "Soft",
            Self::Medium => "Medium",
            Self::Hard => "Hard",
            Self::Intermediate => "Intermediate",
            Self::Wet => "Wet",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "soft" | "s" => Some(Self::Soft),
            "medium" | "m" => Some(Self::Medium),
            "hard" | "h" => Some(Self::Hard),
            "intermediate" | "inter" | "i" => Some(Self::Intermediate),
            "wet" | "w" => Some(Self::Wet),
            _ => None,
        }
    }
}

impl fmt::Display for Compound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Soft => "SOFT",
            Self::Medium => "MEDIUM",
            Self::Hard => "HARD",
            Self::Intermediate => "INTERMEDIATE",
            Self::Wet => "WET",
        })
    }
}

/// Condition lost per lap, by compound.
///
/// Intermediate and wet default to the medium rate; a dedicated wet model is
/// plugged in by overriding those two entries.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DegradationTable {
    pub soft: f64,
    pub medium: f64,
    pub hard: f64,
    pub intermediate: f64,
    pub wet: f64,
}

impl Default for DegradationTable {
    fn default() -> Self {
        Self {
            soft: 2.5,
            medium: 1.5,
            hard: 1.0,
            intermediate: 1.5,
            wet: 1.5,
        }
    }
}

impl DegradationTable {
    pub const fn rate(&self, compound: Compound) -> f64 {
        match compound {
            Compound::Soft => self.soft,
            Compound::Medium => self.medium,
            Compound::Hard => self.hard,
            Compound::Intermediate => self.intermediate,
            Compound::Wet => self.wet,
        }
    }

    /// Rates must be finite and strictly positive.
    pub fn validate(&self) -> Result<(), String> {
        for compound in Compound::ALL {
            let rate = self.rate(compound);
            if !rate.is_finite() || rate <= 0.0 {
                return Err(format!("degradation rate for {compound} must be > 0, got {rate}"));
            }
        }
        Ok(())
    }
}
