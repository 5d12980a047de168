//! Session types and the weekend formats that sequence them.

use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum SessionType {
    #[serde(rename = "FP1")]
    Fp1,
    #[serde(rename = "FP2")]
    Fp2,
    #[serde(rename = "FP3")]
    Fp3,
    #[serde(rename = "SPRINT_QUALIFYING")]
    SprintQualifying,
    #[serde(rename = "SPRINT")]
    Sprint,
    #[serde(rename = "QUALIFYING")]
    Qualifying,
    #[serde(rename = "RACE")]
    Race,
}

impl SessionType {
    pub const fn is_practice(self) -> bool {
        match self {
            Self::Fp1 | Self::Fp2 | Self::Fp3 => true,
            Self::SprintQualifying | Self::Sprint | Self::Qualifying | Self::Race => false,
        }
    }

    pub const fn is_qualifying(self) -> bool {
        match self {
            Self::SprintQualifying | Self::Qualifying => true,
            Self::Fp1 | Self::Fp2 | Self::Fp3 | Self::Sprint | Self::Race => false,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Fp1 => "Free Practice 1",
            Self::Fp2 => "Free Practice 2",
            Self::Fp3 => "Free Practice 3",
            Self::SprintQualifying => "Sprint Qualifying",
            Self::Sprint => "Sprint Race",
            Self::Qualifying => "Qualifying",
            Self::Race => "Race",
        }
    }
}

impl fmt::Display for SessionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Fp1 => "FP1",
            Self::Fp2 => "FP2",
            Self::Fp3 => "FP3",
            Self::SprintQualifying => "SPRINT_QUALIFYING",
            Self::Sprint => "SPRINT",
            Self::Qualifying => "QUALIFYING",
            Self::Race => "RACE",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WeekendFormat {
    Standard,
    Sprint,
}

const STANDARD_SEQUENCE: [SessionType; 5] = [
    SessionType::Fp1,
    SessionType::Fp2,
    SessionType::Fp3,
    SessionType::Qualifying,
    SessionType::Race,
];

const SPRINT_SEQUENCE: [SessionType; 5] = [
    SessionType::Fp1,
    SessionType::SprintQualifying,
    SessionType::Sprint,
    SessionType::Qualifying,
    SessionType::Race,
];

impl WeekendFormat {
    /// Every session of the weekend in running order, race last.
    pub const fn sessions(self) -> &'static [SessionType] {
        match self {
            Self::Standard => &STANDARD_SEQUENCE,
            Self::Sprint => &SPRINT_SEQUENCE,
        }
    }

    /// Sessions run before the race.
    pub fn pre_race_sessions(self) -> &'static [SessionType] {
        let sessions = self.sessions();
        &sessions[..sessions.len() - 1]
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "standard" => Some(Self::Standard),
            "sprint" => Some(Self::Sprint),
            _ => None,
        }
    }
}

impl fmt::Display for WeekendFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Standard => "STANDARD",
            Self::Sprint => "SPRINT",
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_and_sprint_sequences() {
        assert_eq!(
            WeekendFormat::Standard.sessions(),
            &[
                SessionType::Fp1,
                SessionType::Fp2,
                SessionType::Fp3,
                SessionType::Qualifying,
                SessionType::Race
            ]
        );
        assert_eq!(
            WeekendFormat::Sprint.pre_race_sessions(),
            &[
                SessionType::Fp1,
                SessionType::SprintQualifying,
                SessionType::Sprint,
                SessionType::Qualifying
            ]
        );
    }

    #[test]
    fn session_serializes_with_regulation_names() {
        let json = serde_json::to_string(&SessionType::SprintQualifying).unwrap();
        assert_eq!(json, "\"SPRINT_QUALIFYING\"");
        assert_eq!(SessionType::Fp2.to_string(), "FP2");
    }
}
