use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use super::error::ParseFailureReason;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
/// Model's self-reported confidence in its pick.
pub enum Confidence {
    High,
    Medium,
    Low,
}

impl Confidence {
    pub fn as_str(&self) -> &'static str {
        match self {
            Confidence::High => "High",
            Confidence::Medium => "Medium",
            Confidence::Low => "Low",
        }
    }
}

impl fmt::Display for Confidence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Confidence {
    type Err = ParseFailureReason;

    /// Case-insensitive; a trailing period is tolerated.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().trim_end_matches('.').trim();
        if normalized.eq_ignore_ascii_case("high") {
            Ok(Confidence::High)
        } else if normalized.eq_ignore_ascii_case("medium") {
            Ok(Confidence::Medium)
        } else if normalized.eq_ignore_ascii_case("low") {
            Ok(Confidence::Low)
        } else {
            Err(ParseFailureReason::InvalidConfidence {
                value: s.to_string(),
            })
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
/// The decisive pick extracted from a completion reply.
///
/// `selected_id` always names one of the candidates the reply was parsed
/// against.
pub struct Selection {
    pub selected_id: String,
    pub product_name: String,
    pub reasoning: String,
    pub confidence: Confidence,
    pub key_features: String,
}
