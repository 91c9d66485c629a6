//! Mood tracking models.

use std::{fmt, str::FromStr};

use anyhow::{anyhow, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Categorical mood a student records, ordered from worst to best.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum MoodLabel {
    VeryLow,
    Low,
    Neutral,
    Good,
    Excellent,
}

impl MoodLabel {
    pub const ALL: [MoodLabel; 5] = [
        MoodLabel::VeryLow,
        MoodLabel::Low,
        MoodLabel::Neutral,
        MoodLabel::Good,
        MoodLabel::Excellent,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            MoodLabel::VeryLow => "very_low",
            MoodLabel::Low => "low",
            MoodLabel::Neutral => "neutral",
            MoodLabel::Good => "good",
            MoodLabel::Excellent => "excellent",
        }
    }

    /// Position on the 1-5 scale.
    pub fn ordinal(&self) -> u8 {
        match self {
            MoodLabel::VeryLow => 1,
            MoodLabel::Low => 2,
            MoodLabel::Neutral => 3,
            MoodLabel::Good => 4,
            MoodLabel::Excellent => 5,
        }
    }

    pub fn is_low(&self) -> bool {
        matches!(self, MoodLabel::VeryLow | MoodLabel::Low)
    }
}

impl fmt::Display for MoodLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MoodLabel {
    type Err = anyhow::Error;

    fn from_str(value: &str) -> Result<Self> {
        MoodLabel::ALL
            .into_iter()
            .find(|label| label.as_str() == value)
            .ok_or_else(|| anyhow!("unknown mood label '{value}'"))
    }
}

/// A stored mood entry. `mood` keeps the raw stored label so rows written by
/// older clients with labels outside [`MoodLabel`] can still be read.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Mood {
    pub id: String,
    pub user_id: String,
    pub mood: String,
    pub intensity: u32,
    pub notes: Option<String>,
    pub triggers: Vec<String>,
    pub detection_method: String,
    pub created_at: DateTime<Utc>,
}

impl Mood {
    pub fn new(user_id: &str, label: MoodLabel, intensity: u32, detection_method: &str) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            user_id: user_id.to_string(),
            mood: label.as_str().to_string(),
            intensity,
            notes: None,
            triggers: Vec::new(),
            detection_method: detection_method.to_string(),
            created_at: Utc::now(),
        }
    }

    pub fn label(&self) -> Option<MoodLabel> {
        self.mood.parse().ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels_round_trip_through_strings() {
        for label in MoodLabel::ALL {
            assert_eq!(label.as_str().parse::<MoodLabel>().unwrap(), label);
        }
        assert!("meh".parse::<MoodLabel>().is_err());
    }

    #[test]
    fn ordinals_span_one_to_five() {
        let ordinals: Vec<u8> = MoodLabel::ALL.iter().map(MoodLabel::ordinal).collect();
        assert_eq!(ordinals, vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn serde_uses_snake_case() {
        let json = serde_json::to_string(&MoodLabel::VeryLow).unwrap();
        assert_eq!(json, "\"very_low\"");
    }
}
