//! Wellness activity sessions (breathing, meditation and the like).

use std::{fmt, str::FromStr};

use anyhow::{anyhow, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum ActivityType {
    Breathing,
    Meditation,
    Journaling,
    Music,
    Mindfulness,
}

impl ActivityType {
    pub const ALL: [ActivityType; 5] = [
        ActivityType::Breathing,
        ActivityType::Meditation,
        ActivityType::Journaling,
        ActivityType::Music,
        ActivityType::Mindfulness,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ActivityType::Breathing => "breathing",
            ActivityType::Meditation => "meditation",
            ActivityType::Journaling => "journaling",
            ActivityType::Music => "music",
            ActivityType::Mindfulness => "mindfulness",
        }
    }
}

impl fmt::Display for ActivityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ActivityType {
    type Err = anyhow::Error;

    fn from_str(value: &str) -> Result<Self> {
        ActivityType::ALL
            .into_iter()
            .find(|kind| kind.as_str() == value)
            .ok_or_else(|| anyhow!("unknown activity type '{value}'"))
    }
}

/// Optional session details, stored as a JSON column.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ActivityMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub breathing_pattern: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub music_track: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub guidance_used: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interruptions: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Activity {
    pub id: String,
    pub user_id: String,
    #[serde(rename = "type")]
    pub activity_type: ActivityType,
    /// Minutes.
    pub duration: u32,
    pub completed: bool,
    /// 1-10 self rating.
    pub effectiveness: Option<u32>,
    pub notes: Option<String>,
    pub metadata: Option<ActivityMetadata>,
    pub created_at: DateTime<Utc>,
}

impl Activity {
    pub fn new(user_id: &str, activity_type: ActivityType, duration: u32, completed: bool) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            user_id: user_id.to_string(),
            activity_type,
            duration,
            completed,
            effectiveness: None,
            notes: None,
            metadata: None,
            created_at: Utc::now(),
        }
    }
}

/// Input for logging an activity session
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityInput {
    #[serde(rename = "type")]
    pub activity_type: ActivityType,
    pub duration: u32,
    #[serde(default)]
    pub completed: bool,
    pub effectiveness: Option<u32>,
    pub notes: Option<String>,
    pub metadata: Option<ActivityMetadata>,
}
