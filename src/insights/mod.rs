//! Dashboard summaries over a student's moods, journals and activities.

mod activities;

use std::collections::BTreeMap;

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;

use crate::db::{Journal, Mood};
use crate::recommendations::scoring::{mood_value, NEUTRAL_MOOD};

pub use activities::{
    activity_recommendations, activity_stats, ActivityStats, ActivitySuggestion, Priority,
    DEFAULT_ACTIVITY_STATS_DAYS, SUGGESTION_ACTIVITY_WINDOW, SUGGESTION_MOOD_WINDOW,
};

pub const DEFAULT_TREND_DAYS: i64 = 30;
/// Most recent moods examined for low-mood streaks.
pub const PATTERN_WINDOW: usize = 20;
const MIN_LOW_STREAK: usize = 3;
const MAX_SEVERITY: usize = 10;
const LOW_STREAK_ADVICE: &str = "Consider taking a break and trying a breathing exercise";

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MoodTrendPoint {
    pub date: String,
    pub mood: String,
    pub value: f64,
    pub intensity: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MoodTrends {
    pub trends: Vec<MoodTrendPoint>,
    pub average_mood: f64,
    pub mood_distribution: BTreeMap<String, u32>,
}

/// Summarize moods (oldest first) into a day-by-day trend.
pub fn mood_trends(moods: &[Mood]) -> MoodTrends {
    let trends: Vec<MoodTrendPoint> = moods
        .iter()
        .map(|m| MoodTrendPoint {
            date: m.created_at.format("%Y-%m-%d").to_string(),
            mood: m.mood.clone(),
            value: mood_value(&m.mood),
            intensity: m.intensity,
        })
        .collect();

    let average_mood = if trends.is_empty() {
        NEUTRAL_MOOD
    } else {
        trends.iter().map(|t| t.value).sum::<f64>() / trends.len() as f64
    };

    let mut mood_distribution = BTreeMap::new();
    for mood in moods {
        *mood_distribution.entry(mood.mood.clone()).or_insert(0) += 1;
    }

    MoodTrends {
        trends,
        average_mood,
        mood_distribution,
    }
}

pub fn trend_cutoff(now: DateTime<Utc>, days: i64) -> DateTime<Utc> {
    now - Duration::days(days)
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StressPattern {
    #[serde(rename = "type")]
    pub pattern_type: &'static str,
    pub severity: u32,
    pub recommendation: &'static str,
}

/// Runs of three or more low moods among the first [`PATTERN_WINDOW`]
/// entries (newest first). A run is reported once a non-low mood ends it;
/// a run still open at the end of the window is not.
pub fn detect_stress_patterns(moods: &[Mood]) -> Vec<StressPattern> {
    let mut patterns = Vec::new();
    let mut streak = 0usize;

    for mood in moods.iter().take(PATTERN_WINDOW) {
        if mood.label().map_or(false, |l| l.is_low()) {
            streak += 1;
            continue;
        }
        if streak >= MIN_LOW_STREAK {
            patterns.push(StressPattern {
                pattern_type: "consecutive_low_mood",
                severity: streak.min(MAX_SEVERITY) as u32,
                recommendation: LOW_STREAK_ADVICE,
            });
        }
        streak = 0;
    }

    patterns
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JournalStats {
    pub total_entries: u32,
    pub total_words: u64,
    pub average_words_per_entry: f64,
    pub entries_this_week: u32,
}

pub fn journal_stats(journals: &[Journal], now: DateTime<Utc>) -> JournalStats {
    let total_words: u64 = journals.iter().map(|j| u64::from(j.word_count)).sum();
    let week_ago = now - Duration::days(7);
    let entries_this_week = journals.iter().filter(|j| j.created_at >= week_ago).count() as u32;

    JournalStats {
        total_entries: journals.len() as u32,
        total_words,
        average_words_per_entry: if journals.is_empty() {
            0.0
        } else {
            total_words as f64 / journals.len() as f64
        },
        entries_this_week,
    }
}
