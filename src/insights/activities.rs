//! Activity stats and mood-driven activity suggestions.

use std::collections::BTreeMap;

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;

use crate::db::{Activity, ActivityType, Mood, MoodLabel};

pub const DEFAULT_ACTIVITY_STATS_DAYS: i64 = 30;
/// Latest moods and sessions read when suggesting activities.
pub const SUGGESTION_MOOD_WINDOW: usize = 5;
pub const SUGGESTION_ACTIVITY_WINDOW: usize = 10;
/// A check-in is suggested once the last session is older than this.
const CHECK_IN_AFTER_HOURS: i64 = 24;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityStats {
    pub total_activities: u32,
    pub completed_activities: u32,
    /// Mean minutes over completed sessions only.
    pub average_duration: f64,
    pub activity_breakdown: BTreeMap<String, u32>,
}

pub fn activity_stats(activities: &[Activity]) -> ActivityStats {
    let completed: Vec<&Activity> = activities.iter().filter(|a| a.completed).collect();
    let total_minutes: u64 = completed.iter().map(|a| u64::from(a.duration)).sum();

    let mut activity_breakdown = BTreeMap::new();
    for activity in activities {
        *activity_breakdown
            .entry(activity.activity_type.as_str().to_string())
            .or_insert(0) += 1;
    }

    ActivityStats {
        total_activities: activities.len() as u32,
        completed_activities: completed.len() as u32,
        average_duration: if completed.is_empty() {
            0.0
        } else {
            total_minutes as f64 / completed.len() as f64
        },
        activity_breakdown,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    High,
    Medium,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActivitySuggestion {
    #[serde(rename = "type")]
    pub activity_type: ActivityType,
    pub title: &'static str,
    pub description: &'static str,
    pub duration: u32,
    pub priority: Priority,
}

const QUICK_BREATHING: ActivitySuggestion = ActivitySuggestion {
    activity_type: ActivityType::Breathing,
    title: "Quick Breathing Exercise",
    description: "A 5-minute breathing exercise to help you feel more centered",
    duration: 5,
    priority: Priority::High,
};

const MINDFUL_MEDITATION: ActivitySuggestion = ActivitySuggestion {
    activity_type: ActivityType::Meditation,
    title: "Mindful Meditation",
    description: "A gentle 10-minute meditation to enhance your wellbeing",
    duration: 10,
    priority: Priority::Medium,
};

const DAILY_CHECK_IN: ActivitySuggestion = ActivitySuggestion {
    activity_type: ActivityType::Journaling,
    title: "Daily Check-in",
    description: "Take a moment to reflect on your day and feelings",
    duration: 10,
    priority: Priority::Medium,
};

/// Suggest sessions from the latest mood and the latest logged activity.
/// Low moods get a breathing exercise, a neutral mood a meditation, and a
/// day without any session a journaling check-in.
pub fn activity_recommendations(
    latest_mood: Option<&Mood>,
    last_activity: Option<&Activity>,
    now: DateTime<Utc>,
) -> Vec<ActivitySuggestion> {
    let mut suggestions = Vec::new();

    match latest_mood.and_then(Mood::label) {
        Some(label) if label.is_low() => suggestions.push(QUICK_BREATHING),
        Some(MoodLabel::Neutral) => suggestions.push(MINDFUL_MEDITATION),
        _ => {}
    }

    let idle = last_activity
        .map_or(true, |a| now - a.created_at > Duration::hours(CHECK_IN_AFTER_HOURS));
    if idle {
        suggestions.push(DAILY_CHECK_IN);
    }

    suggestions
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session(kind: ActivityType, minutes: u32, completed: bool) -> Activity {
        Activity::new("u1", kind, minutes, completed)
    }

    #[test]
    fn stats_average_completed_sessions_only() {
        let activities = [
            session(ActivityType::Breathing, 5, true),
            session(ActivityType::Breathing, 15, true),
            session(ActivityType::Music, 40, false),
        ];

        let stats = activity_stats(&activities);
        assert_eq!(stats.total_activities, 3);
        assert_eq!(stats.completed_activities, 2);
        assert_eq!(stats.average_duration, 10.0);
        assert_eq!(stats.activity_breakdown["breathing"], 2);
        assert_eq!(stats.activity_breakdown["music"], 1);
    }

    #[test]
    fn stats_without_completed_sessions_average_zero() {
        let stats = activity_stats(&[session(ActivityType::Mindfulness, 8, false)]);
        assert_eq!(stats.average_duration, 0.0);
        assert_eq!(activity_stats(&[]).total_activities, 0);
    }

    #[test]
    fn low_moods_get_breathing_first() {
        let now = Utc::now();
        let mood = Mood::new("u1", MoodLabel::VeryLow, 8, "manual");
        let recent = session(ActivityType::Music, 20, true);

        let suggestions = activity_recommendations(Some(&mood), Some(&recent), now);
        assert_eq!(suggestions, vec![QUICK_BREATHING]);
    }

    #[test]
    fn neutral_mood_and_idle_day_get_meditation_and_check_in() {
        let now = Utc::now();
        let mood = Mood::new("u1", MoodLabel::Neutral, 5, "manual");
        let mut stale = session(ActivityType::Breathing, 5, true);
        stale.created_at = now - Duration::hours(25);

        let suggestions = activity_recommendations(Some(&mood), Some(&stale), now);
        let titles: Vec<&str> = suggestions.iter().map(|s| s.title).collect();
        assert_eq!(titles, vec!["Mindful Meditation", "Daily Check-in"]);
    }

    #[test]
    fn good_moods_with_recent_sessions_need_nothing() {
        let now = Utc::now();
        let mood = Mood::new("u1", MoodLabel::Excellent, 5, "manual");
        let recent = session(ActivityType::Journaling, 10, true);
        assert!(activity_recommendations(Some(&mood), Some(&recent), now).is_empty());

        let fresh_start = activity_recommendations(None, None, now);
        assert_eq!(fresh_start, vec![DAILY_CHECK_IN]);
    }

    #[test]
    fn suggestions_serialize_type_and_priority_in_lowercase() {
        let value = serde_json::to_value(QUICK_BREATHING).unwrap();
        assert_eq!(value["type"], "breathing");
        assert_eq!(value["priority"], "high");
    }
}
