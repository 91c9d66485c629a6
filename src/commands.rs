use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::{
    db::{
        Activity, ActivityInput, ActivityType, AnonymizedJournal, Conversation,
        ConversationMessage, ConversationStarted, Journal, JournalInput, JournalType, MessageRole,
        Mood, MoodLabel, User, DEFAULT_ACTIVITY_LIMIT, DEFAULT_CONVERSATION_LIMIT,
        DEFAULT_JOURNAL_LIMIT, DEFAULT_MOOD_HISTORY_LIMIT, DEFAULT_RESEARCH_LIMIT,
    },
    insights::{
        self, ActivityStats, ActivitySuggestion, JournalStats, MoodTrends, StressPattern,
        DEFAULT_ACTIVITY_STATS_DAYS, DEFAULT_TREND_DAYS, PATTERN_WINDOW,
        SUGGESTION_ACTIVITY_WINDOW, SUGGESTION_MOOD_WINDOW,
    },
    recommendations::{self, Identity, Recommendation, RecommendationConfig},
    AppState,
};

const MIN_INTENSITY: u32 = 1;
const MAX_INTENSITY: u32 = 10;
const MIN_EFFECTIVENESS: u32 = 1;
const MAX_EFFECTIVENESS: u32 = 10;

/// Input for logging a mood
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoodInput {
    pub mood: MoodLabel,
    pub intensity: u32,
    pub notes: Option<String>,
    #[serde(default)]
    pub triggers: Vec<String>,
    pub detection_method: String,
}

async fn resolve_user(state: &AppState, email: &str) -> Result<User, String> {
    state
        .db
        .find_user_by_email(email)
        .await
        .map_err(|e| e.to_string())?
        .ok_or_else(|| "User not found".to_string())
}

pub async fn get_personalized_recommendations(
    state: &AppState,
    identity: Option<Identity>,
    user_text: Option<String>,
) -> Result<Vec<Recommendation>, String> {
    let config = state.settings.recommendations();
    recommendations::get_personalized_recommendations(
        &state.db,
        &config,
        identity.as_ref(),
        user_text.as_deref(),
    )
    .await
    .map_err(|e| e.to_string())
}

pub async fn add_user(
    state: &AppState,
    name: Option<String>,
    email: String,
) -> Result<User, String> {
    let email = email.trim().to_string();
    if email.is_empty() {
        return Err("Email is required".to_string());
    }
    let existing = state
        .db
        .find_user_by_email(&email)
        .await
        .map_err(|e| e.to_string())?;
    if existing.is_some() {
        return Err("A user with this email already exists".to_string());
    }

    let user = User::new(name, Some(email));
    state
        .db
        .insert_user(&user)
        .await
        .map_err(|e| e.to_string())?;
    Ok(user)
}

pub async fn create_mood(state: &AppState, email: &str, input: MoodInput) -> Result<Mood, String> {
    if !(MIN_INTENSITY..=MAX_INTENSITY).contains(&input.intensity) {
        return Err(format!(
            "Intensity must be between {MIN_INTENSITY} and {MAX_INTENSITY}"
        ));
    }
    let user = resolve_user(state, email).await?;

    let mut mood = Mood::new(&user.id, input.mood, input.intensity, &input.detection_method);
    mood.notes = input.notes;
    mood.triggers = input.triggers;

    state
        .db
        .insert_mood(&mood)
        .await
        .map_err(|e| e.to_string())?;
    Ok(mood)
}

pub async fn get_user_moods(
    state: &AppState,
    email: &str,
    limit: Option<usize>,
) -> Result<Vec<Mood>, String> {
    let user = resolve_user(state, email).await?;
    state
        .db
        .get_user_moods(&user.id, limit.unwrap_or(DEFAULT_MOOD_HISTORY_LIMIT))
        .await
        .map_err(|e| e.to_string())
}

pub async fn create_journal(
    state: &AppState,
    email: &str,
    input: JournalInput,
) -> Result<Journal, String> {
    if input.content.trim().is_empty() {
        return Err("Journal content cannot be empty".to_string());
    }
    let user = resolve_user(state, email).await?;

    let mut journal = Journal::new(&user.id, &input.title, &input.content, input.journal_type);
    journal.mood = input.mood;
    journal.tags = input.tags;
    journal.is_encrypted = input.is_encrypted;
    journal.research_consent = input.research_consent;

    state
        .db
        .insert_journal(&journal)
        .await
        .map_err(|e| e.to_string())?;
    Ok(journal)
}

pub async fn get_user_journals(
    state: &AppState,
    email: &str,
    journal_type: Option<JournalType>,
    limit: Option<usize>,
) -> Result<Vec<Journal>, String> {
    let user = resolve_user(state, email).await?;
    state
        .db
        .get_user_journals(&user.id, journal_type, limit.unwrap_or(DEFAULT_JOURNAL_LIMIT))
        .await
        .map_err(|e| e.to_string())
}

/// Consented entries from every student, anonymized, newest first.
pub async fn get_research_journals(
    state: &AppState,
    limit: Option<usize>,
) -> Result<Vec<AnonymizedJournal>, String> {
    state
        .db
        .get_research_journals(limit.unwrap_or(DEFAULT_RESEARCH_LIMIT))
        .await
        .map_err(|e| e.to_string())
}

pub async fn create_activity(
    state: &AppState,
    email: &str,
    input: ActivityInput,
) -> Result<Activity, String> {
    if input.duration == 0 {
        return Err("Duration must be at least one minute".to_string());
    }
    if let Some(score) = input.effectiveness {
        if !(MIN_EFFECTIVENESS..=MAX_EFFECTIVENESS).contains(&score) {
            return Err(format!(
                "Effectiveness must be between {MIN_EFFECTIVENESS} and {MAX_EFFECTIVENESS}"
            ));
        }
    }
    let user = resolve_user(state, email).await?;

    let mut activity = Activity::new(&user.id, input.activity_type, input.duration, input.completed);
    activity.effectiveness = input.effectiveness;
    activity.notes = input.notes;
    activity.metadata = input.metadata;

    state
        .db
        .insert_activity(&activity)
        .await
        .map_err(|e| e.to_string())?;
    Ok(activity)
}

pub async fn get_user_activities(
    state: &AppState,
    email: &str,
    activity_type: Option<ActivityType>,
    limit: Option<usize>,
) -> Result<Vec<Activity>, String> {
    let user = resolve_user(state, email).await?;
    state
        .db
        .get_user_activities(&user.id, activity_type, limit.unwrap_or(DEFAULT_ACTIVITY_LIMIT))
        .await
        .map_err(|e| e.to_string())
}

pub async fn get_activity_stats(
    state: &AppState,
    email: &str,
    days: Option<i64>,
) -> Result<ActivityStats, String> {
    let user = resolve_user(state, email).await?;
    let cutoff = insights::trend_cutoff(Utc::now(), days.unwrap_or(DEFAULT_ACTIVITY_STATS_DAYS));
    let activities = state
        .db
        .get_activities_since(&user.id, cutoff)
        .await
        .map_err(|e| e.to_string())?;
    Ok(insights::activity_stats(&activities))
}

pub async fn get_activity_recommendations(
    state: &AppState,
    email: &str,
) -> Result<Vec<ActivitySuggestion>, String> {
    let user = resolve_user(state, email).await?;
    let moods = state
        .db
        .get_user_moods(&user.id, SUGGESTION_MOOD_WINDOW)
        .await
        .map_err(|e| e.to_string())?;
    let activities = state
        .db
        .get_user_activities(&user.id, None, SUGGESTION_ACTIVITY_WINDOW)
        .await
        .map_err(|e| e.to_string())?;
    Ok(insights::activity_recommendations(
        moods.first(),
        activities.first(),
        Utc::now(),
    ))
}

pub async fn start_conversation(
    state: &AppState,
    email: &str,
    initial_message: Option<String>,
) -> Result<ConversationStarted, String> {
    let user = resolve_user(state, email).await?;
    state
        .db
        .start_conversation(&user, initial_message)
        .await
        .map_err(|e| e.to_string())
}

pub async fn add_message(
    state: &AppState,
    session_id: &str,
    role: MessageRole,
    content: String,
    emotion: Option<String>,
) -> Result<ConversationMessage, String> {
    state
        .db
        .add_message(session_id, role, content, emotion)
        .await
        .map_err(|e| e.to_string())
}

pub async fn get_conversation(
    state: &AppState,
    session_id: &str,
) -> Result<Option<Conversation>, String> {
    state
        .db
        .get_conversation(session_id)
        .await
        .map_err(|e| e.to_string())
}

pub async fn get_user_conversations(
    state: &AppState,
    email: &str,
    limit: Option<usize>,
) -> Result<Vec<Conversation>, String> {
    let user = resolve_user(state, email).await?;
    state
        .db
        .get_user_conversations(&user.id, limit.unwrap_or(DEFAULT_CONVERSATION_LIMIT))
        .await
        .map_err(|e| e.to_string())
}

pub async fn get_mood_trends(
    state: &AppState,
    email: &str,
    days: Option<i64>,
) -> Result<MoodTrends, String> {
    let user = resolve_user(state, email).await?;
    let cutoff = insights::trend_cutoff(Utc::now(), days.unwrap_or(DEFAULT_TREND_DAYS));
    let moods = state
        .db
        .get_moods_since(&user.id, cutoff)
        .await
        .map_err(|e| e.to_string())?;
    Ok(insights::mood_trends(&moods))
}

pub async fn detect_stress_patterns(
    state: &AppState,
    email: &str,
) -> Result<Vec<StressPattern>, String> {
    let user = resolve_user(state, email).await?;
    let moods = state
        .db
        .get_user_moods(&user.id, PATTERN_WINDOW)
        .await
        .map_err(|e| e.to_string())?;
    Ok(insights::detect_stress_patterns(&moods))
}

pub async fn get_journal_stats(state: &AppState, email: &str) -> Result<JournalStats, String> {
    let user = resolve_user(state, email).await?;
    let journals = state
        .db
        .get_all_journals(&user.id)
        .await
        .map_err(|e| e.to_string())?;
    Ok(insights::journal_stats(&journals, Utc::now()))
}

pub fn get_recommendation_settings(state: &AppState) -> RecommendationConfig {
    state.settings.recommendations()
}

pub fn update_recommendation_settings(
    state: &AppState,
    config: RecommendationConfig,
) -> Result<RecommendationConfig, String> {
    state
        .settings
        .update_recommendations(config)
        .map_err(|e| e.to_string())?;
    Ok(state.settings.recommendations())
}
