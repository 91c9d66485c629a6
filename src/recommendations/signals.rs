use anyhow::{Context, Result};
use serde::Serialize;

use crate::db::Database;
use crate::recommendations::{
    config::RecommendationConfig,
    scoring::{average_mood, score_text, TextScore},
};

/// Live input counts double on the stress axis only.
const LIVE_STRESS_WEIGHT: u32 = 2;
const LIVE_POSITIVITY_WEIGHT: u32 = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    Journal,
    ConversationMessage,
    LiveInput,
}

#[derive(Debug, Clone)]
pub struct TextUnit {
    pub text: String,
    pub source: SourceKind,
}

impl TextUnit {
    pub fn new(text: impl Into<String>, source: SourceKind) -> Self {
        Self {
            text: text.into(),
            source,
        }
    }

    fn weighted_score(&self) -> TextScore {
        let score = score_text(&self.text);
        match self.source {
            SourceKind::LiveInput => TextScore {
                stress: score.stress * LIVE_STRESS_WEIGHT,
                positivity: score.positivity * LIVE_POSITIVITY_WEIGHT,
            },
            SourceKind::Journal | SourceKind::ConversationMessage => score,
        }
    }
}

/// Everything the tier classifier needs about one student.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Signal {
    pub stress_score: u32,
    pub positivity_score: u32,
    pub average_mood: f64,
}

/// Bounded slices of a student's stored history, newest first.
#[derive(Debug, Clone, Default)]
pub struct History {
    pub journal_texts: Vec<String>,
    pub message_texts: Vec<String>,
    pub mood_labels: Vec<String>,
}

impl History {
    /// Reads run one after another; any failure aborts the whole load.
    pub async fn load(db: &Database, user_id: &str, config: &RecommendationConfig) -> Result<Self> {
        let journal_texts = db
            .get_recent_journal_texts(user_id, config.journal_limit)
            .await
            .context("failed to load journals for recommendations")?;
        let message_texts = db
            .get_recent_message_texts(user_id, config.messages_per_conversation, config.message_cap)
            .await
            .context("failed to load conversation messages for recommendations")?;
        let mood_labels = db
            .get_recent_mood_labels(user_id, config.mood_limit)
            .await
            .context("failed to load moods for recommendations")?;

        Ok(Self {
            journal_texts,
            message_texts,
            mood_labels,
        })
    }

    /// Live input (when not blank) first, then journals, then messages.
    pub fn text_units(&self, live_text: Option<&str>) -> Vec<TextUnit> {
        let mut units = Vec::with_capacity(1 + self.journal_texts.len() + self.message_texts.len());
        if let Some(text) = live_text.filter(|t| !t.trim().is_empty()) {
            units.push(TextUnit::new(text, SourceKind::LiveInput));
        }
        units.extend(
            self.journal_texts
                .iter()
                .map(|t| TextUnit::new(t.as_str(), SourceKind::Journal)),
        );
        units.extend(
            self.message_texts
                .iter()
                .map(|t| TextUnit::new(t.as_str(), SourceKind::ConversationMessage)),
        );
        units
    }
}

/// Sum weighted keyword hits over every unit and average the mood window.
pub fn aggregate(units: &[TextUnit], mood_labels: &[String], mood_limit: usize) -> Signal {
    let mut total = TextScore::default();
    for unit in units {
        total += unit.weighted_score();
    }

    Signal {
        stress_score: total.stress,
        positivity_score: total.positivity,
        average_mood: average_mood(mood_labels, mood_limit),
    }
}
