//! Journal entry models.

use std::str::FromStr;

use anyhow::{anyhow, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::MoodLabel;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum JournalType {
    Private,
    Research,
}

impl JournalType {
    pub fn as_str(&self) -> &'static str {
        match self {
            JournalType::Private => "private",
            JournalType::Research => "research",
        }
    }
}

impl FromStr for JournalType {
    type Err = anyhow::Error;

    fn from_str(value: &str) -> Result<Self> {
        match value {
            "private" => Ok(JournalType::Private),
            "research" => Ok(JournalType::Research),
            other => Err(anyhow!("unknown journal type '{other}'")),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Journal {
    pub id: String,
    pub user_id: String,
    pub title: String,
    pub content: String,
    pub journal_type: JournalType,
    pub mood: Option<MoodLabel>,
    pub tags: Vec<String>,
    pub is_encrypted: bool,
    pub word_count: u32,
    pub research_consent: Option<bool>,
    pub created_at: DateTime<Utc>,
}

impl Journal {
    pub fn new(user_id: &str, title: &str, content: &str, journal_type: JournalType) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            user_id: user_id.to_string(),
            title: title.to_string(),
            content: content.to_string(),
            journal_type,
            mood: None,
            tags: Vec::new(),
            is_encrypted: false,
            word_count: count_words(content),
            research_consent: None,
            created_at: Utc::now(),
        }
    }
}

/// A consented entry shared for research: no owner, no title.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnonymizedJournal {
    pub id: String,
    pub content: String,
    pub mood: Option<MoodLabel>,
    pub tags: Vec<String>,
    pub word_count: u32,
    pub created_at: DateTime<Utc>,
}

impl From<Journal> for AnonymizedJournal {
    fn from(journal: Journal) -> Self {
        Self {
            id: journal.id,
            content: journal.content,
            mood: journal.mood,
            tags: journal.tags,
            word_count: journal.word_count,
            created_at: journal.created_at,
        }
    }
}

pub fn count_words(content: &str) -> u32 {
    content.split_whitespace().count() as u32
}

/// Input for creating a journal entry
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JournalInput {
    pub title: String,
    pub content: String,
    pub journal_type: JournalType,
    pub mood: Option<MoodLabel>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub is_encrypted: bool,
    pub research_consent: Option<bool>,
}
