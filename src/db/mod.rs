mod connection;
pub mod helpers;
mod migrations;
pub mod models;
mod repositories;

pub use connection::Database;
pub use models::{
    Activity, ActivityInput, ActivityMetadata, ActivityType, AnonymizedJournal, Conversation,
    ConversationMessage, ConversationStarted, Journal, JournalInput, JournalType, MessageRole,
    Mood, MoodLabel, User,
};
pub use repositories::{
    activities::DEFAULT_ACTIVITY_LIMIT,
    conversations::DEFAULT_CONVERSATION_LIMIT,
    journals::{DEFAULT_JOURNAL_LIMIT, DEFAULT_RESEARCH_LIMIT},
    moods::DEFAULT_MOOD_HISTORY_LIMIT,
};
