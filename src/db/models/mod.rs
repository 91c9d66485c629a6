pub mod activity;
pub mod conversation;
pub mod journal;
pub mod mood;
pub mod user;

pub use activity::{Activity, ActivityInput, ActivityMetadata, ActivityType};
pub use conversation::{Conversation, ConversationMessage, ConversationStarted, MessageRole};
pub use journal::{AnonymizedJournal, Journal, JournalInput, JournalType};
pub use mood::{Mood, MoodLabel};
pub use user::User;
