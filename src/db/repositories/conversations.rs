use anyhow::{anyhow, Context, Result};
use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension, Row};
use uuid::Uuid;

use crate::db::{
    connection::Database,
    helpers::{format_datetime, parse_datetime},
    models::{Conversation, ConversationMessage, ConversationStarted, MessageRole, User},
};

pub const DEFAULT_CONVERSATION_LIMIT: usize = 10;

const NEW_CONVERSATION_SUMMARY: &str = "New conversation started";

/// Opening line Kai sends at the start of every conversation.
pub fn kai_greeting(name: Option<&str>) -> String {
    format!(
        "Hi {}! I'm Kai, your AI wellness companion. I'm here to support you through your student journey. How are you feeling today?",
        name.unwrap_or("there")
    )
}

fn row_to_conversation(row: &Row) -> Result<Conversation> {
    let created_at: String = row.get("created_at")?;
    let updated_at: String = row.get("updated_at")?;

    Ok(Conversation {
        id: row.get("id")?,
        user_id: row.get("user_id")?,
        session_id: row.get("session_id")?,
        summary: row.get("summary")?,
        created_at: parse_datetime(&created_at, "created_at")?,
        updated_at: parse_datetime(&updated_at, "updated_at")?,
        messages: Vec::new(),
    })
}

fn row_to_message(row: &Row) -> Result<ConversationMessage> {
    let role: String = row.get("role")?;
    let created_at: String = row.get("created_at")?;

    Ok(ConversationMessage {
        id: row.get("id")?,
        conversation_id: row.get("conversation_id")?,
        role: role.parse()?,
        content: row.get("content")?,
        emotion: row.get("emotion")?,
        created_at: parse_datetime(&created_at, "created_at")?,
    })
}

fn insert_message(
    conn: &Connection,
    conversation_id: &str,
    role: MessageRole,
    content: &str,
    emotion: Option<&str>,
) -> Result<ConversationMessage> {
    let now = Utc::now();
    conn.execute(
        "INSERT INTO conversation_messages (conversation_id, role, content, emotion, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![conversation_id, role.as_str(), content, emotion, format_datetime(&now)],
    )
    .with_context(|| "failed to insert conversation message")?;

    Ok(ConversationMessage {
        id: conn.last_insert_rowid(),
        conversation_id: conversation_id.to_string(),
        role,
        content: content.to_string(),
        emotion: emotion.map(str::to_string),
        created_at: now,
    })
}

impl Database {
    /// Open a new session with Kai's greeting, followed by the student's
    /// first message when one is given.
    pub async fn start_conversation(
        &self,
        user: &User,
        initial_message: Option<String>,
    ) -> Result<ConversationStarted> {
        let user_id = user.id.clone();
        let greeting = kai_greeting(user.name.as_deref());
        self.execute(move |conn| {
            let tx = conn.transaction()?;
            let now = format_datetime(&Utc::now());
            let conversation_id = Uuid::new_v4().to_string();
            let session_id = format!("session-{}", Uuid::new_v4().simple());

            tx.execute(
                "INSERT INTO conversations (id, user_id, session_id, summary, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                params![conversation_id, user_id, session_id, NEW_CONVERSATION_SUMMARY, now, now],
            )
            .with_context(|| "failed to insert conversation")?;

            insert_message(&tx, &conversation_id, MessageRole::Kai, &greeting, Some("friendly"))?;
            if let Some(message) = initial_message {
                insert_message(&tx, &conversation_id, MessageRole::User, &message, None)?;
            }

            tx.commit()?;
            Ok(ConversationStarted {
                session_id,
                conversation_id,
            })
        })
        .await
    }

    pub async fn add_message(
        &self,
        session_id: &str,
        role: MessageRole,
        content: String,
        emotion: Option<String>,
    ) -> Result<ConversationMessage> {
        let session_id = session_id.to_string();
        self.execute(move |conn| {
            let tx = conn.transaction()?;
            let conversation_id: String = tx
                .query_row(
                    "SELECT id FROM conversations WHERE session_id = ?1",
                    params![session_id],
                    |row| row.get(0),
                )
                .optional()?
                .ok_or_else(|| anyhow!("Conversation not found"))?;

            let message =
                insert_message(&tx, &conversation_id, role, &content, emotion.as_deref())?;
            tx.execute(
                "UPDATE conversations SET updated_at = ?1 WHERE id = ?2",
                params![format_datetime(&message.created_at), conversation_id],
            )?;
            tx.commit()?;
            Ok(message)
        })
        .await
    }

    /// A conversation with its messages in the order they were sent.
    pub async fn get_conversation(&self, session_id: &str) -> Result<Option<Conversation>> {
        let session_id = session_id.to_string();
        self.execute(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT id, user_id, session_id, summary, created_at, updated_at
                 FROM conversations
                 WHERE session_id = ?1",
            )?;
            let mut rows = stmt.query(params![session_id])?;
            let mut conversation = match rows.next()? {
                Some(row) => row_to_conversation(row)?,
                None => return Ok(None),
            };

            let mut stmt = conn.prepare(
                "SELECT id, conversation_id, role, content, emotion, created_at
                 FROM conversation_messages
                 WHERE conversation_id = ?1
                 ORDER BY id ASC",
            )?;
            let mut rows = stmt.query(params![conversation.id])?;
            while let Some(row) = rows.next()? {
                conversation.messages.push(row_to_message(row)?);
            }
            Ok(Some(conversation))
        })
        .await
    }

    /// Most recently started conversations first, without messages.
    pub async fn get_user_conversations(
        &self,
        user_id: &str,
        limit: usize,
    ) -> Result<Vec<Conversation>> {
        let user_id = user_id.to_string();
        self.execute(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT id, user_id, session_id, summary, created_at, updated_at
                 FROM conversations
                 WHERE user_id = ?1
                 ORDER BY created_at DESC, rowid DESC
                 LIMIT ?2",
            )?;
            let mut rows = stmt.query(params![user_id, limit as i64])?;
            let mut conversations = Vec::new();
            while let Some(row) = rows.next()? {
                conversations.push(row_to_conversation(row)?);
            }
            Ok(conversations)
        })
        .await
    }

    /// Message texts for signal aggregation: conversations newest first, the
    /// last `per_conversation` messages of each, stopping once `cap` is
    /// reached. The cap is checked after each conversation, so the result can
    /// overshoot it by less than `per_conversation`.
    pub async fn get_recent_message_texts(
        &self,
        user_id: &str,
        per_conversation: usize,
        cap: usize,
    ) -> Result<Vec<String>> {
        let user_id = user_id.to_string();
        self.execute(move |conn| {
            let mut texts = Vec::new();
            if cap == 0 {
                return Ok(texts);
            }

            let mut conversations = conn.prepare(
                "SELECT id FROM conversations
                 WHERE user_id = ?1
                 ORDER BY created_at DESC, rowid DESC",
            )?;
            let mut tail = conn.prepare(
                "SELECT content FROM (
                     SELECT id, content FROM conversation_messages
                     WHERE conversation_id = ?1
                     ORDER BY id DESC
                     LIMIT ?2
                 ) ORDER BY id ASC",
            )?;

            let mut rows = conversations.query(params![user_id])?;
            while let Some(row) = rows.next()? {
                let conversation_id: String = row.get(0)?;
                let messages = tail
                    .query_map(params![conversation_id, per_conversation as i64], |row| {
                        row.get::<_, String>(0)
                    })?
                    .collect::<Result<Vec<_>, _>>()
                    .with_context(|| "failed to read conversation messages")?;
                texts.extend(messages);
                if texts.len() >= cap {
                    break;
                }
            }
            Ok(texts)
        })
        .await
    }
}
