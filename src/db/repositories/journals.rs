use anyhow::{Context, Result};
use rusqlite::{params, Row};

use crate::db::{
    connection::Database,
    helpers::{decode_list, encode_list, format_datetime, parse_datetime, to_u32},
    models::{AnonymizedJournal, Journal, JournalType},
};

pub const DEFAULT_JOURNAL_LIMIT: usize = 20;
pub const DEFAULT_RESEARCH_LIMIT: usize = 50;

const JOURNAL_COLUMNS: &str = "id, user_id, title, content, journal_type, mood, tags, is_encrypted, word_count, research_consent, created_at";

fn row_to_journal(row: &Row) -> Result<Journal> {
    let journal_type: String = row.get("journal_type")?;
    let mood: Option<String> = row.get("mood")?;
    let tags: Option<String> = row.get("tags")?;
    let word_count: i64 = row.get("word_count")?;
    let created_at: String = row.get("created_at")?;

    Ok(Journal {
        id: row.get("id")?,
        user_id: row.get("user_id")?,
        title: row.get("title")?,
        content: row.get("content")?,
        journal_type: journal_type.parse()?,
        // Unrecognized legacy labels are dropped rather than failing the read.
        mood: mood.and_then(|raw| raw.parse().ok()),
        tags: decode_list(tags, "tags")?,
        is_encrypted: row.get("is_encrypted")?,
        word_count: to_u32(word_count, "word_count")?,
        research_consent: row.get("research_consent")?,
        created_at: parse_datetime(&created_at, "created_at")?,
    })
}

impl Database {
    pub async fn insert_journal(&self, journal: &Journal) -> Result<()> {
        let record = journal.clone();
        self.execute(move |conn| {
            conn.execute(
                "INSERT INTO journals (id, user_id, title, content, journal_type, mood, tags, is_encrypted, word_count, research_consent, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
                params![
                    record.id,
                    record.user_id,
                    record.title,
                    record.content,
                    record.journal_type.as_str(),
                    record.mood.map(|m| m.as_str()),
                    encode_list(&record.tags)?,
                    record.is_encrypted,
                    record.word_count,
                    record.research_consent,
                    format_datetime(&record.created_at),
                ],
            )
            .with_context(|| "failed to insert journal")?;
            Ok(())
        })
        .await
    }

    /// Most recent entries first, optionally restricted to one journal type.
    pub async fn get_user_journals(
        &self,
        user_id: &str,
        journal_type: Option<JournalType>,
        limit: usize,
    ) -> Result<Vec<Journal>> {
        let user_id = user_id.to_string();
        self.execute(move |conn| {
            let mut journals = Vec::new();
            match journal_type {
                Some(kind) => {
                    let mut stmt = conn.prepare(&format!(
                        "SELECT {JOURNAL_COLUMNS} FROM journals
                         WHERE user_id = ?1 AND journal_type = ?2
                         ORDER BY created_at DESC, rowid DESC
                         LIMIT ?3"
                    ))?;
                    let mut rows = stmt.query(params![user_id, kind.as_str(), limit as i64])?;
                    while let Some(row) = rows.next()? {
                        journals.push(row_to_journal(row)?);
                    }
                }
                None => {
                    let mut stmt = conn.prepare(&format!(
                        "SELECT {JOURNAL_COLUMNS} FROM journals
                         WHERE user_id = ?1
                         ORDER BY created_at DESC, rowid DESC
                         LIMIT ?2"
                    ))?;
                    let mut rows = stmt.query(params![user_id, limit as i64])?;
                    while let Some(row) = rows.next()? {
                        journals.push(row_to_journal(row)?);
                    }
                }
            }
            Ok(journals)
        })
        .await
    }

    pub async fn get_all_journals(&self, user_id: &str) -> Result<Vec<Journal>> {
        let user_id = user_id.to_string();
        self.execute(move |conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {JOURNAL_COLUMNS} FROM journals
                 WHERE user_id = ?1
                 ORDER BY created_at DESC, rowid DESC"
            ))?;
            let mut rows = stmt.query(params![user_id])?;
            let mut journals = Vec::new();
            while let Some(row) = rows.next()? {
                journals.push(row_to_journal(row)?);
            }
            Ok(journals)
        })
        .await
    }

    /// Consented entries across all users, newest first, stripped of anything
    /// that identifies the author.
    pub async fn get_research_journals(&self, limit: usize) -> Result<Vec<AnonymizedJournal>> {
        self.execute(move |conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {JOURNAL_COLUMNS} FROM journals
                 WHERE research_consent = 1
                 ORDER BY created_at DESC, rowid DESC
                 LIMIT ?1"
            ))?;
            let mut rows = stmt.query(params![limit as i64])?;
            let mut journals = Vec::new();
            while let Some(row) = rows.next()? {
                journals.push(AnonymizedJournal::from(row_to_journal(row)?));
            }
            Ok(journals)
        })
        .await
    }

    /// `title content` of the most recent entries, newest first.
    pub async fn get_recent_journal_texts(&self, user_id: &str, limit: usize) -> Result<Vec<String>> {
        let user_id = user_id.to_string();
        self.execute(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT title, content FROM journals
                 WHERE user_id = ?1
                 ORDER BY created_at DESC, rowid DESC
                 LIMIT ?2",
            )?;
            let texts = stmt
                .query_map(params![user_id, limit as i64], |row| {
                    let title: String = row.get(0)?;
                    let content: String = row.get(1)?;
                    Ok(format!("{title} {content}"))
                })?
                .collect::<Result<Vec<_>, _>>()
                .with_context(|| "failed to read journal texts")?;
            Ok(texts)
        })
        .await
    }
}
