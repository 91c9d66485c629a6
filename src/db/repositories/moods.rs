use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use rusqlite::{params, Row};

use crate::db::{
    connection::Database,
    helpers::{decode_list, encode_list, format_datetime, parse_datetime, to_u32},
    models::Mood,
};

pub const DEFAULT_MOOD_HISTORY_LIMIT: usize = 50;

fn row_to_mood(row: &Row) -> Result<Mood> {
    let intensity: i64 = row.get("intensity")?;
    let triggers: Option<String> = row.get("triggers")?;
    let created_at: String = row.get("created_at")?;

    Ok(Mood {
        id: row.get("id")?,
        user_id: row.get("user_id")?,
        mood: row.get("mood")?,
        intensity: to_u32(intensity, "intensity")?,
        notes: row.get("notes")?,
        triggers: decode_list(triggers, "triggers")?,
        detection_method: row.get("detection_method")?,
        created_at: parse_datetime(&created_at, "created_at")?,
    })
}

impl Database {
    pub async fn insert_mood(&self, mood: &Mood) -> Result<()> {
        let record = mood.clone();
        self.execute(move |conn| {
            conn.execute(
                "INSERT INTO moods (id, user_id, mood, intensity, notes, triggers, detection_method, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
                params![
                    record.id,
                    record.user_id,
                    record.mood,
                    record.intensity,
                    record.notes,
                    encode_list(&record.triggers)?,
                    record.detection_method,
                    format_datetime(&record.created_at),
                ],
            )
            .with_context(|| "failed to insert mood")?;
            Ok(())
        })
        .await
    }

    /// Most recent moods first.
    pub async fn get_user_moods(&self, user_id: &str, limit: usize) -> Result<Vec<Mood>> {
        let user_id = user_id.to_string();
        self.execute(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT id, user_id, mood, intensity, notes, triggers, detection_method, created_at
                 FROM moods
                 WHERE user_id = ?1
                 ORDER BY created_at DESC, rowid DESC
                 LIMIT ?2",
            )?;

            let mut rows = stmt.query(params![user_id, limit as i64])?;
            let mut moods = Vec::new();
            while let Some(row) = rows.next()? {
                moods.push(row_to_mood(row)?);
            }
            Ok(moods)
        })
        .await
    }

    /// Raw mood labels, most recent first, for signal aggregation.
    pub async fn get_recent_mood_labels(&self, user_id: &str, limit: usize) -> Result<Vec<String>> {
        let user_id = user_id.to_string();
        self.execute(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT mood FROM moods
                 WHERE user_id = ?1
                 ORDER BY created_at DESC, rowid DESC
                 LIMIT ?2",
            )?;

            let labels = stmt
                .query_map(params![user_id, limit as i64], |row| row.get::<_, String>(0))?
                .collect::<Result<Vec<_>, _>>()
                .with_context(|| "failed to read mood labels")?;
            Ok(labels)
        })
        .await
    }

    /// Moods recorded at or after `cutoff`, oldest first.
    pub async fn get_moods_since(&self, user_id: &str, cutoff: DateTime<Utc>) -> Result<Vec<Mood>> {
        let user_id = user_id.to_string();
        self.execute(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT id, user_id, mood, intensity, notes, triggers, detection_method, created_at
                 FROM moods
                 WHERE user_id = ?1 AND created_at >= ?2
                 ORDER BY created_at ASC, rowid ASC",
            )?;

            let mut rows = stmt.query(params![user_id, format_datetime(&cutoff)])?;
            let mut moods = Vec::new();
            while let Some(row) = rows.next()? {
                moods.push(row_to_mood(row)?);
            }
            Ok(moods)
        })
        .await
    }
}
