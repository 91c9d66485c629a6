use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use rusqlite::{params, Row};

use crate::db::{
    connection::Database,
    helpers::{format_datetime, parse_datetime, to_u32},
    models::{Activity, ActivityMetadata, ActivityType},
};

pub const DEFAULT_ACTIVITY_LIMIT: usize = 50;

const ACTIVITY_COLUMNS: &str =
    "id, user_id, activity_type, duration_minutes, completed, effectiveness, notes, metadata, created_at";

fn row_to_activity(row: &Row) -> Result<Activity> {
    let activity_type: String = row.get("activity_type")?;
    let duration: i64 = row.get("duration_minutes")?;
    let effectiveness: Option<i64> = row.get("effectiveness")?;
    let metadata: Option<String> = row.get("metadata")?;
    let created_at: String = row.get("created_at")?;

    Ok(Activity {
        id: row.get("id")?,
        user_id: row.get("user_id")?,
        activity_type: activity_type.parse()?,
        duration: to_u32(duration, "duration_minutes")?,
        completed: row.get("completed")?,
        effectiveness: effectiveness
            .map(|value| to_u32(value, "effectiveness"))
            .transpose()?,
        notes: row.get("notes")?,
        metadata: metadata
            .map(|raw| serde_json::from_str::<ActivityMetadata>(&raw))
            .transpose()
            .context("failed to parse metadata")?,
        created_at: parse_datetime(&created_at, "created_at")?,
    })
}

impl Database {
    pub async fn insert_activity(&self, activity: &Activity) -> Result<()> {
        let record = activity.clone();
        self.execute(move |conn| {
            let metadata = record
                .metadata
                .as_ref()
                .map(serde_json::to_string)
                .transpose()
                .context("failed to encode metadata")?;
            conn.execute(
                "INSERT INTO activities (id, user_id, activity_type, duration_minutes, completed, effectiveness, notes, metadata, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
                params![
                    record.id,
                    record.user_id,
                    record.activity_type.as_str(),
                    record.duration,
                    record.completed,
                    record.effectiveness,
                    record.notes,
                    metadata,
                    format_datetime(&record.created_at),
                ],
            )
            .with_context(|| "failed to insert activity")?;
            Ok(())
        })
        .await
    }

    /// Most recent sessions first, optionally restricted to one activity type.
    pub async fn get_user_activities(
        &self,
        user_id: &str,
        activity_type: Option<ActivityType>,
        limit: usize,
    ) -> Result<Vec<Activity>> {
        let user_id = user_id.to_string();
        self.execute(move |conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {ACTIVITY_COLUMNS} FROM activities
                 WHERE user_id = ?1 AND (?2 IS NULL OR activity_type = ?2)
                 ORDER BY created_at DESC, rowid DESC
                 LIMIT ?3"
            ))?;
            let kind = activity_type.map(|k| k.as_str());
            let mut rows = stmt.query(params![user_id, kind, limit as i64])?;
            let mut activities = Vec::new();
            while let Some(row) = rows.next()? {
                activities.push(row_to_activity(row)?);
            }
            Ok(activities)
        })
        .await
    }

    /// Sessions logged at or after `cutoff`, oldest first.
    pub async fn get_activities_since(
        &self,
        user_id: &str,
        cutoff: DateTime<Utc>,
    ) -> Result<Vec<Activity>> {
        let user_id = user_id.to_string();
        self.execute(move |conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {ACTIVITY_COLUMNS} FROM activities
                 WHERE user_id = ?1 AND created_at >= ?2
                 ORDER BY created_at ASC, rowid ASC"
            ))?;
            let mut rows = stmt.query(params![user_id, format_datetime(&cutoff)])?;
            let mut activities = Vec::new();
            while let Some(row) = rows.next()? {
                activities.push(row_to_activity(row)?);
            }
            Ok(activities)
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, Utc};

    use super::DEFAULT_ACTIVITY_LIMIT;
    use crate::db::{test_support::open_with_user, Activity, ActivityMetadata, ActivityType};

    #[tokio::test]
    async fn activities_filter_by_type_newest_first() {
        let (_dir, db, user) = open_with_user("ada@uni.edu").await;
        let base = Utc::now() - Duration::days(2);

        let kinds = [
            ActivityType::Breathing,
            ActivityType::Music,
            ActivityType::Breathing,
        ];
        for (i, kind) in kinds.into_iter().enumerate() {
            let mut activity = Activity::new(&user.id, kind, 5 + i as u32, i != 1);
            activity.created_at = base + Duration::hours(i as i64);
            activity.effectiveness = Some(7);
            activity.metadata = Some(ActivityMetadata {
                interruptions: Some(i as u32),
                ..ActivityMetadata::default()
            });
            db.insert_activity(&activity).await.unwrap();
        }

        let all = db
            .get_user_activities(&user.id, None, DEFAULT_ACTIVITY_LIMIT)
            .await
            .unwrap();
        assert_eq!(all.len(), 3);
        assert_eq!(all[0].duration, 7);
        assert_eq!(all[1].activity_type, ActivityType::Music);
        assert!(!all[1].completed);
        assert_eq!(all[0].effectiveness, Some(7));
        assert_eq!(all[0].metadata.as_ref().unwrap().interruptions, Some(2));

        let breathing = db
            .get_user_activities(&user.id, Some(ActivityType::Breathing), 1)
            .await
            .unwrap();
        assert_eq!(breathing.len(), 1);
        assert_eq!(breathing[0].duration, 7);
    }

    #[tokio::test]
    async fn window_reads_skip_older_sessions() {
        let (_dir, db, user) = open_with_user("ada@uni.edu").await;
        let now = Utc::now();

        let mut old = Activity::new(&user.id, ActivityType::Meditation, 10, true);
        old.created_at = now - Duration::days(40);
        db.insert_activity(&old).await.unwrap();
        let recent = Activity::new(&user.id, ActivityType::Mindfulness, 3, false);
        db.insert_activity(&recent).await.unwrap();

        let window = db
            .get_activities_since(&user.id, now - Duration::days(30))
            .await
            .unwrap();
        assert_eq!(window.len(), 1);
        assert_eq!(window[0].id, recent.id);
        assert!(window[0].metadata.is_none());
    }
}
