use anyhow::{Context, Result};
use rusqlite::{params, Row};

use crate::db::{
    connection::Database,
    helpers::{format_datetime, parse_datetime},
    models::User,
};

fn row_to_user(row: &Row) -> Result<User> {
    let created_at: String = row.get("created_at")?;

    Ok(User {
        id: row.get("id")?,
        name: row.get("name")?,
        email: row.get("email")?,
        student_level: row.get("student_level")?,
        study_field: row.get("study_field")?,
        created_at: parse_datetime(&created_at, "created_at")?,
    })
}

impl Database {
    pub async fn insert_user(&self, user: &User) -> Result<()> {
        let record = user.clone();
        self.execute(move |conn| {
            conn.execute(
                "INSERT INTO users (id, name, email, student_level, study_field, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                params![
                    record.id,
                    record.name,
                    record.email,
                    record.student_level,
                    record.study_field,
                    format_datetime(&record.created_at),
                ],
            )
            .with_context(|| "failed to insert user")?;
            Ok(())
        })
        .await
    }

    /// Resolve a contact key to a stored profile.
    pub async fn find_user_by_email(&self, email: &str) -> Result<Option<User>> {
        let email = email.to_string();
        self.execute(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT id, name, email, student_level, study_field, created_at
                 FROM users
                 WHERE email = ?1",
            )?;
            let mut rows = stmt.query(params![email])?;
            match rows.next()? {
                Some(row) => Ok(Some(row_to_user(row)?)),
                None => Ok(None),
            }
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use crate::db::{test_support::open_with_user, User};

    #[tokio::test]
    async fn finds_user_by_email() {
        let (_dir, db, user) = open_with_user("ada@uni.edu").await;

        let found = db.find_user_by_email("ada@uni.edu").await.unwrap().unwrap();
        assert_eq!(found.id, user.id);
        assert_eq!(found.name.as_deref(), Some("Ada"));

        assert!(db.find_user_by_email("nobody@uni.edu").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn duplicate_email_is_rejected() {
        let (_dir, db, _user) = open_with_user("ada@uni.edu").await;
        let twin = User::new(None, Some("ada@uni.edu".to_string()));
        assert!(db.insert_user(&twin).await.is_err());
    }
}
