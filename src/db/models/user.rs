//! Student profile model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub name: Option<String>,
    /// Contact key used to resolve an authenticated identity to this profile.
    pub email: Option<String>,
    pub student_level: Option<String>,
    pub study_field: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl User {
    pub fn new(name: Option<String>, email: Option<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name,
            email,
            student_level: None,
            study_field: None,
            created_at: Utc::now(),
        }
    }
}
