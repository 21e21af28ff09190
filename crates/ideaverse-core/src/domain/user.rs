use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::metadata::Metadata;

/// User entity - a registered account.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub email: String,
    pub username: String,
    pub full_name: Option<String>,
    pub phone_number: Option<String>,
    pub profile_picture: Option<String>,
    pub bio: Option<String>,
    /// Absent for accounts created through a social provider.
    pub password_hash: Option<String>,
    pub social_provider: Option<String>,
    pub is_active: bool,
    pub is_verified: bool,
    pub credits: i64,
    pub preferences: Metadata,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub last_login: Option<DateTime<Utc>>,
}

impl User {
    /// Create a new, active, unverified user with generated ID and timestamps.
    pub fn new(email: String, username: String, password_hash: Option<String>) -> Self {
        let now = Utc::now();
        Self {
            id: super::new_id(),
            email,
            username,
            full_name: None,
            phone_number: None,
            profile_picture: None,
            bio: None,
            password_hash,
            social_provider: None,
            is_active: true,
            is_verified: false,
            credits: 0,
            preferences: Metadata::new(),
            created_at: now,
            updated_at: now,
            last_login: None,
        }
    }

    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}
