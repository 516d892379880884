use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Persisted user credential record. Created once at provisioning and
/// immutable afterwards; there is no password-change flow.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserRecord {
    pub id: i64,
    pub username: String,
    /// Hex-encoded random salt, unique per user
    pub salt: String,
    /// Hex-encoded PBKDF2 output
    pub hash: String,
}

/// Persisted article. `author_id` is stamped at creation from the
/// authenticated principal and never changes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArticleRecord {
    pub id: i64,
    pub title: String,
    pub content: String,
    pub author_id: i64,
    pub author_name: String,
    pub create_time: DateTime<Utc>,
    pub update_time: DateTime<Utc>,
}
