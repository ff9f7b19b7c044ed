use chrono::{DateTime, Utc};

/// Admin entity - an operator allowed to manage posts and jobs.
///
/// Deliberately not `Serialize`: the password hash never leaves the server.
#[derive(Debug, Clone)]
pub struct Admin {
    pub id: i32,
    pub username: String,
    pub password_hash: String,
    pub email: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Admin row about to be provisioned.
#[derive(Debug, Clone)]
pub struct NewAdmin {
    pub username: String,
    pub password_hash: String,
    pub email: Option<String>,
}
