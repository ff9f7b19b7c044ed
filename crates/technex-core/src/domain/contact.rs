use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Contact entity - a message left through the website's contact form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Contact {
    pub id: i32,
    pub name: String,
    pub email: String,
    pub company: Option<String>,
    pub project: Option<String>,
    pub message: String,
    pub created_at: DateTime<Utc>,
}

/// A validated contact submission, ready to be persisted.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewContact {
    pub name: String,
    pub email: String,
    pub company: Option<String>,
    pub project: Option<String>,
    pub message: String,
}
