use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Post entity - a blog article addressed publicly by its slug.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Post {
    pub id: i32,
    pub title: String,
    pub excerpt: String,
    pub content: String,
    pub author: String,
    pub category: String,
    pub icon: String,
    pub slug: String,
    pub created_at: DateTime<Utc>,
}

/// A validated post, ready to be persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct NewPost {
    pub title: String,
    pub excerpt: String,
    pub content: String,
    pub author: String,
    pub category: String,
    pub icon: String,
    pub slug: String,
}
