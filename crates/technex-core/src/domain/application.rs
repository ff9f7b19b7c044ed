use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Application entity - a job application with an attached resume.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Application {
    pub id: i32,
    pub job_title: String,
    pub name: String,
    pub email: String,
    pub resume_path: String,
    pub portfolio_url: Option<String>,
    pub cover_letter: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Validated application fields, still waiting for the stored resume.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ApplicationDraft {
    pub job_title: String,
    pub name: String,
    pub email: String,
    pub portfolio_url: Option<String>,
    pub cover_letter: Option<String>,
}

impl ApplicationDraft {
    /// Complete the draft with the relative path of the stored resume.
    pub fn attach_resume(self, resume_path: impl Into<String>) -> NewApplication {
        NewApplication {
            job_title: self.job_title,
            name: self.name,
            email: self.email,
            resume_path: resume_path.into(),
            portfolio_url: self.portfolio_url,
            cover_letter: self.cover_letter,
        }
    }
}

/// An application ready to be persisted.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewApplication {
    pub job_title: String,
    pub name: String,
    pub email: String,
    pub resume_path: String,
    pub portfolio_url: Option<String>,
    pub cover_letter: Option<String>,
}
