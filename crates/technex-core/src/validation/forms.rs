//! Rule sets for the four writable endpoints.

use std::sync::LazyLock;

use regex::Regex;
use serde::Deserialize;

use super::{ValidationErrors, Validator};
use crate::domain::{ApplicationDraft, JobTag, JobType, NewContact, NewJob, NewPost};

static PERSON_NAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z\s\-']+$").expect("name pattern compiles"));
static ICON_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^fa-[a-z-]+$").expect("icon pattern compiles"));
static SLUG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z0-9-]+$").expect("slug pattern compiles"));

const NAME_REQUIRED: &str = "Name is required";
const NAME_LENGTH: &str = "Name must be between 2 and 100 characters";
const NAME_CHARSET: &str = "Name can only contain letters, spaces, hyphens and apostrophes";
const EMAIL_REQUIRED: &str = "Email is required";
const EMAIL_INVALID: &str = "Please provide a valid email address";

/// Contact form submission as received.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ContactForm {
    pub name: Option<String>,
    pub email: Option<String>,
    pub company: Option<String>,
    pub project: Option<String>,
    pub message: Option<String>,
}

impl ContactForm {
    pub fn validate(self) -> Result<NewContact, ValidationErrors> {
        let mut v = Validator::default();

        let name = v
            .field("name", self.name)
            .required(NAME_REQUIRED)
            .length(2, 100, NAME_LENGTH)
            .matches(&PERSON_NAME_RE, NAME_CHARSET)
            .into_value();
        let email = v
            .field("email", self.email)
            .required(EMAIL_REQUIRED)
            .email(EMAIL_INVALID)
            .into_value();
        let company = v
            .field("company", self.company)
            .max_length(100, "Company name must be less than 100 characters")
            .into_value();
        let project = v
            .field("project", self.project)
            .max_length(200, "Project type must be less than 200 characters")
            .into_value();
        let message = v
            .field("message", self.message)
            .required("Message is required")
            .length(10, 2000, "Message must be between 10 and 2000 characters")
            .into_value();

        v.finish(|| NewContact {
            name: name.unwrap_or_default(),
            email: email.unwrap_or_default(),
            company,
            project,
            message: message.unwrap_or_default(),
        })
    }
}

/// Text fields of a job application. The resume travels separately.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ApplicationForm {
    pub job_title: Option<String>,
    pub name: Option<String>,
    pub email: Option<String>,
    pub portfolio: Option<String>,
    pub cover_letter: Option<String>,
}

impl ApplicationForm {
    /// Assign a multipart text field by name. Returns `false` for unknown names.
    pub fn set_field(&mut self, name: &str, value: String) -> bool {
        let slot = match name {
            "job_title" => &mut self.job_title,
            "name" => &mut self.name,
            "email" => &mut self.email,
            "portfolio" => &mut self.portfolio,
            "cover_letter" => &mut self.cover_letter,
            _ => return false,
        };
        *slot = Some(value);
        true
    }

    pub fn validate(self) -> Result<ApplicationDraft, ValidationErrors> {
        let mut v = Validator::default();

        let job_title = v
            .field("job_title", self.job_title)
            .required("Job title is required")
            .max_length(200, "Job title is too long")
            .into_value();
        let name = v
            .field("name", self.name)
            .required(NAME_REQUIRED)
            .length(2, 100, NAME_LENGTH)
            .matches(&PERSON_NAME_RE, NAME_CHARSET)
            .into_value();
        let email = v
            .field("email", self.email)
            .required(EMAIL_REQUIRED)
            .email(EMAIL_INVALID)
            .into_value();
        let portfolio_url = v
            .field("portfolio", self.portfolio)
            .url("Please provide a valid URL for portfolio")
            .into_value();
        let cover_letter = v
            .field("cover_letter", self.cover_letter)
            .max_length(5000, "Cover letter is too long")
            .into_value();

        v.finish(|| ApplicationDraft {
            job_title: job_title.unwrap_or_default(),
            name: name.unwrap_or_default(),
            email: email.unwrap_or_default(),
            portfolio_url,
            cover_letter,
        })
    }
}

/// Blog post as submitted by an admin.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct PostForm {
    pub title: Option<String>,
    pub excerpt: Option<String>,
    pub content: Option<String>,
    pub author: Option<String>,
    pub category: Option<String>,
    pub icon: Option<String>,
    pub slug: Option<String>,
}

impl PostForm {
    pub fn validate(self) -> Result<NewPost, ValidationErrors> {
        let mut v = Validator::default();

        let title = v
            .field("title", self.title)
            .required("Title is required")
            .length(5, 200, "Title must be between 5 and 200 characters")
            .into_value();
        let excerpt = v
            .field("excerpt", self.excerpt)
            .required("Excerpt is required")
            .length(10, 500, "Excerpt must be between 10 and 500 characters")
            .into_value();
        let content = v
            .field("content", self.content)
            .required("Content is required")
            .min_length(50, "Content must be at least 50 characters")
            .into_value();
        let author = v
            .field("author", self.author)
            .required("Author is required")
            .max_length(100, "Author name is too long")
            .into_value();
        let category = v
            .field("category", self.category)
            .required("Category is required")
            .max_length(50, "Category is too long")
            .into_value();
        let icon = v
            .field("icon", self.icon)
            .required("Icon is required")
            .matches(&ICON_RE, "Invalid icon format")
            .into_value();
        let slug = v
            .field("slug", self.slug)
            .required("Slug is required")
            .matches(
                &SLUG_RE,
                "Slug can only contain lowercase letters, numbers, and hyphens",
            )
            .max_length(200, "Slug is too long")
            .into_value();

        v.finish(|| NewPost {
            title: title.unwrap_or_default(),
            excerpt: excerpt.unwrap_or_default(),
            content: content.unwrap_or_default(),
            author: author.unwrap_or_default(),
            category: category.unwrap_or_default(),
            icon: icon.unwrap_or_default(),
            slug: slug.unwrap_or_default(),
        })
    }
}

/// Job listing as submitted by an admin.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct JobForm {
    pub title: Option<String>,
    pub tag: Option<String>,
    pub location: Option<String>,
    #[serde(rename = "type")]
    pub job_type: Option<String>,
    pub description: Option<String>,
}

impl JobForm {
    pub fn validate(self) -> Result<NewJob, ValidationErrors> {
        let tags = JobTag::ALL.map(|t| t.as_str());
        let types = JobType::ALL.map(|t| t.as_str());
        let mut v = Validator::default();

        let title = v
            .field("title", self.title)
            .required("Title is required")
            .length(5, 200, "Title must be between 5 and 200 characters")
            .into_value();
        let tag = v
            .field("tag", self.tag)
            .required("Tag is required")
            .one_of(&tags, "Invalid tag")
            .into_value()
            .and_then(|t| t.parse::<JobTag>().ok());
        let location = v
            .field("location", self.location)
            .required("Location is required")
            .max_length(100, "Location is too long")
            .into_value();
        let job_type = v
            .field("type", self.job_type)
            .required("Type is required")
            .one_of(&types, "Invalid job type")
            .into_value()
            .and_then(|t| t.parse::<JobType>().ok());
        let description = v
            .field("description", self.description)
            .required("Description is required")
            .length(
                20,
                2000,
                "Description must be between 20 and 2000 characters",
            )
            .into_value();

        v.finish(|| NewJob {
            title: title.unwrap_or_default(),
            tag: tag.unwrap_or(JobTag::Other),
            location: location.unwrap_or_default(),
            job_type: job_type.unwrap_or(JobType::FullTime),
            description: description.unwrap_or_default(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn contact() -> ContactForm {
        ContactForm {
            name: Some("Jane O'Neil-Smith".into()),
            email: Some("jane@example.com".into()),
            company: Some("".into()),
            project: None,
            message: Some("We would like a quote for a new website.".into()),
        }
    }

    #[test]
    fn test_valid_contact() {
        let new = contact().validate().unwrap();
        assert_eq!(new.name, "Jane O'Neil-Smith");
        assert_eq!(new.company, None);
    }

    #[test]
    fn test_contact_missing_message() {
        let form = ContactForm {
            message: None,
            ..contact()
        };
        let errors = form.validate().unwrap_err();
        assert_eq!(errors.fields().collect::<Vec<_>>(), vec!["message"]);
        assert_eq!(errors.errors()[0].message, "Message is required");
    }

    #[test]
    fn test_contact_reports_every_bad_field() {
        let form = ContactForm {
            name: Some("R2D2".into()),
            email: Some("not-an-email".into()),
            company: Some("x".repeat(101)),
            project: None,
            message: Some("short".into()),
        };
        let errors = form.validate().unwrap_err();
        assert_eq!(
            errors.fields().collect::<Vec<_>>(),
            vec!["name", "email", "company", "message"]
        );
    }

    #[test]
    fn test_application_portfolio_must_be_url() {
        let form = ApplicationForm {
            job_title: Some("Backend Engineer".into()),
            name: Some("Sam Lee".into()),
            email: Some("sam@example.com".into()),
            portfolio: Some("definitely not a url".into()),
            cover_letter: None,
        };
        let errors = form.validate().unwrap_err();
        assert_eq!(errors.fields().collect::<Vec<_>>(), vec!["portfolio"]);
    }

    #[test]
    fn test_application_set_field() {
        let mut form = ApplicationForm::default();
        assert!(form.set_field("job_title", "Designer".into()));
        assert!(!form.set_field("resume", "x".into()));
        assert_eq!(form.job_title.as_deref(), Some("Designer"));
    }

    #[test]
    fn test_post_slug_pattern() {
        let form = PostForm {
            title: Some("Shipping Rust services".into()),
            excerpt: Some("What we learned along the way.".into()),
            content: Some("c".repeat(60)),
            author: Some("TechNex Team".into()),
            category: Some("Engineering".into()),
            icon: Some("fa-rocket".into()),
            slug: Some("Shipping Rust!".into()),
        };
        let errors = form.validate().unwrap_err();
        assert_eq!(errors.fields().collect::<Vec<_>>(), vec!["slug"]);
    }

    #[test]
    fn test_job_enumerations() {
        let form = JobForm {
            title: Some("Senior Designer".into()),
            tag: Some("Design".into()),
            location: Some("Lahore".into()),
            job_type: Some("Part-time".into()),
            description: Some("Own the visual language of our products.".into()),
        };
        let job = form.clone().validate().unwrap();
        assert_eq!(job.tag, JobTag::Design);
        assert_eq!(job.job_type, JobType::PartTime);

        let bad = JobForm {
            tag: Some("Legal".into()),
            job_type: Some("Internship".into()),
            ..form
        };
        let errors = bad.validate().unwrap_err();
        assert_eq!(errors.fields().collect::<Vec<_>>(), vec!["tag", "type"]);
    }
}
