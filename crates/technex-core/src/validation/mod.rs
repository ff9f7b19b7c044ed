//! Submission validation.
//!
//! Each writable endpoint has a form type whose `validate` runs an ordered
//! list of field rules and either yields the typed value to persist or every
//! violated field. Validation is pure; it never touches stored state.

mod forms;

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;
use url::Url;

pub use forms::{ApplicationForm, ContactForm, JobForm, PostForm};

static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^[A-Za-z0-9.!#$%&'*+/=?^_`{|}~-]+@[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?(?:\.[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?)+$",
    )
    .expect("email pattern compiles")
});

/// One violated rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: &'static str,
    pub message: &'static str,
}

/// Every violated field of a submission, in rule order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationErrors {
    errors: Vec<FieldError>,
}

impl ValidationErrors {
    pub fn errors(&self) -> &[FieldError] {
        &self.errors
    }

    pub fn fields(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.errors.iter().map(|e| e.field)
    }

    /// All messages joined with `"; "`.
    pub fn summary(&self) -> String {
        self.errors
            .iter()
            .map(|e| e.message)
            .collect::<Vec<_>>()
            .join("; ")
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Validation failed: {}", self.summary())
    }
}

impl std::error::Error for ValidationErrors {}

/// Collects failures across the fields of one submission.
#[derive(Debug, Default)]
pub(crate) struct Validator {
    errors: Vec<FieldError>,
}

impl Validator {
    /// Start the rule chain for a field. The value is trimmed and an empty
    /// result counts as absent.
    pub(crate) fn field(&mut self, name: &'static str, raw: Option<String>) -> Field<'_> {
        let value = raw
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());

        Field {
            validator: self,
            name,
            value,
            failed: false,
        }
    }

    /// Build the output when no rule failed.
    pub(crate) fn finish<T>(self, build: impl FnOnce() -> T) -> Result<T, ValidationErrors> {
        if self.errors.is_empty() {
            Ok(build())
        } else {
            Err(ValidationErrors {
                errors: self.errors,
            })
        }
    }
}

/// Rule chain for one field. The first failing rule is recorded and the
/// remaining rules of the chain are skipped.
pub(crate) struct Field<'a> {
    validator: &'a mut Validator,
    name: &'static str,
    value: Option<String>,
    failed: bool,
}

impl Field<'_> {
    fn fail(&mut self, message: &'static str) {
        if !self.failed {
            self.failed = true;
            self.validator.errors.push(FieldError {
                field: self.name,
                message,
            });
        }
    }

    fn check(mut self, message: &'static str, ok: impl FnOnce(&str) -> bool) -> Self {
        if self.failed {
            return self;
        }
        if let Some(value) = self.value.as_deref() {
            if !ok(value) {
                self.fail(message);
            }
        }
        self
    }

    pub(crate) fn required(mut self, message: &'static str) -> Self {
        if self.value.is_none() {
            self.fail(message);
        }
        self
    }

    /// Inclusive bounds on the number of characters.
    pub(crate) fn length(self, min: usize, max: usize, message: &'static str) -> Self {
        self.check(message, |v| (min..=max).contains(&v.chars().count()))
    }

    pub(crate) fn min_length(self, min: usize, message: &'static str) -> Self {
        self.check(message, |v| v.chars().count() >= min)
    }

    pub(crate) fn max_length(self, max: usize, message: &'static str) -> Self {
        self.check(message, |v| v.chars().count() <= max)
    }

    pub(crate) fn matches(self, pattern: &Regex, message: &'static str) -> Self {
        self.check(message, |v| pattern.is_match(v))
    }

    pub(crate) fn email(mut self, message: &'static str) -> Self {
        self = self.check(message, |v| EMAIL_RE.is_match(v));
        if !self.failed {
            self.value = self.value.map(|v| v.to_lowercase());
        }
        self
    }

    pub(crate) fn url(self, message: &'static str) -> Self {
        self.check(message, is_http_url)
    }

    pub(crate) fn one_of(self, allowed: &[&str], message: &'static str) -> Self {
        self.check(message, |v| allowed.contains(&v))
    }

    pub(crate) fn into_value(self) -> Option<String> {
        self.value
    }
}

/// http(s) URL with a dotted host. The scheme may be left out.
fn is_http_url(raw: &str) -> bool {
    let candidate = if raw.contains("://") {
        raw.to_string()
    } else {
        format!("https://{raw}")
    };

    match Url::parse(&candidate) {
        Ok(url) => {
            matches!(url.scheme(), "http" | "https")
                && url
                    .host_str()
                    .is_some_and(|host| host.contains('.') && !host.ends_with('.'))
        }
        Err(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_reports_only_first_failure() {
        let mut v = Validator::default();
        let _ = v
            .field("name", Some("1".into()))
            .length(2, 100, "too short")
            .matches(&Regex::new("^[a-z]+$").unwrap(), "bad chars")
            .into_value();

        let errors = v.finish(|| ()).unwrap_err();
        assert_eq!(errors.errors().len(), 1);
        assert_eq!(errors.errors()[0].message, "too short");
    }

    #[test]
    fn test_blank_optional_field_is_absent() {
        let mut v = Validator::default();
        let company = v
            .field("company", Some("   ".into()))
            .max_length(3, "too long")
            .into_value();
        assert_eq!(company, None);
        assert!(v.finish(|| ()).is_ok());
    }

    #[test]
    fn test_email_is_lowercased() {
        let mut v = Validator::default();
        let email = v
            .field("email", Some(" Jane.Doe@Example.COM ".into()))
            .email("bad email")
            .into_value();
        assert_eq!(email.as_deref(), Some("jane.doe@example.com"));
    }

    #[test]
    fn test_is_http_url() {
        assert!(is_http_url("https://janedoe.dev"));
        assert!(is_http_url("github.com/janedoe"));
        assert!(is_http_url("http://portfolio.example.org/work?x=1"));
        assert!(!is_http_url("ftp://files.example.org"));
        assert!(!is_http_url("not a url"));
        assert!(!is_http_url("http://localhost"));
    }

    #[test]
    fn test_summary_joins_messages() {
        let mut v = Validator::default();
        let _ = v.field("a", None).required("A is required").into_value();
        let _ = v.field("b", None).required("B is required").into_value();
        let errors = v.finish(|| ()).unwrap_err();
        assert_eq!(errors.summary(), "A is required; B is required");
        assert_eq!(errors.fields().collect::<Vec<_>>(), vec!["a", "b"]);
    }
}
