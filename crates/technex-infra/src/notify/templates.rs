//! Plain-text notification templates.

use serde_json::Value;

use technex_core::ports::{MailError, Notification, OutgoingMail, TemplateKey};

const NOT_PROVIDED: &str = "Not provided";
const SIGNATURE: &str = "TechNex Solutions\nEmail: hellotechnex.21@gmail.com\nPhone: +92 328 9461384";

/// Renders notifications into addressed messages.
#[derive(Debug, Clone, Default)]
pub struct TemplateRenderer {
    admin_email: Option<String>,
}

impl TemplateRenderer {
    pub fn new(admin_email: Option<String>) -> Self {
        Self { admin_email }
    }

    pub fn render(&self, notification: &Notification) -> Result<OutgoingMail, MailError> {
        let data = Payload(&notification.payload);
        let key = notification.template;

        let to = if key.is_admin_facing() {
            self.admin_email
                .clone()
                .ok_or(MailError::MissingRecipient(key.as_str()))?
        } else {
            data.required("email")?.to_string()
        };

        let (subject, body) = match key {
            TemplateKey::ContactNotification => contact_notification(&data)?,
            TemplateKey::ContactConfirmation => contact_confirmation(&data)?,
            TemplateKey::ApplicationNotification => application_notification(&data)?,
            TemplateKey::ApplicationConfirmation => application_confirmation(&data)?,
        };

        Ok(OutgoingMail { to, subject, body })
    }
}

struct Payload<'a>(&'a Value);

impl Payload<'_> {
    fn optional(&self, key: &str) -> &str {
        self.0
            .get(key)
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
            .unwrap_or(NOT_PROVIDED)
    }

    fn required(&self, key: &str) -> Result<&str, MailError> {
        self.0
            .get(key)
            .and_then(Value::as_str)
            .ok_or_else(|| MailError::Template(format!("payload has no `{key}`")))
    }
}

fn contact_notification(data: &Payload<'_>) -> Result<(String, String), MailError> {
    let name = data.required("name")?;
    let subject = format!("New Contact Form Submission - {name}");
    let body = format!(
        "New Contact Form Submission\n\n\
         Name: {name}\n\
         Email: {}\n\
         Company: {}\n\
         Project Type: {}\n\n\
         Message:\n{}\n",
        data.required("email")?,
        data.optional("company"),
        data.optional("project"),
        data.required("message")?,
    );
    Ok((subject, body))
}

fn contact_confirmation(data: &Payload<'_>) -> Result<(String, String), MailError> {
    let subject = "Thank you for contacting TechNex Solutions".to_string();
    let body = format!(
        "Hi {},\n\n\
         We've received your message and our team will get back to you within 24 hours.\n\n\
         Your message:\n{}\n\n\
         Best regards,\nTechNex Solutions Team\n\n{SIGNATURE}\n",
        data.required("name")?,
        data.required("message")?,
    );
    Ok((subject, body))
}

fn application_notification(data: &Payload<'_>) -> Result<(String, String), MailError> {
    let job_title = data.required("job_title")?;
    let subject = format!("New Job Application - {job_title}");
    let body = format!(
        "New Job Application\n\n\
         Position: {job_title}\n\
         Name: {}\n\
         Email: {}\n\
         Portfolio: {}\n\
         Resume: {}\n\n\
         Cover Letter:\n{}\n",
        data.required("name")?,
        data.required("email")?,
        data.optional("portfolio_url"),
        data.optional("resume_path"),
        data.optional("cover_letter"),
    );
    Ok((subject, body))
}

fn application_confirmation(data: &Payload<'_>) -> Result<(String, String), MailError> {
    let job_title = data.required("job_title")?;
    let subject = format!("Application Received - {job_title}");
    let body = format!(
        "Hi {},\n\n\
         Thank you for applying for the {job_title} position at TechNex Solutions.\n\
         Our hiring team will review your application within 5-7 business days and \
         qualified candidates will be contacted for an initial interview.\n\n\
         Best of luck!\nTechNex Solutions Hiring Team\n\n{SIGNATURE}\n",
        data.required("name")?,
    );
    Ok((subject, body))
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn contact_payload() -> Value {
        json!({
            "name": "Jane Doe",
            "email": "jane@example.com",
            "company": null,
            "project": "E-commerce",
            "message": "We need a new storefront."
        })
    }

    #[test]
    fn test_admin_notification_goes_to_admin() {
        let renderer = TemplateRenderer::new(Some("ops@technex.example".into()));
        let mail = renderer
            .render(&Notification::new(
                TemplateKey::ContactNotification,
                contact_payload(),
            ))
            .unwrap();

        assert_eq!(mail.to, "ops@technex.example");
        assert_eq!(mail.subject, "New Contact Form Submission - Jane Doe");
        assert!(mail.body.contains("Company: Not provided"));
        assert!(mail.body.contains("Project Type: E-commerce"));
    }

    #[test]
    fn test_confirmation_goes_to_submitter() {
        let renderer = TemplateRenderer::default();
        let mail = renderer
            .render(&Notification::new(
                TemplateKey::ContactConfirmation,
                contact_payload(),
            ))
            .unwrap();

        assert_eq!(mail.to, "jane@example.com");
        assert!(mail.body.starts_with("Hi Jane Doe,"));
    }

    #[test]
    fn test_admin_notification_without_admin_email_fails() {
        let renderer = TemplateRenderer::default();
        let result = renderer.render(&Notification::new(
            TemplateKey::ApplicationNotification,
            json!({"job_title": "Designer", "name": "Sam", "email": "sam@example.com"}),
        ));
        assert!(matches!(result, Err(MailError::MissingRecipient(_))));
    }

    #[test]
    fn test_application_confirmation_subject() {
        let renderer = TemplateRenderer::default();
        let mail = renderer
            .render(&Notification::new(
                TemplateKey::ApplicationConfirmation,
                json!({"job_title": "Designer", "name": "Sam", "email": "sam@example.com"}),
            ))
            .unwrap();
        assert_eq!(mail.subject, "Application Received - Designer");
    }
}
