//! Contact-submission model and its field validation rules.
//!
//! Validation is pure and synchronous. The same rules run in the browser form
//! and here at the trust boundary; a well-behaved client never produces a
//! payload the server rejects.

use serde::{Deserialize, Serialize};

/// A single failed validation rule, as reported to the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    /// Name of the failing field.
    pub field: String,
    /// Message shown to the user for this field.
    pub message: String,
}

impl FieldError {
    #[must_use]
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self { field: field.into(), message: message.into() }
    }
}

/// Unvalidated contact-form fields as received from the client.
///
/// Missing keys deserialize as empty strings and fail their length rule, so a
/// partial payload reports the same per-field messages as an empty one.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SubmissionDraft {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub service: String,
    #[serde(default)]
    pub message: String,
}

/// A contact submission whose fields passed every rule in
/// [`SubmissionDraft::validate`]. Never persisted; discarded once the relay
/// request completes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContactSubmission {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub service: String,
    pub message: String,
}

impl SubmissionDraft {
    /// Apply the field rules in schema order, collecting every failure.
    ///
    /// No cross-field checks and no normalization: phone formatting characters
    /// count toward the length rule.
    ///
    /// # Errors
    /// Returns the full list of per-field errors when any rule fails.
    pub fn validate(self) -> Result<ContactSubmission, Vec<FieldError>> {
        let mut errors = Vec::new();

        if self.name.chars().count() < 2 {
            errors.push(FieldError::new("name", "Name must be at least 2 characters"));
        }
        if !is_email(&self.email) {
            errors.push(FieldError::new("email", "Please enter a valid email address"));
        }
        if self.phone.chars().count() < 10 {
            errors.push(FieldError::new("phone", "Please enter a valid phone number"));
        }
        if self.service.is_empty() {
            errors.push(FieldError::new("service", "Please select a service"));
        }
        if self.message.chars().count() < 10 {
            errors.push(FieldError::new("message", "Message must be at least 10 characters"));
        }

        if errors.is_empty() {
            Ok(ContactSubmission {
                name: self.name,
                email: self.email,
                phone: self.phone,
                service: self.service,
                message: self.message,
            })
        } else {
            Err(errors)
        }
    }
}

/// Structural email check: one `@`, non-empty local part, dotted domain whose
/// final label has at least two characters, no whitespace.
fn is_email(value: &str) -> bool {
    if value.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = value.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }
    match domain.rsplit_once('.') {
        Some((host, tld)) => !host.is_empty() && tld.chars().count() >= 2,
        None => false,
    }
}
