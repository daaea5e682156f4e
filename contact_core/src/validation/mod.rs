//! Field validation shared by the form controller and the gateway.
//!
//! The client runs these checks for fast feedback; the gateway repeats the
//! security-relevant ones independently and never trusts the client result.

pub mod rules;

pub use rules::is_valid_email;

use crate::models::ContactPayload;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Mapping from field name to an error message. A payload is valid iff the
/// mapping is empty.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ValidationResult {
    pub errors: HashMap<String, String>,
}

impl ValidationResult {
    pub fn success() -> Self {
        Self::default()
    }

    pub fn add_error(&mut self, field: &str, message: &str) {
        self.errors.insert(field.to_string(), message.to_string());
    }

    pub fn clear_field(&mut self, field: &str) {
        self.errors.remove(field);
    }

    pub fn error(&self, field: &str) -> Option<&str> {
        self.errors.get(field).map(String::as_str)
    }

    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Validates a payload against the contact form rules. All length checks
/// operate on the trimmed value; the first failing rule per field wins.
pub fn validate_payload(payload: &ContactPayload) -> ValidationResult {
    let mut result = ValidationResult::success();

    let name = payload.name.trim();
    if name.is_empty() {
        result.add_error("name", "Name is required");
    } else if name.chars().count() < 2 {
        result.add_error("name", "Name must be at least 2 characters");
    }

    let email = payload.email.trim();
    if email.is_empty() {
        result.add_error("email", "Email is required");
    } else if !is_valid_email(email) {
        result.add_error("email", "Please enter a valid email address");
    }

    let subject = payload.subject.trim();
    if subject.is_empty() {
        result.add_error("subject", "Subject is required");
    } else if subject.chars().count() < 3 {
        result.add_error("subject", "Subject must be at least 3 characters");
    }

    let message = payload.message.trim();
    if message.is_empty() {
        result.add_error("message", "Message is required");
    } else if message.chars().count() < 10 {
        result.add_error("message", "Message must be at least 10 characters");
    } else if message.chars().count() > 2000 {
        result.add_error("message", "Message must be less than 2000 characters");
    }

    result
}
