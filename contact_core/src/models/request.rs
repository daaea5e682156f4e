//! Request and response models for the contact endpoint

use serde::{Deserialize, Serialize};

/// Maximum stored lengths after sanitization, in characters.
pub const MAX_NAME_CHARS: usize = 100;
pub const MAX_EMAIL_CHARS: usize = 100;
pub const MAX_SUBJECT_CHARS: usize = 200;
pub const MAX_MESSAGE_CHARS: usize = 2000;

/// The inbound contact form payload. Absent fields deserialize as empty and
/// fail the required-field check, mirroring how the client treats them. The
/// honeypot field is filled only by automated submitters; humans never see it.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ContactPayload {
    pub name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
    pub honeypot: String,
}

impl ContactPayload {
    pub fn has_empty_required_field(&self) -> bool {
        self.name.trim().is_empty()
            || self.email.trim().is_empty()
            || self.subject.trim().is_empty()
            || self.message.trim().is_empty()
    }

    /// Trims and truncates every field to its storage limit. Idempotent:
    /// sanitizing an already-sanitized payload yields the same record.
    pub fn sanitize(&self) -> SanitizedMessage {
        SanitizedMessage {
            name: truncate_chars(self.name.trim(), MAX_NAME_CHARS),
            email: truncate_chars(self.email.trim(), MAX_EMAIL_CHARS),
            subject: truncate_chars(self.subject.trim(), MAX_SUBJECT_CHARS),
            message: truncate_chars(self.message.trim(), MAX_MESSAGE_CHARS),
        }
    }
}

fn truncate_chars(value: &str, max_chars: usize) -> String {
    value.chars().take(max_chars).collect()
}

/// A contact record after server-side sanitization, ready for hand-off to
/// the outbound notification service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SanitizedMessage {
    pub name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
}

/// Success body of the contact endpoint.
#[derive(Debug, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn sent() -> Self {
        Self {
            message: "Message sent successfully".to_string(),
        }
    }
}

/// The single outcome classification the gateway produces for one request.
/// Exactly one disposition per request, never partial.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmissionDisposition {
    Accepted,
    RejectedValidation,
    RejectedRateLimited,
    RejectedMalformedBody,
    /// Honeypot tripped: the caller receives a success-shaped response but
    /// no record is forwarded, so bots cannot distinguish detection from
    /// acceptance.
    SilentlyDiscarded,
    ServerError,
}
