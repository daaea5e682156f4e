//! Client-side contact form state machine
//!
//! Owns field values, synchronous validation, the per-session attempt
//! counter, and the submission lifecycle. Everything here is advisory UX
//! speed; the gateway repeats the authoritative checks.

pub mod transport;

pub use transport::{SubmitTransport, TransportError};

use crate::models::ContactPayload;
use crate::validation::{validate_payload, ValidationResult};
use std::cell::Cell;
use std::rc::Rc;

/// Client-side circuit breaker, independent of server-side rate limiting.
/// Resets on page reload; the server counter is the authoritative control.
pub const MAX_SUBMIT_ATTEMPTS: u32 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SubmitStatus {
    #[default]
    Idle,
    Submitting,
    Success,
    Error,
}

/// Raw (untrimmed) field values as typed by the user.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldValues {
    pub name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
    pub honeypot: String,
}

impl FieldValues {
    /// The outbound payload carries trimmed values; the honeypot is sent
    /// empty (it is only non-empty when a bot filled it, and that path never
    /// reaches the network).
    fn to_payload(&self) -> ContactPayload {
        ContactPayload {
            name: self.name.trim().to_string(),
            email: self.email.trim().to_string(),
            subject: self.subject.trim().to_string(),
            message: self.message.trim().to_string(),
            honeypot: String::new(),
        }
    }
}

/// Releases the in-flight flag on every exit path, including cancellation
/// and unwind, so a failed submission never wedges the submit button.
struct InFlightGuard<'a> {
    flag: &'a Cell<bool>,
}

impl<'a> InFlightGuard<'a> {
    fn arm(flag: &'a Cell<bool>) -> Self {
        flag.set(true);
        Self { flag }
    }
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.flag.set(false);
    }
}

/// State machine behind the contact form. The rendering layer reads
/// `{values, errors, is_submitting, submit_status}`, feeds edits through the
/// `set_*` methods, and calls [`submit`](Self::submit) from its single
/// submit entry point.
#[derive(Default)]
pub struct FormController {
    values: FieldValues,
    errors: ValidationResult,
    submit_status: SubmitStatus,
    attempt_count: u32,
    // Shared with the rendering layer so the submit button can react while
    // the submission future holds the controller borrow.
    in_flight: Rc<Cell<bool>>,
}

impl FormController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn values(&self) -> &FieldValues {
        &self.values
    }

    pub fn errors(&self) -> &ValidationResult {
        &self.errors
    }

    pub fn submit_status(&self) -> SubmitStatus {
        self.submit_status
    }

    pub fn attempt_count(&self) -> u32 {
        self.attempt_count
    }

    pub fn is_submitting(&self) -> bool {
        self.in_flight.get()
    }

    /// Live view of the in-flight flag, independent of the controller
    /// borrow. The rendering layer polls this to disable the submit button
    /// while a submission is pending.
    pub fn in_flight_probe(&self) -> Rc<Cell<bool>> {
        Rc::clone(&self.in_flight)
    }

    /// Whether the submit button is enabled: never while a submission is in
    /// flight or once the local attempt budget is spent.
    pub fn can_submit(&self) -> bool {
        !self.is_submitting() && self.attempt_count < MAX_SUBMIT_ATTEMPTS
    }

    /// User-facing notice for the error status. Two messages only; the
    /// client never differentiates failure causes beyond this pair.
    pub fn error_notice(&self) -> Option<&'static str> {
        if self.submit_status != SubmitStatus::Error {
            return None;
        }
        if self.attempt_count >= MAX_SUBMIT_ATTEMPTS {
            Some("Too many attempts. Please try again later.")
        } else {
            Some("Something went wrong. Please try again.")
        }
    }

    pub fn set_name(&mut self, value: impl Into<String>) {
        self.values.name = value.into();
        self.errors.clear_field("name");
    }

    pub fn set_email(&mut self, value: impl Into<String>) {
        self.values.email = value.into();
        self.errors.clear_field("email");
    }

    pub fn set_subject(&mut self, value: impl Into<String>) {
        self.values.subject = value.into();
        self.errors.clear_field("subject");
    }

    pub fn set_message(&mut self, value: impl Into<String>) {
        self.values.message = value.into();
        self.errors.clear_field("message");
    }

    pub fn set_honeypot(&mut self, value: impl Into<String>) {
        self.values.honeypot = value.into();
    }

    /// Runs one submission attempt.
    ///
    /// Preconditions short-circuit in order: a filled honeypot reports
    /// success without touching the network, an exhausted attempt budget
    /// reports an error, and validation failures populate field errors. Only
    /// a passing payload is sent. Success clears the form; every failure
    /// preserves the user's input for retry.
    pub async fn submit(&mut self, transport: &dyn SubmitTransport) {
        // Bot suppression: report success, never reveal detection.
        if !self.values.honeypot.is_empty() {
            self.submit_status = SubmitStatus::Success;
            return;
        }

        if self.attempt_count >= MAX_SUBMIT_ATTEMPTS {
            self.submit_status = SubmitStatus::Error;
            return;
        }

        let payload = self.values.to_payload();
        let validation = validate_payload(&payload);
        if !validation.is_valid() {
            self.errors = validation;
            return;
        }

        self.attempt_count += 1;
        self.submit_status = SubmitStatus::Submitting;

        let outcome = {
            let _guard = InFlightGuard::arm(&self.in_flight);
            transport.send(&payload).await
        };

        match outcome {
            Ok(()) => {
                self.submit_status = SubmitStatus::Success;
                self.values = FieldValues::default();
                self.errors = ValidationResult::success();
            }
            Err(_) => {
                self.submit_status = SubmitStatus::Error;
            }
        }
    }
}
