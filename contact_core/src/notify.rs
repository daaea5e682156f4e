//! Outbound notification hand-off for accepted submissions

use crate::models::SanitizedMessage;
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;
use tracing::info;

#[derive(Error, Debug)]
pub enum NotifyError {
    #[error("notification delivery failed: {0}")]
    Delivery(String),
}

/// Receives sanitized contact records. Delivery is best-effort: the gateway
/// logs failures and never surfaces them to the caller. No retry or
/// dead-letter policy is defined.
#[async_trait]
pub trait ContactNotifier: Send + Sync {
    async fn deliver(&self, record: &SanitizedMessage) -> Result<(), NotifyError>;
}

pub type SharedNotifier = Arc<dyn ContactNotifier>;

/// Reference notifier: logs the record instead of sending email.
/// TODO: wire up an actual email provider behind this trait.
pub struct LogNotifier;

#[async_trait]
impl ContactNotifier for LogNotifier {
    async fn deliver(&self, record: &SanitizedMessage) -> Result<(), NotifyError> {
        info!(
            name = %record.name,
            email = %record.email,
            subject = %record.subject,
            "contact form submission received"
        );
        Ok(())
    }
}
