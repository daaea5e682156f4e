//! Network seam between the form controller and the gateway

use crate::models::ContactPayload;
use async_trait::async_trait;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum TransportError {
    /// The gateway answered with a non-success status.
    #[error("submission rejected with status {0}")]
    Status(u16),

    /// The request never produced a response.
    #[error("network error: {0}")]
    Network(String),
}

/// Carries one submission to the gateway. The rendering layer injects the
/// real wire; tests inject fakes. No client-side timeout is imposed: a hung
/// transport keeps the submission pending until the transport itself fails.
#[async_trait]
pub trait SubmitTransport: Send + Sync {
    async fn send(&self, payload: &ContactPayload) -> Result<(), TransportError>;
}
