pub mod request;

pub use request::{ContactPayload, MessageResponse, SanitizedMessage, SubmissionDisposition};
