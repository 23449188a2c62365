//! crates/coursehub_core/src/ports.rs
//!
//! Defines the service contracts (traits) the workflow's effects are executed against.
//! The core never talks to the network itself; adapters in the client implement these.

use crate::domain::{AcademicContext, AskRequest, Course, CourseFile, FileQuery};
use async_trait::async_trait;

//=========================================================================================
// Generic Port Error and Result Types
//=========================================================================================

/// A generic error type for all port operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PortError {
    /// The request never produced a response (connection refused, reset, aborted).
    #[error("Transport failure: {0}")]
    Transport(String),
    /// The backend answered with a non-success status.
    #[error("Backend returned status {status}: {body}")]
    Status { status: u16, body: String },
    /// The response body could not be decoded.
    #[error("Malformed response: {0}")]
    Decode(String),
    #[error("An unexpected error occurred: {0}")]
    Unexpected(String),
}

/// A convenience type alias for `Result<T, PortError>`.
pub type PortResult<T> = Result<T, PortError>;

//=========================================================================================
// Service Ports (Traits)
//=========================================================================================

#[async_trait]
pub trait CourseCatalogService: Send + Sync {
    /// Lists every course offered for the given context.
    async fn list_courses(&self, context: &AcademicContext) -> PortResult<Vec<Course>>;

    /// Lists the files of one course and category under the given context.
    async fn list_files(&self, query: &FileQuery) -> PortResult<Vec<CourseFile>>;
}

#[async_trait]
pub trait QuestionAnsweringService: Send + Sync {
    /// Asks the assistant a question scoped to a course (and optionally a category).
    ///
    /// `Ok(None)` means the backend replied without an answer field.
    async fn answer_question(&self, request: &AskRequest) -> PortResult<Option<String>>;
}
