//! crates/coursehub_core/src/error.rs
//!
//! The workflow's error taxonomy. The `Display` of each variant is exactly the
//! text shown in the single-slot error notice.

use crate::catalog::{ContextShape, UnknownKey};
use crate::ports::PortError;

/// Which network-backed operation a [`FetchError`] came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchTarget {
    Courses,
    Files,
    Answer,
}

impl FetchTarget {
    fn notice(self) -> &'static str {
        match self {
            FetchTarget::Courses => "Failed to load courses.",
            FetchTarget::Files => "Failed to load files.",
            FetchTarget::Answer => "AI failed to respond.",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{}", .target.notice())]
pub struct FetchError {
    pub target: FetchTarget,
    #[source]
    pub source: PortError,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("{}", missing_fields_notice(.shape))]
    MissingFields { shape: ContextShape },
    #[error("{0}")]
    UnknownValue(#[from] UnknownKey),
}

fn missing_fields_notice(shape: &ContextShape) -> &'static str {
    match shape {
        ContextShape::MajorYear => "Please select major and year.",
        ContextShape::MajorYearSemester => "Please select major, year, and semester.",
    }
}

/// Every way a workflow operation can fail.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WorkflowError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Fetch(#[from] FetchError),
    #[error("Please select a course first.")]
    Precondition,
    /// An answer arrived after its course was replaced while the question stayed in history.
    #[error("The course changed before the AI answered.")]
    AnswerDiscarded,
}
