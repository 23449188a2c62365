//! crates/coursehub_core/src/effects.rs
//!
//! The protocol between the workflow and whatever executes its network calls.
//! Transitions emit `Effect`s; the executor reports each one back as a `Completion`
//! carrying the same `Ticket`, which is how stale responses are recognised.

use crate::domain::{AcademicContext, AskRequest, Course, CourseFile, FileQuery};
use crate::ports::PortResult;
use std::fmt;

/// Identifies one issued request. Tickets are never reused within a workflow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Ticket(pub(crate) u64);

impl fmt::Display for Ticket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A side effect requested by a workflow transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    LoadCourses {
        ticket: Ticket,
        context: AcademicContext,
    },
    LoadFiles {
        ticket: Ticket,
        query: FileQuery,
    },
    /// The in-flight file fetch is no longer wanted and may be aborted.
    CancelFiles,
    Ask {
        ticket: Ticket,
        request: AskRequest,
    },
}

/// The outcome of an executed effect, fed back into the workflow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Completion {
    Courses {
        ticket: Ticket,
        result: PortResult<Vec<Course>>,
    },
    Files {
        ticket: Ticket,
        result: PortResult<Vec<CourseFile>>,
    },
    Answer {
        ticket: Ticket,
        result: PortResult<Option<String>>,
    },
}

impl Completion {
    pub fn ticket(&self) -> Ticket {
        match self {
            Completion::Courses { ticket, .. }
            | Completion::Files { ticket, .. }
            | Completion::Answer { ticket, .. } => *ticket,
        }
    }
}
