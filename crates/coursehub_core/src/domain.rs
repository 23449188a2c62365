//! crates/coursehub_core/src/domain.rs
//!
//! Defines the pure, core data structures for the application.
//! These structs are independent of any network or serialization format.

use crate::catalog::{Category, Major, Semester, Year};
use chrono::{DateTime, Utc};

/// The student's academic context, fixed once setup completes.
///
/// `semester` is `None` only when the client runs with
/// [`ContextShape::MajorYear`](crate::catalog::ContextShape::MajorYear).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AcademicContext {
    pub major: Major,
    pub year: Year,
    pub semester: Option<Semester>,
}

impl AcademicContext {
    /// The context as `(name, key)` query pairs, in wire order.
    pub fn query_pairs(&self) -> Vec<(&'static str, &'static str)> {
        let mut pairs = vec![("major", self.major.key()), ("year", self.year.key())];
        if let Some(semester) = self.semester {
            pairs.push(("semester", semester.key()));
        }
        pairs
    }
}

/// A course offered for the selected context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Course {
    pub id: String,
    pub name: String,
    pub code: Option<String>,
}

/// A retrievable file belonging to one (course, category, context) triple.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CourseFile {
    pub id: String,
    pub label: String,
    pub url: String,
    pub date: Option<String>,
}

/// The exact triple a file listing was requested for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileQuery {
    pub course_id: String,
    pub category: Category,
    pub context: AcademicContext,
}

/// The payload of one question sent to the assistant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AskRequest {
    pub course_id: String,
    pub category: Option<Category>,
    pub question: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatRole {
    User,
    Assistant,
}

/// One entry in the chat history.
#[derive(Debug, Clone)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
    pub sent_at: DateTime<Utc>,
}

impl ChatMessage {
    pub fn new(role: ChatRole, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
            sent_at: Utc::now(),
        }
    }
}
