pub mod catalog;
pub mod domain;
pub mod effects;
pub mod error;
pub mod ports;
pub mod workflow;

pub use catalog::{Category, ContextShape, Major, Semester, UnknownKey, Year};
pub use domain::{AcademicContext, AskRequest, ChatMessage, ChatRole, Course, CourseFile, FileQuery};
pub use effects::{Completion, Effect, Ticket};
pub use error::{FetchError, FetchTarget, ValidationError, WorkflowError};
pub use ports::{CourseCatalogService, PortError, PortResult, QuestionAnsweringService};
pub use workflow::{FileListing, Phase, SetupForm, Workflow, NO_ANSWER_PLACEHOLDER};
