//! crates/coursehub_core/src/workflow.rs
//!
//! The selection-and-retrieval state machine.
//!
//! Setup gates everything. Once the academic context is complete, the course list is
//! loaded; choosing a course opens the category gate; a course and a category together
//! trigger the file listing. The chat session runs beside this, scoped to whatever
//! course and category are currently selected.
//!
//! Transitions never perform I/O. They return [`Effect`]s, and the executor feeds the
//! results back through [`Workflow::complete`]. Derived fetches are recomputed after
//! each transition by `sync_courses` and `sync_files`, each of which only looks at its
//! own dependency set and issues a request only when the derived key changes.

use crate::catalog::{Category, ContextShape, Major, Semester, Year};
use crate::domain::{AcademicContext, AskRequest, ChatMessage, ChatRole, Course, CourseFile, FileQuery};
use crate::effects::{Completion, Effect, Ticket};
use crate::error::{FetchError, FetchTarget, ValidationError, WorkflowError};
use crate::ports::PortResult;
use std::collections::HashSet;
use tracing::{debug, info, warn};

/// Shown in place of an answer when the backend replies without one.
pub const NO_ANSWER_PLACEHOLDER: &str = "No answer received.";

//=========================================================================================
// View-facing State Types
//=========================================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// The setup form is open and blocks the rest of the app.
    Setup,
    Active,
}

/// Raw values of the setup form. An empty string means "not chosen yet".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SetupForm {
    pub major: String,
    pub year: String,
    pub semester: String,
}

impl SetupForm {
    pub fn new(major: impl Into<String>, year: impl Into<String>, semester: impl Into<String>) -> Self {
        Self {
            major: major.into(),
            year: year.into(),
            semester: semester.into(),
        }
    }
}

/// The file list for the current (course, category, context) triple.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum FileListing {
    /// No triple is fully specified, so nothing has been requested.
    #[default]
    Idle,
    Loading,
    /// Fetched successfully. An empty vector is the "no files available" state.
    Ready(Vec<CourseFile>),
    Failed,
}

/// The course and chat generation an ask was issued under.
///
/// Category is not part of the scope: switching category keeps the history, so an
/// answer still belongs to the conversation its question sits in.
#[derive(Debug, Clone, PartialEq, Eq)]
struct ChatScope {
    generation: u64,
    course_id: String,
}

#[derive(Debug)]
struct PendingAsk {
    ticket: Ticket,
    scope: ChatScope,
}

#[derive(Debug, Default)]
struct ChatSession {
    visible: bool,
    history: Vec<ChatMessage>,
    input: String,
    pending: Vec<PendingAsk>,
    /// Bumped whenever the history is discarded, invalidating in-flight asks.
    generation: u64,
}

//=========================================================================================
// The Workflow
//=========================================================================================

/// Explicit holder of all client-side state, mutated only through its transitions.
#[derive(Debug)]
pub struct Workflow {
    shape: ContextShape,
    phase: Phase,
    context: Option<AcademicContext>,

    courses: Vec<Course>,
    courses_key: Option<AcademicContext>,
    courses_ticket: Option<Ticket>,

    selected_course: Option<Course>,
    category_gate_open: bool,
    selected_category: Option<Category>,

    files: FileListing,
    files_key: Option<FileQuery>,
    files_ticket: Option<Ticket>,

    chat: ChatSession,
    notice: Option<String>,
    next_ticket: u64,
}

impl Default for Workflow {
    fn default() -> Self {
        Self::new(ContextShape::default())
    }
}

impl Workflow {
    pub fn new(shape: ContextShape) -> Self {
        Self {
            shape,
            phase: Phase::Setup,
            context: None,
            courses: Vec::new(),
            courses_key: None,
            courses_ticket: None,
            selected_course: None,
            category_gate_open: false,
            selected_category: None,
            files: FileListing::Idle,
            files_key: None,
            files_ticket: None,
            chat: ChatSession::default(),
            notice: None,
            next_ticket: 0,
        }
    }

    // --- Context Selector ---

    /// Validates the setup form and, on success, leaves setup and requests the course list.
    ///
    /// Completing setup again with a different context starts a fresh session; the same
    /// context is a no-op, so courses load exactly once per distinct context.
    pub fn complete_setup(&mut self, form: &SetupForm) -> Result<Vec<Effect>, WorkflowError> {
        let context = match self.validate(form) {
            Ok(context) => context,
            Err(e) => return Err(self.raise(e.into())),
        };
        self.notice = None;

        if self.phase == Phase::Active {
            if self.context == Some(context) {
                debug!("Setup re-submitted with the current context; nothing to do.");
                return Ok(Vec::new());
            }
            info!("Academic context changed; starting a new session.");
            self.courses.clear();
            self.reset_selection();
        }

        info!(
            major = context.major.key(),
            year = context.year.key(),
            semester = context.semester.map(Semester::key),
            "Setup complete."
        );
        self.context = Some(context);
        self.phase = Phase::Active;
        Ok(self.sync_derived())
    }

    fn validate(&self, form: &SetupForm) -> Result<AcademicContext, ValidationError> {
        let needs_semester = self.shape.requires_semester();
        let blank = |value: &str| value.trim().is_empty();
        if blank(&form.major) || blank(&form.year) || (needs_semester && blank(&form.semester)) {
            return Err(ValidationError::MissingFields { shape: self.shape });
        }

        let major: Major = form.major.trim().parse()?;
        let year: Year = form.year.trim().parse()?;
        let semester = if needs_semester {
            Some(form.semester.trim().parse::<Semester>()?)
        } else {
            None
        };
        Ok(AcademicContext { major, year, semester })
    }

    // --- Course Browser & Category Gate ---

    /// Selects a course and opens the category gate. Any chosen category and file list
    /// are discarded along with it.
    pub fn select_course(&mut self, course: Course) -> Vec<Effect> {
        if self.phase != Phase::Active {
            warn!(course_id = %course.id, "Ignoring course selection before setup is complete.");
            return Vec::new();
        }
        info!(course_id = %course.id, "Course selected.");
        self.selected_course = Some(course);
        self.category_gate_open = true;
        self.selected_category = None;
        self.files = FileListing::Idle;
        self.sync_derived()
    }

    /// Chooses a category and closes the gate.
    pub fn select_category(&mut self, category: Category) -> Vec<Effect> {
        info!(category = category.key(), "Category selected.");
        self.selected_category = Some(category);
        self.category_gate_open = false;
        self.sync_derived()
    }

    /// Reopens the category gate for the selected course, e.g. to switch category.
    pub fn open_category_gate(&mut self) {
        if self.selected_course.is_some() {
            self.category_gate_open = true;
        }
    }

    /// Closes the gate without choosing. The course stays selected.
    pub fn dismiss_category_gate(&mut self) {
        self.category_gate_open = false;
    }

    /// Returns to the course list, discarding category, files, course and chat history
    /// together.
    pub fn back_to_courses(&mut self) -> Vec<Effect> {
        info!("Returning to the course list.");
        self.reset_selection();
        self.sync_derived()
    }

    fn reset_selection(&mut self) {
        self.selected_category = None;
        self.files = FileListing::Idle;
        self.selected_course = None;
        self.category_gate_open = false;
        self.chat.history.clear();
        self.chat.generation += 1;
    }

    // --- Chat Session ---

    pub fn show_chat(&mut self) {
        self.chat.visible = true;
    }

    pub fn hide_chat(&mut self) {
        self.chat.visible = false;
    }

    pub fn toggle_chat(&mut self) {
        self.chat.visible = !self.chat.visible;
    }

    /// Edits the pending question without submitting it.
    pub fn set_question(&mut self, text: impl Into<String>) {
        self.chat.input = text.into();
    }

    /// Submits a question about the selected course and category.
    ///
    /// The user message is appended immediately and stays in history even if the
    /// request fails. Blank questions are ignored.
    pub fn ask(&mut self, question: impl Into<String>) -> Result<Vec<Effect>, WorkflowError> {
        self.chat.input = question.into();

        let course_id = match &self.selected_course {
            Some(course) => course.id.clone(),
            None => return Err(self.raise(WorkflowError::Precondition)),
        };
        if self.chat.input.trim().is_empty() {
            return Ok(Vec::new());
        }

        let question = self.chat.input.clone();
        self.chat
            .history
            .push(ChatMessage::new(ChatRole::User, question.clone()));
        self.notice = None;

        let ticket = self.issue_ticket();
        let scope = ChatScope {
            generation: self.chat.generation,
            course_id: course_id.clone(),
        };
        info!(%ticket, course_id = %course_id, "Asking the assistant.");
        self.chat.pending.push(PendingAsk { ticket, scope });

        Ok(vec![Effect::Ask {
            ticket,
            request: AskRequest {
                course_id,
                category: self.selected_category,
                question,
            },
        }])
    }

    /// Clears the error notice.
    pub fn dismiss_notice(&mut self) {
        self.notice = None;
    }

    // --- Completions ---

    /// Feeds the result of an executed effect back into the state machine.
    pub fn complete(&mut self, completion: Completion) {
        match completion {
            Completion::Courses { ticket, result } => self.courses_loaded(ticket, result),
            Completion::Files { ticket, result } => self.files_loaded(ticket, result),
            Completion::Answer { ticket, result } => self.answer_received(ticket, result),
        }
    }

    fn courses_loaded(&mut self, ticket: Ticket, result: PortResult<Vec<Course>>) {
        if self.courses_ticket != Some(ticket) {
            warn!(%ticket, "Discarding stale course list response.");
            return;
        }
        self.courses_ticket = None;

        match result {
            Ok(courses) => {
                let mut seen = HashSet::new();
                let total = courses.len();
                self.courses = courses
                    .into_iter()
                    .filter(|course| seen.insert(course.id.clone()))
                    .collect();
                if self.courses.len() != total {
                    warn!(
                        dropped = total - self.courses.len(),
                        "Course list contained duplicate ids; kept the first of each."
                    );
                }
                debug!(count = self.courses.len(), "Courses loaded.");
                self.notice = None;
            }
            Err(source) => {
                warn!(%ticket, error = %source, "Course list request failed.");
                self.raise(
                    FetchError {
                        target: FetchTarget::Courses,
                        source,
                    }
                    .into(),
                );
            }
        }
    }

    fn files_loaded(&mut self, ticket: Ticket, result: PortResult<Vec<CourseFile>>) {
        if self.files_ticket != Some(ticket) {
            warn!(%ticket, "Discarding stale file list response.");
            return;
        }
        self.files_ticket = None;

        match result {
            Ok(files) => {
                debug!(count = files.len(), "Files loaded.");
                self.files = FileListing::Ready(files);
                self.notice = None;
            }
            Err(source) => {
                warn!(%ticket, error = %source, "File list request failed.");
                self.files = FileListing::Failed;
                self.raise(
                    FetchError {
                        target: FetchTarget::Files,
                        source,
                    }
                    .into(),
                );
            }
        }
    }

    fn answer_received(&mut self, ticket: Ticket, result: PortResult<Option<String>>) {
        let Some(position) = self.chat.pending.iter().position(|p| p.ticket == ticket) else {
            warn!(%ticket, "Answer for an unknown request; ignoring.");
            return;
        };
        let pending = self.chat.pending.remove(position);

        if pending.scope.generation != self.chat.generation {
            debug!(%ticket, "Discarding answer for a chat history that was reset.");
            return;
        }
        if Some(&pending.scope) != self.chat_scope().as_ref() {
            // The question is still in history, so the loss must be visible.
            warn!(%ticket, "Discarding answer issued for a course no longer selected.");
            self.raise(WorkflowError::AnswerDiscarded);
            return;
        }

        match result {
            Ok(answer) => {
                let content = answer
                    .filter(|text| !text.is_empty())
                    .unwrap_or_else(|| NO_ANSWER_PLACEHOLDER.to_string());
                self.chat
                    .history
                    .push(ChatMessage::new(ChatRole::Assistant, content));
                self.chat.input.clear();
            }
            Err(source) => {
                warn!(%ticket, error = %source, "Assistant request failed.");
                self.raise(
                    FetchError {
                        target: FetchTarget::Answer,
                        source,
                    }
                    .into(),
                );
            }
        }
    }

    fn chat_scope(&self) -> Option<ChatScope> {
        self.selected_course.as_ref().map(|course| ChatScope {
            generation: self.chat.generation,
            course_id: course.id.clone(),
        })
    }

    // --- Derived Fetches ---

    fn sync_derived(&mut self) -> Vec<Effect> {
        let mut effects = Vec::new();
        effects.extend(self.sync_courses());
        effects.extend(self.sync_files());
        effects
    }

    /// Courses depend on {phase, context}.
    fn sync_courses(&mut self) -> Option<Effect> {
        let wanted = match self.phase {
            Phase::Active => self.context,
            Phase::Setup => None,
        };
        if wanted == self.courses_key {
            return None;
        }
        self.courses_key = wanted;
        self.courses_ticket = None;

        let context = wanted?;
        let ticket = self.issue_ticket();
        self.courses_ticket = Some(ticket);
        info!(%ticket, "Requesting course list.");
        Some(Effect::LoadCourses { ticket, context })
    }

    /// Files depend on {context, selected course, selected category}.
    fn sync_files(&mut self) -> Option<Effect> {
        let wanted = match (&self.context, &self.selected_course, self.selected_category) {
            (Some(context), Some(course), Some(category)) => Some(FileQuery {
                course_id: course.id.clone(),
                category,
                context: *context,
            }),
            _ => None,
        };
        if wanted == self.files_key {
            return None;
        }
        let superseded = self.files_ticket.take();
        self.files_key = wanted.clone();

        match wanted {
            Some(query) => {
                let ticket = self.issue_ticket();
                self.files_ticket = Some(ticket);
                self.files = FileListing::Loading;
                info!(%ticket, course_id = %query.course_id, category = query.category.key(), "Requesting files.");
                Some(Effect::LoadFiles { ticket, query })
            }
            None => {
                self.files = FileListing::Idle;
                superseded.map(|ticket| {
                    debug!(%ticket, "File request superseded.");
                    Effect::CancelFiles
                })
            }
        }
    }

    fn issue_ticket(&mut self) -> Ticket {
        self.next_ticket += 1;
        Ticket(self.next_ticket)
    }

    fn raise(&mut self, error: WorkflowError) -> WorkflowError {
        self.notice = Some(error.to_string());
        error
    }

    // --- Accessors ---

    pub fn shape(&self) -> ContextShape {
        self.shape
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn context(&self) -> Option<&AcademicContext> {
        self.context.as_ref()
    }

    pub fn courses(&self) -> &[Course] {
        &self.courses
    }

    pub fn courses_loading(&self) -> bool {
        self.courses_ticket.is_some()
    }

    pub fn find_course(&self, id: &str) -> Option<&Course> {
        self.courses.iter().find(|course| course.id == id)
    }

    pub fn selected_course(&self) -> Option<&Course> {
        self.selected_course.as_ref()
    }

    pub fn category_gate_open(&self) -> bool {
        self.category_gate_open
    }

    pub fn selected_category(&self) -> Option<Category> {
        self.selected_category
    }

    pub fn file_listing(&self) -> &FileListing {
        &self.files
    }

    /// The current files; empty unless a listing has loaded.
    pub fn files(&self) -> &[CourseFile] {
        match &self.files {
            FileListing::Ready(files) => files,
            _ => &[],
        }
    }

    pub fn files_loading(&self) -> bool {
        self.files == FileListing::Loading
    }

    pub fn chat_visible(&self) -> bool {
        self.chat.visible
    }

    pub fn chat_history(&self) -> &[ChatMessage] {
        &self.chat.history
    }

    pub fn pending_question(&self) -> &str {
        &self.chat.input
    }

    pub fn answer_pending(&self) -> bool {
        !self.chat.pending.is_empty()
    }

    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }
}
