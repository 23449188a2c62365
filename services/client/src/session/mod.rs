//! services/client/src/session/mod.rs
//!
//! The session driver: owns the workflow, executes the effects its transitions emit,
//! and feeds every result back in.
//!
//! Everything runs on one task. Requests are spawned and report back over an mpsc
//! channel; the owner pulls completions with [`Session::next_completion`] (or drains them
//! with [`Session::settle`]) and applies them in arrival order.

mod guard;
pub mod state;

use coursehub_core::effects::{Completion, Effect, Ticket};
use coursehub_core::error::WorkflowError;
use coursehub_core::workflow::Workflow;
use coursehub_core::ContextShape;
use guard::{CompletionGuard, RequestKind};
use state::Services;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

pub struct Session {
    workflow: Workflow,
    services: Services,
    tx: mpsc::UnboundedSender<Completion>,
    rx: mpsc::UnboundedReceiver<Completion>,
    in_flight: usize,
    /// Cancels the file request currently in flight, if any.
    files_cancel: CancellationToken,
}

impl Session {
    pub fn new(services: Services, shape: ContextShape) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            workflow: Workflow::new(shape),
            services,
            tx,
            rx,
            in_flight: 0,
            files_cancel: CancellationToken::new(),
        }
    }

    pub fn workflow(&self) -> &Workflow {
        &self.workflow
    }

    /// Number of spawned requests that have not been applied yet.
    pub fn in_flight(&self) -> usize {
        self.in_flight
    }

    /// Runs a transition and dispatches whatever effects it emits.
    pub fn update(&mut self, transition: impl FnOnce(&mut Workflow) -> Vec<Effect>) {
        let effects = transition(&mut self.workflow);
        self.dispatch(effects);
    }

    /// Runs a fallible transition. Its error is already on the workflow's notice; it is
    /// returned so the caller can log it.
    pub fn try_update(
        &mut self,
        transition: impl FnOnce(&mut Workflow) -> Result<Vec<Effect>, WorkflowError>,
    ) -> Result<(), WorkflowError> {
        let effects = transition(&mut self.workflow)?;
        self.dispatch(effects);
        Ok(())
    }

    /// Selects a course from the loaded list by id. Returns `false` if there is none.
    pub fn select_course_by_id(&mut self, course_id: &str) -> bool {
        let Some(course) = self.workflow.find_course(course_id).cloned() else {
            return false;
        };
        self.update(|wf| wf.select_course(course));
        true
    }

    /// Waits for the next completion. `None` when nothing is in flight.
    pub async fn next_completion(&mut self) -> Option<Completion> {
        if self.in_flight == 0 {
            return None;
        }
        let completion = self.rx.recv().await?;
        self.in_flight -= 1;
        Some(completion)
    }

    pub fn apply(&mut self, completion: Completion) {
        debug!(ticket = %completion.ticket(), "Applying completion.");
        self.workflow.complete(completion);
    }

    /// Applies completions until no request is left in flight.
    pub async fn settle(&mut self) {
        while let Some(completion) = self.next_completion().await {
            self.apply(completion);
        }
    }

    fn dispatch(&mut self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::LoadCourses { ticket, context } => {
                    let guard = self.guard(ticket, RequestKind::Courses);
                    let catalog = self.services.catalog.clone();
                    tokio::spawn(async move {
                        let result = catalog.list_courses(&context).await;
                        guard.finish(Completion::Courses { ticket, result });
                    });
                }
                Effect::LoadFiles { ticket, query } => {
                    self.files_cancel.cancel();
                    self.files_cancel = CancellationToken::new();
                    let token = self.files_cancel.clone();
                    let guard = self.guard(ticket, RequestKind::Files);
                    let catalog = self.services.catalog.clone();
                    tokio::spawn(async move {
                        tokio::select! {
                            _ = token.cancelled() => {
                                debug!(%ticket, "File request cancelled.");
                            }
                            result = catalog.list_files(&query) => {
                                guard.finish(Completion::Files { ticket, result });
                            }
                        }
                    });
                }
                Effect::CancelFiles => {
                    self.files_cancel.cancel();
                }
                Effect::Ask { ticket, request } => {
                    let guard = self.guard(ticket, RequestKind::Answer);
                    let assistant = self.services.assistant.clone();
                    tokio::spawn(async move {
                        let result = assistant.answer_question(&request).await;
                        guard.finish(Completion::Answer { ticket, result });
                    });
                }
            }
        }
    }

    fn guard(&mut self, ticket: Ticket, kind: RequestKind) -> CompletionGuard {
        info!(%ticket, ?kind, "Dispatching request.");
        self.in_flight += 1;
        CompletionGuard::new(self.tx.clone(), ticket, kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use coursehub_core::catalog::Category;
    use coursehub_core::domain::{AcademicContext, AskRequest, Course, CourseFile, FileQuery};
    use coursehub_core::ports::{
        CourseCatalogService, PortError, PortResult, QuestionAnsweringService,
    };
    use coursehub_core::workflow::{FileListing, SetupForm};
    use std::collections::{HashMap, VecDeque};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};
    use tokio::sync::oneshot;

    type FileReply = oneshot::Receiver<PortResult<Vec<CourseFile>>>;
    type AnswerReply = oneshot::Receiver<PortResult<Option<String>>>;

    /// Serves two courses immediately; files and answers wait for the test to release them.
    #[derive(Default)]
    struct GatedBackend {
        files: Mutex<HashMap<Category, FileReply>>,
        answers: Mutex<VecDeque<AnswerReply>>,
        asks: AtomicUsize,
    }

    impl GatedBackend {
        fn gate_files(&self, category: Category) -> oneshot::Sender<PortResult<Vec<CourseFile>>> {
            let (tx, rx) = oneshot::channel();
            self.files.lock().unwrap().insert(category, rx);
            tx
        }

        fn gate_answer(&self) -> oneshot::Sender<PortResult<Option<String>>> {
            let (tx, rx) = oneshot::channel();
            self.answers.lock().unwrap().push_back(rx);
            tx
        }
    }

    #[async_trait]
    impl CourseCatalogService for GatedBackend {
        async fn list_courses(&self, _context: &AcademicContext) -> PortResult<Vec<Course>> {
            Ok(["cs201", "ma101"]
                .into_iter()
                .map(|id| Course {
                    id: id.to_string(),
                    name: id.to_uppercase(),
                    code: None,
                })
                .collect())
        }

        async fn list_files(&self, query: &FileQuery) -> PortResult<Vec<CourseFile>> {
            let gate = self.files.lock().unwrap().remove(&query.category);
            match gate {
                Some(rx) => rx
                    .await
                    .unwrap_or_else(|_| Err(PortError::Transport("gate dropped".into()))),
                None => Ok(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl QuestionAnsweringService for GatedBackend {
        async fn answer_question(&self, _request: &AskRequest) -> PortResult<Option<String>> {
            self.asks.fetch_add(1, Ordering::SeqCst);
            let gate = self.answers.lock().unwrap().pop_front();
            match gate {
                Some(rx) => rx
                    .await
                    .unwrap_or_else(|_| Err(PortError::Transport("gate dropped".into()))),
                None => Ok(None),
            }
        }
    }

    struct PanickingAssistant;

    #[async_trait]
    impl QuestionAnsweringService for PanickingAssistant {
        async fn answer_question(&self, _request: &AskRequest) -> PortResult<Option<String>> {
            panic!("assistant blew up");
        }
    }

    fn file(id: &str) -> CourseFile {
        CourseFile {
            id: id.to_string(),
            label: id.to_string(),
            url: format!("https://files.example/{id}"),
            date: None,
        }
    }

    async fn session_with_course(backend: Arc<GatedBackend>) -> Session {
        let mut session = Session::new(Services::shared(backend), ContextShape::MajorYearSemester);
        session
            .try_update(|wf| wf.complete_setup(&SetupForm::new("DataScience", "Year2", "Semester-a")))
            .unwrap();
        session.settle().await;
        assert!(session.select_course_by_id("cs201"));
        session
    }

    #[tokio::test]
    async fn superseded_file_request_is_cancelled_without_raising_a_notice() {
        let backend = Arc::new(GatedBackend::default());
        let _slides = backend.gate_files(Category::Slides);
        let homeworks = backend.gate_files(Category::Homeworks);
        let mut session = session_with_course(backend.clone()).await;

        session.update(|wf| wf.select_category(Category::Slides));
        session.update(|wf| {
            wf.open_category_gate();
            wf.select_category(Category::Homeworks)
        });
        homeworks.send(Ok(vec![file("hw1")])).unwrap();
        session.settle().await;

        let wf = session.workflow();
        assert_eq!(wf.file_listing(), &FileListing::Ready(vec![file("hw1")]));
        assert_eq!(wf.notice(), None);
    }

    #[tokio::test]
    async fn back_navigation_cancels_the_file_request() {
        let backend = Arc::new(GatedBackend::default());
        let _slides = backend.gate_files(Category::Slides);
        let mut session = session_with_course(backend.clone()).await;

        session.update(|wf| wf.select_category(Category::Slides));
        session.update(|wf| wf.back_to_courses());
        session.settle().await;

        assert_eq!(session.in_flight(), 0);
        assert_eq!(session.workflow().file_listing(), &FileListing::Idle);
        assert_eq!(session.workflow().notice(), None);
    }

    #[tokio::test]
    async fn failed_ask_keeps_the_question_for_retry() {
        let backend = Arc::new(GatedBackend::default());
        let reply = backend.gate_answer();
        let mut session = session_with_course(backend.clone()).await;

        session.try_update(|wf| wf.ask("Is this on the exam?")).unwrap();
        assert!(session.workflow().answer_pending());
        drop(reply);
        session.settle().await;

        let wf = session.workflow();
        assert_eq!(wf.chat_history().len(), 1);
        assert_eq!(wf.pending_question(), "Is this on the exam?");
        assert_eq!(wf.notice(), Some("AI failed to respond."));
        assert!(!wf.answer_pending());
    }

    #[tokio::test]
    async fn blank_ask_issues_no_request() {
        let backend = Arc::new(GatedBackend::default());
        let mut session = session_with_course(backend.clone()).await;

        session.try_update(|wf| wf.ask("   ")).unwrap();

        assert_eq!(session.in_flight(), 0);
        assert_eq!(backend.asks.load(Ordering::SeqCst), 0);
        assert!(session.workflow().chat_history().is_empty());
    }

    #[tokio::test]
    async fn answer_arriving_after_back_navigation_is_dropped() {
        let backend = Arc::new(GatedBackend::default());
        let reply = backend.gate_answer();
        let mut session = session_with_course(backend.clone()).await;

        session.try_update(|wf| wf.ask("Still there?")).unwrap();
        session.update(|wf| wf.back_to_courses());
        reply.send(Ok(Some("yes".into()))).unwrap();
        session.settle().await;

        let wf = session.workflow();
        assert!(wf.chat_history().is_empty());
        assert!(!wf.answer_pending());
    }

    #[tokio::test]
    async fn panicking_assistant_still_releases_the_pending_flag() {
        let backend = Arc::new(GatedBackend::default());
        let services = Services {
            catalog: backend,
            assistant: Arc::new(PanickingAssistant),
        };
        let mut session = Session::new(services, ContextShape::MajorYearSemester);
        session
            .try_update(|wf| wf.complete_setup(&SetupForm::new("DataScience", "Year2", "Semester-a")))
            .unwrap();
        session.settle().await;
        assert!(session.select_course_by_id("cs201"));

        session.try_update(|wf| wf.ask("Why?")).unwrap();
        session.settle().await;

        let wf = session.workflow();
        assert!(!wf.answer_pending());
        assert_eq!(wf.chat_history().len(), 1);
        assert_eq!(wf.notice(), Some("AI failed to respond."));
    }

    #[tokio::test]
    async fn unknown_course_id_is_rejected() {
        let backend = Arc::new(GatedBackend::default());
        let mut session = session_with_course(backend).await;
        assert!(!session.select_course_by_id("zz999"));
        assert_eq!(session.workflow().selected_course().map(|c| c.id.as_str()), Some("cs201"));
    }
}
