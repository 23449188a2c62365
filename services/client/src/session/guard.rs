//! services/client/src/session/guard.rs
//!
//! Guarantees that every spawned request reports exactly one completion.

use coursehub_core::effects::{Completion, Ticket};
use coursehub_core::ports::PortError;
use tokio::sync::mpsc::UnboundedSender;

/// Which completion variant a guard falls back to.
#[derive(Debug, Clone, Copy)]
pub(crate) enum RequestKind {
    Courses,
    Files,
    Answer,
}

/// Held by a request task for its whole lifetime. If the task ends without calling
/// [`CompletionGuard::finish`] (cancellation, abort, panic), dropping the guard reports
/// a failed completion, so the workflow always releases whatever it was waiting on.
pub(crate) struct CompletionGuard {
    tx: UnboundedSender<Completion>,
    ticket: Ticket,
    kind: RequestKind,
    finished: bool,
}

impl CompletionGuard {
    pub(crate) fn new(tx: UnboundedSender<Completion>, ticket: Ticket, kind: RequestKind) -> Self {
        Self {
            tx,
            ticket,
            kind,
            finished: false,
        }
    }

    pub(crate) fn finish(mut self, completion: Completion) {
        self.finished = true;
        // The receiver only disappears when the session itself is gone.
        let _ = self.tx.send(completion);
    }

    fn abandoned(&self) -> Completion {
        let ticket = self.ticket;
        let error = PortError::Unexpected("request ended before completing".to_string());
        match self.kind {
            RequestKind::Courses => Completion::Courses {
                ticket,
                result: Err(error),
            },
            RequestKind::Files => Completion::Files {
                ticket,
                result: Err(error),
            },
            RequestKind::Answer => Completion::Answer {
                ticket,
                result: Err(error),
            },
        }
    }
}

impl Drop for CompletionGuard {
    fn drop(&mut self) {
        if !self.finished {
            let _ = self.tx.send(self.abandoned());
        }
    }
}
