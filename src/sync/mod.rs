//! Client-side state for the screens that mutate optimistically.
//!
//! Each flow writes its speculative result into the [`cache::QueryCache`]
//! right away, then either keeps it once the server agrees or restores the
//! snapshot taken beforehand and queues a [`Notice`].

pub mod assessment;
pub mod board;
pub mod cache;
pub mod job_list;
pub mod pending;

use std::collections::VecDeque;

use uuid::Uuid;

use crate::builder::{BuilderError, FieldErrors};
use crate::client::ApiError;

pub use assessment::{BuilderSession, RuntimeForm};
pub use board::{CandidateBoard, DropTarget};
pub use cache::{FetchTicket, QueryCache};
pub use job_list::JobListView;
pub use pending::{PendingMutation, Settled};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Success,
    Warning,
    Error,
}

/// Transient message for the user, the equivalent of a toast.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

#[derive(Debug, Default)]
pub struct Notices {
    queue: VecDeque<Notice>,
}

impl Notices {
    pub fn push(&mut self, level: NoticeLevel, message: impl Into<String>) {
        self.queue.push_back(Notice {
            level,
            message: message.into(),
        });
    }

    pub fn success(&mut self, message: impl Into<String>) {
        self.push(NoticeLevel::Success, message);
    }

    pub fn warning(&mut self, message: impl Into<String>) {
        self.push(NoticeLevel::Warning, message);
    }

    pub fn error(&mut self, message: impl Into<String>) {
        self.push(NoticeLevel::Error, message);
    }

    pub fn drain(&mut self) -> Vec<Notice> {
        self.queue.drain(..).collect()
    }

    pub fn last(&self) -> Option<&Notice> {
        self.queue.back()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum MutationError {
    #[error("Nothing has been loaded yet")]
    NotLoaded,

    #[error("{0} is not part of the loaded data")]
    UnknownItem(Uuid),

    #[error(transparent)]
    Api(#[from] ApiError),

    #[error(transparent)]
    Builder(#[from] BuilderError),

    #[error(transparent)]
    InvalidAnswers(#[from] FieldErrors),
}
